use super::verb::VerbRules;
use once_cell::sync::Lazy;
use regex::Regex;

/// Assumes the first lowercase run is the verb and the first capitalized
/// run is the resource. Applied when no verb prefix from the table matches.
static VERB_RESOURCE_SPLIT: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new("^[a-z0-9]+([A-Z].*)$").expect("split pattern")
});

/// Convert an identifier to PascalCase, splitting on `_` and `-`.
pub fn pascal_case(s: &str) -> String {
    s.split(['_', '-'])
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Extract the resource name from an operation identifier.
///
/// Strips the leading verb token matched by `rules`; when no known verb
/// prefix matches, falls back to splitting the identifier at its first
/// capitalized run, and finally to PascalCasing the whole identifier.
pub fn resource_name(rules: &VerbRules, operation_id: &str) -> String {
    if let Some(end) = rules.matched_prefix_len(operation_id) {
        let remainder = operation_id[end..].trim_start_matches(['_', '-']);
        if !remainder.is_empty() {
            return pascal_case(remainder);
        }
    }
    if let Some(caps) = VERB_RESOURCE_SPLIT.captures(operation_id) {
        if let Some(m) = caps.get(1) {
            return pascal_case(m.as_str());
        }
    }
    pascal_case(operation_id)
}

/// Best-effort English singularization. Enough for schema-table lookups;
/// irregular nouns fall through unchanged.
pub fn singularize(s: &str) -> String {
    if s.len() > 3 && s.ends_with("ies") {
        return format!("{}y", &s[..s.len() - 3]);
    }
    for suffix in ["ches", "shes", "sses", "xes", "zes"] {
        if s.len() > suffix.len() && s.ends_with(suffix) {
            return s[..s.len() - 2].to_string();
        }
    }
    if s.len() > 1 && s.ends_with('s') && !s.ends_with("ss") {
        return s[..s.len() - 1].to_string();
    }
    s.to_string()
}

pub fn pluralize(s: &str) -> String {
    let bytes = s.as_bytes();
    if s.len() > 1 && bytes[s.len() - 1] == b'y' {
        let before = bytes[s.len() - 2] as char;
        if !matches!(before, 'a' | 'e' | 'i' | 'o' | 'u') {
            return format!("{}ies", &s[..s.len() - 1]);
        }
    }
    if s.ends_with('s') || s.ends_with('x') || s.ends_with('z') || s.ends_with("ch") || s.ends_with("sh")
    {
        return format!("{s}es");
    }
    format!("{s}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_from_known_verb_prefix() {
        let rules = VerbRules::standard();
        assert_eq!(resource_name(&rules, "listMarkets"), "Markets");
        assert_eq!(resource_name(&rules, "getOrder"), "Order");
        assert_eq!(resource_name(&rules, "create_order"), "Order");
        assert_eq!(resource_name(&rules, "cancelOrder"), "Order");
    }

    #[test]
    fn test_resource_fallback_split() {
        let rules = VerbRules::standard();
        // "peek" is not in the verb table; the capitalized run is the resource.
        assert_eq!(resource_name(&rules, "peekOrderBook"), "OrderBook");
    }

    #[test]
    fn test_resource_final_fallback_pascal_cases_everything() {
        let rules = VerbRules::standard();
        assert_eq!(resource_name(&rules, "heartbeat"), "Heartbeat");
        assert_eq!(resource_name(&rules, "order_book"), "OrderBook");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("user_profile"), "UserProfile");
        assert_eq!(pascal_case("auth-session"), "AuthSession");
        assert_eq!(pascal_case("Markets"), "Markets");
        assert_eq!(pascal_case(""), "");
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("Markets"), "Market");
        assert_eq!(singularize("Entries"), "Entry");
        assert_eq!(singularize("Statuses"), "Status");
        assert_eq!(singularize("Address"), "Address");
        assert_eq!(singularize("Order"), "Order");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("Market"), "Markets");
        assert_eq!(pluralize("Entry"), "Entries");
        assert_eq!(pluralize("Status"), "Statuses");
        assert_eq!(pluralize("Day"), "Days");
    }
}
