use crate::error::{Error, Result};
use http::Method;
use regex::{Regex, RegexBuilder};

/// Canonical operation verb.
///
/// Every operation classifies to exactly one of these five verbs; there is
/// no "unknown" variant, the classifier is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verb {
    Create,
    List,
    Get,
    Update,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Create => "create",
            Verb::List => "list",
            Verb::Get => "get",
            Verb::Update => "update",
            Verb::Delete => "delete",
        }
    }

    /// Parse a verb name as written in configuration files.
    pub fn parse(s: &str) -> Option<Verb> {
        match s {
            "create" => Some(Verb::Create),
            "list" => Some(Verb::List),
            "get" => Some(Verb::Get),
            "update" => Some(Verb::Update),
            "delete" => Some(Verb::Delete),
            _ => None,
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the classification table: an anchored prefix pattern and the
/// verb it maps to.
#[derive(Debug, Clone)]
pub struct VerbRule {
    pub pattern: Regex,
    pub verb: Verb,
}

/// Default table, checked top to bottom. Ordering matters: `list` must win
/// over `get`, and the mutating action verbs must be matched before the
/// catch-all `get` family.
///
/// `cancel` maps to `update` (mutating an existing resource), not `delete`.
/// That is policy, not a derivable fact; override it by prepending a rule.
const DEFAULT_RULES: &[(&str, Verb)] = &[
    ("^list", Verb::List),
    ("^create|^add|^register", Verb::Create),
    ("^update|^patch|^refresh|^cancel|^set", Verb::Update),
    ("^delete|^remove", Verb::Delete),
    ("^get|^fetch|^find|^validate", Verb::Get),
    ("^run|^execute|^submit|^send", Verb::Create),
];

/// Ordered verb classification rules.
///
/// The rule list is data, not code: [`VerbRules::standard`] builds the
/// default table and [`VerbRules::prepend`] is the only extension point.
#[derive(Debug, Clone)]
pub struct VerbRules {
    rules: Vec<VerbRule>,
}

impl VerbRules {
    /// Build the standard rule table.
    pub fn standard() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .map(|(pattern, verb)| VerbRule {
                // Patterns in DEFAULT_RULES are known-good.
                #[allow(clippy::expect_used)]
                pattern: RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .expect("default verb pattern"),
                verb: *verb,
            })
            .collect();
        VerbRules { rules }
    }

    /// Prepend a higher-priority rule ahead of the existing table.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `pattern` is not a valid regex.
    pub fn prepend(&mut self, pattern: &str, verb: Verb) -> Result<()> {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::config(format!("invalid verb pattern '{pattern}': {e}")))?;
        self.rules.insert(0, VerbRule { pattern, verb });
        Ok(())
    }

    pub fn rules(&self) -> &[VerbRule] {
        &self.rules
    }

    /// Classify an operation identifier to a canonical verb.
    ///
    /// Strict priority order, first match wins:
    /// 1. the ordered pattern table;
    /// 2. a `get` match is upgraded to `list` when the response is
    ///    list-shaped;
    /// 3. the HTTP-method fallback table, with the same list refinement on
    ///    `GET`;
    /// 4. `get`.
    pub fn classify(
        &self,
        operation_id: &str,
        method: Option<&Method>,
        response_has_list_shape: bool,
    ) -> Verb {
        for rule in &self.rules {
            if rule.pattern.is_match(operation_id) {
                if rule.verb == Verb::Get && response_has_list_shape {
                    return Verb::List;
                }
                return rule.verb;
            }
        }
        if let Some(method) = method {
            let verb = match *method {
                Method::POST => Verb::Create,
                Method::PUT | Method::PATCH => Verb::Update,
                Method::DELETE => Verb::Delete,
                _ => Verb::Get,
            };
            if verb == Verb::Get && response_has_list_shape {
                return Verb::List;
            }
            return verb;
        }
        if response_has_list_shape {
            Verb::List
        } else {
            Verb::Get
        }
    }

    /// The length of the verb prefix the table matched at the start of
    /// `operation_id`, if any. Used by resource-name extraction.
    pub(crate) fn matched_prefix_len(&self, operation_id: &str) -> Option<usize> {
        for rule in &self.rules {
            if let Some(m) = rule.pattern.find(operation_id) {
                if m.start() == 0 {
                    return Some(m.end());
                }
            }
        }
        None
    }
}

impl Default for VerbRules {
    fn default() -> Self {
        VerbRules::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_table_first_match_wins() {
        let rules = VerbRules::standard();
        assert_eq!(rules.classify("listMarkets", None, false), Verb::List);
        assert_eq!(rules.classify("createOrder", None, false), Verb::Create);
        assert_eq!(rules.classify("deleteSession", None, false), Verb::Delete);
        assert_eq!(rules.classify("fetchTrade", None, false), Verb::Get);
        assert_eq!(rules.classify("runBacktest", None, false), Verb::Create);
    }

    #[test]
    fn test_cancel_is_update_by_default() {
        let rules = VerbRules::standard();
        assert_eq!(rules.classify("cancelOrder", None, false), Verb::Update);
    }

    #[test]
    fn test_prepend_overrides_cancel_policy() {
        let mut rules = VerbRules::standard();
        rules.prepend("^cancel", Verb::Delete).unwrap();
        assert_eq!(rules.classify("cancelOrder", None, false), Verb::Delete);
        // Unrelated classifications are untouched.
        assert_eq!(rules.classify("updateOrder", None, false), Verb::Update);
    }

    #[test]
    fn test_get_upgrades_to_list_on_list_shape() {
        let rules = VerbRules::standard();
        assert_eq!(rules.classify("getOrders", None, true), Verb::List);
        assert_eq!(rules.classify("getOrder", None, false), Verb::Get);
    }

    #[test]
    fn test_method_fallback() {
        let rules = VerbRules::standard();
        assert_eq!(
            rules.classify("orderBook", Some(&Method::POST), false),
            Verb::Create
        );
        assert_eq!(
            rules.classify("orderBook", Some(&Method::PUT), false),
            Verb::Update
        );
        assert_eq!(
            rules.classify("orderBook", Some(&Method::DELETE), false),
            Verb::Delete
        );
        assert_eq!(
            rules.classify("orderBook", Some(&Method::GET), false),
            Verb::Get
        );
        assert_eq!(
            rules.classify("orderBook", Some(&Method::GET), true),
            Verb::List
        );
    }

    #[test]
    fn test_default_is_get() {
        let rules = VerbRules::standard();
        assert_eq!(rules.classify("whatever", None, false), Verb::Get);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let rules = VerbRules::standard();
        let a = rules.classify("refreshToken", Some(&Method::POST), false);
        let b = rules.classify("refreshToken", Some(&Method::POST), false);
        assert_eq!(a, b);
        assert_eq!(a, Verb::Update);
    }

    #[test]
    fn test_invalid_prepend_pattern_is_config_error() {
        let mut rules = VerbRules::standard();
        let err = rules.prepend("^(unclosed", Verb::Get).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
