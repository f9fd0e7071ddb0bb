use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// The name an alias schema points at, if `schema` is an alias.
///
/// An alias is a schema that is *only* `allOf: [{$ref: X}]`: exactly one
/// member, a bare reference, no structural contribution of its own.
fn alias_target(schema: &Value) -> Option<&str> {
    let obj = schema.as_object()?;
    if obj.len() != 1 {
        return None;
    }
    let all_of = obj.get("allOf")?.as_array()?;
    if all_of.len() != 1 {
        return None;
    }
    let member = all_of.first()?.as_object()?;
    if member.len() != 1 {
        return None;
    }
    member
        .get("$ref")?
        .as_str()?
        .strip_prefix("#/components/schemas/")
}

/// Follow a chain of `allOf`-alias schemas to the first non-alias name.
///
/// Returns the terminal schema name, or `None` when the chain loops back on
/// itself. A referenced name absent from the table terminates the chain and
/// is returned as-is; the reference still names the entity even when the
/// document forgot to define it.
pub fn resolve_alias(name: &str, table: &BTreeMap<String, Value>) -> Option<String> {
    let mut visited = HashSet::new();
    let mut current = name.to_string();
    loop {
        if !visited.insert(current.clone()) {
            return None;
        }
        let Some(schema) = table.get(&current) else {
            return Some(current);
        };
        match alias_target(schema) {
            Some(target) => current = target.to_string(),
            None => return Some(current),
        }
    }
}
