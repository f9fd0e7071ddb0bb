use crate::layout::{GeneratorLocation, LayerStructure};
use std::collections::BTreeMap;
use std::path::PathBuf;

fn location(output_dir: &str, main_file: Option<&str>) -> GeneratorLocation {
    GeneratorLocation {
        output_dir: output_dir.to_string(),
        main_file: main_file.map(str::to_string),
    }
}

/// Built-in per-layer folder structure.
///
/// Kept as data so deployments can override base paths and aliases from
/// `stratagen.toml` without touching the generator order tables.
pub fn default_layers() -> BTreeMap<String, LayerStructure> {
    let mut layers = BTreeMap::new();

    let mut core = BTreeMap::new();
    core.insert("types".to_string(), location("{domain}/entities", None));
    core.insert(
        "repository".to_string(),
        location("{domain}/repositories", None),
    );
    core.insert("index".to_string(), location("{domain}", Some("index.ts")));
    layers.insert(
        "core".to_string(),
        LayerStructure {
            base_path: PathBuf::from("src/core"),
            import_alias: Some("@app/core".to_string()),
            generator_order: vec![
                "types".to_string(),
                "repository".to_string(),
                "index".to_string(),
            ],
            generators: core,
        },
    );

    let mut services = BTreeMap::new();
    services.insert("schema".to_string(), location("{domain}/schemas", None));
    services.insert("handler".to_string(), location("{domain}/handlers", None));
    services.insert(
        "converter".to_string(),
        location("{domain}/converters", None),
    );
    services.insert(
        "routes".to_string(),
        location("{domain}", Some("{domain}.routes.ts")),
    );
    services.insert("index".to_string(), location("{domain}", Some("index.ts")));
    layers.insert(
        "services".to_string(),
        LayerStructure {
            base_path: PathBuf::from("src/services"),
            import_alias: Some("@app/services".to_string()),
            generator_order: vec![
                "schema".to_string(),
                "handler".to_string(),
                "converter".to_string(),
                "routes".to_string(),
                "index".to_string(),
            ],
            generators: services,
        },
    );

    let mut tests = BTreeMap::new();
    tests.insert("tests".to_string(), location("{domain}", None));
    layers.insert(
        "tests".to_string(),
        LayerStructure {
            base_path: PathBuf::from("tests"),
            import_alias: Some("@tests".to_string()),
            generator_order: vec!["tests".to_string()],
            generators: tests,
        },
    );

    layers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_ordered_generator_has_a_location() {
        for (name, layer) in default_layers() {
            for generator in &layer.generator_order {
                assert!(
                    layer.generators.contains_key(generator),
                    "layer '{name}' orders '{generator}' without a location"
                );
            }
        }
    }

    #[test]
    fn test_default_layers_cover_canonical_order() {
        let layers = default_layers();
        for name in crate::layout::CANONICAL_LAYER_ORDER {
            assert!(layers.contains_key(name));
        }
    }
}
