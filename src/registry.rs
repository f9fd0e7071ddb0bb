//! Generator registry.
//!
//! Maps a generator-type key to a lazily-instantiated generator. One
//! registry instance serves every domain in a pipeline run, which is why
//! [`Generator`] implementations must keep all per-run state on the
//! passed-in context rather than on themselves. Registration is explicit
//! and happens at bootstrap: there is no dynamic module loading, a caller
//! wires in custom generators by calling [`GeneratorRegistry::register`]
//! before handing the registry to the pipeline.

use crate::generators::{
    ConverterGenerator, Generator, HandlerGenerator, IndexGenerator, RepositoryGenerator,
    RoutesGenerator, SchemaGenerator, TestStubsGenerator, TypesGenerator,
};
use std::collections::BTreeMap;

type Factory = Box<dyn Fn() -> Box<dyn Generator>>;

enum Slot {
    Pending(Factory),
    Ready(Box<dyn Generator>),
}

#[derive(Default)]
pub struct GeneratorRegistry {
    slots: BTreeMap<String, Slot>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        GeneratorRegistry::default()
    }

    /// Register a generator under `kind`. Idempotent per type: a later
    /// registration for the same kind replaces the earlier one.
    pub fn register<F>(&mut self, kind: &str, factory: F, instantiate_now: bool)
    where
        F: Fn() -> Box<dyn Generator> + 'static,
    {
        let slot = if instantiate_now {
            Slot::Ready(factory())
        } else {
            Slot::Pending(Box::new(factory))
        };
        self.slots.insert(kind.to_string(), slot);
    }

    /// The generator registered under `kind`, instantiating it on first
    /// access when it was registered lazily.
    pub fn get(&mut self, kind: &str) -> Option<&dyn Generator> {
        let slot = self.slots.get_mut(kind)?;
        if let Slot::Pending(factory) = slot {
            *slot = Slot::Ready(factory());
        }
        match slot {
            Slot::Ready(generator) => Some(&**generator),
            Slot::Pending(_) => None,
        }
    }

    /// Every registered generator, instantiating any still-pending slots.
    pub fn get_all(&mut self) -> BTreeMap<String, &dyn Generator> {
        for slot in self.slots.values_mut() {
            if let Slot::Pending(factory) = slot {
                *slot = Slot::Ready(factory());
            }
        }
        self.slots
            .iter()
            .filter_map(|(kind, slot)| match slot {
                Slot::Ready(generator) => Some((kind.clone(), generator.as_ref())),
                Slot::Pending(_) => None,
            })
            .collect()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.slots.contains_key(kind)
    }

    /// Registered kinds, in stable order.
    pub fn kinds(&self) -> Vec<&str> {
        self.slots.keys().map(|s| s.as_str()).collect()
    }
}

/// The built-in generator set, registered lazily.
pub fn default_registry() -> GeneratorRegistry {
    let mut registry = GeneratorRegistry::new();
    registry.register("types", || Box::new(TypesGenerator), false);
    registry.register("repository", || Box::new(RepositoryGenerator), false);
    registry.register("schema", || Box::new(SchemaGenerator), false);
    registry.register("handler", || Box::new(HandlerGenerator), false);
    registry.register("converter", || Box::new(ConverterGenerator), false);
    registry.register("routes", || Box::new(RoutesGenerator), false);
    registry.register("index", || Box::new(IndexGenerator), false);
    registry.register("tests", || Box::new(TestStubsGenerator), false);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GenerationContext;
    use crate::error::Result;
    use crate::generators::GeneratorOutput;

    struct Probe(&'static str);

    impl Generator for Probe {
        fn kind(&self) -> &'static str {
            self.0
        }
        fn generate(&self, _ctx: &mut GenerationContext<'_>) -> Result<GeneratorOutput> {
            Ok(GeneratorOutput::default())
        }
    }

    #[test]
    fn test_lazy_instantiation_on_first_get() {
        let mut registry = GeneratorRegistry::new();
        registry.register("probe", || Box::new(Probe("probe")), false);
        assert!(registry.contains("probe"));
        let generator = registry.get("probe").unwrap();
        assert_eq!(generator.kind(), "probe");
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = GeneratorRegistry::new();
        registry.register("probe", || Box::new(Probe("first")), true);
        registry.register("probe", || Box::new(Probe("second")), true);
        assert_eq!(registry.get("probe").unwrap().kind(), "second");
    }

    #[test]
    fn test_missing_kind_is_none() {
        let mut registry = GeneratorRegistry::new();
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_get_all_instantiates_pending_slots() {
        let mut registry = GeneratorRegistry::new();
        registry.register("a", || Box::new(Probe("a")), false);
        registry.register("b", || Box::new(Probe("b")), true);
        let all = registry.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all["a"].kind(), "a");
        assert_eq!(all["b"].kind(), "b");
    }

    #[test]
    fn test_default_registry_covers_configured_generators() {
        let registry = default_registry();
        for layer in crate::config::default_layers().values() {
            for kind in &layer.generator_order {
                assert!(registry.contains(kind), "missing generator '{kind}'");
            }
        }
    }
}
