//! # Resolve Module
//!
//! Pure schema analysis: unwrapping response envelopes to canonical entity
//! names, collapsing `allOf`-alias indirections, and partitioning
//! operations into resource groups.
//!
//! Nothing here touches the filesystem or mutates shared state. Ambiguity
//! is never an error at this layer; every function degrades to `None` or a
//! conventional fallback and lets the caller decide how loudly to complain.

mod alias;
mod entity;
mod grouping;

pub use alias::resolve_alias;
pub use entity::{has_list_shape, resolve_entity};
pub use grouping::{
    group_operations, resolve_entity_for_group, ClassifiedOperation, EntityResolution,
    ResourceGroup,
};
