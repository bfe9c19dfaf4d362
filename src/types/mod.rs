//! Node types and dialects.
//!
//! A [`TypeRegistry`] is supplied per [`Dialect`] by the host and is
//! read-only input to the rest of the crate.

pub mod dialect;
pub mod registry;

pub use dialect::{Dialect, SpecMajor};
pub use registry::{
    ChildRef, ChildType, NodeType, NodeTypeId, TypeDefinition, TypeRegistry, TypeRegistryBuilder,
    SPEC_EXTENSION,
};
