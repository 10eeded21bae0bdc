//! Protobuf schema descriptors for protonorm.
//!
//! - [`model`]: the read-only descriptor tree the canonicalizer walks.
//! - [`descriptor_set`]: conversion from `FileDescriptorSet` JSON (as written
//!   by `buf build --as-file-descriptor-set`).
//! - [`provider`]: the [`SchemaProvider`] seam that turns a module identifier
//!   into a loaded [`SchemaFile`].

pub mod descriptor_set;
pub mod error;
pub mod model;
pub mod provider;

pub use descriptor_set::{parse_descriptor_set_json, DescriptorSet};
pub use error::LoadError;
pub use model::{
    EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FieldLabel, FieldType,
    MessageDescriptor, MethodDescriptor, ScalarKind, SchemaFile, ServiceDescriptor, TypeRef,
};
pub use provider::{DirectoryProvider, SchemaProvider, StaticProvider};
