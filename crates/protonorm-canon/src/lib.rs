//! Deterministic canonical rendering of protobuf schema descriptors.
//!
//! Two descriptor trees that differ only in declaration order render to the
//! same bytes, which makes the output suitable for diffing and hashing schema
//! revisions.
//!
//! ```text
//! service <Name> {
//!   rpc <Method> (<Input>) returns (<Output>);
//! }
//! message <Name> {
//!   [repeated |required ]<type> <field> = <index>;
//!   message <Nested> { ... }
//!   enum <Nested> { ... }
//! }
//! enum <Name> {
//!   <VALUE> = <number>;
//! }
//! ```

pub mod digest;
pub mod driver;
pub mod error;
pub mod render;
pub mod stats;

pub use digest::{canonical_digest, digest_text};
pub use driver::{canonical_lines, canonicalize, canonicalize_module, write_canonical};
pub use error::{CanonicalizeError, Error};
pub use render::{render_enum, render_message, render_service};
pub use stats::SchemaStats;
