//! Consumer/producer compatibility checking for Protocol Buffers schemas.
//!
//! Two versions of a `.proto` schema are parsed with `protobuf-parse`,
//! normalized into an arena-backed [`DescriptorTree`], and compared
//! structurally. Every comparison reduces to one [`Compatibility`]:
//!
//! * `Equal` - same wire structure.
//! * `SuperSet` - the consumer declares more than the producer.
//! * `SubSet` - the consumer declares less than the producer.
//! * `NotCompatible` - the two cannot interoperate.
//!
//! Fields are matched by number, enum values by number, service methods by
//! name. Request messages of a method must be `Equal`; response messages may
//! differ in either direction.

pub mod compat;
pub mod comparer;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod source;

pub use compat::Compatibility;
pub use comparer::ContractComparer;
pub use config::ComparerConfig;
pub use descriptor::DescriptorTree;
pub use error::{CompareError, Result};
pub use source::{DirectoryFileSystem, FileSystem, MemoryFileSystem, SchemaSource};
