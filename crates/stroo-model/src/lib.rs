//! # Stroo Model
//!
//! Builds a generation-oriented summary of a Rust package: named types, their
//! fields and methods, free functions, and package-level constants.
//!
//! ## Pipeline
//!
//! - **Source loading**: [`SourceLoader`] parses `.rs` files with `syn` and groups
//!   them into [`SourcePackage`]s, one per directory.
//! - **Reading**: [`PackageBuilder::read_item`] classifies each declaration and
//!   records it. Declarations may arrive in any order.
//! - **Resolution**: [`PackageBuilder::resolve`] attaches methods to receiver types,
//!   binds every named type reference to a [`TypeId`] and freezes the result into
//!   a [`PackageModel`].
//!
//! Nothing here type-checks the source; the parser is trusted for validity.

pub mod descriptor;
pub mod error;
pub mod identity;
pub mod model;
pub mod reader;
pub mod resolver;
pub mod source;
mod tags;

pub use descriptor::{TypeDescriptor, Wrapper};
pub use error::{ModelError, ModelResult, ResolutionIssue};
pub use identity::{FunctionId, TypeId};
pub use model::{
    ArrayElement, Capability, FieldInfo, FunctionInfo, PackageModel, ParamInfo, ReceiverMode,
    Signature, TagEntry, TagInfo, TypeInfo, TypeKind, VariableInfo, VariableKind,
};
pub use reader::{MethodReceiver, PackageBuilder, ReaderOptions};
pub use source::{SourceFile, SourceLoader, SourcePackage};
