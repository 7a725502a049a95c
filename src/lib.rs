//! nativelink - Compiler and linker command synthesis
//!
//! This crate turns an abstract description of a native compile or link
//! step into the exact command lines a family of compiler/linker dialects
//! expects, resolving symbolic library names against search paths along
//! the way.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities and mocks for nativelink unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides an in-memory directory scanner and
/// ready-made manifests.
#[cfg(test)]
pub mod test_support;

pub use builder::{ArgumentAssembler, Assembly, CommandSpec, FamilyId, ToolchainAdapter};
pub use core::{Condition, LibraryReference, LinkSpec, Manifest, PropertyLookup};
pub use resolver::{FsScanner, LibraryPolicy};
pub use util::context::GlobalContext;
