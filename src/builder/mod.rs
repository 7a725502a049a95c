//! Command synthesis.
//!
//! [`toolchain`] maps abstract build options onto each dialect's switches;
//! [`assemble`] turns the result into concrete invocations.

pub mod assemble;
pub mod toolchain;

pub use assemble::{ArgumentAssembler, AssembleError, Assembly, AssemblyRequest};
pub use toolchain::{
    CommandSpec, FamilyId, ToolchainAdapter, ToolchainDescriptor, ToolchainRegistry,
    UnsupportedCapability,
};
