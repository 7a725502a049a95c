//! High-level operations.
//!
//! This module contains the implementation of nativelink commands.

pub mod synthesize;

pub use synthesize::{
    list_libraries, synthesize, Synthesis, SynthesisInputs, SynthesizeError, SynthesizeOptions,
};
