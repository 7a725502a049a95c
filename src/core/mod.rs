//! Configuration entities: link settings, library references, search
//! paths, literal arguments, and the if/unless gates that switch them.

pub mod argument;
pub mod condition;
pub mod define;
pub mod errors;
pub mod library;
pub mod link_spec;
pub mod manifest;
pub mod search_path;

pub use argument::{ArgLocation, CommandArgument};
pub use condition::{select_active, Condition, Gated, Gates, ProcessEnv, PropertyLookup};
pub use define::Define;
pub use errors::{ConfigError, EntityKind};
pub use library::{LibraryReference, LibraryType};
pub use link_spec::{FixedAddress, LinkSpec, LinkType, Subsystem, SubsystemFlag};
pub use manifest::Manifest;
pub use search_path::SearchPath;
