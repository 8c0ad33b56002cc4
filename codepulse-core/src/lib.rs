//! CodePulse Core - Resource Types and Derivations
//!
//! Pure data and pure functions. The terminal client depends on this crate;
//! nothing here performs I/O, reads the environment, or keeps state.

pub mod derive;
pub mod error;
pub mod key;
pub mod records;

pub use derive::{StubBand, Tone};
pub use error::TransportError;
pub use key::{KeyParseError, ResourceKey};
pub use records::{
    Activity, Component, ComponentList, ComponentSummary, DashboardPayload, Feature,
    FeatureBreakdown, FeatureList, FileList, FileRecord, Overview, Resource, Stub, StubList, Task,
    TaskList,
};
