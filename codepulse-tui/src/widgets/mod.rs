//! Reusable widget components.

pub mod progress;
pub mod status;

pub use progress::ProgressBar;
pub use status::{tag_span, StatCardWidget};
