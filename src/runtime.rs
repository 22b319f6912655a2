//! Runtime glue that wires settings, the recorder, submission, and tracing
//! setup.

pub mod reporter;
pub mod telemetry;

pub use reporter::{Reporter, SubmissionSummary};
pub use telemetry::init_tracing;
