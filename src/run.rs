//! Test-lifecycle primitives: outcome records, the observer seam exposed to
//! host harnesses, and the shared run recorder.

pub mod observer;
pub mod outcome;
pub mod recorder;

pub use observer::RunObserver;
pub use outcome::{TestOutcome, TestStatus};
pub use recorder::{RunRecorder, RunSnapshot};
