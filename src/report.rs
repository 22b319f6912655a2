//! Execution-report aggregation: the serde wire model and the builder that
//! groups recorded outcomes by issue key.

pub mod builder;
pub mod model;

pub use builder::build_report;
pub use model::{ExecutionReport, ReportInfo, TestRun, TestStep};
