pub mod api;
pub mod config;
pub mod report;
pub mod run;
pub mod runtime;

pub use api::{ApiError, ClientOptions, ReportClient, SubmitReceipt};
pub use config::runconfig::{load_csv, DataRow, RunParams};
pub use config::secrets::SecretsFile;
pub use config::settings::{
    parse_flag, ServiceFlavor, Settings, SettingsBuilder, DEFAULT_XRAY_HOST,
};
pub use report::builder::build_report;
pub use report::model::{ExecutionReport, ReportInfo, TestRun, TestStep};
pub use run::observer::RunObserver;
pub use run::outcome::{TestOutcome, TestStatus};
pub use run::recorder::{RunRecorder, RunSnapshot};
pub use runtime::reporter::{Reporter, SubmissionSummary};
pub use runtime::telemetry::init_tracing;
