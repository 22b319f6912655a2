//! HTTP client plumbing: authentication headers, client options, and the
//! flavor-aware submission sequence.

pub mod auth;
pub mod client;
pub mod options;

pub use client::{ApiError, ReportClient, SubmitReceipt};
pub use options::ClientOptions;
