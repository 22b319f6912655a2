use crate::run::outcome::TestOutcome;

/// Lifecycle seam between a host test framework and the reporting pipeline.
///
/// A harness drives the four hooks in order: `run_started` once, `tag` for
/// every collected test carrying an issue-key marker, `record` as each test
/// finishes, and `run_finished` once at the end. Implementations must be
/// callable from whichever threads the harness runs tests on.
pub trait RunObserver: Send + Sync {
    /// Marks the wall-clock start of the run.
    fn run_started(&self);

    /// Registers the external issue key for a test. Tests without a marker
    /// are never tagged and stay out of the report.
    fn tag(&self, test_id: &str, issue_key: &str);

    /// Stores a finished test's outcome.
    fn record(&self, outcome: TestOutcome);

    /// Marks the wall-clock end of the run.
    fn run_finished(&self);
}
