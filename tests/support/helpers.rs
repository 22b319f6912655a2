use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;
use xray_report::{RunObserver, RunRecorder, TestOutcome};

static TRACING_SUBSCRIBER: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
});

pub fn init_tracing() {
    Lazy::force(&TRACING_SUBSCRIBER);
}

/// Tags and records a small mixed run: two tests behind one key (one of them
/// failing), one skipped test behind another key, and one untagged pass.
pub fn record_mixed_run(recorder: &RunRecorder) {
    recorder.tag("suite::add", "CALC-1");
    recorder.tag("suite::overflow", "CALC-1");
    recorder.tag("suite::render", "UI-9");
    recorder.record(TestOutcome::passed("suite::add"));
    recorder.record(TestOutcome::failed("suite::overflow", "i64 wrapped"));
    recorder.record(TestOutcome::skipped(
        "suite::render",
        Some("display missing".into()),
    ));
    recorder.record(TestOutcome::passed("suite::untagged"));
}
