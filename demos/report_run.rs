use std::env;

use anyhow::{Context, Result};
use xray_report::{
    parse_flag, Reporter, RunObserver, SecretsFile, Settings, TestOutcome,
};

const DEFAULT_SECRETS_PATH: &str = "/private/secrets";
const DEFAULT_FAIL_SILENTLY: &str = "yes";

/// Simulates a small tagged test run and submits it with whatever credentials
/// the secrets file or environment provides.
///
/// Knobs: `XRAYREPORT_SECRETS` (secrets file path), `XRAYREPORT_PLAN_KEY`,
/// `XRAYREPORT_FAIL_SILENTLY` (yes/no).
#[tokio::main]
async fn main() -> Result<()> {
    xray_report::init_tracing();

    let secrets_path = read_env_or_default("XRAYREPORT_SECRETS", DEFAULT_SECRETS_PATH);
    let fail_silently = parse_flag(&read_env_or_default(
        "XRAYREPORT_FAIL_SILENTLY",
        DEFAULT_FAIL_SILENTLY,
    ))
    .context("XRAYREPORT_FAIL_SILENTLY must be a yes/no flag")?;

    let secrets = SecretsFile::load_or_empty(&secrets_path);
    let mut builder = Settings::from_secrets(&secrets).fail_silently(fail_silently);
    if let Ok(plan_key) = env::var("XRAYREPORT_PLAN_KEY") {
        builder = builder.plan_key(plan_key);
    }
    let settings = builder.build()?;

    let reporter = Reporter::new(settings)?;
    let recorder = reporter.recorder();

    recorder.tag("demo::addition", "CALC-1");
    recorder.tag("demo::subtraction", "CALC-1");
    recorder.tag("demo::division_by_zero", "CALC-2");
    recorder.record(TestOutcome::passed("demo::addition"));
    recorder.record(TestOutcome::passed("demo::subtraction"));
    recorder.record(TestOutcome::failed(
        "demo::division_by_zero",
        "expected error, got 0",
    ));

    let summary = reporter.finish().await?;
    println!(
        "reported {} issue keys; submitted: {}; execution: {}",
        summary.reported_keys,
        summary.submitted,
        summary.execution_key.as_deref().unwrap_or("<none>")
    );
    if let Some(suppressed) = summary.suppressed_error {
        println!("suppressed communication error: {suppressed}");
    }

    Ok(())
}

fn read_env_or_default(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}
