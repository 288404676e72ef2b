//! Check gate command.

use anyhow::{Context, Result};
use porter_gate::{default_steps, FailurePolicy, GateRunner, StepStatus, SystemExecutor};

use crate::config::CheckSettings;

/// Run the check command.
pub fn run(settings: &CheckSettings, strict: bool, json: bool, list: bool) -> Result<()> {
    let policy = if strict || settings.strict {
        FailurePolicy::StopOnFailure
    } else {
        FailurePolicy::Continue
    };
    let runner = GateRunner::new(default_steps(&settings.program)).with_policy(policy);

    if list {
        for (i, step) in runner.steps().iter().enumerate() {
            println!("{}. {:<7} {}", i + 1, step.name, step);
        }
        return Ok(());
    }

    tracing::info!("Running {} checks ({:?})", runner.steps().len(), policy);

    let report = runner.run(&mut SystemExecutor::new());

    if json {
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", out);
    }

    tracing::info!(
        "{} passed, {} failed, {} skipped",
        report.count(|s| *s == StepStatus::Passed),
        report.count(StepStatus::is_failure),
        report.count(|s| *s == StepStatus::Skipped)
    );

    report.ensure_passed()?;

    Ok(())
}
