//! Sequential gate runner.

use serde::Serialize;

use crate::executor::{CommandExecutor, Exit};
use crate::step::CheckStep;

/// What to do after a step fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Run every step no matter what; failures are only reported
    #[default]
    Continue,

    /// Skip everything after the first failing step
    StopOnFailure,
}

/// Outcome of a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    Failed { code: Option<i32> },
    SpawnFailed { message: String },
    Skipped,
}

impl StepStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::SpawnFailed { .. })
    }
}

/// A step together with how it went.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    #[serde(flatten)]
    pub step: CheckStep,
    #[serde(flatten)]
    pub status: StepStatus,
}

/// Results of a gate run, one entry per declared step, in order.
#[derive(Debug, Clone, Serialize)]
pub struct GateReport {
    pub policy: FailurePolicy,
    pub outcomes: Vec<StepOutcome>,
}

/// Errors surfaced from a finished gate run.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("{} of {} checks failed: {}", failed.len(), total, failed.join(", "))]
    ChecksFailed { failed: Vec<String>, total: usize },
}

impl GateReport {
    pub fn passed(&self) -> bool {
        !self.outcomes.iter().any(|o| o.status.is_failure())
    }

    /// Names of failed steps, in run order.
    pub fn failures(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.status.is_failure())
            .map(|o| o.step.name.as_str())
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&StepStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    /// Turn a report with failures into an error.
    pub fn ensure_passed(&self) -> Result<(), GateError> {
        if self.passed() {
            return Ok(());
        }
        Err(GateError::ChecksFailed {
            failed: self.failures().into_iter().map(String::from).collect(),
            total: self.outcomes.len(),
        })
    }
}

/// Runs check steps one after another.
pub struct GateRunner {
    steps: Vec<CheckStep>,
    policy: FailurePolicy,
}

impl GateRunner {
    pub fn new(steps: Vec<CheckStep>) -> Self {
        Self {
            steps,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn steps(&self) -> &[CheckStep] {
        &self.steps
    }

    /// Run every step through `executor`, blocking on each.
    pub fn run<E: CommandExecutor>(&self, executor: &mut E) -> GateReport {
        let mut outcomes = Vec::with_capacity(self.steps.len());
        let mut halted = false;

        for (i, step) in self.steps.iter().enumerate() {
            if halted {
                tracing::debug!("Skipping {}", step.name);
                outcomes.push(StepOutcome {
                    step: step.clone(),
                    status: StepStatus::Skipped,
                });
                continue;
            }

            tracing::info!("[{}/{}] {}", i + 1, self.steps.len(), step);

            let status = match executor.run(step) {
                Ok(Exit { success: true, .. }) => StepStatus::Passed,
                Ok(Exit { code, .. }) => {
                    tracing::warn!("{} failed (exit code {:?})", step.name, code);
                    StepStatus::Failed { code }
                }
                Err(e) => {
                    tracing::warn!("{} could not start: {}", step.name, e);
                    StepStatus::SpawnFailed {
                        message: e.to_string(),
                    }
                }
            };

            if status.is_failure() && self.policy == FailurePolicy::StopOnFailure {
                halted = true;
            }

            outcomes.push(StepOutcome {
                step: step.clone(),
                status,
            });
        }

        GateReport {
            policy: self.policy,
            outcomes,
        }
    }
}
