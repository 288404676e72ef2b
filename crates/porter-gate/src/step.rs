//! Check step descriptors and the default gate sequence.

use std::fmt;

use serde::Serialize;

/// One external command in the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckStep {
    /// Short step name (e.g., "lint")
    pub name: String,

    /// Program to invoke
    pub program: String,

    /// Fixed arguments
    pub args: Vec<String>,
}

impl CheckStep {
    pub fn new(name: &str, program: &str, args: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl fmt::Display for CheckStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// The gate sequence, in the order it must run.
///
/// Later tools assume earlier ones already ran (clippy after fmt, tests after build).
pub fn default_steps(program: &str) -> Vec<CheckStep> {
    [
        ("format", "fmt"),
        ("update", "update"),
        ("lint", "clippy"),
        ("check", "check"),
        ("doc", "doc"),
        ("build", "build"),
        ("bench", "bench"),
        ("test", "test"),
    ]
    .into_iter()
    .map(|(name, subcommand)| CheckStep::new(name, program, &[subcommand]))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_sequence_order() {
        let commands: Vec<String> = default_steps("cargo")
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(
            commands,
            vec![
                "cargo fmt",
                "cargo update",
                "cargo clippy",
                "cargo check",
                "cargo doc",
                "cargo build",
                "cargo bench",
                "cargo test",
            ]
        );
    }

    #[test]
    fn program_is_configurable() {
        let steps = default_steps("cross");
        assert!(steps.iter().all(|s| s.program == "cross"));
    }
}
