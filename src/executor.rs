use crate::button::SourceType;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Runs a button's command text in the matching interpreter.
///
/// Fire and forget: the session never looks at the outcome. Implementations
/// report their own failures.
pub trait CommandExecutor {
    fn execute(&self, command: &str, language: SourceType);
}

/// Interpreter command lines, split with shell quoting rules. The command
/// text is appended as the last argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpreters {
    #[serde(default = "default_python")]
    pub python: String,
    #[serde(default = "default_mel")]
    pub mel: String,
}

fn default_python() -> String {
    "python3 -c".into()
}

fn default_mel() -> String {
    "mayabatch -command".into()
}

impl Default for Interpreters {
    fn default() -> Self {
        Self {
            python: default_python(),
            mel: default_mel(),
        }
    }
}

impl Interpreters {
    pub fn for_language(&self, language: SourceType) -> &str {
        match language {
            SourceType::Mel => &self.mel,
            SourceType::Python => &self.python,
        }
    }

    /// Program and arguments used to run `command`.
    pub fn command_line(&self, command: &str, language: SourceType) -> Option<Vec<String>> {
        let mut parts = shlex::split(self.for_language(language))?;
        if parts.is_empty() {
            return None;
        }
        parts.push(command.to_string());
        Some(parts)
    }
}

/// Failure messages produced by [`ProcessExecutor`], drained by the UI.
pub type FailureLog = Rc<RefCell<Vec<String>>>;

/// Spawns the configured interpreter as a child process.
pub struct ProcessExecutor {
    interpreters: Interpreters,
    failures: FailureLog,
}

impl ProcessExecutor {
    pub fn new(interpreters: Interpreters) -> Self {
        Self {
            interpreters,
            failures: FailureLog::default(),
        }
    }

    /// Shared handle to the failure messages.
    pub fn failures(&self) -> FailureLog {
        self.failures.clone()
    }

    fn fail(&self, msg: String) {
        tracing::error!("{msg}");
        self.failures.borrow_mut().push(msg);
    }
}

impl CommandExecutor for ProcessExecutor {
    fn execute(&self, command: &str, language: SourceType) {
        let Some(parts) = self.interpreters.command_line(command, language) else {
            self.fail(format!(
                "No usable {language} interpreter configured ('{}')",
                self.interpreters.for_language(language)
            ));
            return;
        };
        let mut cmd = std::process::Command::new(&parts[0]);
        cmd.args(&parts[1..]);
        match cmd.spawn() {
            Ok(child) => tracing::debug!(pid = child.id(), %language, "started command"),
            Err(e) => self.fail(format!("Failed to start {}: {e}", parts[0])),
        }
    }
}

/// One call observed by [`RecordingExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub language: SourceType,
}

/// Executor that only records what it was asked to run. Clones share the
/// same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    calls: Rc<RefCell<Vec<Invocation>>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn execute(&self, command: &str, language: SourceType) {
        self.calls.borrow_mut().push(Invocation {
            command: command.to_string(),
            language,
        });
    }
}
