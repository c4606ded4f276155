use async_trait::async_trait;
use log::debug;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::time;

#[cfg(test)]
use mockall::automock;

use crate::config::Config;
use crate::error::Error;
use crate::providers::dnscmd::classifier::{OutputMarkers, ResponseClassifier};

pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Raw bytes captured from one invocation.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `command` to completion, failing with `Error::Timeout` once `limit`
    /// has elapsed.
    async fn run(&self, command: &CommandLine, limit: Duration) -> Result<CommandOutput, Error>;
}

/// Spawns one OS process per call.
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &CommandLine, limit: Duration) -> Result<CommandOutput, Error> {
        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::Administration(format!(
                    "failed to launch {}: {e}",
                    command.program.display()
                ))
            })?;

        // On timeout the child is dropped with the future: it is killed and
        // its pipes are closed.
        match time::timeout(limit, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(CommandOutput {
                stdout: output.stdout,
                stderr: output.stderr,
            }),
            Ok(Err(e)) => Err(Error::Administration(format!(
                "failed to read output of {}: {e}",
                command.program.display()
            ))),
            Err(_) => Err(Error::Timeout(limit)),
        }
    }
}

/// Runs dnscmd against one server through the system command interpreter.
pub struct DnscmdExecutor {
    interpreter: PathBuf,
    dnscmd: String,
    server: String,
    timeout: Duration,
    classifier: ResponseClassifier,
    runner: Arc<dyn CommandRunner>,
}

impl DnscmdExecutor {
    pub fn new(config: &Config, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            interpreter: config.interpreter(),
            dnscmd: config.dnscmd_path.clone(),
            server: config.dns_server.clone(),
            timeout: COMMAND_TIMEOUT,
            classifier: ResponseClassifier::new(OutputMarkers::default()),
            runner,
        }
    }

    pub fn with_server(mut self, server: &str) -> Self {
        self.server = server.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_markers(mut self, markers: OutputMarkers) -> Self {
        self.classifier = ResponseClassifier::new(markers);
        self
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn markers(&self) -> &OutputMarkers {
        self.classifier.markers()
    }

    pub fn command_line(&self, args: &[&str]) -> CommandLine {
        let mut full = vec!["/c".to_string(), self.dnscmd.clone(), self.server.clone()];
        full.extend(args.iter().map(|a| a.to_string()));
        CommandLine {
            program: self.interpreter.clone(),
            args: full,
        }
    }

    /// Runs `dnscmd <server> <args>` and returns its output lines, stdout
    /// first. Fails unless the output reports successful completion.
    pub async fn execute(
        &self,
        args: &[&str],
        description: &str,
        error_only: bool,
    ) -> Result<Vec<String>, Error> {
        let command = self.command_line(args);
        debug!("executing: {command}");
        let output = self.runner.run(&command, self.timeout).await?;
        self.classifier.report(&output, description, error_only)
    }
}
