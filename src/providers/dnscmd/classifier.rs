use log::{error, info};

use crate::error::Error;
use crate::providers::dnscmd::executor::CommandOutput;

pub const COMPLETION_MARKER: &str = "completed successfully";
pub const PRIMARY_ZONE_MARKER: &str = " Primary ";

/// Phrases recognised in dnscmd's free-text output. Other tool versions or
/// locales can substitute their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputMarkers {
    pub completion: String,
    pub primary_zone: String,
}

impl Default for OutputMarkers {
    fn default() -> Self {
        Self {
            completion: COMPLETION_MARKER.to_string(),
            primary_zone: PRIMARY_ZONE_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResponseClassifier {
    markers: OutputMarkers,
}

impl ResponseClassifier {
    pub fn new(markers: OutputMarkers) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &OutputMarkers {
        &self.markers
    }

    /// Splits the captured output into lines and succeeds if any of them
    /// reports completion. Output that is not line-structured text (UTF-16 or
    /// binary, i.e. anything carrying NUL bytes) is reported as an unknown
    /// error for `description`.
    pub fn report(
        &self,
        output: &CommandOutput,
        description: &str,
        error_only: bool,
    ) -> Result<Vec<String>, Error> {
        let Some(lines) = output_lines(output) else {
            error!(
                "Dnscmd failed:\n{}{}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
            return Err(Error::Administration(format!(
                "Unknown error while processing '{description}'"
            )));
        };

        if lines.iter().any(|l| l.contains(&self.markers.completion)) {
            if !error_only {
                info!("{description}");
            }
            Ok(lines)
        } else {
            error!("Dnscmd failed:\n{}", lines.join("\n"));
            Err(Error::Administration(failure_message(description)))
        }
    }
}

// Console output arrives in the OEM code page, so bytes outside UTF-8 are
// replaced rather than rejected.
fn output_lines(output: &CommandOutput) -> Option<Vec<String>> {
    if output.stdout.contains(&0) || output.stderr.contains(&0) {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    Some(
        stdout
            .lines()
            .chain(stderr.lines())
            .map(str::to_string)
            .collect(),
    )
}

/// "Added DNS entry …" becomes "Failed to add DNS entry …".
pub fn failure_message(description: &str) -> String {
    let verb = description
        .replacen("Removed", "remove", 1)
        .replacen("Added", "add", 1);
    format!("Failed to {verb}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::sync::Mutex;

    fn output(stdout: &str, stderr: &str) -> CommandOutput {
        CommandOutput {
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    fn classifier() -> ResponseClassifier {
        ResponseClassifier::new(OutputMarkers::default())
    }

    struct CaptureLogger {
        records: Mutex<Vec<(Level, String)>>,
    }

    impl Log for CaptureLogger {
        fn enabled(&self, _: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            self.records
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger {
        records: Mutex::new(Vec::new()),
    };

    fn logged(level: Level, message: &str) -> bool {
        LOGGER
            .records
            .lock()
            .unwrap()
            .iter()
            .any(|(l, m)| *l == level && m == message)
    }

    fn capture_logs() {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Info);
        }
    }

    #[test]
    fn test_success_is_logged_unless_error_only() {
        capture_logs();
        let out = output("Command completed successfully.\n", "");

        classifier()
            .report(&out, "Added DNS entry logged.example.com => 10.0.0.7", false)
            .unwrap();
        assert!(logged(
            Level::Info,
            "Added DNS entry logged.example.com => 10.0.0.7"
        ));

        classifier()
            .report(&out, "Added DNS entry quiet.example.com => 10.0.0.8", true)
            .unwrap();
        assert!(!logged(
            Level::Info,
            "Added DNS entry quiet.example.com => 10.0.0.8"
        ));
    }

    #[test]
    fn test_failure_output_is_logged_with_error_only() {
        capture_logs();
        let out = output("Command failed:  ERROR_ACCESS_DENIED     5 (quiet.example.net)\n", "");

        let result = classifier().report(&out, "Added DNS entry quiet.example.net => 10.0.0.9", true);
        assert!(result.is_err());
        assert!(logged(
            Level::Error,
            "Dnscmd failed:\nCommand failed:  ERROR_ACCESS_DENIED     5 (quiet.example.net)"
        ));
    }

    #[test]
    fn test_success_when_any_line_completes() {
        let out = output(
            "Add A Record for host.example.com at example.com\r\nCommand completed successfully.\r\n",
            "",
        );
        let lines = classifier()
            .report(&out, "Added DNS entry host.example.com => 10.0.0.1", false)
            .unwrap();
        assert_eq!(
            lines,
            vec![
                "Add A Record for host.example.com at example.com",
                "Command completed successfully."
            ]
        );
    }

    #[test]
    fn test_stderr_lines_are_considered() {
        let out = output("", "Command completed successfully.\n");
        assert!(classifier().report(&out, "Added x", true).is_ok());
    }

    #[test]
    fn test_add_failure_message() {
        let out = output("Command failed:  DNS_ERROR_RECORD_ALREADY_EXISTS     9711\n", "");
        let result = classifier().report(&out, "Added DNS entry host.example.com => 10.0.0.1", false);
        assert_matches!(result, Err(Error::Administration(msg)) => {
            assert_eq!(msg, "Failed to add DNS entry host.example.com => 10.0.0.1");
        });
    }

    #[test]
    fn test_remove_failure_message() {
        let out = output("Command failed:  DNS_ERROR_NAME_DOES_NOT_EXIST     9714\n", "");
        let result = classifier().report(&out, "Removed DNS entry host.example.com => 10.0.0.1", false);
        assert_matches!(result, Err(Error::Administration(msg)) => {
            assert!(msg.starts_with("Failed to remove"));
        });
    }

    #[test]
    fn test_empty_output_is_failure() {
        let result = classifier().report(&CommandOutput::default(), "Added x", false);
        assert_matches!(result, Err(Error::Administration(_)));
    }

    #[test]
    fn test_oem_code_page_success_line() {
        let markers = OutputMarkers {
            completion: "erfolgreich".into(),
            ..Default::default()
        };
        let out = CommandOutput {
            stdout: b"Befehl erfolgreich ausgef\x81hrt.\r\n".to_vec(),
            stderr: vec![],
        };
        let lines = ResponseClassifier::new(markers)
            .report(&out, "Added DNS entry a.example.com => 10.0.0.1", false)
            .unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Befehl erfolgreich ausgef"));
    }

    #[test]
    fn test_oem_code_page_failure_line() {
        let out = CommandOutput {
            stdout: b"Befehl fehlgeschlagen: Zugriff verweigert \x84\r\n".to_vec(),
            stderr: vec![],
        };
        let result = classifier().report(&out, "Removed DNS entry a.example.com => 10.0.0.1", false);
        assert_matches!(result, Err(Error::Administration(msg)) => {
            assert_eq!(msg, "Failed to remove DNS entry a.example.com => 10.0.0.1");
        });
    }

    #[test]
    fn test_utf16_output_is_unknown_error() {
        let out = CommandOutput {
            stdout: "Command completed successfully."
                .encode_utf16()
                .flat_map(u16::to_le_bytes)
                .collect(),
            stderr: vec![],
        };
        let result = classifier().report(&out, "Added DNS entry a.example.com => 10.0.0.1", false);
        assert_matches!(result, Err(Error::Administration(msg)) => {
            assert_eq!(
                msg,
                "Unknown error while processing 'Added DNS entry a.example.com => 10.0.0.1'"
            );
        });
    }

    #[test]
    fn test_substituted_marker() {
        let markers = OutputMarkers {
            completion: "erfolgreich".into(),
            ..Default::default()
        };
        let out = output("Befehl erfolgreich abgeschlossen.\n", "");
        assert!(ResponseClassifier::new(markers).report(&out, "Added x", false).is_ok());
        let out = output("Command completed successfully.\n", "");
        assert!(ResponseClassifier::new(OutputMarkers {
            completion: "erfolgreich".into(),
            ..Default::default()
        })
        .report(&out, "Added x", false)
        .is_err());
    }

    #[test]
    fn test_failure_message_replaces_first_verb_only() {
        assert_eq!(failure_message("Added Added"), "Failed to add Added");
        assert_eq!(failure_message("enumerate zones"), "Failed to enumerate zones");
    }
}
