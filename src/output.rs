// ABOUTME: Console output for pipeline progress and results.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

/// Sink for operator-facing progress. Never fails the pipeline.
pub trait Console: Send + Sync {
    /// A human-readable progress line.
    fn comment(&self, text: &str);

    /// A structured record, such as a deployment as reported by the service.
    fn log(&self, value: &serde_json::Value);
}

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet mode).
    pub fn progress(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => println!("{message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => emit_stdout(&JsonEvent::message("progress", message, None)),
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                // Print only the essential result
                println!("{message}");
            }
            OutputMode::Json => {
                emit_stdout(&JsonEvent::message("success", message, self.duration()))
            }
        }
    }

    /// Print a non-fatal warning.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => emit_stderr(&JsonEvent::message("warning", message, None)),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                emit_stderr(&JsonEvent::message("error", message, self.duration()))
            }
        }
    }
}

impl Console for Output {
    fn comment(&self, text: &str) {
        self.progress(text);
    }

    fn log(&self, value: &serde_json::Value) {
        match self.mode {
            OutputMode::Json => emit_stdout(&JsonEvent {
                event: "log",
                message: None,
                data: Some(value),
                duration_secs: None,
            }),
            OutputMode::Normal | OutputMode::Quiet => tracing::debug!(record = %value, "log"),
        }
    }
}

fn emit_stdout(event: &JsonEvent<'_>) {
    if let Ok(json) = serde_json::to_string(event) {
        println!("{json}");
    }
}

fn emit_stderr(event: &JsonEvent<'_>) {
    if let Ok(json) = serde_json::to_string(event) {
        eprintln!("{json}");
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

impl<'a> JsonEvent<'a> {
    fn message(event: &'a str, message: &'a str, duration_secs: Option<f64>) -> Self {
        Self {
            event,
            message: Some(message),
            data: None,
            duration_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_event_omits_empty_fields() {
        let event = JsonEvent::message("progress", "Status: Queued", None);
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"event":"progress","message":"Status: Queued"}"#
        );
    }

    #[test]
    fn log_event_carries_data() {
        let data = serde_json::json!({"deploymentId": "d-1"});
        let event = JsonEvent {
            event: "log",
            message: None,
            data: Some(&data),
            duration_secs: None,
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"event":"log","data":{"deploymentId":"d-1"}}"#
        );
    }
}
