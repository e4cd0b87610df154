//! Host side of the analyze handler
//!
//! Questions are either handed back to the caller (picker mode) or passed
//! to an external command. The command runs off the UI thread and its
//! outcome comes back as an [`AnalysisEvent`] on a channel. A command that
//! outlives its timeout, or the app, is killed.

use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::timeout;

/// Name passed as `$0` to the analyze command
const SHELL_ARG0: &str = "soru";

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("could not start analyze command: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("analyze command exited with {code}: {stderr}")]
    Exit { code: String, stderr: String },

    #[error("analyze command timed out after {0:?}")]
    Timeout(Duration),
}

/// Where submitted questions go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Hand the question back to the host, which prints it and exits
    Pick,
    /// Run `sh -c <command> soru <question>`
    Command { command: String, timeout: Duration },
}

impl Backend {
    pub fn from_command(command: Option<String>, timeout: Duration) -> Self {
        match command {
            Some(command) if !command.trim().is_empty() => Backend::Command { command, timeout },
            _ => Backend::Pick,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisEvent {
    Finished { question: String, output: String },
    Failed { question: String, error: String },
}

impl AnalysisEvent {
    pub fn question(&self) -> &str {
        match self {
            AnalysisEvent::Finished { question, .. } | AnalysisEvent::Failed { question, .. } => question,
        }
    }
}

/// Run the analyze command for a single question and return its stdout
pub async fn run_command(command: &str, question: &str, limit: Duration) -> Result<String, AnalyzeError> {
    tracing::info!("Running analyze command for: {}", question);

    let child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .arg(SHELL_ARG0)
        .arg(question)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    // On timeout the wait future, and the child with it, is dropped
    let output = match timeout(limit, child.wait_with_output()).await {
        Ok(output) => output?,
        Err(_) => return Err(AnalyzeError::Timeout(limit)),
    };

    if !output.status.success() {
        let code = output
            .status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        return Err(AnalyzeError::Exit {
            code,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
}

/// Start the analyze command in the background. Fire and forget: the
/// outcome is delivered on `events`.
pub fn spawn_analysis(
    command: String,
    question: String,
    limit: Duration,
    events: UnboundedSender<AnalysisEvent>,
) {
    tokio::spawn(async move {
        let event = match run_command(&command, &question, limit).await {
            Ok(output) => AnalysisEvent::Finished { question, output },
            Err(e) => {
                tracing::warn!("Analysis failed: {}", e);
                AnalysisEvent::Failed { question, error: e.to_string() }
            }
        };

        // Receiver gone means the UI already quit
        let _ = events.send(event);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::sync::mpsc;

    #[test]
    fn test_backend_from_command() {
        let limit = Duration::from_secs(5);
        assert_eq!(Backend::from_command(None, limit), Backend::Pick);
        assert_eq!(Backend::from_command(Some("   ".to_string()), limit), Backend::Pick);
        assert_eq!(
            Backend::from_command(Some("cat".to_string()), limit),
            Backend::Command { command: "cat".to_string(), timeout: limit }
        );
    }

    #[tokio::test]
    async fn test_run_command_receives_question() {
        let output = run_command("printf '%s' \"$1\"", "En pahalı 5 ürün nedir?", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(output, "En pahalı 5 ürün nedir?");
    }

    #[tokio::test]
    async fn test_run_command_reports_exit_status() {
        let err = run_command("echo broken >&2; exit 3", "q", Duration::from_secs(5))
            .await
            .unwrap_err();
        match err {
            AnalyzeError::Exit { code, stderr } => {
                assert_eq!(code, "3");
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_run_command_times_out() {
        let err = run_command("sleep 1", "q", Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::Timeout(_)));
    }

    #[test]
    fn test_timed_out_command_does_not_hold_runtime() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let started = Instant::now();
        let result = rt.block_on(run_command("sleep 4", "q", Duration::from_millis(200)));
        assert!(matches!(result, Err(AnalyzeError::Timeout(_))));

        drop(rt);
        assert!(
            started.elapsed() < Duration::from_secs(2),
            "runtime shutdown waited for the timed-out command"
        );
    }

    #[tokio::test]
    async fn test_timed_out_command_is_killed() {
        let marker = std::env::temp_dir().join(format!("soru-killed-{}", std::process::id()));
        let _ = std::fs::remove_file(&marker);

        let command = format!("sleep 1; touch '{}'", marker.display());
        let result = run_command(&command, "q", Duration::from_millis(100)).await;
        assert!(matches!(result, Err(AnalyzeError::Timeout(_))));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists(), "command kept running after its timeout");
    }

    #[tokio::test]
    async fn test_spawn_analysis_sends_event() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_analysis("echo ok".to_string(), "soru".to_string(), Duration::from_secs(5), tx);

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            AnalysisEvent::Finished { question: "soru".to_string(), output: "ok".to_string() }
        );
        assert_eq!(event.question(), "soru");
    }
}
