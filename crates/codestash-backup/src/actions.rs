//! Post-backup actions.
//!
//! Each action is a shell command template run after a successful backup.
//! `{backup_file}`, `{date}`, and `{time}` are substituted before execution.
//! Failures are logged and reported per action but never abort anything:
//! the backup already exists.

use std::path::Path;
use std::process::Command;
use tracing::{error, info};

/// Result of one post-backup action.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    /// The command after template substitution
    pub command: String,

    /// Whether the command exited successfully
    pub success: bool,
}

/// Runs every action template in order, returning one outcome per action.
pub fn run_post_actions(templates: &[String], backup_file: &Path) -> Vec<ActionOutcome> {
    templates
        .iter()
        .map(|template| {
            let command = render_template(template, backup_file);
            let success = run_shell(&command);
            ActionOutcome { command, success }
        })
        .collect()
}

/// Substitutes the `{backup_file}`, `{date}`, and `{time}` placeholders.
fn render_template(template: &str, backup_file: &Path) -> String {
    let now = chrono::Local::now();
    template
        .replace("{backup_file}", &backup_file.display().to_string())
        .replace("{date}", &now.format("%Y-%m-%d").to_string())
        .replace("{time}", &now.format("%H-%M-%S").to_string())
}

fn run_shell(command: &str) -> bool {
    info!("Executing post-backup action: {}", command);

    #[cfg(unix)]
    let result = Command::new("sh").arg("-c").arg(command).output();

    #[cfg(windows)]
    let result = Command::new("cmd").arg("/C").arg(command).output();

    match result {
        Ok(output) if output.status.success() => {
            info!("Post-backup action completed");
            true
        }
        Ok(output) => {
            error!(
                "Post-backup action failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            false
        }
        Err(e) => {
            error!("Failed to run post-backup action: {}", e);
            false
        }
    }
}
