//! Interactive collision prompt

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use crate::domain::errors::DomainError;
use crate::domain::model::CollisionPolicy;
use crate::ports::ConflictPromptPort;

const MAX_LISTED: usize = 10;

/// Asks on stderr and reads the answer from stdin.
/// Without a terminal the answer is always `keep-both`.
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

/// `y`/`yes` overwrites, anything else keeps both
pub fn interpret_answer(answer: &str) -> CollisionPolicy {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => CollisionPolicy::Overwrite,
        _ => CollisionPolicy::KeepBoth,
    }
}

#[async_trait]
impl ConflictPromptPort for TerminalPrompt {
    async fn choose_policy(&self, conflicts: &[PathBuf]) -> Result<CollisionPolicy, DomainError> {
        if !io::stdin().is_terminal() {
            info!("No terminal to ask on, keeping both copies");
            return Ok(CollisionPolicy::KeepBoth);
        }

        let conflicts = conflicts.to_vec();
        let answer = tokio::task::spawn_blocking(move || -> io::Result<String> {
            let mut stderr = io::stderr().lock();
            writeln!(stderr, "{} output file(s) already exist:", conflicts.len())?;
            for path in conflicts.iter().take(MAX_LISTED) {
                writeln!(stderr, "  {}", path.display())?;
            }
            if conflicts.len() > MAX_LISTED {
                writeln!(stderr, "  ... and {} more", conflicts.len() - MAX_LISTED)?;
            }
            write!(stderr, "Overwrite them? Otherwise new files get a \" (n)\" suffix. [y/N] ")?;
            stderr.flush()?;

            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok(line)
        })
        .await
        .map_err(|e| DomainError::InternalError(format!("Prompt failed: {}", e)))?
        .map_err(|e| DomainError::BadArgs(format!("Could not read answer: {}", e)))?;

        Ok(interpret_answer(&answer))
    }
}
