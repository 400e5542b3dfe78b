use dialoguer::{Confirm, Input, Password};

use crate::config::Config;
use crate::models::{Credentials, RunParams};

/// Applied to every interface when the operator leaves the description empty
pub const DEFAULT_DESCRIPTION: &str = "Provisioned by LoopForge";
/// Fallback when the loopback count input is invalid or out of range
pub const DEFAULT_LOOPBACK_COUNT: u8 = 20;

/// Yes/no questions asked during a device orchestration. The interactive
/// implementation blocks on the terminal; tests script the answers.
pub trait Prompt {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Terminal-backed prompt. An unanswerable prompt counts as a decline.
pub struct ConsolePrompt;

impl Prompt for ConsolePrompt {
    fn confirm(&mut self, message: &str) -> bool {
        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

pub fn prompt_credentials() -> anyhow::Result<Credentials> {
    let username: String = Input::new().with_prompt("Username").interact_text()?;
    let password = Password::new().with_prompt("Password").interact()?;
    Ok(Credentials { username, password })
}

/// Ask for the run parameters; count and description fall back to defaults
pub fn prompt_run_params(cfg: &Config) -> anyhow::Result<RunParams> {
    let print_responses = Confirm::new()
        .with_prompt("Print NETCONF responses?")
        .default(false)
        .interact()?;

    let raw_count: String = Input::new()
        .with_prompt("Loopback interfaces to create per device (1-255)")
        .allow_empty(true)
        .interact_text()?;
    let count = parse_loopback_count(&raw_count);

    let raw_description: String = Input::new()
        .with_prompt("Interface description (empty for default)")
        .allow_empty(true)
        .interact_text()?;
    let description = resolve_description(&raw_description);

    Ok(RunParams {
        count,
        description,
        print_responses,
        port: cfg.port,
        timeout_secs: cfg.timeout_secs,
    })
}

/// Clamp a raw loopback count to 1..=255; anything else becomes the default
/// with a warning. Bad input never propagates as an error.
pub fn parse_loopback_count(raw: &str) -> u8 {
    match raw.trim().parse::<u16>() {
        Ok(n) if (1..=255).contains(&n) => n as u8,
        Ok(n) => {
            tracing::warn!(
                "Loopback count {} must be between 1 and 255, using default {}",
                n,
                DEFAULT_LOOPBACK_COUNT
            );
            DEFAULT_LOOPBACK_COUNT
        }
        Err(_) => {
            tracing::warn!(
                "Invalid loopback count '{}', using default {}",
                raw.trim(),
                DEFAULT_LOOPBACK_COUNT
            );
            DEFAULT_LOOPBACK_COUNT
        }
    }
}

/// Empty description input substitutes the fixed default, identically for
/// every interface on every device
pub fn resolve_description(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_DESCRIPTION.to_string()
    } else {
        trimmed.to_string()
    }
}
