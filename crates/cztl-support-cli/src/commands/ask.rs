use anyhow::{bail, Result};

use cztl_support::orchestrator::TurnOutcome;

use super::session::build_session;
use crate::prompt::cliclack::CliclackPrompt;
use crate::Cli;

/// Send one message and print whatever the turn appended
pub async fn execute(cli: &Cli, message: &str) -> Result<()> {
    let mut session = build_session(cli, Box::new(CliclackPrompt::new()))?;
    match session.headless_start(message).await? {
        TurnOutcome::Ignored(reason) => bail!("Message was not sent: {:?}", reason),
        TurnOutcome::Failed { error } => bail!("The assistant could not reply: {}", error),
        TurnOutcome::Replied { .. } | TurnOutcome::FellBack { .. } => Ok(()),
    }
}
