//! [`Print`] command — writes a message to the log and finishes at once.
//!
//! Script syntax: `Print,Starting left-side auto`

use crate::command::{AutoCommand, CommandCore, Context, FromArgs};
use anyhow::Result;

/// Logs its arguments, joined by `", "`, and completes during `start`.
///
/// Useful for marking progress through a script in the driver-station log.
pub struct Print {
    core: CommandCore,
    pub message: String,
}

impl Print {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            core: CommandCore::new(),
            message: message.into(),
        }
    }
}

impl AutoCommand for Print {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn core(&self) -> &CommandCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CommandCore {
        &mut self.core
    }

    fn init(&mut self, _ctx: &Context) -> Result<()> {
        tracing::info!(target: "autoscript::print", "{}", self.message);
        self.complete();
        Ok(())
    }
}

impl FromArgs for Print {
    const NAME: &'static str = "Print";

    fn from_args(args: &[String]) -> Result<Self> {
        Ok(Self::new(args.join(", ")))
    }
}
