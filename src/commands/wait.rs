//! [`Wait`] command — holds the script for a fixed number of milliseconds.
//!
//! Script syntax: `Wait,500`

use crate::command::{AutoCommand, CommandCore, FromArgs};
use anyhow::{Context as _, Result, anyhow};

/// Does nothing until its timeout forces completion.
///
/// Also used by [`AutoManager::add_start_delay`](crate::AutoManager::add_start_delay).
pub struct Wait {
    core: CommandCore,
}

impl Wait {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            core: CommandCore::with_timeout(duration_ms),
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.core.timeout_ms()
    }
}

impl AutoCommand for Wait {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn core(&self) -> &CommandCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CommandCore {
        &mut self.core
    }
}

impl FromArgs for Wait {
    const NAME: &'static str = "Wait";

    fn from_args(args: &[String]) -> Result<Self> {
        let raw = args
            .first()
            .ok_or_else(|| anyhow!("Wait needs a duration in milliseconds"))?;
        let ms: u64 = raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid milliseconds value: {raw}"))?;
        if ms == 0 {
            return Err(anyhow!("Wait duration must be greater than zero"));
        }
        Ok(Self::new(ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Context;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_from_args() {
        assert_eq!(Wait::from_args(&args(&["500"])).unwrap().duration_ms(), 500);
        assert_eq!(Wait::from_args(&args(&[" 20 "])).unwrap().duration_ms(), 20);
    }

    #[test]
    fn test_from_args_invalid() {
        assert!(Wait::from_args(&[]).is_err());
        assert!(Wait::from_args(&args(&["soon"])).is_err());
        assert!(Wait::from_args(&args(&["0"])).is_err());
        assert!(Wait::from_args(&args(&["-5"])).is_err());
    }

    #[test]
    fn test_completes_only_on_timeout() {
        let mut wait = Wait::new(100);
        wait.start(Vec::new(), &Context::new(0)).unwrap();
        wait.process(&Context::new(99)).unwrap();
        assert!(!wait.is_complete());
        wait.process(&Context::new(100)).unwrap();
        assert!(wait.is_complete());
        assert!(wait.has_timed_out());
    }
}
