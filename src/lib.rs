//! # Autoscript
//!
//! A scripted command engine for the autonomous period of a robot.
//!
//! A plain-text script names the commands to run and their arguments. A
//! [`CommandRegistry`] maps those names to factories, and an [`AutoManager`]
//! steps the running commands once per control tick until the script is done.
//! Changing strategy means editing a text file, not recompiling.
//!
//! ## Quick start
//!
//! ```
//! use autoscript::{AutoManager, CommandRegistry, ManualClock, register_builtins};
//!
//! let mut registry = CommandRegistry::new();
//! register_builtins(&mut registry);
//!
//! let clock = ManualClock::new();
//! let mut manager = AutoManager::new(registry).with_clock(clock.clone());
//! manager.load_script_str("Print,starting\nWait,100\nPrint,done\n").unwrap();
//!
//! let mut ticks = 0;
//! while !manager.process() {
//!     clock.advance(20);
//!     ticks += 1;
//! }
//! assert!(ticks >= 5);
//! ```
//!
//! ## Script syntax
//!
//! One entry per line, `CommandName,arg1,arg2,...`. Names are matched without
//! regard to case, blank lines are skipped, and any of `\r\n`, `\r` or `\n`
//! ends a line. A space after a comma is ignored.
//!
//! | Entry | Description |
//! |-------|-------------|
//! | `Wait,500` | Hold the script for 500 ms |
//! | `Print,some text` | Log a message and move on |
//!
//! Everything else comes from commands you register.
//!
//! ## Execution modes
//!
//! A [`Sequential`](ExecutionMode::Sequential) entry blocks the script until
//! it completes. A [`Background`](ExecutionMode::Background) entry starts as
//! soon as the script reaches it and keeps running while later entries start.
//! [`AutoManager::kill_auto`] completes everything that is still running.
//!
//! ## Implementing a custom command
//!
//! Embed a [`CommandCore`] and implement [`AutoCommand`]. Implement
//! [`FromArgs`] too if the command should be registered by type:
//!
//! ```
//! use autoscript::{AutoCommand, CommandCore, Context, FromArgs};
//! use anyhow::{Result, anyhow};
//!
//! pub struct Drive {
//!     core: CommandCore,
//!     speed: f64,
//! }
//!
//! impl AutoCommand for Drive {
//!     fn name(&self) -> &'static str { Self::NAME }
//!     fn core(&self) -> &CommandCore { &self.core }
//!     fn core_mut(&mut self) -> &mut CommandCore { &mut self.core }
//!
//!     fn execute(&mut self, _ctx: &Context) -> Result<()> {
//!         // Set motor outputs from `self.speed` here.
//!         Ok(())
//!     }
//! }
//!
//! impl FromArgs for Drive {
//!     const NAME: &'static str = "Drive";
//!
//!     fn from_args(args: &[String]) -> Result<Self> {
//!         let [ms, speed] = args else {
//!             return Err(anyhow!("Drive takes a duration and a speed"));
//!         };
//!         Ok(Self {
//!             core: CommandCore::with_timeout(ms.parse()?),
//!             speed: speed.parse()?,
//!         })
//!     }
//! }
//! ```

pub mod clock;
pub mod command;
pub mod commands;
pub mod error;
pub mod logging;
pub mod manager;
pub mod parser;
pub mod registry;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use command::{AutoCommand, CommandCore, Context, FromArgs, Phase};
pub use commands::{Print, Wait, register_builtins};
pub use error::AutoError;
pub use manager::AutoManager;
pub use parser::{ScriptEntry, parse_file, parse_str};
pub use registry::{CommandFactory, CommandRegistry, ExecutionMode, RegisteredCommand};
