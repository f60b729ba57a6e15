//! The [`AutoCommand`] trait, its [`CommandCore`] bookkeeping and the
//! [`Context`] commands receive each tick.

use crate::error::AutoError;
use anyhow::Result;

/// Per-tick execution context passed to command hooks.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    now_ms: u64,
}

impl Context {
    pub fn new(now_ms: u64) -> Self {
        Self { now_ms }
    }

    /// Timestamp of the current tick in monotonic milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

/// Lifecycle of a single command. `Complete` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    NotStarted,
    Running,
    Complete,
}

/// Shared state every command carries: lifecycle phase, arguments and the
/// optional forced-completion timeout.
///
/// Commands embed one of these and expose it through
/// [`AutoCommand::core`] / [`AutoCommand::core_mut`].
#[derive(Debug, Clone, Default)]
pub struct CommandCore {
    phase: Phase,
    arguments: Vec<String>,
    timeout_ms: u64,
    start_ms: u64,
    timed_out: bool,
}

impl CommandCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A core that forces completion `timeout_ms` after start (`0` disables it).
    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn set_timeout_ms(&mut self, timeout_ms: u64) {
        self.timeout_ms = timeout_ms;
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// `NotStarted -> Running`.
    pub fn begin(&mut self, arguments: Vec<String>, now_ms: u64) -> Result<(), AutoError> {
        if self.phase != Phase::NotStarted {
            return Err(AutoError::AlreadyStarted);
        }
        self.arguments = arguments;
        self.start_ms = now_ms;
        self.phase = Phase::Running;
        Ok(())
    }

    /// Whether the timeout has elapsed at `now_ms`. Always false when disabled
    /// or when not running.
    pub fn deadline_passed(&self, now_ms: u64) -> bool {
        self.phase == Phase::Running
            && self.timeout_ms != 0
            && now_ms.saturating_sub(self.start_ms) >= self.timeout_ms
    }

    /// `Running -> Complete`. Returns `true` only for the call that performed
    /// the transition.
    pub fn finish(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.phase = Phase::Complete;
        true
    }

    fn mark_timed_out(&mut self) {
        self.timed_out = true;
    }
}

/// A single executable unit in an autonomous script.
///
/// Implement the required accessors plus whichever hooks the command needs:
///
/// - [`init`](Self::init) runs once, right after the command enters `Running`.
/// - [`execute`](Self::execute) runs once per tick while running. Call
///   [`complete`](Self::complete) from here when the work is done.
/// - [`end`](Self::end) runs once when the command completes for any reason
///   (self-completion, timeout, or a kill).
///
/// The provided lifecycle methods (`start`, `process`, `complete` and the
/// queries) drive the state machine and are not meant to be overridden.
pub trait AutoCommand {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    fn core(&self) -> &CommandCore;

    fn core_mut(&mut self) -> &mut CommandCore;

    fn init(&mut self, _ctx: &Context) -> Result<()> {
        Ok(())
    }

    fn execute(&mut self, _ctx: &Context) -> Result<()> {
        Ok(())
    }

    fn end(&mut self) {}

    /// Record the start time and arguments, then run [`init`](Self::init).
    ///
    /// Fails without side effects if the command was already started.
    fn start(&mut self, arguments: Vec<String>, ctx: &Context) -> Result<()> {
        self.core_mut().begin(arguments, ctx.now_ms())?;
        self.init(ctx)
    }

    /// One tick of work. Forces completion once the timeout has elapsed,
    /// otherwise delegates to [`execute`](Self::execute). Does nothing unless
    /// the command is running.
    fn process(&mut self, ctx: &Context) -> Result<()> {
        if self.core().phase() != Phase::Running {
            return Ok(());
        }
        if self.core().deadline_passed(ctx.now_ms()) {
            self.core_mut().mark_timed_out();
            self.complete();
            return Ok(());
        }
        self.execute(ctx)
    }

    /// Finish the command. Idempotent: only the first call on a running
    /// command transitions it and runs [`end`](Self::end).
    fn complete(&mut self) -> bool {
        if self.core_mut().finish() {
            self.end();
            true
        } else {
            false
        }
    }

    fn has_started(&self) -> bool {
        self.core().phase() != Phase::NotStarted
    }

    fn is_complete(&self) -> bool {
        self.core().phase() == Phase::Complete
    }

    /// Whether completion was forced by the timeout.
    fn has_timed_out(&self) -> bool {
        self.core().timed_out()
    }

    fn set_timeout(&mut self, timeout_ms: u64) {
        self.core_mut().set_timeout_ms(timeout_ms);
    }

    fn timeout(&self) -> u64 {
        self.core().timeout_ms()
    }

    fn arguments(&self) -> &[String] {
        self.core().arguments()
    }
}

/// A command type that can be built straight from script arguments.
///
/// Types implementing this can be registered with
/// [`CommandRegistry::register_type`](crate::registry::CommandRegistry::register_type)
/// under their `NAME`.
pub trait FromArgs: AutoCommand + Sized + 'static {
    /// The script keyword, e.g. `"Wait"`. Matched case-insensitively.
    const NAME: &'static str;

    fn from_args(args: &[String]) -> Result<Self>;

    /// Build and box the command; the shape stored in the registry.
    fn from_args_boxed(_name: &str, args: &[String]) -> Result<Box<dyn AutoCommand>> {
        Ok(Box::new(Self::from_args(args)?))
    }
}
