//! [`AutoManager`] — sequences a loaded script one control tick at a time.

use crate::clock::{Clock, MonotonicClock};
use crate::command::{AutoCommand, Context};
use crate::commands::Wait;
use crate::error::AutoError;
use crate::parser::{ScriptEntry, parse_str, read_script};
use crate::registry::{CommandRegistry, ExecutionMode, RegisteredCommand};
use anyhow::Result;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Receives every diagnostic the manager does not return to its caller.
pub type DiagnosticHandler = Box<dyn Fn(&AutoError)>;

/// Entry name shown for the synthetic step inserted by
/// [`AutoManager::add_start_delay`].
pub const START_DELAY_NAME: &str = "StartDelay";

/// A script entry plus, for synthetic steps, the registration to use instead
/// of a registry lookup.
#[derive(Debug, Clone)]
struct Step {
    entry: ScriptEntry,
    preset: Option<RegisteredCommand>,
}

impl From<ScriptEntry> for Step {
    fn from(entry: ScriptEntry) -> Self {
        Self {
            entry,
            preset: None,
        }
    }
}

struct ActiveCommand {
    name: String,
    command: Box<dyn AutoCommand>,
}

/// Owns a loaded script, a command registry and the commands currently running.
///
/// Call [`process`](Self::process) once per control tick. Sequential entries
/// run one at a time in script order; background entries start as soon as the
/// cursor reaches them and run alongside whatever comes next.
///
/// Nothing here blocks, and nothing a command does can make `process` fail:
/// errors are sent to the diagnostic handler and the offending entry is
/// skipped or completed.
pub struct AutoManager {
    registry: CommandRegistry,
    steps: Vec<Step>,
    cursor: usize,
    foreground: Option<ActiveCommand>,
    background: Vec<ActiveCommand>,
    clock: Box<dyn Clock>,
    diagnostics: DiagnosticHandler,
}

impl AutoManager {
    /// A manager using the system monotonic clock that logs diagnostics with
    /// `tracing`.
    pub fn new(registry: CommandRegistry) -> Self {
        Self {
            registry,
            steps: Vec::new(),
            cursor: 0,
            foreground: None,
            background: Vec::new(),
            clock: Box::new(MonotonicClock::new()),
            diagnostics: Box::new(|err: &AutoError| warn!("{err}")),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_diagnostics(mut self, handler: impl Fn(&AutoError) + 'static) -> Self {
        self.diagnostics = Box::new(handler);
        self
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    /// Register `factory` under every name in `names`, reporting each
    /// conflict to the diagnostic handler. Returns how many names were added.
    pub fn register_command<F>(&mut self, names: &[&str], mode: ExecutionMode, factory: F) -> usize
    where
        F: Fn(&str, &[String]) -> Result<Box<dyn AutoCommand>> + 'static,
    {
        let conflicts = self.registry.register_each(names, mode, factory);
        for conflict in &conflicts {
            self.report(conflict);
        }
        names.len() - conflicts.len()
    }

    /// Load and parse the script at `path`.
    ///
    /// On success the new script replaces the old one, the cursor is reset and
    /// any running commands are completed. On failure nothing changes, so the
    /// last good script stays runnable.
    ///
    /// # Errors
    ///
    /// [`AutoError::ScriptIo`] or [`AutoError::ScriptParse`].
    pub fn load_script(&mut self, path: impl AsRef<Path>) -> Result<usize, AutoError> {
        let path = path.as_ref();
        let text = read_script(path).inspect_err(|err| self.report(err))?;
        let count = self.load_script_str(&text)?;
        info!(path = %path.display(), entries = count, "loaded autonomous script");
        Ok(count)
    }

    /// Same as [`load_script`](Self::load_script) for text already in memory.
    pub fn load_script_str(&mut self, text: &str) -> Result<usize, AutoError> {
        let entries = parse_str(text).inspect_err(|err| self.report(err))?;
        self.stop_active();
        self.steps = entries.into_iter().map(Step::from).collect();
        self.cursor = 0;
        Ok(self.steps.len())
    }

    /// Insert one entry at `pos`. `None` or a position past the end appends.
    pub fn add_command(&mut self, name: &str, arguments: Vec<String>, pos: Option<usize>) {
        self.insert_steps(pos, vec![Step::from(ScriptEntry::new(name, arguments))]);
    }

    /// Insert several entries at `pos`, keeping their order.
    ///
    /// # Errors
    ///
    /// [`AutoError::ArgumentCountMismatch`] if `names` and `arguments` differ in
    /// length; nothing is inserted in that case.
    pub fn add_commands(
        &mut self,
        names: &[&str],
        arguments: Vec<Vec<String>>,
        pos: Option<usize>,
    ) -> Result<(), AutoError> {
        let steps = zip_steps(names, arguments)?;
        self.insert_steps(pos, steps);
        Ok(())
    }

    /// Drop every loaded entry. Running commands and the registry are untouched.
    pub fn clear_commands(&mut self) {
        self.steps.clear();
        self.cursor = 0;
    }

    /// Stop whatever is running and replace the script with `names`/`arguments`.
    ///
    /// # Errors
    ///
    /// [`AutoError::ArgumentCountMismatch`], in which case the current script
    /// keeps running.
    pub fn put_script(&mut self, names: &[&str], arguments: Vec<Vec<String>>) -> Result<(), AutoError> {
        let steps = zip_steps(names, arguments)?;
        self.kill_auto();
        self.steps = steps;
        self.cursor = 0;
        Ok(())
    }

    /// Insert a sequential pause of `ms` milliseconds at the front of the script.
    ///
    /// The pause is a [`Wait`] command and does not need to be registered.
    pub fn add_start_delay(&mut self, ms: u64) {
        if ms == 0 {
            return;
        }
        let preset = RegisteredCommand {
            factory: Rc::new(move |_name: &str, _args: &[String]| -> Result<Box<dyn AutoCommand>> {
                Ok(Box::new(Wait::new(ms)))
            }),
            mode: ExecutionMode::Sequential,
        };
        let step = Step {
            entry: ScriptEntry::new(START_DELAY_NAME, vec![ms.to_string()]),
            preset: Some(preset),
        };
        self.insert_steps(Some(0), vec![step]);
    }

    /// Complete every running command and move the cursor to the end, so the
    /// next [`process`](Self::process) reports the script finished.
    pub fn kill_auto(&mut self) {
        let stopped = self.stop_active();
        self.cursor = self.steps.len();
        if stopped > 0 {
            info!(stopped, "autonomous killed");
        }
    }

    /// Run one tick. Returns `true` once the script is exhausted and nothing
    /// is running.
    pub fn process(&mut self) -> bool {
        let ctx = Context::new(self.clock.now_ms());

        if self.foreground.is_none() {
            self.launch_pending(&ctx);
        }

        if let Some(active) = self.foreground.as_mut() {
            tick(active, &ctx, &self.diagnostics);
        }
        for active in &mut self.background {
            tick(active, &ctx, &self.diagnostics);
        }

        if self
            .foreground
            .as_ref()
            .is_some_and(|active| active.command.is_complete())
        {
            if let Some(done) = self.foreground.take() {
                log_completed(&done);
            }
        }
        self.background.retain(|active| {
            let complete = active.command.is_complete();
            if complete {
                log_completed(active);
            }
            !complete
        });

        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.steps.len() && self.foreground.is_none() && self.background.is_empty()
    }

    /// Number of entries in the loaded script, including added ones.
    pub fn loaded_command_count(&self) -> usize {
        self.steps.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ScriptEntry> {
        self.steps.iter().map(|step| &step.entry)
    }

    /// Index of the next entry to start.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of running commands, foreground and background together.
    pub fn active_count(&self) -> usize {
        usize::from(self.foreground.is_some()) + self.background.len()
    }

    /// Start entries from the cursor until a sequential command holds the
    /// foreground or the script runs out.
    fn launch_pending(&mut self, ctx: &Context) {
        while self.foreground.is_none() && self.cursor < self.steps.len() {
            let index = self.cursor;
            self.cursor += 1;

            let step = &self.steps[index];
            let name = step.entry.name.clone();
            let arguments = step.entry.arguments.clone();
            let registered = match &step.preset {
                Some(preset) => preset.clone(),
                None => match self.registry.lookup(&name) {
                    Ok(registered) => registered.clone(),
                    Err(err) => {
                        self.report(&err);
                        continue;
                    }
                },
            };

            let mut command = match registered.create(&name, &arguments) {
                Ok(command) => command,
                Err(err) => {
                    self.report(&AutoError::CommandCreation {
                        name,
                        reason: format!("{err:#}"),
                    });
                    continue;
                }
            };
            if let Err(err) = command.start(arguments, ctx) {
                command.complete();
                self.report(&AutoError::CommandFailed {
                    name,
                    reason: format!("{err:#}"),
                });
                continue;
            }

            debug!(command = %name, index, mode = ?registered.mode, "command started");
            let active = ActiveCommand { name, command };
            match registered.mode {
                ExecutionMode::Sequential => self.foreground = Some(active),
                ExecutionMode::Background => self.background.push(active),
            }
        }
    }

    fn insert_steps(&mut self, pos: Option<usize>, steps: Vec<Step>) {
        let at = match pos {
            Some(pos) if pos <= self.steps.len() => pos,
            _ => self.steps.len(),
        };
        if at < self.cursor {
            self.cursor += steps.len();
        }
        self.steps.splice(at..at, steps);
    }

    /// Complete and drop every running command. Returns how many there were.
    fn stop_active(&mut self) -> usize {
        let mut stopped = 0;
        for mut active in self.foreground.take().into_iter().chain(self.background.drain(..)) {
            if active.command.complete() {
                debug!(command = %active.name, "command stopped");
            }
            stopped += 1;
        }
        stopped
    }

    fn report(&self, err: &AutoError) {
        (self.diagnostics)(err);
    }
}

fn zip_steps(names: &[&str], arguments: Vec<Vec<String>>) -> Result<Vec<Step>, AutoError> {
    if names.len() != arguments.len() {
        return Err(AutoError::ArgumentCountMismatch {
            names: names.len(),
            arguments: arguments.len(),
        });
    }
    Ok(names
        .iter()
        .zip(arguments)
        .map(|(name, arguments)| Step::from(ScriptEntry::new(*name, arguments)))
        .collect())
}

/// Process one command, completing it if its hook fails.
fn tick(active: &mut ActiveCommand, ctx: &Context, diagnostics: &DiagnosticHandler) {
    if let Err(err) = active.command.process(ctx) {
        active.command.complete();
        diagnostics(&AutoError::CommandFailed {
            name: active.name.clone(),
            reason: format!("{err:#}"),
        });
    }
}

fn log_completed(active: &ActiveCommand) {
    debug!(
        command = %active.name,
        timed_out = active.command.has_timed_out(),
        "command complete"
    );
}
