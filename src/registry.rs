//! Name-to-factory mapping used to turn script entries into commands.

use crate::command::{AutoCommand, FromArgs};
use crate::error::AutoError;
use anyhow::Result;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Builds a command from its script name and arguments.
pub type CommandFactory = Rc<dyn Fn(&str, &[String]) -> Result<Box<dyn AutoCommand>>>;

/// How an entry interacts with the script cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Blocks the cursor until it completes.
    Sequential,
    /// Runs alongside the current sequential command without blocking.
    Background,
}

/// A factory together with its execution mode.
#[derive(Clone)]
pub struct RegisteredCommand {
    pub factory: CommandFactory,
    pub mode: ExecutionMode,
}

impl RegisteredCommand {
    /// Run the factory for `name` with `args`.
    pub fn create(&self, name: &str, args: &[String]) -> Result<Box<dyn AutoCommand>> {
        (self.factory)(name, args)
    }
}

impl fmt::Debug for RegisteredCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredCommand")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Case-insensitive registry of script commands.
///
/// The first registration of a name wins; later ones are rejected with
/// [`AutoError::RegistrationConflict`].
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, RegisteredCommand>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `name`.
    pub fn register<F>(&mut self, name: &str, mode: ExecutionMode, factory: F) -> Result<(), AutoError>
    where
        F: Fn(&str, &[String]) -> Result<Box<dyn AutoCommand>> + 'static,
    {
        self.insert(name, RegisteredCommand {
            factory: Rc::new(factory),
            mode,
        })
    }

    /// Register one factory under several names. Each name is tried
    /// independently; the returned list holds one conflict per rejected name.
    pub fn register_each<F>(&mut self, names: &[&str], mode: ExecutionMode, factory: F) -> Vec<AutoError>
    where
        F: Fn(&str, &[String]) -> Result<Box<dyn AutoCommand>> + 'static,
    {
        let registered = RegisteredCommand {
            factory: Rc::new(factory),
            mode,
        };
        names
            .iter()
            .filter_map(|name| self.insert(name, registered.clone()).err())
            .collect()
    }

    /// Register a [`FromArgs`] command under its `NAME`.
    pub fn register_type<T: FromArgs>(&mut self, mode: ExecutionMode) -> Result<(), AutoError> {
        self.register(T::NAME, mode, T::from_args_boxed)
    }

    fn insert(&mut self, name: &str, registered: RegisteredCommand) -> Result<(), AutoError> {
        let key = name.to_lowercase();
        if self.commands.contains_key(&key) {
            return Err(AutoError::RegistrationConflict { name: key });
        }
        self.commands.insert(key, registered);
        Ok(())
    }

    pub fn unregister_all(&mut self) {
        self.commands.clear();
    }

    /// Find the registration for `name`, ignoring case.
    pub fn lookup(&self, name: &str) -> Result<&RegisteredCommand, AutoError> {
        self.commands
            .get(&name.to_lowercase())
            .ok_or_else(|| AutoError::UnknownCommand {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
