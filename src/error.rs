//! The [`AutoError`] type shared by the parser, the registry and the manager.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while loading, registering or running a script.
///
/// Only [`ScriptIo`](AutoError::ScriptIo), [`ScriptParse`](AutoError::ScriptParse)
/// and [`ArgumentCountMismatch`](AutoError::ArgumentCountMismatch) are ever
/// returned to a caller of the manager. The rest are handed to the diagnostic
/// sink and the manager keeps going.
#[derive(Debug, Error)]
pub enum AutoError {
    #[error("Failed to read script file {}: {source}", .path.display())]
    ScriptIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed script line {line}: {reason}")]
    ScriptParse { line: usize, reason: String },

    #[error("Cannot register command \"{name}\": a command is already registered with that name")]
    RegistrationConflict { name: String },

    #[error("Unknown command: \"{name}\" is not registered")]
    UnknownCommand { name: String },

    #[error("Mismatched lists: {names} command names but {arguments} argument lists")]
    ArgumentCountMismatch { names: usize, arguments: usize },

    #[error("Failed to create command \"{name}\": {reason}")]
    CommandCreation { name: String, reason: String },

    #[error("Command \"{name}\" failed: {reason}")]
    CommandFailed { name: String, reason: String },

    #[error("Command has already been started")]
    AlreadyStarted,
}
