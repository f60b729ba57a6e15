mod print;
mod wait;

pub use print::Print;
pub use wait::Wait;

use crate::command::FromArgs;
use crate::error::AutoError;
use crate::registry::{CommandRegistry, ExecutionMode};

/// Register every built-in command as [`ExecutionMode::Sequential`].
///
/// Returns the conflicts for names that were already taken.
pub fn register_builtins(registry: &mut CommandRegistry) -> Vec<AutoError> {
    [
        registry.register_type::<Wait>(ExecutionMode::Sequential),
        registry.register_type::<Print>(ExecutionMode::Sequential),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect()
}
