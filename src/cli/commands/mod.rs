//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Builds the runtime adapter and core components from the context
//! 3. Runs the batch, then formats and displays output
//!
//! # Async Commands
//!
//! Every container command talks to the runtime bridge, so handlers are
//! synchronous wrappers that build a tokio runtime and `block_on` an
//! async body.

mod completion;
mod inspect;
mod rename;
mod restart;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use inspect::inspect;
pub use rename::rename;
pub use restart::restart;

use anyhow::Result;

use crate::cli::args::Command;
use crate::cli::Context;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Inspect {
            containers,
            mode,
            format,
        } => inspect::inspect(ctx, &containers, &mode, &format),
        Command::Rename {
            container,
            new_name,
        } => rename::rename(ctx, &container, &new_name),
        Command::Restart { containers, time } => restart::restart(ctx, &containers, time),
        Command::Completion { shell } => completion::completion(shell),
    }
}
