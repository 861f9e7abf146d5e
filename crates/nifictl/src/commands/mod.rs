//! Command dispatch: bridges CLI args -> core services -> output formatting.

pub mod config_cmd;
pub mod groups;
pub mod processors;
pub mod resources;
pub mod util;

use nifictl_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a connected command to its handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Resources(args) => resources::handle(controller, args, global).await,
        Command::Groups(args) => groups::handle(controller, args, global).await,
        Command::Processors(args) => processors::handle(controller, args, global).await,
        // Handled before a connection is made
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
