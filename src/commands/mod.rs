//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Provides implementations for all CLI commands.
//! Each command is in its own submodule for maintainability.

pub mod init;
pub mod run;
pub mod status;

pub use init::{execute_init, InitOptions};
pub use run::{execute_run, RunCommandOptions};
pub use status::{execute_status, StatusOptions};
