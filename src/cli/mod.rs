pub mod commands;
pub mod handlers;

pub use commands::{CliArgs, ModeArg};
pub use handlers::{handle_run, report_failure};
