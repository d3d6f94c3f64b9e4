use cifix::cli::{handle_run, report_failure, CliArgs};
use cifix::config::correlation_id_from_env;
use cifix::orchestrator::{RunError, ValidationError};
use cifix::util::logging;
use cifix::VERSION;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() {
    let correlation_id = correlation_id_from_env();
    logging::init_from_env();

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let err = RunError::Validation(ValidationError::InvalidArguments(e.to_string()));
            std::process::exit(report_failure(&err, &correlation_id));
        }
    };

    debug!(correlation_id = %correlation_id, "cifix v{} starting", VERSION);
    debug!(correlation_id = %correlation_id, "Arguments: {:?}", args);

    std::process::exit(handle_run(args, &correlation_id).await);
}
