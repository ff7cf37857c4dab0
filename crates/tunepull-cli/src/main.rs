mod cli;

use crate::cli::CliCommand;

fn main() {
    // Errors are reported through the log; the exit status stays 0 so
    // scheduled runs do not flag a partially failed batch.
    if let Err(err) = CliCommand::run_from_args() {
        tracing::error!("tunepull error: {:#}", err);
    }
}
