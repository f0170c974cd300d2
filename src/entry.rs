use clap::{CommandFactory, FromArgMatches};
use tracing::{error, info, warn};

use crate::app::{export_summary_json, print_summary, run_load};
use crate::args::LoadArgs;
use crate::error::AppResult;
use crate::shutdown::{setup_signal_shutdown_handler, shutdown_channel};

/// Parse arguments, merge the config file, and run the load test.
///
/// # Errors
///
/// Returns an error for invalid arguments or configuration, or when the
/// summary cannot be written. A run whose requests all failed still
/// returns `Ok`.
pub fn run() -> AppResult<()> {
    let matches = LoadArgs::command().get_matches();
    let mut args = LoadArgs::from_arg_matches(&matches)?;

    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(&mut args, &matches, &config)?;
    }

    crate::logger::init_logging(args.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args))
}

async fn run_async(args: LoadArgs) -> AppResult<()> {
    let (shutdown_tx, _) = shutdown_channel();
    let signals = setup_signal_shutdown_handler(&shutdown_tx);

    let outcome = run_load(&args, &shutdown_tx).await;

    drop(shutdown_tx.send(()));
    if let Err(err) = signals.await {
        warn!("Signal handler task failed: {}", err);
    }

    let summary = match outcome {
        Ok(summary) => summary,
        Err(err) => {
            if err.is_configuration() {
                error!("Refusing to start: {}", err);
            } else {
                error!("{}", err);
            }
            return Err(err);
        }
    };

    print_summary(&summary, args.output_format)?;
    if let Some(path) = args.summary_json.as_deref() {
        export_summary_json(path, &summary).await?;
        info!(path = %path.display(), "Summary written.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::Parser;

    use super::*;
    use crate::error::AppError;

    const SETUP_ERROR_DEADLINE: Duration = Duration::from_secs(5);

    #[test]
    fn configuration_errors_end_the_run_promptly() -> Result<(), String> {
        let args = LoadArgs::try_parse_from(["loadstage", "--port", "not-a-port", "-s", "1s:1"])
            .map_err(|err| format!("parse failed: {}", err))?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| format!("Failed to build runtime: {}", err))?;

        let outcome = runtime
            .block_on(async { tokio::time::timeout(SETUP_ERROR_DEADLINE, run_async(args)).await })
            .map_err(|err| format!("run_async did not return: {}", err))?;
        match outcome {
            Err(AppError::Config(_)) => Ok(()),
            Err(other) => Err(format!("Expected a configuration error, got {}", other)),
            Ok(()) => Err("Expected the run to be refused".to_owned()),
        }
    }
}
