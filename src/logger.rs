use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Environment variable read before `RUST_LOG`.
const LOG_ENV: &str = "LOADSTAGE_LOG";

fn filter_directive(verbose: bool) -> String {
    std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_level(verbose).to_owned())
}

const fn default_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Install the global subscriber. Logs go to stderr; stdout carries only
/// the run summary.
pub fn init_logging(verbose: bool) {
    let directive = filter_directive(verbose);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(false);
        init_logging(true);
    }

    #[test]
    fn verbose_raises_the_default_level() -> Result<(), String> {
        if default_level(false) != "info" || default_level(true) != "debug" {
            return Err("Unexpected default levels".to_owned());
        }
        Ok(())
    }
}
