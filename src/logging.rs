use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::stderr_buffer::BufferedStderr;

/// Environment variable consulted after `RUST_LOG`.
pub const LOG_ENV_VAR: &str = "NIRF_RERANK_LOG";

/// Default filter directive for the given verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "nirf_rerank=debug"
    } else {
        "nirf_rerank=warn"
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins, then `NIRF_RERANK_LOG`, then the `--verbose` default.
/// Output goes through [`BufferedStderr`] so the TUI can hold it back.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env(LOG_ENV_VAR))
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(BufferedStderr)
                .with_ansi(false),
        )
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(true), "nirf_rerank=debug");
        assert_eq!(default_directive(false), "nirf_rerank=warn");
    }
}
