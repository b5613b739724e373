//! Process-wide `tracing` subscriber setup.

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::{Error, Result};

/// Install the global subscriber described by `config`.
///
/// JSON output is meant for container deployments; the compact format is
/// for interactive use. Calling this more than once returns an error from
/// the second call and leaves the first subscriber in place.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_new(config.filter_directives())
        .map_err(|e| Error::Logging(format!("invalid filter: {}", e)))?;

    let result = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .try_init()
    };

    result.map_err(|e| Error::Logging(e.to_string()))?;

    info!(
        filter = config.filter_directives(),
        json = config.json,
        "Logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_is_rejected() {
        let config = LogConfig {
            json: false,
            filter: Some("lorabridge=notalevel".to_string()),
        };
        assert!(matches!(init_logging(&config), Err(Error::Logging(_))));
    }

    // only test in this binary that installs a subscriber
    #[test]
    fn test_install_once() {
        let config = LogConfig {
            json: true,
            filter: Some("lorabridge=debug".to_string()),
        };
        assert!(init_logging(&config).is_ok());
        assert!(matches!(init_logging(&config), Err(Error::Logging(_))));
    }
}
