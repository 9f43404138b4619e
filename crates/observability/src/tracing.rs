//! Tracing/logging initialization.
//!
//! Output is one JSON object per line unless `LOG_FORMAT=pretty`; verbosity
//! comes from `RUST_LOG` and defaults to `info`.

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

/// Log line rendering selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let requested = std::env::var("LOG_FORMAT").ok();
    let format = requested
        .as_deref()
        .and_then(|v| v.parse::<LogFormat>().ok())
        .unwrap_or_default();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    let installed = match format {
        LogFormat::Json => builder.json().with_target(false).try_init().is_ok(),
        LogFormat::Pretty => builder.pretty().try_init().is_ok(),
    };

    if installed {
        if let Some(value) = requested.filter(|v| v.parse::<LogFormat>().is_err()) {
            ::tracing::warn!(%value, "unrecognised LOG_FORMAT; using json");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_log_formats() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(" Pretty ".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert_eq!("text".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn json_is_the_default() {
        assert_eq!(LogFormat::default(), LogFormat::Json);
    }

    #[test]
    fn init_twice_is_a_no_op() {
        init();
        init();
    }
}
