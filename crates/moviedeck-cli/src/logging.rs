//! Tracing subscriber setup.
//!
//! Logs go to stdout for the one-shot commands. The browser owns the
//! terminal, so there they go to `--log-file` or nowhere.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Picks the log sink. Returns the writer and whether ANSI colors apply.
fn make_writer(log_file: Option<&Path>, interactive: bool) -> Result<(BoxMakeWriter, bool)> {
    if let Some(path) = log_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        return Ok((BoxMakeWriter::new(Mutex::new(file)), false));
    }
    if interactive {
        return Ok((BoxMakeWriter::new(io::sink), false));
    }
    Ok((BoxMakeWriter::new(io::stdout), true))
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` overrides the default `info` filter. With the `otel` feature,
/// spans are also exported over OTLP when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a subscriber is
/// already installed.
pub fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let (writer, ansi) = make_writer(log_file, interactive)?;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer);

    #[cfg(not(feature = "otel"))]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .context("failed to install tracing subscriber")?;
    }

    #[cfg(feature = "otel")]
    {
        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .try_init()
            .context("failed to install tracing subscriber")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_log_file_is_created() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("moviedeck.log");

        // Act
        let (_, ansi) = make_writer(Some(&path), true).unwrap();

        // Assert
        assert!(path.exists());
        assert!(!ansi);
    }

    #[test]
    fn test_interactive_without_file_disables_colors() {
        // Arrange & Act
        let (_, ansi) = make_writer(None, true).unwrap();

        // Assert
        assert!(!ansi);
    }

    #[test]
    fn test_unwritable_log_file_is_an_error() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();

        // Act: a directory cannot be opened as a log file
        let result = make_writer(Some(dir.path()), false);

        // Assert
        assert!(result.is_err());
    }
}
