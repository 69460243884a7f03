use std::{
    fs::File,
    io::{self, IsTerminal},
    path::Path,
    sync::Mutex,
};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

// --- Formatter ---

/// `HH:MM:SS.mmm LEVEL target: fields`, with local time and a colored level.
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        write!(writer, "{} ", Local::now().format("%H:%M:%S%.3f"))?;

        if writer.has_ansi_escapes() {
            write!(writer, "{}{:>5}\x1b[0m ", level_color(meta.level()), meta.level())?;
        } else {
            write!(writer, "{:>5} ", meta.level())?;
        }
        write!(writer, "{}: ", meta.target())?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "\x1b[31m",
        Level::WARN => "\x1b[33m",
        Level::INFO => "\x1b[32m",
        Level::DEBUG | Level::TRACE => "\x1b[2m",
    }
}

// --- Public API ---

/// Builds the level filter.
///
/// An explicit `override_level` wins, then `RUST_LOG`, then `configured_level`.
/// Accepts a bare level ("error", "warn", "info", "debug", "trace") or any
/// full EnvFilter directive.
pub fn make_filter(
    override_level: Option<&str>,
    configured_level: &str,
) -> Result<EnvFilter> {
    if let Some(level) = override_level {
        return EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"));
    }
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(configured_level)
            .with_context(|| format!("invalid log level '{configured_level}'")),
    }
}

/// Initializes logging. Call once at startup.
///
/// - Stderr: colored when attached to a terminal, plain when piped. Reports go
///   to stdout, so logs never interleave with them.
/// - File: appended to when `log_file` is given. The directory must already exist.
pub fn init_logging(
    filter: EnvFilter,
    log_file: Option<&Path>,
) -> Result<()> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file_layer = match log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file '{}'", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(LocalFmt)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialized")
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::filter::LevelFilter;

    use super::*;

    #[test]
    fn level_color_dims_verbose_levels() {
        assert_eq!(level_color(&Level::WARN), "\x1b[33m");
        assert_eq!(level_color(&Level::DEBUG), level_color(&Level::TRACE));
    }

    #[test]
    fn make_filter_prefers_explicit_level() {
        let filter = make_filter(Some("debug"), "info").unwrap();

        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn make_filter_rejects_invalid_directive() {
        assert!(make_filter(Some("scholarship_core=loud"), "info").is_err());
    }
}
