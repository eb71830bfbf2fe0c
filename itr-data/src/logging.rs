use std::{
    fmt,
    fs::File,
    io::{self, IsTerminal},
    path::Path,
    sync::Mutex,
};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
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

/// Log-file lines: local timestamp, level, `file:line`, then the fields.
/// Never coloured.
struct FileFormat;

impl<S, N> FormatEvent<S, N> for FileFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        write_prefix(
            &mut writer,
            Local::now(),
            meta.level(),
            meta.file().zip(meta.line()),
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn write_prefix(
    out: &mut impl fmt::Write,
    at: DateTime<Local>,
    level: &Level,
    location: Option<(&str, u32)>,
) -> fmt::Result {
    write!(out, "{} {level:>5} ", at.format("%Y-%m-%dT%H:%M:%S%.3f%:z"))?;
    match location {
        Some((file, line)) => write!(out, "{}:{line} ", crate_relative(file)),
        None => Ok(()),
    }
}

fn crate_relative(file: &str) -> &str {
    file.strip_prefix("src/")
        .or_else(|| file.strip_prefix("src\\"))
        .unwrap_or(file)
}

/// Builds the filter: `RUST_LOG` when set, otherwise `default_directive`.
fn make_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Initializes logging. Call once at startup; later calls are ignored.
///
/// - Stderr: compact and untimed, coloured when attached to a terminal, so
///   stdout stays clean for reports and JSON.
/// - File: appended to when `log_file` is given, timestamped and plain.
/// - Level: `default_directive` (e.g. `"info"`), overridden by `RUST_LOG`.
pub fn init_logging(
    default_directive: &str,
    log_file: Option<&Path>,
) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file '{}'", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(FileFormat)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .without_time()
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let _ = tracing_subscriber::registry()
        .with(make_filter(default_directive))
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    Ok(())
}
