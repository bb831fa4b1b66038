use configuration::{LogFormat, LoggingSettings};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global subscriber: stdout always, plus a daily rolling file
/// when a log directory is configured.
///
/// `RUST_LOG` wins over the configured level. The returned guard flushes the
/// file writer and must live until the program exits.
pub fn init_tracing(settings: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))?;

    let (file_layer, guard) = match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, &settings.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let compact = settings.format == LogFormat::Compact;
    tracing_subscriber::registry()
        .with(filter)
        .with((!compact).then(|| fmt::layer()))
        .with(compact.then(|| fmt::layer().compact()))
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
