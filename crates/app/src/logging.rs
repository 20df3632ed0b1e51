pub const LOG_FILE: &str = "mulberry.log";

/// Logs to `mulberry.log` in the working directory, filtered by `RUST_LOG`.
///
/// Keep the returned guard alive for the life of the program; dropping it
/// flushes and stops the writer. `None` if a subscriber was already installed.
pub fn init() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|()| guard)
}
