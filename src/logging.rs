use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialise logging. The default level is `info`; `debug` level can be
/// enabled via the settings file, in which case `RUST_LOG` may override it.
/// When `log_file` is set, output is appended to that file instead of stderr.
pub fn init(debug: bool, log_file: Option<&Path>) {
    // With debug logging disabled `RUST_LOG` is ignored so a stray variable in
    // the user's environment cannot make the tool verbose.
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let file = log_file.and_then(|p| {
        let name = p.file_name()?;
        let dir = p.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
        Some(tracing_appender::rolling::never(dir, name))
    });
    let _ = match file {
        Some(appender) => builder.with_ansi(false).with_writer(appender).try_init(),
        None => builder.try_init(),
    };
}
