//! Tracing subscriber setup for applications embedding the engine.

use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use crate::state::EngineSettings;

/// Timestamp formatter producing `YYYY-MM-DD HH:MM:SS` in local time.
struct TrayTimer;

impl tracing_subscriber::fmt::time::FormatTime for TrayTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        let now = chrono::Local::now();
        write!(w, "{}", now.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Keeps the non-blocking writer flushing for the life of the process.
static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// What: Build the env filter, letting `RUST_LOG` override the configured level.
fn env_filter(settings: &EngineSettings) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level))
}

/// What: Install the global tracing subscriber.
///
/// Inputs:
/// - `settings`: Supplies the default level.
/// - `log_dir`: Directory for `invoice-tray.log`; `None` logs to stderr.
///
/// Output:
/// - `true` when this call installed the subscriber, `false` if one was already set.
///
/// Details:
/// - Falls back to stderr when the log file cannot be opened.
pub fn init(settings: &EngineSettings, log_dir: Option<&Path>) -> bool {
    let file = log_dir.and_then(|dir| {
        let path = dir.join("invoice-tray.log");
        std::fs::create_dir_all(dir)
            .and_then(|()| {
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
            })
            .map_err(|e| eprintln!("invoice-tray: cannot open {}: {e}", path.display()))
            .ok()
            .map(|f| (f, path))
    });
    match file {
        Some((file, path)) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let installed = tracing_subscriber::fmt()
                .with_env_filter(env_filter(settings))
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_timer(TrayTimer)
                .try_init()
                .is_ok();
            if installed {
                let _ = LOG_GUARD.set(guard);
                tracing::info!(path = %path.display(), "logging initialized");
            }
            installed
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(env_filter(settings))
            .with_target(false)
            .with_ansi(true)
            .with_writer(std::io::stderr)
            .with_timer(TrayTimer)
            .try_init()
            .is_ok(),
    }
}

/// Install the subscriber writing into the default `logs` directory under the config home.
pub fn init_default(settings: &EngineSettings) -> bool {
    init(settings, crate::state::settings::logs_dir().as_deref())
}
