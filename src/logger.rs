use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const LOG_PREFIX: &str = "tickerdash";
pub const ENV_LOG: &str = "TICKERDASH_LOG";
const DEFAULT_FILTER: &str = "error,tickerdash=debug";

static ACTIVE_LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

pub fn default_log_dir(data_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = data_dir {
        return dir.join("logs");
    }

    #[cfg(target_os = "macos")]
    {
        dirs::home_dir().map_or_else(fallback_log_dir, |home| {
            home.join("Library/Logs/Tickerdash")
        })
    }
    #[cfg(target_os = "windows")]
    {
        dirs::data_local_dir().map_or_else(fallback_log_dir, |dir| {
            dir.join("Tickerdash\\Logs")
        })
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        dirs::data_local_dir()
            .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
            .map_or_else(fallback_log_dir, |dir| dir.join("tickerdash/logs"))
    }
}

fn fallback_log_dir() -> PathBuf {
    std::env::temp_dir().join(LOG_PREFIX).join("logs")
}

/// Directory actually written to, once `init` has run
#[must_use]
pub fn active_log_dir() -> PathBuf {
    ACTIVE_LOG_DIR
        .get()
        .cloned()
        .unwrap_or_else(|| default_log_dir(None))
}

pub fn local_offset() -> time::UtcOffset {
    time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC)
}

/// Calendar date in the local timezone
pub fn today() -> time::Date {
    time::OffsetDateTime::now_utc().to_offset(local_offset()).date()
}

/// Install the file subscriber; keep the returned guard alive until exit
pub fn init(data_dir: Option<&Path>) -> anyhow::Result<impl Any> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let primary = default_log_dir(data_dir);
    let log_dir = if std::fs::create_dir_all(&primary).is_ok() {
        primary
    } else {
        let fallback = fallback_log_dir();
        std::fs::create_dir_all(&fallback)?;
        fallback
    };

    _ = ACTIVE_LOG_DIR.set(log_dir.clone());

    let writer = RollingFileAppender::builder()
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .max_log_files(5)
        .rotation(Rotation::DAILY)
        .build(&log_dir)
        .map_err(|err| anyhow::anyhow!("cannot log to {}: {err}", log_dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(writer);

    let timer = fmt::time::OffsetTime::new(
        local_offset(),
        time::format_description::well_known::Rfc3339,
    );
    let file_line = cfg!(debug_assertions);

    let layer = fmt::layer()
        .with_ansi(false)
        .with_timer(timer)
        .with_thread_ids(true)
        .with_file(file_line)
        .with_line_number(file_line)
        .with_writer(writer);

    let filter = std::env::var(ENV_LOG).unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let layer = layer.with_filter(tracing_subscriber::EnvFilter::new(filter));

    tracing_subscriber::registry().with(layer).try_init()?;
    Ok(guard)
}
