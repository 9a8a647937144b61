use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::{DisplayMode, Palette, Ticker, TimeRange};

const FILE_NAME: &str = "preferences.json";
const CURRENT_VERSION: u8 = 1;

/// Settings that survive a restart
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub version: u8,
    pub saved_at_unix: i64,
    pub language: Option<String>,
    pub palette: Palette,
    pub has_visited_before: bool,
    pub last_ticker: Option<Ticker>,
    pub display_mode: DisplayMode,
    pub time_range: TimeRange,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            saved_at_unix: 0,
            language: None,
            palette: Palette::default(),
            has_visited_before: false,
            last_ticker: None,
            display_mode: DisplayMode::default(),
            time_range: TimeRange::default(),
        }
    }
}

impl Preferences {
    #[must_use]
    pub fn stamped(mut self) -> Self {
        self.version = CURRENT_VERSION;
        self.saved_at_unix = now_unix();
        self
    }
}

/// `<data dir>/preferences.json`, honouring an explicit directory first
#[must_use]
pub fn default_path(data_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = data_dir {
        return dir.join(FILE_NAME);
    }

    #[cfg(target_os = "macos")]
    let mut path = {
        let mut path = dirs::home_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(std::env::temp_dir);
        path.push("Library/Application Support/Tickerdash");
        path
    };
    #[cfg(target_os = "windows")]
    let mut path = {
        let mut path = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(std::env::temp_dir);
        path.push("Tickerdash");
        path
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut path = {
        let mut path = dirs::data_local_dir()
            .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
            .unwrap_or_else(std::env::temp_dir);
        path.push("tickerdash");
        path
    };

    path.push(FILE_NAME);
    path
}

/// Missing file is `None`; an unreadable one is backed up and also `None`
pub fn load_from(path: &Path) -> Option<Preferences> {
    let bytes = std::fs::read(path).ok()?;
    match serde_json::from_slice::<Preferences>(&bytes) {
        Ok(prefs) => Some(prefs),
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "preferences file is corrupt, backing up and starting fresh"
            );
            backup_corrupted_file(path, &bytes);
            None
        }
    }
}

/// Write through a temp file and rename so a crash never leaves half a file
pub fn save_to(prefs: &Preferences, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let data = serde_json::to_vec_pretty(prefs).map_err(|err| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("failed to serialize preferences: {err}"),
        )
    })?;

    let tmp_path = path.with_extension("json.tmp");
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp_path)?;
    file.write_all(&data)?;
    file.flush()?;
    drop(file);
    std::fs::rename(tmp_path, path)
}

fn backup_corrupted_file(path: &Path, bytes: &[u8]) {
    let backup = path.with_extension(format!("json.corrupt.{}.bak", now_unix()));
    _ = std::fs::write(backup, bytes);
}

fn now_unix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(0))
}
