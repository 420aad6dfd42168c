use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::app_dirs::AppDirs;

/// Environment variable holding the log filter, e.g. `TYPING_JAIL_LOG=debug`.
pub const LOG_ENV: &str = "TYPING_JAIL_LOG";

/// Install a file-backed subscriber when [`LOG_ENV`] is set.
///
/// The terminal belongs to the UI, so nothing is ever logged to stdout or
/// stderr. Any failure here just leaves logging off.
pub fn init() {
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
        return;
    };
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    let _ = init_at(&path, filter);
}

fn init_at(path: &Path, filter: EnvFilter) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    // Writes happen inline on the UI thread; there is no background writer.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}
