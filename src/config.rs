use std::path::PathBuf;

use crate::models::enums::HashMethod;

/// Application-level constants
pub const APP_NAME: &str = "OpticianDB";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "OpticianDB.db3";

/// Account created on a fresh database
pub const BOOTSTRAP_USERNAME: &str = "admin";
pub const BOOTSTRAP_FULL_NAME: &str = "Default Administrator";

/// Hash method for every password written from now on. Stored hashes carry
/// their own method tag, so older rows keep verifying.
pub const DEFAULT_HASH_METHOD: HashMethod = HashMethod::Pbkdf2Sha256;

/// Get the application data directory
/// Platform data dir (falls back to home, then cwd) joined with `OpticianDB`
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the practice database path
pub fn database_path() -> PathBuf {
    app_data_dir().join(DATABASE_FILE)
}

/// Log filter used when `RUST_LOG` is unset
pub fn default_log_filter() -> &'static str {
    "opticiandb_lib=info,opticiandb=info,warn"
}
