pub mod config;
pub mod crypto;
pub mod db;
pub mod models;
pub mod practice;

pub use db::DatabaseError;
pub use practice::{Added, BootstrapAdmin, PracticeDb};

use tracing_subscriber::EnvFilter;

/// Open (creating on first run) the practice database in the data directory.
/// A freshly seeded administrator credential is printed to stdout once.
pub fn run() -> Result<(), DatabaseError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("OpticianDB starting v{}", config::APP_VERSION);

    std::fs::create_dir_all(config::app_data_dir())?;
    let mut practice = PracticeDb::open(&config::database_path())?;

    // Secrets go to the operator's terminal only, never to the log
    if let Some(admin) = practice.take_bootstrap_admin() {
        println!("Created administrator account '{}'.", admin.username);
        println!("Temporary password: {}", admin.password.as_str());
        println!("Change it at first logon.");
    }

    let patients = practice.list_patients()?.len();
    tracing::info!(patients, "Practice database ready");

    practice.close()
}
