pub mod config;
pub mod db;
pub mod models;
pub mod summary;
pub mod validation;

use tracing_subscriber::EnvFilter;

use crate::db::DatabaseError;

/// Install the global tracing subscriber. A second call is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Open (creating if needed) the clinic database and print today's
/// dashboard counts as JSON.
pub fn run() -> Result<(), DatabaseError> {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let path = config::database_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = db::open_database(&path)?;

    let today = chrono::Local::now().date_naive();
    let stats = summary::fetch_dashboard_stats(&conn, &today)?;
    tracing::info!(
        patients = stats.total_patients,
        doctors = stats.total_doctors,
        appointments_today = stats.appointments_today,
        pending_followups = stats.pending_followups,
        "Dashboard loaded"
    );

    match serde_json::to_string_pretty(&stats) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::warn!(error = %e, "Failed to render dashboard stats"),
    }
    Ok(())
}
