use std::ffi::OsString;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "ClinicDesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable that points the app at a specific database file.
pub const DATABASE_PATH_ENV: &str = "CLINICDESK_DB";
pub const DATABASE_FILE: &str = "clinic.db";

/// Get the application data directory
/// ~/ClinicDesk/ on all platforms; the working directory if no home is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Database file: `$CLINICDESK_DB` if set, otherwise `~/ClinicDesk/clinic.db`.
pub fn database_path() -> PathBuf {
    resolve_database_path(std::env::var_os(DATABASE_PATH_ENV))
}

fn resolve_database_path(override_path: Option<OsString>) -> PathBuf {
    match override_path {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => app_data_dir().join(DATABASE_FILE),
    }
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "clinicdesk=info,clinicdesk_lib=info"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_named_after_app() {
        let dir = app_data_dir();
        assert!(dir.ends_with("ClinicDesk"));
        if let Some(home) = dirs::home_dir() {
            assert!(dir.starts_with(home));
        }
    }

    #[test]
    fn default_database_under_app_data() {
        let path = resolve_database_path(None);
        assert!(path.starts_with(app_data_dir()));
        assert!(path.ends_with("clinic.db"));
    }

    #[test]
    fn override_path_wins_unless_empty() {
        let custom = resolve_database_path(Some(OsString::from("/tmp/other.db")));
        assert_eq!(custom, PathBuf::from("/tmp/other.db"));

        let blank = resolve_database_path(Some(OsString::new()));
        assert!(blank.ends_with("clinic.db"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.3.0");
    }
}
