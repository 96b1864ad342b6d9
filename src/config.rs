//! Runtime configuration
//!
//! Everything is read from the environment:
//!
//! - `LARDER_DATABASE_PATH`: SQLite file (default `<project>/data/larder.db`)
//! - `RUST_LOG`: tracing filter, with `larder=info` added on top

use std::path::PathBuf;

use tracing_subscriber::filter::{EnvFilter, ParseError};

pub const DATABASE_PATH_VAR: &str = "LARDER_DATABASE_PATH";

const DEFAULT_LOG_DIRECTIVE: &str = "larder=info";

/// Get the database path from the environment or fall back to the default
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_database_path())
}

/// `data/larder.db` next to the project root (or the executable)
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(project_root) = path.parent().and_then(|target| target.parent()) {
            path = project_root.to_path_buf();
        }
    }

    path.push("data");
    path.push("larder.db");
    path
}

/// Log filter from `RUST_LOG` plus the crate default
pub fn log_filter() -> Result<EnvFilter, ParseError> {
    Ok(EnvFilter::from_default_env().add_directive(DEFAULT_LOG_DIRECTIVE.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_path_file_name() {
        let path = default_database_path();
        assert!(path.ends_with("data/larder.db"));
    }

    #[test]
    fn test_default_log_directive_parses() {
        assert!(log_filter().is_ok());
    }
}
