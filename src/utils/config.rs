// src/utils/config.rs
use std::path::PathBuf;

pub const RESULTS_DIR_ENV: &str = "RESULTS_DIR";
pub const RESET_PER_PAGE_ENV: &str = "RESET_SCAN_PER_PAGE";
pub const DEFAULT_RESULTS_DIR: &str = "./results";

/// Runtime settings shared by both subcommands, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub reset_per_page: bool,
}

impl Settings {
    /// Command-line values win, then the environment, then defaults.
    pub fn resolve(output_dir: Option<String>, reset_per_page: bool) -> Self {
        let env_dir = std::env::var(RESULTS_DIR_ENV).ok();
        let env_reset = std::env::var(RESET_PER_PAGE_ENV).ok();
        Self::from_sources(output_dir, env_dir, reset_per_page, env_reset)
    }

    fn from_sources(
        cli_dir: Option<String>,
        env_dir: Option<String>,
        cli_reset: bool,
        env_reset: Option<String>,
    ) -> Self {
        let output_dir = match (cli_dir, env_dir) {
            (Some(dir), _) => {
                tracing::debug!("Using output directory {} from command-line argument", dir);
                dir
            }
            (None, Some(dir)) if !dir.trim().is_empty() => {
                tracing::debug!("Using output directory {} from {}", dir, RESULTS_DIR_ENV);
                dir
            }
            _ => DEFAULT_RESULTS_DIR.to_string(),
        };

        let reset_per_page = cli_reset
            || env_reset
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false);

        Self {
            output_dir: PathBuf::from(output_dir),
            reset_per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_environment() {
        let s = Settings::from_sources(Some("out".into()), Some("env_out".into()), false, None);
        assert_eq!(s.output_dir, PathBuf::from("out"));
        assert!(!s.reset_per_page);
    }

    #[test]
    fn test_environment_and_defaults() {
        let s = Settings::from_sources(None, Some("env_out".into()), false, Some("TRUE".into()));
        assert_eq!(s.output_dir, PathBuf::from("env_out"));
        assert!(s.reset_per_page);

        let s = Settings::from_sources(None, Some("  ".into()), false, Some("0".into()));
        assert_eq!(s.output_dir, PathBuf::from(DEFAULT_RESULTS_DIR));
        assert!(!s.reset_per_page);
    }
}
