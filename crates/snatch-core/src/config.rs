use crate::error::SnatchError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Semaphore;

/// Run configuration loaded from `~/.config/snatch/config.toml`, overridable from the CLI.
/// Fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnatchConfig {
    /// Directory for merged output and the temporary segment directory.
    pub output_dir: PathBuf,
    /// Quality preference. Carried on the stream, not interpreted.
    pub quality: String,
    /// Maximum segment fetches in flight at once.
    pub max_concurrency: usize,
    /// Attempts per segment, including the first.
    pub retry_attempts: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
    pub verbose: bool,
    /// Length of one linear backoff unit in seconds.
    pub retry_backoff_secs: f64,
    /// Keep the segment directory after a successful merge.
    pub keep_segments: bool,
}

impl Default for SnatchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./downloads"),
            quality: "best".to_string(),
            max_concurrency: 5,
            retry_attempts: 3,
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
            verbose: false,
            retry_backoff_secs: 1.0,
            keep_segments: false,
        }
    }
}

impl SnatchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), SnatchError> {
        if self.max_concurrency == 0 {
            return Err(SnatchError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(SnatchError::Config(
                "timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.max_concurrency > Semaphore::MAX_PERMITS {
            return Err(SnatchError::Config(format!(
                "max_concurrency must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }
        if Duration::try_from_secs_f64(self.retry_backoff_secs).is_err() {
            return Err(SnatchError::Config(
                "retry_backoff_secs must be a non-negative number of seconds".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("snatch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SnatchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SnatchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

pub fn load_from(path: &Path) -> Result<SnatchConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: SnatchConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = SnatchConfig::default();
        assert_eq!(cfg.output_dir, PathBuf::from("./downloads"));
        assert_eq!(cfg.quality, "best");
        assert_eq!(cfg.max_concurrency, 5);
        assert_eq!(cfg.retry_attempts, 3);
        assert_eq!(cfg.timeout_secs, 30);
        assert!(!cfg.verbose);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = SnatchConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: SnatchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let toml = r#"
            max_concurrency = 12
            retry_attempts = 5
        "#;
        let cfg: SnatchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.max_concurrency, 12);
        assert_eq!(cfg.retry_attempts, 5);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.quality, "best");
    }

    #[test]
    fn validate_rejects_zero_concurrency_and_timeout() {
        let cfg = SnatchConfig {
            max_concurrency: 0,
            ..SnatchConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(SnatchError::Config(_))));
        let cfg = SnatchConfig {
            timeout_secs: 0,
            ..SnatchConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(SnatchError::Config(_))));
    }

    #[test]
    fn validate_rejects_unrepresentable_backoff() {
        for secs in [1e30, -1.0, f64::NAN, f64::INFINITY] {
            let cfg = SnatchConfig {
                retry_backoff_secs: secs,
                ..SnatchConfig::default()
            };
            assert!(
                matches!(cfg.validate(), Err(SnatchError::Config(_))),
                "backoff {} accepted",
                secs
            );
        }
        let cfg = SnatchConfig {
            retry_backoff_secs: 0.0,
            ..SnatchConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_caps_concurrency_at_semaphore_limit() {
        let cfg = SnatchConfig {
            max_concurrency: usize::MAX,
            ..SnatchConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(SnatchError::Config(_))));
        let cfg = SnatchConfig {
            max_concurrency: Semaphore::MAX_PERMITS,
            ..SnatchConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "output_dir = \"/tmp/videos\"\nverbose = true\n").unwrap();
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("/tmp/videos"));
        assert!(cfg.verbose);
    }
}
