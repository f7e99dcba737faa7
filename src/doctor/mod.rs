//! Doctor command for system diagnostics
//!
//! Checks the configuration, the record store and the local state directory
//! and reports each as pass, warn or fail.

use colored::Colorize;
use std::path::PathBuf;

use crate::cli::{BackendMode, Config};
use crate::planner::Planner;
use crate::store::RemoteStore;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}

/// Doctor diagnostics system
pub struct Doctor {
    config: Config,
    offline: bool,
    planner: Option<Planner>,
}

impl Doctor {
    /// `offline` mirrors the `--offline` flag: the mock store is in use
    /// regardless of the configured mode
    pub fn new(config: Config, offline: bool) -> Self {
        Self {
            config,
            offline,
            planner: None,
        }
    }

    /// Planner to probe for the meal library check
    pub fn with_planner(mut self, planner: Planner) -> Self {
        self.planner = Some(planner);
        self
    }

    fn uses_remote(&self) -> bool {
        !self.offline && self.config.backend.mode == BackendMode::Remote
    }

    /// Run all health checks
    pub async fn run_diagnostics(&self) -> Vec<HealthCheck> {
        vec![
            self.check_config(),
            self.check_credentials(),
            self.check_store().await,
            self.check_meal_library().await,
            self.check_state_dir(),
        ]
    }

    /// Check 1: configuration values
    fn check_config(&self) -> HealthCheck {
        let mut config = self.config.clone();
        if self.offline {
            config.backend.mode = BackendMode::Mock;
        }

        match config.validate() {
            Ok(()) => HealthCheck::new("Configuration", HealthStatus::Pass),
            Err(e) => HealthCheck::new("Configuration", HealthStatus::Fail(e.to_string())),
        }
    }

    /// Check 2: project id and public key for the hosted store
    fn check_credentials(&self) -> HealthCheck {
        if !self.uses_remote() {
            return HealthCheck::new(
                "Credentials",
                HealthStatus::Warn("Offline mode, credentials not used".to_string()),
            );
        }

        let backend = &self.config.backend;
        let missing: Vec<&str> = [
            ("project_id", backend.project_id.trim().is_empty()),
            ("public_key", backend.public_key.trim().is_empty()),
        ]
        .iter()
        .filter(|(_, empty)| *empty)
        .map(|(field, _)| *field)
        .collect();

        if missing.is_empty() {
            HealthCheck::new("Credentials", HealthStatus::Pass)
        } else {
            HealthCheck::new(
                "Credentials",
                HealthStatus::Fail(format!("Missing backend.{}", missing.join(", backend."))),
            )
        }
    }

    /// Check 3: hosted store answers
    async fn check_store(&self) -> HealthCheck {
        if !self.uses_remote() {
            return HealthCheck::new("Record Store", HealthStatus::Pass);
        }

        let store = match RemoteStore::new(self.config.remote()) {
            Ok(store) => store,
            Err(e) => {
                return HealthCheck::new(
                    "Record Store",
                    HealthStatus::Fail(format!("Cannot build client: {}", e)),
                )
            }
        };

        if store.is_available().await {
            HealthCheck::new("Record Store", HealthStatus::Pass)
        } else {
            HealthCheck::new(
                "Record Store",
                HealthStatus::Fail(format!("{} not reachable", store.base_url())),
            )
        }
    }

    /// Check 4: the meal table can be read
    async fn check_meal_library(&self) -> HealthCheck {
        let Some(planner) = &self.planner else {
            return HealthCheck::new(
                "Meal Library",
                HealthStatus::Fail("Store not configured".to_string()),
            );
        };

        match planner.meals().get_all().await {
            Ok(meals) if meals.is_empty() => HealthCheck::new(
                "Meal Library",
                HealthStatus::Warn("No meals yet; add one with `meals add`".to_string()),
            ),
            Ok(_) => HealthCheck::new("Meal Library", HealthStatus::Pass),
            Err(e) => HealthCheck::new(
                "Meal Library",
                HealthStatus::Fail(format!("Cannot read meals: {}", e)),
            ),
        }
    }

    /// Check 5: state directory is writable
    fn check_state_dir(&self) -> HealthCheck {
        let state_dir: PathBuf = self.config.state_dir();

        if let Err(e) = std::fs::create_dir_all(&state_dir) {
            return HealthCheck::new(
                "State Directory",
                HealthStatus::Fail(format!("Cannot create {}: {}", state_dir.display(), e)),
            );
        }

        let test_file = state_dir.join(".mealplanner_test");
        match std::fs::write(&test_file, "test") {
            Ok(_) => {
                let _ = std::fs::remove_file(&test_file);
                HealthCheck::new("State Directory", HealthStatus::Pass)
            }
            Err(_) => HealthCheck::new(
                "State Directory",
                HealthStatus::Fail(format!("No write permission in {}", state_dir.display())),
            ),
        }
    }

    /// Display diagnostics results
    pub fn display_results(checks: &[HealthCheck]) {
        println!("\n{}\n", "mealplanner diagnostics".bold().cyan());
        println!("{:<20} Status", "Check");
        println!("{}", "=".repeat(50));

        for check in checks {
            let status = match &check.status {
                HealthStatus::Pass => "PASS".green().bold().to_string(),
                HealthStatus::Warn(msg) => format!("{} {}", "WARN:".yellow().bold(), msg.yellow()),
                HealthStatus::Fail(msg) => format!("{} {}", "FAIL:".red().bold(), msg.red()),
            };
            println!("{:<20} {}", check.name, status);
        }

        println!();
    }

    /// Get overall health status
    pub fn overall_status(checks: &[HealthCheck]) -> bool {
        !checks.iter().any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn offline_config(temp: &TempDir) -> Config {
        let mut config = Config::default();
        config.backend.mode = BackendMode::Mock;
        config.paths.state_dir = temp.path().join("state").to_string_lossy().to_string();
        config
    }

    fn find<'a>(checks: &'a [HealthCheck], name: &str) -> &'a HealthStatus {
        &checks.iter().find(|c| c.name == name).unwrap().status
    }

    #[test]
    fn test_health_status_equality() {
        assert_eq!(HealthStatus::Pass, HealthStatus::Pass);
        assert_ne!(
            HealthStatus::Warn("test".to_string()),
            HealthStatus::Fail("test".to_string())
        );
    }

    #[test]
    fn test_overall_status() {
        let ok = vec![
            HealthCheck::new("One", HealthStatus::Pass),
            HealthCheck::new("Two", HealthStatus::Warn("warning".to_string())),
        ];
        assert!(Doctor::overall_status(&ok));

        let bad = vec![
            HealthCheck::new("One", HealthStatus::Pass),
            HealthCheck::new("Two", HealthStatus::Fail("error".to_string())),
        ];
        assert!(!Doctor::overall_status(&bad));
    }

    #[tokio::test]
    async fn test_offline_diagnostics() {
        let temp = TempDir::new().unwrap();
        let doctor = Doctor::new(offline_config(&temp), false)
            .with_planner(Planner::new(Arc::new(MockStore::new())));

        let checks = doctor.run_diagnostics().await;
        assert_eq!(checks.len(), 5);
        assert_eq!(*find(&checks, "Configuration"), HealthStatus::Pass);
        assert!(matches!(find(&checks, "Credentials"), HealthStatus::Warn(_)));
        assert_eq!(*find(&checks, "Record Store"), HealthStatus::Pass);
        assert!(matches!(find(&checks, "Meal Library"), HealthStatus::Warn(_)));
        assert_eq!(*find(&checks, "State Directory"), HealthStatus::Pass);
        assert!(Doctor::overall_status(&checks));
    }

    #[test]
    fn test_missing_credentials() {
        let temp = TempDir::new().unwrap();
        let mut config = offline_config(&temp);
        config.backend.mode = BackendMode::Remote;
        config.backend.project_id = "proj".to_string();

        let doctor = Doctor::new(config, false);
        match doctor.check_credentials().status {
            HealthStatus::Fail(msg) => assert_eq!(msg, "Missing backend.public_key"),
            other => panic!("unexpected status: {:?}", other),
        }
        assert!(matches!(doctor.check_config().status, HealthStatus::Fail(_)));
    }

    #[test]
    fn test_offline_flag_overrides_remote_mode() {
        let temp = TempDir::new().unwrap();
        let mut config = offline_config(&temp);
        config.backend.mode = BackendMode::Remote;

        let doctor = Doctor::new(config, true);
        assert_eq!(doctor.check_config().status, HealthStatus::Pass);
    }

    #[tokio::test]
    async fn test_meal_library_without_planner() {
        let temp = TempDir::new().unwrap();
        let doctor = Doctor::new(offline_config(&temp), false);
        assert!(matches!(doctor.check_meal_library().await.status, HealthStatus::Fail(_)));
    }
}
