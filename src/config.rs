//! Tour configuration
//!
//! Timing constants, placement metrics, routes and the completion flag key.
//! Defaults are the values the web dashboard uses; `TourConfig::terminal()`
//! rescales the geometry for a host that measures in character cells.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::TourError;
use crate::store::CompletionFlag;

/// Geometry constants used by the placement engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementMetrics {
    /// Gap between the target edge and the popup edge
    pub margin: f64,
    /// Minimum distance kept between the popup and the viewport edges
    pub viewport_padding: f64,
    /// Arrow offset outside the popup on the left/top edges
    pub arrow_size: f64,
}

impl Default for PlacementMetrics {
    fn default() -> Self {
        Self {
            margin: 20.0,
            viewport_padding: 10.0,
            arrow_size: 8.0,
        }
    }
}

/// Tour engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    /// How long the resolver waits for a step's target before skipping it
    pub resolve_timeout_ms: u64,
    /// Delay between resolver probes
    pub poll_interval_ms: u64,
    /// Pause after scrolling before the target is measured
    pub settle_delay_ms: u64,
    /// Delay between page load and the entry prompt
    pub prompt_delay_ms: u64,
    /// Lifetime of a toast notification
    pub toast_duration_ms: u64,
    pub placement: PlacementMetrics,
    /// Only route on which the entry prompt is offered
    pub dashboard_route: String,
    /// Public landing route; the tour never starts here
    pub landing_route: String,
    /// Store key of the persisted completion flag
    pub completion_key: String,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            resolve_timeout_ms: 5000,
            poll_interval_ms: 100,
            settle_delay_ms: 500,
            prompt_delay_ms: 1500,
            toast_duration_ms: 3000,
            placement: PlacementMetrics::default(),
            dashboard_route: "/dashboard".to_string(),
            landing_route: "/landing".to_string(),
            completion_key: "tourCompleted".to_string(),
        }
    }
}

impl TourConfig {
    /// Preset for hosts measured in terminal cells
    pub fn terminal() -> Self {
        Self {
            placement: PlacementMetrics {
                margin: 1.0,
                viewport_padding: 1.0,
                arrow_size: 1.0,
            },
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file; missing fields keep their defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read tour config from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse tour config JSON")?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize tour config")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write tour config to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Flag recording completion under this configuration's key
    pub fn completion_flag(&self) -> CompletionFlag {
        CompletionFlag::new(self.completion_key.clone())
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(TourError::config("Poll interval must be greater than zero"));
        }
        if self.poll_interval_ms > self.resolve_timeout_ms {
            return Err(TourError::config("Poll interval cannot exceed the resolve timeout"));
        }
        if self.completion_key.trim().is_empty() {
            return Err(TourError::config("Completion key must be specified"));
        }
        if !self.dashboard_route.starts_with('/') || !self.landing_route.starts_with('/') {
            return Err(TourError::config("Routes must be absolute paths"));
        }
        if self.dashboard_route == self.landing_route {
            return Err(TourError::config("Dashboard and landing routes must differ"));
        }

        let metrics = &self.placement;
        if metrics.margin < 0.0 || metrics.viewport_padding < 0.0 || metrics.arrow_size < 0.0 {
            return Err(TourError::config("Placement metrics cannot be negative"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard() {
        let config = TourConfig::default();
        assert_eq!(config.resolve_timeout_ms, 5000);
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.settle_delay_ms, 500);
        assert_eq!(config.prompt_delay_ms, 1500);
        assert_eq!(config.toast_duration_ms, 3000);
        assert_eq!(config.placement.margin, 20.0);
        assert_eq!(config.placement.viewport_padding, 10.0);
        assert_eq!(config.completion_key, "tourCompleted");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_terminal_preset_keeps_timing() {
        let config = TourConfig::terminal();
        assert_eq!(config.placement.margin, 1.0);
        assert_eq!(config.resolve_timeout_ms, 5000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tour-config.json");
        fs::write(&path, r#"{"settle_delay_ms": 250}"#).unwrap();

        let config = TourConfig::load_from_file(&path).unwrap();
        assert_eq!(config.settle_delay_ms, 250);
        assert_eq!(config.resolve_timeout_ms, 5000);
        assert_eq!(config.dashboard_route, "/dashboard");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TourConfig {
            poll_interval_ms: 0,
            ..TourConfig::default()
        };
        assert!(matches!(config.validate(), Err(TourError::Config(_))));

        let config = TourConfig {
            landing_route: "/dashboard".to_string(),
            ..TourConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_completion_flag_follows_configured_key() {
        use crate::store::JsonFileStore;

        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("tour-config.json");
        fs::write(&config_path, r#"{"completion_key": "onboardingDone"}"#).unwrap();
        let config = TourConfig::load_from_file(&config_path).unwrap();

        let mut store = JsonFileStore::open(dir.path().join("state.json")).unwrap();
        let flag = config.completion_flag();
        assert_eq!(flag.key(), "onboardingDone");
        flag.mark(&mut store).unwrap();

        assert!(flag.is_set(&store));
        assert!(!TourConfig::default().completion_flag().is_set(&store));

        flag.clear(&mut store).unwrap();
        assert!(!flag.is_set(&store));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tour-config.json");
        let config = TourConfig::terminal();
        config.save_to_file(&path).unwrap();
        assert_eq!(TourConfig::load_from_file(&path).unwrap(), config);
    }
}
