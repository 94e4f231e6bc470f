//! Persisted settings
//!
//! A small JSON document holding cache lifetimes, the debounce interval and
//! the view style. Missing fields fall back to defaults so older files keep
//! loading.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::constants::cache::{INITIAL_CONDITIONS_TTL, PORTRAIT_TTL, TRAJECTORY_TTL};
use crate::constants::scheduler::MIN_RECOMPUTE_INTERVAL;
use crate::error::{Result, SimError};
use crate::perf::CacheTtls;
use crate::portrait::PortraitStyle;
use crate::scheduler::SchedulerSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub trajectory_ttl_secs: u64,
    pub portrait_ttl_secs: u64,
    pub initial_conditions_ttl_secs: u64,
    /// Per-class LRU cap, unbounded when absent
    pub max_entries: Option<usize>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            trajectory_ttl_secs: TRAJECTORY_TTL.as_secs(),
            portrait_ttl_secs: PORTRAIT_TTL.as_secs(),
            initial_conditions_ttl_secs: INITIAL_CONDITIONS_TTL.as_secs(),
            max_entries: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub min_interval_ms: u64,
    /// Recompute on parameter changes without pressing "Compute"
    pub auto_compute: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: MIN_RECOMPUTE_INTERVAL.as_millis() as u64,
            auto_compute: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub style: PortraitStyle,
    pub dark_mode: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            style: PortraitStyle::default(),
            dark_mode: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cache: CacheSettings,
    pub scheduler: SchedulerConfig,
    pub view: ViewConfig,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Settings from `path`, or defaults when it is missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => {
                info!(path = %path.display(), "settings loaded");
                settings
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring settings file");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let ttls = [
            ("trajectory_ttl_secs", self.cache.trajectory_ttl_secs),
            ("portrait_ttl_secs", self.cache.portrait_ttl_secs),
            ("initial_conditions_ttl_secs", self.cache.initial_conditions_ttl_secs),
        ];
        if let Some((name, _)) = ttls.iter().find(|(_, secs)| *secs == 0) {
            return Err(SimError::Config(format!("{} must be positive", name)));
        }
        if self.cache.max_entries == Some(0) {
            return Err(SimError::Config("max_entries must be at least 1".to_string()));
        }
        let style = &self.view.style;
        if !(style.line_width.is_finite() && style.line_width > 0.0) {
            return Err(SimError::Config(format!(
                "line_width must be positive, got {}",
                style.line_width
            )));
        }
        if !(0.0..=1.0).contains(&style.alpha) {
            return Err(SimError::Config(format!(
                "alpha must be within [0, 1], got {}",
                style.alpha
            )));
        }
        Ok(())
    }

    pub fn cache_ttls(&self) -> CacheTtls {
        CacheTtls {
            trajectories: Duration::from_secs(self.cache.trajectory_ttl_secs),
            portraits: Duration::from_secs(self.cache.portrait_ttl_secs),
            initial_conditions: Duration::from_secs(self.cache.initial_conditions_ttl_secs),
            max_entries: self.cache.max_entries,
        }
    }

    pub fn scheduler_settings(&self) -> SchedulerSettings {
        SchedulerSettings {
            min_interval: Duration::from_millis(self.scheduler.min_interval_ms),
        }
    }
}
