//! Engine-wide options.

use serde::{Deserialize, Serialize};

/// Environment key for the audit buffer size.
pub const ENV_AUDIT_CAPACITY: &str = "TIMETABLE_AUDIT_CAPACITY";
/// Environment key for [`EngineConfig::strict_pool_drops`].
pub const ENV_STRICT_POOL_DROPS: &str = "TIMETABLE_STRICT_POOL_DROPS";

/// Options that shape engine behavior independent of any one semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of audit events kept by the in-memory audit sink.
    pub audit_capacity: usize,
    /// Apply the row-identity rule to placements dropped from the unassigned
    /// pool too. When `false`, a new placement may land on any classroom or
    /// instructor row; the session keeps its bound resources either way.
    pub strict_pool_drops: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            audit_capacity: 1024,
            strict_pool_drops: false,
        }
    }
}

impl EngineConfig {
    /// Validate option values.
    pub fn validate(&self) -> Result<(), String> {
        if self.audit_capacity == 0 {
            return Err("audit_capacity must be greater than 0".into());
        }
        Ok(())
    }

    /// Load options from the process environment, reading a `.env` file first
    /// if one exists. Unset keys keep their defaults.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        let mut cfg = Self::default();
        if let Ok(raw) = std::env::var(ENV_AUDIT_CAPACITY) {
            cfg.audit_capacity = raw
                .trim()
                .parse()
                .map_err(|e| format!("{ENV_AUDIT_CAPACITY}: {e}"))?;
        }
        if let Ok(raw) = std::env::var(ENV_STRICT_POOL_DROPS) {
            cfg.strict_pool_drops = parse_flag(&raw)
                .ok_or_else(|| format!("{ENV_STRICT_POOL_DROPS}: expected a boolean, got `{raw}`"))?;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
