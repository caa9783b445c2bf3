//! Analytics configuration.
//!
//! Stored as a JSON object on disk; every field is optional:
//! ```json
//! {
//!   "curve": { "a": 22.0, "b": 0.06, "c": 0.0031 },
//!   "lactation_length": 305,
//!   "persistency_day": 60,
//!   "persistency_tolerance_days": 1,
//!   "moving_average_window": 7,
//!   "trend_window": 7
//! }
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Woods incomplete-gamma curve parameters: scale, rising rate, declining rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WoodsParameters {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Default for WoodsParameters {
    fn default() -> Self {
        Self {
            a: 20.0,
            b: 0.05,
            c: 0.003,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub curve: WoodsParameters,
    /// Lactation horizon in days.
    pub lactation_length: u32,
    /// Days after lactation start at which persistency is sampled.
    pub persistency_day: i64,
    pub persistency_tolerance_days: i64,
    pub moving_average_window: usize,
    pub trend_window: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            curve: WoodsParameters::default(),
            lactation_length: 305,
            persistency_day: 60,
            persistency_tolerance_days: 1,
            moving_average_window: 7,
            trend_window: 7,
        }
    }
}

impl AnalyticsConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{path}'"))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("invalid analytics config in '{path}'"))?;
        Ok(config)
    }

    /// Applies `LACTATION_CURVE_A`, `LACTATION_CURVE_B` and `LACTATION_CURVE_C`
    /// overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        for (key, slot) in [
            ("LACTATION_CURVE_A", &mut self.curve.a),
            ("LACTATION_CURVE_B", &mut self.curve.b),
            ("LACTATION_CURVE_C", &mut self.curve.c),
        ] {
            if let Some(raw) = lookup(key) {
                *slot = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{key} must be a number, got '{raw}'"))?;
            }
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let WoodsParameters { a, b, c } = self.curve;
        if !(a.is_finite() && b.is_finite() && c.is_finite()) {
            bail!("curve parameters must be finite (a={a}, b={b}, c={c})");
        }
        if a < 0.0 {
            bail!("curve scale `a` must be non-negative, got {a}");
        }
        if self.lactation_length == 0 {
            bail!("lactation_length must be at least 1 day");
        }
        if self.persistency_tolerance_days < 0 {
            bail!("persistency_tolerance_days must be non-negative");
        }
        if self.moving_average_window == 0 || self.trend_window == 0 {
            bail!("moving_average_window and trend_window must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_standard_lactation() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.curve, WoodsParameters { a: 20.0, b: 0.05, c: 0.003 });
        assert_eq!(config.lactation_length, 305);
        assert_eq!(config.persistency_day, 60);
        assert_eq!(config.persistency_tolerance_days, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AnalyticsConfig =
            serde_json::from_str(r#"{"curve": {"a": 30.0, "b": 0.1, "c": 0.004}}"#).unwrap();
        assert_eq!(config.curve.a, 30.0);
        assert_eq!(config.lactation_length, 305);
        assert_eq!(config.trend_window, 7);
    }

    #[test]
    fn test_overrides_replace_curve_parameters() {
        let env: HashMap<&str, &str> = [("LACTATION_CURVE_A", "25"), ("LACTATION_CURVE_C", " 0.002 ")]
            .into_iter()
            .collect();
        let config = AnalyticsConfig::default()
            .with_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.curve, WoodsParameters { a: 25.0, b: 0.05, c: 0.002 });
    }

    #[test]
    fn test_overrides_reject_non_numbers() {
        let result = AnalyticsConfig::default().with_overrides(|k| {
            (k == "LACTATION_CURVE_B").then(|| "steep".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AnalyticsConfig::default();
        config.curve.b = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = AnalyticsConfig::default();
        config.moving_average_window = 0;
        assert!(config.validate().is_err());

        let mut config = AnalyticsConfig::default();
        config.persistency_tolerance_days = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(AnalyticsConfig::load("/nonexistent/lactation.json").is_err());
    }
}
