//! Widget configuration
//!
//! Defaults reproduce the stock widget (draw in `[0, 700)` every 100ms for
//! 2s). A page can override them with query parameters, e.g.
//! `?interval=50&duration=1000&policy=legacy`.

use std::time::Duration;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What a trigger does while a previous run is still refreshing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Cancel the running refresh and its pending stop, then start over
    #[default]
    Restart,
    /// Overwrite the stored handle without canceling; the old timer is orphaned
    Legacy,
}

impl std::str::FromStr for OverlapPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "restart" => Ok(Self::Restart),
            "legacy" => Ok(Self::Legacy),
            other => Err(Error::InvalidParam {
                key: "policy".into(),
                value: other.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Lower draw bound (rounded up)
    pub min: f64,
    /// Upper draw bound, exclusive (rounded down)
    pub max: f64,
    pub interval_ms: u32,
    pub duration_ms: u32,
    pub policy: OverlapPolicy,
    /// Shown in place of the number before the first draw
    pub placeholder: String,
    pub label: String,
    pub button_text: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 700.0,
            interval_ms: 100,
            duration_ms: 2000,
            policy: OverlapPolicy::Restart,
            placeholder: String::new(),
            label: "Suprise goes to".to_string(),
            button_text: "Go!".to_string(),
        }
    }
}

impl WidgetConfig {
    /// Defaults overridden by a `location.search` style query string.
    /// Unknown keys are ignored; the result is validated.
    pub fn from_query(search: &str) -> Result<Self> {
        let mut config = Self::default();
        let query = search.trim_start_matches('?');

        for param in query.split('&').filter(|p| !p.is_empty()) {
            let (key, raw) = param.split_once('=').unwrap_or((param, ""));
            let value = decode(key, raw)?;
            match key {
                "min" => config.min = parse_num(key, &value)?,
                "max" => config.max = parse_num(key, &value)?,
                "interval" => config.interval_ms = parse_num(key, &value)?,
                "duration" => config.duration_ms = parse_num(key, &value)?,
                "policy" => config.policy = value.parse()?,
                "placeholder" => config.placeholder = value,
                _ => {}
            }
        }

        config.validate()?;
        Ok(config)
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn validate(&self) -> Result<()> {
        let (min, max) = self.bounds();
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return Err(Error::InvalidRange {
                min: min as i64,
                max: max as i64,
            });
        }
        if self.interval_ms == 0 {
            return Err(Error::InvalidDuration {
                name: "interval_ms",
            });
        }
        if self.duration_ms == 0 {
            return Err(Error::InvalidDuration {
                name: "duration_ms",
            });
        }
        Ok(())
    }

    /// Draw bounds after rounding inward
    pub fn bounds(&self) -> (f64, f64) {
        (self.min.ceil(), self.max.floor())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.interval_ms))
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.duration_ms))
    }
}

fn decode(key: &str, raw: &str) -> Result<String> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .map_err(|_| Error::InvalidParam {
            key: key.to_string(),
            value: raw.to_string(),
        })
}

fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| Error::InvalidParam {
        key: key.to_string(),
        value: value.to_string(),
    })
}
