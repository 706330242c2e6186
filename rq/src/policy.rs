//! Effect duration policy
//!
//! Maps an effect kind to the simulated time a render of that effect takes.
//! The scheduler asks the policy once per job as it enters processing.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Effect;

/// Source of simulated render durations
pub trait DurationPolicy: Send + Sync {
    /// Processing time for `effect`, or `None` if the policy has no entry
    fn duration_for(&self, effect: Effect) -> Option<Duration>;
}

/// Table of per-effect durations in milliseconds
///
/// Deserializes from a map keyed by effect name:
///
/// ```yaml
/// color_grade: 2000
/// blur: 1500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectDurations {
    table: BTreeMap<Effect, u64>,
}

impl Default for EffectDurations {
    fn default() -> Self {
        Self::from_millis([
            (Effect::ColorGrade, 2000),
            (Effect::Blur, 1500),
            (Effect::Trim, 500),
            (Effect::SpeedChange, 1000),
            (Effect::Transition, 800),
        ])
    }
}

impl EffectDurations {
    /// Build a table from `(effect, milliseconds)` pairs
    pub fn from_millis(entries: impl IntoIterator<Item = (Effect, u64)>) -> Self {
        Self {
            table: entries.into_iter().collect(),
        }
    }

    /// Copy of this table with every duration multiplied by `factor`
    ///
    /// Non-finite or negative factors are treated as zero.
    pub fn scaled(&self, factor: f64) -> Self {
        debug!(factor, "EffectDurations::scaled: called");
        let factor = if factor.is_finite() && factor > 0.0 { factor } else { 0.0 };
        Self {
            table: self
                .table
                .iter()
                .map(|(effect, ms)| (*effect, (*ms as f64 * factor).round() as u64))
                .collect(),
        }
    }

    pub fn get_ms(&self, effect: Effect) -> Option<u64> {
        self.table.get(&effect).copied()
    }

    /// Entries in effect order
    pub fn iter(&self) -> impl Iterator<Item = (Effect, u64)> + '_ {
        self.table.iter().map(|(effect, ms)| (*effect, *ms))
    }
}

impl DurationPolicy for EffectDurations {
    fn duration_for(&self, effect: Effect) -> Option<Duration> {
        self.get_ms(effect).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_covers_every_effect() {
        let policy = EffectDurations::default();
        for effect in Effect::ALL {
            assert!(policy.duration_for(effect).is_some(), "missing {}", effect);
        }
        assert_eq!(policy.duration_for(Effect::Blur), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_partial_table() {
        let policy = EffectDurations::from_millis([(Effect::Trim, 10)]);
        assert_eq!(policy.duration_for(Effect::Trim), Some(Duration::from_millis(10)));
        assert_eq!(policy.duration_for(Effect::Blur), None);
    }

    #[test]
    fn test_scaled() {
        let policy = EffectDurations::default().scaled(0.1);
        assert_eq!(policy.get_ms(Effect::ColorGrade), Some(200));
        assert_eq!(policy.get_ms(Effect::Transition), Some(80));

        let zeroed = EffectDurations::default().scaled(f64::NAN);
        assert!(zeroed.iter().all(|(_, ms)| ms == 0));
    }

    #[test]
    fn test_yaml_roundtrip_keys() {
        let policy: EffectDurations = serde_yaml::from_str("speed_change: 250\nblur: 40\n").unwrap();
        assert_eq!(policy.get_ms(Effect::SpeedChange), Some(250));
        assert_eq!(policy.get_ms(Effect::Blur), Some(40));
        assert_eq!(policy.get_ms(Effect::Trim), None);
    }
}
