//! Plan badge flags and their stored JSON encodings.
//!
//! Plan rows carry a loosely-typed `badges` JSON column that has accumulated
//! two encodings over time: an object of booleans (`{"blueTick": true}`) and
//! an array of granted keys (`["blueTick", "pro"]`). Both normalize into
//! [`PlanBadges`] at the storage boundary; the ambiguous shape never travels
//! further into the domain.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Badge flags granted by a subscription plan.
///
/// Unknown badge keys in stored rows are ignored. Serializes to the object
/// encoding, which is what new rows are written with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanBadges {
    pub blue_tick: bool,
    pub pro: bool,
    pub recommended: bool,
}

impl PlanBadges {
    /// Creates badges with all flags set explicitly.
    pub fn new(blue_tick: bool, pro: bool, recommended: bool) -> Self {
        Self {
            blue_tick,
            pro,
            recommended,
        }
    }

    /// Creates badges with no flags granted.
    pub fn none() -> Self {
        Self::default()
    }

    fn set(&mut self, key: &str, value: bool) {
        match key {
            "blueTick" => self.blue_tick = value,
            "pro" => self.pro = value,
            "recommended" => self.recommended = value,
            _ => {}
        }
    }
}

/// The two JSON encodings found in stored plan rows.
#[derive(Deserialize)]
#[serde(untagged)]
enum BadgesEncoding {
    Flags(HashMap<String, bool>),
    Keys(Vec<String>),
}

impl<'de> Deserialize<'de> for PlanBadges {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut badges = PlanBadges::default();
        match BadgesEncoding::deserialize(deserializer)? {
            BadgesEncoding::Flags(map) => {
                for (key, value) in map {
                    badges.set(&key, value);
                }
            }
            BadgesEncoding::Keys(keys) => {
                for key in keys {
                    badges.set(&key, true);
                }
            }
        }
        Ok(badges)
    }
}
