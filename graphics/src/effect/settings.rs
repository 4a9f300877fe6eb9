//! Persisted transition settings and their migrations.

use serde::{Deserialize, Serialize};

use crate::error::GraphicsError;

use super::EffectMode;

/// Current settings layout version.
pub const CURRENT_VERSION: u32 = 1;

/// Serialized form of a [`TransitionEffect`](super::TransitionEffect).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionSettings {
    /// Layout version the settings were written with.
    #[serde(default)]
    pub version: u32,
    /// Effect mode.
    #[serde(default)]
    pub effect_mode: EffectMode,
    /// Effect factor in `[0, 1]`.
    #[serde(default = "default_factor")]
    pub effect_factor: f32,
}

fn default_factor() -> f32 {
    1.0
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            effect_mode: EffectMode::default(),
            effect_factor: default_factor(),
        }
    }
}

impl TransitionSettings {
    /// Parse RON settings and bring them to [`CURRENT_VERSION`].
    pub fn from_ron(text: &str) -> Result<Self, GraphicsError> {
        let settings: Self =
            ron::from_str(text).map_err(|e| GraphicsError::SettingsParse(e.to_string()))?;
        let (_, settings) = upgrade(settings.version, settings);
        Ok(settings)
    }

    /// Serialize as pretty RON.
    pub fn to_ron(&self) -> Result<String, GraphicsError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| GraphicsError::SettingsParse(e.to_string()))
    }
}

/// Migrate settings written with `stored_version` to [`CURRENT_VERSION`].
///
/// Returns the new version and the migrated settings. Settings that are
/// already current, or from a newer version, are returned unchanged. Older
/// layouts share the current field meanings, so migration only stamps the
/// version.
pub fn upgrade(stored_version: u32, mut settings: TransitionSettings) -> (u32, TransitionSettings) {
    if stored_version >= CURRENT_VERSION {
        return (stored_version, settings);
    }

    log::info!(
        "Upgrading transition settings v{} -> v{}",
        stored_version,
        CURRENT_VERSION
    );
    settings.version = CURRENT_VERSION;
    (CURRENT_VERSION, settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrade_stamps_version_and_keeps_values() {
        let legacy = TransitionSettings {
            version: 0,
            effect_mode: EffectMode::Mono,
            effect_factor: 0.5,
        };
        let (version, settings) = upgrade(0, legacy);
        assert_eq!(version, CURRENT_VERSION);
        assert_eq!(settings.version, CURRENT_VERSION);
        assert_eq!(settings.effect_factor, 0.5);
        assert_eq!(settings.effect_mode, EffectMode::Mono);
    }

    #[test]
    fn test_upgrade_keeps_full_factor() {
        let legacy = TransitionSettings {
            version: 0,
            effect_mode: EffectMode::Cutoff,
            effect_factor: 1.0,
        };
        let (_, settings) = upgrade(0, legacy);
        assert_eq!(settings.effect_factor, 1.0);
    }

    #[test]
    fn test_upgrade_current_is_noop() {
        let current = TransitionSettings {
            version: CURRENT_VERSION,
            effect_mode: EffectMode::Cutoff,
            effect_factor: 0.25,
        };
        assert_eq!(upgrade(CURRENT_VERSION, current), (CURRENT_VERSION, current));
    }

    #[test]
    fn test_from_ron_missing_version_is_legacy() {
        let settings =
            TransitionSettings::from_ron("(effect_mode: Cutoff, effect_factor: 0.5)").unwrap();
        assert_eq!(settings.effect_mode, EffectMode::Cutoff);
        assert_eq!(settings.effect_factor, 0.5);
        assert_eq!(settings.version, CURRENT_VERSION);
    }

    #[test]
    fn test_ron_round_trip() {
        let settings = TransitionSettings {
            version: CURRENT_VERSION,
            effect_mode: EffectMode::Mono,
            effect_factor: 0.75,
        };
        let text = settings.to_ron().unwrap();
        assert_eq!(TransitionSettings::from_ron(&text).unwrap(), settings);
    }

    #[test]
    fn test_from_ron_rejects_garbage() {
        let err = TransitionSettings::from_ron("not ron").unwrap_err();
        assert!(matches!(err, GraphicsError::SettingsParse(_)));
    }
}
