//! Engine defaults
//!
//! Options every request falls back to when it leaves them unset. Loaded
//! from TOML:
//!
//! ```toml
//! duration = 600
//! easing = "easeInOutCubic"
//! ```

use crate::easing::EasingSpec;
use crate::error::ConfigError;
use serde::Deserialize;

/// Fallback duration and easing for requests
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationDefaults {
    /// Milliseconds
    pub duration: f64,
    pub easing: String,
}

impl AnimationDefaults {
    pub const DURATION: f64 = 1000.0;
    pub const EASING: &'static str = "easeOutElastic";

    /// Parse and validate defaults from TOML text; missing keys keep their
    /// built-in values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let defaults: AnimationDefaults = toml::from_str(text)?;
        defaults.validate()?;
        Ok(defaults)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(ConfigError::InvalidDuration(self.duration));
        }
        EasingSpec::parse(&self.easing).map_err(ConfigError::InvalidEasing)?;
        Ok(())
    }
}

impl Default for AnimationDefaults {
    fn default() -> Self {
        Self {
            duration: Self::DURATION,
            easing: Self::EASING.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults() {
        let defaults = AnimationDefaults::default();
        assert_eq!(defaults.duration, 1000.0);
        assert_eq!(defaults.easing, "easeOutElastic");
        assert!(defaults.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_builtins() {
        let defaults = AnimationDefaults::from_toml_str("duration = 250").unwrap();
        assert_eq!(defaults.duration, 250.0);
        assert_eq!(defaults.easing, "easeOutElastic");

        let defaults = AnimationDefaults::from_toml_str("easing = \"easeOutElastic 300\"").unwrap();
        assert_eq!(defaults.duration, 1000.0);
        assert_eq!(defaults.easing, "easeOutElastic 300");
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(matches!(
            AnimationDefaults::from_toml_str("duration = -5"),
            Err(ConfigError::InvalidDuration(_))
        ));
        assert!(matches!(
            AnimationDefaults::from_toml_str("easing = \"wobbly\""),
            Err(ConfigError::InvalidEasing(_))
        ));
        assert!(matches!(
            AnimationDefaults::from_toml_str("speed = 2"),
            Err(ConfigError::Parse(_))
        ));
    }
}
