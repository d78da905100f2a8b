//! Animation error types

use thiserror::Error;

/// Errors raised while preparing an animation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Easing name (or `"<name> <frequency>"` text) not recognized
    #[error("Unknown easing function: {0}")]
    UnknownEasing(String),

    /// Value could not be read as a hex or rgb color
    #[error("Invalid color value: {0}")]
    InvalidColor(String),

    /// Attribute property given a bare target value; attributes have no type default
    #[error("Property `{0}` needs an explicit [from, to] pair")]
    MissingStartValue(String),

    /// Start value has fewer numeric components than the target value
    #[error("Property `{property}` has {from} numeric components in its start value but {to} in its target")]
    ComponentMismatch {
        property: String,
        from: usize,
        to: usize,
    },
}

/// Errors raised while loading engine defaults
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Malformed TOML or unknown keys
    #[error("Failed to parse animation defaults: {0}")]
    Parse(#[from] toml::de::Error),

    /// Duration must be a finite, non-negative number of milliseconds
    #[error("Invalid default duration: {0}")]
    InvalidDuration(f64),

    /// Default easing is not a known easing name
    #[error("Invalid default easing: {0}")]
    InvalidEasing(#[source] AnimationError),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
