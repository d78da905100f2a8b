//! Easing functions for animations
//!
//! Every easing maps `(t, b, c, d)` (elapsed time, start value, total
//! change, duration) to the value at time `t`, following the classic
//! Penner equations. Elastic variants take an extra frequency in
//! `[0, 999]`, defaulting to 500.

use crate::error::{AnimationError, Result};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

const BACK_OVERSHOOT: f64 = 1.70158;
const DEFAULT_FREQUENCY: f64 = 500.0;
const MAX_FREQUENCY: f64 = 999.0;

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseInCubic,
    EaseInQuart,
    EaseInQuint,
    EaseInSine,
    EaseInExpo,
    EaseInCirc,
    EaseInElastic,
    EaseInBack,
    EaseOutQuad,
    EaseOutCubic,
    EaseOutQuart,
    EaseOutQuint,
    EaseOutSine,
    EaseOutExpo,
    EaseOutCirc,
    #[default]
    EaseOutElastic,
    EaseOutBack,
    EaseOutBounce,
    EaseInOutQuad,
    EaseInOutCubic,
    EaseInOutQuart,
    EaseInOutQuint,
    EaseInOutSine,
    EaseInOutExpo,
    EaseInOutCirc,
    EaseInOutElastic,
    EaseInOutBack,
}

impl Easing {
    /// Every easing, in declaration order
    pub const ALL: [Easing; 29] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseInCubic,
        Easing::EaseInQuart,
        Easing::EaseInQuint,
        Easing::EaseInSine,
        Easing::EaseInExpo,
        Easing::EaseInCirc,
        Easing::EaseInElastic,
        Easing::EaseInBack,
        Easing::EaseOutQuad,
        Easing::EaseOutCubic,
        Easing::EaseOutQuart,
        Easing::EaseOutQuint,
        Easing::EaseOutSine,
        Easing::EaseOutExpo,
        Easing::EaseOutCirc,
        Easing::EaseOutElastic,
        Easing::EaseOutBack,
        Easing::EaseOutBounce,
        Easing::EaseInOutQuad,
        Easing::EaseInOutCubic,
        Easing::EaseInOutQuart,
        Easing::EaseInOutQuint,
        Easing::EaseInOutSine,
        Easing::EaseInOutExpo,
        Easing::EaseInOutCirc,
        Easing::EaseInOutElastic,
        Easing::EaseInOutBack,
    ];

    /// Canonical camel-case name, e.g. `"easeOutElastic"`
    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "easeInQuad",
            Easing::EaseInCubic => "easeInCubic",
            Easing::EaseInQuart => "easeInQuart",
            Easing::EaseInQuint => "easeInQuint",
            Easing::EaseInSine => "easeInSine",
            Easing::EaseInExpo => "easeInExpo",
            Easing::EaseInCirc => "easeInCirc",
            Easing::EaseInElastic => "easeInElastic",
            Easing::EaseInBack => "easeInBack",
            Easing::EaseOutQuad => "easeOutQuad",
            Easing::EaseOutCubic => "easeOutCubic",
            Easing::EaseOutQuart => "easeOutQuart",
            Easing::EaseOutQuint => "easeOutQuint",
            Easing::EaseOutSine => "easeOutSine",
            Easing::EaseOutExpo => "easeOutExpo",
            Easing::EaseOutCirc => "easeOutCirc",
            Easing::EaseOutElastic => "easeOutElastic",
            Easing::EaseOutBack => "easeOutBack",
            Easing::EaseOutBounce => "easeOutBounce",
            Easing::EaseInOutQuad => "easeInOutQuad",
            Easing::EaseInOutCubic => "easeInOutCubic",
            Easing::EaseInOutQuart => "easeInOutQuart",
            Easing::EaseInOutQuint => "easeInOutQuint",
            Easing::EaseInOutSine => "easeInOutSine",
            Easing::EaseInOutExpo => "easeInOutExpo",
            Easing::EaseInOutCirc => "easeInOutCirc",
            Easing::EaseInOutElastic => "easeInOutElastic",
            Easing::EaseInOutBack => "easeInOutBack",
        }
    }

    pub fn is_elastic(&self) -> bool {
        matches!(
            self,
            Easing::EaseInElastic | Easing::EaseOutElastic | Easing::EaseInOutElastic
        )
    }

    /// Value at elapsed time `t` for start `b`, change `c` and duration `d`.
    ///
    /// `frequency` only affects the elastic variants.
    pub fn apply(&self, t: f64, b: f64, c: f64, d: f64, frequency: Option<f64>) -> f64 {
        match self {
            Easing::Linear => b + (t / d * c),
            Easing::EaseInQuad => {
                let t = t / d;
                c * t * t + b
            }
            Easing::EaseInCubic => c * (t / d).powi(3) + b,
            Easing::EaseInQuart => c * (t / d).powi(4) + b,
            Easing::EaseInQuint => c * (t / d).powi(5) + b,
            Easing::EaseInSine => -c * (t / d * (PI / 2.0)).cos() + c + b,
            Easing::EaseInExpo => {
                if t == 0.0 {
                    b
                } else {
                    c * 2f64.powf(10.0 * (t / d - 1.0)) + b
                }
            }
            Easing::EaseInCirc => {
                let t = t / d;
                -c * ((1.0 - t * t).sqrt() - 1.0) + b
            }
            Easing::EaseInElastic => {
                if t == 0.0 {
                    return b;
                }
                let t = t / d;
                if t == 1.0 {
                    return b + c;
                }
                let p = d * (1.0 - elastic_frequency(frequency) / 1000.0);
                let s = elastic_phase(c, p);
                let t = t - 1.0;
                -(c * 2f64.powf(10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin()) + b
            }
            Easing::EaseInBack => {
                let s = BACK_OVERSHOOT;
                let t = t / d;
                c * t * t * ((s + 1.0) * t - s) + b
            }
            Easing::EaseOutQuad => {
                let t = t / d;
                -c * t * (t - 2.0) + b
            }
            Easing::EaseOutCubic => {
                let t = t / d - 1.0;
                c * (t * t * t + 1.0) + b
            }
            Easing::EaseOutQuart => {
                let t = t / d - 1.0;
                -c * (t.powi(4) - 1.0) + b
            }
            Easing::EaseOutQuint => {
                let t = t / d - 1.0;
                c * (t.powi(5) + 1.0) + b
            }
            Easing::EaseOutSine => c * (t / d * (PI / 2.0)).sin() + b,
            Easing::EaseOutExpo => {
                if t == d {
                    b + c
                } else {
                    c * (-(2f64.powf(-10.0 * t / d)) + 1.0) + b
                }
            }
            Easing::EaseOutCirc => {
                let t = t / d - 1.0;
                c * (1.0 - t * t).sqrt() + b
            }
            Easing::EaseOutElastic => {
                if t == 0.0 {
                    return b;
                }
                let t = t / d;
                if t == 1.0 {
                    return b + c;
                }
                let p = d * (1.0 - elastic_frequency(frequency) / 1000.0);
                let s = elastic_phase(c, p);
                c * 2f64.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin() + c + b
            }
            Easing::EaseOutBack => {
                let s = BACK_OVERSHOOT;
                let t = t / d - 1.0;
                c * (t * t * ((s + 1.0) * t + s) + 1.0) + b
            }
            Easing::EaseOutBounce => {
                let t = t / d;
                if t < 1.0 / 2.75 {
                    c * (7.5625 * t * t) + b
                } else if t < 2.0 / 2.75 {
                    let t = t - 1.5 / 2.75;
                    c * (7.5625 * t * t + 0.75) + b
                } else if t < 2.5 / 2.75 {
                    let t = t - 2.25 / 2.75;
                    c * (7.5625 * t * t + 0.9375) + b
                } else {
                    let t = t - 2.625 / 2.75;
                    c * (7.5625 * t * t + 0.984375) + b
                }
            }
            Easing::EaseInOutQuad => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * t * t + b;
                }
                let t = t - 1.0;
                -c / 2.0 * (t * (t - 2.0) - 1.0) + b
            }
            Easing::EaseInOutCubic => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * t * t * t + b;
                }
                let t = t - 2.0;
                c / 2.0 * (t * t * t + 2.0) + b
            }
            Easing::EaseInOutQuart => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * t.powi(4) + b;
                }
                let t = t - 2.0;
                -c / 2.0 * (t.powi(4) - 2.0) + b
            }
            Easing::EaseInOutQuint => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * t.powi(5) + b;
                }
                let t = t - 2.0;
                c / 2.0 * (t.powi(5) + 2.0) + b
            }
            Easing::EaseInOutSine => -c / 2.0 * ((PI * t / d).cos() - 1.0) + b,
            Easing::EaseInOutExpo => {
                if t == 0.0 {
                    return b;
                }
                if t == d {
                    return b + c;
                }
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * 2f64.powf(10.0 * (t - 1.0)) + b;
                }
                let t = t - 1.0;
                c / 2.0 * (-(2f64.powf(-10.0 * t)) + 2.0) + b
            }
            Easing::EaseInOutCirc => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return -c / 2.0 * ((1.0 - t * t).sqrt() - 1.0) + b;
                }
                let t = t - 2.0;
                c / 2.0 * ((1.0 - t * t).sqrt() + 1.0) + b
            }
            Easing::EaseInOutElastic => {
                if t == 0.0 {
                    return b;
                }
                let t = t / (d / 2.0);
                if t == 2.0 {
                    return b + c;
                }
                let p = d * (1.0 - elastic_frequency(frequency) / 1000.0) * 1.5;
                let s = elastic_phase(c, p);
                if t < 1.0 {
                    let t = t - 1.0;
                    -0.5 * (c * 2f64.powf(10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin()) + b
                } else {
                    let t = t - 1.0;
                    c * 2f64.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin() * 0.5 + c + b
                }
            }
            Easing::EaseInOutBack => {
                let s = BACK_OVERSHOOT * 1.525;
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * (t * t * ((s + 1.0) * t - s)) + b;
                }
                let t = t - 2.0;
                c / 2.0 * (t * t * ((s + 1.0) * t + s) + 2.0) + b
            }
        }
    }
}

/// Frequency clamped to `[0, 999]`
fn elastic_frequency(frequency: Option<f64>) -> f64 {
    frequency
        .unwrap_or(DEFAULT_FREQUENCY)
        .clamp(0.0, MAX_FREQUENCY)
}

/// Phase shift of the elastic oscillation. The amplitude equals the change,
/// so the shift is a quarter period either way.
fn elastic_phase(c: f64, p: f64) -> f64 {
    let a = c;
    if a < c.abs() {
        p / 4.0
    } else {
        p / (2.0 * PI) * (c / a).asin()
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self> {
        Easing::ALL
            .iter()
            .copied()
            .find(|easing| easing.name() == s)
            .ok_or_else(|| AnimationError::UnknownEasing(s.to_string()))
    }
}

/// An easing plus its optional elastic frequency, parsed from
/// `"<name>"` or `"<name> <frequency>"`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EasingSpec {
    pub easing: Easing,
    pub frequency: Option<f64>,
}

impl EasingSpec {
    pub fn new(easing: Easing) -> Self {
        Self {
            easing,
            frequency: None,
        }
    }

    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Parse an easing option. A frequency is only recognized when the text
    /// ends in a digit.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if !text.ends_with(|c: char| c.is_ascii_digit()) {
            return Ok(Self::new(text.parse()?));
        }

        let mut parts = text.split_whitespace();
        let easing = parts.next().unwrap_or_default().parse()?;
        let frequency = match (parts.next(), parts.next()) {
            (Some(raw), None) => raw
                .parse::<f64>()
                .map_err(|_| AnimationError::UnknownEasing(text.to_string()))?,
            _ => return Err(AnimationError::UnknownEasing(text.to_string())),
        };

        Ok(Self::new(easing).with_frequency(frequency))
    }

    /// Value at elapsed time `t` for start `b`, change `c` and duration `d`
    pub fn apply(&self, t: f64, b: f64, c: f64, d: f64) -> f64 {
        self.easing.apply(t, b, c, d, self.frequency)
    }
}

impl FromStr for EasingSpec {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self> {
        EasingSpec::parse(s)
    }
}

impl fmt::Display for EasingSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.frequency {
            Some(frequency) => write!(f, "{} {}", self.easing, frequency),
            None => write!(f, "{}", self.easing),
        }
    }
}
