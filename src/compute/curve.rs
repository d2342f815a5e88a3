//! Trait curves.
//!
//! A trait curve maps a normalized input in `[0, 1]` onto `[min, max]`. Genome
//! bytes are turned into simulation parameters by sampling a curve with
//! `byte / 255`, so every curve must be pure: the same input always produces
//! the same bits.

use serde::{Deserialize, Serialize};

/// The shape of a trait curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CurveShape {
    /// Straight interpolation from min to max.
    Linear,
    /// `x^power`.
    Power {
        /// Exponent applied to the input.
        power: f32,
    },
    /// S-shaped curve that lingers around a plateau value.
    Plateau {
        /// Plateau width factor in `[0, inf)`.
        width: f32,
        /// Exponent solved so that `sample(0.5)` equals the plateau value.
        power: f32,
    },
    /// Saturating growth that approaches max quickly and flattens out.
    Inverse {
        /// Growth rate, higher rates saturate earlier.
        rate: f32,
    },
    /// Normalized logistic curve.
    Sigmoid {
        /// Logistic steepness around `x = 0.5`.
        steepness: f32,
    },
}

/// A bounded, pure function from `[0, 1]` to `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitCurve {
    /// Output at `x = 0`.
    pub min: f32,
    /// Output at `x = 1`.
    pub max: f32,
    /// Curve shape.
    pub shape: CurveShape,
}

impl TraitCurve {
    /// Linear curve.
    pub const fn linear(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            shape: CurveShape::Linear,
        }
    }

    /// Power curve: `min + (max - min) * x^power`.
    pub const fn power(min: f32, max: f32, power: f32) -> Self {
        Self {
            min,
            max,
            shape: CurveShape::Power { power },
        }
    }

    /// Plateau curve passing through `plateau` at `x = 0.5`.
    ///
    /// The exponent is solved from `(plateau - min) / (max - min) = 0.5^power`.
    pub fn plateau(min: f32, plateau: f32, max: f32, width: f32) -> Self {
        let power = ((plateau - min) / (max - min)).ln() / 0.5f32.ln();

        Self {
            min,
            max,
            shape: CurveShape::Plateau { width, power },
        }
    }

    /// Inverse (saturating) curve.
    pub const fn inverse(min: f32, max: f32, rate: f32) -> Self {
        Self {
            min,
            max,
            shape: CurveShape::Inverse { rate },
        }
    }

    /// Sigmoid curve.
    pub const fn sigmoid(min: f32, max: f32, steepness: f32) -> Self {
        Self {
            min,
            max,
            shape: CurveShape::Sigmoid { steepness },
        }
    }

    /// Width of the output range.
    #[inline]
    pub fn domain(&self) -> f32 {
        self.max - self.min
    }

    /// Sample the curve. Inputs outside `[0, 1]` are clamped first.
    pub fn sample(&self, x: f32) -> f32 {
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
        let unit = match self.shape {
            CurveShape::Linear => x,
            CurveShape::Power { power } => x.powf(power),
            CurveShape::Plateau { width, power } => {
                let at = x - 0.5;
                let multiplier = (1.0 - (std::f32::consts::PI * x).sin()).max(0.0).powf(width);

                (4.0 * at * at * at * multiplier + 0.5)
                    .clamp(0.0, 1.0)
                    .powf(power)
            }
            CurveShape::Inverse { rate } => {
                if rate <= 0.0 {
                    x
                } else {
                    (1.0 - 1.0 / (1.0 + rate * x)) / (1.0 - 1.0 / (1.0 + rate))
                }
            }
            CurveShape::Sigmoid { steepness } => {
                if steepness <= 0.0 {
                    x
                } else {
                    let logistic = |v: f32| 1.0 / (1.0 + (-steepness * (v - 0.5)).exp());
                    let low = logistic(0.0);

                    (logistic(x) - low) / (logistic(1.0) - low)
                }
            }
        };

        let value = self.min + self.domain() * unit;

        value.clamp(self.min.min(self.max), self.min.max(self.max))
    }

    /// Check that the curve produces finite values over its whole input range.
    pub fn is_valid(&self) -> bool {
        if !self.min.is_finite() || !self.max.is_finite() {
            return false;
        }

        match self.shape {
            CurveShape::Linear => true,
            CurveShape::Power { power } => power.is_finite() && power > 0.0,
            CurveShape::Plateau { width, power } => {
                width.is_finite() && width >= 0.0 && power.is_finite() && power > 0.0
            }
            CurveShape::Inverse { rate } => rate.is_finite() && rate >= 0.0,
            CurveShape::Sigmoid { steepness } => steepness.is_finite() && steepness >= 0.0,
        }
    }
}
