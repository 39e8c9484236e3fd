//! Easing curves that shape entity fades.
//!
//! A fade progress in `[0, 1]` is mapped through one of these curves to get
//! the alpha and scale an entity is drawn with.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Easing function variants for fade curves.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case", tag = "curve")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-in (slow start, fast end).
    QuadraticIn,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Square root ease-out (fast start, gradual slow).
    SqrtOut,
    /// Cubic Hermite interpolation with configurable control points.
    /// Formula: c1·3t(1-t)² + c2·3(1-t)t² + t³
    CubicHermite {
        /// First control point.
        c1: f32,
        /// Second control point.
        c2: f32,
    },
}

impl EasingFunction {
    /// CubicHermite with c1=0.33, c2=1.0: a soft ease-out.
    pub const DEFAULT: EasingFunction =
        EasingFunction::CubicHermite { c1: 0.33, c2: 1.0 };

    /// Evaluate the curve at `t`, clamped to `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::QuadraticIn => t * t,
            EasingFunction::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            EasingFunction::SqrtOut => t.sqrt(),
            EasingFunction::CubicHermite { c1, c2 } => {
                let omt = 1.0 - t;
                c1 * 3.0 * t * omt * omt + c2 * 3.0 * omt * t * t + t * t * t
            }
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingFunction; 5] = [
        EasingFunction::Linear,
        EasingFunction::QuadraticIn,
        EasingFunction::QuadraticOut,
        EasingFunction::SqrtOut,
        EasingFunction::DEFAULT,
    ];

    #[test]
    fn every_curve_pins_endpoints() {
        for curve in ALL {
            assert_eq!(curve.evaluate(0.0), 0.0, "{curve:?}");
            assert!((curve.evaluate(1.0) - 1.0).abs() < 1e-6, "{curve:?}");
        }
    }

    #[test]
    fn input_is_clamped() {
        for curve in ALL {
            assert_eq!(curve.evaluate(-3.0), 0.0);
            assert!((curve.evaluate(7.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn default_eases_out() {
        assert!(EasingFunction::default().evaluate(0.25) > 0.25);
        assert_eq!(EasingFunction::QuadraticOut.evaluate(0.5), 0.75);
        assert_eq!(EasingFunction::QuadraticIn.evaluate(0.5), 0.25);
    }

    #[test]
    fn curves_are_monotonic_on_unit_interval() {
        for curve in ALL {
            let mut prev = 0.0;
            for step in 1..=20 {
                let y = curve.evaluate(step as f32 / 20.0);
                assert!(y + 1e-6 >= prev, "{curve:?} dipped at step {step}");
                prev = y;
            }
        }
    }

    #[test]
    fn serializes_with_curve_tag() {
        let json = serde_json::to_string(&EasingFunction::SqrtOut).unwrap();
        assert_eq!(json, r#"{"curve":"sqrt_out"}"#);
        let back: EasingFunction = serde_json::from_str(
            r#"{"curve":"cubic_hermite","c1":0.5,"c2":0.9}"#,
        )
        .unwrap();
        assert_eq!(back, EasingFunction::CubicHermite { c1: 0.5, c2: 0.9 });
    }
}
