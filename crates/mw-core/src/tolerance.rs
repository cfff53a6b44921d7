/// Tolerances for comparing parametric positions and sample steps.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Relative tolerance, scaled by the smaller magnitude of the two operands
    pub relative: f64,
    /// Absolute tolerance used when one of the operands is (close to) zero
    pub absolute: f64,
}

impl Tolerance {
    pub const DEFAULT_RELATIVE: f64 = 1e-12;
    pub const DEFAULT_ABSOLUTE: f64 = 1e-12;

    pub fn new(relative: f64, absolute: f64) -> Self {
        Self { relative, absolute }
    }

    pub fn default_precision() -> Self {
        Self {
            relative: Self::DEFAULT_RELATIVE,
            absolute: Self::DEFAULT_ABSOLUTE,
        }
    }

    pub fn loose() -> Self {
        Self {
            relative: 1e-6,
            absolute: 1e-9,
        }
    }

    /// Check if two values are equal within tolerance.
    ///
    /// Values are compared relative to the smaller magnitude, so `1e6` and
    /// `1e6 + 1e-7` compare equal while `0.0` and `1e-7` do not.
    pub fn fuzzy_eq(self, a: f64, b: f64) -> bool {
        let diff = (a - b).abs();
        if diff <= self.absolute {
            return true;
        }
        diff <= self.relative * a.abs().min(b.abs())
    }

    /// Check if a value is zero within the absolute tolerance
    pub fn is_zero(self, v: f64) -> bool {
        v.abs() <= self.absolute
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_eq_relative() {
        let tol = Tolerance::default();
        assert!(tol.fuzzy_eq(0.3, 0.3 + 1e-15));
        assert!(tol.fuzzy_eq(1e6, 1e6 + 1e-7));
        assert!(!tol.fuzzy_eq(0.3, 0.5));
    }

    #[test]
    fn test_fuzzy_eq_near_zero() {
        let tol = Tolerance::default();
        assert!(tol.fuzzy_eq(0.0, 0.0));
        assert!(tol.fuzzy_eq(0.0, 1e-13));
        assert!(!tol.fuzzy_eq(0.0, 1e-7));
    }

    #[test]
    fn test_is_zero() {
        let tol = Tolerance::loose();
        assert!(tol.is_zero(1e-10));
        assert!(!tol.is_zero(1e-3));
    }

    #[test]
    fn test_deserialize_missing_fields_uses_defaults() {
        let tol: Tolerance = serde_json::from_str(r#"{ "relative": 1e-6 }"#).unwrap();
        assert_eq!(tol.relative, 1e-6);
        assert_eq!(tol.absolute, Tolerance::DEFAULT_ABSOLUTE);
    }
}
