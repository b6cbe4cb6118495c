//! Numerically safe primitives and the fixed operator table.
//!
//! Every primitive is total over finite inputs: results are clamped into
//! `[-f64::MAX, f64::MAX]` instead of overflowing, division by zero yields
//! zero, and the exponent is capped before `exp` can overflow.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Largest argument for which `exp` stays finite.
pub const EXP_LIMIT: f64 = 709.0;

/// Bound a raw result into the finite range.
///
/// Infinities saturate to the bound of the same sign. NaN can only come from
/// non-finite operands and collapses to zero.
#[inline]
fn clamp_finite(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-f64::MAX, f64::MAX)
    }
}

/// Addition clamped to the finite range.
#[must_use]
#[inline]
pub fn safe_add(x: f64, y: f64) -> f64 {
    clamp_finite(x + y)
}

/// Subtraction clamped to the finite range.
#[must_use]
#[inline]
pub fn safe_sub(x: f64, y: f64) -> f64 {
    clamp_finite(x - y)
}

/// Multiplication clamped to the finite range.
#[must_use]
#[inline]
pub fn safe_mul(x: f64, y: f64) -> f64 {
    clamp_finite(x * y)
}

/// Protected division: `x / 0` is `0`.
#[must_use]
#[inline]
pub fn safe_div(x: f64, y: f64) -> f64 {
    if y == 0.0 {
        return 0.0;
    }
    clamp_finite(x / y)
}

/// Exponential with the argument capped at [`EXP_LIMIT`].
#[must_use]
#[inline]
pub fn safe_exp(x: f64) -> f64 {
    clamp_finite(x.min(EXP_LIMIT).exp())
}

/// Square that saturates at `f64::MAX` instead of overflowing.
#[must_use]
#[inline]
pub fn safe_sqr(x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    if x.abs() > f64::MAX.sqrt() {
        return f64::MAX;
    }
    x * x
}

/// An operator available to expression trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Binary addition.
    Add,
    /// Binary subtraction.
    Sub,
    /// Binary multiplication.
    Mul,
    /// Binary protected division.
    Div,
    /// Unary exponential.
    Exp,
}

impl Operator {
    /// Every operator, in table order.
    pub const ALL: [Self; 5] = [Self::Add, Self::Sub, Self::Mul, Self::Div, Self::Exp];

    /// Text symbol used when rendering.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Exp => "exp",
        }
    }

    /// Number of operands.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Add | Self::Sub | Self::Mul | Self::Div => 2,
            Self::Exp => 1,
        }
    }

    /// Relative probability mass for random construction.
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Self::Add | Self::Sub | Self::Mul | Self::Div => 1.0,
            Self::Exp => 0.5,
        }
    }

    /// Look up an operator by its rendered symbol.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Apply the operator to already evaluated operands.
    ///
    /// Returns `None` when the operand count differs from [`Self::arity`].
    #[must_use]
    pub fn apply(self, args: &[f64]) -> Option<f64> {
        match (self, args) {
            (Self::Add, &[x, y]) => Some(safe_add(x, y)),
            (Self::Sub, &[x, y]) => Some(safe_sub(x, y)),
            (Self::Mul, &[x, y]) => Some(safe_mul(x, y)),
            (Self::Div, &[x, y]) => Some(safe_div(x, y)),
            (Self::Exp, &[x]) => Some(safe_exp(x)),
            _ => None,
        }
    }

    /// Pick an operator with probability proportional to its weight.
    #[must_use]
    pub fn choose_weighted<R: Rng>(rng: &mut R) -> Self {
        let total: f64 = Self::ALL.iter().map(|op| op.weight()).sum();
        let mut spin = rng.gen_range(0.0..total);

        for op in Self::ALL {
            if spin < op.weight() {
                return op;
            }
            spin -= op.weight();
        }

        // Rounding can leave a sliver past the last bucket
        Self::Exp
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_division_by_zero_is_zero() {
        assert!(safe_div(5.0, 0.0).abs() < f64::EPSILON);
        assert!(safe_div(-f64::MAX, 0.0).abs() < f64::EPSILON);
        assert!(safe_div(0.0, -0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overflow_saturates() {
        assert!((safe_add(f64::MAX, f64::MAX) - f64::MAX).abs() < f64::EPSILON);
        assert!((safe_sub(-f64::MAX, f64::MAX) + f64::MAX).abs() < f64::EPSILON);
        assert!((safe_mul(f64::MAX, -2.0) + f64::MAX).abs() < f64::EPSILON);
        assert!((safe_div(f64::MAX, 1e-300) - f64::MAX).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exp_is_capped() {
        assert!(safe_exp(1e9).is_finite());
        assert!((safe_exp(0.0) - 1.0).abs() < f64::EPSILON);
        assert!(safe_exp(-1e9) >= 0.0);
    }

    #[test]
    fn test_sqr_saturates() {
        assert!((safe_sqr(3.0) - 9.0).abs() < f64::EPSILON);
        assert!((safe_sqr(1e200) - f64::MAX).abs() < f64::EPSILON);
        assert!((safe_sqr(-1e200) - f64::MAX).abs() < f64::EPSILON);
    }

    #[test]
    fn test_table_metadata() {
        assert_eq!(Operator::Add.arity(), 2);
        assert_eq!(Operator::Exp.arity(), 1);
        assert!((Operator::Exp.weight() - 0.5).abs() < f64::EPSILON);
        assert_eq!(Operator::from_symbol("*"), Some(Operator::Mul));
        assert_eq!(Operator::from_symbol("sin"), None);
    }

    #[test]
    fn test_apply_checks_operand_count() {
        assert_eq!(Operator::Add.apply(&[1.0, 2.0]), Some(3.0));
        assert_eq!(Operator::Add.apply(&[1.0]), None);
        assert_eq!(Operator::Exp.apply(&[0.0, 1.0]), None);
    }

    #[test]
    fn test_weighted_choice_follows_weights() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut exp_count = 0usize;
        let mut add_count = 0usize;

        for _ in 0..9000 {
            match Operator::choose_weighted(&mut rng) {
                Operator::Exp => exp_count += 1,
                Operator::Add => add_count += 1,
                _ => {}
            }
        }

        // Expected 1000 vs 2000
        assert!(exp_count > 700 && exp_count < 1300, "exp chosen {exp_count} times");
        assert!(add_count > exp_count);
    }
}
