//! Multiplication and exact division within a bound.

use super::{check_target, ExpressionGenerator};
use crate::error::Result;
use crate::expression::{Expression, Operator};
use rand::{Rng, RngCore};

/// `a × b` and `a ÷ b` with both operands in `0..=bound`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Multiplicative;

impl ExpressionGenerator for Multiplicative {
    fn name(&self) -> &'static str {
        "multiplication_division"
    }

    fn operators(&self) -> &'static [Operator] {
        &[Operator::Mul, Operator::Div]
    }

    fn generate(&self, target: i64, bound: i64, rng: &mut dyn RngCore) -> Result<Expression> {
        check_target(target, bound)?;
        if rng.random_bool(0.5) {
            Ok(multiplication(target, bound, rng))
        } else {
            Ok(division(target, bound, rng))
        }
    }
}

/// Factor pair of `target`, chosen uniformly among pairs with both factors
/// in `0..=bound`.
pub(crate) fn multiplication(target: i64, bound: i64, rng: &mut dyn RngCore) -> Expression {
    if target == 0 {
        let other = rng.random_range(0..=bound);
        return if rng.random_bool(0.5) {
            Expression::new(other, Operator::Mul, 0)
        } else {
            Expression::new(0, Operator::Mul, other)
        };
    }

    // 1 and target always qualify since target <= bound
    let factors: Vec<i64> = (1..=target)
        .filter(|f| target % f == 0 && target / f <= bound)
        .collect();
    let lhs = factors[rng.random_range(0..factors.len())];
    Expression::new(lhs, Operator::Mul, target / lhs)
}

/// Divisor uniform among values keeping the dividend within `bound`.
pub(crate) fn division(target: i64, bound: i64, rng: &mut dyn RngCore) -> Expression {
    let max_divisor = if target == 0 { bound } else { bound / target };
    let divisor = rng.random_range(1..=max_divisor.max(1));
    Expression::new(target * divisor, Operator::Div, divisor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn operands_stay_within_bound() {
        let mut rng = StdRng::seed_from_u64(11);
        for target in 0..=20 {
            for _ in 0..20 {
                let expr = Multiplicative.generate(target, 20, &mut rng).unwrap();
                assert!((0..=20).contains(&expr.lhs), "{expr}");
                assert!((0..=20).contains(&expr.rhs), "{expr}");
                assert_eq!(expr.value(), Some(target), "{expr}");
            }
        }
    }

    #[test]
    fn division_never_divides_by_zero() {
        let mut rng = StdRng::seed_from_u64(12);
        for target in 0..=10 {
            let expr = division(target, 10, &mut rng);
            assert!(expr.rhs >= 1);
        }
    }

    #[test]
    fn prime_target_uses_unit_factor() {
        let mut rng = StdRng::seed_from_u64(13);
        let expr = multiplication(7, 10, &mut rng);
        assert!(expr == Expression::new(1, Operator::Mul, 7) || expr == Expression::new(7, Operator::Mul, 1));
    }
}
