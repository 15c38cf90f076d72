//! Addition and subtraction within a bound.

use super::{check_target, ExpressionGenerator};
use crate::error::Result;
use crate::expression::{Expression, Operator};
use rand::{Rng, RngCore};

/// `a + b` and `a - b` with both operands in `0..=bound`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Additive;

impl ExpressionGenerator for Additive {
    fn name(&self) -> &'static str {
        "addition_subtraction"
    }

    fn operators(&self) -> &'static [Operator] {
        &[Operator::Add, Operator::Sub]
    }

    fn generate(&self, target: i64, bound: i64, rng: &mut dyn RngCore) -> Result<Expression> {
        check_target(target, bound)?;
        if rng.random_bool(0.5) {
            Ok(addition(target, rng))
        } else {
            Ok(subtraction(target, bound, rng))
        }
    }
}

/// First operand uniform in `0..=target`, second is the remainder.
pub(crate) fn addition(target: i64, rng: &mut dyn RngCore) -> Expression {
    let lhs = rng.random_range(0..=target);
    Expression::new(lhs, Operator::Add, target - lhs)
}

/// First operand uniform in `target..=bound`, second is the difference.
pub(crate) fn subtraction(target: i64, bound: i64, rng: &mut dyn RngCore) -> Expression {
    let lhs = rng.random_range(target..=bound);
    Expression::new(lhs, Operator::Sub, lhs - target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn operands_stay_within_bound() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let target = rng.random_range(0..=10);
            let expr = Additive.generate(target, 10, &mut rng).unwrap();
            assert!((0..=10).contains(&expr.lhs), "{expr}");
            assert!((0..=10).contains(&expr.rhs), "{expr}");
            assert_eq!(expr.value(), Some(target));
        }
    }

    #[test]
    fn both_operators_appear() {
        let mut rng = StdRng::seed_from_u64(2);
        let ops: Vec<Operator> = (0..100)
            .map(|_| Additive.generate(5, 10, &mut rng).unwrap().op)
            .collect();
        assert!(ops.contains(&Operator::Add));
        assert!(ops.contains(&Operator::Sub));
    }

    #[test]
    fn edge_targets() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(subtraction(10, 10, &mut rng), Expression::new(10, Operator::Sub, 0));
        assert_eq!(addition(0, &mut rng), Expression::new(0, Operator::Add, 0));
    }
}
