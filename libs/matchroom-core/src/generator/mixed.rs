//! All four operations.

use super::additive::{addition, subtraction};
use super::multiplicative::{division, multiplication};
use super::{check_target, ExpressionGenerator};
use crate::error::Result;
use crate::expression::{Expression, Operator};
use rand::{Rng, RngCore};

const OPERATORS: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];

/// Uniform choice between the additive and multiplicative constructions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mixed;

impl ExpressionGenerator for Mixed {
    fn name(&self) -> &'static str {
        "mixed_operations"
    }

    fn operators(&self) -> &'static [Operator] {
        &OPERATORS
    }

    fn generate(&self, target: i64, bound: i64, rng: &mut dyn RngCore) -> Result<Expression> {
        check_target(target, bound)?;
        let expression = match OPERATORS[rng.random_range(0..OPERATORS.len())] {
            Operator::Add => addition(target, rng),
            Operator::Sub => subtraction(target, bound, rng),
            Operator::Mul => multiplication(target, bound, rng),
            Operator::Div => division(target, bound, rng),
        };
        Ok(expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn emits_every_operator() {
        let mut rng = StdRng::seed_from_u64(21);
        let seen: HashSet<Operator> = (0..200)
            .map(|_| Mixed.generate(6, 10, &mut rng).unwrap().op)
            .collect();
        assert_eq!(seen.len(), 4);
    }
}
