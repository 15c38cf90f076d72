//! Expression and level generation.

pub mod additive;
pub mod level;
pub mod mixed;
pub mod multiplicative;

use crate::error::{GameError, Result};
use crate::expression::{Expression, Operator};
use rand::RngCore;
use serde::{Deserialize, Serialize};

pub use level::{generate_level, generate_new_card, CardIdGenerator, GeneratedLevel, LevelRules};

/// Operator vocabulary of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorSet {
    AdditionSubtraction,
    MultiplicationDivision,
    Mixed,
}

/// Builds an expression evaluating to an exact target.
pub trait ExpressionGenerator: Send + Sync {
    /// Generator identifier.
    fn name(&self) -> &'static str;

    /// Operators this generator may emit.
    fn operators(&self) -> &'static [Operator];

    /// Build an expression whose value is `target`, with every operand in
    /// `0..=bound`. Fails when `target` itself is outside `0..=bound`.
    fn generate(&self, target: i64, bound: i64, rng: &mut dyn RngCore) -> Result<Expression>;
}

/// Get the generator for an operator set.
pub fn get_generator(operators: OperatorSet) -> Box<dyn ExpressionGenerator> {
    match operators {
        OperatorSet::AdditionSubtraction => Box::new(additive::Additive),
        OperatorSet::MultiplicationDivision => Box::new(multiplicative::Multiplicative),
        OperatorSet::Mixed => Box::new(mixed::Mixed),
    }
}

/// Produce a card label and its value for `target`.
pub fn generate_value_label(
    target: i64,
    operators: OperatorSet,
    bound: i64,
    rng: &mut dyn RngCore,
) -> Result<(String, i64)> {
    let expression = get_generator(operators).generate(target, bound, rng)?;
    Ok((expression.to_string(), target))
}

fn check_target(target: i64, bound: i64) -> Result<()> {
    if target < 0 || target > bound {
        return Err(GameError::TargetOutOfRange { target, bound });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::evaluate_label;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn label_evaluates_to_target_for_every_set() {
        let mut rng = StdRng::seed_from_u64(7);
        for operators in [
            OperatorSet::AdditionSubtraction,
            OperatorSet::MultiplicationDivision,
            OperatorSet::Mixed,
        ] {
            for target in 0..=20 {
                let (label, value) = generate_value_label(target, operators, 20, &mut rng).unwrap();
                assert_eq!(value, target);
                assert_eq!(evaluate_label(&label), Some(target), "{label}");
            }
        }
    }

    #[test]
    fn out_of_range_target_is_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        let err = generate_value_label(11, OperatorSet::AdditionSubtraction, 10, &mut rng);
        assert!(matches!(
            err,
            Err(GameError::TargetOutOfRange { target: 11, bound: 10 })
        ));
        assert!(generate_value_label(-1, OperatorSet::Mixed, 10, &mut rng).is_err());
    }

    #[test]
    fn generator_names() {
        assert_eq!(get_generator(OperatorSet::AdditionSubtraction).name(), "addition_subtraction");
        assert_eq!(get_generator(OperatorSet::Mixed).operators().len(), 4);
    }
}
