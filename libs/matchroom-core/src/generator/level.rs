//! Card pool generation for a level.

use super::{get_generator, ExpressionGenerator, OperatorSet};
use crate::types::{Card, CardColor, CardId, Difficulty, Side};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Monotonic card id source owned by a board.
#[derive(Debug, Clone)]
pub struct CardIdGenerator {
    next: CardId,
}

impl CardIdGenerator {
    pub fn new(seed: CardId) -> Self {
        Self { next: seed }
    }

    pub fn next_id(&mut self) -> CardId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Id the next call to `next_id` will return.
    pub fn peek(&self) -> CardId {
        self.next
    }
}

/// Numeric constraints for one level of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRules {
    pub operators: OperatorSet,
    /// Largest operand and result.
    pub bound: i64,
    /// Smallest result a pair may evaluate to.
    pub min_result: i64,
}

impl LevelRules {
    /// Rules derived from the level's difficulty tier.
    pub fn for_level(level: u32, operators: OperatorSet) -> Self {
        let tier = Difficulty::for_level(level);
        Self::new(operators, tier.min_result(), tier.operand_bound())
    }

    /// Rules with the result range clamped into `0..=bound`.
    pub fn new(operators: OperatorSet, min_result: i64, bound: i64) -> Self {
        let bound = bound.max(0);
        Self {
            operators,
            bound,
            min_result: min_result.clamp(0, bound),
        }
    }

    fn draw_result(&self, rng: &mut dyn RngCore) -> i64 {
        rng.random_range(self.min_result..=self.bound)
    }
}

/// Left and right pools produced for a level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedLevel {
    pub left_cards: Vec<Card>,
    pub right_cards: Vec<Card>,
}

/// Generate `pair_count` value-matched pairs and shuffle each side.
///
/// Every left card has a right card of equal value in the batch. Colors are
/// drawn independently per side, so an equal-value pair need not share a color.
pub fn generate_level(
    rules: &LevelRules,
    pair_count: usize,
    ids: &mut CardIdGenerator,
    rng: &mut dyn RngCore,
) -> GeneratedLevel {
    let generator = get_generator(rules.operators);
    let mut left_cards = Vec::with_capacity(pair_count);
    let mut right_cards = Vec::with_capacity(pair_count);

    for _ in 0..pair_count {
        let target = rules.draw_result(rng);
        left_cards.push(build_card(generator.as_ref(), rules, target, Side::Left, ids, rng));
        right_cards.push(build_card(generator.as_ref(), rules, target, Side::Right, ids, rng));
    }

    left_cards.shuffle(rng);
    right_cards.shuffle(rng);

    tracing::debug!(
        pair_count,
        bound = rules.bound,
        operators = generator.name(),
        "generated card pools"
    );

    GeneratedLevel {
        left_cards,
        right_cards,
    }
}

/// Generate a single card with the same distribution as one side of a pair.
pub fn generate_new_card(
    rules: &LevelRules,
    side: Side,
    ids: &mut CardIdGenerator,
    rng: &mut dyn RngCore,
) -> Card {
    let generator = get_generator(rules.operators);
    let target = rules.draw_result(rng);
    build_card(generator.as_ref(), rules, target, side, ids, rng)
}

fn build_card(
    generator: &dyn ExpressionGenerator,
    rules: &LevelRules,
    target: i64,
    side: Side,
    ids: &mut CardIdGenerator,
    rng: &mut dyn RngCore,
) -> Card {
    let label = match generator.generate(target, rules.bound, rng) {
        Ok(expression) => expression.to_string(),
        Err(err) => {
            // Rules are clamped, so this only guards against a broken generator.
            tracing::warn!(%err, "falling back to literal label");
            target.to_string()
        }
    };
    let color = CardColor::ALL[rng.random_range(0..CardColor::ALL.len())];

    Card {
        id: ids.next_id(),
        side,
        color,
        label,
        value: target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::evaluate_label;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn rules() -> LevelRules {
        LevelRules::for_level(1, OperatorSet::AdditionSubtraction)
    }

    #[test]
    fn produces_requested_pair_count() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut ids = CardIdGenerator::new(2000);
        let level = generate_level(&rules(), 12, &mut ids, &mut rng);
        assert_eq!(level.left_cards.len(), 12);
        assert_eq!(level.right_cards.len(), 12);
        assert!(level.left_cards.iter().all(|c| c.side == Side::Left));
        assert!(level.right_cards.iter().all(|c| c.side == Side::Right));
    }

    #[test]
    fn every_left_value_has_a_right_partner() {
        let mut rng = StdRng::seed_from_u64(6);
        for level_id in 1..=10 {
            let mut ids = CardIdGenerator::new(1);
            let rules = LevelRules::for_level(level_id, OperatorSet::Mixed);
            let level = generate_level(&rules, 12, &mut ids, &mut rng);

            let mut right_values: Vec<i64> = level.right_cards.iter().map(|c| c.value).collect();
            let mut left_values: Vec<i64> = level.left_cards.iter().map(|c| c.value).collect();
            right_values.sort_unstable();
            left_values.sort_unstable();
            assert_eq!(left_values, right_values);
        }
    }

    #[test]
    fn labels_evaluate_to_cached_values() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut ids = CardIdGenerator::new(1);
        let rules = LevelRules::for_level(9, OperatorSet::MultiplicationDivision);
        let level = generate_level(&rules, 30, &mut ids, &mut rng);
        for card in level.left_cards.iter().chain(&level.right_cards) {
            assert_eq!(evaluate_label(&card.label), Some(card.value), "{}", card.label);
            assert!((rules.min_result..=rules.bound).contains(&card.value));
        }
    }

    #[test]
    fn ids_are_unique_across_generations() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut ids = CardIdGenerator::new(2000);
        let level = generate_level(&rules(), 12, &mut ids, &mut rng);
        let extra = generate_new_card(&rules(), Side::Left, &mut ids, &mut rng);

        let all: HashSet<CardId> = level
            .left_cards
            .iter()
            .chain(&level.right_cards)
            .map(|c| c.id)
            .chain(std::iter::once(extra.id))
            .collect();
        assert_eq!(all.len(), 25);
        assert_eq!(ids.peek(), 2025);
    }

    #[test]
    fn same_seed_reproduces_pools() {
        let make = || {
            let mut rng = StdRng::seed_from_u64(42);
            let mut ids = CardIdGenerator::new(2000);
            generate_level(&rules(), 12, &mut ids, &mut rng)
        };
        assert_eq!(make().left_cards, make().left_cards);
    }

    #[test]
    fn rules_clamp_result_range() {
        let rules = LevelRules::new(OperatorSet::AdditionSubtraction, 50, 10);
        assert_eq!(rules.min_result, 10);
        assert_eq!(rules.bound, 10);
    }
}
