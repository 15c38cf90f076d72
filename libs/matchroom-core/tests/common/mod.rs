//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use matchroom_core::{
    generate_level, Board, BoardRng, Card, CardColor, CardIdGenerator, GameConfig, GameMode,
    LevelRules, OperatorSet, ProgressRecorder, Result, Side,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Fixed reference instant.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
}

pub fn seeded(seed: u64) -> BoardRng {
    Box::new(StdRng::seed_from_u64(seed))
}

pub fn addition_rules() -> LevelRules {
    LevelRules::new(OperatorSet::AdditionSubtraction, 0, 10)
}

/// Generated 12-pair pools where the first left and first right card are
/// overwritten with a known pair: `3 + 4` and `9 - 2`, colored as requested.
pub fn board_with_sevens(mode: GameMode, right_color: CardColor) -> (Board, Card, Card) {
    let config = GameConfig::default();
    let mut rng = StdRng::seed_from_u64(77);
    let mut ids = CardIdGenerator::new(config.id_seed);
    let mut level = generate_level(&addition_rules(), config.pair_count, &mut ids, &mut rng);

    let left = Card {
        id: level.left_cards[0].id,
        side: Side::Left,
        color: CardColor::Red,
        label: "3 + 4".to_string(),
        value: 7,
    };
    let right = Card {
        id: level.right_cards[0].id,
        side: Side::Right,
        color: right_color,
        label: "9 - 2".to_string(),
        value: 7,
    };
    level.left_cards[0] = left.clone();
    level.right_cards[0] = right.clone();

    let board = Board::with_pools(
        addition_rules(),
        mode,
        &config,
        level.left_cards,
        level.right_cards,
        seeded(78),
    );
    (board, left, right)
}

/// Progress recorder that only counts writes.
#[derive(Debug, Default)]
pub struct CountingRecorder {
    pub calls: Vec<(String, usize, bool)>,
}

impl ProgressRecorder for CountingRecorder {
    fn update_progress(&mut self, theme_id: &str, level_index: usize, completed: bool) -> Result<()> {
        self.calls.push((theme_id.to_string(), level_index, completed));
        Ok(())
    }
}
