//! Card pools and slot rows.
//!
//! The board owns every live card. A card is always in exactly one place:
//! the pool of its side or one sub-slot of one row. Placing a card moves it,
//! and a row whose two sub-slots are both filled is resolved inside the same
//! call: a match consumes both cards, a mismatch sends both back to their
//! pools.

use crate::generator::{generate_level, generate_new_card, CardIdGenerator, LevelRules};
use crate::matching::evaluate_match;
use crate::scoring::{ComboUpdate, ScoreTracker};
use crate::types::{Card, CardColor, CardId, GameConfig, GameMode, Side};
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::Serialize;
use std::collections::HashSet;

/// Random source injected into a board.
pub type BoardRng = Box<dyn RngCore + Send>;

/// Two sub-slots where a left and a right card are juxtaposed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlotRow {
    pub left: Option<Card>,
    pub right: Option<Card>,
}

impl SlotRow {
    pub fn get(&self, side: Side) -> Option<&Card> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }

    fn slot_mut(&mut self, side: Side) -> &mut Option<Card> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    fn is_full(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

/// Where a live card currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardLocation {
    Pool { side: Side },
    Slot { row: usize, side: Side },
}

impl CardLocation {
    /// Side of the pool or sub-slot; always the side of the card held.
    pub fn side(&self) -> Side {
        match *self {
            Self::Pool { side } | Self::Slot { side, .. } => side,
        }
    }
}

/// Why an action changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    UnknownRow,
    UnknownCard,
    SideMismatch,
    SlotOccupied,
    NotInPool,
    FixedPool,
}

/// A consumed pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMatch {
    pub left: Card,
    pub right: Card,
    pub color: CardColor,
    pub combo: u32,
    pub max_combo: u32,
    /// Cards generated to replace the consumed pair.
    pub replacements: Vec<Card>,
}

/// Result of a placement or direct pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlaceOutcome {
    /// The card now sits in the sub-slot; the row is still waiting.
    Placed { card_id: CardId, row: usize, side: Side },
    Matched(ResolvedMatch),
    /// Both cards went back to their pools.
    Mismatched { left_id: CardId, right_id: CardId },
    Rejected { reason: RejectReason },
}

impl PlaceOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    fn rejected(reason: RejectReason) -> Self {
        Self::Rejected { reason }
    }
}

/// Pools, rows and score state of one level.
pub struct Board {
    rules: LevelRules,
    mode: GameMode,
    pair_count: usize,
    left_pool: Vec<Card>,
    right_pool: Vec<Card>,
    rows: Vec<SlotRow>,
    tracker: ScoreTracker,
    ids: CardIdGenerator,
    rng: BoardRng,
}

impl Board {
    /// Generate fresh pools for a level.
    pub fn new(rules: LevelRules, mode: GameMode, config: &GameConfig, mut rng: BoardRng) -> Self {
        let mut ids = CardIdGenerator::new(config.id_seed);
        let level = generate_level(&rules, config.pair_count, &mut ids, rng.as_mut());
        Self::assemble(rules, mode, config, level.left_cards, level.right_cards, ids, rng)
    }

    /// Build a board around existing pools. Ids for replenished cards continue
    /// after the largest id present.
    ///
    /// Cards listed in the wrong pool, and repeats of an id already seen, are
    /// dropped.
    pub fn with_pools(
        rules: LevelRules,
        mode: GameMode,
        config: &GameConfig,
        left_pool: Vec<Card>,
        right_pool: Vec<Card>,
        rng: BoardRng,
    ) -> Self {
        let mut seen = HashSet::new();
        let left_pool = keep_owned(left_pool, Side::Left, &mut seen);
        let right_pool = keep_owned(right_pool, Side::Right, &mut seen);
        let next_id = left_pool
            .iter()
            .chain(&right_pool)
            .map(|card| card.id + 1)
            .max()
            .unwrap_or(0)
            .max(config.id_seed);
        let ids = CardIdGenerator::new(next_id);
        Self::assemble(rules, mode, config, left_pool, right_pool, ids, rng)
    }

    fn assemble(
        rules: LevelRules,
        mode: GameMode,
        config: &GameConfig,
        left_pool: Vec<Card>,
        right_pool: Vec<Card>,
        ids: CardIdGenerator,
        rng: BoardRng,
    ) -> Self {
        Self {
            rules,
            mode,
            pair_count: config.pair_count,
            left_pool,
            right_pool,
            rows: vec![SlotRow::default(); config.row_count.max(1)],
            tracker: ScoreTracker::new(config.combo_window_ms).with_tasks(config.tasks.clone()),
            ids,
            rng,
        }
    }

    /// Move a card into a sub-slot, resolving the row if it becomes full.
    pub fn place(&mut self, card_id: CardId, row: usize, side: Side, now: DateTime<Utc>) -> PlaceOutcome {
        let Some(target) = self.rows.get(row) else {
            return PlaceOutcome::rejected(RejectReason::UnknownRow);
        };
        if target.get(side).is_some() {
            return PlaceOutcome::rejected(RejectReason::SlotOccupied);
        }
        let Some(location) = self.locate(card_id) else {
            return PlaceOutcome::rejected(RejectReason::UnknownCard);
        };
        if location.side() != side {
            return PlaceOutcome::rejected(RejectReason::SideMismatch);
        }
        let Some(card) = self.take(card_id, location) else {
            return PlaceOutcome::rejected(RejectReason::UnknownCard);
        };

        tracing::debug!(card_id, row, side = side.as_str(), "card placed");
        *self.rows[row].slot_mut(side) = Some(card);

        if self.rows[row].is_full() {
            self.resolve_row(row, now)
        } else {
            PlaceOutcome::Placed { card_id, row, side }
        }
    }

    /// Return a slotted card to its pool. `None` when the sub-slot was empty.
    pub fn withdraw(&mut self, row: usize, side: Side) -> Option<CardId> {
        let card = self.rows.get_mut(row)?.slot_mut(side).take()?;
        let card_id = card.id;
        tracing::debug!(card_id, row, side = side.as_str(), "card withdrawn");
        self.return_to_pool(card);
        Some(card_id)
    }

    /// Pair a left pool card with a right pool card without using a row.
    /// A mismatch leaves both cards where they were.
    pub fn pair_directly(&mut self, left_id: CardId, right_id: CardId, now: DateTime<Utc>) -> PlaceOutcome {
        let left_index = self.left_pool.iter().position(|card| card.id == left_id);
        let right_index = self.right_pool.iter().position(|card| card.id == right_id);
        let (Some(left_index), Some(right_index)) = (left_index, right_index) else {
            return PlaceOutcome::rejected(RejectReason::NotInPool);
        };

        let verdict = evaluate_match(&self.left_pool[left_index], &self.right_pool[right_index]);
        match verdict.score_color {
            Some(color) if verdict.is_match => {
                let left = self.left_pool.remove(left_index);
                let right = self.right_pool.remove(right_index);
                self.consume(left, right, color, now)
            }
            _ => PlaceOutcome::Mismatched { left_id, right_id },
        }
    }

    /// Empty every row back into the pools and reset combo state and history.
    /// Color scores are kept.
    pub fn clear(&mut self) {
        self.return_slotted_cards();
        self.tracker.reset_combo();
        self.tracker.clear_history();
        self.tracker.clear_completed_tasks();
        tracing::debug!("board cleared");
    }

    /// Replace both pools with a fresh generation. Not available in fixed mode.
    pub fn regenerate(&mut self) -> Result<(), RejectReason> {
        if !self.mode.replenishes() {
            return Err(RejectReason::FixedPool);
        }
        self.deal();
        tracing::info!(pair_count = self.pair_count, "pools regenerated");
        Ok(())
    }

    /// Empty the rows and replace both pools, whatever the mode.
    pub(crate) fn deal(&mut self) {
        for row in &mut self.rows {
            *row = SlotRow::default();
        }
        let level = generate_level(&self.rules, self.pair_count, &mut self.ids, self.rng.as_mut());
        self.left_pool = level.left_cards;
        self.right_pool = level.right_cards;
    }

    /// A largest set of disjoint matching pairs the two pools can still form,
    /// as `(left_id, right_id)`. Cards sitting in rows are not counted.
    ///
    /// Matching partitions cards into (value, color) classes, so pairing each
    /// left card with any unused partner is already maximal.
    pub fn best_pairing(&self) -> Vec<(CardId, CardId)> {
        let mut used = vec![false; self.right_pool.len()];
        let mut pairs = Vec::new();
        for left in &self.left_pool {
            let partner = self
                .right_pool
                .iter()
                .enumerate()
                .find(|(index, right)| !used[*index] && evaluate_match(left, right).is_match);
            if let Some((index, right)) = partner {
                used[index] = true;
                pairs.push((left.id, right.id));
            }
        }
        pairs
    }

    fn resolve_row(&mut self, row: usize, now: DateTime<Utc>) -> PlaceOutcome {
        let slot = std::mem::take(&mut self.rows[row]);
        let (Some(left), Some(right)) = (slot.left, slot.right) else {
            return PlaceOutcome::rejected(RejectReason::UnknownRow);
        };

        let verdict = evaluate_match(&left, &right);
        match verdict.score_color {
            Some(color) if verdict.is_match => self.consume(left, right, color, now),
            _ => {
                let outcome = PlaceOutcome::Mismatched {
                    left_id: left.id,
                    right_id: right.id,
                };
                tracing::debug!(left_id = left.id, right_id = right.id, row, "pair rejected");
                self.return_to_pool(left);
                self.return_to_pool(right);
                outcome
            }
        }
    }

    fn consume(&mut self, left: Card, right: Card, color: CardColor, now: DateTime<Utc>) -> PlaceOutcome {
        let ComboUpdate { combo, max_combo } = self
            .tracker
            .record_successful_match(left.clone(), right.clone(), color, now);
        let replacements = self.replenish();
        PlaceOutcome::Matched(ResolvedMatch {
            left,
            right,
            color,
            combo,
            max_combo,
            replacements,
        })
    }

    /// One new card per side in replenishing modes, nothing in fixed mode.
    fn replenish(&mut self) -> Vec<Card> {
        if !self.mode.replenishes() {
            return Vec::new();
        }
        let left = generate_new_card(&self.rules, Side::Left, &mut self.ids, self.rng.as_mut());
        let right = generate_new_card(&self.rules, Side::Right, &mut self.ids, self.rng.as_mut());
        self.left_pool.push(left.clone());
        self.right_pool.push(right.clone());
        vec![left, right]
    }

    fn return_slotted_cards(&mut self) {
        let rows = std::mem::take(&mut self.rows);
        let row_count = rows.len();
        for card in rows.into_iter().flat_map(|row| [row.left, row.right]).flatten() {
            self.return_to_pool(card);
        }
        self.rows = vec![SlotRow::default(); row_count];
    }

    fn return_to_pool(&mut self, card: Card) {
        self.pool_mut(card.side).push(card);
    }

    fn pool_mut(&mut self, side: Side) -> &mut Vec<Card> {
        match side {
            Side::Left => &mut self.left_pool,
            Side::Right => &mut self.right_pool,
        }
    }

    fn take(&mut self, card_id: CardId, location: CardLocation) -> Option<Card> {
        match location {
            CardLocation::Pool { side } => {
                let pool = self.pool_mut(side);
                let index = pool.iter().position(|card| card.id == card_id)?;
                Some(pool.remove(index))
            }
            CardLocation::Slot { row, side } => self.rows.get_mut(row)?.slot_mut(side).take(),
        }
    }

    /// Current location of a live card; `None` once consumed or unknown.
    pub fn locate(&self, card_id: CardId) -> Option<CardLocation> {
        if self.left_pool.iter().any(|card| card.id == card_id) {
            return Some(CardLocation::Pool { side: Side::Left });
        }
        if self.right_pool.iter().any(|card| card.id == card_id) {
            return Some(CardLocation::Pool { side: Side::Right });
        }
        self.rows.iter().enumerate().find_map(|(row, slot)| {
            [Side::Left, Side::Right]
                .into_iter()
                .find(|side| slot.get(*side).is_some_and(|card| card.id == card_id))
                .map(|side| CardLocation::Slot { row, side })
        })
    }

    /// Every live card id with its location.
    pub fn live_cards(&self) -> Vec<(CardId, CardLocation)> {
        let pools = self
            .left_pool
            .iter()
            .chain(&self.right_pool)
            .map(|card| (card.id, CardLocation::Pool { side: card.side }));
        let slots = self.rows.iter().enumerate().flat_map(|(row, slot)| {
            [Side::Left, Side::Right].into_iter().filter_map(move |side| {
                slot.get(side)
                    .map(|card| (card.id, CardLocation::Slot { row, side }))
            })
        });
        pools.chain(slots).collect()
    }

    pub fn left_pool(&self) -> &[Card] {
        &self.left_pool
    }

    pub fn right_pool(&self) -> &[Card] {
        &self.right_pool
    }

    pub fn pool(&self, side: Side) -> &[Card] {
        match side {
            Side::Left => &self.left_pool,
            Side::Right => &self.right_pool,
        }
    }

    pub fn rows(&self) -> &[SlotRow] {
        &self.rows
    }

    pub fn tracker(&self) -> &ScoreTracker {
        &self.tracker
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn rules(&self) -> &LevelRules {
        &self.rules
    }

    /// Fixed-mode board with nothing left to place.
    pub fn is_exhausted(&self) -> bool {
        self.left_pool.is_empty()
            && self.right_pool.is_empty()
            && self.rows.iter().all(SlotRow::is_empty)
    }
}

fn keep_owned(cards: Vec<Card>, side: Side, seen: &mut HashSet<CardId>) -> Vec<Card> {
    cards
        .into_iter()
        .filter(|card| {
            if card.side != side {
                tracing::warn!(card_id = card.id, side = side.as_str(), "card dropped from the wrong pool");
                return false;
            }
            if !seen.insert(card.id) {
                tracing::warn!(card_id = card.id, "duplicate card id dropped");
                return false;
            }
            true
        })
        .collect()
}
