//! Gameplay commands.

use super::{lock, CommandError};
use crate::state::AppState;
use chrono::Utc;
use matchroom_core::{
    find_theme, ActionReport, CardId, GameMode, GameSession, MatchRecord, NavigationIntent,
    SessionSnapshot, Side,
};
use std::sync::MutexGuard;

fn parse_side(raw: &str) -> Result<Side, CommandError> {
    Side::from_str(raw).ok_or_else(|| CommandError::new(format!("unknown side: {raw}")))
}

fn parse_mode(raw: &str) -> Result<GameMode, CommandError> {
    GameMode::from_str(raw).ok_or_else(|| CommandError::new(format!("unknown mode: {raw}")))
}

fn active<'a>(
    guard: &'a mut MutexGuard<'_, Option<GameSession>>,
) -> Result<&'a mut GameSession, CommandError> {
    guard
        .as_mut()
        .ok_or_else(|| CommandError::new("no level in progress"))
}

/// Start a level, replacing any session in progress. Locked levels are refused.
pub fn start_level(
    state: &AppState,
    theme_id: &str,
    level_id: u32,
    mode: Option<&str>,
) -> Result<SessionSnapshot, CommandError> {
    let mode = mode.map(parse_mode).transpose()?;
    let mut session = lock(&state.session)?;
    let theme = {
        let progress = lock(&state.progress)?;
        find_theme(theme_id, progress.progress())?
    };

    if !theme.level(level_id)?.unlocked {
        return Err(CommandError::new(format!(
            "level {level_id} of {theme_id} is locked"
        )));
    }

    let now = Utc::now();
    let started = GameSession::start(&theme, level_id, mode, &state.config, state.board_rng(), now)?;
    let snapshot = started.snapshot(now);
    *session = Some(started);
    Ok(snapshot)
}

/// Drop a pool card (or move a slotted card) into a row's sub-slot.
pub fn place_card(
    state: &AppState,
    card_id: CardId,
    row: usize,
    side: &str,
) -> Result<ActionReport, CommandError> {
    let side = parse_side(side)?;
    let mut session = lock(&state.session)?;
    let session = active(&mut session)?;
    let mut progress = lock(&state.progress)?;
    Ok(session.place(card_id, row, side, Utc::now(), &mut *progress))
}

/// Return a slotted card to its pool.
pub fn withdraw_card(
    state: &AppState,
    row: usize,
    side: &str,
) -> Result<Option<CardId>, CommandError> {
    let side = parse_side(side)?;
    let mut session = lock(&state.session)?;
    Ok(active(&mut session)?.withdraw(row, side))
}

/// Pair a left pool card directly with a right pool card.
pub fn pair_cards(
    state: &AppState,
    left_id: CardId,
    right_id: CardId,
) -> Result<ActionReport, CommandError> {
    let mut session = lock(&state.session)?;
    let session = active(&mut session)?;
    let mut progress = lock(&state.progress)?;
    Ok(session.pair_directly(left_id, right_id, Utc::now(), &mut *progress))
}

pub fn clear_board(state: &AppState) -> Result<SessionSnapshot, CommandError> {
    let mut session = lock(&state.session)?;
    let session = active(&mut session)?;
    session.clear();
    Ok(session.snapshot(Utc::now()))
}

/// Regenerate both pools. Refused in fixed mode.
pub fn refresh_pools(state: &AppState) -> Result<SessionSnapshot, CommandError> {
    let mut session = lock(&state.session)?;
    let session = active(&mut session)?;
    let now = Utc::now();
    session.regenerate_pools(now)?;
    Ok(session.snapshot(now))
}

pub fn get_game_state(state: &AppState) -> Result<SessionSnapshot, CommandError> {
    let mut session = lock(&state.session)?;
    Ok(active(&mut session)?.snapshot(Utc::now()))
}

pub fn get_match_history(state: &AppState) -> Result<Vec<MatchRecord>, CommandError> {
    let mut session = lock(&state.session)?;
    Ok(active(&mut session)?.history().to_vec())
}

pub fn continue_to_next_level(state: &AppState) -> Result<NavigationIntent, CommandError> {
    let mut session = lock(&state.session)?;
    Ok(active(&mut session)?.continue_to_next_level())
}

/// Leave the level. The session is dropped.
pub fn back_to_theme_select(state: &AppState) -> Result<NavigationIntent, CommandError> {
    let mut session = lock(&state.session)?;
    let intent = active(&mut session)?.back_to_theme_select();
    *session = None;
    Ok(intent)
}
