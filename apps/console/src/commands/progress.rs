//! Theme catalog and progress commands.

use super::{lock, CommandError};
use crate::state::AppState;
use matchroom_core::{create_themes, find_theme, GameProgress, Theme};

/// All themes with unlock state from saved progress.
pub fn list_themes(state: &AppState) -> Result<Vec<Theme>, CommandError> {
    let progress = lock(&state.progress)?;
    Ok(create_themes(progress.progress()))
}

/// One theme and its levels.
pub fn get_theme(state: &AppState, theme_id: &str) -> Result<Theme, CommandError> {
    let progress = lock(&state.progress)?;
    find_theme(theme_id, progress.progress()).map_err(Into::into)
}

/// Raw completion flags of every played theme.
pub fn get_progress(state: &AppState) -> Result<GameProgress, CommandError> {
    let progress = lock(&state.progress)?;
    Ok(progress.progress().clone())
}
