//! Line-oriented command driver.
//!
//! Each input line is one command; each reply is one JSON line, either the
//! command's result or `{"message": "..."}` on failure.

use crate::commands::{self, CommandError};
use crate::state::AppState;
use matchroom_core::{CardId, NavigationIntent};
use serde::Serialize;
use serde_json::{json, Value};

pub const HELP: &str = "\
themes | theme <id> | progress
start <theme> <level> [fixed|refresh|infinite]
place <card> <row> <left|right> | withdraw <row> <left|right> | pair <left> <right>
clear | refresh | state | history | next | back | help | quit";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Themes,
    Theme { theme_id: String },
    Progress,
    Start { theme_id: String, level_id: u32, mode: Option<String> },
    Place { card_id: CardId, row: usize, side: String },
    Withdraw { row: usize, side: String },
    Pair { left_id: CardId, right_id: CardId },
    Clear,
    Refresh,
    State,
    History,
    Next,
    Back,
    Help,
    Quit,
}

fn arg<'a>(parts: &[&'a str], index: usize, name: &str) -> Result<&'a str, CommandError> {
    parts
        .get(index)
        .copied()
        .ok_or_else(|| CommandError::new(format!("missing argument: {name}")))
}

fn number<T: std::str::FromStr>(parts: &[&str], index: usize, name: &str) -> Result<T, CommandError> {
    let raw = arg(parts, index, name)?;
    raw.parse()
        .map_err(|_| CommandError::new(format!("{name} must be a number, got {raw}")))
}

/// Parse one line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, _)) = parts.split_first() else {
        return Ok(None);
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "themes" => Command::Themes,
        "theme" => Command::Theme {
            theme_id: arg(&parts, 1, "theme")?.to_string(),
        },
        "progress" => Command::Progress,
        "start" => Command::Start {
            theme_id: arg(&parts, 1, "theme")?.to_string(),
            level_id: number(&parts, 2, "level")?,
            mode: parts.get(3).map(|mode| mode.to_string()),
        },
        "place" => Command::Place {
            card_id: number(&parts, 1, "card")?,
            row: number(&parts, 2, "row")?,
            side: arg(&parts, 3, "side")?.to_string(),
        },
        "withdraw" => Command::Withdraw {
            row: number(&parts, 1, "row")?,
            side: arg(&parts, 2, "side")?.to_string(),
        },
        "pair" => Command::Pair {
            left_id: number(&parts, 1, "left")?,
            right_id: number(&parts, 2, "right")?,
        },
        "clear" => Command::Clear,
        "refresh" => Command::Refresh,
        "state" => Command::State,
        "history" => Command::History,
        "next" => Command::Next,
        "back" => Command::Back,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::new(format!("unknown command: {other}"))),
    };
    Ok(Some(command))
}

fn to_value<T: Serialize>(value: T) -> Result<Value, CommandError> {
    serde_json::to_value(value).map_err(|e| CommandError::new(e.to_string()))
}

/// Run one command against the state and return its JSON result.
pub fn execute(state: &AppState, command: Command) -> Result<Value, CommandError> {
    match command {
        Command::Themes => to_value(commands::list_themes(state)?),
        Command::Theme { theme_id } => to_value(commands::get_theme(state, &theme_id)?),
        Command::Progress => to_value(commands::get_progress(state)?),
        Command::Start {
            theme_id,
            level_id,
            mode,
        } => to_value(commands::start_level(state, &theme_id, level_id, mode.as_deref())?),
        Command::Place { card_id, row, side } => {
            to_value(commands::place_card(state, card_id, row, &side)?)
        }
        Command::Withdraw { row, side } => {
            let card_id = commands::withdraw_card(state, row, &side)?;
            Ok(json!({ "withdrawn": card_id }))
        }
        Command::Pair { left_id, right_id } => {
            to_value(commands::pair_cards(state, left_id, right_id)?)
        }
        Command::Clear => to_value(commands::clear_board(state)?),
        Command::Refresh => to_value(commands::refresh_pools(state)?),
        Command::State => to_value(commands::get_game_state(state)?),
        Command::History => to_value(commands::get_match_history(state)?),
        Command::Next => {
            // The driver doubles as router: a level intent starts that level.
            let intent = commands::continue_to_next_level(state)?;
            match &intent {
                NavigationIntent::Level {
                    theme_id,
                    level_id,
                    mode,
                } => {
                    let mode = mode.map(|mode| mode.as_str());
                    let snapshot = commands::start_level(state, theme_id, *level_id, mode)?;
                    Ok(json!({ "navigation": to_value(&intent)?, "state": to_value(snapshot)? }))
                }
                NavigationIntent::ThemeSelect { .. } => {
                    commands::back_to_theme_select(state)?;
                    Ok(json!({ "navigation": to_value(&intent)? }))
                }
            }
        }
        Command::Back => to_value(commands::back_to_theme_select(state)?),
        Command::Help => Ok(Value::String(HELP.to_string())),
        Command::Quit => Ok(Value::Null),
    }
}

/// Parse and run a line. Returns `None` for blank lines and `quit`.
pub fn handle_line(state: &AppState, line: &str) -> Option<Value> {
    let result = parse_command(line).and_then(|command| match command {
        None | Some(Command::Quit) => Ok(None),
        Some(command) => execute(state, command).map(Some),
    });

    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(line, error = %err, "command failed");
            Some(json!({ "message": err.message }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(
            parse_command("start mixed_operations 4 fixed").unwrap(),
            Some(Command::Start {
                theme_id: "mixed_operations".to_string(),
                level_id: 4,
                mode: Some("fixed".to_string())
            })
        );
        assert_eq!(
            parse_command("PLACE 2003 1 l").unwrap(),
            Some(Command::Place {
                card_id: 2003,
                row: 1,
                side: "l".to_string()
            })
        );
        assert_eq!(parse_command("exit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!(
            parse_command("pair 1").unwrap_err().message,
            "missing argument: right"
        );
        assert_eq!(
            parse_command("withdraw x left").unwrap_err().message,
            "row must be a number, got x"
        );
        assert_eq!(
            parse_command("dance").unwrap_err().message,
            "unknown command: dance"
        );
    }
}
