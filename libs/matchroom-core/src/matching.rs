//! Pair validation: a left and a right card match only when their labels
//! evaluate to the same number and they share a color.

use crate::expression::evaluate_label;
use crate::types::{Card, CardColor};
use serde::{Deserialize, Serialize};

/// Result of checking a left/right pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchVerdict {
    /// Whether the pair is accepted.
    pub is_match: bool,
    /// Bucket to credit; present only on a match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_color: Option<CardColor>,
}

impl MatchVerdict {
    fn rejected() -> Self {
        Self {
            is_match: false,
            score_color: None,
        }
    }
}

/// Evaluate a left/right pair.
///
/// Labels are evaluated afresh rather than trusting the cached value, and a
/// label that does not evaluate makes the pair a non-match.
pub fn evaluate_match(left: &Card, right: &Card) -> MatchVerdict {
    let (Some(left_value), Some(right_value)) =
        (evaluate_label(&left.label), evaluate_label(&right.label))
    else {
        return MatchVerdict::rejected();
    };

    if left_value == right_value && left.color == right.color {
        MatchVerdict {
            is_match: true,
            score_color: Some(left.color),
        }
    } else {
        MatchVerdict::rejected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;
    use pretty_assertions::assert_eq;

    fn card(side: Side, label: &str, color: CardColor) -> Card {
        Card {
            id: 0,
            side,
            color,
            label: label.to_string(),
            value: evaluate_label(label).unwrap_or_default(),
        }
    }

    #[test]
    fn value_and_color_agree() {
        let verdict = evaluate_match(
            &card(Side::Left, "3 + 4", CardColor::Red),
            &card(Side::Right, "9 - 2", CardColor::Red),
        );
        assert_eq!(
            verdict,
            MatchVerdict {
                is_match: true,
                score_color: Some(CardColor::Red)
            }
        );
    }

    #[test]
    fn value_only_is_rejected() {
        let verdict = evaluate_match(
            &card(Side::Left, "3 + 4", CardColor::Red),
            &card(Side::Right, "9 - 2", CardColor::Yellow),
        );
        assert!(!verdict.is_match);
        assert_eq!(verdict.score_color, None);
    }

    #[test]
    fn color_only_is_rejected() {
        let verdict = evaluate_match(
            &card(Side::Left, "3 + 4", CardColor::Green),
            &card(Side::Right, "9 - 1", CardColor::Green),
        );
        assert!(!verdict.is_match);
    }

    #[test]
    fn unparsable_label_fails_closed() {
        let mut left = card(Side::Left, "3 + 4", CardColor::Red);
        let right = card(Side::Right, "7", CardColor::Red);
        left.label = "three plus four".to_string();
        assert!(!evaluate_match(&left, &right).is_match);
    }

    #[test]
    fn stale_cached_value_is_ignored() {
        let mut left = card(Side::Left, "3 + 4", CardColor::Red);
        let right = card(Side::Right, "2 + 2", CardColor::Red);
        left.value = 4;
        assert!(!evaluate_match(&left, &right).is_match);
    }

    #[test]
    fn matched_pair_scores_its_color() {
        for color in CardColor::ALL {
            let verdict = evaluate_match(
                &card(Side::Left, "2 × 3", color),
                &card(Side::Right, "12 ÷ 2", color),
            );
            assert_eq!(verdict.score_color, Some(color));
        }
    }
}
