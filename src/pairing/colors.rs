use log::debug;

use crate::domain::{History, Pairing, Player};

/// Decide who takes White on a matched board.
///
/// Players who met before repeat the colors of their latest meeting.
/// Otherwise the lower preference (White < Neutral < Black) gets White,
/// and equal preferences fall back to the lexically smaller id.
pub fn resolve_colors(a: &Player, b: &Player, history: &History) -> Pairing {
    if let Some(game) = history.last_meeting(&a.id, &b.id) {
        debug!(
            "{} vs {}: repeating colors from round {:?}",
            game.white, game.black, game.round
        );
        return Pairing::new(game.white.clone(), game.black.clone());
    }

    let (white, black) = if by_preference(a, b) { (a, b) } else { (b, a) };
    Pairing::new(white.id.clone(), black.id.clone())
}

/// True if `a` should take White over `b` on preference alone
fn by_preference(a: &Player, b: &Player) -> bool {
    (a.preference, &a.id) <= (b.preference, &b.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PairingSettings;
    use crate::domain::{ColorPreference, GameRecord};

    fn player(id: &str, preference: ColorPreference) -> Player {
        Player {
            id: id.to_string(),
            rating: 1500.0,
            preference,
        }
    }

    fn history(records: &[GameRecord]) -> History {
        History::from_records(records, &PairingSettings::default())
    }

    #[test]
    fn test_white_preference_gets_white() {
        let a = player("zed", ColorPreference::White);
        let b = player("amy", ColorPreference::Black);

        assert_eq!(resolve_colors(&a, &b, &History::default()), Pairing::new("zed", "amy"));
        assert_eq!(resolve_colors(&b, &a, &History::default()), Pairing::new("zed", "amy"));
    }

    #[test]
    fn test_neutral_beats_black() {
        let a = player("a", ColorPreference::Black);
        let b = player("b", ColorPreference::Neutral);

        assert_eq!(resolve_colors(&a, &b, &History::default()), Pairing::new("b", "a"));
    }

    #[test]
    fn test_equal_preference_uses_id_order() {
        let a = player("mia", ColorPreference::Neutral);
        let b = player("leo", ColorPreference::Neutral);

        assert_eq!(resolve_colors(&a, &b, &History::default()), Pairing::new("leo", "mia"));
        assert_eq!(resolve_colors(&b, &a, &History::default()), Pairing::new("leo", "mia"));
    }

    #[test]
    fn test_previous_meeting_colors_repeat() {
        let a = player("a", ColorPreference::White);
        let b = player("b", ColorPreference::Black);
        let history = history(&[
            GameRecord::new("a", "b", 1, Some("1-0")),
            GameRecord::new("b", "a", 4, Some("1/2-1/2")),
        ]);

        // the latest meeting had b on White, which overrides preference
        assert_eq!(resolve_colors(&a, &b, &history), Pairing::new("b", "a"));
    }

    #[test]
    fn test_meetings_with_others_are_ignored() {
        let a = player("a", ColorPreference::Neutral);
        let b = player("b", ColorPreference::White);
        let history = history(&[
            GameRecord::new("a", "c", 1, Some("1-0")),
            GameRecord::new("c", "b", 2, Some("1-0")),
        ]);

        assert_eq!(resolve_colors(&a, &b, &history), Pairing::new("b", "a"));
    }
}
