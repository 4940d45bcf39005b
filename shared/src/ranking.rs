//! Leaderboard ranking derived from a roster snapshot.

use crate::player::Player;

/// Returns the 1-based leaderboard position of `subject_id` together with
/// the roster size, or `None` if the subject is not in the roster.
///
/// Ordering is descending score. Ties break stably by join order: player
/// ids come from a monotone counter, so ascending id is join order. This
/// keeps ranks reproducible across repeated calls on the same snapshot.
pub fn rank_of(players: &[Player], subject_id: u32) -> Option<(usize, usize)> {
    let total = players.len();
    let mut ordered: Vec<&Player> = players.iter().collect();
    ordered.sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));

    ordered
        .iter()
        .position(|p| p.id == subject_id)
        .map(|index| (index + 1, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_with_score(id: u32, score: u32) -> Player {
        let mut player = Player::new(id, 0, 0);
        player.score = score;
        player
    }

    #[test]
    fn test_leader_is_rank_one() {
        let players = vec![
            player_with_score(1, 5),
            player_with_score(2, 3),
            player_with_score(3, 3),
        ];

        assert_eq!(rank_of(&players, 1), Some((1, 3)));
    }

    #[test]
    fn test_ties_break_by_join_order() {
        let players = vec![
            player_with_score(1, 5),
            player_with_score(2, 3),
            player_with_score(3, 3),
        ];

        // Equal scores rank in join order: the earlier id comes first
        assert_eq!(rank_of(&players, 2), Some((2, 3)));
        assert_eq!(rank_of(&players, 3), Some((3, 3)));
    }

    #[test]
    fn test_total_includes_subject() {
        let players = vec![player_with_score(9, 0)];
        assert_eq!(rank_of(&players, 9), Some((1, 1)));
    }

    #[test]
    fn test_unknown_subject() {
        let players = vec![player_with_score(1, 5)];
        assert_eq!(rank_of(&players, 42), None);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let forward = vec![
            player_with_score(1, 2),
            player_with_score(2, 7),
            player_with_score(3, 4),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        for id in [1, 2, 3] {
            assert_eq!(rank_of(&forward, id), rank_of(&reversed, id));
        }
    }
}
