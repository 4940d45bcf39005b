//! Client-side world mirror.
//!
//! The client never simulates anything. It holds an advisory copy of the
//! roster and collectible, replaces both wholesale whenever an
//! authoritative snapshot arrives (last write wins, no merging), and
//! derives display-only values such as the rank line from that copy.

use macroquad::rand::gen_range;
use shared::{
    rank_of, Collectible, Player, ARENA_MAX_X, ARENA_MAX_Y, ARENA_MIN_X, ARENA_MIN_Y,
    COLLECTIBLE_SIZE, PLAYER_SIZE,
};

pub struct World {
    pub players: Vec<Player>,
    pub goal: Collectible,
    /// Identity the server assigned to this connection, once joined.
    pub local_id: Option<u32>,
    /// Live connection count from the latest lifecycle notification.
    pub connections: usize,
}

impl World {
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            goal: Collectible::new(0, ARENA_MIN_X, ARENA_MIN_Y),
            local_id: None,
            connections: 0,
        }
    }

    /// Replaces the roster and collectible with the broadcast payload and
    /// re-tags the locally controlled player for rendering.
    pub fn apply_update(&mut self, players: Vec<Player>, goal: Collectible) {
        self.players = players;
        self.goal = goal;
        self.retag_local();
    }

    pub fn set_local_id(&mut self, player_id: u32) {
        self.local_id = Some(player_id);
        self.retag_local();
    }

    fn retag_local(&mut self) {
        if let Some(local_id) = self.local_id {
            for player in &mut self.players {
                player.local = player.id == local_id;
            }
        }
    }

    pub fn local_player(&self) -> Option<&Player> {
        let local_id = self.local_id?;
        self.players.iter().find(|p| p.id == local_id)
    }

    /// Join proposal with randomized spawn guesses, sent with `Init`
    /// before the server has assigned an identity. The server only treats
    /// the position as a hint.
    pub fn make_proposal(&self) -> Player {
        Player::new(
            0,
            gen_range(ARENA_MIN_X, ARENA_MAX_X - PLAYER_SIZE),
            gen_range(ARENA_MIN_Y, ARENA_MAX_Y - PLAYER_SIZE),
        )
    }

    /// Local collectible guess carried by `Init`, mirroring the roster's
    /// advisory nature; the server ignores it.
    pub fn make_goal_guess(&self) -> Collectible {
        Collectible::new(
            0,
            gen_range(ARENA_MIN_X, ARENA_MAX_X - COLLECTIBLE_SIZE),
            gen_range(ARENA_MIN_Y, ARENA_MAX_Y - COLLECTIBLE_SIZE),
        )
    }

    /// Leaderboard line for the heads-up display.
    pub fn rank_line(&self) -> Option<String> {
        let local_id = self.local_id?;
        rank_of(&self.players, local_id).map(|(position, total)| {
            format!("Rank: {}/{}", position, total)
        })
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
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
    fn test_update_replaces_state_wholesale() {
        let mut world = World::new();
        world.apply_update(
            vec![player_with_score(1, 3)],
            Collectible::new(10, 20, 30),
        );

        // Nothing from the previous state survives the next update
        world.apply_update(
            vec![player_with_score(2, 0)],
            Collectible::new(11, 40, 50),
        );

        assert_eq!(world.players.len(), 1);
        assert_eq!(world.players[0].id, 2);
        assert_eq!(world.goal.id, 11);
    }

    #[test]
    fn test_local_player_is_retagged_on_update() {
        let mut world = World::new();
        world.set_local_id(2);
        world.apply_update(
            vec![player_with_score(1, 0), player_with_score(2, 0)],
            Collectible::new(1, 0, 0),
        );

        assert!(!world.players[0].local);
        assert!(world.players[1].local);
        assert_eq!(world.local_player().map(|p| p.id), Some(2));
    }

    #[test]
    fn test_rank_line_formatting() {
        let mut world = World::new();
        world.set_local_id(1);
        world.apply_update(
            vec![player_with_score(1, 5), player_with_score(2, 3)],
            Collectible::new(1, 0, 0),
        );

        assert_eq!(world.rank_line().as_deref(), Some("Rank: 1/2"));
    }

    #[test]
    fn test_rank_line_absent_before_join() {
        let world = World::new();
        assert_eq!(world.rank_line(), None);
    }

    #[test]
    fn test_proposal_is_within_bounds() {
        let world = World::new();
        for _ in 0..50 {
            let proposal = world.make_proposal();
            assert!(proposal.x >= ARENA_MIN_X && proposal.x <= ARENA_MAX_X - PLAYER_SIZE);
            assert!(proposal.y >= ARENA_MIN_Y && proposal.y <= ARENA_MAX_Y - PLAYER_SIZE);
        }
    }
}
