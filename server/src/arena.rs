//! Authoritative arena state: the player roster plus the single active
//! collectible.
//!
//! The arena is the only shared mutable resource in the system. It is owned
//! exclusively by the dispatcher's main loop and mutated only through
//! `join` / `leave` / `apply_move`, so every inbound message observes and
//! produces a complete state with no partial views. Clients only ever
//! propose intents; nothing they send is written into the roster directly.

use log::info;
use rand::Rng;
use shared::{
    clamp_axis, overlaps, Aabb, Collectible, Direction, Player, ProtocolError, ARENA_MAX_X,
    ARENA_MAX_Y, ARENA_MIN_X, ARENA_MIN_Y, COLLECTIBLE_SIZE, PLAYER_SIZE,
};
use std::collections::HashMap;

/// Result of an accepted movement intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// True when the move picked up the collectible (score incremented and
    /// a fresh collectible spawned).
    pub collided: bool,
}

pub struct Arena {
    players: HashMap<u32, Player>,
    collectible: Collectible,
    next_player_id: u32,
    next_collectible_id: u32,
}

impl Arena {
    pub fn new() -> Self {
        Self {
            players: HashMap::new(),
            collectible: sample_collectible(1, None),
            next_player_id: 1,
            next_collectible_id: 2,
        }
    }

    /// Registers a new player and returns the identity the server assigned.
    ///
    /// Ids come from a monotone counter rather than a timestamp, so
    /// simultaneous joins can never collide. The proposal, when present, is
    /// honored only as a spawn position and clamped into bounds.
    pub fn join(&mut self, proposal: Option<&Player>) -> u32 {
        let id = self.next_player_id;
        self.next_player_id += 1;

        let (x, y) = match proposal {
            Some(p) => (
                clamp_axis(p.x, ARENA_MIN_X, ARENA_MAX_X - PLAYER_SIZE),
                clamp_axis(p.y, ARENA_MIN_Y, ARENA_MAX_Y - PLAYER_SIZE),
            ),
            None => random_spawn(),
        };

        let player = Player::new(id, x, y);
        info!("Player {} joined at ({}, {})", id, x, y);
        self.players.insert(id, player);

        id
    }

    /// Removes a player. Idempotent: leaving twice is a no-op.
    pub fn leave(&mut self, player_id: u32) {
        if self.players.remove(&player_id).is_some() {
            info!("Player {} left", player_id);
        }
    }

    /// Validates and applies a movement intent, then checks the moved
    /// player against the collectible. On overlap the score grows by
    /// exactly the collectible's value and the collectible is replaced
    /// with a fresh identity at a position clear of the scoring player, so
    /// a repeated intent cannot score twice against the same pickup.
    pub fn apply_move(
        &mut self,
        player_id: u32,
        direction: Direction,
        speed: i32,
    ) -> Result<MoveOutcome, ProtocolError> {
        let player = self
            .players
            .get_mut(&player_id)
            .ok_or(ProtocolError::UnknownPlayer(player_id))?;

        player.apply_move(direction, speed);

        if !player.collides_with(&self.collectible) {
            return Ok(MoveOutcome { collided: false });
        }

        player.score += self.collectible.value;
        let score = player.score;
        let scorer_bounds = player.bounds();

        let id = self.next_collectible_id;
        self.next_collectible_id += 1;
        self.collectible = sample_collectible(id, Some(&scorer_bounds));

        info!(
            "Player {} picked up the collectible, score is now {}",
            player_id, score
        );

        Ok(MoveOutcome { collided: true })
    }

    /// Full, consistent copy of the roster and collectible for broadcast.
    pub fn snapshot(&self) -> (Vec<Player>, Collectible) {
        (
            self.players.values().cloned().collect(),
            self.collectible.clone(),
        )
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

fn random_spawn() -> (i32, i32) {
    let mut rng = rand::thread_rng();
    (
        rng.gen_range(ARENA_MIN_X..ARENA_MAX_X - PLAYER_SIZE),
        rng.gen_range(ARENA_MIN_Y..ARENA_MAX_Y - PLAYER_SIZE),
    )
}

/// Samples a collectible position uniformly in `[min, max - size)` per
/// axis, clamping down to `max - size` as a final guard. When `clear_of`
/// is given, positions overlapping it are re-sampled so a freshly spawned
/// collectible never lands on the player that just scored.
fn sample_collectible(id: u32, clear_of: Option<&Aabb>) -> Collectible {
    let mut rng = rand::thread_rng();

    loop {
        let x = rng.gen_range(ARENA_MIN_X..ARENA_MAX_X - COLLECTIBLE_SIZE);
        let y = rng.gen_range(ARENA_MIN_Y..ARENA_MAX_Y - COLLECTIBLE_SIZE);
        let goal = Collectible::new(
            id,
            clamp_axis(x, ARENA_MIN_X, ARENA_MAX_X - COLLECTIBLE_SIZE),
            clamp_axis(y, ARENA_MIN_Y, ARENA_MAX_Y - COLLECTIBLE_SIZE),
        );

        match clear_of {
            Some(bounds) if overlaps(bounds, &goal.bounds()) => continue,
            _ => return goal,
        }
    }
}
