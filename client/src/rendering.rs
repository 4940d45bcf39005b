//! Arena rendering: filled rectangles for every entity, colored by role.

use crate::game::World;
use macroquad::prelude::*;
use shared::{Collectible, Player, ARENA_MAX_X, ARENA_MAX_Y, ARENA_MIN_X, ARENA_MIN_Y};

pub struct Renderer {
    width: f32,
    height: f32,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Renderer {
            width: width as f32,
            height: height as f32,
        })
    }

    pub fn is_open(&self) -> bool {
        !is_quit_requested()
    }

    pub fn render(&mut self, world: &World) {
        clear_background(Color::from_rgba(26, 26, 26, 255));

        self.draw_arena();
        self.draw_heading();

        self.draw_collectible(&world.goal);
        for player in &world.players {
            self.draw_player(player);
        }

        if let Some(rank) = world.rank_line() {
            draw_text(&rank, self.width - 110.0, 24.0, 18.0, WHITE);
        }

        let connections = format!("{} player(s) connected", world.connections);
        draw_text(&connections, 10.0, self.height - 10.0, 16.0, GRAY);
    }

    fn draw_arena(&mut self) {
        let width = (ARENA_MAX_X - ARENA_MIN_X) as f32;
        let height = (ARENA_MAX_Y - ARENA_MIN_Y) as f32;
        draw_rectangle(
            ARENA_MIN_X as f32,
            ARENA_MIN_Y as f32,
            width,
            height,
            Color::from_rgba(40, 40, 40, 255),
        );
        draw_rectangle_lines(
            ARENA_MIN_X as f32,
            ARENA_MIN_Y as f32,
            width,
            height,
            2.0,
            WHITE,
        );
    }

    fn draw_heading(&mut self) {
        draw_text(
            "Collect the square! WASD or arrow keys to move",
            10.0,
            24.0,
            18.0,
            WHITE,
        );
    }

    fn draw_player(&mut self, player: &Player) {
        let color = if player.local { GREEN } else { PURPLE };
        draw_rectangle(
            player.x as f32,
            player.y as f32,
            player.size as f32,
            player.size as f32,
            color,
        );
    }

    fn draw_collectible(&mut self, goal: &Collectible) {
        draw_rectangle(
            goal.x as f32,
            goal.y as f32,
            goal.size as f32,
            goal.size as f32,
            RED,
        );
    }
}
