//! Player -- score and move budget of the person playing.
//!
//! The inventory and held slot are not stored here: they are views over the
//! item table in `World`.

use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub score: usize,
    pub moves_remaining: u32,
}
impl Default for Player {
    fn default() -> Player {
        Self {
            name: "student".into(),
            score: 0,
            moves_remaining: 0,
        }
    }
}
impl Player {
    pub fn new(name: impl Into<String>, moves: u32) -> Player {
        Player {
            name: name.into(),
            score: 0,
            moves_remaining: moves,
        }
    }

    /// Apply a score change, flooring the score at zero.
    /// Returns the change actually applied so it can be reverted exactly.
    pub fn add_points(&mut self, amount: isize) -> isize {
        let before = self.score;
        self.score = self.score.saturating_add_signed(amount);
        info!("score {before} -> {}", self.score);
        self.score.cast_signed() - before.cast_signed()
    }

    /// Undo a change previously returned by `add_points`.
    pub fn revert_points(&mut self, applied: isize) {
        self.score = self.score.saturating_add_signed(-applied);
    }

    /// Use up one move. Returns false if none were left.
    pub fn spend_move(&mut self) -> bool {
        if self.moves_remaining == 0 {
            return false;
        }
        self.moves_remaining -= 1;
        true
    }

    pub fn add_moves(&mut self, amount: u32) {
        self.moves_remaining = self.moves_remaining.saturating_add(amount);
    }

    pub fn remove_moves(&mut self, amount: u32) {
        self.moves_remaining = self.moves_remaining.saturating_sub(amount);
    }

    pub fn out_of_moves(&self) -> bool {
        self.moves_remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_floor_at_zero_and_report_applied_change() {
        let mut player = Player::new("tester", 5);
        assert_eq!(player.add_points(10), 10);
        assert_eq!(player.add_points(-25), -10);
        assert_eq!(player.score, 0);
    }

    #[test]
    fn reverting_applied_points_restores_score() {
        let mut player = Player::new("tester", 5);
        player.add_points(7);
        let applied = player.add_points(30);
        player.revert_points(applied);
        assert_eq!(player.score, 7);
    }

    #[test]
    fn spending_moves_stops_at_zero() {
        let mut player = Player::new("tester", 1);
        assert!(player.spend_move());
        assert!(player.out_of_moves());
        assert!(!player.spend_move());
        assert_eq!(player.moves_remaining, 0);
    }

    #[test]
    fn granted_moves_can_be_taken_back() {
        let mut player = Player::new("tester", 3);
        player.add_moves(5);
        assert_eq!(player.moves_remaining, 8);
        player.remove_moves(5);
        assert_eq!(player.moves_remaining, 3);
    }
}
