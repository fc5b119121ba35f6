//! Session configuration and scoring ranks.
//!
//! `session.toml` tunes a session without touching the world description: where
//! the player starts, how many moves they get, what first visits are worth, and
//! the ranks used in the end-of-game summary. Every field has a default, and a
//! missing or broken file falls back to the defaults entirely.

use crate::world::LocationId;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete session configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub player_name: String,
    pub start_location: LocationId,
    /// Points for reaching a location for the first time.
    pub first_visit_points: usize,
    pub max_moves: u32,
    /// Story text printed before the command help.
    pub intro: String,
    pub endings: EndingText,
    pub scoring: ScoringConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player_name: "student".to_string(),
            start_location: 1,
            first_visit_points: 10,
            max_moves: 45,
            intro: "The submission deadline is at 4 PM. You promised your friend you would get the project \
                    done, but you are missing some key items. Find them before the deadline to save your \
                    grade and the project!"
                .to_string(),
            endings: EndingText::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

/// Banners printed when the session ends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EndingText {
    pub quit: String,
    pub out_of_moves: String,
    pub victory: String,
}

impl Default for EndingText {
    fn default() -> Self {
        Self {
            quit: "Thanks for playing!".to_string(),
            out_of_moves: "You ran out of moves. It's 4 PM and you missed the deadline. \
                           What will you tell your friend..."
                .to_string(),
            victory: "YOU SUCCESSFULLY COMPLETED THE GAME.".to_string(),
        }
    }
}

/// A single scoring rank with its threshold and flavor text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringRank {
    /// Minimum percentage (0.0-100.0) required to achieve this rank
    pub threshold: f32,
    pub name: String,
    pub description: String,
}

/// Ranks for the final summary, highest threshold first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub ranks: Vec<ScoringRank>,
}

impl ScoringConfig {
    /// Returns the rank name and description for a percentage of the maximum score.
    pub fn get_rank(&self, percent: f32) -> (&str, &str) {
        for rank in &self.ranks {
            if percent >= rank.threshold {
                return (&rank.name, &rank.description);
            }
        }
        if let Some(last_rank) = self.ranks.last() {
            (&last_rank.name, &last_rank.description)
        } else {
            ("Unranked", "No scoring data available.")
        }
    }

    fn sort(&mut self) {
        self.ranks.sort_by(|a, b| {
            b.threshold
                .partial_cmp(&a.threshold)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            ranks: default_scoring_ranks(),
        }
    }
}

fn rank(threshold: f32, name: &str, description: &str) -> ScoringRank {
    ScoringRank {
        threshold,
        name: name.to_string(),
        description: description.to_string(),
    }
}

/// Hardcoded ranks, highest threshold first.
fn default_scoring_ranks() -> Vec<ScoringRank> {
    vec![
        rank(95.0, "Dean's List", "Every errand run, every puzzle solved, submitted with time to spare."),
        rank(80.0, "Honours Student", "A near-perfect scramble across campus."),
        rank(60.0, "Solid B+", "You got it done, though a few corners of campus went unexplored."),
        rank(40.0, "Pass", "It was close. Your friend is relieved, if a little nervous."),
        rank(20.0, "Extension Requested", "You saw a lot of hallways and not many answers."),
        rank(0.0, "Dropped the Course", "Did you even leave New College?"),
    ]
}

/// Loads the session configuration, falling back to defaults on error.
///
/// This function never fails; problems are logged with `warn!`.
pub fn load_config(toml_path: &Path) -> SessionConfig {
    match try_load_config(toml_path) {
        Ok(config) => {
            info!(
                "session config loaded from '{}' ({} moves, {} ranks)",
                toml_path.display(),
                config.max_moves,
                config.scoring.ranks.len()
            );
            config
        },
        Err(e) => {
            warn!(
                "Could not load session config from '{}': {e:#}. Using hardcoded defaults.",
                toml_path.display()
            );
            SessionConfig::default()
        },
    }
}

/// Attempts to load session configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn try_load_config(toml_path: &Path) -> Result<SessionConfig> {
    let text = fs::read_to_string(toml_path)
        .with_context(|| format!("reading session config from '{}'", toml_path.display()))?;
    parse_config(&text).with_context(|| format!("parsing session config from '{}'", toml_path.display()))
}

/// Parse configuration text, sorting the ranks.
///
/// # Errors
/// Returns an error on malformed TOML or mistyped fields.
pub fn parse_config(text: &str) -> Result<SessionConfig> {
    let mut config: SessionConfig = toml::from_str(text)?;
    if config.scoring.ranks.is_empty() {
        config.scoring = ScoringConfig::default();
    }
    config.scoring.sort();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_ranks_are_sorted() {
        let ranks = default_scoring_ranks();
        for pair in ranks.windows(2) {
            assert!(pair[0].threshold >= pair[1].threshold);
        }
    }

    #[test]
    fn get_rank_picks_highest_reached_threshold() {
        let config = ScoringConfig::default();
        assert_eq!(config.get_rank(100.0).0, "Dean's List");
        assert_eq!(config.get_rank(79.9).0, "Solid B+");
        assert_eq!(config.get_rank(0.0).0, "Dropped the Course");
    }

    #[test]
    fn get_rank_without_ranks() {
        let config = ScoringConfig { ranks: Vec::new() };
        assert_eq!(config.get_rank(50.0).0, "Unranked");
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = parse_config("max_moves = 3\nstart_location = 8\n").unwrap();
        assert_eq!(config.max_moves, 3);
        assert_eq!(config.start_location, 8);
        assert_eq!(config.first_visit_points, 10);
        assert_eq!(config.endings, EndingText::default());
    }

    #[test]
    fn custom_ranks_are_sorted_descending() {
        let config = parse_config(
            r#"
            [[scoring.ranks]]
            threshold = 10.0
            name = "Low"
            description = "meh"

            [[scoring.ranks]]
            threshold = 90.0
            name = "High"
            description = "wow"
            "#,
        )
        .unwrap();
        assert_eq!(config.scoring.ranks[0].name, "High");
        assert_eq!(config.scoring.get_rank(50.0).0, "Low");
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_moves = \"lots\"").unwrap();
        assert!(try_load_config(file.path()).is_err());
        assert_eq!(load_config(file.path()), SessionConfig::default());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config(&dir.path().join("nope.toml")), SessionConfig::default());
    }
}
