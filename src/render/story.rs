//! Intro prompt and the story shown before the game starts

use crate::game::GameConfig;

pub const INTRO_PROMPT: &str = "Enter your name and press Enter to begin";

/// Name used when the player confirms an empty name
pub const DEFAULT_NAME: &str = "Snake";

/// Longest name the intro screen accepts
pub const MAX_NAME_LEN: usize = 16;

/// Story lines for the given player, one entry per screen line
pub fn story_lines(name: &str, config: &GameConfig) -> Vec<String> {
    let mut lines = vec![
        "Long ago,".to_string(),
        format!("in a faraway forest, there lived a magical little snake named {name}."),
        "Brave and full of the spirit of adventure, it never backed away from a challenge."
            .to_string(),
        String::new(),
        format!("{name} is quick of body and calm of mind,"),
        "keeping its nerve when danger is near.".to_string(),
        "Its dream is to become ruler of the forest, and it works towards it every day."
            .to_string(),
        String::new(),
        format!("{name} grew up somewhere unusual,"),
        "a place full of hardship,".to_string(),
        "learning every day how to dodge enemies and find food.".to_string(),
        String::new(),
        format!(
            "Goal: eat the red food to grow longer. Reach length {} or level {} to win.",
            config.max_snake_length, config.win_level
        ),
        String::new(),
        "Controls: arrow keys or WASD to move.".to_string(),
        String::new(),
    ];

    let mut waves: Vec<_> = config
        .boss_waves
        .iter()
        .filter(|wave| wave.count > 0)
        .collect();
    waves.sort_by_key(|wave| wave.level);
    for wave in &waves {
        let noun = if wave.count == 1 { "boss appears" } else { "bosses appear" };
        lines.push(format!("At level {}, {} {}.", wave.level, wave.count, noun));
    }
    if !waves.is_empty() {
        lines.push("Stay away from them!".to_string());
        lines.push(String::new());
    }

    lines.push("Press Enter to start the game.".to_string());
    lines
}

/// The name to use for a confirmed intro buffer
pub fn player_name(buffer: &str) -> String {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
