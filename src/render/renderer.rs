use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Size},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use super::story::INTRO_PROMPT;
use crate::game::{CollisionType, GameState, Outcome, Position};
use crate::metrics::GameMetrics;

/// What to draw this frame
pub enum Screen<'a> {
    /// Name prompt with the text typed so far
    Intro { name: &'a str },
    /// Story text scrolled down by `scroll` lines
    Story { lines: &'a [String], scroll: u16 },
    /// Play field, or the result once the game is over
    Game {
        player: &'a str,
        state: &'a GameState,
        metrics: &'a GameMetrics,
    },
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, screen: Screen<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Main area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        // Center the main area horizontally
        let main_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match screen {
            Screen::Intro { name } => {
                frame.render_widget(self.render_intro(name), main_area);
                frame.render_widget(self.render_hint("Enter", " to confirm"), chunks[2]);
            }
            Screen::Story { lines, scroll } => {
                frame.render_widget(self.render_story(lines, scroll), main_area);
                frame.render_widget(self.render_hint("Enter", " to start | ↑↓ to scroll"), chunks[2]);
            }
            Screen::Game {
                player,
                state,
                metrics,
            } => {
                frame.render_widget(self.render_stats(player, state, metrics), chunks[0]);

                match state.outcome() {
                    None => {
                        frame.render_widget(self.render_grid(state), main_area);
                        frame.render_widget(self.render_controls(), chunks[2]);
                    }
                    Some(outcome) => {
                        let result = self.render_result(player, state, metrics, outcome);
                        frame.render_widget(result, main_area);
                        frame.render_widget(self.render_hint("Q", " to quit"), chunks[2]);
                    }
                }
            }
        }
    }

    fn render_intro(&self, name: &str) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                INTRO_PROMPT,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::styled(name.to_string(), Style::default().fg(Color::White)),
                Span::styled("_", Style::default().fg(Color::DarkGray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title(" Snake "),
        )
    }

    fn render_story<'a>(&self, lines: &'a [String], scroll: u16) -> Paragraph<'a> {
        let text: Vec<Line> = lines
            .iter()
            .map(|line| Line::from(Span::styled(line.as_str(), Style::default().fg(Color::White))))
            .collect();

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .scroll((scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .title(" Story "),
            )
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let mut lines = Vec::new();

        for y in 0..state.grid_height {
            let mut spans = Vec::new();

            for x in 0..state.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == state.snake.head() {
                    // Snake head - distinct color
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.occupies(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if state.is_boss_at(pos) {
                    // Bosses are drawn over food they wander onto
                    Span::styled(
                        "◆ ",
                        Style::default()
                            .fg(Color::Blue)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if pos == state.food {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(format!(" Level {} ", state.level)),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, player: &str, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled(player.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Level: ", label),
            Span::styled(state.level.to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{}ms", state.speed_ms), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_result(
        &self,
        player: &str,
        state: &GameState,
        metrics: &GameMetrics,
        outcome: Outcome,
    ) -> Paragraph<'_> {
        let (title, score_label, color) = match outcome {
            Outcome::Lost => ("GAME OVER", "Score: ", Color::Red),
            Outcome::Won => ("YOU WIN!", "Final Score: ", Color::Green),
        };

        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(score_label, Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(format!(
                "{} reached level {} after eating {} food in {}",
                player,
                state.level,
                metrics.foods_eaten,
                metrics.format_time()
            )),
        ];

        if let Some(collision) = state.collision {
            let cause = match collision {
                CollisionType::SelfCollision => "Bit its own tail",
                CollisionType::Wall => "Hit the wall",
                CollisionType::Boss => "Caught by a boss",
            };
            text.push(Line::from(Span::styled(cause, Style::default().fg(Color::Gray))));
        }

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_hint(&self, key: &'static str, rest: &'static str) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled(key, Style::default().fg(Color::Cyan)),
            Span::raw(rest),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows the story needs inside a bordered block `width` columns wide
fn story_rows(lines: &[String], width: u16) -> u16 {
    let inner_width = width.saturating_sub(2).max(1) as usize;
    lines
        .iter()
        .map(|line| line.chars().count().max(1).div_ceil(inner_width) as u16)
        .sum()
}

/// How far the story can scroll before its last line reaches the bottom
pub fn story_max_scroll(lines: &[String], terminal: Size) -> u16 {
    // Main area is 80% wide, minus header, footer and borders
    let width = (u32::from(terminal.width) * 8 / 10) as u16;
    let visible = terminal.height.saturating_sub(3 + 3 + 2);
    story_rows(lines, width).saturating_sub(visible)
}
