use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};
use tracing::info;

use crate::game::{GameConfig, GameEngine, GameState, Schedule};
use crate::input::{InputContext, InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::renderer::story_max_scroll;
use crate::render::story::{MAX_NAME_LEN, player_name};
use crate::render::{Renderer, Screen, story_lines};

/// Drives `GameEngine::tick` at the interval the engine asks for
///
/// The timer is idle until the game starts and goes idle again for good
/// when a tick returns [`Schedule::Stop`].
pub struct TickTimer {
    interval: Option<Interval>,
    period: Duration,
}

impl TickTimer {
    pub fn idle() -> Self {
        Self {
            interval: None,
            period: Duration::ZERO,
        }
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Follow the engine's request; the interval is rebuilt only when the period changes
    pub fn apply(&mut self, schedule: Schedule) {
        match schedule {
            Schedule::After(period) => {
                if self.interval.is_none() || period != self.period {
                    let mut timer = interval_at(Instant::now() + period, period);
                    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    self.interval = Some(timer);
                    self.period = period;
                }
            }
            Schedule::Stop => self.interval = None,
        }
    }

    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(timer) => {
                timer.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

/// Which screen the player is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Intro,
    Story,
    Game,
}

pub struct PlayMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    stage: Stage,
    name_buffer: String,
    player: String,
    story: Vec<String>,
    story_scroll: u16,
    story_max_scroll: u16,
    should_quit: bool,
}

impl PlayMode {
    /// Set up a game; a known `name` skips the intro screen
    pub fn new(config: GameConfig, seed: Option<u64>, name: Option<String>) -> Result<Self> {
        let mut engine = match seed {
            Some(seed) => GameEngine::seeded(config, seed),
            None => GameEngine::new(config),
        };
        let state = engine.reset().context("Failed to set up the board")?;

        let mut mode = Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            stage: Stage::Intro,
            name_buffer: String::new(),
            player: String::new(),
            story: Vec::new(),
            story_scroll: 0,
            story_max_scroll: 0,
            should_quit: false,
        };

        if let Some(name) = name {
            mode.begin_story(&name);
        }

        Ok(mode)
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Game ticks follow the engine's speed once play starts
        let mut tick_timer = TickTimer::idle();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        let scroll_period = self.engine.config().story_scroll_interval();
        let mut scroll_timer = interval_at(Instant::now() + scroll_period, scroll_period);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick(), if tick_timer.is_active() => {
                    let schedule = self.update_game();
                    tick_timer.apply(schedule);
                }

                // Story auto-scroll
                _ = scroll_timer.tick(), if self.stage == Stage::Story => {
                    self.scroll_story(1);
                }

                // Render frame
                _ = render_timer.tick() => {
                    let size = terminal.size().context("Failed to read terminal size")?;
                    self.story_max_scroll = story_max_scroll(&self.story, size);
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.screen());
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn screen(&self) -> Screen<'_> {
        match self.stage {
            Stage::Intro => Screen::Intro {
                name: &self.name_buffer,
            },
            Stage::Story => Screen::Story {
                lines: &self.story,
                scroll: self.story_scroll,
            },
            Stage::Game => Screen::Game {
                player: &self.player,
                state: &self.state,
                metrics: &self.metrics,
            },
        }
    }

    fn input_context(&self) -> InputContext {
        match self.stage {
            Stage::Intro => InputContext::TextEntry,
            Stage::Story => InputContext::Story,
            Stage::Game if self.state.is_terminal() => InputContext::Finished,
            Stage::Game => InputContext::Playing,
        }
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut TickTimer) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self
                .input_handler
                .handle_key_event(key, self.input_context());

            match action {
                KeyAction::Type(c) => {
                    if !c.is_control() && self.name_buffer.chars().count() < MAX_NAME_LEN {
                        self.name_buffer.push(c);
                    }
                }
                KeyAction::Erase => {
                    self.name_buffer.pop();
                }
                KeyAction::Confirm => match self.stage {
                    Stage::Intro => {
                        let name = player_name(&self.name_buffer);
                        self.begin_story(&name);
                    }
                    Stage::Story => self.begin_game(tick_timer),
                    Stage::Game => {}
                },
                KeyAction::ScrollUp => self.scroll_story(-1),
                KeyAction::ScrollDown => self.scroll_story(1),
                KeyAction::Turn(direction) => {
                    self.engine.set_direction(&mut self.state, direction);
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }
    }

    fn begin_story(&mut self, name: &str) {
        self.player = name.to_string();
        self.story = story_lines(name, self.engine.config());
        self.story_scroll = 0;
        self.stage = Stage::Story;
        info!(player = %self.player, "story shown");
    }

    fn begin_game(&mut self, tick_timer: &mut TickTimer) {
        if self.engine.start(&mut self.state) {
            self.stage = Stage::Game;
            self.metrics.on_game_start();
            tick_timer.apply(Schedule::After(self.state.speed()));
        }
    }

    fn scroll_story(&mut self, delta: i32) {
        let next = (self.story_scroll as i32 + delta).clamp(0, self.story_max_scroll as i32);
        self.story_scroll = next as u16;
    }

    fn update_game(&mut self) -> Schedule {
        let result = self.engine.tick(&mut self.state);

        if result.ate_food {
            self.metrics.on_food_eaten();
        }

        if let Some(outcome) = result.outcome {
            self.metrics.on_game_over();
            info!(
                player = %self.player,
                ?outcome,
                score = self.state.score,
                level = self.state.level,
                "game over"
            );
        }

        result.schedule
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GamePhase, Position};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(mode: &mut PlayMode, text: &str, timer: &mut TickTimer) {
        for c in text.chars() {
            mode.handle_event(key(KeyCode::Char(c)), timer);
        }
    }

    #[test]
    fn test_game_initialization() {
        let mode = PlayMode::new(GameConfig::default(), Some(1), None).unwrap();
        assert_eq!(mode.stage, Stage::Intro);
        assert_eq!(mode.state.phase, GamePhase::AwaitingStart);
        assert_eq!(mode.state.score, 0);
    }

    #[test]
    fn test_unplayable_config_is_rejected() {
        let config = GameConfig::new(1, 1);
        assert!(PlayMode::new(config, Some(1), None).is_err());
    }

    #[test]
    fn test_name_entry_leads_to_story() {
        let mut mode = PlayMode::new(GameConfig::default(), Some(1), None).unwrap();
        let mut timer = TickTimer::idle();

        type_text(&mut mode, "Kaax", &mut timer);
        mode.handle_event(key(KeyCode::Backspace), &mut timer);
        assert_eq!(mode.name_buffer, "Kaa");

        mode.handle_event(key(KeyCode::Enter), &mut timer);
        assert_eq!(mode.stage, Stage::Story);
        assert_eq!(mode.player, "Kaa");
        assert!(mode.story.iter().any(|line| line.contains("Kaa")));
        assert!(!timer.is_active());
    }

    #[test]
    fn test_name_length_is_capped() {
        let mut mode = PlayMode::new(GameConfig::default(), Some(1), None).unwrap();
        let mut timer = TickTimer::idle();

        type_text(&mut mode, &"x".repeat(40), &mut timer);
        assert_eq!(mode.name_buffer.chars().count(), MAX_NAME_LEN);
    }

    #[test]
    fn test_empty_name_falls_back() {
        let mut mode = PlayMode::new(GameConfig::default(), Some(1), None).unwrap();
        let mut timer = TickTimer::idle();

        mode.handle_event(key(KeyCode::Enter), &mut timer);
        assert_eq!(mode.player, "Snake");
    }

    #[test]
    fn test_known_name_skips_intro() {
        let mode = PlayMode::new(GameConfig::default(), Some(1), Some("Viper".to_string())).unwrap();
        assert_eq!(mode.stage, Stage::Story);
        assert_eq!(mode.player, "Viper");
    }

    #[test]
    fn test_story_scroll_is_bounded() {
        let mut mode = PlayMode::new(GameConfig::default(), Some(1), Some("Viper".to_string())).unwrap();
        mode.story_max_scroll = 2;

        mode.scroll_story(-1);
        assert_eq!(mode.story_scroll, 0);
        mode.scroll_story(1);
        mode.scroll_story(1);
        mode.scroll_story(1);
        assert_eq!(mode.story_scroll, 2);
    }

    #[tokio::test]
    async fn test_enter_on_story_starts_game() {
        let mut mode = PlayMode::new(GameConfig::default(), Some(1), Some("Viper".to_string())).unwrap();
        let mut timer = TickTimer::idle();

        mode.handle_event(key(KeyCode::Enter), &mut timer);

        assert_eq!(mode.stage, Stage::Game);
        assert!(mode.state.is_running());
        assert!(timer.is_active());
        assert_eq!(timer.period(), Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_turning_and_ticking() {
        let mut mode = PlayMode::new(GameConfig::default(), Some(1), Some("Viper".to_string())).unwrap();
        let mut timer = TickTimer::idle();
        mode.handle_event(key(KeyCode::Enter), &mut timer);
        mode.state.food = Position::new(0, 0);

        mode.handle_event(key(KeyCode::Left), &mut timer);
        assert_eq!(mode.state.snake.direction, Direction::Right);

        mode.handle_event(key(KeyCode::Char('s')), &mut timer);
        assert_eq!(mode.state.snake.direction, Direction::Down);

        let schedule = mode.update_game();
        assert_eq!(schedule, Schedule::After(Duration::from_millis(200)));
        assert_eq!(mode.state.snake.head(), Position::new(10, 11));
    }

    #[tokio::test]
    async fn test_no_restart_after_game_over() {
        let mut mode = PlayMode::new(GameConfig::default(), Some(1), Some("Viper".to_string())).unwrap();
        let mut timer = TickTimer::idle();
        mode.handle_event(key(KeyCode::Enter), &mut timer);

        mode.state.snake.body = vec![Position::new(19, 10), Position::new(18, 10)];
        mode.state.food = Position::new(0, 0);
        let schedule = mode.update_game();
        timer.apply(schedule);

        assert_eq!(mode.state.phase, GamePhase::Lost);
        assert!(!timer.is_active());
        assert!(!mode.metrics.running);

        let frozen = mode.state.clone();
        mode.handle_event(key(KeyCode::Enter), &mut timer);
        mode.handle_event(key(KeyCode::Char('r')), &mut timer);
        mode.handle_event(key(KeyCode::Up), &mut timer);
        assert_eq!(mode.state, frozen);
        assert!(!timer.is_active());
        assert!(!mode.should_quit);

        mode.handle_event(key(KeyCode::Char('q')), &mut timer);
        assert!(mode.should_quit);
    }

    #[tokio::test]
    async fn test_timer_follows_speed_changes() {
        let mut timer = TickTimer::idle();
        assert!(!timer.is_active());

        timer.apply(Schedule::After(Duration::from_millis(200)));
        assert_eq!(timer.period(), Duration::from_millis(200));

        timer.apply(Schedule::After(Duration::from_millis(180)));
        assert_eq!(timer.period(), Duration::from_millis(180));
        assert!(timer.is_active());

        timer.apply(Schedule::Stop);
        assert!(!timer.is_active());
    }
}
