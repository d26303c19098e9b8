use std::time::Duration;

use anyhow::{Context, Result, bail};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::{
    config::GameConfig,
    direction::Direction,
    state::{Boss, CollisionType, GamePhase, GameState, Outcome, Position, Snake, grid_cells},
};

/// What the tick scheduler should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Run the next tick after this interval
    After(Duration),
    /// The game is over, do not tick again
    Stop,
}

/// Result of a game tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision: Option<CollisionType>,
    /// Whether this tick raised the level
    pub leveled_up: bool,
    /// Number of bosses spawned by a level-up this tick
    pub bosses_spawned: usize,
    /// Set when this tick (or an earlier one) finished the game
    pub outcome: Option<Outcome>,
    pub schedule: Schedule,
}

impl TickResult {
    fn idle(state: &GameState) -> Self {
        Self {
            ate_food: false,
            collision: None,
            leveled_up: false,
            bosses_spawned: 0,
            outcome: state.outcome(),
            schedule: Schedule::Stop,
        }
    }
}

/// The game engine that handles all game logic
///
/// The engine owns the configuration and the random source; all game data
/// lives in [`GameState`], so a renderer can read it without touching the
/// engine.
pub struct GameEngine<R: Rng = StdRng> {
    config: GameConfig,
    rng: R,
}

impl GameEngine<StdRng> {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose random choices are reproducible
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build the initial state: snake in the centre heading right, food placed
    ///
    /// Fails when the configuration does not describe a playable board.
    pub fn reset(&mut self) -> Result<GameState> {
        if let Err(reason) = self.config.validate() {
            bail!("Invalid game config: {}", reason);
        }

        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let (width, height) = (self.config.grid_width, self.config.grid_height);
        let food = self
            .random_free_cell(width, height, |pos| !snake.occupies(pos))
            .context("No free cell for the first food")?;

        Ok(GameState::new(
            snake,
            food,
            width,
            height,
            self.config.initial_speed_ms,
        ))
    }

    /// Move from the waiting screen into play
    pub fn start(&self, state: &mut GameState) -> bool {
        if state.phase != GamePhase::AwaitingStart {
            return false;
        }

        state.phase = GamePhase::Running;
        info!(
            length = state.snake.len(),
            speed_ms = state.speed_ms,
            "game started"
        );
        true
    }

    /// Change the snake's heading unless it would reverse onto itself
    ///
    /// Returns whether the new direction was taken.
    pub fn set_direction(&self, state: &mut GameState, direction: Direction) -> bool {
        if state.is_terminal() || state.snake.direction.is_opposite(direction) {
            return false;
        }

        state.snake.direction = direction;
        true
    }

    /// Advance the game by one grid step
    pub fn tick(&mut self, state: &mut GameState) -> TickResult {
        if !state.is_running() {
            return TickResult::idle(state);
        }

        let new_head = state.snake.next_head();

        // Check for collisions before anything moves
        if let Some(collision) = self.check_collision(state, new_head) {
            state.phase = GamePhase::Lost;
            state.collision = Some(collision);
            info!(?collision, score = state.score, level = state.level, "game lost");

            return TickResult {
                collision: Some(collision),
                ..TickResult::idle(state)
            };
        }

        let ate_food = new_head == state.food;
        state.snake.advance(ate_food);
        state.steps += 1;

        let mut leveled_up = false;
        let mut bosses_spawned = 0;

        if ate_food {
            match self.place_food(state) {
                Some(food) => state.food = food,
                None => {
                    info!(score = state.score, "board is full");
                    state.phase = GamePhase::Won;
                }
            }
            state.score += self.config.food_score;
            debug!(score = state.score, length = state.snake.len(), "food eaten");

            if state.snake.len() >= self.config.max_snake_length {
                state.phase = GamePhase::Won;
            } else if state.is_running() && state.score % self.config.level_up_score == 0 {
                bosses_spawned = self.level_up(state);
                leveled_up = true;
            }

            if state.phase == GamePhase::Won {
                info!(score = state.score, level = state.level, "game won");
            }
        }

        if state.is_running() {
            self.move_bosses(state);
        }

        TickResult {
            ate_food,
            collision: None,
            leveled_up,
            bosses_spawned,
            outcome: state.outcome(),
            schedule: if state.is_running() {
                Schedule::After(state.speed())
            } else {
                Schedule::Stop
            },
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if state.is_occupied_by_snake(pos) {
            return Some(CollisionType::SelfCollision);
        }

        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.is_boss_at(pos) {
            return Some(CollisionType::Boss);
        }

        None
    }

    /// Raise the level, speed up, and bring in a boss wave if one is due.
    /// Returns the number of bosses spawned.
    fn level_up(&mut self, state: &mut GameState) -> usize {
        state.level += 1;
        state.speed_ms = state
            .speed_ms
            .saturating_sub(self.config.speed_step_ms)
            .max(self.config.min_speed_ms);
        info!(level = state.level, speed_ms = state.speed_ms, "level up");

        let mut spawned = 0;
        if let Some(count) = self.config.boss_wave_for(state.level) {
            let bosses = self.spawn_bosses(state, count);
            spawned = bosses.len();
            state.bosses = bosses;
            info!(level = state.level, bosses = spawned, "boss wave");
        }

        if state.level == self.config.win_level {
            state.phase = GamePhase::Won;
        }

        spawned
    }

    /// Pick fresh boss cells away from the snake, the food and each other
    fn spawn_bosses(&mut self, state: &GameState, count: usize) -> Vec<Boss> {
        let mut bosses: Vec<Boss> = Vec::with_capacity(count);

        for _ in 0..count {
            let cell = self.random_free_cell(state.grid_width, state.grid_height, |pos| {
                !state.is_occupied_by_snake(pos)
                    && pos != state.food
                    && !bosses.iter().any(|boss| boss.position == pos)
            });

            match cell {
                Some(pos) => bosses.push(Boss::new(pos)),
                None => {
                    warn!(wanted = count, placed = bosses.len(), "no room for boss");
                    break;
                }
            }
        }

        bosses
    }

    /// Each boss takes one random step, staying put if it would leave the board
    fn move_bosses(&mut self, state: &mut GameState) {
        for i in 0..state.bosses.len() {
            let direction = Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())];
            let target = state.bosses[i].position.moved_in_direction(direction);

            if state.is_in_bounds(target) {
                state.bosses[i].position = target;
            }
        }
    }

    /// Find a cell for new food, off the snake and every boss
    fn place_food(&mut self, state: &GameState) -> Option<Position> {
        self.random_free_cell(state.grid_width, state.grid_height, |pos| {
            !state.is_occupied_by_snake(pos) && !state.is_boss_at(pos)
        })
    }

    /// Uniformly pick a cell satisfying `is_free`
    ///
    /// Random probing is tried first; once `placement_attempts` probes miss,
    /// the free cells are enumerated so a crowded board still terminates.
    fn random_free_cell(
        &mut self,
        width: usize,
        height: usize,
        is_free: impl Fn(Position) -> bool,
    ) -> Option<Position> {
        for _ in 0..self.config.placement_attempts {
            let x = self.rng.gen_range(0..width) as i32;
            let y = self.rng.gen_range(0..height) as i32;
            let pos = Position::new(x, y);

            if is_free(pos) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = grid_cells(width, height).filter(|pos| is_free(*pos)).collect();
        debug!(free = free.len(), "placement fell back to free-cell scan");
        free.choose(&mut self.rng).copied()
    }
}
