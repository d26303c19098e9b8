use std::time::Duration;

use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        // Add initial body segments behind the head
        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx, -dy);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self { body, direction }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments(body: Vec<Position>, direction: Direction) -> Self {
        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Where the head lands on the next step
    pub fn next_head(&self) -> Position {
        self.head().moved_in_direction(self.direction)
    }

    /// Check if any segment, head and tail included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Shift the snake one cell forward
    ///
    /// The old tail cell is always vacated. A growing snake then doubles its
    /// new last segment, so the extra segment unfolds on the following ticks.
    pub fn advance(&mut self, should_grow: bool) {
        let new_head = self.next_head();
        self.body.insert(0, new_head);
        self.body.pop();

        if should_grow {
            let last = self.tail();
            self.body.push(last);
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Every cell of a `width` x `height` grid, row by row
pub fn grid_cells(width: usize, height: usize) -> impl Iterator<Item = Position> {
    (0..height as i32).flat_map(move |y| (0..width as i32).map(move |x| Position::new(x, y)))
}

/// A single-cell obstacle that wanders the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boss {
    pub position: Position,
}

impl Boss {
    pub fn new(position: Position) -> Self {
        Self { position }
    }
}

/// Type of collision that ended the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake ran into itself
    SelfCollision,
    /// Snake hit a wall
    Wall,
    /// Snake ran into a boss
    Boss,
}

/// Lifecycle of a single game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    AwaitingStart,
    Running,
    Lost,
    Won,
}

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Lost,
    Won,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub bosses: Vec<Boss>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub level: u32,
    /// Current tick interval in milliseconds
    pub speed_ms: u64,
    pub steps: u32,
    pub phase: GamePhase,
    /// What the snake hit, once the game is lost
    pub collision: Option<CollisionType>,
}

impl GameState {
    /// Create a new game state waiting to be started
    pub fn new(
        snake: Snake,
        food: Position,
        grid_width: usize,
        grid_height: usize,
        speed_ms: u64,
    ) -> Self {
        Self {
            snake,
            food,
            bosses: Vec::new(),
            grid_width,
            grid_height,
            score: 0,
            level: 1,
            speed_ms,
            steps: 0,
            phase: GamePhase::AwaitingStart,
            collision: None,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }

    /// Check if any boss sits on a position
    pub fn is_boss_at(&self, pos: Position) -> bool {
        self.bosses.iter().any(|boss| boss.position == pos)
    }

    pub fn speed(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, GamePhase::Lost | GamePhase::Won)
    }

    /// The result of a finished game, `None` while it is still going
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            GamePhase::Lost => Some(Outcome::Lost),
            GamePhase::Won => Some(Outcome::Won),
            GamePhase::AwaitingStart | GamePhase::Running => None,
        }
    }
}
