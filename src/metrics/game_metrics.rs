use std::time::{Duration, Instant};

/// Play-time bookkeeping for the header; the clock stops when the game ends
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub foods_eaten: u32,
    pub running: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            foods_eaten: 0,
            running: false,
        }
    }

    pub fn update(&mut self) {
        if self.running {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.foods_eaten = 0;
        self.running = true;
    }

    pub fn on_food_eaten(&mut self) {
        self.foods_eaten += 1;
    }

    pub fn on_game_over(&mut self) {
        self.update();
        self.running = false;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_clock_idle_before_start() {
        let mut metrics = GameMetrics::new();
        std::thread::sleep(Duration::from_millis(20));
        metrics.update();
        assert_eq!(metrics.elapsed_time, Duration::ZERO);
    }

    #[test]
    fn test_clock_freezes_at_game_over() {
        let mut metrics = GameMetrics::new();
        metrics.on_game_start();
        std::thread::sleep(Duration::from_millis(50));
        metrics.on_game_over();

        let frozen = metrics.elapsed_time;
        assert!(frozen.as_millis() >= 50);

        std::thread::sleep(Duration::from_millis(20));
        metrics.update();
        assert_eq!(metrics.elapsed_time, frozen);
    }

    #[test]
    fn test_food_counter() {
        let mut metrics = GameMetrics::new();
        metrics.on_game_start();
        metrics.on_food_eaten();
        metrics.on_food_eaten();
        assert_eq!(metrics.foods_eaten, 2);
    }
}
