use crate::hash::{hash2, rand_simple};

/// Glyph drawn at the flight's current position
pub const PLANE_GLYPH: char = '✈';

/// A one-shot plane flight across the terminal, triggered by every country
/// addition. Starts off-screen left in the bottom third, exits off-screen
/// right in the top third, over a randomized 1.5-2.5s. Owned by the app
/// state, so quitting drops any flight in progress.
#[derive(Debug, Clone)]
pub struct Flight {
    start: (f64, f64),
    end: (f64, f64),
    duration: u64,
    frame: u64,
}

impl Flight {
    /// Spawn with a trajectory randomized from `seed` for a `cols` x `rows`
    /// terminal, stepping at `tick_ms` per frame.
    pub fn spawn(cols: u16, rows: u16, tick_ms: u64, seed: u64) -> Self {
        let start_y = rows as f64 * (0.7 + 0.3 * rand_simple(hash2(seed, 1)));
        let end_y = rows as f64 * 0.3 * rand_simple(hash2(seed, 2));
        let duration_ms = 1500.0 + 1000.0 * rand_simple(hash2(seed, 3));

        Self {
            start: (-2.0, start_y),
            end: (cols as f64 + 2.0, end_y),
            duration: (duration_ms / tick_ms as f64).max(1.0) as u64,
            frame: 0,
        }
    }

    /// Advance one frame; false once the flight is done.
    pub fn tick(&mut self) -> bool {
        self.frame += 1;
        self.frame < self.duration
    }

    /// Current position in terminal cells.
    pub fn position(&self) -> (i32, i32) {
        let t = self.frame as f64 / self.duration as f64;
        let x = self.start.0 + (self.end.0 - self.start.0) * t;
        let y = self.start.1 + (self.end.1 - self.start.1) * t;
        (x.round() as i32, y.round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flies_up_and_right() {
        let mut flight = Flight::spawn(80, 24, 16, 99);
        let (x0, y0) = flight.position();
        for _ in 0..20 {
            flight.tick();
        }
        let (x1, y1) = flight.position();
        assert!(x1 > x0);
        assert!(y1 <= y0);
    }

    #[test]
    fn test_finishes_within_duration_bounds() {
        for seed in 0..32 {
            let mut flight = Flight::spawn(80, 24, 16, seed);
            let mut frames = 0;
            while flight.tick() {
                frames += 1;
            }
            // 1.5s..2.5s at 16ms per frame
            assert!((90..=160).contains(&frames), "seed {seed} took {frames} frames");
        }
    }

    #[test]
    fn test_starts_low_left_ends_high_right() {
        let flight = Flight::spawn(100, 30, 16, 7);
        assert!(flight.start.0 < 0.0);
        assert!(flight.start.1 >= 30.0 * 0.7);
        assert!(flight.end.0 > 100.0);
        assert!(flight.end.1 <= 30.0 * 0.3);
    }
}
