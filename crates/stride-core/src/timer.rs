//! Delta-driven timers
//!
//! Both timers advance only when ticked, so gameplay code stays deterministic under any
//! frame rate the host chooses.

/// A timer that counts down from a duration and reports when it runs out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountdownTimer {
    duration: f32,
    remaining: f32,
    running: bool,
}

impl CountdownTimer {
    /// Create a stopped timer with the given duration
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            remaining: 0.0,
            running: false,
        }
    }

    /// Restart the countdown from its full duration
    pub fn start(&mut self) {
        self.remaining = self.duration;
        self.running = self.duration > 0.0;
    }

    /// Stop without touching the remaining time
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance the countdown
    pub fn tick(&mut self, dt: f32) {
        if !self.running {
            return;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.running = false;
        }
    }

    /// Whether the countdown is active and has time left
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the countdown has run out (a never-started timer counts as finished)
    pub fn is_finished(&self) -> bool {
        !self.running && self.remaining <= 0.0
    }
}

/// A timer that only counts up while running
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StopwatchTimer {
    elapsed: f32,
    running: bool,
}

impl StopwatchTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero the elapsed time and start counting
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.running {
            self.elapsed += dt;
        }
    }

    /// Seconds counted since the last reset
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_runs_out() {
        let mut timer = CountdownTimer::new(0.15);
        assert!(!timer.is_running());
        assert!(timer.is_finished());

        timer.start();
        assert!(timer.is_running());
        assert!(!timer.is_finished());

        timer.tick(0.1);
        assert!(timer.is_running());

        timer.tick(0.1);
        assert!(!timer.is_running());
        assert!(timer.is_finished());
    }

    #[test]
    fn test_countdown_restart_refills() {
        let mut timer = CountdownTimer::new(1.0);
        timer.start();
        timer.tick(0.75);

        // Restarting mid-countdown gives the full duration again
        timer.start();
        timer.tick(0.75);
        assert!(timer.is_running());

        timer.stop();
        timer.tick(1.0);
        assert!(!timer.is_running());
        assert!(!timer.is_finished());
    }

    #[test]
    fn test_zero_duration_never_runs() {
        let mut timer = CountdownTimer::new(0.0);
        timer.start();
        assert!(!timer.is_running());
        assert!(timer.is_finished());
    }

    #[test]
    fn test_stopwatch() {
        let mut watch = StopwatchTimer::new();
        watch.tick(1.0);
        assert_eq!(watch.elapsed(), 0.0);

        watch.restart();
        watch.tick(0.5);
        watch.tick(0.25);
        assert_eq!(watch.elapsed(), 0.75);

        watch.restart();
        assert_eq!(watch.elapsed(), 0.0);
        watch.tick(0.5);
        assert_eq!(watch.elapsed(), 0.5);
    }
}
