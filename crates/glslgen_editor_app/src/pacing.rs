// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fixed-rate frame pacing.

use std::time::{Duration, Instant};

/// Schedules redraws at a fixed frame rate
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    next_frame: Instant,
}

impl FramePacer {
    /// Pace to `fps` frames per second, first frame due at `now`
    pub fn new(fps: u32, now: Instant) -> Self {
        Self {
            interval: Duration::from_secs(1) / fps.max(1),
            next_frame: now,
        }
    }

    /// Time between frames
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next frame is due
    pub fn next_frame(&self) -> Instant {
        self.next_frame
    }

    /// Whether a frame is due at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_frame
    }

    /// Record a frame started at `now` and schedule the next one.
    ///
    /// A frame that ran late does not make later frames catch up in a burst.
    pub fn frame_started(&mut self, now: Instant) {
        self.next_frame += self.interval;
        if self.next_frame < now {
            self.next_frame = now + self.interval;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval() {
        let pacer = FramePacer::new(60, Instant::now());
        assert_eq!(pacer.interval(), Duration::from_nanos(16_666_666));
        assert_eq!(FramePacer::new(0, Instant::now()).interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_schedule() {
        let start = Instant::now();
        let mut pacer = FramePacer::new(50, start);
        assert!(pacer.is_due(start));

        pacer.frame_started(start);
        assert_eq!(pacer.next_frame(), start + Duration::from_millis(20));
        assert!(!pacer.is_due(start + Duration::from_millis(19)));
        assert!(pacer.is_due(start + Duration::from_millis(20)));
    }

    #[test]
    fn test_late_frame_does_not_burst() {
        let start = Instant::now();
        let mut pacer = FramePacer::new(50, start);
        pacer.frame_started(start);

        let late = start + Duration::from_millis(100);
        pacer.frame_started(late);
        assert_eq!(pacer.next_frame(), late + Duration::from_millis(20));
    }
}
