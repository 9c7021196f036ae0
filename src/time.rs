//! Fixed-timestep accounting for the render loop.

use std::time::{Duration, Instant};

/// Upper bound on catch-up slices consumed per loop iteration.
///
/// After a long stall (debugger, minimized window) the accumulator would
/// otherwise demand one simulation step per missed frame with no limit.
/// Once the cap is hit the remaining backlog is dropped and timing restarts
/// from the current instant.
pub const MAX_CATCHUP_STEPS: u32 = 5;

/// Accumulator that converts irregular wall-clock progress into whole
/// simulation steps of a fixed duration.
///
/// Each consumed slice advances the accounted time by exactly one
/// `frame_time`, so fractional progress carries over to the next call and
/// the loop can catch up when the wall clock outpaces the target rate.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    frame_time: Duration,
    previous: Instant,
}

impl FixedTimestep {
    pub fn new(target_fps: u32) -> Self {
        Self {
            frame_time: Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1))),
            previous: Instant::now(),
        }
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Resets the accounted time, discarding any accumulated backlog.
    pub fn reset(&mut self, now: Instant) {
        self.previous = now;
    }

    /// Consumes whole frame-time slices elapsed up to `now` and returns how
    /// many simulation steps to run, at most [`MAX_CATCHUP_STEPS`].
    pub fn consume(&mut self, now: Instant) -> u32 {
        let mut steps = 0;
        while now.saturating_duration_since(self.previous) >= self.frame_time {
            self.previous += self.frame_time;
            steps += 1;
            if steps == MAX_CATCHUP_STEPS {
                self.previous = now;
                break;
            }
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timestep_at(start: Instant) -> FixedTimestep {
        let mut timestep = FixedTimestep::new(60);
        timestep.reset(start);
        timestep
    }

    #[test]
    fn no_step_before_a_full_frame_elapsed() {
        let start = Instant::now();
        let mut timestep = timestep_at(start);
        let half = timestep.frame_time() / 2;
        assert_eq!(timestep.consume(start + half), 0);
    }

    #[test]
    fn consumes_one_step_per_elapsed_frame() {
        let start = Instant::now();
        let mut timestep = timestep_at(start);
        let frame = timestep.frame_time();
        assert_eq!(timestep.consume(start + 3 * frame + frame / 2), 3);
    }

    #[test]
    fn fractional_progress_carries_over() {
        let start = Instant::now();
        let mut timestep = timestep_at(start);
        let frame = timestep.frame_time();
        assert_eq!(timestep.consume(start + frame / 2), 0);
        assert_eq!(timestep.consume(start + frame), 1);
        // The accounted time advanced by exactly one frame, not to `now`.
        assert_eq!(timestep.consume(start + 2 * frame), 1);
    }

    #[test]
    fn catch_up_is_capped_and_backlog_dropped() {
        let start = Instant::now();
        let mut timestep = timestep_at(start);
        let frame = timestep.frame_time();
        assert_eq!(timestep.consume(start + 100 * frame), MAX_CATCHUP_STEPS);
        // The backlog was discarded along with the cap.
        assert_eq!(timestep.consume(start + 100 * frame), 0);
        assert_eq!(timestep.consume(start + 101 * frame), 1);
    }
}
