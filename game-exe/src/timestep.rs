//! Gameplay speed control. It attempts to mimic/limit progression to
//! the 35 tics per second Doom used.

use std::{fmt, time::Instant};

const MS_PER_UPDATE: f32 = 1000.0 / 35.0;

#[derive(Debug)]
pub struct TimeStep {
    last_time: Instant,
    delta_time: f32,
    frame_count: u32,
    frame_time: f32,
    run_tics: u32,
    last_tics: u32,
    lag: f32,
}

#[derive(Debug)]
pub struct FrameData {
    pub tics: u32,
    pub frames: u32,
}

impl fmt::Display for FrameData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "FrameData (per-second): tics: {}, loops: {}",
            self.tics, self.frames
        ))
    }
}

impl TimeStep {
    pub fn new() -> TimeStep {
        TimeStep {
            last_time: Instant::now(),
            delta_time: 0.0,
            frame_count: 0,
            frame_time: 0.0,
            run_tics: 0,
            last_tics: 0,
            lag: 0.0,
        }
    }

    pub fn delta(&mut self) -> f32 {
        let current_time = Instant::now();
        let delta = current_time.duration_since(self.last_time).as_micros() as f32 * 0.001;
        self.last_time = current_time;
        self.delta_time = delta;
        delta
    }

    /// Increments self time, then runs `run_this` once for each whole tic
    /// that has built up. Returns how many tics ran. An error stops the
    /// remaining tics.
    pub fn run_this<E>(&mut self, mut run_this: impl FnMut() -> Result<(), E>) -> Result<u32, E> {
        let dt = self.delta();
        self.lag += dt;
        let mut ran = 0;
        while self.lag >= MS_PER_UPDATE {
            run_this()?;
            self.lag -= MS_PER_UPDATE;
            self.run_tics += 1;
            ran += 1;
        }
        Ok(ran)
    }

    /// Count a tic run outside of `run_this`
    pub fn count_tic(&mut self) {
        self.run_tics += 1;
    }

    /// Once a second, the tics and loops done in that second
    pub fn frame_rate(&mut self) -> Option<FrameData> {
        self.frame_count += 1;
        self.frame_time += self.delta_time;
        // per second
        if self.frame_time >= 1000.0 {
            let frames = self.frame_count;
            let last = self.last_tics;
            self.frame_count = 0;
            self.frame_time = 0.0;
            self.last_tics = self.run_tics;
            return Some(FrameData {
                tics: self.run_tics - last,
                frames,
            });
        }

        None
    }
}

impl Default for TimeStep {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::thread::sleep;
    use std::time::Duration;

    use super::TimeStep;

    #[test]
    fn runs_whole_tics_only() {
        let mut ts = TimeStep::new();
        let mut count = 0;
        let ran = ts
            .run_this(|| {
                count += 1;
                Ok::<(), ()>(())
            })
            .unwrap();
        assert_eq!(ran, 0);
        assert_eq!(count, 0);

        sleep(Duration::from_millis(60));
        let ran = ts.run_this(|| Ok::<(), ()>(())).unwrap();
        assert!(ran >= 2);
    }

    #[test]
    fn error_stops_the_run() {
        let mut ts = TimeStep::new();
        sleep(Duration::from_millis(100));
        let mut count = 0;
        let res = ts.run_this(|| {
            count += 1;
            if count == 2 { Err("stop") } else { Ok(()) }
        });
        assert_eq!(res, Err("stop"));
        assert_eq!(count, 2);
    }
}
