//! The contract between the game and whatever plays its sound. Everything is
//! fire-and-forget: the game sends a `SoundAction` down a channel and never
//! reads a result back.

use std::{
    fmt::Debug,
    sync::mpsc::{Receiver, Sender},
    time::Duration,
};

mod sounds;
pub use sounds::*;

/// `S` is SFX enum, `E` is Errors
pub type InitResult<S, E> = Result<Sender<SoundAction<S>>, E>;

#[derive(Debug, Clone, PartialEq)]
pub enum SoundAction<S: Debug + Copy> {
    StartSfx {
        /// Objects unique ID or hash. This should be used to track which
        /// object owns which sounds so it can be stopped e.g, death, shoot..
        uid: usize,
        /// The Sound effect this object has
        sfx: S,
        /// The world XY coords of this object
        x: f32,
        y: f32,
    },
    StopSfx {
        uid: usize,
    },
    StopSfxAll,
    /// Pause everything playing, `S_PauseSound`
    Pause,
    /// `S_ResumeSound`
    Resume,
    SfxVolume(i32),
    Shutdown,
}

/// A sound server implementing `SoundServer` must also implement `SoundServerTic`
/// typically by a one-liner: `impl SoundServerTic<SndFx> for Snd {}`
pub trait SoundServer<S, E>
where
    S: Debug + Copy,
    E: std::error::Error,
{
    /// Start up all sound stuff and grab the `Sender` channel for cloning
    fn init(&mut self) -> InitResult<S, E>;

    /// Playback a sound
    fn start_sound(&mut self, uid: usize, sfx: S, x: f32, y: f32);

    /// Stop this sound playback
    fn stop_sound(&mut self, uid: usize);

    fn stop_sound_all(&mut self);

    fn pause(&mut self);

    fn resume(&mut self);

    fn set_sfx_volume(&mut self, volume: i32);

    fn get_sfx_volume(&mut self) -> i32;

    /// Start, stop, change, remove sounds. Anything that a sound server needs
    /// to do each tic
    fn update_self(&mut self);

    /// Helper function used by the `SoundServerTic` trait
    fn get_rx(&mut self) -> &mut Receiver<SoundAction<S>>;

    /// Stop all sound and release the sound device
    fn shutdown_sound(&mut self);
}

/// Run the `SoundServer`
pub trait SoundServerTic<S, E>
where
    Self: SoundServer<S, E>,
    S: Debug + Copy,
    E: std::error::Error,
{
    /// Will be called every period on a thread containing `SoundServer`, returns
    /// `true` if the thread should continue running, else `false` if it should exit.
    fn tic(&mut self) -> bool {
        if let Ok(sound) = self.get_rx().recv_timeout(Duration::from_micros(500)) {
            match sound {
                SoundAction::StartSfx { uid, sfx, x, y } => self.start_sound(uid, sfx, x, y),
                SoundAction::StopSfx { uid } => self.stop_sound(uid),
                SoundAction::StopSfxAll => self.stop_sound_all(),
                SoundAction::Pause => self.pause(),
                SoundAction::Resume => self.resume(),
                SoundAction::SfxVolume(v) => self.set_sfx_volume(v),
                SoundAction::Shutdown => {
                    self.shutdown_sound();
                    return false;
                }
            }
        }
        self.update_self();
        true
    }
}

#[cfg(test)]
mod tests {
    use std::{
        error::Error,
        fmt::Display,
        sync::mpsc::{Receiver, Sender, channel},
    };

    use crate::{InitResult, SoundAction, SoundServer, SoundServerTic};

    #[derive(Debug)]
    enum FxError {}

    impl Error for FxError {}

    impl Display for FxError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&format!("{:?}", self))
        }
    }

    #[derive(Debug, Clone, Copy)]
    enum SndFx {
        One,
    }

    struct Snd {
        rx: Receiver<SoundAction<SndFx>>,
        tx: Sender<SoundAction<SndFx>>,
        started: usize,
        paused: bool,
    }

    impl Snd {
        fn new() -> Self {
            let (tx, rx) = channel();
            Self {
                rx,
                tx,
                started: 0,
                paused: false,
            }
        }
    }

    impl SoundServer<SndFx, FxError> for Snd {
        fn init(&mut self) -> InitResult<SndFx, FxError> {
            Ok(self.tx.clone())
        }

        fn start_sound(&mut self, _uid: usize, _sfx: SndFx, _x: f32, _y: f32) {
            self.started += 1;
        }

        fn stop_sound(&mut self, _uid: usize) {}

        fn stop_sound_all(&mut self) {}

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn set_sfx_volume(&mut self, _volume: i32) {}

        fn get_sfx_volume(&mut self) -> i32 {
            6
        }

        fn update_self(&mut self) {}

        fn get_rx(&mut self) -> &mut Receiver<SoundAction<SndFx>> {
            &mut self.rx
        }

        fn shutdown_sound(&mut self) {}
    }

    impl SoundServerTic<SndFx, FxError> for Snd {}

    #[test]
    fn run_tic() {
        let mut snd = Snd::new();
        let tx = snd.init().unwrap();

        tx.send(SoundAction::StartSfx {
            uid: 123,
            sfx: SndFx::One,
            x: 0.3,
            y: 0.3,
        })
        .unwrap();
        tx.send(SoundAction::Pause).unwrap();
        tx.send(SoundAction::StopSfx { uid: 123 }).unwrap();
        for _ in 0..3 {
            assert!(snd.tic());
        }
        assert_eq!(snd.started, 1);
        assert!(snd.paused);
        assert_eq!(snd.rx.try_iter().count(), 0);

        tx.send(SoundAction::Shutdown).unwrap();
        assert!(!snd.tic());
    }
}
