//! A sound server that plays nothing. Used headless and in tests; it still
//! drains the channel so senders never back up.

use std::{
    error::Error,
    fmt::Display,
    sync::mpsc::{Receiver, Sender, channel},
};

use log::{debug, info};

use sound_traits::{InitResult, SfxName, SoundAction, SoundServer, SoundServerTic};

pub type SndServerRx = Receiver<SoundAction<SfxName>>;
pub type SndServerTx = Sender<SoundAction<SfxName>>;

pub struct Snd {
    rx: SndServerRx,
    tx: SndServerTx,
    volume: i32,
}

impl Snd {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let (tx, rx) = channel();
        Ok(Self { rx, tx, volume: 0 })
    }
}

#[derive(Debug)]
pub enum SndError {
    None,
}

impl Display for SndError {
    fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}

impl std::error::Error for SndError {}

impl SoundServer<SfxName, SndError> for Snd {
    fn init(&mut self) -> InitResult<SfxName, SndError> {
        Ok(self.tx.clone())
    }

    fn start_sound(&mut self, _: usize, sfx: SfxName, _: f32, _: f32) {
        debug!("nosnd: {sfx}");
    }

    fn stop_sound(&mut self, _: usize) {}

    fn stop_sound_all(&mut self) {}

    fn pause(&mut self) {}

    fn resume(&mut self) {}

    fn set_sfx_volume(&mut self, volume: i32) {
        self.volume = volume;
    }

    fn get_sfx_volume(&mut self) -> i32 {
        self.volume
    }

    fn update_self(&mut self) {}

    fn get_rx(&mut self) -> &mut SndServerRx {
        &mut self.rx
    }

    fn shutdown_sound(&mut self) {
        info!("Shutdown sound server");
        self.stop_sound_all();
    }
}

impl SoundServerTic<SfxName, SndError> for Snd {}

#[cfg(test)]
mod tests {
    use sound_traits::{SfxName, SoundAction, SoundServer, SoundServerTic};

    use crate::Snd;

    #[test]
    fn drains_until_shutdown() {
        let mut snd = Snd::new().unwrap();
        let tx = snd.init().unwrap();
        tx.send(SoundAction::SfxVolume(9)).unwrap();
        tx.send(SoundAction::StartSfx {
            uid: 0,
            sfx: SfxName::Pstart,
            x: 0.0,
            y: 0.0,
        })
        .unwrap();
        tx.send(SoundAction::Shutdown).unwrap();

        assert!(snd.tic());
        assert!(snd.tic());
        assert!(!snd.tic());
        assert_eq!(snd.get_sfx_volume(), 9);
    }
}
