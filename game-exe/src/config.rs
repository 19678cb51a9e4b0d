//! User configuration options.

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use dirs::{config_dir, data_dir};
use gameplay::log::{error, info, warn};
use input::config::InputConfig;
use serde::{Deserialize, Serialize};

use crate::{BASE_DIR, CLIOptions};

const LOG_TAG: &str = "UserConfig";

fn get_cfg_file() -> Option<PathBuf> {
    let mut dir = config_dir()?;
    dir.push(BASE_DIR);
    if !dir.exists() {
        if let Err(e) = fs::create_dir_all(&dir) {
            error!(target: LOG_TAG, "Couldn't create {dir:?}: {e}");
            return None;
        }
    }
    dir.push("user.toml");
    Some(dir)
}

/// `<data dir>/room4doom/saves`, or the working directory if there is no
/// data dir
fn default_save_dir() -> PathBuf {
    data_dir()
        .map(|mut d| {
            d.push(BASE_DIR);
            d.push("saves");
            d
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub iwad: String,
    pub pwad: Vec<String>,
    pub save_dir: PathBuf,
    pub input: InputConfig,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            iwad: "doom.wad".to_string(),
            pwad: Vec::new(),
            save_dir: default_save_dir(),
            input: InputConfig::default(),
        }
    }
}

impl UserConfig {
    /// `load` reads the config file. A missing or broken file is replaced
    /// with defaults.
    pub fn load() -> Self {
        let Some(path) = get_cfg_file() else {
            warn!(target: LOG_TAG, "No config dir, using defaults");
            return UserConfig::default();
        };

        match fs::read_to_string(&path) {
            Ok(buf) => match Self::from_toml(&buf) {
                Some(data) => {
                    info!(target: LOG_TAG, "Loaded user config file");
                    return data;
                }
                None => warn!("Could not deserialise {:?} recreating config", path),
            },
            Err(e) => info!(target: LOG_TAG, "No config at {path:?} ({e}), creating one"),
        }

        let config = UserConfig::default();
        config.write();
        info!("Created default user config file");
        config
    }

    fn from_toml(buf: &str) -> Option<Self> {
        toml::from_str(buf).ok()
    }

    pub fn write(&self) {
        let Some(path) = get_cfg_file() else {
            return;
        };
        let data = match toml::to_string_pretty(self) {
            Ok(data) => data,
            Err(e) => {
                error!(target: LOG_TAG, "Could not serialise config: {e}");
                return;
            }
        };
        match File::create(&path).and_then(|mut f| f.write_all(data.as_bytes())) {
            Ok(_) => info!("Saved user config to {path:?}"),
            Err(err) => error!("Could not write config: {}", err),
        }
    }

    /// Sync the CLI options and UserOptions with each other. Anything given
    /// on the command line wins and is remembered.
    pub fn sync_cli(&mut self, cli: &mut CLIOptions) {
        info!("Checking CLI options");

        if !cli.iwad.is_empty() && cli.iwad != self.iwad {
            cli.iwad.clone_into(&mut self.iwad);
            info!("IWAD changed to: {}", &cli.iwad);
        } else {
            self.iwad.clone_into(&mut cli.iwad);
        }

        if !cli.pwad.is_empty() {
            cli.pwad.clone_into(&mut self.pwad);
        } else {
            self.pwad.clone_into(&mut cli.pwad);
        }

        match &cli.save_dir {
            Some(dir) => dir.clone_into(&mut self.save_dir),
            None => cli.save_dir = Some(self.save_dir.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use argh::FromArgs;
    use input::config::Key;

    use super::UserConfig;
    use crate::CLIOptions;

    #[test]
    fn partial_file_fills_defaults() {
        let cfg = UserConfig::from_toml(
            r#"
iwad = "doom2.wad"

[input]
key_use = "D"
"#,
        )
        .unwrap();
        assert_eq!(cfg.iwad, "doom2.wad");
        assert!(cfg.pwad.is_empty());
        assert_eq!(cfg.input.key_use, Key::D);
        assert_eq!(cfg.input.key_up, Key::W);
    }

    #[test]
    fn broken_file_is_rejected() {
        assert!(UserConfig::from_toml("iwad = [").is_none());
        assert!(UserConfig::from_toml("iwad = 3").is_none());
    }

    #[test]
    fn cli_wins_then_remembered() {
        let mut cfg = UserConfig {
            iwad: "doom.wad".to_string(),
            ..UserConfig::default()
        };
        let mut cli =
            CLIOptions::from_args(&["room4doom"], &["--iwad", "tnt.wad", "--pwad", "x.wad"])
                .unwrap();
        cfg.sync_cli(&mut cli);
        assert_eq!(cfg.iwad, "tnt.wad");
        assert_eq!(cfg.pwad, vec!["x.wad".to_string()]);
        assert_eq!(cli.save_dir.as_ref(), Some(&cfg.save_dir));

        let mut cli = CLIOptions::from_args(&["room4doom"], &[]).unwrap();
        cfg.sync_cli(&mut cli);
        assert_eq!(cli.iwad, "tnt.wad");
        assert_eq!(cli.pwad, vec!["x.wad".to_string()]);
    }
}
