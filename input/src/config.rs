use serde::{Deserialize, Serialize};

/// Keys the game knows about. A windowing backend maps its own scancodes on
/// to these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    Space,
    LCtrl,
    RCtrl,
    LAlt,
    RAlt,
    LShift,
    RShift,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Pause,
    Escape,
}

/// The digit keys, in weapon slot order
pub const WEAPON_KEYS: [Key; 7] = [
    Key::Num1,
    Key::Num2,
    Key::Num3,
    Key::Num4,
    Key::Num5,
    Key::Num6,
    Key::Num7,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub key_right: Key,
    pub key_left: Key,
    pub key_up: Key,
    pub key_down: Key,
    pub key_strafeleft: Key,
    pub key_straferight: Key,
    pub key_fire: Key,
    pub key_use: Key,
    pub key_strafe: Key,
    pub key_speed: Key,
    pub key_pause: Key,
    pub mousebfire: MouseButton,
    pub mousebstrafe: MouseButton,
    pub mousebforward: MouseButton,
    /// Added to 5 then multiplied in to the mouse motion, per axis
    pub mouse_sensitivity: (i32, i32),
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            key_right: Key::Right,
            key_left: Key::Left,

            key_up: Key::W,
            key_down: Key::S,
            key_strafeleft: Key::A,
            key_straferight: Key::D,
            key_fire: Key::RCtrl,
            key_use: Key::Space,
            key_strafe: Key::RAlt,
            key_speed: Key::LShift,
            key_pause: Key::Pause,

            mousebfire: MouseButton::Left,
            mousebstrafe: MouseButton::Middle,
            mousebforward: MouseButton::Right,
            mouse_sensitivity: (5, 5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InputConfig, Key};

    #[test]
    fn toml_keeps_bindings() {
        let cfg = InputConfig {
            key_fire: Key::LCtrl,
            ..InputConfig::default()
        };
        let text = toml::to_string(&cfg).unwrap();
        assert!(text.contains("key_fire = \"LCtrl\""));
        let back: InputConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn missing_bindings_default() {
        let cfg: InputConfig = toml::from_str("key_use = \"D\"").unwrap();
        assert_eq!(cfg.key_use, Key::D);
        assert_eq!(cfg.key_up, Key::W);
    }
}
