use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Start with rate-limited playback.
    pub limit_fps: bool,
    /// Target frame rate when limited.
    pub fps: u32,
    /// Pacing for unthrottled frames; a terminal has no vsync to wait on.
    pub refresh_ms: u64,
    pub start_slide: usize,
    pub key_bindings: KeyBindings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub next_slide: String,
    pub prev_slide: String,
    pub toggle_limit: String,
    pub fps_up: String,
    pub fps_down: String,
    pub restart: String,
    pub reset_slide: String,
    pub quit: String,
    pub cancel: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            limit_fps: false,
            fps: 30,
            refresh_ms: 16,
            start_slide: 0,
            key_bindings: KeyBindings::default(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            next_slide: "Right".into(),
            prev_slide: "Left".into(),
            toggle_limit: "f".into(),
            fps_up: "+".into(),
            fps_down: "-".into(),
            restart: "r".into(),
            reset_slide: "R".into(),
            quit: "q".into(),
            cancel: "Esc".into(),
        }
    }
}

impl PlayerConfig {
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(json) => Self::parse(&json).unwrap_or_else(|e| {
                warn!("invalid player config {} ({e}), using defaults", config_path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    fn config_path() -> std::path::PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = std::path::PathBuf::from(home);
        path.push(".config");
        path.push("polyslides");
        path.push("player.json");
        path
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    if let Some(rest) = binding.strip_prefix("Ctrl-") {
        if !event.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        return match rest.chars().next() {
            Some(c) => event.code == KeyCode::Char(c),
            None => false,
        };
    }

    // Plain bindings never fire with Ctrl or Alt held. Shift is allowed so
    // "R" and "+" work on any layout.
    if event.modifiers.contains(KeyModifiers::CONTROL)
        || event.modifiers.contains(KeyModifiers::ALT)
    {
        return false;
    }

    match binding {
        "Right" => event.code == KeyCode::Right,
        "Left" => event.code == KeyCode::Left,
        "Up" => event.code == KeyCode::Up,
        "Down" => event.code == KeyCode::Down,
        "Enter" => event.code == KeyCode::Enter,
        "Esc" => event.code == KeyCode::Esc,
        "Space" => event.code == KeyCode::Char(' '),
        "Tab" => event.code == KeyCode::Tab,
        "Home" => event.code == KeyCode::Home,
        "End" => event.code == KeyCode::End,
        s => {
            if let Some(n) = s.strip_prefix('F').and_then(|r| r.parse::<u8>().ok()) {
                return event.code == KeyCode::F(n);
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => event.code == KeyCode::Char(c),
                _ => false,
            }
        }
    }
}

/// Digit keys `1`..`9` select a slide directly; returns the zero-based index.
pub fn slide_digit(event: &KeyEvent) -> Option<usize> {
    match event.code {
        KeyCode::Char(c @ '1'..='9') => Some(c as usize - '1' as usize),
        _ => None,
    }
}
