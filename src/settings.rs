use configparser::ini::Ini;
use log::{info, warn};
use std::path::Path;

const SETTINGS_PATH: &str = "settings.ini";

const DEFAULT_WINDOW_SCALE: u32 = 10;

/// User-facing startup settings. Loaded once in `main` and passed down by
/// value; nothing reads the file after startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Window edge length is 64 * scale pixels.
    pub window_scale: u32,
    pub vsync: bool,
    /// Fixed RNG seed for reproducible runs; absent means seed from entropy.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            window_scale: DEFAULT_WINDOW_SCALE,
            vsync: true,
            seed: None,
        }
    }
}

fn write_defaults() -> Result<(), std::io::Error> {
    info!("settings file not found, writing defaults to '{}'", SETTINGS_PATH);
    let mut conf = Ini::new();
    conf.set("window", "scale", Some(DEFAULT_WINDOW_SCALE.to_string()));
    conf.set("window", "vsync", Some("true".to_string()));
    conf.set("game", "seed", Some(String::new()));
    conf.write(SETTINGS_PATH)
}

pub fn load() -> Settings {
    if !Path::new(SETTINGS_PATH).exists() {
        if let Err(e) = write_defaults() {
            warn!("could not write default settings: {}", e);
            return Settings::default();
        }
    }

    let mut conf = Ini::new();
    if let Err(e) = conf.load(SETTINGS_PATH) {
        warn!("could not parse '{}': {}; using defaults", SETTINGS_PATH, e);
        return Settings::default();
    }

    let defaults = Settings::default();
    let window_scale = conf
        .get("window", "scale")
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.window_scale)
        .max(1);
    let vsync = conf
        .getbool("window", "vsync")
        .ok()
        .flatten()
        .unwrap_or(defaults.vsync);
    let seed = conf.get("game", "seed").and_then(|s| s.parse().ok());

    Settings {
        window_scale,
        vsync,
        seed,
    }
}
