use crate::config;

pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("cassette: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Missing or broken config falls back to defaults.
            eprintln!("cassette: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
