use crate::config;

/// Settings for this run. Loading problems are reported on stderr (the
/// terminal is not in raw mode yet) and never stop startup.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(e) = s.validate() {
                eprintln!("scrobdl: invalid config, using defaults: {e}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            eprintln!("scrobdl: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
