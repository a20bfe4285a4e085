//! Session settings
//!
//! Read once at startup from the page query string
//! (`?mode=standard&voice=off&volume=0.5&seed=42&log=debug`). Nothing is
//! persisted between visits.

use serde::Serialize;

use crate::sim::GameMode;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Target behaviour for the session
    pub mode: GameMode,

    // === Audio ===
    /// Speak praise on hits
    pub voice: bool,
    /// Procedural release/hit sounds
    pub sfx: bool,
    /// Master volume (0.0 - 1.0)
    pub volume: f32,

    /// Fixed RNG seed; a time-based seed is used when absent
    pub seed: Option<u64>,
    /// Console log filter (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: GameMode::Moving,
            voice: true,
            sfx: true,
            volume: 0.8,
            seed: None,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Parse a URL query string. Unknown keys and malformed values are
    /// ignored, leaving the default in place.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        let query = query.trim().trim_start_matches('?');

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = value.trim();
            match key.trim().to_lowercase().as_str() {
                "mode" => match GameMode::from_str(value) {
                    Some(mode) => settings.mode = mode,
                    None => log::warn!("Unknown mode '{}', keeping {}", value, settings.mode.as_str()),
                },
                "voice" => {
                    if let Some(on) = parse_flag(value) {
                        settings.voice = on;
                    }
                }
                "sfx" => {
                    if let Some(on) = parse_flag(value) {
                        settings.sfx = on;
                    }
                }
                "volume" => {
                    match value.parse::<f32>() {
                        Ok(v) if v.is_finite() => settings.volume = v.clamp(0.0, 1.0),
                        _ => {}
                    }
                }
                "seed" => {
                    if let Ok(seed) = value.parse::<u64>() {
                        settings.seed = Some(seed);
                    }
                }
                "log" => {
                    if log_level_filter(value).is_some() {
                        settings.log_level = value.to_lowercase();
                    }
                }
                _ => {}
            }
        }

        settings
    }

    /// Log filter for the console logger
    pub fn log_filter(&self) -> log::LevelFilter {
        log_level_filter(&self.log_level).unwrap_or(log::LevelFilter::Info)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "" | "1" | "on" | "true" | "yes" => Some(true),
        "0" | "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn log_level_filter(value: &str) -> Option<log::LevelFilter> {
    match value.to_lowercase().as_str() {
        "off" => Some(log::LevelFilter::Off),
        "error" => Some(log::LevelFilter::Error),
        "warn" => Some(log::LevelFilter::Warn),
        "info" => Some(log::LevelFilter::Info),
        "debug" => Some(log::LevelFilter::Debug),
        "trace" => Some(log::LevelFilter::Trace),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_gives_defaults() {
        assert_eq!(Settings::from_query(""), Settings::default());
        assert_eq!(Settings::from_query("?"), Settings::default());
    }

    #[test]
    fn test_full_query() {
        let s = Settings::from_query("?mode=standard&voice=off&sfx=0&volume=0.25&seed=42&log=debug");
        assert_eq!(s.mode, GameMode::Standard);
        assert!(!s.voice);
        assert!(!s.sfx);
        assert_eq!(s.volume, 0.25);
        assert_eq!(s.seed, Some(42));
        assert_eq!(s.log_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_bad_values_are_ignored() {
        let s = Settings::from_query("mode=chaos&volume=loud&seed=-3&log=verbose&voice=maybe&&x=1");
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_volume_clamped() {
        assert_eq!(Settings::from_query("volume=7").volume, 1.0);
        assert_eq!(Settings::from_query("volume=-1").volume, 0.0);
        assert_eq!(Settings::from_query("volume=NaN").volume, 0.8);
    }

    #[test]
    fn test_bare_flag_means_on() {
        let s = Settings::from_query("voice=off&voice");
        assert!(s.voice);
    }

    #[test]
    fn test_serializes_for_snapshots() {
        let s = Settings::from_query("mode=standard&seed=9");
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"mode\":\"standard\""));
        assert!(json.contains("\"seed\":9"));
    }
}
