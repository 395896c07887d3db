use log::LevelFilter;

use crate::color::DEFAULT_MAX_COLOR_ATTEMPTS;
use crate::image_cache::DEFAULT_ASSET_DIR;
use crate::viewport::{DESIGN_WIDTH, ViewportScale};

/// Runtime settings for the browser entry points.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Settings {
    /// Width of the layout mock, in design pixels.
    pub design_width: f64,
    /// Directory images are resolved under, relative to the module base URL.
    pub asset_dir: String,
    pub max_color_attempts: usize,
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            design_width: DESIGN_WIDTH,
            asset_dir: DEFAULT_ASSET_DIR.to_string(),
            max_color_attempts: DEFAULT_MAX_COLOR_ATTEMPTS,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn scale(&self) -> ViewportScale {
        ViewportScale::new(self.design_width)
    }

    /// Unknown level names fall back to `Info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| crate::UtilError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Whether images cached under `self` are still valid under `other`.
    /// Only the asset directory affects where files resolve.
    pub fn same_asset_dir(&self, other: &Settings) -> bool {
        self.asset_dir.trim_end_matches('/') == other.asset_dir.trim_end_matches('/')
    }

    pub fn validate(&self) -> crate::Result<()> {
        if !(self.design_width.is_finite() && self.design_width > 0.0) {
            return Err(crate::UtilError::Config(format!(
                "designWidth must be positive, got {}",
                self.design_width
            )));
        }
        if self.max_color_attempts == 0 {
            return Err(crate::UtilError::Config("maxColorAttempts must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_design_mock() {
        let s = Settings::default();
        assert_eq!(s.design_width, 750.0);
        assert_eq!(s.asset_dir, "../assets/");
        assert_eq!(s.level_filter(), LevelFilter::Info);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn level_parsing_is_lenient() {
        let s = Settings { log_level: "DEBUG".into(), ..Default::default() };
        assert_eq!(s.level_filter(), LevelFilter::Debug);
        let s = Settings { log_level: "chatty".into(), ..Default::default() };
        assert_eq!(s.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn rejects_bad_values() {
        let s = Settings { design_width: 0.0, ..Default::default() };
        assert!(s.validate().is_err());
        let s = Settings { max_color_attempts: 0, ..Default::default() };
        assert!(s.validate().is_err());
    }

    #[test]
    fn cache_survives_changes_outside_asset_dir() {
        let old = Settings::default();
        let quieter = Settings { log_level: "debug".into(), max_color_attempts: 10, ..old.clone() };
        assert!(old.same_asset_dir(&quieter));
        let trailing = Settings { asset_dir: "../assets".into(), ..old.clone() };
        assert!(old.same_asset_dir(&trailing));
        let moved = Settings { asset_dir: "static/img/".into(), ..old.clone() };
        assert!(!old.same_asset_dir(&moved));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_keeps_defaults() {
        let s = Settings::from_json(r#"{"designWidth": 375, "logLevel": "warn"}"#).unwrap();
        assert_eq!(s.design_width, 375.0);
        assert_eq!(s.asset_dir, "../assets/");
        assert_eq!(s.level_filter(), LevelFilter::Warn);
        assert!(Settings::from_json(r#"{"designWidth": -1}"#).is_err());
    }
}
