use anyhow::{Context, Result};
use derivative::Derivative;
use image_matte::{
    color_key_effect::{DEFAULT_KEY_COLOR, DEFAULT_TOLERANCE},
    image_io::DEFAULT_EXTENSIONS,
    subject_border_effect::DEFAULT_BORDER_COLOR,
};
use serde::Deserialize;
use std::{fs, path::Path};

/// Optional TOML settings. Command line flags take precedence over every field.
#[derive(Deserialize, Default, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub color_key: ColorKey,
    pub subject_border: SubjectBorder,
    pub batch: Batch,
}

#[derive(Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default, deny_unknown_fields)]
pub struct ColorKey {
    #[derivative(Default(value = "DEFAULT_KEY_COLOR.to_string()"))]
    pub color: String,

    #[derivative(Default(value = "DEFAULT_TOLERANCE.value() as i64"))]
    pub tolerance: i64,
}

#[derive(Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default, deny_unknown_fields)]
pub struct SubjectBorder {
    #[derivative(Default(value = "DEFAULT_BORDER_COLOR.to_string()"))]
    pub color: String,

    #[derivative(Default(value = "2"))]
    pub width: i64,
}

#[derive(Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default, deny_unknown_fields)]
pub struct Batch {
    // 0 = one worker per CPU
    pub jobs: usize,

    #[derivative(Default(value = "DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()"))]
    pub extensions: Vec<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let config = toml::from_str::<Config>(&text)
            .with_context(|| format!("parse config file {}", path.display()))?;

        log::debug!("loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.color_key.color, "#8DC5FE");
        assert_eq!(config.color_key.tolerance, 30);
        assert_eq!(config.subject_border.color, "#FF0000");
        assert_eq!(config.subject_border.width, 2);
        assert_eq!(config.batch.jobs, 0);
        assert_eq!(config.batch.extensions, vec!["png", "jpg", "jpeg", "webp", "bmp"]);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str(
            r##"
            [color_key]
            tolerance = 12

            [batch]
            jobs = 3
            "##,
        )
        .unwrap();

        assert_eq!(config.color_key.tolerance, 12);
        assert_eq!(config.color_key.color, "#8DC5FE");
        assert_eq!(config.subject_border.width, 2);
        assert_eq!(config.batch.jobs, 3);
        assert_eq!(config.batch.extensions.len(), 5);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = toml::from_str::<Config>("[subject_border]\nthickness = 4\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("standee.toml");
        fs::write(
            &path,
            "[subject_border]\ncolor = \"#00FF00\"\nwidth = 5\n",
        )
        .unwrap();

        let config = Config::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.subject_border.color, "#00FF00");
        assert_eq!(config.subject_border.width, 5);

        assert!(Config::load(&dir.path().join("missing.toml")).is_err());
    }
}
