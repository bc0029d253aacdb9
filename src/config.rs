use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::{
    color::BackgroundColor,
    error::{Error, Result},
    fit::ResizeFilter,
};

/// Command used to apply the composed image when none is configured. `{0}`
/// is replaced with the image path.
pub const DEFAULT_SET_PROGRAM: &str = "Esetroot {0}";

/// Settings read from `config.toml`. Command-line flags override them.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Display to query; unset means the session default.
    pub display: Option<String>,
    pub background: BackgroundColor,
    pub set_program: String,
    pub filter: ResizeFilter,
    /// Keep the composed image after the set program ran.
    pub keep_output: bool,
    /// Where to write the composed image; unset means the temp directory.
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: None,
            background: BackgroundColor::default(),
            set_program: DEFAULT_SET_PROGRAM.to_owned(),
            filter: ResizeFilter::default(),
            keep_output: false,
            output_dir: None,
        }
    }
}

impl Config {
    pub fn from_toml(path: &Path, contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|err| Error::Config {
            path: path.to_owned(),
            reason: err.to_string(),
        })
    }

    /// Loads `path`, or the default location when `path` is `None`.
    ///
    /// A missing file at the default location yields the defaults. A file
    /// that exists but cannot be read or parsed is an error, as is a missing
    /// file that was asked for explicitly.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, explicit) = match path {
            Some(path) => (path.to_owned(), true),
            None => match default_config_path() {
                Some(path) => (path, false),
                None => {
                    info!("No config directory on this platform, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !explicit && !config_path.exists() {
            info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|err| Error::Config {
            path: config_path.clone(),
            reason: err.to_string(),
        })?;
        let config = Self::from_toml(&config_path, &contents)?;
        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("multibg").join("config.toml"))
}
