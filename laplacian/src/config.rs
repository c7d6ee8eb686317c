use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_THREAD_COUNT: usize = 23;
pub const DEFAULT_OUTPUT_PREFIX: &str = "laplacian";
pub const OUTPUT_EXTENSION: &str = "ppm";

/// Runtime settings, usually read from a YAML file.
///
/// ```yaml
/// thread_count: 8
/// max_concurrent_images: 4
/// output_dir: out
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Row partitions per image.
    pub thread_count: usize,
    /// Images filtered at the same time; unlimited when absent.
    pub max_concurrent_images: Option<usize>,
    /// Size of the global rayon pool; rayon's default when absent.
    pub pool_threads: Option<usize>,
    pub output_dir: PathBuf,
    pub output_prefix: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thread_count: DEFAULT_THREAD_COUNT,
            max_concurrent_images: None,
            pool_threads: None,
            output_dir: PathBuf::from("."),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml(&yaml)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config =
            serde_yml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.thread_count == 0 {
            return Err(Error::Config("thread_count must be >= 1".to_string()));
        }
        if self.max_concurrent_images == Some(0) {
            return Err(Error::Config(
                "max_concurrent_images must be >= 1".to_string(),
            ));
        }
        if self.pool_threads == Some(0) {
            return Err(Error::Config("pool_threads must be >= 1".to_string()));
        }
        if self.output_prefix.is_empty() {
            return Err(Error::Config("output_prefix must not be empty".to_string()));
        }
        Ok(())
    }

    /// Output file for the input at 1-based `position`, e.g. `laplacian3.ppm`.
    pub fn output_path(&self, position: usize) -> PathBuf {
        self.output_dir.join(format!(
            "{}{}.{}",
            self.output_prefix, position, OUTPUT_EXTENSION
        ))
    }
}
