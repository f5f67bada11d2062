//! Generator configuration
//!
//! Defaults reproduce the built-in target table. A TOML file can replace
//! any of them, and CLI flags override the file.
//!
//! # Example nrgen.toml
//!
//! ```toml
//! out_dir = "src/platform"
//!
//! [preprocessor]
//! program = "aarch64-linux-gnu-gcc"
//!
//! [[target]]
//! label = "linux-x86_64"
//!
//! [[target.source]]
//! kind = "table"
//! path = "arch/x86/entry/syscalls/syscall_64.tbl"
//! abis = ["common", "64"]
//! ```

use crate::corpus::Corpus;
use crate::error::{NrError, Result};
use crate::headers::Preprocessor;
use crate::target::{builtin_targets, ArchTarget};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default output directory, relative to the working directory
pub const DEFAULT_OUT_DIR: &str = "../src/platform";

/// Everything a generator run needs
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub corpus: Corpus,
    pub out_dir: PathBuf,
    pub preprocessor: Preprocessor,
    pub targets: Vec<ArchTarget>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            corpus: Corpus::default(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            preprocessor: Preprocessor::default(),
            targets: builtin_targets(),
        }
    }
}

/// On-disk form; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    out_dir: Option<PathBuf>,
    preprocessor: Option<Preprocessor>,
    #[serde(default)]
    target: Vec<ArchTarget>,
}

impl GeneratorConfig {
    /// Load overrides from a TOML file on top of the defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| NrError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            NrError::Config(msg) => NrError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Load overrides from TOML text on top of the defaults
    ///
    /// A non-empty `[[target]]` list replaces the built-in targets.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| NrError::Config(e.to_string()))?;

        let mut config = Self::default();
        if let Some(out_dir) = file.out_dir {
            config.out_dir = out_dir;
        }
        if let Some(preprocessor) = file.preprocessor {
            config.preprocessor = preprocessor;
        }
        if !file.target.is_empty() {
            config.targets = file.target;
        }

        config.validate()?;
        Ok(config)
    }

    /// Restrict the run to the named targets, in the order given
    pub fn select_targets<S: AsRef<str>>(&mut self, labels: &[S]) -> Result<()> {
        if labels.is_empty() {
            return Ok(());
        }

        let mut selected = Vec::with_capacity(labels.len());
        for label in labels {
            let label = label.as_ref();
            let target = self
                .targets
                .iter()
                .find(|t| t.label == label)
                .ok_or_else(|| NrError::UnknownTarget(label.to_string()))?;
            if !selected.iter().any(|t: &ArchTarget| t.label == label) {
                selected.push(target.clone());
            }
        }

        self.targets = selected;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.preprocessor.program.trim().is_empty() {
            return Err(NrError::Config(
                "preprocessor program must not be empty".to_string(),
            ));
        }

        if self.targets.is_empty() {
            return Err(NrError::Config("no targets configured".to_string()));
        }

        let mut seen = HashSet::new();
        for target in &self.targets {
            if target.label.is_empty() {
                return Err(NrError::Config("target label must not be empty".to_string()));
            }
            if !seen.insert(target.label.as_str()) {
                return Err(NrError::Config(format!(
                    "duplicate target label: {}",
                    target.label
                )));
            }
            if target.sources.is_empty() {
                return Err(NrError::Config(format!(
                    "target {} has no sources",
                    target.label
                )));
            }
        }

        Ok(())
    }
}
