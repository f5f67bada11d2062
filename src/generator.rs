//! End-to-end generation: discover, resolve every target, emit
//!
//! All targets are resolved and rendered before the first artifact is
//! written, so a resolution or naming failure in any architecture leaves the
//! output directory untouched. Only I/O errors while writing can leave a
//! partial set of artifacts behind.

use crate::config::GeneratorConfig;
use crate::discovery::{self, NameSet};
use crate::emit;
use crate::error::Result;
use crate::resolve::{resolve_target, NumberTable};
use crate::source::ResolveContext;
use std::path::PathBuf;

/// What happened to one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub label: String,
    /// Number of resolved syscalls
    pub count: usize,
    /// Artifact written, `None` when the table was empty
    pub path: Option<PathBuf>,
}

/// Drives a full run from a [`GeneratorConfig`]
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Discover candidates in the corpus, then resolve and emit
    pub fn run(&self) -> Result<Vec<Outcome>> {
        let names = discovery::discover(&self.config.corpus)?;
        self.run_with_names(&names)
    }

    /// Resolve and emit against an already known candidate set
    pub fn run_with_names(&self, names: &NameSet) -> Result<Vec<Outcome>> {
        let tables = self.resolve_all(names)?;
        let rendered = tables
            .iter()
            .map(emit::render_artifact)
            .collect::<Result<Vec<_>>>()?;

        tables
            .iter()
            .zip(rendered)
            .map(|(table, contents)| {
                let path = contents
                    .map(|contents| {
                        emit::write_rendered(&self.config.out_dir, table.arch(), &contents)
                    })
                    .transpose()?;
                Ok(Outcome {
                    label: table.arch().to_string(),
                    count: table.len(),
                    path,
                })
            })
            .collect()
    }

    /// Resolve every configured target without writing anything
    pub fn resolve_all(&self, names: &NameSet) -> Result<Vec<NumberTable>> {
        let ctx = ResolveContext {
            corpus: &self.config.corpus,
            names,
            preprocessor: &self.config.preprocessor,
        };

        self.config
            .targets
            .iter()
            .map(|target| resolve_target(target, &ctx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use crate::error::NrError;
    use crate::source::Source;
    use crate::table::TableSource;
    use crate::target::ArchTarget;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(corpus: &TempDir, out: &TempDir, targets: Vec<ArchTarget>) -> GeneratorConfig {
        GeneratorConfig {
            corpus: Corpus::new(corpus.path()),
            out_dir: out.path().to_path_buf(),
            targets,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_empty_target_is_reported_but_not_written() {
        let corpus = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::write(corpus.path().join("x.tbl"), "1\ti386\texit\n").unwrap();

        let generator = Generator::new(config_for(
            &corpus,
            &out,
            vec![ArchTarget::new(
                "linux-empty",
                vec![Source::Table(TableSource::new("x.tbl", ["common"]))],
            )],
        ));

        let outcomes = generator.run_with_names(&NameSet::new()).unwrap();
        assert_eq!(
            outcomes,
            vec![Outcome {
                label: "linux-empty".to_string(),
                count: 0,
                path: None,
            }]
        );
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failure_in_later_target_writes_nothing() {
        let corpus = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::write(corpus.path().join("ok.tbl"), "5\tcommon\tread\n").unwrap();

        let generator = Generator::new(config_for(
            &corpus,
            &out,
            vec![
                ArchTarget::new(
                    "linux-good",
                    vec![Source::Table(TableSource::new("ok.tbl", ["common"]))],
                ),
                ArchTarget::new(
                    "linux-bad",
                    vec![Source::Table(TableSource::new("missing.tbl", ["common"]))],
                ),
            ],
        ));

        let err = generator.run_with_names(&NameSet::new()).unwrap_err();
        assert!(matches!(err, NrError::Read { .. }));
        assert!(!out.path().join("linux-good").exists());
    }

    #[test]
    fn test_colliding_constants_in_later_target_write_nothing() {
        let corpus = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::write(corpus.path().join("ok.tbl"), "5\tcommon\tread\n").unwrap();
        fs::write(
            corpus.path().join("clash.tbl"),
            "1\tcommon\tARM_x\n2\tcommon\tarm_x\n",
        )
        .unwrap();

        let generator = Generator::new(config_for(
            &corpus,
            &out,
            vec![
                ArchTarget::new(
                    "linux-good",
                    vec![Source::Table(TableSource::new("ok.tbl", ["common"]))],
                ),
                ArchTarget::new(
                    "linux-clash",
                    vec![Source::Table(TableSource::new("clash.tbl", ["common"]))],
                ),
            ],
        ));

        let err = generator.run_with_names(&NameSet::new()).unwrap_err();
        assert!(matches!(
            err,
            NrError::DuplicateConstant { ref arch, ref name } if arch == "linux-clash" && name == "ARM_X"
        ));
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }
}
