//! Header probing through the C preprocessor
//!
//! Rather than reimplementing each architecture's conditional compilation,
//! a throwaway translation unit is preprocessed against the architecture's
//! UAPI headers. Every candidate gets one line
//!
//! ```text
//! gen_nr read __NR_read
//! ```
//!
//! which comes back as `gen_nr read 63` when the macro is defined and
//! unchanged when it is not.

use crate::corpus::Corpus;
use crate::discovery::NameSet;
use crate::error::{NrError, Result};
use crate::expr::{eval_expr, parse_literal};
use crate::source::{NumberSource, ResolveContext, ResolvedEntry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};

/// Marker that starts every probe line
pub const PROBE_MARKER: &str = "gen_nr";

/// Optional sub-headers some architectures include but never ship in the
/// source tree; empty copies keep those probes from failing outright.
pub const STAND_IN_HEADERS: [&str; 2] = ["asm/unistd-eabi.h", "asm/unistd-common.h"];

/// Header-probe strategy: an `arch/<arch>` selector plus text injected
/// ahead of the `#include`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSource {
    pub arch: String,
    #[serde(default)]
    pub defines: String,
}

impl HeaderSource {
    pub fn new(arch: impl Into<String>, defines: impl Into<String>) -> Self {
        Self {
            arch: arch.into(),
            defines: defines.into(),
        }
    }
}

impl NumberSource for HeaderSource {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Vec<ResolvedEntry>> {
        probe_headers(
            ctx.corpus,
            ctx.names,
            &self.arch,
            &self.defines,
            ctx.preprocessor,
        )
    }
}

/// The C preprocessor invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preprocessor {
    /// Program to run, `gcc` by default
    pub program: String,
    /// Arguments placed before the generated ones
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self {
            program: "gcc".to_string(),
            args: Vec::new(),
        }
    }
}

impl Preprocessor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Preprocess `probe` with the given include path order and return stdout
    ///
    /// Runs with no standard include directories, no line markers and no
    /// compilation step.
    pub fn expand(&self, probe: &Path, include_dirs: &[&Path]) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg("-nostdinc");
        for dir in include_dirs {
            cmd.arg("-I").arg(dir);
        }
        cmd.args(["-P", "-E"]).arg(probe);

        tracing::debug!("running {:?}", cmd);

        let output = cmd.output().map_err(|source| NrError::Spawn {
            tool: self.program.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(NrError::Toolchain {
                tool: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Build the probe translation unit
pub fn render_probe(names: &NameSet, defines: &str) -> String {
    let mut probe = String::with_capacity(defines.len() + 32 + names.len() * 48);
    probe.push_str(defines);
    probe.push('\n');
    probe.push_str("#include <asm/unistd.h>\n");
    for name in names {
        probe.push_str(&format!(
            "{} {} {}\n",
            PROBE_MARKER,
            name.label(),
            name.macro_name()
        ));
    }
    probe
}

/// Classify one expanded token
///
/// `Ok(None)` means the macro is not defined on this architecture.
pub fn parse_token(name: &str, token: &str) -> Result<Option<u64>> {
    let token = token.trim();

    if token.starts_with("__") {
        return Ok(None);
    }
    if token.starts_with('(') {
        return eval_expr(token).map(Some);
    }

    parse_literal(token)
        .map(Some)
        .ok_or_else(|| NrError::UnsupportedMacroShape {
            name: name.to_string(),
            token: token.to_string(),
        })
}

/// Pull resolved entries out of preprocessor output
pub fn parse_probe_output(output: &str) -> Result<Vec<ResolvedEntry>> {
    let mut entries = Vec::new();

    for line in output.lines() {
        let Some(rest) = line
            .strip_prefix(PROBE_MARKER)
            .and_then(|rest| rest.strip_prefix(' '))
        else {
            continue;
        };

        let Some((name, token)) = rest.split_once(' ') else {
            return Err(NrError::UnsupportedMacroShape {
                name: rest.trim().to_string(),
                token: String::new(),
            });
        };

        if let Some(value) = parse_token(name, token)? {
            entries.push(ResolvedEntry::new(name, value));
        }
    }

    Ok(entries)
}

/// Create the private include directory holding the empty stand-in headers
fn stand_in_include_dir() -> Result<TempDir> {
    let dir = tempfile::Builder::new()
        .prefix("nrgen-include")
        .tempdir()
        .map_err(|source| NrError::Write {
            path: std::env::temp_dir(),
            source,
        })?;

    for header in STAND_IN_HEADERS {
        let path = dir.path().join(header);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| NrError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::File::create(&path).map_err(|source| NrError::Write { path, source })?;
    }

    Ok(dir)
}

fn write_probe(contents: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("nrgen-probe")
        .suffix(".h")
        .tempfile()
        .map_err(|source| NrError::Write {
            path: std::env::temp_dir(),
            source,
        })?;

    let written = file.write_all(contents.as_bytes()).and_then(|()| file.flush());
    written.map_err(|source| NrError::Write {
        path: file.path().to_path_buf(),
        source,
    })?;

    Ok(file)
}

/// Resolve every candidate defined in `arch`'s headers
///
/// The probe file and stand-in directory are removed when this returns,
/// on success and on error alike.
pub fn probe_headers(
    corpus: &Corpus,
    names: &NameSet,
    arch: &str,
    defines: &str,
    preprocessor: &Preprocessor,
) -> Result<Vec<ResolvedEntry>> {
    let stand_ins = stand_in_include_dir()?;
    let probe = write_probe(&render_probe(names, defines))?;

    let uapi = corpus.arch_uapi_dir(arch);
    let generic = corpus.generic_include_dir();
    let output = preprocessor.expand(
        probe.path(),
        &[stand_ins.path(), uapi.as_path(), generic.as_path()],
    )?;

    let entries = parse_probe_output(&output)?;
    tracing::debug!(
        "{}: {} of {} candidates defined",
        arch,
        entries.len(),
        names.len()
    );
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::SyscallName;

    #[test]
    fn test_render_probe_layout() {
        let names = NameSet::from([
            SyscallName::new("", "read"),
            SyscallName::new("ARM", "breakpoint"),
        ]);
        let probe = render_probe(&names, "#define __ARM_EABI__");
        assert_eq!(
            probe,
            "#define __ARM_EABI__\n\
             #include <asm/unistd.h>\n\
             gen_nr read __NR_read\n\
             gen_nr ARM_breakpoint __ARM_NR_breakpoint\n"
        );
    }

    #[test]
    fn test_render_probe_without_defines() {
        let names = NameSet::from([SyscallName::new("", "exit")]);
        assert_eq!(
            render_probe(&names, ""),
            "\n#include <asm/unistd.h>\ngen_nr exit __NR_exit\n"
        );
    }

    #[test]
    fn test_parse_token_shapes() {
        assert_eq!(parse_token("read", "63").unwrap(), Some(63));
        assert_eq!(parse_token("read", "0x3f").unwrap(), Some(63));
        assert_eq!(parse_token("openat", "(200+5)").unwrap(), Some(205));
        assert_eq!(parse_token("fork", "__NR_fork").unwrap(), None);
    }

    #[test]
    fn test_parse_token_unsupported_shape() {
        let err = parse_token("clone", "SYS_CLONE").unwrap_err();
        assert!(matches!(
            err,
            NrError::UnsupportedMacroShape { ref name, ref token }
                if name == "clone" && token == "SYS_CLONE"
        ));
    }

    #[test]
    fn test_parse_token_octal_literal_is_unsupported() {
        assert!(matches!(
            parse_token("close", "010"),
            Err(NrError::UnsupportedMacroShape { ref token, .. }) if token == "010"
        ));
    }

    #[test]
    fn test_parse_token_bad_expression_propagates() {
        assert!(matches!(
            parse_token("clone", "(1 << 4)"),
            Err(NrError::UnsupportedExpression(_))
        ));
    }

    #[test]
    fn test_parse_probe_output_skips_noise_and_undefined() {
        let output = "\
typedef int __kernel_int;
gen_nr read 63
gen_nr fork __NR_fork
gen_nr openat (200+5)

gen_nr_other junk
";
        let entries = parse_probe_output(output).unwrap();
        assert_eq!(
            entries,
            vec![ResolvedEntry::new("read", 63), ResolvedEntry::new("openat", 205)]
        );
    }

    #[test]
    fn test_parse_probe_output_keeps_inner_spaces_in_token() {
        let entries = parse_probe_output("gen_nr restart_syscall ((0x900000)+ 0)\n").unwrap();
        assert_eq!(entries, vec![ResolvedEntry::new("restart_syscall", 0x900000)]);
    }

    #[test]
    fn test_parse_probe_output_rejects_truncated_line() {
        assert!(parse_probe_output("gen_nr lonely\n").is_err());
    }

    #[test]
    fn test_stand_in_dir_is_removed_on_drop() {
        let dir = stand_in_include_dir().unwrap();
        let path = dir.path().to_path_buf();
        for header in STAND_IN_HEADERS {
            let file = path.join(header);
            assert!(file.is_file());
            assert_eq!(fs::metadata(&file).unwrap().len(), 0);
        }
        drop(dir);
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_preprocessor_is_spawn_error() {
        let pp = Preprocessor::new("nrgen-no-such-preprocessor");
        let names = NameSet::from([SyscallName::new("", "read")]);
        let err = probe_headers(&Corpus::new("/nonexistent"), &names, "x86", "", &pp).unwrap_err();
        assert!(matches!(err, NrError::Spawn { .. }));
    }
}
