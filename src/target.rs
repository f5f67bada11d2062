//! Architecture targets and the built-in target table
//!
//! Adding an architecture is one row in `BUILTIN_TARGETS`.

use crate::headers::HeaderSource;
use crate::source::Source;
use crate::table::TableSource;
use serde::{Deserialize, Serialize};

/// One output architecture and the strategies that feed its table
///
/// Sources are applied in order; a later source overrides an earlier one
/// for the same name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchTarget {
    pub label: String,
    #[serde(rename = "source", default)]
    pub sources: Vec<Source>,
}

impl ArchTarget {
    pub fn new(label: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            label: label.into(),
            sources,
        }
    }
}

enum Builtin {
    Table(&'static str, &'static [&'static str]),
    Headers(&'static str, &'static str),
}

const BUILTIN_TARGETS: &[(&str, &[Builtin])] = &[
    ("linux-aarch64", &[Builtin::Headers("arm64", "")]),
    (
        "linux-armeabi",
        &[
            Builtin::Table("arch/arm/tools/syscall.tbl", &["common", "eabi"]),
            Builtin::Headers("arm", "#define __ARM_EABI__"),
        ],
    ),
    ("linux-mips", &[Builtin::Headers("mips", "#define _MIPS_SIM _MIPS_SIM_ABI32")]),
    ("linux-mips64", &[Builtin::Headers("mips", "#define _MIPS_SIM _MIPS_SIM_ABI64")]),
    ("linux-powerpc", &[Builtin::Headers("powerpc", "#undef __arch64__")]),
    (
        "linux-powerpc64",
        &[Builtin::Headers("powerpc", "#define __arch64__ 1\n#define __powerpc64__")],
    ),
    ("linux-sparc64", &[Builtin::Headers("sparc", "")]),
    (
        "linux-x86",
        &[Builtin::Table("arch/x86/entry/syscalls/syscall_32.tbl", &["i386"])],
    ),
    (
        "linux-x86_64",
        &[Builtin::Table("arch/x86/entry/syscalls/syscall_64.tbl", &["common", "64"])],
    ),
];

impl Builtin {
    fn to_source(&self) -> Source {
        match *self {
            Builtin::Table(path, abis) => {
                Source::Table(TableSource::new(path, abis.iter().copied()))
            }
            Builtin::Headers(arch, defines) => Source::Headers(HeaderSource::new(arch, defines)),
        }
    }
}

/// The default architecture set
pub fn builtin_targets() -> Vec<ArchTarget> {
    BUILTIN_TARGETS
        .iter()
        .map(|(label, sources)| {
            ArchTarget::new(*label, sources.iter().map(Builtin::to_source).collect())
        })
        .collect()
}
