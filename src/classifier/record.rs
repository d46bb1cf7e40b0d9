//! Classification record types
//!
//! The single entity this crate produces. A record is built once per
//! classification and never mutated afterwards; recomputation always
//! yields a fresh value. Field names are a serialization contract:
//! external fixtures round-trip through YAML/JSON under exactly these
//! names, and unknown names are rejected rather than silently dropped.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Filesystem-entry category. Resolved first, before any content is
/// read; gates which facets are computed at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    Regular,
    Directory,
    SymlinkOk,
    SymlinkBroken,
    Fifo,
    Device,
    Socket,
    Nonexistent,
}

impl EntryKind {
    pub fn is_symlink(self) -> bool {
        matches!(self, EntryKind::SymlinkOk | EntryKind::SymlinkBroken)
    }

    pub fn is_special(self) -> bool {
        matches!(self, EntryKind::Fifo | EntryKind::Device | EntryKind::Socket)
    }
}

/// Snapshot of the lstat metadata taken when the record was built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatInfo {
    /// Size reported by lstat (not the aggregate directory size).
    pub size: u64,
    /// Modification time, seconds since the Unix epoch.
    pub mtime: i64,
    /// Raw symlink target, empty for non-links.
    #[serde(default)]
    pub link_target: String,
}

/// Content, media and mimetype information about one filesystem entry.
///
/// Missing information is an empty string or `false`, never an absent
/// field; `stat_info` alone is optional, for entries that could not be
/// stat'd at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassificationRecord {
    /// Absolute path; the identity key.
    pub path: String,
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_info: Option<StatInfo>,

    /// Byte length for files; aggregate regular-file size for
    /// directories; zero for specials and nonexistent entries.
    pub size: u64,
    /// Literal (unresolved) symlink target; non-empty iff `kind` is a
    /// symlink kind.
    #[serde(default)]
    pub link_target: String,

    /// Free-text description from the native type oracle.
    #[serde(default)]
    pub native_filetype: String,
    /// MIME type from the native type oracle.
    #[serde(default)]
    pub native_mimetype: String,
    /// MIME type from the extension-table guesser.
    #[serde(default)]
    pub python_mimetype: String,
    /// Canonical language name from the grammar registry.
    #[serde(default)]
    pub lexer_language: String,

    #[serde(default)]
    pub is_binary: bool,
    #[serde(default)]
    pub is_text: bool,
    #[serde(default)]
    pub is_source: bool,
    #[serde(default)]
    pub is_script: bool,
    #[serde(default)]
    pub is_archive: bool,
    #[serde(default)]
    pub is_compressed: bool,
    #[serde(default)]
    pub is_media: bool,
    #[serde(default)]
    pub is_media_with_meta: bool,
    #[serde(default)]
    pub is_office_doc: bool,
    #[serde(default)]
    pub is_package: bool,
    #[serde(default)]
    pub is_pdf: bool,
    #[serde(default)]
    pub contains_text: bool,
    #[serde(default)]
    pub is_text_with_long_lines: bool,
    #[serde(default)]
    pub is_compact_js: bool,
    #[serde(default)]
    pub is_js_map: bool,
    #[serde(default)]
    pub is_filesystem: bool,
    #[serde(default)]
    pub is_winexe: bool,
    #[serde(default)]
    pub is_elf: bool,
    #[serde(default)]
    pub is_stripped_elf: bool,
    #[serde(default)]
    pub is_makefile: bool,
}

impl ClassificationRecord {
    /// A record with every facet false and every string empty; the
    /// starting point for all construction paths.
    pub fn new_empty(path: String, kind: EntryKind) -> Self {
        Self {
            path,
            kind,
            stat_info: None,
            size: 0,
            link_target: String::new(),
            native_filetype: String::new(),
            native_mimetype: String::new(),
            python_mimetype: String::new(),
            lexer_language: String::new(),
            is_binary: false,
            is_text: false,
            is_source: false,
            is_script: false,
            is_archive: false,
            is_compressed: false,
            is_media: false,
            is_media_with_meta: false,
            is_office_doc: false,
            is_package: false,
            is_pdf: false,
            contains_text: false,
            is_text_with_long_lines: false,
            is_compact_js: false,
            is_js_map: false,
            is_filesystem: false,
            is_winexe: false,
            is_elf: false,
            is_stripped_elf: false,
            is_makefile: false,
        }
    }

    pub fn exists(&self) -> bool {
        self.kind != EntryKind::Nonexistent
    }

    pub fn is_regular(&self) -> bool {
        self.kind == EntryKind::Regular
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_link(&self) -> bool {
        self.kind.is_symlink()
    }

    pub fn is_broken_link(&self) -> bool {
        self.kind == EntryKind::SymlinkBroken
    }

    pub fn is_special(&self) -> bool {
        self.kind.is_special()
    }

    /// Serialize to YAML, the fixture interchange format.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yml::to_string(self).context("Failed to serialize classification record")
    }

    /// Deserialize from YAML. Unknown field names fail loudly instead
    /// of being dropped.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yml::from_str(text).context("Failed to parse classification record")
    }
}
