//! Classification orchestrator
//!
//! The single public entry point is [`Classifier::classify`]: resolve
//! the entry kind from lstat metadata, and for regular files run the
//! oracle pipeline (native probe, extension-table MIME guess, grammar
//! registry, entropy) over one bounded content prefix, then derive the
//! facet set. Records are cached per absolute path and revalidated
//! against (mtime, size).
//!
//! `classify` never fails: missing files become `Nonexistent` records,
//! read failures degrade to records with empty oracle strings and all
//! content facets false.

use super::facets::{self, BINARY_ENTROPY_CUTOFF, FacetInputs, LONG_LINE_CUTOFF};
use super::record::{ClassificationRecord, EntryKind, StatInfo};
use crate::analysis::{entropy, sniff};
use crate::config::SniffConfig;
use crate::extract;
use crate::languages;
use crate::probe;
use anyhow::Result;
use ignore::WalkBuilder;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Bytes read from the start of a file for signature and language
/// probes.
pub const SAMPLE_LEN: usize = 16384;

/// Tunable knobs for one classifier instance.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub sample_bytes: usize,
    pub entropy_sample_bytes: usize,
    pub entropy_cutoff: f64,
    pub long_line_cutoff: usize,
    pub cache: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            sample_bytes: SAMPLE_LEN,
            entropy_sample_bytes: entropy::ENTROPY_SAMPLE_LEN,
            entropy_cutoff: BINARY_ENTROPY_CUTOFF,
            long_line_cutoff: LONG_LINE_CUTOFF,
            cache: true,
        }
    }
}

struct CacheEntry {
    mtime: Option<SystemTime>,
    size: u64,
    record: Arc<ClassificationRecord>,
}

/// Content-type classifier with a per-instance record cache.
///
/// Safe to share across threads: concurrent calls for different paths
/// need no coordination, and redundant classification of the same path
/// is idempotent (last cache write wins, records are value-equal).
pub struct Classifier {
    config: ClassifierConfig,
    cache: Mutex<HashMap<PathBuf, CacheEntry>>,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config, cache: Mutex::new(HashMap::new()) }
    }

    /// Build a classifier from the merged application config,
    /// falling back to defaults for absent keys.
    pub fn from_config(config: &SniffConfig) -> Result<Self> {
        let mut classifier_config = ClassifierConfig::default();

        if let Ok(sample_bytes) = config.get_usize("classifier.sample_bytes") {
            classifier_config.sample_bytes = sample_bytes;
        }
        if let Ok(entropy_sample_bytes) = config.get_usize("classifier.entropy_sample_bytes") {
            classifier_config.entropy_sample_bytes = entropy_sample_bytes;
        }
        if let Ok(cutoff) = config.get_f64("classifier.entropy_cutoff") {
            classifier_config.entropy_cutoff = cutoff;
        }
        if let Ok(cutoff) = config.get_usize("classifier.long_line_cutoff") {
            classifier_config.long_line_cutoff = cutoff;
        }
        if let Ok(cache) = config.get_bool("classifier.cache") {
            classifier_config.cache = cache;
        }

        Ok(Self::new(classifier_config))
    }

    /// Classify the entry at `path`, returning a shared immutable
    /// record. Never fails: every outcome, including a nonexistent
    /// path, is a complete record.
    pub fn classify(&self, path: impl AsRef<Path>) -> Arc<ClassificationRecord> {
        let abs = absolutize(path.as_ref());
        let meta = fs::symlink_metadata(&abs).ok();

        if self.config.cache {
            if let Some(record) = self.cache_lookup(&abs, meta.as_ref()) {
                tracing::trace!(path = %abs.display(), "classification cache hit");
                return record;
            }
        }

        let record = Arc::new(self.build_record(&abs, meta.as_ref()));

        if self.config.cache {
            let entry = CacheEntry {
                mtime: meta.as_ref().and_then(|m| m.modified().ok()),
                size: meta.as_ref().map(|m| m.len()).unwrap_or(0),
                record: Arc::clone(&record),
            };
            self.cache.lock().unwrap().insert(abs, entry);
        }

        record
    }

    fn cache_lookup(
        &self,
        abs: &Path,
        meta: Option<&fs::Metadata>,
    ) -> Option<Arc<ClassificationRecord>> {
        let cache = self.cache.lock().unwrap();
        let entry = cache.get(abs)?;
        let meta = meta?;
        if entry.size == meta.len() && entry.mtime == meta.modified().ok() {
            Some(Arc::clone(&entry.record))
        } else {
            None
        }
    }

    fn build_record(&self, path: &Path, meta: Option<&fs::Metadata>) -> ClassificationRecord {
        let path_str = path.to_string_lossy().into_owned();

        let Some(meta) = meta else {
            return ClassificationRecord::new_empty(path_str, EntryKind::Nonexistent);
        };

        let file_type = meta.file_type();

        if file_type.is_symlink() {
            return self.build_symlink_record(path, path_str, meta);
        }
        if file_type.is_dir() {
            let mut record = ClassificationRecord::new_empty(path_str, EntryKind::Directory);
            record.size = directory_size(path);
            record.stat_info = Some(stat_info(meta, String::new()));
            return record;
        }
        if let Some(kind) = special_kind(&file_type) {
            let mut record = ClassificationRecord::new_empty(path_str, kind);
            record.stat_info = Some(stat_info(meta, String::new()));
            return record;
        }

        self.build_regular_record(path, path_str, meta)
    }

    fn build_symlink_record(
        &self,
        path: &Path,
        path_str: String,
        meta: &fs::Metadata,
    ) -> ClassificationRecord {
        // the raw target, never canonicalized
        let target = fs::read_link(path)
            .map(|t| t.to_string_lossy().into_owned())
            .unwrap_or_default();

        // cycles and over-deep chains surface as errors here, which is
        // exactly the broken case
        let kind = if fs::metadata(path).is_ok() {
            EntryKind::SymlinkOk
        } else {
            EntryKind::SymlinkBroken
        };

        let mut record = ClassificationRecord::new_empty(path_str, kind);
        record.link_target = target.clone();
        record.stat_info = Some(stat_info(meta, target));
        record
    }

    fn build_regular_record(
        &self,
        path: &Path,
        path_str: String,
        meta: &fs::Metadata,
    ) -> ClassificationRecord {
        let mut record = ClassificationRecord::new_empty(path_str, EntryKind::Regular);
        record.size = meta.len();
        record.stat_info = Some(stat_info(meta, String::new()));

        let sample = match sniff::read_prefix(path, self.config.sample_bytes) {
            Ok(sample) => sample,
            Err(err) => {
                // permission denied or vanished between stat and read:
                // keep the kind, report unknown content
                tracing::debug!(path = %path.display(), error = %err, "content read failed");
                return record;
            }
        };

        let identified = probe::native_probe(&sample);
        record.native_filetype = identified.filetype;
        record.native_mimetype = identified.mimetype;
        record.python_mimetype =
            mime_guess::from_path(path).first_raw().unwrap_or_default().to_string();

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let shebang_line = if sample.starts_with(b"#!") {
            Some(String::from_utf8_lossy(sniff::first_line(&sample)).into_owned())
        } else {
            None
        };
        record.lexer_language =
            languages::lookup_language(&file_name, shebang_line.as_deref(), &sample);

        let entropy_window = &sample[..sample.len().min(self.config.entropy_sample_bytes)];
        let sample_entropy = entropy::shannon_entropy(entropy_window);

        let facets = facets::derive(&FacetInputs {
            file_name: &file_name,
            filetype: &record.native_filetype,
            mimetype: &record.native_mimetype,
            language: &record.lexer_language,
            sample: &sample,
            entropy: sample_entropy,
            can_extract: extract::can_extract(path),
            entropy_cutoff: self.config.entropy_cutoff,
            long_line_cutoff: self.config.long_line_cutoff,
        });

        record.is_binary = facets.is_binary;
        record.is_text = facets.is_text;
        record.is_source = facets.is_source;
        record.is_script = facets.is_script;
        record.is_archive = facets.is_archive;
        record.is_compressed = facets.is_compressed;
        record.is_media = facets.is_media;
        record.is_media_with_meta = facets.is_media_with_meta;
        record.is_office_doc = facets.is_office_doc;
        record.is_package = facets.is_package;
        record.is_pdf = facets.is_pdf;
        record.contains_text = facets.contains_text;
        record.is_text_with_long_lines = facets.is_text_with_long_lines;
        record.is_compact_js = facets.is_compact_js;
        record.is_js_map = facets.is_js_map;
        record.is_filesystem = facets.is_filesystem;
        record.is_winexe = facets.is_winexe;
        record.is_elf = facets.is_elf;
        record.is_stripped_elf = facets.is_stripped_elf;
        record.is_makefile = facets.is_makefile;
        record
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

/// Classify with a process-wide default classifier. Convenience for
/// callers that do not manage their own instance; the shared cache
/// lives for the life of the process.
pub fn classify(path: impl AsRef<Path>) -> Arc<ClassificationRecord> {
    static DEFAULT: OnceLock<Classifier> = OnceLock::new();
    DEFAULT.get_or_init(Classifier::default).classify(path)
}

fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn stat_info(meta: &fs::Metadata, link_target: String) -> StatInfo {
    let mtime = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    StatInfo { size: meta.len(), mtime, link_target }
}

#[cfg(unix)]
fn special_kind(file_type: &fs::FileType) -> Option<EntryKind> {
    use std::os::unix::fs::FileTypeExt;
    if file_type.is_fifo() {
        Some(EntryKind::Fifo)
    } else if file_type.is_socket() {
        Some(EntryKind::Socket)
    } else if file_type.is_block_device() || file_type.is_char_device() {
        Some(EntryKind::Device)
    } else {
        None
    }
}

#[cfg(not(unix))]
fn special_kind(_file_type: &fs::FileType) -> Option<EntryKind> {
    None
}

/// Aggregate byte size of a directory's regular-file descendants.
/// Symlinks and specials are excluded; unreadable entries are skipped.
fn directory_size(path: &Path) -> u64 {
    let walker = WalkBuilder::new(path)
        .hidden(false)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .follow_links(false)
        .build();

    let mut total = 0u64;
    for entry in walker.flatten() {
        if entry.file_type().is_some_and(|ft| ft.is_file()) {
            if let Ok(meta) = entry.metadata() {
                total += meta.len();
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_elf_shared_object(path: &Path) {
        let mut bytes = vec![0u8; 64];
        bytes[..4].copy_from_slice(b"\x7fELF");
        bytes[4] = 2; // 64-bit
        bytes[5] = 1; // LSB
        bytes[16..18].copy_from_slice(&3u16.to_le_bytes()); // shared object
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_nonexistent_path() {
        let temp_dir = TempDir::new().unwrap();
        let record = Classifier::default().classify(temp_dir.path().join("missing"));
        assert_eq!(record.kind, EntryKind::Nonexistent);
        assert!(!record.exists());
        assert!(!record.is_binary && !record.is_text);
        assert_eq!(record.size, 0);
        assert!(record.stat_info.is_none());
    }

    #[test]
    fn test_c_source_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("hello.c");
        fs::write(&path, "#include <stdio.h>\n\nint main(void) {\n    return 0;\n}\n").unwrap();

        let record = Classifier::default().classify(&path);
        assert_eq!(record.kind, EntryKind::Regular);
        assert_eq!(record.lexer_language, "C");
        assert!(record.is_source);
        assert!(record.is_text);
        assert!(!record.is_binary);
        assert!(record.contains_text);
    }

    #[test]
    fn test_elf_shared_object() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("libdemo.so");
        write_elf_shared_object(&path);

        let record = Classifier::default().classify(&path);
        assert!(record.is_binary);
        assert!(record.is_elf);
        assert_eq!(record.lexer_language, "");
        assert_eq!(record.native_mimetype, "application/x-sharedlib");
        assert!(!record.is_source);
    }

    #[test]
    fn test_debian_package() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tool_1.0_amd64.deb");
        fs::write(&path, b"!<arch>\ndebian-binary   1342943816  0     0     100644  4\n2.0\n")
            .unwrap();

        let record = Classifier::default().classify(&path);
        assert!(record.is_archive);
        assert!(record.is_compressed);
        assert!(record.is_binary);
        assert!(!record.contains_text);
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let record = Classifier::default().classify(temp_dir.path());
        assert_eq!(record.kind, EntryKind::Directory);
        assert_eq!(record.size, 0);
        assert!(!record.is_binary);
        assert!(!record.contains_text);
    }

    #[test]
    fn test_directory_size_aggregates_regular_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), vec![b'a'; 100]).unwrap();
        let sub = temp_dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("b.bin"), vec![0u8; 250]).unwrap();
        #[cfg(unix)]
        std::os::unix::fs::symlink(temp_dir.path().join("a.txt"), sub.join("link")).unwrap();

        let classifier = Classifier::default();
        let record = classifier.classify(temp_dir.path());
        assert_eq!(record.size, 350);

        // directory size equals the sum of the classified sizes of its
        // regular-file descendants
        let child_sum = classifier.classify(temp_dir.path().join("a.txt")).size
            + classifier.classify(sub.join("b.bin")).size;
        assert_eq!(record.size, child_sum);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_ok() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("target.txt");
        fs::write(&target, "hi").unwrap();
        let link = temp_dir.path().join("link");
        std::os::unix::fs::symlink("target.txt", &link).unwrap();

        let record = Classifier::default().classify(&link);
        assert_eq!(record.kind, EntryKind::SymlinkOk);
        assert!(record.is_link());
        assert!(!record.is_broken_link());
        // the literal target as stored, not the canonicalized path
        assert_eq!(record.link_target, "target.txt");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_broken() {
        let temp_dir = TempDir::new().unwrap();
        let link = temp_dir.path().join("dangling");
        std::os::unix::fs::symlink("no-such-target", &link).unwrap();

        let record = Classifier::default().classify(&link);
        assert_eq!(record.kind, EntryKind::SymlinkBroken);
        assert!(record.is_link());
        assert!(record.is_broken_link());
        assert_eq!(record.link_target, "no-such-target");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_is_broken() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        let b = temp_dir.path().join("b");
        std::os::unix::fs::symlink(&b, &a).unwrap();
        std::os::unix::fs::symlink(&a, &b).unwrap();

        let record = Classifier::default().classify(&a);
        assert_eq!(record.kind, EntryKind::SymlinkBroken);
    }

    #[cfg(unix)]
    #[test]
    fn test_fifo() {
        let temp_dir = TempDir::new().unwrap();
        let fifo = temp_dir.path().join("pipe");
        let status = std::process::Command::new("mkfifo").arg(&fifo).status().unwrap();
        assert!(status.success());

        let record = Classifier::default().classify(&fifo);
        assert_eq!(record.kind, EntryKind::Fifo);
        assert!(record.is_special());
        assert!(!record.is_binary && !record.is_text);
        assert_eq!(record.size, 0);
    }

    #[test]
    fn test_idempotence() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stable.py");
        fs::write(&path, "#!/usr/bin/env python3\nprint('hello')\n").unwrap();

        let classifier = Classifier::default();
        let first = classifier.classify(&path);
        let second = classifier.classify(&path);
        assert_eq!(*first, *second);

        // a fresh classifier (cold cache) agrees field for field
        let fresh = Classifier::new(ClassifierConfig { cache: false, ..Default::default() });
        assert_eq!(*first, *fresh.classify(&path));
    }

    #[test]
    fn test_cache_invalidation_on_change() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mutable.txt");
        fs::write(&path, "short").unwrap();

        let classifier = Classifier::default();
        let before = classifier.classify(&path);
        assert_eq!(before.size, 5);

        fs::write(&path, "a good deal longer than before").unwrap();
        let after = classifier.classify(&path);
        assert_eq!(after.size, 30);
    }

    #[test]
    fn test_binary_text_exclusive_for_regular() {
        let temp_dir = TempDir::new().unwrap();
        let text = temp_dir.path().join("a.txt");
        fs::write(&text, "words\n").unwrap();
        let binary = temp_dir.path().join("b.bin");
        fs::write(&binary, [0u8, 1, 2, 3, 0, 5]).unwrap();

        let classifier = Classifier::default();
        for path in [text, binary] {
            let record = classifier.classify(&path);
            assert!(record.is_binary ^ record.is_text, "exactly one must hold for {path:?}");
        }
    }

    #[test]
    fn test_script_detection() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("install");
        fs::write(&path, "#!/bin/sh\nset -e\nmake install\n").unwrap();

        let record = Classifier::default().classify(&path);
        assert!(record.is_script);
        assert!(record.is_text);
        assert_eq!(record.lexer_language, "Bash");
    }

    #[test]
    fn test_squashfs_named_as_zip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("firmware.zip");
        let mut bytes = b"hsqs".to_vec();
        bytes.extend_from_slice(&[0u8; 60]);
        fs::write(&path, &bytes).unwrap();

        let record = Classifier::default().classify(&path);
        assert!(record.is_archive);
        assert!(record.is_filesystem);
        assert!(!extract::can_extract(&path));
    }

    #[test]
    fn test_empty_file_is_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty");
        fs::write(&path, "").unwrap();

        let record = Classifier::default().classify(&path);
        assert_eq!(record.native_filetype, "empty");
        assert!(record.is_text);
        assert!(!record.is_binary);
    }

    #[test]
    fn test_makefile() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Makefile");
        fs::write(&path, "all:\n\tcc -o demo demo.c\n").unwrap();

        let record = Classifier::default().classify(&path);
        assert!(record.is_makefile);
        assert!(!record.is_source);
        assert!(record.is_text);
    }

    #[test]
    fn test_mimetype_guess_from_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("page.html");
        fs::write(&path, "<!DOCTYPE html><html></html>\n").unwrap();

        let record = Classifier::default().classify(&path);
        assert_eq!(record.python_mimetype, "text/html");
    }
}
