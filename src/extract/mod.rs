//! Extractability policy
//!
//! Answers one question: can the extraction tooling unpack this file?
//! The answer is a policy over a fixed table of supported archive and
//! compression formats, not a restatement of what the native probe
//! identifies. Squashfs images are the canonical example of the
//! difference: the probe names them correctly, `is_archive` holds, and
//! they are still not extractable here.

use crate::analysis::sniff;
use crate::probe;
use std::path::Path;
use std::sync::LazyLock;

/// Bytes read for the signature check; enough to cover the tar magic
/// at offset 257.
const SIGNATURE_PROBE_LEN: usize = 512;

/// Extensions the extractor supports, matched case-insensitively
/// against the end of the file name. Compound extensions are listed
/// explicitly so `foo.tar.gz` matches as a compressed tar.
static EXTRACTABLE_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    vec![
        ".tar.gz", ".tgz", ".tar.bz2", ".tbz2", ".tar.xz", ".txz", ".tar.lzma", ".tar",
        ".zip", ".jar", ".war", ".ear", ".whl", ".egg", ".gem",
        ".gz", ".bz2", ".xz", ".lzma", ".7z",
    ]
});

/// MIME types (as reported by the native probe) the extractor can
/// unpack. The OOXML types are zip containers underneath.
static EXTRACTABLE_MIMETYPES: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    vec![
        "application/zip",
        "application/java-archive",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "application/x-tar",
        "application/gzip",
        "application/x-bzip2",
        "application/x-xz",
        "application/x-lzma",
        "application/x-7z-compressed",
    ]
});

enum SignatureVerdict {
    Supported,
    Unsupported,
    Unknown,
}

/// Return true if the file at `path` is likely to be extractable as
/// some archive or compressed file.
///
/// The content signature outranks the filename: an archive-named
/// squashfs image is rejected, a tarball named `.bin` is accepted.
/// When the file cannot be read, the extension table alone decides.
pub fn can_extract(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();

    if let Ok(prefix) = sniff::read_prefix(path, SIGNATURE_PROBE_LEN) {
        match signature_verdict(&prefix) {
            SignatureVerdict::Supported => return true,
            SignatureVerdict::Unsupported => return false,
            SignatureVerdict::Unknown => {}
        }
    }

    let name = match path.file_name() {
        Some(name) => name.to_string_lossy().to_lowercase(),
        None => return false,
    };
    EXTRACTABLE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

fn signature_verdict(prefix: &[u8]) -> SignatureVerdict {
    if prefix.is_empty() {
        return SignatureVerdict::Unknown;
    }

    let identified = probe::native_probe(prefix);
    if identified.filetype.contains("Squashfs filesystem") {
        return SignatureVerdict::Unsupported;
    }
    if EXTRACTABLE_MIMETYPES.iter().any(|mime| identified.mimetype == *mime) {
        return SignatureVerdict::Supported;
    }
    SignatureVerdict::Unknown
}
