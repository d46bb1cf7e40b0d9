//! Native type oracle
//!
//! Signature/magic-number identification over a byte buffer, answering
//! with a free-text type description and a MIME type in the vocabulary
//! of the classic `file(1)` tool ("ELF 64-bit LSB shared object",
//! "Zip archive data", "ASCII text"). The probe never fails: unknown
//! binary content degrades to `("data", "application/octet-stream")`
//! and an empty buffer to `("empty", "inode/x-empty")`.
//!
//! Matching order: format decoders (ELF, zip flavors, ar, RIFF), the
//! fixed signature table, the `infer` sniffer for breadth, and finally
//! a text sniff for anything that still looks textual.

pub mod signatures;

use crate::analysis::sniff;
use crate::languages::tables;

/// The oracle's answer for one byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub filetype: String,
    pub mimetype: String,
}

impl Probe {
    fn new(filetype: impl Into<String>, mimetype: impl Into<String>) -> Self {
        Self { filetype: filetype.into(), mimetype: mimetype.into() }
    }
}

/// Identify `bytes` by signature, returning a filetype description and
/// a MIME type. Callers hand in a bounded prefix of the file (or the
/// whole file when it is small).
pub fn native_probe(bytes: &[u8]) -> Probe {
    if bytes.is_empty() {
        return Probe::new("empty", "inode/x-empty");
    }

    if let Some(probe) = describe_elf(bytes) {
        return probe;
    }
    if let Some(probe) = describe_zip(bytes) {
        return probe;
    }
    if let Some(probe) = describe_ar(bytes) {
        return probe;
    }
    if let Some(probe) = describe_riff(bytes) {
        return probe;
    }
    if let Some(probe) = describe_mz(bytes) {
        return probe;
    }
    if let Some(probe) = describe_bmp(bytes) {
        return probe;
    }
    if let Some(hit) = signatures::lookup(bytes) {
        return Probe::new(hit.filetype, hit.mimetype);
    }
    if let Some(kind) = infer::get(bytes) {
        return Probe::new(
            format!("{} data", kind.extension().to_uppercase()),
            kind.mime_type(),
        );
    }
    if !sniff::looks_binary(bytes) {
        return describe_text(bytes);
    }

    Probe::new("data", "application/octet-stream")
}

/// Decode an ELF header: class, endianness and object type, with the
/// MIME split `file(1)` uses (executable / shared object / relocatable).
fn describe_elf(bytes: &[u8]) -> Option<Probe> {
    if bytes.len() < 18 || &bytes[..4] != b"\x7fELF" {
        return None;
    }

    let class = match bytes[4] {
        1 => "32-bit",
        2 => "64-bit",
        _ => return Some(Probe::new("ELF unknown class", "application/octet-stream")),
    };
    let (endian, e_type) = match bytes[5] {
        1 => ("LSB", u16::from_le_bytes([bytes[16], bytes[17]])),
        2 => ("MSB", u16::from_be_bytes([bytes[16], bytes[17]])),
        _ => return Some(Probe::new("ELF unknown byte order", "application/octet-stream")),
    };
    let (what, mime) = match e_type {
        1 => ("relocatable", "application/x-object"),
        2 => ("executable", "application/x-executable"),
        3 => ("shared object", "application/x-sharedlib"),
        4 => ("core file", "application/x-coredump"),
        _ => ("unknown type", "application/octet-stream"),
    };

    // Section tables usually sit past the sampled prefix, so symbol
    // presence is approximated by the section-name marker.
    let stripped = if contains(bytes, b".symtab") { ", not stripped" } else { ", stripped" };

    Some(Probe::new(format!("ELF {class} {endian} {what}{stripped}"), mime))
}

/// Zip containers, distinguishing the OOXML office flavors and JAR by
/// member names visible in the prefix.
fn describe_zip(bytes: &[u8]) -> Option<Probe> {
    if bytes.starts_with(b"PK\x05\x06") {
        return Some(Probe::new("Zip archive data (empty)", "application/zip"));
    }
    if !bytes.starts_with(b"PK\x03\x04") {
        return None;
    }

    if contains(bytes, b"[Content_Types].xml") || contains(bytes, b"_rels/.rels") {
        if contains(bytes, b"word/") {
            return Some(Probe::new(
                "Microsoft Word 2007+",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            ));
        }
        if contains(bytes, b"xl/") {
            return Some(Probe::new(
                "Microsoft Excel 2007+",
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ));
        }
        if contains(bytes, b"ppt/") {
            return Some(Probe::new(
                "Microsoft PowerPoint 2007+",
                "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            ));
        }
    }
    if contains(bytes, b"META-INF/MANIFEST.MF") {
        return Some(Probe::new("Java archive data (JAR)", "application/java-archive"));
    }

    Some(Probe::new("Zip archive data, at least v2.0 to extract", "application/zip"))
}

/// Unix `ar` archives, including the Debian package flavor.
fn describe_ar(bytes: &[u8]) -> Option<Probe> {
    if !bytes.starts_with(b"!<arch>\n") {
        return None;
    }
    if contains(bytes, b"debian-binary") {
        return Some(Probe::new(
            "Debian binary package (format 2.0)",
            "application/vnd.debian.binary-package",
        ));
    }
    Some(Probe::new("current ar archive", "application/x-archive"))
}

/// RIFF containers: WAVE, AVI, WebP.
fn describe_riff(bytes: &[u8]) -> Option<Probe> {
    if bytes.len() < 12 || !bytes.starts_with(b"RIFF") {
        return None;
    }
    let probe = match &bytes[8..12] {
        b"WAVE" => Probe::new("RIFF (little-endian) data, WAVE audio", "audio/x-wav"),
        b"AVI " => Probe::new("RIFF (little-endian) data, AVI", "video/x-msvideo"),
        b"WEBP" => Probe::new("RIFF (little-endian) data, Web/P image", "image/webp"),
        _ => Probe::new("RIFF (little-endian) data", "application/octet-stream"),
    };
    Some(probe)
}

/// DOS/Windows executables. The two-byte magic alone collides with
/// text, so a full DOS header must be present.
fn describe_mz(bytes: &[u8]) -> Option<Probe> {
    if bytes.len() < 0x40 || !bytes.starts_with(b"MZ") || !sniff::looks_binary(bytes) {
        return None;
    }
    Some(Probe::new(
        "PE32 executable (console) Intel 80386, for MS Windows",
        "application/x-dosexec",
    ))
}

/// Windows bitmaps. Requires the reserved header words to be zero so
/// that text starting with "BM" cannot match.
fn describe_bmp(bytes: &[u8]) -> Option<Probe> {
    if bytes.len() < 14 || !bytes.starts_with(b"BM") || bytes[6..10] != [0, 0, 0, 0] {
        return None;
    }
    Some(Probe::new("PC bitmap, Windows 3.x format", "image/bmp"))
}

/// Describe a buffer that passed the text sniff: charset, script
/// flavor from the shebang, and the long-lines marker.
fn describe_text(bytes: &[u8]) -> Probe {
    let charset = text_charset(bytes);

    let (mut filetype, mimetype) = match sniff::shebang_interpreter(bytes) {
        Some(interp) => {
            let base = tables::base_interpreter(&interp);
            let (pretty, mime) = tables::script_flavor(&base);
            (format!("{pretty} script, {charset} text executable"), mime)
        }
        None => (format!("{charset} text"), "text/plain".to_string()),
    };

    if sniff::max_line_length(bytes) > sniff::LONG_LINE_CUTOFF {
        filetype.push_str(", with very long lines");
    }

    Probe::new(filetype, mimetype)
}

fn text_charset(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xFE]) || bytes.starts_with(&[0xFE, 0xFF]) {
        return "Unicode (UTF-16)";
    }
    if bytes.iter().all(|&b| b < 0x80) {
        return "ASCII";
    }
    match std::str::from_utf8(bytes) {
        Ok(_) => "UTF-8 Unicode",
        // a prefix may end mid-sequence; that is still UTF-8
        Err(e) if e.error_len().is_none() => "UTF-8 Unicode",
        Err(_) => "ISO-8859",
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|window| window == needle)
}
