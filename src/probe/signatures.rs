//! Static magic-number signature table
//!
//! Fixed-offset byte signatures with their free-text descriptions and
//! MIME types. Formats whose description needs decoding (ELF, zip
//! flavors, RIFF containers, ar/deb) live in specialized matchers in
//! the parent module; this table covers the plain prefix matches.

use std::sync::LazyLock;

/// A fixed-offset byte signature.
pub struct Signature {
    pub offset: usize,
    pub magic: &'static [u8],
    pub filetype: &'static str,
    pub mimetype: &'static str,
}

impl Signature {
    pub fn matches(&self, bytes: &[u8]) -> bool {
        bytes.len() >= self.offset + self.magic.len()
            && &bytes[self.offset..self.offset + self.magic.len()] == self.magic
    }
}

/// Ordered signature table; first match wins.
pub static SIGNATURES: LazyLock<Vec<Signature>> = LazyLock::new(|| {
    let mut table = Vec::new();

    // Images
    sig(&mut table, 0, b"\x89PNG\r\n\x1a\n", "PNG image data", "image/png");
    sig(&mut table, 0, b"\xff\xd8\xff", "JPEG image data, JFIF standard", "image/jpeg");
    sig(&mut table, 0, b"GIF87a", "GIF image data, version 87a", "image/gif");
    sig(&mut table, 0, b"GIF89a", "GIF image data, version 89a", "image/gif");

    // Documents
    sig(&mut table, 0, b"%PDF-", "PDF document", "application/pdf");

    // Compression and archives
    sig(&mut table, 0, b"\x1f\x8b", "gzip compressed data", "application/gzip");
    sig(&mut table, 0, b"BZh", "bzip2 compressed data", "application/x-bzip2");
    sig(&mut table, 0, b"\xfd7zXZ\x00", "XZ compressed data", "application/x-xz");
    sig(
        &mut table,
        0,
        b"7z\xbc\xaf\x27\x1c",
        "7-zip archive data",
        "application/x-7z-compressed",
    );
    sig(&mut table, 0, b"\x5d\x00\x00", "LZMA compressed data", "application/x-lzma");
    sig(&mut table, 257, b"ustar", "POSIX tar archive", "application/x-tar");
    sig(
        &mut table,
        0,
        b"\xed\xab\xee\xdb",
        "RPM v3.0 bin",
        "application/x-rpm",
    );

    // Filesystem images; identified correctly but not extractable
    sig(
        &mut table,
        0,
        b"hsqs",
        "Squashfs filesystem, little endian",
        "application/octet-stream",
    );
    sig(
        &mut table,
        0,
        b"sqsh",
        "Squashfs filesystem, big endian",
        "application/octet-stream",
    );

    // Databases, bytecode, modules
    sig(
        &mut table,
        0,
        b"SQLite format 3\x00",
        "SQLite 3.x database",
        "application/vnd.sqlite3",
    );
    sig(
        &mut table,
        0,
        b"\xca\xfe\xba\xbe",
        "compiled Java class data",
        "application/x-java-applet",
    );
    sig(
        &mut table,
        0,
        b"\x00asm",
        "WebAssembly (wasm) binary module",
        "application/wasm",
    );

    // Audio and video
    sig(&mut table, 0, b"OggS", "Ogg data", "audio/ogg");
    sig(&mut table, 0, b"ID3", "Audio file with ID3 version 2", "audio/mpeg");
    sig(&mut table, 0, b"fLaC", "FLAC audio bitstream data", "audio/flac");
    sig(&mut table, 4, b"ftyp", "ISO Media, MP4 Base Media", "video/mp4");

    table
});

fn sig(
    table: &mut Vec<Signature>,
    offset: usize,
    magic: &'static [u8],
    filetype: &'static str,
    mimetype: &'static str,
) {
    table.push(Signature { offset, magic, filetype, mimetype });
}

/// Look `bytes` up in the fixed signature table.
pub fn lookup(bytes: &[u8]) -> Option<&'static Signature> {
    SIGNATURES.iter().find(|s| s.matches(bytes))
}
