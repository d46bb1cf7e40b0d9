//! Facet derivation
//!
//! Pure predicate composition over the oracle answers for one regular
//! file. Given the same inputs this always produces the same facets -
//! no filesystem access happens here. The category substrings come
//! from the native probe's description vocabulary; the extension
//! tables are fixed data.

use crate::analysis::sniff;
use crate::languages;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::sync::LazyLock;

/// Entropy (bits/symbol) above which a text verdict from the native
/// oracle is overridden to binary. Short files can fool signature
/// heuristics; nothing that compresses this badly is prose.
pub const BINARY_ENTROPY_CUTOFF: f64 = 7.0;

pub use crate::analysis::sniff::LONG_LINE_CUTOFF;

/// Extensions that are binary regardless of what the oracle claims.
const KNOWN_BINARY_EXTENSIONS: &[&str] = &[
    ".pyc", ".mp3", ".mp4", ".mpeg", ".mpg", ".emf", ".pgm", ".pbm", ".ppm",
];

/// Extensions treated as plain text rather than source, even when a
/// grammar matches them.
const PLAIN_TEXT_EXTENSIONS: &[&str] =
    &[".rst", ".rest", ".md", ".txt", ".log", ".json", ".xml"];

/// Extensions of zip-based archives that are packages, not mere
/// containers.
const PACKAGE_ARCHIVE_EXTENSIONS: &[&str] = &[".jar", ".war", ".ear", ".zip", ".whl", ".egg"];

const OFFICE_EXTENSIONS: &[&str] = &[".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx"];

/// Filetype markers whose presence means the oracle saw text.
const TEXT_MARKERS: &[&str] = &["text", "ascii", "utf-8", "unicode", "empty"];

/// Mimetype substrings marking media content.
const MEDIA_MIMES: &[&str] = &["image", "picture", "audio", "video", "graphic", "sound"];

/// Filetype substrings marking media content.
const MEDIA_TYPES: &[&str] = &[
    "image data", "graphics image", "ms-windows metafont .wmf", "windows enhanced metafile",
    "png image", "interleaved image", "microsoft asf", "image text", "photoshop image",
    "shop pro image", "ogg data", "vorbis", "mpeg", "theora", "bitmap", "audio", "video",
    "sound", "riff", "icon", "pc bitmap", "netpbm",
];

/// Media formats excluded from "may carry text metadata".
const MEDIA_WITHOUT_META: &[&str] = &["gif image", "png image", "jpeg image", "netpbm", "mpeg"];

static MAKEFILE_GLOBS: LazyLock<GlobSet> = LazyLock::new(|| {
    let mut builder = GlobSetBuilder::new();
    for pattern in ["Makefile", "Makefile.inc", "makefile", "GNUmakefile", "*.mk"] {
        builder.add(Glob::new(pattern).expect("Failed to compile makefile glob"));
    }
    builder.build().expect("Failed to build makefile glob set")
});

/// Everything facet derivation is allowed to look at.
pub(crate) struct FacetInputs<'a> {
    /// Bare file name, original case.
    pub file_name: &'a str,
    /// Native oracle description, original case.
    pub filetype: &'a str,
    /// Native oracle MIME type.
    pub mimetype: &'a str,
    /// Canonical language from the grammar registry, or empty.
    pub language: &'a str,
    /// Bounded content prefix.
    pub sample: &'a [u8],
    /// Shannon entropy of the entropy window of the sample.
    pub entropy: f64,
    /// Extractability oracle verdict.
    pub can_extract: bool,
    pub entropy_cutoff: f64,
    pub long_line_cutoff: usize,
}

/// The derived facet set for one regular file.
#[derive(Debug, Default)]
pub(crate) struct Facets {
    pub is_binary: bool,
    pub is_text: bool,
    pub is_source: bool,
    pub is_script: bool,
    pub is_archive: bool,
    pub is_compressed: bool,
    pub is_media: bool,
    pub is_media_with_meta: bool,
    pub is_office_doc: bool,
    pub is_package: bool,
    pub is_pdf: bool,
    pub contains_text: bool,
    pub is_text_with_long_lines: bool,
    pub is_compact_js: bool,
    pub is_js_map: bool,
    pub is_filesystem: bool,
    pub is_winexe: bool,
    pub is_elf: bool,
    pub is_stripped_elf: bool,
    pub is_makefile: bool,
}

pub(crate) fn derive(inputs: &FacetInputs) -> Facets {
    let ft = inputs.filetype.to_lowercase();
    let mt = inputs.mimetype.to_lowercase();
    let name = inputs.file_name.to_lowercase();

    let mut facets = Facets::default();

    // binary/text: the oracle's description is the primary signal, the
    // entropy cutoff overrides a text claim, never a binary one.
    let oracle_text = TEXT_MARKERS.iter().any(|marker| ft.contains(marker));
    facets.is_binary = !oracle_text;
    if !facets.is_binary && inputs.entropy > inputs.entropy_cutoff {
        tracing::debug!(
            filetype = %inputs.filetype,
            entropy = inputs.entropy,
            "entropy override: demoting text verdict to binary"
        );
        facets.is_binary = true;
    }
    if KNOWN_BINARY_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
        facets.is_binary = true;
    }
    facets.is_text = !facets.is_binary;

    facets.is_elf = ft.starts_with("elf")
        && ["executable", "shared object", "relocatable"].iter().any(|t| ft.contains(t));
    facets.is_stripped_elf = facets.is_elf && !ft.contains("not stripped");
    facets.is_winexe = ft.contains("for ms windows") || ft.starts_with("pe32");
    facets.is_filesystem = ft.contains("squashfs filesystem");
    facets.is_pdf = mt.contains("pdf");

    facets.is_office_doc = OFFICE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
        || (ft.starts_with("microsoft") && ft.ends_with("2007+"));

    facets.is_package = ft.contains("debian binary package")
        || ft.starts_with("rpm ")
        || (ft == "posix tar archive" && name.ends_with(".gem"))
        || ((ft.starts_with("zip archive") || ft.starts_with("java archive"))
            && PACKAGE_ARCHIVE_EXTENSIONS.iter().any(|ext| name.ends_with(ext)));

    facets.is_compressed = !facets.is_text
        && (ft.contains("(zip)")
            || ft.starts_with("zip archive")
            || ft.starts_with("java archive")
            || facets.is_package
            || ft.contains("squashfs filesystem")
            || ft.contains("compressed")
            || (facets.is_office_doc && name.ends_with('x')));

    facets.is_archive = if facets.is_text {
        false
    } else if ft.starts_with("gem image data") {
        // GEM bitmaps, not Ruby gems
        false
    } else if facets.is_compressed
        || ft.contains("archive")
        || facets.is_package
        || facets.is_filesystem
        || (facets.is_office_doc && ft.ends_with("2007+"))
        || ft.contains("(zip)")
    {
        true
    } else {
        inputs.can_extract
    };

    facets.is_media = MEDIA_MIMES.iter().any(|m| mt.contains(m))
        || MEDIA_TYPES.iter().any(|t| ft.contains(t))
        // Targa images carry no usable signature and probe as plain data
        || (ft == "data" && mt == "application/octet-stream" && name.ends_with(".tga"));
    facets.is_media_with_meta =
        facets.is_media && !MEDIA_WITHOUT_META.iter().any(|t| ft.starts_with(t));

    facets.is_makefile = MAKEFILE_GLOBS.is_match(inputs.file_name);
    facets.is_js_map =
        facets.is_text && (name.ends_with(".js.map") || name.ends_with(".css.map"));
    facets.is_compact_js = facets.is_js_map
        || (facets.is_text && (name.ends_with(".min.js") || name.ends_with(".typeface.json")))
        || (ft == "data"
            && (inputs.language == "JavaScript" || name.ends_with(".json")));

    let interpreter = sniff::shebang_interpreter(inputs.sample)
        .map(|interp| languages::tables::base_interpreter(&interp))
        .is_some_and(|base| languages::tables::is_script_interpreter(&base));
    facets.is_script =
        facets.is_text && (interpreter || (ft.contains("script") && !ft.contains("makefile")));

    facets.is_source = facets.is_text
        && !PLAIN_TEXT_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
        && !facets.is_makefile
        && !facets.is_js_map
        && !inputs.language.is_empty()
        && languages::tables::is_source_language(inputs.language);

    facets.is_text_with_long_lines =
        facets.is_text && sniff::max_line_length(inputs.sample) > inputs.long_line_cutoff;

    // contains_text is looser than is_text: containers with textual
    // members count, already-compressed payloads do not.
    facets.contains_text = if facets.is_media && !name.ends_with(".svg") {
        false
    } else if facets.is_text {
        true
    } else if facets.is_pdf {
        true
    } else if facets.is_compressed {
        false
    } else {
        true
    };

    facets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs<'a>(file_name: &'a str, filetype: &'a str, mimetype: &'a str) -> FacetInputs<'a> {
        FacetInputs {
            file_name,
            filetype,
            mimetype,
            language: "",
            sample: b"",
            entropy: 0.0,
            can_extract: false,
            entropy_cutoff: BINARY_ENTROPY_CUTOFF,
            long_line_cutoff: LONG_LINE_CUTOFF,
        }
    }

    #[test]
    fn test_text_and_binary_are_exclusive() {
        let text = derive(&inputs("a.txt", "ASCII text", "text/plain"));
        assert!(text.is_text && !text.is_binary);

        let binary = derive(&inputs("a.bin", "data", "application/octet-stream"));
        assert!(binary.is_binary && !binary.is_text);
    }

    #[test]
    fn test_entropy_override_demotes_text() {
        let mut high = inputs("a.txt", "ASCII text", "text/plain");
        high.entropy = 7.8;
        let facets = derive(&high);
        assert!(facets.is_binary);
        assert!(!facets.is_text);
    }

    #[test]
    fn test_entropy_never_promotes_binary() {
        let mut low = inputs("a.bin", "data", "application/octet-stream");
        low.entropy = 0.5;
        let facets = derive(&low);
        assert!(facets.is_binary);
    }

    #[test]
    fn test_known_binary_extension_wins() {
        // cached bytecode sometimes sniffs as text; the extension rules
        let facets = derive(&inputs("module.pyc", "ASCII text", "text/plain"));
        assert!(facets.is_binary);
    }

    #[test]
    fn test_elf_facets() {
        let facets = derive(&inputs(
            "libfoo.so",
            "ELF 64-bit LSB shared object, stripped",
            "application/x-sharedlib",
        ));
        assert!(facets.is_elf);
        assert!(facets.is_stripped_elf);
        assert!(facets.is_binary);

        let unstripped = derive(&inputs(
            "a.out",
            "ELF 64-bit LSB executable, not stripped",
            "application/x-executable",
        ));
        assert!(unstripped.is_elf);
        assert!(!unstripped.is_stripped_elf);
    }

    #[test]
    fn test_core_file_is_not_elf_facet() {
        let facets = derive(&inputs("core", "ELF 64-bit LSB core file", "application/x-coredump"));
        assert!(!facets.is_elf);
    }

    #[test]
    fn test_winexe() {
        let facets = derive(&inputs(
            "setup.exe",
            "PE32 executable (console) Intel 80386, for MS Windows",
            "application/x-dosexec",
        ));
        assert!(facets.is_winexe);
        assert!(facets.is_binary);
    }

    #[test]
    fn test_debian_package_facets() {
        let facets = derive(&inputs(
            "tool_1.0_amd64.deb",
            "Debian binary package (format 2.0)",
            "application/vnd.debian.binary-package",
        ));
        assert!(facets.is_package);
        assert!(facets.is_compressed);
        assert!(facets.is_archive);
        assert!(facets.is_binary);
        assert!(!facets.contains_text);
    }

    #[test]
    fn test_jar_is_package_and_archive() {
        let facets = derive(&inputs(
            "app.jar",
            "Java archive data (JAR)",
            "application/java-archive",
        ));
        assert!(facets.is_package);
        assert!(facets.is_archive);
        assert!(facets.is_compressed);
    }

    #[test]
    fn test_plain_zip_is_archive_not_package() {
        let facets = derive(&inputs(
            "stuff.dat",
            "Zip archive data, at least v2.0 to extract",
            "application/zip",
        ));
        assert!(facets.is_archive);
        assert!(!facets.is_package);
    }

    #[test]
    fn test_gem_over_tar() {
        let facets =
            derive(&inputs("rails-7.0.gem", "POSIX tar archive", "application/x-tar"));
        assert!(facets.is_package);
    }

    #[test]
    fn test_squashfs_is_filesystem_and_archive() {
        let facets = derive(&inputs(
            "rootfs.img",
            "Squashfs filesystem, little endian",
            "application/octet-stream",
        ));
        assert!(facets.is_filesystem);
        assert!(facets.is_compressed);
        assert!(facets.is_archive);
    }

    #[test]
    fn test_office_doc() {
        let facets = derive(&inputs(
            "report.docx",
            "Microsoft Word 2007+",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ));
        assert!(facets.is_office_doc);
        assert!(facets.is_compressed);
        assert!(facets.is_archive);
    }

    #[test]
    fn test_media_facets() {
        let png = derive(&inputs("logo.png", "PNG image data", "image/png"));
        assert!(png.is_media);
        assert!(!png.is_media_with_meta);
        assert!(!png.contains_text);

        let psd = derive(&inputs("art.psd", "Adobe Photoshop Image", "image/vnd.adobe.photoshop"));
        assert!(psd.is_media);
        assert!(psd.is_media_with_meta);
    }

    #[test]
    fn test_targa_regression_carveout() {
        let facets = derive(&inputs("texture.tga", "data", "application/octet-stream"));
        assert!(facets.is_media);
    }

    #[test]
    fn test_pdf() {
        let facets = derive(&inputs("paper.pdf", "PDF document", "application/pdf"));
        assert!(facets.is_pdf);
        assert!(facets.contains_text);
    }

    #[test]
    fn test_source_requires_allowed_language() {
        let mut c_file = inputs("main.c", "ASCII text", "text/plain");
        c_file.language = "C";
        let facets = derive(&c_file);
        assert!(facets.is_source);
        assert!(facets.is_text);

        let mut yaml_file = inputs("config.yaml", "ASCII text", "text/plain");
        yaml_file.language = "YAML";
        assert!(!derive(&yaml_file).is_source);
    }

    #[test]
    fn test_source_excludes_plain_text_extensions() {
        let mut readme = inputs("README.md", "ASCII text", "text/plain");
        readme.language = "Markdown";
        assert!(!derive(&readme).is_source);
    }

    #[test]
    fn test_makefile_not_source() {
        let mut makefile = inputs("Makefile", "ASCII text", "text/plain");
        makefile.language = "Makefile";
        let facets = derive(&makefile);
        assert!(facets.is_makefile);
        assert!(!facets.is_source);
    }

    #[test]
    fn test_script_via_shebang() {
        let mut script = inputs("deploy", "ASCII text", "text/plain");
        script.sample = b"#!/usr/bin/env bash\nset -e\n";
        assert!(derive(&script).is_script);
    }

    #[test]
    fn test_script_via_filetype() {
        let facets = derive(&inputs(
            "run",
            "POSIX shell script, ASCII text executable",
            "text/x-shellscript",
        ));
        assert!(facets.is_script);
    }

    #[test]
    fn test_long_lines() {
        let mut minified = inputs("app.min.js", "ASCII text", "text/plain");
        let long = "var a=1;".repeat(300);
        minified.sample = long.as_bytes();
        let facets = derive(&minified);
        assert!(facets.is_text_with_long_lines);
        assert!(facets.is_compact_js);
    }

    #[test]
    fn test_js_map() {
        let facets = derive(&inputs("bundle.js.map", "ASCII text", "text/plain"));
        assert!(facets.is_js_map);
        assert!(facets.is_compact_js);
        assert!(!facets.is_source);
    }
}
