//! Lexical grammar registry
//!
//! Names the programming language of a file from its filename, shebang
//! line, or content sample, using the syntect syntax-definition set
//! extended by two-face. The grammar set is loaded once into an
//! immutable structure; lookups are read-only and lock-free after
//! initialization.
//!
//! Priority order: a filename match wins over a shebang/first-line
//! match, which wins over a content heuristic. Content matching is only
//! attempted for files without an extension - an extension that the
//! grammar set does not know is far more often a data file than
//! mislabeled source.

pub mod tables;

use crate::analysis::sniff;
use lazy_static::lazy_static;
use syntect::parsing::SyntaxSet;

lazy_static! {
    /// The full grammar set. Loading deserializes several megabytes of
    /// syntax definitions, so it happens once per process.
    static ref SYNTAXES: SyntaxSet = two_face::syntax::extra_newlines();
}

/// Return the canonical language name for a file, or an empty string
/// when no grammar matches.
///
/// `file_name` is the bare name (no directory), `shebang` the first
/// line when it starts with `#!`, and `sample` a bounded prefix of the
/// content.
pub fn lookup_language(file_name: &str, shebang: Option<&str>, sample: &[u8]) -> String {
    if let Some(language) = match_filename(file_name) {
        return language;
    }

    if let Some(line) = shebang {
        if let Some(syntax) = SYNTAXES.find_syntax_by_first_line(line) {
            let language = canonical(&syntax.name);
            if !language.is_empty() {
                return language;
            }
        }
    }

    if file_extension(file_name).is_none() && !sample.is_empty() {
        let line = String::from_utf8_lossy(sniff::first_line(sample));
        if let Some(syntax) = SYNTAXES.find_syntax_by_first_line(&line) {
            return canonical(&syntax.name);
        }
    }

    String::new()
}

/// Match by full file name first (grammar sets register names like
/// `Makefile` as extensions), then by extension, then by lowercased
/// extension - detection is skewed otherwise (`.JAVA` vs `.java`).
fn match_filename(file_name: &str) -> Option<String> {
    if file_name.is_empty() {
        return None;
    }
    if let Some(syntax) = SYNTAXES.find_syntax_by_extension(file_name) {
        return Some(canonical(&syntax.name));
    }

    let ext = file_extension(file_name)?;
    if let Some(syntax) = SYNTAXES.find_syntax_by_extension(ext) {
        return Some(canonical(&syntax.name));
    }
    let lower = ext.to_lowercase();
    SYNTAXES.find_syntax_by_extension(&lower).map(|syntax| canonical(&syntax.name))
}

/// Canonicalize a grammar name. JSON grammars never name a language:
/// the grammar set tags any `.json` as JSON, which is data, not code.
fn canonical(grammar_name: &str) -> String {
    if grammar_name.starts_with("JSON") {
        return String::new();
    }
    tables::canonical_name(grammar_name)
}

fn file_extension(file_name: &str) -> Option<&str> {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}
