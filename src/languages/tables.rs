//! Static language tables
//!
//! Canonical-name mapping for grammar names, the curated set of
//! languages that count as source code, and the interpreter names that
//! mark a file as a script.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};

lazy_static! {
    /// Grammar-set names that differ from the canonical language name.
    /// An empty value means "not a programming language at all".
    static ref CANONICAL_NAMES: HashMap<&'static str, &'static str> = HashMap::from([
        ("Bourne Again Shell (bash)", "Bash"),
        ("Shell-Unix-Generic", "Shell"),
        ("ShellScript", "Bash"),
        ("JavaScript (Babel)", "JavaScript"),
        ("MultiMarkdown", "Markdown"),
        ("Plain Text", ""),
    ]);

    /// Languages that count as source code. Markup and data grammars
    /// (YAML, JSON, CSV, Markdown, ...) are deliberately absent: the
    /// grammar set matches them, but tagging a data file as source
    /// sends downstream scanners down the wrong path.
    static ref SOURCE_LANGUAGES: HashSet<&'static str> = HashSet::from([
        "Ada",
        "AppleScript",
        "Assembly (x86_64)",
        "Bash",
        "C",
        "C#",
        "C++",
        "Clojure",
        "Crystal",
        "D",
        "Dart",
        "Elixir",
        "Elm",
        "Erlang",
        "F#",
        "Fortran",
        "Go",
        "Groovy",
        "Haskell",
        "Java",
        "JavaScript",
        "Julia",
        "Kotlin",
        "Lisp",
        "Lua",
        "Nim",
        "OCaml",
        "Objective-C",
        "Objective-C++",
        "PHP",
        "Pascal",
        "Perl",
        "PowerShell",
        "Python",
        "R",
        "Ruby",
        "Rust",
        "Scala",
        "Scheme",
        "Shell",
        "Swift",
        "TypeScript",
        "TypeScriptReact",
        "Zig",
    ]);

    /// Interpreter binaries whose shebang marks a script. Keyed by the
    /// base name, version suffixes already stripped.
    static ref SCRIPT_INTERPRETERS: HashSet<&'static str> = HashSet::from([
        "sh", "bash", "zsh", "ksh", "dash", "fish",
        "python", "perl", "ruby", "node", "nodejs", "php", "lua",
        "awk", "gawk", "mawk", "sed", "expect", "tclsh", "wish",
        "Rscript", "pwsh", "groovy",
    ]);

    /// Trailing version decoration on interpreter names: python3,
    /// python3.12, php-8, ruby2.7.
    static ref VERSION_SUFFIX: Regex =
        Regex::new(r"[-.]?[0-9][0-9.]*$").expect("Failed to compile version-suffix regex");
}

/// Map a grammar name to its canonical language name. Unknown names
/// pass through unchanged.
pub fn canonical_name(grammar_name: &str) -> String {
    match CANONICAL_NAMES.get(grammar_name) {
        Some(mapped) => (*mapped).to_string(),
        None => grammar_name.to_string(),
    }
}

/// Whether `language` is in the curated source-code set.
pub fn is_source_language(language: &str) -> bool {
    SOURCE_LANGUAGES.contains(language)
}

/// Whether `base` (a version-stripped interpreter name) is a known
/// scripting-language binary.
pub fn is_script_interpreter(base: &str) -> bool {
    SCRIPT_INTERPRETERS.contains(base)
}

/// Strip trailing version decoration from an interpreter name:
/// `python3.12` becomes `python`, `node` stays `node`.
pub fn base_interpreter(name: &str) -> String {
    VERSION_SUFFIX.replace(name, "").into_owned()
}

/// Display name and MIME type for a script interpreter, used by the
/// native probe when describing shebanged text.
pub fn script_flavor(base: &str) -> (String, String) {
    let (pretty, mime) = match base {
        "sh" | "dash" | "ksh" => ("POSIX shell", "text/x-shellscript"),
        "bash" => ("Bourne-Again shell", "text/x-shellscript"),
        "zsh" => ("zsh", "text/x-shellscript"),
        "fish" => ("fish", "text/x-shellscript"),
        "python" => ("Python", "text/x-python"),
        "perl" => ("Perl", "text/x-perl"),
        "ruby" => ("Ruby", "text/x-ruby"),
        "node" | "nodejs" => ("Node.js", "text/javascript"),
        "php" => ("PHP", "text/x-php"),
        "lua" => ("Lua", "text/x-lua"),
        "awk" | "gawk" | "mawk" => ("awk", "text/x-awk"),
        "tclsh" | "wish" => ("Tcl", "text/x-tcl"),
        _ => return (base.to_string(), format!("text/x-script.{}", base.to_lowercase())),
    };
    (pretty.to_string(), mime.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("Bourne Again Shell (bash)"), "Bash");
        assert_eq!(canonical_name("Rust"), "Rust");
        assert_eq!(canonical_name("Plain Text"), "");
    }

    #[test]
    fn test_source_language_set() {
        assert!(is_source_language("C"));
        assert!(is_source_language("Rust"));
        assert!(is_source_language("Python"));
        assert!(!is_source_language("YAML"));
        assert!(!is_source_language("JSON"));
        assert!(!is_source_language("Markdown"));
        assert!(!is_source_language(""));
    }

    #[test]
    fn test_base_interpreter() {
        assert_eq!(base_interpreter("python3"), "python");
        assert_eq!(base_interpreter("python3.12"), "python");
        assert_eq!(base_interpreter("php-8"), "php");
        assert_eq!(base_interpreter("node"), "node");
        assert_eq!(base_interpreter("bash"), "bash");
    }

    #[test]
    fn test_script_interpreters() {
        assert!(is_script_interpreter("bash"));
        assert!(is_script_interpreter("python"));
        assert!(!is_script_interpreter("gcc"));
        assert!(!is_script_interpreter(""));
    }

    #[test]
    fn test_script_flavor() {
        let (pretty, mime) = script_flavor("python");
        assert_eq!(pretty, "Python");
        assert_eq!(mime, "text/x-python");

        let (pretty, mime) = script_flavor("made-up");
        assert_eq!(pretty, "made-up");
        assert_eq!(mime, "text/x-script.made-up");
    }
}
