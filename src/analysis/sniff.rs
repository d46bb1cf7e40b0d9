//! Raw-byte sniffing helpers
//!
//! Everything here operates on byte slices, never decoded text, so that
//! malformed encodings cannot make a scan fail. Callers hand these
//! helpers a bounded prefix of a file and get back cheap structural
//! signals: does it look binary, how long is the longest line, what
//! interpreter does the shebang name.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Line length (bytes, without a newline) past which text counts as
/// having "long lines" - a cheap proxy for minified/generated content.
pub const LONG_LINE_CUTOFF: usize = 1000;

/// Window of the sample inspected by the binary/text heuristic.
const SNIFF_WINDOW: usize = 1024;

/// Fraction of suspicious bytes above which a sample reads as binary.
const BINARY_RATIO: f64 = 0.30;

/// Unicode byte-order marks, longest first so UTF-32 wins over UTF-16.
const BOMS: &[&[u8]] = &[
    &[0xEF, 0xBB, 0xBF],
    &[0xFF, 0xFE, 0x00, 0x00],
    &[0x00, 0x00, 0xFE, 0xFF],
    &[0xFF, 0xFE],
    &[0xFE, 0xFF],
];

/// Read at most `max` bytes from the start of the file at `path`.
///
/// The handle is released as soon as the prefix is read; nothing is
/// held across later analysis steps.
pub fn read_prefix(path: &Path, max: usize) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut data = Vec::with_capacity(max.min(64 * 1024));
    file.take(max as u64).read_to_end(&mut data)?;
    Ok(data)
}

/// Return true if a starting chunk reads as binary rather than text.
///
/// Empty input and BOM-prefixed input read as text. A NUL byte reads as
/// binary. Otherwise the sample is binary when control characters
/// outside the usual text set make up more than 30% of the window.
pub fn looks_binary(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return false;
    }
    if BOMS.iter().any(|bom| sample.starts_with(bom)) {
        return false;
    }

    let window = &sample[..sample.len().min(SNIFF_WINDOW)];
    if window.contains(&0) {
        return true;
    }

    let suspicious = window.iter().filter(|&&b| is_suspicious(b)).count();
    suspicious as f64 / window.len() as f64 > BINARY_RATIO
}

/// Control characters that rarely appear in text. BEL through CR and
/// ESC are fine (terminals, ANSI art); high bytes may be UTF-8 or
/// legacy single-byte encodings and are not held against a file.
fn is_suspicious(byte: u8) -> bool {
    !matches!(byte, 0x07..=0x0D | 0x1B | 0x20..=0x7E | 0x80..=0xFF)
}

/// Return the length of the longest newline-delimited run in `sample`,
/// counting a trailing unterminated run.
pub fn max_line_length(sample: &[u8]) -> usize {
    let mut longest = 0usize;
    let mut current = 0usize;
    for &byte in sample {
        if byte == b'\n' {
            longest = longest.max(current);
            current = 0;
        } else {
            current += 1;
        }
    }
    longest.max(current)
}

/// Return the first line of `sample` without its line terminator.
pub fn first_line(sample: &[u8]) -> &[u8] {
    let end = sample.iter().position(|&b| b == b'\n').unwrap_or(sample.len());
    let line = &sample[..end];
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Return the interpreter named by a `#!` line, if any.
///
/// Resolves `/usr/bin/env` indirection (skipping `env` flags such as
/// `-S`), and returns the bare program name: `#!/usr/bin/env python3`
/// yields `python3`.
pub fn shebang_interpreter(sample: &[u8]) -> Option<String> {
    let line = first_line(sample);
    let rest = line.strip_prefix(b"#!")?;
    let text = String::from_utf8_lossy(rest);

    let mut tokens = text.split_whitespace();
    let mut interp = tokens.next()?.rsplit('/').next()?.to_string();
    if interp == "env" {
        loop {
            let token = tokens.next()?;
            if token.starts_with('-') {
                continue;
            }
            interp = token.rsplit('/').next()?.to_string();
            break;
        }
    }

    if interp.is_empty() { None } else { Some(interp) }
}
