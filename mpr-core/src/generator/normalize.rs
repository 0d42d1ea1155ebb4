//! Line-ending normalization and legacy encoding.
//!
//! MPR files use CRLF line endings and the Windows-1252 codepage regardless
//! of the operating system. The normalizer repairs mixed or doubled line
//! endings from upstream concatenation instead of propagating them.

use std::path::Path;
use tracing::warn;

use crate::error::{ExportError, Result};

/// Normalize text to exactly one CRLF between logical lines.
///
/// Trims trailing horizontal whitespace per line, collapses runs of two or
/// more empty lines to a single empty line (single blank lines are
/// intentional section separators), and guarantees the non-empty result
/// ends with exactly one CRLF. Idempotent.
pub fn normalize_content(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }

    // Collapse doubled carriage returns first, then reduce every line
    // ending to a single canonical form.
    let mut text = content.to_string();
    while text.contains("\r\r") {
        text = text.replace("\r\r", "\r");
    }
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<&str> = Vec::new();
    for line in text.split('\n') {
        let trimmed = line.trim_end_matches([' ', '\t']);
        if trimmed.is_empty() {
            if lines.last().is_some_and(|last| last.is_empty()) {
                continue;
            }
            lines.push("");
        } else {
            lines.push(trimmed);
        }
    }

    // A trailing empty entry comes from a trailing newline in the input;
    // the final CRLF is appended below either way.
    while lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }

    let mut result = lines.join("\r\n");
    if !result.is_empty() {
        result.push_str("\r\n");
    }
    result
}

/// Report line-ending discipline violations. Empty means clean.
pub fn verify_content(content: &str) -> Vec<String> {
    let mut issues = Vec::new();

    if content.contains("\r\r") {
        issues.push(format!(
            "found {} doubled carriage returns",
            content.matches("\r\r").count()
        ));
    }

    let bare_lf = content
        .as_bytes()
        .iter()
        .enumerate()
        .filter(|(idx, b)| **b == b'\n' && (*idx == 0 || content.as_bytes()[idx - 1] != b'\r'))
        .count();
    if bare_lf > 0 {
        issues.push(format!("found {} bare LF characters", bare_lf));
    }

    let bare_cr = content
        .as_bytes()
        .iter()
        .enumerate()
        .filter(|(idx, b)| {
            **b == b'\r' && content.as_bytes().get(idx + 1).copied() != Some(b'\n')
        })
        .count();
    if bare_cr > 0 {
        issues.push(format!("found {} bare CR characters", bare_cr));
    }

    if !content.is_empty() && !content.ends_with("\r\n") {
        issues.push("content does not end with CRLF".to_string());
    }

    issues
}

/// Encode text into Windows-1252, replacing unencodable characters with a
/// placeholder instead of failing.
///
/// The codepage is ASCII plus Latin-1 with 27 specials in the 0x80-0x9F
/// range.
pub fn encode_windows_1252(content: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(content.len());
    let mut replaced = 0usize;

    for ch in content.chars() {
        match encode_char(ch) {
            Some(b) => bytes.push(b),
            None => {
                bytes.push(b'?');
                replaced += 1;
            }
        }
    }

    if replaced > 0 {
        warn!("replaced {} characters not encodable in Windows-1252", replaced);
    }

    bytes
}

fn encode_char(ch: char) -> Option<u8> {
    let code = ch as u32;
    match code {
        // ASCII and the Latin-1 range map directly.
        0x00..=0x7F | 0xA0..=0xFF => Some(code as u8),
        // 0x80-0x9F specials.
        0x20AC => Some(0x80), // €
        0x201A => Some(0x82), // ‚
        0x0192 => Some(0x83), // ƒ
        0x201E => Some(0x84), // „
        0x2026 => Some(0x85), // …
        0x2020 => Some(0x86), // †
        0x2021 => Some(0x87), // ‡
        0x02C6 => Some(0x88), // ˆ
        0x2030 => Some(0x89), // ‰
        0x0160 => Some(0x8A), // Š
        0x2039 => Some(0x8B), // ‹
        0x0152 => Some(0x8C), // Œ
        0x017D => Some(0x8E), // Ž
        0x2018 => Some(0x91), // '
        0x2019 => Some(0x92), // '
        0x201C => Some(0x93), // "
        0x201D => Some(0x94), // "
        0x2022 => Some(0x95), // •
        0x2013 => Some(0x96), // –
        0x2014 => Some(0x97), // —
        0x02DC => Some(0x98), // ˜
        0x2122 => Some(0x99), // ™
        0x0161 => Some(0x9A), // š
        0x203A => Some(0x9B), // ›
        0x0153 => Some(0x9C), // œ
        0x017E => Some(0x9E), // ž
        0x0178 => Some(0x9F), // Ÿ
        _ => None,
    }
}

/// Write MPR content to a file: normalize, verify, encode, and write the
/// whole buffer in one binary write so no newline translation can occur.
pub fn write_mpr_file(path: &Path, content: &str) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(ExportError::EmptyPath);
    }

    let cleaned = normalize_content(content);
    for issue in verify_content(&cleaned) {
        warn!("normalized content still dirty: {}", issue);
    }

    std::fs::write(path, encode_windows_1252(&cleaned)).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
