//! Line format reader and writer
//!
//! ```text
//! # <header comment>
//! # <optional comment for the next entry>
//! <type-digit>_<id>=<value>
//! ```
//!
//! Parsing never fails as a whole: each bad line becomes one [`ConfigError`]
//! and the rest of the file still loads. Lines that are not valid UTF-8 are
//! decoded lossily and reported.

use std::borrow::Cow;

use crate::domain::{is_valid_id, Entry, TypeTag};

use super::error::ConfigError;

const ESCAPED_NEWLINE: &str = "\\n";
const ESCAPED_RETURN: &str = "\\r";

/// Result of parsing a whole file
#[derive(Debug, Default)]
pub struct Document {
    /// Header text, if the first line was a comment
    pub header: Option<String>,
    /// Entries in file order (duplicates included; the store rejects them)
    pub entries: Vec<Entry>,
    pub errors: Vec<ConfigError>,
}

/// Replaces line breaks with the two-character `\n` and `\r` sequences
pub fn escape_newlines(text: &str) -> String {
    text.replace('\n', ESCAPED_NEWLINE)
        .replace('\r', ESCAPED_RETURN)
}

/// Turns every `\n` and `\r` sequence back into a line break
pub fn unescape_newlines(text: &str) -> String {
    text.replace(ESCAPED_NEWLINE, "\n")
        .replace(ESCAPED_RETURN, "\r")
}

fn strip_comment(line: &str) -> &str {
    line.strip_prefix("# ")
        .or_else(|| line.strip_prefix('#'))
        .unwrap_or(line)
}

/// Splits like [`str::lines`]: on `\n`, dropping one trailing `\r` per line
/// and no empty line after a final newline
fn split_lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    (!bytes.is_empty())
        .then(|| body.split(|&b| b == b'\n'))
        .into_iter()
        .flatten()
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

pub fn parse(text: &str) -> Document {
    parse_bytes(text.as_bytes())
}

/// Parses raw file contents
pub fn parse_bytes(bytes: &[u8]) -> Document {
    let mut doc = Document::default();

    // Only the last comment before an entry is kept. Blank lines in between
    // do not detach it.
    let mut pending_comment: Option<String> = None;

    for (index, raw) in split_lines(bytes).enumerate() {
        let line_no = index + 1;
        let line = match std::str::from_utf8(raw) {
            Ok(line) => Cow::Borrowed(line),
            Err(_) => {
                doc.errors.push(ConfigError::InvalidEncoding { line: line_no });
                String::from_utf8_lossy(raw)
            }
        };

        if line_no == 1 {
            if line.starts_with('#') {
                doc.header = Some(strip_comment(&line).to_string());
            } else {
                doc.errors.push(ConfigError::MissingHeader);
            }
            continue;
        }

        if line.trim().is_empty() {
            doc.errors.push(ConfigError::EmptyLine { line: line_no });
            continue;
        }

        if line.starts_with('#') {
            pending_comment = Some(strip_comment(&line).to_string());
            continue;
        }

        let comment = pending_comment.take().unwrap_or_default();
        match parse_entry(&line, line_no, comment) {
            Ok(entry) => doc.entries.push(entry),
            Err(err) => doc.errors.push(err),
        }
    }

    if bytes.is_empty() {
        doc.errors.push(ConfigError::MissingHeader);
    }

    doc
}

fn parse_entry(line: &str, line_no: usize, comment: String) -> Result<Entry, ConfigError> {
    let mut chars = line.chars();
    let tag_char = chars.next().ok_or(ConfigError::EmptyLine { line: line_no })?;
    let tag = TypeTag::from_digit(tag_char).ok_or(ConfigError::InvalidType {
        tag: tag_char,
        line: line_no,
    })?;

    let body = chars
        .as_str()
        .strip_prefix('_')
        .ok_or(ConfigError::MalformedPrefix { line: line_no })?;

    let (id, raw) = body
        .split_once('=')
        .ok_or(ConfigError::MissingSeparator { line: line_no })?;

    if !is_valid_id(id) {
        return Err(ConfigError::InvalidId(id.to_string()));
    }

    Ok(Entry::raw(id, comment, unescape_newlines(raw), tag))
}

/// Renders a complete file
///
/// Comment lines are only emitted for entries with a non-empty comment and
/// only when `with_comments` is set.
pub fn render<'a>(
    header: &str,
    entries: impl IntoIterator<Item = &'a Entry>,
    with_comments: bool,
) -> String {
    let mut out = format!("# {}\n", single_line(header));

    for entry in entries {
        if with_comments && !entry.comment().is_empty() {
            out.push_str(&format!("# {}\n", single_line(entry.comment())));
        }
        out.push_str(&format!(
            "{}_{}={}\n",
            entry.tag().digit(),
            entry.id(),
            escape_newlines(entry.value())
        ));
    }

    out
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}
