//! Dotted token paths and `{reference}` syntax.
//!
//! Segments are joined with `.`. A literal `.` inside a segment is written
//! `\.` and a literal `\` is written `\\`, so `split_path(&join_path(p))`
//! always returns `p`.

use crate::error::TokenError;
use std::ops::Range;

pub const SEPARATOR: char = '.';
const ESCAPE: char = '\\';

/// Join path segments into a dotted path, escaping separators.
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        for ch in segment.as_ref().chars() {
            if ch == SEPARATOR || ch == ESCAPE {
                out.push(ESCAPE);
            }
            out.push(ch);
        }
    }
    out
}

/// Split a dotted path into its segments, honouring escapes.
pub fn split_path(dotted: &str) -> Result<Vec<String>, TokenError> {
    let invalid = |message: &str| TokenError::InvalidPath {
        path: dotted.to_string(),
        message: message.to_string(),
    };

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = dotted.chars();
    while let Some(ch) = chars.next() {
        match ch {
            ESCAPE => match chars.next() {
                Some(next @ (SEPARATOR | ESCAPE)) => current.push(next),
                Some(other) => return Err(invalid(&format!("invalid escape '\\{}'", other))),
                None => return Err(invalid("dangling escape at end of path")),
            },
            SEPARATOR => {
                if current.is_empty() {
                    return Err(invalid("empty path segment"));
                }
                segments.push(std::mem::take(&mut current));
            }
            other => current.push(other),
        }
    }
    if current.is_empty() {
        return Err(invalid("empty path segment"));
    }
    segments.push(current);
    Ok(segments)
}

/// Canonical form of a dotted path (re-joins after splitting).
pub fn normalize_path(dotted: &str) -> Result<String, TokenError> {
    Ok(join_path(&split_path(dotted)?))
}

/// If `value` is exactly one `{path}` reference, return the inner path.
pub fn as_reference(value: &str) -> Option<&str> {
    let refs = find_references(value);
    match refs.as_slice() {
        [(range, inner)] if range.start == 0 && range.end == value.len() => Some(inner),
        _ => None,
    }
}

/// Every `{path}` reference embedded in `value`, with its byte range
/// (braces included).
pub fn find_references(value: &str) -> Vec<(Range<usize>, &str)> {
    let mut out = Vec::new();
    let mut offset = 0;
    while let Some(open) = value[offset..].find('{') {
        let start = offset + open;
        let Some(close) = value[start + 1..].find('}') else {
            break;
        };
        let end = start + 1 + close;
        let inner = &value[start + 1..end];
        if inner.is_empty() || inner.contains('{') {
            offset = start + 1;
            continue;
        }
        out.push((start..end + 1, inner));
        offset = end + 1;
    }
    out
}
