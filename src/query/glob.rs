//! Shell-style pattern matching for the `like` operator
//!
//! `*` matches any run, `?` one character, `[...]` a character class and
//! `[!...]` its negation. An unterminated `[` is a literal bracket.

use crate::config;
use crate::error::{QueryError, Result};
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;

/// Compiled patterns keyed by glob text
static PATTERN_CACHE: Lazy<RwLock<AHashMap<String, Regex>>> =
    Lazy::new(|| RwLock::new(AHashMap::new()));

/// Match `text` against a shell-style `pattern` over the whole string
pub fn matches(text: &str, pattern: &str) -> Result<bool> {
    if let Some(regex) = PATTERN_CACHE.read().get(pattern) {
        return Ok(regex.is_match(text));
    }

    let regex = compile(pattern)?;
    let found = regex.is_match(text);

    let capacity = config::current().cache_capacity.max(1);
    let mut cache = PATTERN_CACHE.write();
    if cache.len() >= capacity {
        cache.clear();
    }
    cache.insert(pattern.to_string(), regex);
    Ok(found)
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(&translate(pattern))
        .map_err(|e| QueryError::Syntax(format!("invalid like pattern '{}': {}", pattern, e)))
}

/// Translate a glob into an anchored regular expression
pub fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2 + 8);
    out.push_str(r"(?s)\A");

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    push_class(&mut out, &chars[i..end]);
                    i = end + 1;
                }
                None => out.push_str(r"\["),
            },
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }

    out.push_str(r"\z");
    out
}

/// Index of the `]` closing a class opened just before `start`.
/// A `]` directly after `[` or `[!` is a member, not the terminator.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    chars[j.min(chars.len())..]
        .iter()
        .position(|&c| c == ']')
        .map(|offset| j + offset)
}

/// A member of a bracket class
enum ClassItem {
    Single(char),
    Range(char, char),
}

/// Split class members into single characters and `lo-hi` ranges. A `-`
/// at either end is literal; reversed ranges match nothing and are dropped.
fn class_items(members: &[char]) -> Vec<ClassItem> {
    let mut items = Vec::with_capacity(members.len());
    let mut k = 0;
    while k < members.len() {
        if k + 2 < members.len() && members[k + 1] == '-' {
            let (lo, hi) = (members[k], members[k + 2]);
            if lo <= hi {
                items.push(ClassItem::Range(lo, hi));
            }
            k += 3;
        } else {
            items.push(ClassItem::Single(members[k]));
            k += 1;
        }
    }
    items
}

fn escape_char(c: char) -> String {
    regex::escape(c.encode_utf8(&mut [0; 4]))
}

fn push_class(out: &mut String, members: &[char]) {
    let (negated, members) = match members.split_first() {
        Some(('!', rest)) => (true, rest),
        _ => (false, members),
    };

    let items = class_items(members);
    if items.is_empty() {
        // Only empty ranges: nothing matches, or anything when negated
        out.push_str(if negated { "." } else { "(?!)" });
        return;
    }

    out.push('[');
    if negated {
        out.push('^');
    }
    for item in items {
        match item {
            ClassItem::Single(c) => out.push_str(&escape_char(c)),
            ClassItem::Range(lo, hi) => {
                out.push_str(&escape_char(lo));
                out.push('-');
                out.push_str(&escape_char(hi));
            }
        }
    }
    out.push(']');
}
