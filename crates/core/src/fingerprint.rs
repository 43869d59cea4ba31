use std::collections::BTreeSet;

use crate::normalize::strip_comments;
use crate::stoplist::Stoplist;

const PLACEHOLDER_STR: char = 'S';
const PLACEHOLDER_NUM: char = 'N';
const PLACEHOLDER_IDENT: char = 'X';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme<'a> {
    Str,
    Number,
    Ident(&'a str),
    Whitespace,
    Other(char),
}

/// Splits comment-free source into the coarse lexemes both the fingerprint
/// and the identifier extractor work on.
fn lex(text: &str) -> Vec<Lexeme<'_>> {
    let bytes = text.as_bytes();
    let mut i = 0usize;
    let mut out = Vec::new();

    while i < bytes.len() {
        let b = bytes[i];

        if b == b'"' || b == b'\'' {
            let quote = b;
            i += 1;
            while i < bytes.len() {
                let c = bytes[i];
                if c == b'\\' && i + 1 < bytes.len() {
                    i += 2;
                    continue;
                }
                i += 1;
                if c == quote {
                    break;
                }
            }
            // an escape may have skipped over a multi-byte char; resync
            while i < bytes.len() && !text.is_char_boundary(i) {
                i += 1;
            }
            out.push(Lexeme::Str);
            continue;
        }

        if b.is_ascii_digit() {
            i += 1;
            while i < bytes.len() {
                let c = bytes[i];
                let decimal_point =
                    c == b'.' && i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit();
                if c.is_ascii_alphanumeric() || c == b'_' || decimal_point {
                    i += 1;
                } else {
                    break;
                }
            }
            out.push(Lexeme::Number);
            continue;
        }

        if b.is_ascii_alphabetic() || b == b'_' {
            let start = i;
            i += 1;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            out.push(Lexeme::Ident(&text[start..i]));
            continue;
        }

        if b.is_ascii() {
            i += 1;
            if b.is_ascii_whitespace() {
                out.push(Lexeme::Whitespace);
            } else {
                out.push(Lexeme::Other(char::from(b)));
            }
            continue;
        }

        let Some(ch) = text[i..].chars().next() else {
            break;
        };
        i += ch.len_utf8();
        if ch.is_whitespace() {
            out.push(Lexeme::Whitespace);
        } else {
            out.push(Lexeme::Other(ch));
        }
    }

    out
}

/// Whitespace-free skeleton of a submission: string and character literals
/// become `S`, numbers `N`, identifiers `X`, and punctuation is kept as is.
/// Renaming identifiers or changing literal values leaves it unchanged.
pub fn structure_fingerprint(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let stripped = strip_comments(text);
    let mut out = String::with_capacity(stripped.len() / 2);
    for lexeme in lex(&stripped) {
        match lexeme {
            Lexeme::Str => out.push(PLACEHOLDER_STR),
            Lexeme::Number => out.push(PLACEHOLDER_NUM),
            Lexeme::Ident(_) => out.push(PLACEHOLDER_IDENT),
            Lexeme::Whitespace => {}
            Lexeme::Other(ch) => out.push(ch),
        }
    }
    out
}

/// Identifier names outside string/char literals and comments, minus the
/// stoplist.
pub fn extract_identifiers(text: &str, stoplist: &Stoplist) -> BTreeSet<String> {
    if text.is_empty() {
        return BTreeSet::new();
    }
    let stripped = strip_comments(text);
    lex(&stripped)
        .into_iter()
        .filter_map(|lexeme| match lexeme {
            Lexeme::Ident(name) if !stoplist.contains(name) => Some(name.to_string()),
            _ => None,
        })
        .collect()
}
