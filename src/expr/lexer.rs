//! Tokenizer for the template expression language.

use super::error::ExprError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    Punct(&'static str),
}

/// Multi-character operators first so that the longest match wins.
const PUNCTUATORS: &[&str] = &[
    "===", "!==", "==", "!=", "<=", ">=", "&&", "||", "??", "(", ")", "[", "]", "{", "}", ".",
    ",", ":", "?", "!", "+", "-", "*", "/", "%", "<", ">",
];

/// Split expression text into tokens paired with their byte offsets.
pub(crate) fn tokenize(source: &str) -> Result<Vec<(usize, Token)>, ExprError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let ch = bytes[pos];

        if ch.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;

        if ch.is_ascii_digit() || (ch == b'.' && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit))
        {
            while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'.') {
                pos += 1;
            }
            if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
                pos += 1;
                if pos < bytes.len() && (bytes[pos] == b'+' || bytes[pos] == b'-') {
                    pos += 1;
                }
                while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                    pos += 1;
                }
            }
            let text = &source[start..pos];
            let number = text
                .parse::<f64>()
                .map_err(|_| ExprError::syntax(start, format!("invalid number '{text}'")))?;
            tokens.push((start, Token::Number(number)));
            continue;
        }

        if ch == b'_' || ch == b'$' || ch.is_ascii_alphabetic() {
            while pos < bytes.len()
                && (bytes[pos] == b'_' || bytes[pos] == b'$' || bytes[pos].is_ascii_alphanumeric())
            {
                pos += 1;
            }
            tokens.push((start, Token::Ident(source[start..pos].to_string())));
            continue;
        }

        if ch == b'"' || ch == b'\'' {
            let (text, end) = read_string(source, pos)?;
            tokens.push((start, Token::Str(text)));
            pos = end;
            continue;
        }

        match PUNCTUATORS.iter().find(|p| source[pos..].starts_with(**p)) {
            Some(punct) => {
                tokens.push((start, Token::Punct(punct)));
                pos += punct.len();
            }
            None => {
                let found = source[pos..].chars().next().unwrap_or('?');
                return Err(ExprError::syntax(start, format!("unexpected character '{found}'")));
            }
        }
    }

    Ok(tokens)
}

/// Read a quoted string literal starting at `start`; returns the text and the end offset.
fn read_string(source: &str, start: usize) -> Result<(String, usize), ExprError> {
    let mut chars = source[start..].char_indices();
    let Some((_, quote)) = chars.next() else {
        return Err(ExprError::syntax(start, "expected string literal"));
    };

    let mut text = String::new();
    while let Some((offset, ch)) = chars.next() {
        match ch {
            c if c == quote => return Ok((text, start + offset + c.len_utf8())),
            '\\' => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, 'r')) => text.push('\r'),
                Some((_, escaped)) => text.push(escaped),
                None => break,
            },
            c => text.push(c),
        }
    }

    Err(ExprError::syntax(start, "unterminated string literal"))
}
