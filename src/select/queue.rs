//! Character queue over a selector query string.
//!
//! CSS selectors are parsed character-by-character rather than through a
//! separate token stream: identifiers may contain backslash escapes, and
//! pseudo-class arguments are chomped as balanced `(`/`)` runs whose
//! contents are re-parsed recursively. The `TokenQueue` provides the
//! cursor primitives the parser needs, plus the CSS identifier
//! escape/unescape pair.
//!
//! Identifier escaping follows the W3C algorithms: serialization per CSSOM
//! "serialize an identifier", consumption per CSS Syntax Module Level 3
//! "consume an ident sequence". `escape_css_identifier` and
//! `unescape_css_identifier` are exact inverses.

use std::fmt::Write as _;

use crate::error::SelectorError;

/// A character cursor over a query string.
///
/// Positions are byte offsets, always on `char` boundaries. All matching
/// helpers are ASCII-case-insensitive, since the selector grammar is
/// case-insensitive throughout.
pub struct TokenQueue<'a> {
    /// The input query.
    input: &'a str,
    /// Current byte offset into the input.
    pos: usize,
}

impl<'a> TokenQueue<'a> {
    /// Creates a new queue over the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Returns `true` if the queue has no characters left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns the unconsumed remainder of the input.
    #[must_use]
    pub fn remainder(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Returns the next character without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    /// Consumes and returns the next character.
    pub fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes any leading whitespace; returns `true` if any was seen.
    pub fn consume_whitespace(&mut self) -> bool {
        let mut seen = false;
        while self.peek().is_some_and(char::is_whitespace) {
            self.consume();
            seen = true;
        }
        seen
    }

    /// Returns `true` if the remainder starts with `seq`,
    /// ASCII-case-insensitively.
    #[must_use]
    pub fn matches(&self, seq: &str) -> bool {
        self.remainder()
            .get(..seq.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(seq))
    }

    /// Consumes `seq` if the remainder starts with it; returns `true` on
    /// a match.
    pub fn match_chomp(&mut self, seq: &str) -> bool {
        if self.matches(seq) {
            self.pos += seq.len();
            true
        } else {
            false
        }
    }

    /// Returns `true` if the next character is `c`.
    #[must_use]
    pub fn matches_char(&self, c: char) -> bool {
        self.peek() == Some(c)
    }

    /// Returns `true` if the next character is any of `chars`.
    #[must_use]
    pub fn matches_any(&self, chars: &[char]) -> bool {
        self.peek().is_some_and(|c| chars.contains(&c))
    }

    /// Consumes and returns the next character if it is any of `chars`.
    pub fn chomp_any(&mut self, chars: &[char]) -> Option<char> {
        if self.matches_any(chars) {
            self.consume()
        } else {
            None
        }
    }

    /// Returns `true` if the next character could start a tag name:
    /// a letter, digit, underscore, non-ASCII character, or escape.
    #[must_use]
    pub fn matches_word(&self) -> bool {
        self.peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '\\')
    }

    /// Consumes characters until the remainder starts with any of `seqs`
    /// (checked ASCII-case-insensitively), returning the consumed run.
    pub fn consume_to_any(&mut self, seqs: &[&str]) -> &'a str {
        let start = self.pos;
        while !self.is_empty() && !seqs.iter().any(|seq| self.matches(seq)) {
            self.consume();
        }
        &self.input[start..self.pos]
    }

    /// Consumes a balanced `open`...`close` run, returning the contents
    /// between the outer markers with escapes preserved.
    ///
    /// Quoted sections (single or double) are opaque: markers inside them
    /// do not count toward the balance. A backslash escapes the following
    /// character.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::Parse`] if the next character is not
    /// `open`, or if the input ends before the markers balance.
    pub fn chomp_balanced(&mut self, open: char, close: char) -> Result<String, SelectorError> {
        if !self.matches_char(open) {
            return Err(SelectorError::Parse(format!(
                "expected '{open}' at '{}'",
                self.remainder()
            )));
        }
        self.consume();
        let start = self.pos;
        let mut depth = 1;
        let mut in_single = false;
        let mut in_double = false;
        let mut escaped = false;

        while let Some(c) = self.peek() {
            let end = self.pos;
            self.consume();
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' => escaped = true,
                '\'' if !in_double => in_single = !in_single,
                '"' if !in_single => in_double = !in_double,
                _ if in_single || in_double => {}
                _ if c == open => depth += 1,
                _ if c == close => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(self.input[start..end].to_string());
                    }
                }
                _ => {}
            }
        }
        Err(SelectorError::Parse(format!(
            "did not find balanced marker '{close}' in '{}'",
            &self.input[start..]
        )))
    }

    /// Consumes an element selector: a tag name, optionally qualified with
    /// a namespace bar (`ns|tag`, `*|tag`, `ns|*`). Escapes are resolved.
    pub fn consume_element_selector(&mut self) -> Result<String, SelectorError> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.consume_escape_into(&mut out)?;
            } else if c.is_alphanumeric() || c >= '\u{80}' || matches!(c, '-' | '_' | '|' | '*') {
                self.consume();
                out.push(c);
            } else {
                break;
            }
        }
        Ok(out)
    }

    /// Consumes a CSS identifier off the queue, resolving escapes.
    ///
    /// Follows CSS Syntax Module Level 3 "consume an ident sequence", with
    /// one legacy allowance: improperly unescaped identifiers (e.g. a
    /// leading digit) are accepted as authored.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::Parse`] if a backslash appears at the end
    /// of the input with nothing to escape.
    pub fn consume_css_identifier(&mut self) -> Result<String, SelectorError> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.consume_escape_into(&mut out)?;
            } else if c.is_ascii_alphanumeric() || c >= '\u{80}' || matches!(c, '-' | '_') {
                self.consume();
                out.push(c);
            } else {
                break;
            }
        }
        Ok(out)
    }

    /// Consumes a backslash escape sequence, appending the escaped
    /// character to `out`.
    ///
    /// Per CSS Syntax: `\` followed by up to six hex digits (then one
    /// optional whitespace terminator) names a code point; `\` followed by
    /// any other character stands for that character.
    fn consume_escape_into(&mut self, out: &mut String) -> Result<(), SelectorError> {
        self.consume(); // the backslash
        let Some(first) = self.peek() else {
            return Err(SelectorError::Parse(format!(
                "invalid escape sequence at end of '{}'",
                self.input
            )));
        };

        if first.is_ascii_hexdigit() {
            let mut hex = String::new();
            while hex.len() < 6 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                if let Some(h) = self.consume() {
                    hex.push(h);
                }
            }
            // one whitespace terminates the escape
            if self.peek().is_some_and(char::is_whitespace) {
                self.consume();
            }
            let code = u32::from_str_radix(&hex, 16).unwrap_or(0xFFFD);
            out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
        } else {
            self.consume();
            out.push(first);
        }
        Ok(())
    }
}

/// Removes backslash escapes from a pseudo-class argument, keeping the
/// escaped characters (`\(` becomes `(`, `\\` becomes `\`).
#[must_use]
pub fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Escapes a CSS identifier (a tag, ID, or class name) so that it can be
/// embedded in a selector, per CSSOM "serialize an identifier".
///
/// [`unescape_css_identifier`] is the exact inverse.
#[must_use]
pub fn escape_css_identifier(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let first = ident.chars().next();
    for (i, c) in ident.chars().enumerate() {
        let code = c as u32;
        if c == '\0' {
            out.push('\u{FFFD}');
        } else if code < 0x20 || code == 0x7F {
            let _ = write!(out, "\\{code:x} ");
        } else if i == 0 && c.is_ascii_digit() {
            let _ = write!(out, "\\{code:x} ");
        } else if i == 1 && c.is_ascii_digit() && first == Some('-') {
            let _ = write!(out, "\\{code:x} ");
        } else if i == 0 && c == '-' && ident.chars().count() == 1 {
            out.push('\\');
            out.push('-');
        } else if code >= 0x80 || c.is_ascii_alphanumeric() || matches!(c, '-' | '_') {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

/// Unescapes a CSS identifier, per CSS Syntax Module Level 3 "consume an
/// ident sequence". Inverse of [`escape_css_identifier`].
///
/// For backwards compatibility, improperly formatted identifiers (e.g. a
/// bare leading digit) are accepted as authored.
///
/// # Errors
///
/// Returns [`SelectorError::Parse`] if the input ends in a dangling escape.
pub fn unescape_css_identifier(input: &str) -> Result<String, SelectorError> {
    let mut tq = TokenQueue::new(input);
    tq.consume_css_identifier()
}
