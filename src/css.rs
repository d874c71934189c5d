//! Selector Scanner for Component CSS
//!
//! Finds class-selector tokens (`.name`) inside rule preludes without
//! building a full stylesheet AST. Declarations, at-rule preludes, comments,
//! strings and SCSS interpolation are skipped, so only selectors are touched.
//!
//! The scanner understands plain CSS plus the SCSS/Less surface that shows up
//! in component styles: nesting, `//` comments, `#{...}`/`@{...}`, `@at-root`,
//! `@extend` and Less mixin calls.

use std::collections::HashMap;

use crate::error::{Result, StyleError};
use crate::tree::extension_of;

/// A `.name` token inside a selector. `start` is the offset of the dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassToken {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

/// Scan `source` and return every class-selector token in source order.
pub fn scan_class_selectors(source: &str, file: &str) -> Result<Vec<ClassToken>> {
    let mut scanner = SelectorScanner::new(source, file);
    scanner.scan()?;
    Ok(scanner.tokens)
}

/// Distinct class names, ordered by first appearance
pub fn distinct_class_names(tokens: &[ClassToken]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tokens
        .iter()
        .filter(|t| seen.insert(t.name.as_str()))
        .map(|t| t.name.clone())
        .collect()
}

/// Replace each token whose name is in `renames`, leaving everything else intact.
pub fn apply_class_renames(
    source: &str,
    tokens: &[ClassToken],
    renames: &HashMap<String, String>,
) -> String {
    let mut replacements: Vec<(usize, usize, &str)> = tokens
        .iter()
        .filter_map(|t| {
            renames
                .get(&t.name)
                .map(|new_name| (t.start + 1, t.end, new_name.as_str()))
        })
        .collect();

    // Sort reverse to apply safely
    replacements.sort_by(|a, b| b.0.cmp(&a.0));

    let mut result = source.to_string();
    for (start, end, replacement) in replacements {
        result.replace_range(start..end, replacement);
    }
    result
}

/// 1-based line and column of a byte offset
pub fn line_col(source: &str, offset: usize) -> (u32, u32) {
    let offset = offset.min(source.len());
    let before = &source.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() as u32 + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|p| p + 1)
        .unwrap_or(0);
    let column = before[line_start..]
        .iter()
        .filter(|&&b| (b & 0xC0) != 0x80)
        .count() as u32
        + 1;
    (line, column)
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCANNER
// ═══════════════════════════════════════════════════════════════════════════════

struct SelectorScanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    file: &'a str,
    /// `.mixin();` statements are class references (Less)
    mixin_calls: bool,
    tokens: Vec<ClassToken>,
}

impl<'a> SelectorScanner<'a> {
    fn new(source: &'a str, file: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            file,
            mixin_calls: extension_of(file) == Some("less"),
            tokens: Vec::new(),
        }
    }

    fn error(&self, offset: usize, message: &str) -> StyleError {
        let (line, column) = line_col(self.source, offset);
        StyleError::CssParse {
            file: self.file.to_string(),
            line,
            column,
            message: message.to_string(),
        }
    }

    fn peek(&self, i: usize) -> Option<u8> {
        self.bytes.get(i).copied()
    }

    /// Split the stylesheet into segments ending at `{`, `;` or `}` and
    /// collect class tokens from the ones that are selector preludes.
    fn scan(&mut self) -> Result<()> {
        let len = self.bytes.len();
        let mut open_blocks: Vec<usize> = Vec::new();
        let mut paren_depth = 0usize;
        let mut paren_open = 0usize;
        let mut segment_start = 0usize;
        let mut i = 0usize;

        while i < len {
            let b = self.bytes[i];
            match b {
                b'/' if self.peek(i + 1) == Some(b'*') => {
                    i = self.skip_block_comment(i)?;
                }
                b'/' if self.peek(i + 1) == Some(b'/') && paren_depth == 0 => {
                    i = self.skip_line_comment(i);
                }
                b'"' | b'\'' => {
                    i = self.skip_string(i)?;
                }
                b'\\' => {
                    i += 2;
                }
                b'#' | b'@' if self.peek(i + 1) == Some(b'{') => {
                    i = self.skip_interpolation(i)?;
                }
                b'(' => {
                    if paren_depth == 0 {
                        paren_open = i;
                    }
                    paren_depth += 1;
                    i += 1;
                }
                b')' => {
                    paren_depth = paren_depth.saturating_sub(1);
                    i += 1;
                }
                _ if paren_depth > 0 => {
                    i += 1;
                }
                b'{' => {
                    self.scan_prelude(segment_start, i)?;
                    open_blocks.push(i);
                    segment_start = i + 1;
                    i += 1;
                }
                b'}' => {
                    if open_blocks.pop().is_none() {
                        return Err(self.error(i, "unexpected '}' without a matching '{'"));
                    }
                    self.scan_statement(segment_start, i)?;
                    segment_start = i + 1;
                    i += 1;
                }
                b';' => {
                    self.scan_statement(segment_start, i)?;
                    segment_start = i + 1;
                    i += 1;
                }
                _ => {
                    i += 1;
                }
            }
        }

        if paren_depth > 0 {
            return Err(self.error(paren_open, "unclosed '('"));
        }
        if let Some(&open) = open_blocks.last() {
            return Err(self.error(open, "unclosed '{'"));
        }
        Ok(())
    }

    /// A segment terminated by `{`: a selector list or an at-rule prelude.
    fn scan_prelude(&mut self, start: usize, end: usize) -> Result<()> {
        let body = self.skip_trivia(start, end)?;
        if body >= end {
            return Ok(());
        }
        if self.bytes[body] == b'@' {
            // Only @at-root carries a selector; @media & co. are left alone
            if let Some(rest) = self.strip_at_keyword(body, end, "at-root") {
                self.collect_classes(rest, end)?;
            }
            return Ok(());
        }
        self.collect_classes(body, end)
    }

    /// A segment terminated by `;` or `}`: a declaration or a statement.
    fn scan_statement(&mut self, start: usize, end: usize) -> Result<()> {
        let body = self.skip_trivia(start, end)?;
        if body >= end {
            return Ok(());
        }
        match self.bytes[body] {
            b'@' => {
                if let Some(rest) = self.strip_at_keyword(body, end, "extend") {
                    self.collect_classes(rest, end)?;
                }
            }
            b'.' | b'#' if self.mixin_calls => self.collect_classes(body, end)?,
            _ => {}
        }
        Ok(())
    }

    fn strip_at_keyword(&self, at: usize, end: usize, keyword: &str) -> Option<usize> {
        let name_end = at + 1 + keyword.len();
        if name_end > end || &self.bytes[at + 1..name_end] != keyword.as_bytes() {
            return None;
        }
        match self.peek(name_end) {
            Some(c) if is_ident_byte(c) => None,
            _ => Some(name_end),
        }
    }

    fn collect_classes(&mut self, start: usize, end: usize) -> Result<()> {
        let mut bracket_depth = 0usize;
        let mut j = start;

        while j < end {
            let c = self.bytes[j];
            match c {
                b'/' if self.peek(j + 1) == Some(b'*') => j = self.skip_block_comment(j)?,
                b'/' if self.peek(j + 1) == Some(b'/') => j = self.skip_line_comment(j),
                b'"' | b'\'' => j = self.skip_string(j)?,
                b'\\' => j += 2,
                b'#' | b'@' if self.peek(j + 1) == Some(b'{') => j = self.skip_interpolation(j)?,
                b'[' => {
                    bracket_depth += 1;
                    j += 1;
                }
                b']' => {
                    bracket_depth = bracket_depth.saturating_sub(1);
                    j += 1;
                }
                b'.' if bracket_depth == 0 && self.starts_ident(j + 1) => {
                    let name_end = self.read_ident(j + 1, end);
                    // `.m-#{$i}` / `.m-@{i}` only exist after interpolation
                    if !self.starts_interpolation(name_end) {
                        self.tokens.push(ClassToken {
                            name: self.source[j + 1..name_end].to_string(),
                            start: j,
                            end: name_end,
                        });
                    }
                    j = name_end;
                }
                _ => j += 1,
            }
        }
        Ok(())
    }

    fn starts_ident(&self, i: usize) -> bool {
        match self.peek(i) {
            Some(c) if c.is_ascii_alphabetic() || c == b'_' || c >= 0x80 || c == b'\\' => true,
            Some(b'-') => matches!(
                self.peek(i + 1),
                Some(c) if c.is_ascii_alphabetic() || c == b'_' || c == b'-' || c >= 0x80 || c == b'\\'
            ),
            _ => false,
        }
    }

    fn starts_interpolation(&self, i: usize) -> bool {
        matches!(self.peek(i), Some(b'#') | Some(b'@')) && self.peek(i + 1) == Some(b'{')
    }

    fn read_ident(&self, start: usize, end: usize) -> usize {
        let mut k = start;
        while k < end {
            let c = self.bytes[k];
            if c == b'\\' {
                k = self.read_escape(k, end);
            } else if is_ident_byte(c) {
                k += 1;
            } else {
                break;
            }
        }
        k
    }

    /// End of the escape starting at `start`. A hex escape takes up to six
    /// digits plus one terminating whitespace character.
    fn read_escape(&self, start: usize, end: usize) -> usize {
        let mut k = start + 1;
        let digits_end = (k + 6).min(end);
        while k < digits_end && self.bytes[k].is_ascii_hexdigit() {
            k += 1;
        }
        if k > start + 1 {
            match self.peek(k) {
                Some(b'\r') if self.peek(k + 1) == Some(b'\n') && k + 2 <= end => k += 2,
                Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') if k < end => k += 1,
                _ => {}
            }
            return k;
        }

        k = (k + 1).min(end);
        // Keep multi-byte escaped characters whole
        while k < end && !self.source.is_char_boundary(k) {
            k += 1;
        }
        k
    }

    /// Skip whitespace and comments, returning the first significant offset.
    fn skip_trivia(&self, start: usize, end: usize) -> Result<usize> {
        let mut i = start;
        while i < end {
            match self.bytes[i] {
                c if c.is_ascii_whitespace() => i += 1,
                b'/' if self.peek(i + 1) == Some(b'*') => i = self.skip_block_comment(i)?,
                b'/' if self.peek(i + 1) == Some(b'/') => i = self.skip_line_comment(i),
                _ => break,
            }
        }
        Ok(i)
    }

    fn skip_block_comment(&self, start: usize) -> Result<usize> {
        match self.source[start + 2..].find("*/") {
            Some(rel) => Ok(start + 2 + rel + 2),
            None => Err(self.error(start, "unterminated comment")),
        }
    }

    fn skip_line_comment(&self, start: usize) -> usize {
        match self.source[start..].find('\n') {
            Some(rel) => start + rel + 1,
            None => self.bytes.len(),
        }
    }

    fn skip_string(&self, start: usize) -> Result<usize> {
        let quote = self.bytes[start];
        let mut i = start + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'\n' => return Err(self.error(start, "unterminated string")),
                c if c == quote => return Ok(i + 1),
                _ => i += 1,
            }
        }
        Err(self.error(start, "unterminated string"))
    }

    /// Skip `#{ ... }` (or Less `@{ ... }`), honoring nested braces.
    fn skip_interpolation(&self, start: usize) -> Result<usize> {
        let mut depth = 0usize;
        let mut i = start + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'"' | b'\'' => {
                    i = self.skip_string(i)?;
                    continue;
                }
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(i + 1);
                    }
                }
                _ => {}
            }
            i += 1;
        }
        Err(self.error(start, "unterminated interpolation"))
    }
}

fn is_ident_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_' || c >= 0x80
}

/// Decode CSS escapes (`\:`, `\31 `) into the literal class name.
pub fn unescape_ident(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let mut hex = String::new();
        while hex.len() < 6 {
            match chars.peek() {
                Some(h) if h.is_ascii_hexdigit() => {
                    hex.push(*h);
                    chars.next();
                }
                _ => break,
            }
        }

        if hex.is_empty() {
            if let Some(next) = chars.next() {
                out.push(next);
            }
            continue;
        }

        // A single whitespace terminates a hex escape
        match chars.peek() {
            Some('\r') => {
                chars.next();
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some(' ') | Some('\t') | Some('\n') => {
                chars.next();
            }
            _ => {}
        }
        let decoded = u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .filter(|c| *c != '\0')
            .unwrap_or('\u{FFFD}');
        out.push(decoded);
    }
    out
}
