//! Reader for bracketed list literals such as `['walt', "w"]` or `[1, 2.5, None]`.
//!
//! Accepts the flat subset of Python literal syntax that record exports use:
//! single- or double-quoted strings, integers, floats, `True`, `False` and
//! `None`, separated by commas with an optional trailing comma. Nested
//! containers are rejected. Every element is returned in its string form.

use std::iter::Peekable;
use std::str::CharIndices;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed list literal at byte {position}: {reason}")]
pub struct MalformedListLiteral {
    pub position: usize,
    pub reason: String,
}

impl MalformedListLiteral {
    fn at(position: usize, reason: impl Into<String>) -> Self {
        Self {
            position,
            reason: reason.into(),
        }
    }
}

pub fn parse_list_literal(text: &str) -> Result<Vec<String>, MalformedListLiteral> {
    let mut reader = LiteralReader {
        text,
        chars: text.char_indices().peekable(),
    };

    reader.skip_ws();
    reader.expect('[')?;

    let mut items = Vec::new();
    loop {
        reader.skip_ws();
        match reader.peek() {
            Some((_, ']')) => {
                reader.next();
                break;
            }
            Some(_) => {
                items.push(reader.element()?);
                reader.skip_ws();
                match reader.next() {
                    Some((_, ',')) => continue,
                    Some((_, ']')) => break,
                    Some((pos, c)) => {
                        return Err(MalformedListLiteral::at(
                            pos,
                            format!("expected ',' or ']' but found '{}'", c),
                        ))
                    }
                    None => return Err(MalformedListLiteral::at(text.len(), "unclosed list")),
                }
            }
            None => return Err(MalformedListLiteral::at(text.len(), "unclosed list")),
        }
    }

    reader.skip_ws();
    if let Some((pos, _)) = reader.peek() {
        return Err(MalformedListLiteral::at(pos, "trailing characters after list"));
    }

    Ok(items)
}

struct LiteralReader<'a> {
    text: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> LiteralReader<'a> {
    fn peek(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    fn next(&mut self) -> Option<(usize, char)> {
        self.chars.next()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some((_, c)) if c.is_whitespace()) {
            self.next();
        }
    }

    fn expect(&mut self, want: char) -> Result<(), MalformedListLiteral> {
        match self.next() {
            Some((_, c)) if c == want => Ok(()),
            Some((pos, c)) => Err(MalformedListLiteral::at(
                pos,
                format!("expected '{}' but found '{}'", want, c),
            )),
            None => Err(MalformedListLiteral::at(
                self.text.len(),
                format!("expected '{}'", want),
            )),
        }
    }

    fn element(&mut self) -> Result<String, MalformedListLiteral> {
        match self.peek() {
            Some((_, '\'')) | Some((_, '"')) => self.quoted(),
            Some((pos, '[')) | Some((pos, '(')) | Some((pos, '{')) => Err(
                MalformedListLiteral::at(pos, "nested containers are not supported"),
            ),
            Some(_) => self.bare(),
            None => Err(MalformedListLiteral::at(self.text.len(), "missing element")),
        }
    }

    fn quoted(&mut self) -> Result<String, MalformedListLiteral> {
        let (start, quote) = self
            .next()
            .ok_or_else(|| MalformedListLiteral::at(self.text.len(), "missing element"))?;
        let mut out = String::new();

        while let Some((_, c)) = self.next() {
            match c {
                '\\' => match self.next() {
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, 'r')) => out.push('\r'),
                    Some((_, '\\')) => out.push('\\'),
                    Some((_, '\'')) => out.push('\''),
                    Some((_, '"')) => out.push('"'),
                    // Unknown escapes are kept verbatim.
                    Some((_, other)) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => break,
                },
                c if c == quote => return Ok(out),
                c => out.push(c),
            }
        }

        Err(MalformedListLiteral::at(start, "unterminated string"))
    }

    fn bare(&mut self) -> Result<String, MalformedListLiteral> {
        let (start, _) = self
            .peek()
            .ok_or_else(|| MalformedListLiteral::at(self.text.len(), "missing element"))?;
        let mut end = start;
        while let Some((pos, c)) = self.peek() {
            if c == ',' || c == ']' || c.is_whitespace() {
                break;
            }
            end = pos + c.len_utf8();
            self.next();
        }

        let token = &self.text[start..end];
        match token {
            "True" | "False" | "None" => Ok(token.to_string()),
            _ => number_token(token)
                .ok_or_else(|| MalformedListLiteral::at(start, format!("unknown token '{}'", token))),
        }
    }
}

fn number_token(token: &str) -> Option<String> {
    if let Ok(i) = token.parse::<i64>() {
        return Some(i.to_string());
    }
    // Reject the non-literal spellings Rust's float parser accepts.
    if !token
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    token.parse::<f64>().ok().map(float_text)
}

/// Shortest round-trip text for a float in the notation Python prints:
/// positional between `1e-4` and `1e16` (always with a fractional part),
/// otherwise scientific with a signed two-digit exponent (`1e+16`, `1.5e-07`).
pub fn float_text(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sci = format!("{:e}", f);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if !(-4..16).contains(&exponent) {
        let (head, tail) = digits.split_at(1);
        let fraction = if tail.is_empty() { String::new() } else { format!(".{}", tail) };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}{}{}e{}{:02}", sign, head, fraction, exp_sign, exponent.abs());
    }

    if exponent < 0 {
        let zeros = "0".repeat((-exponent - 1) as usize);
        return format!("{}0.{}{}", sign, zeros, digits);
    }

    let int_len = exponent as usize + 1;
    if digits.len() <= int_len {
        format!("{}{}{}.0", sign, digits, "0".repeat(int_len - digits.len()))
    } else {
        let (int_part, frac_part) = digits.split_at(int_len);
        format!("{}{}.{}", sign, int_part, frac_part)
    }
}
