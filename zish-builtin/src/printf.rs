// This file is part of zish, a POSIX-compatible shell.
// Copyright (C) 2026 zish developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Printf built-in
//!
//! # Syntax
//!
//! ```sh
//! printf format [argument…]
//! ```
//!
//! Formats the arguments per the format operand. Supported conversions
//! are `%s %c %d %i %u %o %x %X %b %%` with the flags `- + # 0` and
//! space, and width and precision (either literal or `*`). The format
//! string processes the escapes `\\ \a \b \f \n \r \t \v \xHH \0NNN`.
//! The `%b` conversion additionally processes escapes in its argument,
//! where `\c` discards all further output. The format is reused until
//! the arguments are exhausted.

use crate::common::{output, report_error};
use zish_env::builtin::Result;
use zish_env::semantics::{ExitStatus, Field};
use zish_env::Env;

/// Printf evaluation error
#[derive(Debug)]
enum Error {
    /// Malformed conversion specification
    BadConversion(String),
    /// Operand that cannot be parsed as a number
    BadNumber(String),
}

/// Conversion specification
struct Conversion {
    minus: bool,
    plus: bool,
    space: bool,
    hash: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

/// Parses an escape sequence after a backslash, pushing the result.
///
/// Returns false if a `\c` sequence asked to discard further output.
fn push_escape(
    chars: &mut std::iter::Peekable<std::str::Chars>,
    out: &mut String,
    in_b_argument: bool,
) -> bool {
    match chars.next() {
        None => out.push('\\'),
        Some('\\') => out.push('\\'),
        Some('a') => out.push('\x07'),
        Some('b') => out.push('\x08'),
        Some('f') => out.push('\x0C'),
        Some('n') => out.push('\n'),
        Some('r') => out.push('\r'),
        Some('t') => out.push('\t'),
        Some('v') => out.push('\x0B'),
        Some('c') if in_b_argument => return false,
        Some('x') => {
            let mut value = 0_u32;
            let mut digits = 0;
            while digits < 2 {
                match chars.peek().and_then(|c| c.to_digit(16)) {
                    Some(digit) => {
                        value = value * 16 + digit;
                        chars.next();
                        digits += 1;
                    }
                    None => break,
                }
            }
            if digits == 0 {
                out.push_str("\\x");
            } else {
                out.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
            }
        }
        Some('0') => {
            let mut value = 0_u32;
            let mut digits = 0;
            while digits < 3 {
                match chars.peek().and_then(|c| c.to_digit(8)) {
                    Some(digit) => {
                        value = value * 8 + digit;
                        chars.next();
                        digits += 1;
                    }
                    None => break,
                }
            }
            out.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
        }
        Some(other) => {
            out.push('\\');
            out.push(other);
        }
    }
    true
}

/// Processes escapes in a `%b` argument.
fn expand_b_escapes(value: &str, out: &mut String) -> bool {
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if !push_escape(&mut chars, out, true) {
                return false;
            }
        } else {
            out.push(c);
        }
    }
    true
}

/// Parses a numeric operand: decimal, octal, or hexadecimal, or a
/// quoted character (`'A`).
fn parse_number(value: &str) -> std::result::Result<i64, Error> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    if let Some(rest) = value.strip_prefix('\'').or_else(|| value.strip_prefix('"')) {
        return Ok(rest.chars().next().map_or(0, |c| c as i64));
    }
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let magnitude = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16)
    } else if digits != "0" && digits.starts_with('0') {
        i64::from_str_radix(digits, 8)
    } else {
        digits.parse()
    };
    match magnitude {
        Ok(n) => Ok(if negative { -n } else { n }),
        Err(_) => Err(Error::BadNumber(value.to_string())),
    }
}

/// Applies width and alignment to a formatted value.
fn pad(value: String, spec: &Conversion, zero_ok: bool) -> String {
    let Some(width) = spec.width else {
        return value;
    };
    let length = value.chars().count();
    if length >= width {
        return value;
    }
    let padding = width - length;
    if spec.minus {
        let mut result = value;
        result.extend(std::iter::repeat_n(' ', padding));
        result
    } else if spec.zero && zero_ok && spec.precision.is_none() {
        // Zero padding goes after any sign or base prefix.
        let sign_len = value
            .find(|c: char| c.is_ascii_digit() || c.is_ascii_hexdigit())
            .unwrap_or(0);
        let (prefix, digits) = value.split_at(sign_len);
        let mut result = String::from(prefix);
        result.extend(std::iter::repeat_n('0', padding));
        result.push_str(digits);
        result
    } else {
        let mut result: String = std::iter::repeat_n(' ', padding).collect();
        result.push_str(&value);
        result
    }
}

/// Formats an integer per the conversion.
fn format_integer(spec: &Conversion, value: i64) -> String {
    let (mut digits, negative) = match spec.conversion {
        'd' | 'i' => (value.unsigned_abs().to_string(), value < 0),
        'u' => ((value as u64).to_string(), false),
        'o' => (format!("{:o}", value as u64), false),
        'x' => (format!("{:x}", value as u64), false),
        'X' => (format!("{:X}", value as u64), false),
        _ => unreachable!(),
    };
    if let Some(precision) = spec.precision {
        while digits.len() < precision {
            digits.insert(0, '0');
        }
    }
    let mut result = String::new();
    if negative {
        result.push('-');
    } else if matches!(spec.conversion, 'd' | 'i') {
        if spec.plus {
            result.push('+');
        } else if spec.space {
            result.push(' ');
        }
    }
    if spec.hash {
        match spec.conversion {
            'o' if !digits.starts_with('0') => result.push('0'),
            'x' if value != 0 => result.push_str("0x"),
            'X' if value != 0 => result.push_str("0X"),
            _ => {}
        }
    }
    result.push_str(&digits);
    pad(result, spec, true)
}

/// Takes the next argument, or an empty one when exhausted.
fn next_argument<'a>(
    arguments: &mut std::slice::Iter<'a, Field>,
    consumed: &mut bool,
) -> &'a str {
    match arguments.next() {
        Some(field) => {
            *consumed = true;
            &field.value
        }
        None => "",
    }
}

/// Formats the whole format string once.
///
/// Returns whether output should continue (false after `\c`) and
/// whether any argument was consumed.
fn format_once(
    format: &str,
    arguments: &mut std::slice::Iter<'_, Field>,
    out: &mut String,
) -> std::result::Result<(bool, bool), Error> {
    let mut consumed = false;
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if !push_escape(&mut chars, out, false) {
                    return Ok((false, consumed));
                }
            }
            '%' => {
                if chars.peek() == Some(&'%') {
                    chars.next();
                    out.push('%');
                    continue;
                }
                let mut spec = Conversion {
                    minus: false,
                    plus: false,
                    space: false,
                    hash: false,
                    zero: false,
                    width: None,
                    precision: None,
                    conversion: 's',
                };
                loop {
                    match chars.peek() {
                        Some('-') => spec.minus = true,
                        Some('+') => spec.plus = true,
                        Some(' ') => spec.space = true,
                        Some('#') => spec.hash = true,
                        Some('0') => spec.zero = true,
                        _ => break,
                    }
                    chars.next();
                }
                if chars.peek() == Some(&'*') {
                    chars.next();
                    let n = parse_number(next_argument(arguments, &mut consumed))?;
                    if n < 0 {
                        spec.minus = true;
                        spec.width = Some((-n) as usize);
                    } else {
                        spec.width = Some(n as usize);
                    }
                } else {
                    let mut width = String::new();
                    while chars.peek().is_some_and(char::is_ascii_digit) {
                        width.push(chars.next().unwrap());
                    }
                    if !width.is_empty() {
                        spec.width = width.parse().ok();
                    }
                }
                if chars.peek() == Some(&'.') {
                    chars.next();
                    if chars.peek() == Some(&'*') {
                        chars.next();
                        let n = parse_number(next_argument(arguments, &mut consumed))?;
                        spec.precision = Some(n.max(0) as usize);
                    } else {
                        let mut precision = String::new();
                        while chars.peek().is_some_and(char::is_ascii_digit) {
                            precision.push(chars.next().unwrap());
                        }
                        spec.precision = Some(precision.parse().unwrap_or(0));
                    }
                }
                let Some(conversion) = chars.next() else {
                    return Err(Error::BadConversion("%".to_string()));
                };
                spec.conversion = conversion;
                match conversion {
                    's' => {
                        let mut value = next_argument(arguments, &mut consumed).to_string();
                        if let Some(precision) = spec.precision {
                            value = value.chars().take(precision).collect();
                        }
                        out.push_str(&pad(value, &spec, false));
                    }
                    'c' => {
                        let value: String = next_argument(arguments, &mut consumed)
                            .chars()
                            .take(1)
                            .collect();
                        out.push_str(&pad(value, &spec, false));
                    }
                    'b' => {
                        let mut value = String::new();
                        let argument = next_argument(arguments, &mut consumed);
                        let go_on = expand_b_escapes(argument, &mut value);
                        out.push_str(&pad(value, &spec, false));
                        if !go_on {
                            return Ok((false, consumed));
                        }
                    }
                    'd' | 'i' | 'u' | 'o' | 'x' | 'X' => {
                        let value = parse_number(next_argument(arguments, &mut consumed))?;
                        out.push_str(&format_integer(&spec, value));
                    }
                    other => {
                        return Err(Error::BadConversion(format!("%{other}")));
                    }
                }
            }
            c => out.push(c),
        }
    }
    Ok((true, consumed))
}

/// Entry point for executing the `printf` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let Some((format, arguments)) = args.split_first() else {
        return report_error(env, "printf", "missing format operand");
    };

    let mut out = String::new();
    let mut arguments = arguments.iter();
    loop {
        match format_once(&format.value, &mut arguments, &mut out) {
            Ok((true, consumed)) => {
                // POSIX reuses the format until the arguments run out.
                if arguments.len() == 0 || !consumed {
                    break;
                }
            }
            Ok((false, _)) => break,
            Err(Error::BadConversion(what)) => {
                let message = format!("invalid conversion `{what}`");
                return report_error(env, "printf", &message);
            }
            Err(Error::BadNumber(what)) => {
                let message = format!("`{what}` is not a valid number");
                return report_error(env, "printf", &message);
            }
        }
    }
    output(env, &out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> String {
        let mut out = String::new();
        let fields = Field::dummies(args.iter().copied());
        let (format, arguments) = fields.split_first().unwrap();
        let mut arguments = arguments.iter();
        loop {
            let (go_on, consumed) =
                format_once(&format.value, &mut arguments, &mut out).unwrap();
            if !go_on || arguments.len() == 0 || !consumed {
                break;
            }
        }
        out
    }

    #[test]
    fn plain_string() {
        assert_eq!(run(&["%s\n", "hello"]), "hello\n");
    }

    #[test]
    fn string_preserves_bytes() {
        assert_eq!(run(&["%s\n", "a\\b"]), "a\\b\n");
    }

    #[test]
    fn format_reuse() {
        assert_eq!(run(&["<%s>", "a", "b"]), "<a><b>");
    }

    #[test]
    fn missing_arguments_become_empty() {
        assert_eq!(run(&["[%s][%s]", "a"]), "[a][]");
    }

    #[test]
    fn integer_conversions() {
        assert_eq!(run(&["%d", "42"]), "42");
        assert_eq!(run(&["%d", "-42"]), "-42");
        assert_eq!(run(&["%o", "8"]), "10");
        assert_eq!(run(&["%x", "255"]), "ff");
        assert_eq!(run(&["%X", "255"]), "FF");
        assert_eq!(run(&["%u", "7"]), "7");
    }

    #[test]
    fn number_bases_in_operands() {
        assert_eq!(run(&["%d", "0x10"]), "16");
        assert_eq!(run(&["%d", "010"]), "8");
    }

    #[test]
    fn quoted_character_operand() {
        assert_eq!(run(&["%d", "'A"]), "65");
    }

    #[test]
    fn flags_and_width() {
        assert_eq!(run(&["%5d", "42"]), "   42");
        assert_eq!(run(&["%-5d|", "42"]), "42   |");
        assert_eq!(run(&["%05d", "42"]), "00042");
        assert_eq!(run(&["%+d", "42"]), "+42");
        assert_eq!(run(&["% d", "42"]), " 42");
        assert_eq!(run(&["%#x", "255"]), "0xff");
        assert_eq!(run(&["%#o", "8"]), "010");
    }

    #[test]
    fn width_from_argument() {
        assert_eq!(run(&["%*d", "5", "42"]), "   42");
    }

    #[test]
    fn precision() {
        assert_eq!(run(&["%.3d", "5"]), "005");
        assert_eq!(run(&["%.2s", "hello"]), "he");
    }

    #[test]
    fn character_conversion() {
        assert_eq!(run(&["%c", "abc"]), "a");
    }

    #[test]
    fn escapes_in_format() {
        assert_eq!(run(&["a\\tb\\n"]), "a\tb\n");
        assert_eq!(run(&["\\x41\\0101"]), "AA");
        assert_eq!(run(&["a\\\\b"]), "a\\b");
    }

    #[test]
    fn percent_literal() {
        assert_eq!(run(&["100%%"]), "100%");
    }

    #[test]
    fn b_conversion_processes_escapes() {
        assert_eq!(run(&["%b", "a\\tb"]), "a\tb");
    }

    #[test]
    fn b_conversion_stops_at_c() {
        assert_eq!(run(&["%b after", "x\\cy"]), "x");
    }
}
