//! Parser for `.properties` translation files.

use std::collections::BTreeMap;

use super::TranslationError;

/// Parse `.properties` text into key/value pairs. Later keys win.
///
/// Supports `#`/`!` comments, `=`/`:`/whitespace separators, trailing-`\`
/// line continuation, and `\t \n \r \f \uXXXX` escapes.
pub fn parse(text: &str) -> Result<BTreeMap<String, String>, TranslationError> {
    let mut entries = BTreeMap::new();
    let mut lines = text.lines().enumerate();

    while let Some((index, raw)) = lines.next() {
        let line = raw.trim_start_matches(is_blank);
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let mut logical = line.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        let line_number = index + 1;
        entries.insert(unescape(key, line_number)?, unescape(value, line_number)?);
    }

    Ok(entries)
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{c}')
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_blank(c) {
            key_end = i;
            break;
        }
    }

    let key = &line[..key_end];
    let mut value = line[key_end..].trim_start_matches(is_blank);
    if let Some(stripped) = value.strip_prefix(['=', ':']) {
        value = stripped.trim_start_matches(is_blank);
    }
    (key, value)
}

fn unescape(raw: &str, line: usize) -> Result<String, TranslationError> {
    let malformed = |reason: &str| TranslationError::MalformedProperties {
        line,
        reason: reason.to_string(),
    };

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let high = read_code_unit(&mut chars).ok_or_else(|| malformed("bad \\uXXXX"))?;
                let code = if (0xD800..0xDC00).contains(&high) {
                    let low = match (chars.next(), chars.next()) {
                        (Some('\\'), Some('u')) => read_code_unit(&mut chars),
                        _ => None,
                    }
                    .filter(|low| (0xDC00..0xE000).contains(low))
                    .ok_or_else(|| malformed("unpaired surrogate"))?;
                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    high
                };
                out.push(char::from_u32(code).ok_or_else(|| malformed("bad \\uXXXX"))?);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

fn read_code_unit(chars: &mut std::str::Chars<'_>) -> Option<u32> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 {
        return None;
    }
    u32::from_str_radix(&hex, 16).ok()
}
