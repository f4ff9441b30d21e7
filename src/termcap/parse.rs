//! Termcap source parsing
//!
//! Turns capability source text into [`Record`]s. Parsing is lenient: bad
//! fields are skipped with a warning and never fail the whole file.

use tracing::warn;

/// Value of one capability field as written in its record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// `name`
    Flag,
    /// `name#number`
    Number(i64),
    /// `name=string`, escapes already decoded
    Str(Vec<u8>),
    /// `name@`: absent, even when a parent defines it
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

/// One terminal-type description before inheritance is applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    pub aliases: Vec<String>,
    pub fields: Vec<Field>,
    /// `tc=` / `use=` targets in source order
    pub parents: Vec<String>,
}

impl Record {
    /// Primary name
    pub fn name(&self) -> &str {
        self.aliases.first().map(String::as_str).unwrap_or("")
    }
}

/// Parse a whole capability file.
pub fn parse_records(text: &str) -> Vec<Record> {
    logical_records(text)
        .iter()
        .filter_map(|raw| parse_record(raw))
        .collect()
}

/// Join physical lines into logical records: drop comments and blank lines,
/// follow trailing-backslash continuations and indented continuation lines.
fn logical_records(text: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut current = String::new();
    let mut continued = false;

    for line in text.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);

        let indented = line.starts_with([' ', '\t']);
        let body = if continued || indented {
            line.trim_start()
        } else {
            line
        };

        if !continued {
            if body.is_empty() || body.starts_with('#') {
                if !indented {
                    flush(&mut records, &mut current);
                }
                continue;
            }
            if !indented {
                flush(&mut records, &mut current);
            }
        }

        continued = ends_with_continuation(body);
        let body = if continued {
            &body[..body.len() - 1]
        } else {
            body
        };
        current.push_str(body);
    }
    flush(&mut records, &mut current);
    records
}

fn flush(records: &mut Vec<String>, current: &mut String) {
    if !current.trim().is_empty() {
        records.push(std::mem::take(current));
    }
    current.clear();
}

/// An odd number of trailing backslashes continues the record.
fn ends_with_continuation(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

/// Split on unescaped `:`. Escapes are kept in the pieces for later
/// decoding.
fn split_fields(record: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (i, c) in record.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            ':' => {
                pieces.push(&record[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&record[start..]);
    pieces
}

fn parse_record(raw: &str) -> Option<Record> {
    let mut pieces = split_fields(raw).into_iter();
    let aliases: Vec<String> = pieces
        .next()?
        .split('|')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(String::from)
        .collect();
    if aliases.is_empty() {
        warn!("skipping capability record without a name");
        return None;
    }

    let mut record = Record {
        aliases,
        ..Record::default()
    };

    for piece in pieces {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        parse_field(piece, &mut record);
    }
    Some(record)
}

fn parse_field(piece: &str, record: &mut Record) {
    let Some(pos) = piece.find(['#', '=', '@']) else {
        record.fields.push(Field {
            name: piece.to_string(),
            value: FieldValue::Flag,
        });
        return;
    };

    let (name, rest) = piece.split_at(pos);
    let value = &rest[1..];

    let value = match rest.as_bytes()[0] {
        b'=' if name == "tc" || name == "use" => {
            record.parents.push(value.to_string());
            return;
        }
        b'=' => FieldValue::Str(unescape(value)),
        b'#' => match parse_number(value) {
            Some(n) => FieldValue::Number(n),
            None => {
                warn!(
                    "{}: skipping malformed numeric capability {}#{}",
                    record.name(),
                    name,
                    value
                );
                return;
            }
        },
        _ => FieldValue::Cancelled,
    };

    record.fields.push(Field {
        name: name.to_string(),
        value,
    });
}

/// Decimal, `0x` hex, or leading-zero octal.
pub fn parse_number(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()
    } else if text.len() > 1 && text.starts_with('0') {
        i64::from_str_radix(&text[1..], 8).ok()
    } else if text.starts_with(|c: char| c.is_ascii_digit()) {
        text.parse().ok()
    } else {
        None
    }
}

/// Decode a string capability value into raw bytes.
pub fn unescape(value: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    let mut utf8 = [0u8; 4];

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('E' | 'e') => out.push(0x1b),
                Some('n') => out.push(b'\n'),
                Some('r') => out.push(b'\r'),
                Some('t') => out.push(b'\t'),
                Some('b') => out.push(0x08),
                Some('f') => out.push(0x0c),
                Some('s') => out.push(b' '),
                Some(d @ '0'..='7') => {
                    let mut value = d as u32 - '0' as u32;
                    for _ in 0..2 {
                        match chars.peek().and_then(|c| c.to_digit(8)) {
                            Some(digit) => {
                                value = value * 8 + digit;
                                chars.next();
                            }
                            None => break,
                        }
                    }
                    out.push(value as u8);
                }
                Some('x') => {
                    let mut value = None;
                    for _ in 0..2 {
                        match chars.peek().and_then(|c| c.to_digit(16)) {
                            Some(digit) => {
                                value = Some(value.unwrap_or(0) * 16 + digit);
                                chars.next();
                            }
                            None => break,
                        }
                    }
                    match value {
                        Some(v) => out.push(v as u8),
                        None => out.push(b'x'),
                    }
                }
                // \^ \\ \: \, and anything unknown stand for themselves
                Some(other) => out.extend_from_slice(other.encode_utf8(&mut utf8).as_bytes()),
                None => out.push(b'\\'),
            },
            '^' => match chars.next() {
                Some('?') => out.push(0x7f),
                Some(ctl) if ctl.is_ascii() => out.push(ctl as u8 & 0x1f),
                Some(other) => {
                    out.push(b'^');
                    out.extend_from_slice(other.encode_utf8(&mut utf8).as_bytes());
                }
                None => out.push(b'^'),
            },
            other => out.extend_from_slice(other.encode_utf8(&mut utf8).as_bytes()),
        }
    }
    out
}
