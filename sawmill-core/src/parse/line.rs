use crate::entry::Timestamp;
use crate::level::{Level, LevelGroup};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^\[\s*(\S+)\s+",
        r"(\d{4})-(\d{2})-(\d{2})(?:T|\s)(\d{2}):(\d{2}):(\d{2})(?:.(\d{1,6}))?",
        r"Z?\s?([+-]\d{4})?\s+",
        r"(\S+)(?:\s+(\S+))?\s+([\^$.=])\]\s(.*)$",
    ))
    .expect("line pattern compiles")
});

static DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#\s+sawmill_format:\s+(\w+)=(.*)$").expect("directive pattern compiles")
});

static ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\S+)\s([=+])\s").expect("attribute pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Marker {
    Begin,
    End,
    Message,
    Attribute,
}

/// The bracketed part of a log line, plus the first physical line of its payload.
#[derive(Debug)]
pub(crate) struct Header<'a> {
    pub level: Level,
    pub timestamp: Timestamp,
    pub progname: &'a str,
    pub record_id: Option<&'a str>,
    pub marker: Marker,
    pub payload: &'a str,
}

/// Matches a physical line (without its newline) against the header grammar.
///
/// Returns `None` for anything that should surface as unknown data: no match,
/// a level name outside `levels`, or an impossible date or time.
pub(crate) fn parse_header<'a>(line: &'a str, levels: &LevelGroup) -> Option<Header<'a>> {
    let caps = LINE.captures(line)?;
    let level = levels.get(&caps[1])?;

    let num = |i: usize| caps[i].parse::<u32>().ok();
    let date = NaiveDate::from_ymd_opt(caps[2].parse().ok()?, num(3)?, num(4)?)?;
    let micros = caps
        .get(8)
        .map(|m| format!("{:0<6}", m.as_str()).parse::<u32>())
        .transpose()
        .ok()?
        .unwrap_or(0);
    let naive = date.and_hms_micro_opt(num(5)?, num(6)?, num(7)?, micros)?;

    let mut timestamp = Utc.from_utc_datetime(&naive);
    if let Some(offset) = caps.get(9) {
        timestamp -= parse_offset(offset.as_str())?;
    }

    let marker = match &caps[12] {
        "^" => Marker::Begin,
        "$" => Marker::End,
        "=" => Marker::Attribute,
        _ => Marker::Message,
    };

    Some(Header {
        level,
        timestamp,
        progname: caps.get(10)?.as_str(),
        record_id: caps.get(11).map(|m| m.as_str()),
        marker,
        payload: caps.get(13)?.as_str(),
    })
}

/// `+HHMM` / `-HHMM` as a signed duration east of UTC.
fn parse_offset(raw: &str) -> Option<Duration> {
    let (sign, digits) = raw.split_at(1);
    let hours: i64 = digits.get(0..2)?.parse().ok()?;
    let minutes: i64 = digits.get(2..4)?.parse().ok()?;
    let secs = hours * 3600 + minutes * 60;
    Some(Duration::seconds(if sign == "-" { -secs } else { secs }))
}

pub(crate) fn parse_directive(line: &str) -> Option<(String, String)> {
    let caps = DIRECTIVE.captures(line)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

/// Splits an attribute payload `KEY OP VALUE`.
pub(crate) fn parse_attribute(payload: &str) -> Option<(&str, char, &str)> {
    let caps = ATTRIBUTE.captures(payload)?;
    let whole = caps.get(0)?;
    let op = caps[2].chars().next()?;
    Some((caps.get(1)?.as_str(), op, &payload[whole.end()..]))
}

/// Strips `prefix` plus one following whitespace character, returning the rest.
pub(crate) fn strip_keyword<'a>(payload: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = payload.strip_prefix(keyword)?;
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => Some(chars.as_str()),
        _ => None,
    }
}

/// Splits off the run of trailing backslashes, returning `(body, run_length)`.
pub(crate) fn split_trailing_backslashes(line: &str) -> (&str, usize) {
    let body = line.trim_end_matches('\\');
    (body, line.len() - body.len())
}

/// Removes a single trailing `\n`; a preceding `\r` belongs to the payload.
pub(crate) fn strip_newline(line: &str) -> &str {
    line.strip_suffix('\n').unwrap_or(line)
}

/// Removes one trailing line terminator (`\n`, `\r\n` or `\r`).
pub(crate) fn chomp(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .or_else(|| line.strip_suffix('\r'))
        .unwrap_or(line)
}
