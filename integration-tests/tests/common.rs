#![allow(dead_code)]

use sawmill_core::entry::Entry;
use sawmill_core::parse::{Parser, ParserOptions};
use std::io::Cursor;

/// One complete record with a continued message, framed by stray lines.
pub const WEB_LOG: &str = "\
# sawmill_format: version=1
[INFO 2024-03-01 10:00:00.00 web .] booting
[INFO 2024-03-01 10:00:01.00 web ^] BEGIN req-1
[INFO 2024-03-01 10:00:01.10 web =] path = /index
[WARN 2024-03-01 10:00:01.20 web .] slow query\\
  select * from users
[INFO 2024-03-01 10:00:01.30 web $] END req-1
garbage line
";

pub const WORKER_LOG: &str = "\
[DEBUG 2024-03-01 10:00:00.50 worker .] polling
[INFO 2024-03-01 10:00:01.15 worker ^] BEGIN job-7
[INFO 2024-03-01 10:00:01.25 worker =] tries + 1
[INFO 2024-03-01 10:00:01.26 worker =] tries + 2
[ERROR 2024-03-01 10:00:02.00 worker job-7 .] failed
";

pub fn parse(text: &str) -> Vec<Entry> {
    Parser::new(Cursor::new(text.to_string()), ParserOptions::default())
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

pub fn messages(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            Entry::Message(m) => Some(m.message().to_string()),
            _ => None,
        })
        .collect()
}
