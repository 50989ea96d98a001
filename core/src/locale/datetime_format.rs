//! .NET style date and time format patterns.
//!
//! Hosts and expressions spell formats the way .NET does (`yyyy-MM-dd`,
//! `dddd, dd MMMM yyyy`, `D`). Patterns are rendered against a chrono
//! [`DateTime`] with invariant culture names.
//!
//! Supported custom specifiers: `d`..`dddd`, `M`..`MMMM`, `y`..`yyyyy`,
//! `h`/`hh`, `H`/`HH`, `m`/`mm`, `s`/`ss`, `f`..`fffffff`, `F`..`FFFFFFF`,
//! `t`/`tt`, `z`/`zz`/`zzz`, `K`, `g`, `:` and `/`, quoted literals and `\`
//! escapes. A single-character pattern is a standard format.

use super::LocaleError;
use chrono::{DateTime, Datelike, Offset, TimeZone, Timelike};

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const DAYS: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

/// Expand a standard (single character) format to its custom pattern.
fn standard_pattern(c: char) -> Option<&'static str> {
    Some(match c {
        'd' => "MM/dd/yyyy",
        'D' => "dddd, dd MMMM yyyy",
        'f' => "dddd, dd MMMM yyyy HH:mm",
        'F' => "dddd, dd MMMM yyyy HH:mm:ss",
        'g' => "MM/dd/yyyy HH:mm",
        'G' => "MM/dd/yyyy HH:mm:ss",
        'm' | 'M' => "MMMM dd",
        'o' | 'O' => "yyyy-MM-ddTHH:mm:ss.fffffffK",
        'r' | 'R' => "ddd, dd MMM yyyy HH':'mm':'ss 'GMT'",
        's' => "yyyy-MM-ddTHH:mm:ss",
        't' => "HH:mm",
        'T' => "HH:mm:ss",
        'u' => "yyyy-MM-dd HH:mm:ss'Z'",
        'y' | 'Y' => "yyyy MMMM",
        _ => return None,
    })
}

/// Render `dt` with a .NET format pattern.
pub fn format_datetime<Tz: TimeZone>(
    dt: &DateTime<Tz>,
    format: &str,
) -> Result<String, LocaleError> {
    let mut chars = format.chars();
    let pattern = match (chars.next(), chars.next()) {
        (Some(c), None) => {
            standard_pattern(c).ok_or_else(|| LocaleError::InvalidFormat(format.to_string()))?
        }
        _ => format,
    };
    render(dt, pattern).ok_or_else(|| LocaleError::InvalidFormat(format.to_string()))
}

fn render<Tz: TimeZone>(dt: &DateTime<Tz>, pattern: &str) -> Option<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let offset_seconds = dt.offset().fix().local_minus_utc();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }

        match c {
            'd' => match run {
                1 => out.push_str(&dt.day().to_string()),
                2 => out.push_str(&format!("{:02}", dt.day())),
                3 => out.push_str(&DAYS[dt.weekday().num_days_from_monday() as usize][..3]),
                _ => out.push_str(DAYS[dt.weekday().num_days_from_monday() as usize]),
            },
            'M' => match run {
                1 => out.push_str(&dt.month().to_string()),
                2 => out.push_str(&format!("{:02}", dt.month())),
                3 => out.push_str(&MONTHS[dt.month0() as usize][..3]),
                _ => out.push_str(MONTHS[dt.month0() as usize]),
            },
            'y' => match run {
                1 => out.push_str(&(dt.year() % 100).to_string()),
                2 => out.push_str(&format!("{:02}", dt.year() % 100)),
                n => out.push_str(&format!("{:0width$}", dt.year(), width = n)),
            },
            'h' => {
                let hour = match dt.hour() % 12 {
                    0 => 12,
                    h => h,
                };
                push_padded(&mut out, hour, run);
            }
            'H' => push_padded(&mut out, dt.hour(), run),
            'm' => push_padded(&mut out, dt.minute(), run),
            's' => push_padded(&mut out, dt.second(), run),
            'f' | 'F' => {
                if run > 7 {
                    return None;
                }
                let ticks = format!("{:07}", dt.nanosecond().min(999_999_999) / 100);
                let digits = &ticks[..run];
                if c == 'F' {
                    out.push_str(digits.trim_end_matches('0'));
                } else {
                    out.push_str(digits);
                }
            }
            't' => {
                let meridiem = if dt.hour() < 12 { "AM" } else { "PM" };
                out.push_str(if run == 1 { &meridiem[..1] } else { meridiem });
            }
            'z' => {
                let sign = if offset_seconds < 0 { '-' } else { '+' };
                let abs = offset_seconds.unsigned_abs();
                let (hours, minutes) = (abs / 3600, (abs % 3600) / 60);
                match run {
                    1 => out.push_str(&format!("{}{}", sign, hours)),
                    2 => out.push_str(&format!("{}{:02}", sign, hours)),
                    _ => out.push_str(&format!("{}{:02}:{:02}", sign, hours, minutes)),
                }
            }
            'K' => {
                for _ in 0..run {
                    if offset_seconds == 0 {
                        out.push('Z');
                    } else {
                        let sign = if offset_seconds < 0 { '-' } else { '+' };
                        let abs = offset_seconds.unsigned_abs();
                        let (hours, minutes) = (abs / 3600, (abs % 3600) / 60);
                        out.push_str(&format!("{}{:02}:{:02}", sign, hours, minutes));
                    }
                }
            }
            'g' => out.push_str(if dt.year() > 0 { "A.D." } else { "B.C." }),
            '\'' | '"' => {
                let close = chars[i + 1..].iter().position(|&ch| ch == c)?;
                out.extend(&chars[i + 1..i + 1 + close]);
                i += close + 2;
                continue;
            }
            '\\' => {
                out.push(*chars.get(i + 1)?);
                i += 2;
                continue;
            }
            '%' => {
                i += 1;
                continue;
            }
            other => {
                for _ in 0..run {
                    out.push(other);
                }
            }
        }
        i += run;
    }
    Some(out)
}

fn push_padded(out: &mut String, value: u32, run: usize) {
    if run >= 2 {
        out.push_str(&format!("{:02}", value));
    } else {
        out.push_str(&value.to_string());
    }
}
