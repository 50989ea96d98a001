//! Date and Time Package
//!
//! Timestamps travel as strings. Builtins that compute on a timestamp
//! (`addDays`, `dayOfWeek`, `ticks`, ...) require the canonical ISO form
//! `yyyy-MM-ddTHH:mm:ss.fffZ`; formatting and time zone conversion also accept
//! looser spellings such as `2018-03-15` or `01/01/2018 00:00:00`.
//!
//! Results that are timestamps render with the default format unless the
//! caller passes a .NET style format string (see [`crate::locale::format_datetime`]).
//!
//! Ticks are 100 nanosecond intervals since 0001-01-01T00:00:00Z.

use super::resolve_culture;
use crate::api::Options;
use crate::casting;
use crate::evaluator::combinators::{apply_with_error, apply_with_options_and_error};
use crate::evaluator::validators::*;
use crate::evaluator::verifiers::*;
use crate::evaluator::{EvalError, EvalResult, Evaluator, RegistryBuilder};
use crate::expression::{Expression, ReturnType, expression_type as ty};
use crate::locale::{format_datetime, resolve_timezone};
use crate::values::Value;
use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone, Timelike, Utc,
};

/// Format of every timestamp produced without an explicit format.
pub const DEFAULT_FORMAT: &str = "yyyy-MM-ddTHH:mm:ss.fffZ";

/// Ticks at the unix epoch.
pub const EPOCH_TICKS: i64 = 621_355_968_000_000_000;

const TICKS_PER_SECOND: i64 = 10_000_000;
const TICKS_PER_MINUTE: i64 = TICKS_PER_SECOND * 60;
const TICKS_PER_HOUR: i64 = TICKS_PER_MINUTE * 60;
const TICKS_PER_DAY: i64 = TICKS_PER_HOUR * 24;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

// ============================================================================
// Parsing
// ============================================================================

/// A leniently parsed timestamp: wall-clock fields plus the offset, if the
/// text carried one.
#[derive(Debug, Clone, Copy)]
struct Parsed {
    naive: NaiveDateTime,
    offset: Option<FixedOffset>,
}

impl Parsed {
    /// Text without an offset is taken as UTC.
    fn to_utc(self) -> DateTime<Utc> {
        match self.offset {
            Some(offset) => {
                (self.naive - Duration::seconds(offset.local_minus_utc() as i64)).and_utc()
            }
            None => self.naive.and_utc(),
        }
    }
}

fn parse_lenient(text: &str) -> Option<Parsed> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(Parsed { naive: dt.naive_local(), offset: Some(*dt.offset()) });
    }
    let (body, utc) = match text.strip_suffix(['Z', 'z']) {
        Some(body) => (body, true),
        None => (text, false),
    };
    let offset = utc.then(|| FixedOffset::east_opt(0)).flatten();
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(body, format) {
            return Some(Parsed { naive, offset });
        }
    }
    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(body, format) {
            return Some(Parsed { naive: date.and_time(NaiveTime::MIN), offset });
        }
    }
    None
}

/// Parse a timestamp that must already be in the canonical ISO form.
pub(crate) fn parse_iso_timestamp(text: &str) -> Result<DateTime<Utc>, EvalError> {
    let parsed =
        parse_lenient(text).ok_or_else(|| EvalError::new(format!("Could not parse {}", text)))?;
    let utc = parsed.to_utc();
    let canonical = format_datetime(&utc, DEFAULT_FORMAT)?;
    if !canonical.eq_ignore_ascii_case(text) {
        return Err(EvalError::new(format!("{} is not standard ISO format.", text)));
    }
    Ok(utc)
}

/// Strict timestamp argument.
pub(crate) fn normalize_timestamp(value: &Value) -> Result<DateTime<Utc>, EvalError> {
    match value {
        Value::Text(text) => parse_iso_timestamp(text),
        other => Err(EvalError::new(format!(
            "{} should be a standard ISO format string or a DateTime object.",
            other
        ))),
    }
}

/// Loose timestamp argument, converted to UTC.
fn parse_timestamp(value: &Value) -> Result<DateTime<Utc>, EvalError> {
    let text = value.as_str().ok_or_else(|| {
        EvalError::new(format!(
            "{} should be a standard ISO format string or a DateTime object.",
            value
        ))
    })?;
    parse_lenient(text)
        .map(Parsed::to_utc)
        .ok_or_else(|| EvalError::new(format!("Could not parse {}", text)))
}

// ============================================================================
// Conversions
// ============================================================================

pub(crate) fn to_ticks(dt: &DateTime<Utc>) -> Result<i64, EvalError> {
    dt.timestamp()
        .checked_mul(TICKS_PER_SECOND)
        .and_then(|t| t.checked_add((dt.timestamp_subsec_nanos() / 100) as i64))
        .and_then(|t| t.checked_add(EPOCH_TICKS))
        .ok_or_else(|| {
            EvalError::new(format!(
                "{} is out of the supported range of ticks.",
                dt.to_rfc3339()
            ))
        })
}

fn from_ticks(ticks: i64) -> Result<DateTime<Utc>, EvalError> {
    let out_of_range =
        || EvalError::new(format!("{} is out of the supported range of ticks.", ticks));
    let since_epoch = ticks.checked_sub(EPOCH_TICKS).ok_or_else(out_of_range)?;
    let seconds = since_epoch.div_euclid(TICKS_PER_SECOND);
    let nanos = (since_epoch.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
    DateTime::from_timestamp(seconds, nanos).ok_or_else(out_of_range)
}

fn from_epoch_seconds(seconds: f64) -> Result<DateTime<Utc>, EvalError> {
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
        .ok_or_else(|| {
            EvalError::new(format!("{} is out of the supported range of epochs.", seconds))
        })
}

/// Render with the format argument, when present, or the default format.
fn render<Tz: TimeZone>(dt: &DateTime<Tz>, format: Option<&Value>) -> EvalResult {
    let format = match format {
        Some(Value::Text(f)) => f.as_str(),
        Some(Value::Null) | None => DEFAULT_FORMAT,
        Some(other) => return Err(EvalError::new(format!("{} is not a string.", other))),
    };
    Ok(Value::Text(format_datetime(dt, format)?))
}

/// Calendar and clock arithmetic by named unit.
///
/// Months and years clamp the day to the end of the target month.
pub(crate) fn shift(
    dt: DateTime<Utc>,
    interval: i64,
    unit: &str,
) -> Result<DateTime<Utc>, EvalError> {
    let out_of_range = || EvalError::new(format!("{} {} is out of range.", interval, unit));
    let months = |n: i64| -> Result<DateTime<Utc>, EvalError> {
        let magnitude = u32::try_from(n.unsigned_abs()).map_err(|_| out_of_range())?;
        let shifted = if n >= 0 {
            dt.checked_add_months(Months::new(magnitude))
        } else {
            dt.checked_sub_months(Months::new(magnitude))
        };
        shifted.ok_or_else(out_of_range)
    };
    let duration = match unit.to_ascii_lowercase().as_str() {
        "second" => Duration::try_seconds(interval),
        "minute" => Duration::try_minutes(interval),
        "hour" => Duration::try_hours(interval),
        "day" => Duration::try_days(interval),
        "week" => Duration::try_weeks(interval),
        "month" => return months(interval),
        "year" => return months(interval.checked_mul(12).ok_or_else(out_of_range)?),
        _ => return Err(EvalError::new(format!("{} is not a valid time unit.", unit))),
    };
    duration
        .and_then(|d| dt.checked_add_signed(d))
        .ok_or_else(out_of_range)
}

fn interval(value: &Value) -> Result<i64, EvalError> {
    Ok(casting::to_i64(value)?)
}

// ============================================================================
// Arithmetic
// ============================================================================

/// `addDays(timestamp, n, format?)` and friends.
fn add_unit(unit: &'static str) -> impl Fn(&[Value]) -> EvalResult + Send + Sync + 'static {
    move |args| {
        let dt = normalize_timestamp(&args[0])?;
        render(&shift(dt, interval(&args[1])?, unit)?, args.get(2))
    }
}

/// `addToTime(timestamp, interval, unit, format?)` / `subtractFromTime`.
fn offset_time(sign: i64) -> impl Fn(&[Value]) -> EvalResult + Send + Sync + 'static {
    move |args| {
        let dt = normalize_timestamp(&args[0])?;
        let n = interval(&args[1])? * sign;
        render(&shift(dt, n, &args[2].to_text())?, args.get(3))
    }
}

/// `getFutureTime(interval, unit, format?)` / `getPastTime`.
fn relative_to_now(sign: i64) -> impl Fn(&[Value]) -> EvalResult + Send + Sync + 'static {
    move |args| {
        let n = interval(&args[0])? * sign;
        render(&shift(Utc::now(), n, &args[1].to_text())?, args.get(2))
    }
}

// ============================================================================
// Parts
// ============================================================================

fn part(
    extract: fn(&DateTime<Utc>) -> i64,
) -> impl Fn(&[Value]) -> EvalResult + Send + Sync + 'static {
    move |args| Ok(Value::Integer(extract(&normalize_timestamp(&args[0])?)))
}

/// `date(timestamp)`: `M/d/yyyy`.
fn date(args: &[Value]) -> EvalResult {
    Ok(Value::Text(format_datetime(&normalize_timestamp(&args[0])?, "M/d/yyyy")?))
}

fn start_of(
    truncate: fn(&DateTime<Utc>) -> Option<DateTime<Utc>>,
) -> impl Fn(&[Value]) -> EvalResult + Send + Sync + 'static {
    move |args| {
        let dt = normalize_timestamp(&args[0])?;
        let start = truncate(&dt)
            .ok_or_else(|| EvalError::new(format!("{} has no valid start.", args[0])))?;
        render(&start, args.get(1))
    }
}

fn start_of_day(dt: &DateTime<Utc>) -> Option<DateTime<Utc>> {
    Some(dt.date_naive().and_time(NaiveTime::MIN).and_utc())
}

fn start_of_hour(dt: &DateTime<Utc>) -> Option<DateTime<Utc>> {
    dt.with_minute(0)?.with_second(0)?.with_nanosecond(0)
}

fn start_of_month(dt: &DateTime<Utc>) -> Option<DateTime<Utc>> {
    start_of_day(&dt.with_day(1)?)
}

/// Coarse label for the wall-clock time of a timestamp.
fn get_time_of_day(args: &[Value]) -> EvalResult {
    let dt = normalize_timestamp(&args[0])?;
    let (hour, minute) = (dt.hour(), dt.minute());
    let label = match (hour, minute) {
        (0, 0) => "midnight",
        (0..=11, _) => "morning",
        (12, 0) => "noon",
        (12..=17, _) => "afternoon",
        (18..=21, _) | (22, 0) => "evening",
        _ => "night",
    };
    Ok(Value::text(label))
}

/// `dateReadBack(current, target)`: the target day spelled relative to the
/// current one.
fn date_read_back(args: &[Value]) -> EvalResult {
    let current = normalize_timestamp(&args[0])?.date_naive();
    let target = normalize_timestamp(&args[1])?.date_naive();
    let days = (target - current).num_days();
    let phrase = match days {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        2 => "the day after tomorrow".to_string(),
        -1 => "yesterday".to_string(),
        -2 => "the day before yesterday".to_string(),
        _ => {
            let week_start =
                |d: NaiveDate| d - Duration::days(d.weekday().num_days_from_sunday() as i64);
            let weeks = (week_start(target) - week_start(current)).num_days() / 7;
            let weekday = format_datetime(&target.and_time(NaiveTime::MIN).and_utc(), "dddd")?;
            match weeks {
                0 => format!("this {}", weekday),
                1 => format!("next {}", weekday),
                -1 => format!("last {}", weekday),
                _ => format_datetime(
                    &target.and_time(NaiveTime::MIN).and_utc(),
                    "dddd, MMMM d, yyyy",
                )?,
            }
        }
    };
    Ok(Value::Text(phrase))
}

// ============================================================================
// Ticks
// ============================================================================

fn ticks(args: &[Value]) -> EvalResult {
    Ok(Value::Integer(to_ticks(&normalize_timestamp(&args[0])?)?))
}

fn ticks_to(per_unit: i64) -> impl Fn(&[Value]) -> EvalResult + Send + Sync + 'static {
    move |args| Ok(Value::Float(casting::to_i64(&args[0])? as f64 / per_unit as f64))
}

/// `dateTimeDiff(a, b)` in ticks.
fn date_time_diff(args: &[Value]) -> EvalResult {
    let a = to_ticks(&normalize_timestamp(&args[0])?)?;
    let b = to_ticks(&normalize_timestamp(&args[1])?)?;
    a.checked_sub(b)
        .map(Value::Integer)
        .ok_or_else(|| {
            EvalError::new(format!(
                "{} and {} are too far apart to diff in ticks.",
                args[0], args[1]
            ))
        })
}

// ============================================================================
// Formatting and time zones
// ============================================================================

/// `formatDateTime(timestamp, format?, locale?)`; numbers are unix seconds.
fn format_date_time(args: &[Value], options: &Options) -> EvalResult {
    resolve_culture(args.get(2), options)?;
    let dt = match &args[0] {
        Value::Integer(_) | Value::Float(_) => from_epoch_seconds(casting::to_f64(&args[0])?)?,
        other => parse_timestamp(other)?,
    };
    render(&dt, args.get(1))
}

/// `formatEpoch(seconds, format?, locale?)`
fn format_epoch(args: &[Value], options: &Options) -> EvalResult {
    resolve_culture(args.get(2), options)?;
    render(&from_epoch_seconds(casting::to_f64(&args[0])?)?, args.get(1))
}

/// `formatTicks(ticks, format?, locale?)`
fn format_ticks(args: &[Value], options: &Options) -> EvalResult {
    resolve_culture(args.get(2), options)?;
    render(&from_ticks(casting::to_i64(&args[0])?)?, args.get(1))
}

/// `utcNow(format?, locale?)`
fn utc_now(args: &[Value], options: &Options) -> EvalResult {
    resolve_culture(args.get(1), options)?;
    render(&Utc::now(), args.first())
}

/// `convertFromUTC(timestamp, timezone, format?, locale?)`; without a format
/// the local time renders with seven fractional digits and no designator.
fn convert_from_utc(args: &[Value], options: &Options) -> EvalResult {
    resolve_culture(args.get(3), options)?;
    let dt = normalize_timestamp(&args[0])?;
    let tz = resolve_timezone(&args[1].to_text())?;
    let local = dt.with_timezone(&tz);
    match args.get(2) {
        Some(format) => render(&local, Some(format)),
        None => Ok(Value::Text(format_datetime(&local, "yyyy-MM-ddTHH:mm:ss.fffffff")?)),
    }
}

/// `convertToUTC(timestamp, timezone, format?, locale?)`; wall-clock text is
/// read in the given zone.
fn convert_to_utc(args: &[Value], options: &Options) -> EvalResult {
    resolve_culture(args.get(3), options)?;
    let text = args[0].to_text();
    let parsed =
        parse_lenient(&text).ok_or_else(|| EvalError::new(format!("Could not parse {}", text)))?;
    let tz = resolve_timezone(&args[1].to_text())?;
    let utc = match parsed.offset {
        Some(_) => parsed.to_utc(),
        None => tz
            .from_local_datetime(&parsed.naive)
            .earliest()
            .ok_or_else(|| EvalError::new(format!("{} does not exist in {}", text, tz.name())))?
            .with_timezone(&Utc),
    };
    render(&utc, args.get(2))
}

// ============================================================================
// Package
// ============================================================================

/// Timestamp, integer, then strings.
fn verify_timestamp_args(value: &Value, expr: &Expression, position: usize) -> Option<String> {
    match position {
        0 => None,
        1 => verify_integer(value, expr, position),
        _ => verify_string(value, expr, position),
    }
}

/// Integer interval, then strings.
fn verify_interval_args(value: &Value, expr: &Expression, position: usize) -> Option<String> {
    match position {
        0 => verify_integer(value, expr, position),
        _ => verify_string(value, expr, position),
    }
}

fn verify_trailing_strings(value: &Value, expr: &Expression, position: usize) -> Option<String> {
    match position {
        0 => None,
        _ => verify_string(value, expr, position),
    }
}

/// Register the date and time builtins.
pub fn register_datetime_package(builder: &mut RegistryBuilder) {
    let s = ReturnType::STRING;
    let n = ReturnType::NUMBER;

    for (name, unit) in [
        (ty::ADD_DAYS, "day"),
        (ty::ADD_HOURS, "hour"),
        (ty::ADD_MINUTES, "minute"),
        (ty::ADD_SECONDS, "second"),
    ] {
        builder.add(
            Evaluator::new(name, apply_with_error(add_unit(unit), Some(verify_timestamp_args)), s)
                .with_validator(move |e| validate_order(e, &[s], &[s, n])),
        );
    }
    for (name, sign) in [(ty::ADD_TO_TIME, 1), (ty::SUBTRACT_FROM_TIME, -1)] {
        builder.add(
            Evaluator::new(
                name,
                apply_with_error(offset_time(sign), Some(verify_timestamp_args)),
                s,
            )
            .with_validator(move |e| validate_order(e, &[s], &[s, n, s])),
        );
    }
    for (name, sign) in [(ty::GET_FUTURE_TIME, 1), (ty::GET_PAST_TIME, -1)] {
        builder.add(
            Evaluator::new(
                name,
                apply_with_error(relative_to_now(sign), Some(verify_interval_args)),
                s,
            )
            .with_validator(move |e| validate_order(e, &[s], &[n, s])),
        );
    }

    let parts: [(&str, fn(&DateTime<Utc>) -> i64); 5] = [
        (ty::DAY_OF_MONTH, |dt| dt.day() as i64),
        (ty::DAY_OF_WEEK, |dt| dt.weekday().num_days_from_sunday() as i64),
        (ty::DAY_OF_YEAR, |dt| dt.ordinal() as i64),
        (ty::MONTH, |dt| dt.month() as i64),
        (ty::YEAR, |dt| dt.year() as i64),
    ];
    for (name, extract) in parts {
        builder.add(
            Evaluator::new(name, apply_with_error(part(extract), None), n)
                .with_validator(validate_unary_string),
        );
    }
    builder.add(
        Evaluator::new(ty::DATE, apply_with_error(date, None), s)
            .with_validator(validate_unary_string),
    );

    let starts: [(&str, fn(&DateTime<Utc>) -> Option<DateTime<Utc>>); 3] = [
        (ty::START_OF_DAY, start_of_day),
        (ty::START_OF_HOUR, start_of_hour),
        (ty::START_OF_MONTH, start_of_month),
    ];
    for (name, truncate) in starts {
        builder.add(
            Evaluator::new(
                name,
                apply_with_error(start_of(truncate), Some(verify_trailing_strings)),
                s,
            )
            .with_validator(move |e| validate_order(e, &[s], &[s])),
        );
    }

    builder.add(
        Evaluator::new(ty::GET_TIME_OF_DAY, apply_with_error(get_time_of_day, None), s)
            .with_validator(validate_unary_string),
    );
    builder.add(
        Evaluator::new(ty::DATE_READ_BACK, apply_with_error(date_read_back, None), s)
            .with_validator(move |e| validate_order(e, &[], &[s, s])),
    );

    builder.add(
        Evaluator::new(ty::TICKS, apply_with_error(ticks, None), n)
            .with_validator(validate_unary_string),
    );
    for (name, per_unit) in [
        (ty::TICKS_TO_DAYS, TICKS_PER_DAY),
        (ty::TICKS_TO_HOURS, TICKS_PER_HOUR),
        (ty::TICKS_TO_MINUTES, TICKS_PER_MINUTE),
    ] {
        builder.add(
            Evaluator::new(name, apply_with_error(ticks_to(per_unit), Some(verify_integer)), n)
                .with_validator(validate_unary_number),
        );
    }
    builder.add(
        Evaluator::new(ty::DATE_TIME_DIFF, apply_with_error(date_time_diff, None), n)
            .with_validator(move |e| validate_order(e, &[], &[s, s])),
    );

    builder.add(
        Evaluator::new(
            ty::FORMAT_DATE_TIME,
            apply_with_options_and_error(format_date_time, Some(verify_trailing_strings)),
            s,
        )
        .with_validator(move |e| validate_order(e, &[s, s], &[s | n])),
    );
    builder.add(
        Evaluator::new(
            ty::FORMAT_EPOCH,
            apply_with_options_and_error(format_epoch, Some(verify_trailing_strings)),
            s,
        )
        .with_validator(move |e| validate_order(e, &[s, s], &[n])),
    );
    builder.add(
        Evaluator::new(
            ty::FORMAT_TICKS,
            apply_with_options_and_error(format_ticks, Some(verify_trailing_strings)),
            s,
        )
        .with_validator(move |e| validate_order(e, &[s, s], &[n])),
    );
    builder.add(
        Evaluator::new(ty::UTC_NOW, apply_with_options_and_error(utc_now, Some(verify_string)), s)
            .with_validator(move |e| validate_order(e, &[s, s], &[])),
    );
    builder.add(
        Evaluator::new(
            ty::CONVERT_FROM_UTC,
            apply_with_options_and_error(convert_from_utc, Some(verify_string)),
            s,
        )
        .with_validator(move |e| validate_order(e, &[s, s], &[s, s])),
    );
    builder.add(
        Evaluator::new(
            ty::CONVERT_TO_UTC,
            apply_with_options_and_error(convert_to_utc, Some(verify_string)),
            s,
        )
        .with_validator(move |e| validate_order(e, &[s, s], &[s, s])),
    );
}

#[cfg(test)]
#[path = "datetime_test.rs"]
mod datetime_test;
