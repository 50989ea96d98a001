//! Tests for the Date and Time package

use super::{EPOCH_TICKS, parse_iso_timestamp, to_ticks};
use crate::api::Options;
use crate::expression::Expression;
use crate::test_utils::{c, call, eval, p, scope};
use crate::values::Value;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

fn run(expr: Expression) -> Value {
    eval(&expr, &scope()).unwrap_or_else(|e| panic!("{} failed: {}", expr, e))
}

fn fails(expr: Expression) -> String {
    match eval(&expr, &scope()) {
        Ok(v) => panic!("{} should fail, got {:?}", expr, v),
        Err(e) => e.message().to_string(),
    }
}

fn text(s: &str) -> Value {
    Value::text(s)
}

#[test]
fn test_iso_parsing_is_strict() {
    let expected = Utc.with_ymd_and_hms(2018, 3, 15, 13, 0, 0).single().unwrap();
    assert_eq!(parse_iso_timestamp("2018-03-15T13:00:00.000Z"), Ok(expected));
    assert_eq!(
        parse_iso_timestamp("2018-03-15").unwrap_err().message(),
        "2018-03-15 is not standard ISO format."
    );
    assert_eq!(parse_iso_timestamp("tomorrow").unwrap_err().message(), "Could not parse tomorrow");
}

#[test]
fn test_ticks_epoch() {
    let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).single().unwrap();
    assert_eq!(to_ticks(&epoch), Ok(EPOCH_TICKS));

    let far = Utc.with_ymd_and_hms(100_000, 1, 1, 0, 0, 0).single().unwrap();
    let err = to_ticks(&far).unwrap_err();
    assert!(err.message().ends_with("is out of the supported range of ticks."));
}

#[test]
fn test_format_ticks_out_of_range() {
    assert_eq!(
        fails(call!("formatTicks", c(i64::MIN))),
        "-9223372036854775808 is out of the supported range of ticks."
    );
    assert!(eval(&call!("formatTicks", c(i64::MAX)), &scope()).is_ok());
}

#[test]
fn test_add_units() {
    assert_eq!(run(call!("addDays", p("timestamp"), c(1))), text("2018-03-16T13:00:00.000Z"));
    assert_eq!(run(call!("addDays", p("timestamp"), c(1), c("MM-dd-yy"))), text("03-16-18"));
    assert_eq!(
        run(call!("addHours", p("timestamp"), c(1), c("MM-dd-yy hh-mm"))),
        text("03-15-18 02-00")
    );
    assert_eq!(run(call!("addMinutes", p("timestamp"), c(1.0))), text("2018-03-15T13:01:00.000Z"));
    assert_eq!(run(call!("addSeconds", p("timestamp"), c(-1))), text("2018-03-15T12:59:59.000Z"));
}

#[test]
fn test_add_units_reject_loose_timestamps() {
    assert_eq!(
        fails(call!("addDays", p("notISOTimestamp"), c(1))),
        "2018/03/15 13:00:00 is not standard ISO format."
    );
    assert_eq!(fails(call!("addDays", c("bad"), c(1))), "Could not parse bad");
    assert_eq!(
        fails(call!("addDays", p("one"), c(1))),
        "1 should be a standard ISO format string or a DateTime object."
    );
    assert_eq!(fails(call!("addDays", p("timestamp"), c(1.5))), "1.5 is not an integer.");
}

#[test]
fn test_add_to_and_subtract_from_time() {
    assert_eq!(
        run(call!("addToTime", p("timestamp"), c(1), c("Day"), c("D"))),
        text("Friday, 16 March 2018")
    );
    assert_eq!(
        run(call!("addToTime", p("timestamp"), c(1), c("Month"))),
        text("2018-04-15T13:00:00.000Z")
    );
    assert_eq!(
        run(call!("addToTime", c("2018-01-31T00:00:00.000Z"), c(1), c("month"))),
        text("2018-02-28T00:00:00.000Z")
    );
    for (unit, expected) in [
        ("Year", "2017-03-15T13:00:00.000Z"),
        ("Month", "2018-02-15T13:00:00.000Z"),
        ("Week", "2018-03-08T13:00:00.000Z"),
        ("Day", "2018-03-14T13:00:00.000Z"),
        ("Hour", "2018-03-15T12:00:00.000Z"),
        ("Minute", "2018-03-15T12:59:00.000Z"),
        ("Second", "2018-03-15T12:59:59.000Z"),
    ] {
        assert_eq!(
            run(call!("subtractFromTime", p("timestamp"), c(1), c(unit))),
            text(expected),
            "unit {}",
            unit
        );
    }
    assert_eq!(
        fails(call!("subtractFromTime", p("timestamp"), c(1), c("Fortnight"))),
        "Fortnight is not a valid time unit."
    );
}

#[test]
fn test_parts() {
    assert_eq!(run(call!("dayOfMonth", p("timestamp"))), Value::Integer(15));
    assert_eq!(run(call!("dayOfWeek", p("timestamp"))), Value::Integer(4));
    assert_eq!(run(call!("dayOfYear", p("timestamp"))), Value::Integer(74));
    assert_eq!(run(call!("month", p("timestamp"))), Value::Integer(3));
    assert_eq!(run(call!("year", p("timestamp"))), Value::Integer(2018));
    assert_eq!(run(call!("date", p("timestamp"))), text("3/15/2018"));
    assert!(eval(&call!("dayOfMonth", p("notISOTimestamp")), &scope()).is_err());
}

#[test]
fn test_utc_now() {
    assert_eq!(run(call!("length", call!("utcNow"))), Value::Integer(24));
    let year = run(call!("utcNow", c("yyyy")));
    assert_eq!(year.as_str().map(str::len), Some(4));
}

#[test]
fn test_relative_to_now() {
    let now = run(call!("ticks", call!("utcNow")));
    let future = run(call!("ticks", call!("getFutureTime", c(1), c("Year"))));
    let past = run(call!("ticks", call!("getPastTime", c(1), c("Day"))));
    assert!(future.as_i64().unwrap() > now.as_i64().unwrap());
    assert!(past.as_i64().unwrap() < now.as_i64().unwrap());
    assert_eq!(
        run(call!("length", call!("getPastTime", c(1), c("Week"), c("yyyy-MM-dd")))),
        Value::Integer(10)
    );
    assert_eq!(
        fails(call!("getFutureTime", c(1), c("Fortnight"))),
        "Fortnight is not a valid time unit."
    );
}

#[test]
fn test_format_date_time() {
    assert_eq!(run(call!("formatDateTime", c("2018-03-15"))), text("2018-03-15T00:00:00.000Z"));
    assert_eq!(
        run(call!("formatDateTime", p("notISOTimestamp"))),
        text("2018-03-15T13:00:00.000Z")
    );
    assert_eq!(run(call!("formatDateTime", p("unixTimestamp"))), text("2018-03-15T13:00:00.000Z"));
    assert_eq!(run(call!("formatDateTime", p("timestamp"), c("MM-dd-yy"))), text("03-15-18"));
    assert_eq!(
        run(call!("formatDateTime", c("2018-03-15T13:00:00+01:00"))),
        text("2018-03-15T12:00:00.000Z")
    );
    assert_eq!(
        fails(call!("formatDateTime", p("timestamp"), c("Q"))),
        "illegal format representation: Q"
    );
    assert_eq!(
        fails(call!("formatDateTime", p("timestamp"), c("D"), c("xx-XX"))),
        "xx-XX is not a valid locale"
    );
}

#[test]
fn test_format_date_time_reads_locale_option() {
    let expr = call!("formatDateTime", p("timestamp"), c("D"));
    let result = expr.try_evaluate(&scope(), &Options::with_locale("fr-FR"));
    assert_eq!(result, Ok(text("Thursday, 15 March 2018")));
    assert!(expr.try_evaluate(&scope(), &Options::with_locale("xx")).is_err());
}

#[test]
fn test_format_epoch_and_ticks() {
    assert_eq!(run(call!("formatEpoch", p("unixTimestamp"))), text("2018-03-15T13:00:00.000Z"));
    assert_eq!(run(call!("formatEpoch", c(1521118800.5))), text("2018-03-15T13:00:00.500Z"));
    assert_eq!(
        run(call!("formatTicks", c(636503904000000000i64))),
        text("2018-01-01T08:00:00.000Z")
    );
    assert_eq!(
        run(call!("formatTicks", c(636503904000000000i64), c("yyyy"))),
        text("2018")
    );
}

#[test]
fn test_ticks() {
    assert_eq!(
        run(call!("ticks", c("2018-01-01T08:00:00.000Z"))),
        Value::Integer(636503904000000000)
    );
    assert_eq!(run(call!("ticksToDays", c(864000000000i64))), Value::Float(1.0));
    assert_eq!(run(call!("ticksToHours", c(54000000000i64))), Value::Float(1.5));
    assert_eq!(run(call!("ticksToMinutes", c(600000000))), Value::Float(1.0));
    assert_eq!(
        run(call!("dateTimeDiff", c("2019-01-01T08:00:00.000Z"), c("2018-01-01T08:00:00.000Z"))),
        Value::Integer(315360000000000)
    );
    assert_eq!(
        run(call!("dateTimeDiff", c("2018-01-01T08:00:00.000Z"), c("2018-01-01T09:00:00.000Z"))),
        Value::Integer(-36000000000)
    );
}

#[test]
fn test_start_of() {
    assert_eq!(run(call!("startOfDay", p("timestamp"))), text("2018-03-15T00:00:00.000Z"));
    assert_eq!(
        run(call!("startOfHour", c("2018-03-15T13:30:30.000Z"))),
        text("2018-03-15T13:00:00.000Z")
    );
    assert_eq!(run(call!("startOfMonth", p("timestamp"), c("yyyy-MM-dd"))), text("2018-03-01"));
}

#[test]
fn test_get_time_of_day() {
    for (time, expected) in [
        ("2018-03-15T00:00:00.000Z", "midnight"),
        ("2018-03-15T08:00:00.000Z", "morning"),
        ("2018-03-15T12:00:00.000Z", "noon"),
        ("2018-03-15T13:00:00.000Z", "afternoon"),
        ("2018-03-15T18:00:00.000Z", "evening"),
        ("2018-03-15T22:00:00.000Z", "evening"),
        ("2018-03-15T22:30:00.000Z", "night"),
        ("2018-03-15T23:00:00.000Z", "night"),
    ] {
        assert_eq!(run(call!("getTimeOfDay", c(time))), text(expected), "at {}", time);
    }
}

#[test]
fn test_date_read_back() {
    let relative = |days: i64| {
        call!("dateReadBack", p("timestamp"), call!("addDays", p("timestamp"), c(days)))
    };
    assert_eq!(run(relative(0)), text("today"));
    assert_eq!(run(relative(1)), text("tomorrow"));
    assert_eq!(run(relative(-1)), text("yesterday"));
    assert_eq!(run(relative(2)), text("the day after tomorrow"));
    assert_eq!(run(relative(-2)), text("the day before yesterday"));
    assert_eq!(run(relative(-3)), text("this Monday"));
    assert_eq!(run(relative(5)), text("next Tuesday"));
    assert_eq!(run(relative(-6)), text("last Friday"));
    assert_eq!(run(relative(30)), text("Saturday, April 14, 2018"));
}

#[test]
fn test_convert_time_zones() {
    assert_eq!(
        run(call!(
            "convertFromUTC",
            c("2018-01-02T02:00:00.000Z"),
            c("Pacific Standard Time"),
            c("D")
        )),
        text("Monday, 01 January 2018")
    );
    assert_eq!(
        run(call!("convertFromUTC", c("2018-01-02T02:00:00.000Z"), c("Pacific Standard Time"))),
        text("2018-01-01T18:00:00.0000000")
    );
    assert_eq!(
        run(call!(
            "convertFromUTC",
            c("2018-07-02T02:00:00.000Z"),
            c("America/New_York"),
            c("HH:mm zzz")
        )),
        text("22:00 -04:00")
    );
    assert_eq!(
        run(call!("convertToUTC", c("01/01/2018 00:00:00"), c("Pacific Standard Time"))),
        text("2018-01-01T08:00:00.000Z")
    );
    assert_eq!(
        fails(call!("convertFromUTC", p("timestamp"), c("Mars Standard Time"))),
        "Mars Standard Time is an illegal timezone"
    );
}
