//! Per-cell conversion between scalar kinds.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::TableError;
use crate::value::{ScalarKind, Value};

/// Accepted textual date layouts, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// Accepted textual date-time layouts, tried in order. `%.f` also matches
/// an absent fractional part.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Converts a single cell of `column` to `target`.
///
/// Null stays null for every target except text, where it becomes the empty
/// string. Blank text becomes null for the numeric and calendar targets.
pub fn convert_value(column: &Value, value: &Value, target: ScalarKind) -> Result<Value, TableError> {
    let fail = || TableError::Conversion {
        column: column.to_string(),
        value: value.to_string(),
        target,
    };

    match target {
        ScalarKind::Null => Ok(Value::Null),
        ScalarKind::Text => Ok(Value::Text(value.to_string())),
        ScalarKind::Integer => match value {
            Value::Null => Ok(Value::Null),
            Value::Integer(i) => Ok(Value::Integer(*i)),
            Value::Float(f) => float_to_integer(*f).map(Value::Integer).ok_or_else(fail),
            Value::Text(s) if s.trim().is_empty() => Ok(Value::Null),
            Value::Text(s) => s.trim().parse::<i64>().map(Value::Integer).map_err(|_| fail()),
            _ => Err(fail()),
        },
        ScalarKind::Float => match value {
            Value::Null => Ok(Value::Null),
            Value::Integer(i) => Ok(Value::Float(*i as f64)),
            Value::Float(f) => Ok(Value::Float(*f)),
            Value::Text(s) if s.trim().is_empty() => Ok(Value::Null),
            Value::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float)
                .ok_or_else(fail),
            _ => Err(fail()),
        },
        ScalarKind::Date => match value {
            Value::Null => Ok(Value::Null),
            Value::Date(d) => Ok(Value::Date(*d)),
            Value::DateTime(dt) => Ok(Value::Date(dt.date())),
            Value::Text(s) if s.trim().is_empty() => Ok(Value::Null),
            Value::Text(s) => parse_date(s.trim())
                .or_else(|| parse_datetime(s.trim()).map(|dt| dt.date()))
                .map(Value::Date)
                .ok_or_else(fail),
            _ => Err(fail()),
        },
        ScalarKind::DateTime => match value {
            Value::Null => Ok(Value::Null),
            Value::DateTime(dt) => Ok(Value::DateTime(*dt)),
            Value::Date(d) => Ok(Value::DateTime(d.and_time(chrono::NaiveTime::MIN))),
            Value::Text(s) if s.trim().is_empty() => Ok(Value::Null),
            Value::Text(s) => parse_datetime(s.trim())
                .or_else(|| parse_date(s.trim()).map(|d| d.and_time(chrono::NaiveTime::MIN)))
                .map(Value::DateTime)
                .ok_or_else(fail),
            _ => Err(fail()),
        },
    }
}

/// Truncates toward zero. Non-finite values and values outside the `i64`
/// range have no integer form.
fn float_to_integer(f: f64) -> Option<i64> {
    let t = f.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    (t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then_some(t as i64)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conv(value: Value, target: ScalarKind) -> Result<Value, TableError> {
        convert_value(&"c".into(), &value, target)
    }

    #[test]
    fn text_to_numbers() {
        assert_eq!(conv(" 42 ".into(), ScalarKind::Integer).unwrap(), Value::Integer(42));
        assert_eq!(conv("2.5".into(), ScalarKind::Float).unwrap(), Value::Float(2.5));
        assert_eq!(conv("".into(), ScalarKind::Integer).unwrap(), Value::Null);
        assert_eq!(conv("".into(), ScalarKind::Float).unwrap(), Value::Null);
    }

    #[test]
    fn non_numeric_text_fails() {
        let err = conv("abc".into(), ScalarKind::Integer).unwrap_err();
        assert!(matches!(err, TableError::Conversion { ref value, .. } if value == "abc"));
        assert!(conv("2.5".into(), ScalarKind::Integer).is_err());
        assert!(conv("inf".into(), ScalarKind::Float).is_err());
    }

    #[test]
    fn numbers_cross_convert() {
        assert_eq!(conv(Value::Float(-3.9), ScalarKind::Integer).unwrap(), Value::Integer(-3));
        assert_eq!(conv(Value::Integer(7), ScalarKind::Float).unwrap(), Value::Float(7.0));
        assert!(matches!(
            conv(Value::Float(1e300), ScalarKind::Integer),
            Err(TableError::Conversion { .. })
        ));
        assert!(matches!(
            conv(Value::Float(-1e300), ScalarKind::Integer),
            Err(TableError::Conversion { .. })
        ));
        assert!(conv(Value::Float(f64::NAN), ScalarKind::Integer).is_err());
    }

    #[test]
    fn float_to_integer_range_edges() {
        // 2^63 is one past i64::MAX.
        let two_pow_63 = 9_223_372_036_854_775_808.0_f64;
        assert!(conv(Value::Float(two_pow_63), ScalarKind::Integer).is_err());
        assert_eq!(
            conv(Value::Float(-two_pow_63), ScalarKind::Integer).unwrap(),
            Value::Integer(i64::MIN)
        );
        // Above 2^53 every f64 is already integral, so truncation is exact.
        let big = 2f64.powi(60) + 2048.0;
        assert_eq!(
            conv(Value::Float(big), ScalarKind::Integer).unwrap(),
            Value::Integer((1i64 << 60) + 2048)
        );
        assert_eq!(
            conv(Value::Float(4_503_599_627_370_495.5), ScalarKind::Integer).unwrap(),
            Value::Integer(4_503_599_627_370_495)
        );
    }

    #[test]
    fn anything_to_text_and_null() {
        assert_eq!(conv(Value::Integer(7), ScalarKind::Text).unwrap(), Value::from("7"));
        assert_eq!(conv(Value::Float(0.1), ScalarKind::Text).unwrap(), Value::from("0.1"));
        assert_eq!(conv(Value::Null, ScalarKind::Text).unwrap(), Value::from(""));
        assert_eq!(conv("x".into(), ScalarKind::Null).unwrap(), Value::Null);
    }

    #[test]
    fn calendar_parsing() {
        let d = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(conv("2023-12-31".into(), ScalarKind::Date).unwrap(), Value::Date(d));
        assert_eq!(conv("31.12.2023".into(), ScalarKind::Date).unwrap(), Value::Date(d));
        let dt = d.and_hms_opt(23, 59, 1).unwrap();
        assert_eq!(
            conv("2023-12-31 23:59:01".into(), ScalarKind::DateTime).unwrap(),
            Value::DateTime(dt)
        );
        assert_eq!(conv(Value::DateTime(dt), ScalarKind::Date).unwrap(), Value::Date(d));
        assert_eq!(
            conv(Value::Date(d), ScalarKind::DateTime).unwrap(),
            Value::DateTime(d.and_hms_opt(0, 0, 0).unwrap())
        );
    }

    #[test]
    fn malformed_dates_fail() {
        assert!(conv("2023-13-01".into(), ScalarKind::Date).is_err());
        assert!(conv(Value::Integer(20230101), ScalarKind::Date).is_err());
        assert!(conv("yesterday".into(), ScalarKind::DateTime).is_err());
    }

    #[test]
    fn datetime_text_round_trip() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_milli_opt(3, 4, 5, 250)
            .unwrap();
        let text = conv(Value::DateTime(dt), ScalarKind::Text).unwrap();
        assert_eq!(conv(text, ScalarKind::DateTime).unwrap(), Value::DateTime(dt));
    }
}
