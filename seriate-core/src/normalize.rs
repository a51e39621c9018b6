use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use seriate_types::{SeriesConfig, SeriesError, StepSpec, TimeSpec, TsFormat, ValueFormat};

use crate::Sample;

/// Calendar formats tried by the lenient timestamp parser, in order.
///
/// ISO forms first; the compact `%Y%m%d` variants cover export dumps that
/// drop separators. RFC 3339 is tried before any of these.
const DATETIME_FMTS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y%m%d %H%M%S",
    "%Y%m%d %H%M",
];

/// Date-only formats accepted by the lenient parser; midnight is assumed.
const DATE_FMTS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%Y%m%d"];

/// Applies a [`SeriesConfig`] to raw records and ad-hoc query inputs.
///
/// One normalizer is owned by each series instance; its configuration is
/// fixed at construction.
#[derive(Debug, Clone)]
pub struct Normalizer {
    cfg: SeriesConfig,
}

impl Normalizer {
    /// Wrap a configuration.
    #[must_use]
    pub const fn new(cfg: SeriesConfig) -> Self {
        Self { cfg }
    }

    /// The wrapped configuration.
    #[must_use]
    pub const fn config(&self) -> &SeriesConfig {
        &self.cfg
    }

    /// Normalize one record into a sample.
    ///
    /// # Errors
    /// Extraction failures (`MissingField`), pattern mismatches (`Format`),
    /// and coercion failures (`Data`) propagate unmodified; custom closures
    /// surface whatever they return.
    pub fn normalize_record(&self, record: &Value) -> Result<Sample, SeriesError> {
        let raw_ts = self.cfg.ts_attr.extract(record)?;
        let raw_value = self.cfg.value_attr.extract(record)?;
        Ok(Sample::new(
            apply_ts_format(&self.cfg.ts_format, &raw_ts)?,
            apply_value_format(&self.cfg.value_format, &raw_value)?,
        ))
    }

    /// Normalize a whole record sequence eagerly.
    ///
    /// # Errors
    /// Fails on the first bad record; no partial output is produced.
    pub fn normalize_all(&self, records: &[Value]) -> Result<Vec<Sample>, SeriesError> {
        records.iter().map(|r| self.normalize_record(r)).collect()
    }

    /// Reduce an ad-hoc timestamp input to epoch seconds.
    ///
    /// Numeric inputs pass through unchanged; calendar timestamps are
    /// decomposed to integral epoch seconds; text runs through `fmt` when
    /// given, else through the configured timestamp format.
    ///
    /// # Errors
    /// Text inputs surface the same errors as record normalization.
    pub fn tidy_ts(&self, spec: &TimeSpec, fmt: Option<&TsFormat>) -> Result<f64, SeriesError> {
        match spec {
            TimeSpec::Epoch(ts) => Ok(*ts),
            TimeSpec::DateTime(dt) => Ok(naive_to_epoch(dt)),
            TimeSpec::Text(text) => {
                let raw = Value::String(text.clone());
                apply_ts_format(fmt.unwrap_or(&self.cfg.ts_format), &raw)
            }
        }
    }

    /// Reduce an ad-hoc step or duration input to seconds.
    ///
    /// # Errors
    /// Returns `InvalidArg` when a duration string cannot be parsed.
    pub fn tidy_step(spec: &StepSpec) -> Result<f64, SeriesError> {
        match spec {
            StepSpec::Seconds(s) => Ok(*s),
            StepSpec::Duration(d) => Ok(d.as_secs_f64()),
            StepSpec::Text(text) => parse_step_text(text),
        }
    }
}

/// Run one raw timestamp through a format descriptor.
///
/// # Errors
/// `Auto` rejects non-number, non-string raws with `Data`; `Pattern`
/// rejects non-strings with `Data` and non-matching strings with `Format`.
pub fn apply_ts_format(fmt: &TsFormat, raw: &Value) -> Result<f64, SeriesError> {
    match fmt {
        TsFormat::Auto => match raw {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| SeriesError::data(format!("timestamp out of range: {n}"))),
            Value::String(text) => parse_lenient(text).map(|dt| naive_to_epoch(&dt)),
            other => Err(SeriesError::data(format!(
                "cannot interpret {other} as a timestamp"
            ))),
        },
        TsFormat::Pattern(pattern) => match raw {
            Value::String(text) => parse_pattern(text, pattern).map(|dt| naive_to_epoch(&dt)),
            other => Err(SeriesError::data(format!(
                "timestamp pattern {pattern:?} requires a string, got {other}"
            ))),
        },
        TsFormat::With(f) => f(raw),
    }
}

/// Run one raw value through a format descriptor.
///
/// # Errors
/// `Auto` rejects anything that is not a number or a numeric string.
pub fn apply_value_format(fmt: &ValueFormat, raw: &Value) -> Result<f64, SeriesError> {
    match fmt {
        ValueFormat::Auto => match raw {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| SeriesError::data(format!("value out of range: {n}"))),
            Value::String(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| SeriesError::data(format!("non-numeric value: {text:?}"))),
            other => Err(SeriesError::data(format!(
                "cannot interpret {other} as a value"
            ))),
        },
        ValueFormat::With(f) => f(raw),
    }
}

/// Lenient parse of a human-readable timestamp.
///
/// Tries RFC 3339, then the common calendar formats, then date-only forms
/// at midnight. Deterministic: the first matching format wins.
///
/// # Errors
/// Returns `Data` when no format matches.
pub fn parse_lenient(text: &str) -> Result<NaiveDateTime, SeriesError> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.naive_utc());
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(dt);
        }
    }
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return Ok(d.into());
        }
    }
    Err(SeriesError::data(format!(
        "unrecognized timestamp: {text:?}"
    )))
}

/// Exact strptime-style parse.
///
/// Patterns without time fields are accepted as dates at midnight, matching
/// the usual strptime behavior.
///
/// # Errors
/// Returns `Format` when the input does not match the pattern.
pub fn parse_pattern(text: &str, pattern: &str) -> Result<NaiveDateTime, SeriesError> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, pattern) {
        return Ok(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(text, pattern) {
        return Ok(d.into());
    }
    Err(SeriesError::format(pattern, text))
}

/// Parse a human-readable duration string into seconds.
///
/// Whitespace between count and unit is tolerated ("2 minutes", "1 sec").
///
/// # Errors
/// Returns `InvalidArg` when the string is not a recognizable duration.
pub fn parse_step_text(text: &str) -> Result<f64, SeriesError> {
    let compact: String = text.split_whitespace().collect();
    humantime::parse_duration(&compact)
        .map(|d| d.as_secs_f64())
        .map_err(|e| SeriesError::invalid_arg(format!("bad duration {text:?}: {e}")))
}

/// Epoch seconds as a naive calendar timestamp, fractional part preserved.
///
/// Instants outside chrono's representable range saturate at its bounds.
#[must_use]
pub fn epoch_to_naive(ts: f64) -> NaiveDateTime {
    let secs = ts.div_euclid(1.0) as i64;
    let nanos = (ts.rem_euclid(1.0) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(secs, nanos).map_or_else(
        || {
            if ts < 0.0 {
                NaiveDateTime::MIN
            } else {
                NaiveDateTime::MAX
            }
        },
        |dt| dt.naive_utc(),
    )
}

/// Integral epoch seconds of a naive calendar timestamp; sub-second
/// precision is dropped.
fn naive_to_epoch(dt: &NaiveDateTime) -> f64 {
    dt.and_utc().timestamp() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn default_normalizer() -> Normalizer {
        Normalizer::new(SeriesConfig::default())
    }

    #[test]
    fn default_keys_and_lenient_timestamp() {
        let n = default_normalizer();
        let s = n
            .normalize_record(&json!({"timestamp": "2018-12-31 18:30:00", "value": 89}))
            .unwrap();
        let expect = NaiveDate::from_ymd_opt(2018, 12, 31)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        assert_eq!(s.ts, expect.and_utc().timestamp() as f64);
        assert_eq!(s.value, 89.0);
    }

    #[test]
    fn numeric_strings_coerce() {
        let n = default_normalizer();
        let s = n
            .normalize_record(&json!({"timestamp": 60, "value": "89"}))
            .unwrap();
        assert_eq!(s, Sample::new(60.0, 89.0));
    }

    #[test]
    fn pattern_mismatch_is_format_error() {
        let err = parse_pattern("1", "%Y%m%d").unwrap_err();
        assert!(matches!(err, SeriesError::Format { .. }));
    }

    #[test]
    fn compact_pattern_roundtrip() {
        let a = parse_lenient("2018-12-31 18:30:00").unwrap();
        let b = parse_pattern("20181231 1830", "%Y%m%d %H%M").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn date_only_pattern_is_midnight() {
        let d = parse_pattern("20181231", "%Y%m%d").unwrap();
        assert_eq!(
            d,
            NaiveDate::from_ymd_opt(2018, 12, 31)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn step_shapes() {
        assert_eq!(
            Normalizer::tidy_step(&StepSpec::Seconds(2.2)).unwrap(),
            2.2
        );
        assert_eq!(
            Normalizer::tidy_step(&StepSpec::Duration(std::time::Duration::from_secs(120)))
                .unwrap(),
            120.0
        );
        assert_eq!(
            Normalizer::tidy_step(&StepSpec::Text("2 minutes".into())).unwrap(),
            120.0
        );
        assert_eq!(
            Normalizer::tidy_step(&StepSpec::Text("1 sec".into())).unwrap(),
            1.0
        );
        assert!(Normalizer::tidy_step(&StepSpec::Text("soon".into())).is_err());
    }

    #[test]
    fn tidy_ts_passthrough_and_override() {
        let n = default_normalizer();
        assert_eq!(n.tidy_ts(&TimeSpec::Epoch(42.5), None).unwrap(), 42.5);

        let dt = NaiveDate::from_ymd_opt(2018, 12, 31)
            .unwrap()
            .and_hms_milli_opt(18, 30, 0, 250)
            .unwrap();
        let expect = NaiveDate::from_ymd_opt(2018, 12, 31)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap()
            .and_utc()
            .timestamp() as f64;
        // Sub-second precision drops on decomposition.
        assert_eq!(n.tidy_ts(&TimeSpec::DateTime(dt), None).unwrap(), expect);

        let odd = TsFormat::pattern("%S%m%M%d%y%H");
        assert_eq!(
            n.tidy_ts(&TimeSpec::Text("001230311818".into()), Some(&odd))
                .unwrap(),
            expect
        );
        assert_eq!(
            n.tidy_ts(&TimeSpec::Text("2018-12-31 18:30:00".into()), None)
                .unwrap(),
            expect
        );
    }

    #[test]
    fn custom_value_format_is_verbatim() {
        let cfg = SeriesConfig::default().value_format(ValueFormat::with(|raw| {
            let text = raw
                .as_str()
                .ok_or_else(|| SeriesError::data("expected decorated string"))?;
            text.trim_matches('*')
                .parse::<f64>()
                .map_err(|_| SeriesError::data(format!("non-numeric value: {text:?}")))
        }));
        let n = Normalizer::new(cfg);
        let s = n
            .normalize_record(&json!({"timestamp": 0, "value": "**89**"}))
            .unwrap();
        assert_eq!(s.value, 89.0);
    }

    #[test]
    fn epoch_naive_roundtrip() {
        let dt = epoch_to_naive(1_546_281_000.0);
        assert_eq!(naive_to_epoch(&dt), 1_546_281_000.0);
        let frac = epoch_to_naive(0.5);
        assert_eq!(frac.and_utc().timestamp_subsec_millis(), 500);
    }
}
