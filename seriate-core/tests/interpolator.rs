use chrono::NaiveDate;
use serde_json::{Value, json};

use seriate_core::{
    FieldSelector, Interpolator, Kind, Sample, SeriesConfig, SeriesError, TsFormat, ValueFormat,
};

const T0: f64 = 1_546_281_000.0; // 2018-12-31 18:30:00

fn minute_records() -> Vec<Value> {
    vec![
        json!({"timestamp": "2018-12-31 18:30:00", "value": 89}),
        json!({"timestamp": "2018-12-31 18:31:00", "value": 80}),
        json!({"timestamp": "2018-12-31 18:32:00", "value": 85}),
    ]
}

fn build(records: &[Value], cfg: SeriesConfig) -> Interpolator {
    Interpolator::from_records(records, cfg, Kind::Linear).expect("valid records")
}

fn sample_pairs(ip: &Interpolator) -> Vec<(f64, f64)> {
    ip.series().iter().map(|s| (s.ts, s.value)).collect()
}

#[test]
fn construction_normalizes_and_sorts() {
    let ip = build(&minute_records(), SeriesConfig::default());
    assert_eq!(ip.series().len(), 3);
    assert_eq!(ip.series().get(0).unwrap().value, 89.0);
    assert_eq!(ip.series().first().unwrap().ts, T0);
    assert_eq!(ip.series().last().unwrap().ts, T0 + 120.0);
}

#[test]
fn pattern_format_is_equivalent_to_lenient() {
    let base = build(&minute_records(), SeriesConfig::default());
    let compact = vec![
        json!({"timestamp": "20181231 1830", "value": 89}),
        json!({"timestamp": "20181231 1831", "value": 80}),
        json!({"timestamp": "20181231 1832", "value": 85}),
    ];
    let cfg = SeriesConfig::default().ts_format(TsFormat::pattern("%Y%m%d %H%M"));
    let other = build(&compact, cfg);
    assert_eq!(sample_pairs(&base), sample_pairs(&other));
}

#[test]
fn custom_ts_format_closure_is_used_verbatim() {
    let base = build(&minute_records(), SeriesConfig::default());
    // Raw timestamps shifted one minute ahead; the closure shifts them back.
    let shifted = vec![
        json!({"timestamp": "2018-12-31 18:31:00", "value": 89}),
        json!({"timestamp": "2018-12-31 18:32:00", "value": 80}),
        json!({"timestamp": "2018-12-31 18:33:00", "value": 85}),
    ];
    let cfg = SeriesConfig::default().ts_format(TsFormat::with(|raw| {
        let text = raw
            .as_str()
            .ok_or_else(|| SeriesError::data("expected string"))?;
        let dt = seriate_core::normalize::parse_lenient(text)?;
        Ok(dt.and_utc().timestamp() as f64 - 60.0)
    }));
    let other = build(&shifted, cfg);
    assert_eq!(sample_pairs(&base), sample_pairs(&other));
}

#[test]
fn alternate_field_keys() {
    let base = build(&minute_records(), SeriesConfig::default());

    let renamed_ts = vec![
        json!({"TimeStamp": "2018-12-31 18:30:00", "value": 89}),
        json!({"TimeStamp": "2018-12-31 18:31:00", "value": 80}),
        json!({"TimeStamp": "2018-12-31 18:32:00", "value": 85}),
    ];
    let other = build(&renamed_ts, SeriesConfig::default().ts_attr("TimeStamp"));
    assert_eq!(sample_pairs(&base), sample_pairs(&other));

    let renamed_value = vec![
        json!({"timestamp": "2018-12-31 18:30:00", "Value": 89}),
        json!({"timestamp": "2018-12-31 18:31:00", "Value": 80}),
        json!({"timestamp": "2018-12-31 18:32:00", "Value": 85}),
    ];
    let other = build(&renamed_value, SeriesConfig::default().value_attr("Value"));
    assert_eq!(sample_pairs(&base), sample_pairs(&other));
}

#[test]
fn positional_and_closure_extraction() {
    let base = build(&minute_records(), SeriesConfig::default());

    let tuples = vec![
        json!(["2018-12-31 18:30:00", 89]),
        json!(["2018-12-31 18:31:00", 80]),
        json!(["2018-12-31 18:32:00", 85]),
    ];
    let cfg = SeriesConfig::default().ts_attr(0usize).value_attr(1usize);
    let other = build(&tuples, cfg);
    assert_eq!(sample_pairs(&base), sample_pairs(&other));

    let nested = vec![
        json!({"item": ["2018-12-31 18:30:00", 89]}),
        json!({"item": ["2018-12-31 18:31:00", 80]}),
        json!({"item": ["2018-12-31 18:32:00", 85]}),
    ];
    let cfg = SeriesConfig::default()
        .ts_attr(FieldSelector::with(|r| {
            r.pointer("/item/0")
                .cloned()
                .ok_or_else(|| SeriesError::missing_field("item[0]"))
        }))
        .value_attr(FieldSelector::with(|r| {
            r.pointer("/item/1")
                .cloned()
                .ok_or_else(|| SeriesError::missing_field("item[1]"))
        }));
    let other = build(&nested, cfg);
    assert_eq!(sample_pairs(&base), sample_pairs(&other));
}

#[test]
fn string_values_and_markup_stripping() {
    let base = build(&minute_records(), SeriesConfig::default());

    let quoted = vec![
        json!({"timestamp": "2018-12-31 18:30:00", "value": "89"}),
        json!({"timestamp": "2018-12-31 18:31:00", "value": "80"}),
        json!({"timestamp": "2018-12-31 18:32:00", "value": "85"}),
    ];
    let other = build(&quoted, SeriesConfig::default());
    assert_eq!(sample_pairs(&base), sample_pairs(&other));

    let decorated = vec![
        json!({"timestamp": "2018-12-31 18:30:00", "value": "**89**"}),
        json!({"timestamp": "2018-12-31 18:31:00", "value": "*80***"}),
        json!({"timestamp": "2018-12-31 18:32:00", "value": "***85*"}),
    ];
    let cfg = SeriesConfig::default().value_format(ValueFormat::with(|raw| {
        let text = raw
            .as_str()
            .ok_or_else(|| SeriesError::data("expected string"))?;
        text.trim_matches('*')
            .parse::<f64>()
            .map_err(|_| SeriesError::data(format!("non-numeric value: {text:?}")))
    }));
    let other = build(&decorated, cfg);
    assert_eq!(sample_pairs(&base), sample_pairs(&other));
}

#[test]
fn linear_query_between_samples() {
    let mut ip = build(&minute_records(), SeriesConfig::default());
    assert_eq!(ip.query("2018-12-31 18:30:30").unwrap(), 84.5);
    assert_eq!(ip.query(T0 + 30.0).unwrap(), 84.5);
}

#[test]
fn query_is_idempotent() {
    let mut ip = build(&minute_records(), SeriesConfig::default());
    let a = ip.query(T0 + 45.0).unwrap();
    let b = ip.query(T0 + 45.0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn query_format_override() {
    let mut ip = build(&minute_records(), SeriesConfig::default());
    let odd = TsFormat::pattern("%S%m%M%d%y%H");
    assert_eq!(
        ip.query_fmt("001230311818", Some(&odd)).unwrap(),
        ip.query(T0).unwrap()
    );
}

#[test]
fn empty_series_queries_to_zero() {
    let mut ip = build(&[], SeriesConfig::default());
    assert_eq!(ip.query("2018-12-31 18:30:30").unwrap(), 0.0);
    assert_eq!(ip.query(0.0).unwrap(), 0.0);
    assert_eq!(ip.query(1e12).unwrap(), 0.0);
}

#[test]
fn nearest_kind_at_sample_and_kind_switching() {
    let mut ip =
        Interpolator::from_records(&minute_records(), SeriesConfig::default(), Kind::Nearest)
            .unwrap();
    assert_eq!(ip.kind(), Kind::Nearest);
    assert_eq!(ip.query(T0 + 60.0).unwrap(), 80.0);
    assert_eq!(ip.query(T0 + 50.0).unwrap(), 80.0);

    let before = ip.query(T0 + 30.0).unwrap();
    assert_eq!(before, 89.0);

    ip.set_kind(Kind::Linear);
    assert_eq!(ip.kind(), Kind::Linear);
    let after = ip.query(T0 + 30.0).unwrap();
    assert_eq!(after, 84.5);
    // The previously returned value is of course unaffected.
    assert_eq!(before, 89.0);
}

#[test]
fn mutation_invalidates_the_curve() {
    let mut ip = build(&minute_records(), SeriesConfig::default());
    assert_eq!(ip.query(T0 + 30.0).unwrap(), 84.5);
    ip.series_mut().insert(Sample::new(T0 + 30.0, 100.0));
    assert_eq!(ip.query(T0 + 30.0).unwrap(), 100.0);
}

#[test]
fn generate_second_resolution() {
    let mut ip = build(&minute_records(), SeriesConfig::default());
    let points: Vec<_> = ip
        .generate("2018-12-31 18:30:00", "2018-12-31 18:32:00", "1 sec")
        .unwrap()
        .collect();
    assert_eq!(points.len(), 120);

    let t0 = NaiveDate::from_ymd_opt(2018, 12, 31)
        .unwrap()
        .and_hms_opt(18, 30, 0)
        .unwrap();
    for (i, (at, value)) in points.iter().enumerate() {
        assert_eq!(*at, t0 + chrono::Duration::seconds(i as i64));
        let expect = if i <= 60 {
            89.0 + (80.0 - 89.0) * i as f64 / 60.0
        } else {
            80.0 + (85.0 - 80.0) * (i as f64 - 60.0) / 60.0
        };
        assert!((value - expect).abs() < 1e-9);
    }
}

#[test]
fn generate_values_matches_generate() {
    let mut ip = build(&minute_records(), SeriesConfig::default());
    let pairs: Vec<f64> = ip
        .generate(T0, T0 + 120.0, 30)
        .unwrap()
        .map(|(_, v)| v)
        .collect();
    let values: Vec<f64> = ip.generate_values(T0, T0 + 120.0, 30).unwrap().collect();
    assert_eq!(pairs, values);
    assert_eq!(values, vec![89.0, 84.5, 80.0, 82.5]);
}

#[test]
fn generate_is_restartable_per_call() {
    let mut ip = build(&minute_records(), SeriesConfig::default());
    let first: Vec<f64> = ip.generate_values(T0, T0 + 60.0, 15).unwrap().collect();
    let second: Vec<f64> = ip.generate_values(T0, T0 + 60.0, 15).unwrap().collect();
    assert_eq!(first, second);
}

#[test]
fn generate_excludes_end() {
    let mut ip = build(&minute_records(), SeriesConfig::default());
    let values: Vec<f64> = ip.generate_values(T0, T0 + 60.0, 60).unwrap().collect();
    assert_eq!(values, vec![89.0]);
    let none: Vec<f64> = ip.generate_values(T0, T0, 60).unwrap().collect();
    assert!(none.is_empty());
}

#[test]
fn non_positive_step_is_rejected() {
    let mut ip = build(&minute_records(), SeriesConfig::default());
    let err = ip.generate(T0, T0 + 60.0, 0).unwrap_err();
    assert!(matches!(err, SeriesError::InvalidArg(_)));
    let err = ip.generate(T0, T0 + 60.0, -5).unwrap_err();
    assert!(matches!(err, SeriesError::InvalidArg(_)));
}

#[test]
fn construction_failures() {
    let bad = vec![json!({"timestamp": "1", "value": 89})];
    let cfg = SeriesConfig::default().ts_format(TsFormat::pattern("%Y%m%d"));
    let err = Interpolator::from_records(&bad, cfg, Kind::Linear).unwrap_err();
    assert!(matches!(err, SeriesError::Format { .. }));

    let missing = vec![json!({"ts": 0, "value": 1})];
    let err = Interpolator::from_records(&missing, SeriesConfig::default(), Kind::Linear)
        .unwrap_err();
    assert_eq!(err, SeriesError::missing_field("timestamp"));
}
