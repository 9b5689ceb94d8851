use crate::model::{Span, StatusCode, TagValue};
use crate::time;
use chrono::Duration;

/// Sampling bit reported on every outbound span. Sampling decisions are made
/// upstream of this crate; exported spans are sampled by definition.
pub const FLAG_SAMPLED: i32 = 0x1;

/// Tag type union of the Jaeger wire model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JaegerTagKind {
    String,
    Double,
    Bool,
    Long,
}

/// One typed tag. Exactly one value field is populated, selected by `kind`;
/// the constructors keep that invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct JaegerTag {
    pub key: String,
    pub kind: JaegerTagKind,
    pub v_str: Option<String>,
    pub v_double: Option<f64>,
    pub v_bool: Option<bool>,
    pub v_long: Option<i64>,
}

impl JaegerTag {
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> JaegerTag {
        JaegerTag {
            key: key.into(),
            kind: JaegerTagKind::String,
            v_str: Some(value.into()),
            v_double: None,
            v_bool: None,
            v_long: None,
        }
    }

    pub fn double(key: impl Into<String>, value: f64) -> JaegerTag {
        JaegerTag {
            key: key.into(),
            kind: JaegerTagKind::Double,
            v_str: None,
            v_double: Some(value),
            v_bool: None,
            v_long: None,
        }
    }

    pub fn boolean(key: impl Into<String>, value: bool) -> JaegerTag {
        JaegerTag {
            key: key.into(),
            kind: JaegerTagKind::Bool,
            v_str: None,
            v_double: None,
            v_bool: Some(value),
            v_long: None,
        }
    }

    pub fn long(key: impl Into<String>, value: i64) -> JaegerTag {
        JaegerTag {
            key: key.into(),
            kind: JaegerTagKind::Long,
            v_str: None,
            v_double: None,
            v_bool: None,
            v_long: Some(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JaegerRefKind {
    ChildOf,
    FollowsFrom,
}

/// Causal reference to another span. Reference lists are threaded across a
/// trace by the batch assembler, not by this converter.
#[derive(Debug, Clone, PartialEq)]
pub struct JaegerSpanRef {
    pub kind: JaegerRefKind,
    pub trace_id_low: i64,
    pub trace_id_high: i64,
    pub span_id: i64,
}

/// Timestamped log record attached to a span. Not populated by this converter.
#[derive(Debug, Clone, PartialEq)]
pub struct JaegerLog {
    pub timestamp: i64,
    pub fields: Vec<JaegerTag>,
}

/// One outbound span record, ready for Thrift framing.
#[derive(Debug, Clone, PartialEq)]
pub struct JaegerSpan {
    pub trace_id_low: i64,
    pub trace_id_high: i64,
    pub span_id: i64,
    pub parent_span_id: i64,
    pub operation_name: String,
    pub flags: i32,
    pub start_time: i64,
    pub duration: i64,
    pub references: Vec<JaegerSpanRef>,
    pub tags: Vec<JaegerTag>,
    pub logs: Vec<JaegerLog>,
}

impl JaegerSpan {
    pub fn from_span(span: &Span) -> JaegerSpan {
        JaegerSpan {
            trace_id_low: span.trace_id.low as i64,
            trace_id_high: span.trace_id.high as i64,
            span_id: span.id as i64,
            parent_span_id: span.parent_id.unwrap_or(0) as i64,
            operation_name: span.name.clone(),
            flags: FLAG_SAMPLED,
            start_time: time::to_epoch_micros(span.start),
            duration: duration_micros(span.duration),
            references: Vec::new(),
            tags: build_tags(span),
            logs: Vec::new(),
        }
    }
}

// Whole milliseconds scaled back to micros. The collector counterpart reports
// at millisecond resolution, so sub-millisecond precision is dropped here;
// the Zipkin path keeps it.
fn duration_micros(duration: Duration) -> i64 {
    duration.num_milliseconds() * 1000
}

pub fn to_jaeger_tag(key: &str, value: &TagValue) -> JaegerTag {
    match value {
        TagValue::Str(s) => JaegerTag::string(key, s.clone()),
        TagValue::Int(i) => JaegerTag::long(key, i64::from(*i)),
        TagValue::Long(l) => JaegerTag::long(key, *l),
        TagValue::Float(v) => JaegerTag::double(key, f64::from(*v)),
        TagValue::Double(v) => JaegerTag::double(key, *v),
        TagValue::Bool(b) => JaegerTag::boolean(key, *b),
        TagValue::Other(text) => JaegerTag::string(key, text.clone()),
    }
}

/// Converts every tag on the span, then appends the status-derived tags.
/// Status tags always follow the span's own tags.
pub fn build_tags(span: &Span) -> Vec<JaegerTag> {
    let mut tags: Vec<JaegerTag> = span
        .tags
        .iter()
        .map(|(key, value)| to_jaeger_tag(key, value))
        .collect();

    match span.status.code {
        StatusCode::Ok => {
            tags.push(JaegerTag::string("otel.status_code", "OK"));
        }
        StatusCode::Error => {
            tags.push(JaegerTag::boolean("error", true));
            tags.push(JaegerTag::string("otel.status_code", "ERROR"));
            let description = span.status.description.clone().unwrap_or_default();
            tags.push(JaegerTag::string("otel.status_description", description));
        }
        StatusCode::Unset => {}
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SpanStatus, TraceId};
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    fn test_span() -> Span {
        Span {
            trace_id: TraceId::new(0x0102, 0x0304),
            id: 0x1cd6,
            parent_id: None,
            name: "request".to_string(),
            service: "orders".to_string(),
            start: Utc.with_ymd_and_hms(2021, 9, 2, 11, 6, 13).unwrap(),
            duration: Duration::milliseconds(250),
            tags: HashMap::new(),
            status: SpanStatus::default(),
        }
    }

    #[test]
    fn test_tag_union_per_value_type() {
        assert_eq!(
            to_jaeger_tag("k", &TagValue::Str("v".into())),
            JaegerTag::string("k", "v")
        );
        assert_eq!(
            to_jaeger_tag("k", &TagValue::Int(5)),
            JaegerTag::long("k", 5)
        );
        assert_eq!(
            to_jaeger_tag("k", &TagValue::Long(5)),
            JaegerTag::long("k", 5)
        );
        assert_eq!(
            to_jaeger_tag("k", &TagValue::Float(2.5)),
            JaegerTag::double("k", 2.5)
        );
        assert_eq!(
            to_jaeger_tag("k", &TagValue::Double(2.5)),
            JaegerTag::double("k", 2.5)
        );
        assert_eq!(
            to_jaeger_tag("k", &TagValue::Bool(true)),
            JaegerTag::boolean("k", true)
        );
        assert_eq!(
            to_jaeger_tag("k", &TagValue::Other("[1, 2]".into())),
            JaegerTag::string("k", "[1, 2]")
        );
    }

    #[test]
    fn test_int_and_long_widen_to_the_same_tag() {
        let from_int = to_jaeger_tag("count", &TagValue::Int(5));
        let from_long = to_jaeger_tag("count", &TagValue::Long(5));
        assert_eq!(from_int, from_long);
        assert_eq!(from_int.kind, JaegerTagKind::Long);
        assert_eq!(from_int.v_long, Some(5));
        assert_eq!(from_int.v_str, None);
    }

    #[test]
    fn test_status_ok_emits_single_tag() {
        let mut span = test_span();
        span.status = SpanStatus::ok();
        let tags = build_tags(&span);
        assert_eq!(tags, vec![JaegerTag::string("otel.status_code", "OK")]);
    }

    #[test]
    fn test_status_error_emits_error_triple() {
        let mut span = test_span();
        span.status = SpanStatus::error(Some("boom".to_string()));
        let tags = build_tags(&span);
        assert_eq!(
            tags,
            vec![
                JaegerTag::boolean("error", true),
                JaegerTag::string("otel.status_code", "ERROR"),
                JaegerTag::string("otel.status_description", "boom"),
            ]
        );
    }

    #[test]
    fn test_status_error_without_description_reports_empty_string() {
        let mut span = test_span();
        span.status = SpanStatus::error(None);
        let tags = build_tags(&span);
        assert_eq!(
            tags.last(),
            Some(&JaegerTag::string("otel.status_description", ""))
        );
    }

    #[test]
    fn test_status_unset_emits_nothing() {
        let span = test_span();
        assert!(build_tags(&span).is_empty());
    }

    #[test]
    fn test_status_tags_follow_span_tags() {
        let mut span = test_span();
        span.tags
            .insert("http.method".to_string(), TagValue::Str("GET".into()));
        span.status = SpanStatus::error(None);
        let tags = build_tags(&span);
        assert_eq!(tags.len(), 4);
        assert_eq!(tags[0], JaegerTag::string("http.method", "GET"));
        assert_eq!(tags[1], JaegerTag::boolean("error", true));
    }

    #[test]
    fn test_from_span_assembles_record() {
        let mut span = test_span();
        span.parent_id = Some(0x00f0_67aa_0ba9_02b7);

        let jaeger = JaegerSpan::from_span(&span);
        assert_eq!(jaeger.trace_id_high, 0x0102);
        assert_eq!(jaeger.trace_id_low, 0x0304);
        assert_eq!(jaeger.span_id, 0x1cd6);
        assert_eq!(jaeger.parent_span_id, 0x00f0_67aa_0ba9_02b7);
        assert_eq!(jaeger.operation_name, "request");
        assert_eq!(jaeger.flags, FLAG_SAMPLED);
        assert_eq!(jaeger.start_time, 1_630_580_773_000_000);
        assert_eq!(jaeger.duration, 250_000);
        assert!(jaeger.references.is_empty());
        assert!(jaeger.logs.is_empty());
    }

    #[test]
    fn test_missing_parent_defaults_to_zero() {
        let jaeger = JaegerSpan::from_span(&test_span());
        assert_eq!(jaeger.parent_span_id, 0);
    }

    #[test]
    fn test_duration_truncates_to_millisecond_resolution() {
        let mut span = test_span();
        span.duration = Duration::nanoseconds(1_500_700);

        let jaeger = JaegerSpan::from_span(&span);
        assert_eq!(jaeger.duration, 1000);
    }
}
