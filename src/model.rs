use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt;

/// 128-bit trace identifier split into two 64-bit halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId {
    pub high: u64,
    pub low: u64,
}

impl TraceId {
    pub fn new(high: u64, low: u64) -> TraceId {
        TraceId { high, low }
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.high, self.low)
    }
}

/// A span tag value. Values arriving from an instrumentation layer are pinned
/// to one of these variants at the boundary; anything without a native wire
/// type is carried as its display text in `Other`.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Str(String),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Other(String),
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Str(s) | TagValue::Other(s) => f.write_str(s),
            TagValue::Int(i) => write!(f, "{}", i),
            TagValue::Long(l) => write!(f, "{}", l),
            TagValue::Float(v) => write!(f, "{}", v),
            TagValue::Double(v) => write!(f, "{}", v),
            TagValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> TagValue {
        TagValue::Str(s.to_string())
    }
}

impl From<String> for TagValue {
    fn from(s: String) -> TagValue {
        TagValue::Str(s)
    }
}

impl From<i32> for TagValue {
    fn from(i: i32) -> TagValue {
        TagValue::Int(i)
    }
}

impl From<i64> for TagValue {
    fn from(l: i64) -> TagValue {
        TagValue::Long(l)
    }
}

impl From<f32> for TagValue {
    fn from(v: f32) -> TagValue {
        TagValue::Float(v)
    }
}

impl From<f64> for TagValue {
    fn from(v: f64) -> TagValue {
        TagValue::Double(v)
    }
}

impl From<bool> for TagValue {
    fn from(b: bool) -> TagValue {
        TagValue::Bool(b)
    }
}

/// Span outcome code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Unset,
    Ok,
    Error,
}

impl Default for StatusCode {
    fn default() -> Self {
        StatusCode::Unset
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpanStatus {
    pub code: StatusCode,
    pub description: Option<String>,
}

impl SpanStatus {
    pub fn ok() -> SpanStatus {
        SpanStatus {
            code: StatusCode::Ok,
            description: None,
        }
    }

    pub fn error(description: Option<String>) -> SpanStatus {
        SpanStatus {
            code: StatusCode::Error,
            description,
        }
    }
}

/// A finished span as handed over by the tracer runtime. Timestamps carrying
/// an offset are normalized to UTC before they reach this model.
#[derive(Debug, Clone)]
pub struct Span {
    pub trace_id: TraceId,
    pub id: u64,
    pub parent_id: Option<u64>,
    pub name: String,
    pub service: String,
    pub start: DateTime<Utc>,
    pub duration: Duration,
    pub tags: HashMap<String, TagValue>,
    pub status: SpanStatus,
}

impl Span {
    pub fn get_tag(&self, key: &str) -> Option<&TagValue> {
        self.tags.get(key)
    }
}
