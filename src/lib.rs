pub mod jaeger;
pub mod model;
pub mod time;
pub mod zipkin;

pub use crate::{
    jaeger::{JaegerSpan, JaegerTag, JaegerTagKind},
    model::{Span, SpanStatus, StatusCode, TagValue, TraceId},
    zipkin::{Config, ZipkinSerializer, ZipkinSpan},
};
