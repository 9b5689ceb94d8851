use crate::model::{Span, StatusCode};
use crate::time;
use log::trace;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{self, Write};

/// Tag key surfaced as the dedicated `kind` field instead of a general tag.
pub const SPAN_KIND_TAG: &str = "span.kind";

/// Exporter settings.
#[derive(Clone, Debug)]
pub struct Config {
    /// Service name reported when a span carries a blank one.
    pub default_service_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_service_name: "unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub service_name: String,
}

/// One outbound span object in the Zipkin JSON model, computed once from a
/// source span. Field order matches the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZipkinSpan {
    pub id: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub name: String,
    pub timestamp: i64,
    pub duration: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub local_endpoint: Endpoint,
    pub tags: HashMap<String, String>,
}

impl ZipkinSpan {
    pub fn from_span(span: &Span, config: &Config) -> ZipkinSpan {
        let service_name = if span.service.trim().is_empty() {
            config.default_service_name.clone()
        } else {
            span.service.clone()
        };

        ZipkinSpan {
            id: format!("{:016x}", span.id),
            trace_id: span.trace_id.to_string(),
            parent_id: span.parent_id.map(|id| format!("{:016x}", id)),
            name: span.name.clone(),
            timestamp: time::to_epoch_micros(span.start),
            // Micros without the millisecond truncation the Jaeger record has.
            duration: span.duration.num_microseconds().unwrap_or(i64::MAX),
            // Per Zipkin convention the kind is always upper case.
            kind: span
                .get_tag(SPAN_KIND_TAG)
                .map(|value| value.to_string().to_uppercase()),
            local_endpoint: Endpoint { service_name },
            tags: build_tags(span),
        }
    }
}

fn build_tags(span: &Span) -> HashMap<String, String> {
    let mut tags = HashMap::with_capacity(span.tags.len() + 2);
    for (key, value) in &span.tags {
        if key != SPAN_KIND_TAG {
            tags.insert(key.clone(), value.to_string());
        }
    }

    match span.status.code {
        StatusCode::Ok => {
            tags.insert("otel.status_code".to_string(), "OK".to_string());
        }
        StatusCode::Error => {
            tags.insert("otel.status_code".to_string(), "ERROR".to_string());
            // The description goes under the error key itself, not a boolean.
            tags.insert(
                "error".to_string(),
                span.status.description.clone().unwrap_or_default(),
            );
        }
        StatusCode::Unset => {}
    }

    tags
}

/// Serializes batches of finished traces into the Zipkin v2 JSON array form.
#[derive(Debug, Clone, Default)]
pub struct ZipkinSerializer {
    config: Config,
}

impl ZipkinSerializer {
    pub fn new(config: Config) -> ZipkinSerializer {
        ZipkinSerializer { config }
    }

    /// Writes every span of every trace as one JSON array of UTF-8 bytes,
    /// without a byte order mark. The writer is flushed and left open; its
    /// lifecycle stays with the caller.
    pub fn serialize<W: Write>(&self, writer: &mut W, traces: &[Vec<Span>]) -> io::Result<()> {
        let spans: Vec<ZipkinSpan> = traces
            .iter()
            .flatten()
            .map(|span| ZipkinSpan::from_span(span, &self.config))
            .collect();

        trace!("serializing {} spans as zipkin json", spans.len());
        serde_json::to_writer(&mut *writer, &spans)?;
        writer.flush()
    }
}
