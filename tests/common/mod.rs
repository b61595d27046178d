//! Test utilities for span sequencing assertions.
//!
//! Provides:
//! - A recording `tracing_subscriber::Layer` that captures span lifecycles
//! - Helpers for running the app under the recording subscriber

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use fib_telemetry::app::{App, RunError};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// A span lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanEvent {
    Open { name: String, parent: Option<String> },
    Close { name: String },
}

/// Snapshot of a span as it closed.
#[derive(Debug, Clone, Default)]
pub struct SpanRecord {
    pub name: String,
    pub parent: Option<String>,
    pub fields: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct Inner {
    events: Vec<SpanEvent>,
    closed: Vec<SpanRecord>,
    open: HashMap<u64, SpanRecord>,
}

/// Layer recording span opens, field updates and closes in order.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    inner: Arc<Mutex<Inner>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<SpanEvent> {
        self.inner.lock().unwrap().events.clone()
    }

    pub fn closed(&self) -> Vec<SpanRecord> {
        self.inner.lock().unwrap().closed.clone()
    }

    /// Closed spans with the given name, in close order.
    pub fn closed_named(&self, name: &str) -> Vec<SpanRecord> {
        self.closed().into_iter().filter(|s| s.name == name).collect()
    }

    pub fn open_count(&self) -> usize {
        self.inner.lock().unwrap().open.len()
    }
}

struct FieldVisitor<'a>(&'a mut HashMap<String, String>);

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

impl<S> Layer<S> for Recorder
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let name = span.name().to_string();
        let parent = span.parent().map(|p| p.name().to_string());

        let mut record = SpanRecord {
            name: name.clone(),
            parent: parent.clone(),
            fields: HashMap::new(),
        };
        attrs.record(&mut FieldVisitor(&mut record.fields));

        let mut inner = self.inner.lock().unwrap();
        inner.events.push(SpanEvent::Open { name, parent });
        inner.open.insert(id.into_u64(), record);
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(record) = inner.open.get_mut(&id.into_u64()) {
            values.record(&mut FieldVisitor(&mut record.fields));
        }
    }

    fn on_close(&self, id: Id, _ctx: Context<'_, S>) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(record) = inner.open.remove(&id.into_u64()) {
            inner.events.push(SpanEvent::Close {
                name: record.name.clone(),
            });
            inner.closed.push(record);
        }
    }
}

/// Run the app over `input` under a recording subscriber.
pub fn run_recorded(input: &str) -> (Result<u64, RunError>, String, Recorder) {
    let recorder = Recorder::default();
    let subscriber = tracing_subscriber::registry().with(recorder.clone());

    let (result, out) = tracing::subscriber::with_default(subscriber, || {
        let mut app = App::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let result = app.run();
        let (_, out) = app.into_parts();
        (result, out)
    });

    (result, String::from_utf8(out).unwrap(), recorder)
}
