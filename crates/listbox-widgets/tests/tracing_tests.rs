#![forbid(unsafe_code)]

//! Tracing span instrumentation tests.
//!
//! Spans enabled:
//!   cargo test -p listbox-widgets --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p listbox-widgets --test tracing_tests -- zero_overhead

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use common::{RecordingHost, TestContent, config};
#[cfg(feature = "tracing")]
use listbox_core::config::ScrollbarMode;
use listbox_core::geometry::Size;
use listbox_core::movement::Movement;
use listbox_widgets::ListboxView;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
    parent_name: Option<String>,
}

#[allow(dead_code)]
impl CapturedSpan {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

struct SpanCapture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

struct CaptureHandle {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    fn named(&self, name: &str) -> Vec<CapturedSpan> {
        self.spans().into_iter().filter(|s| s.name == name).collect()
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);

        let parent_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());

        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }
}

fn with_captured_spans<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let layer = SpanCapture {
        spans: spans.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { spans }
}

type View = ListboxView<TestContent, RecordingHost>;

fn view(len: usize, ipp: u16) -> View {
    let config = config();
    let content = TestContent::new(len);
    let mut view = ListboxView::with_content(config, content, RecordingHost::default());
    view.resize(Size::new(100, ipp * config.item_height));
    view
}

// ============================================================================
// Span tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn move_span_records_command_and_state_before_move() {
    let mut view = view(10, 4);
    let handle = with_captured_spans(|| {
        view.move_selection(Movement::PageDown);
        view.move_selection(Movement::MoveUp);
    });

    let moves = handle.named("listbox_move");
    assert_eq!(moves.len(), 2, "got {moves:?}");

    assert_eq!(moves[0].field("movement"), Some("pageDown"));
    assert_eq!(moves[0].field("selected"), Some("0"));
    assert_eq!(moves[0].field("top"), Some("0"));
    assert_eq!(moves[0].field("size"), Some("10"));

    assert_eq!(moves[1].field("movement"), Some("moveUp"));
    assert_eq!(moves[1].field("selected"), Some("4"));
    assert_eq!(moves[1].field("top"), Some("4"));
}

#[test]
#[cfg(feature = "tracing")]
fn mutation_hooks_run_inside_a_move_span() {
    let mut view = view(10, 4);
    let handle = with_captured_spans(|| {
        if let Some(content) = view.content_mut() {
            content.remove(0);
        }
        view.entry_removed(0);
    });

    let moves = handle.named("listbox_move");
    assert_eq!(moves.len(), 1, "got {moves:?}");
    assert_eq!(moves[0].field("movement"), Some("justCheck"));
    assert_eq!(moves[0].field("size"), Some("9"));
}

#[test]
#[cfg(feature = "tracing")]
fn empty_content_skips_move_span() {
    let mut view = view(0, 4);
    let handle = with_captured_spans(|| {
        view.move_selection(Movement::MoveDown);
    });
    assert!(handle.named("listbox_move").is_empty());
}

#[test]
#[cfg(feature = "tracing")]
fn paint_span_counts_rows() {
    let mut view = view(10, 4);
    view.set_scrollbar_mode(ScrollbarMode::Never);
    view.move_selection(Movement::PageDown);
    let handle = with_captured_spans(|| {
        let mut surface = common::RecordingSurface::default();
        view.paint(&mut surface);
        assert_eq!(surface.rows.len(), 5);
    });

    let paints = handle.named("listbox_paint");
    assert_eq!(paints.len(), 1, "got {paints:?}");
    let paint = &paints[0];
    assert_eq!(paint.field("top"), Some("4"));
    assert_eq!(paint.field("selected"), Some("4"));
    assert_eq!(paint.field("rows"), Some("5"));
    assert_eq!(paint.field("size"), Some("10"));
    assert_eq!(paint.parent_name, None);
}

/// Without `--features tracing` the span blocks are compiled out.
#[test]
fn zero_overhead_when_disabled() {
    let mut view = view(20, 5);
    let handle = with_captured_spans(|| {
        for movement in Movement::ALL {
            view.move_selection(movement);
        }
        let mut surface = common::RecordingSurface::default();
        view.paint(&mut surface);
    });

    let ours: Vec<_> = handle
        .spans()
        .into_iter()
        .filter(|s| s.name.starts_with("listbox_"))
        .collect();

    #[cfg(feature = "tracing")]
    assert!(
        ours.len() > Movement::ALL.len(),
        "With tracing feature, move and paint spans should be present"
    );

    #[cfg(not(feature = "tracing"))]
    assert!(
        ours.is_empty(),
        "Without tracing feature, no listbox spans should exist (got {})",
        ours.len()
    );
}
