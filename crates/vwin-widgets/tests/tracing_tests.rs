#![forbid(unsafe_code)]

//! Tracing instrumentation tests.
//!
//! Spans and events enabled:
//!   cargo test -p vwin-widgets --features tracing --test tracing_tests
//!
//! Without the feature only the zero-overhead tests run.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use vwin_core::device::StaticDevice;
use vwin_core::event::{Event, ScrollEvent};
use vwin_core::geometry::ViewportState;
use vwin_widgets::config::WindowConfig;
#[cfg(feature = "tracing")]
use vwin_widgets::virtualized::VirtualizedList;
use vwin_widgets::virtualized::VirtualizedState;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured span or event with its fields.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct Captured {
    name: String,
    level: tracing::Level,
    fields: HashMap<String, String>,
    parent_name: Option<String>,
}

#[derive(Clone, Default)]
struct CaptureHandle {
    spans: Arc<Mutex<Vec<Captured>>>,
    events: Arc<Mutex<Vec<Captured>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<Captured> {
        self.spans.lock().unwrap().clone()
    }

    fn events(&self) -> Vec<Captured> {
        self.events.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    fn event_with_message(&self, needle: &str) -> Option<Captured> {
        self.events().into_iter().find(|e| {
            e.fields
                .get("message")
                .is_some_and(|m| m.contains(needle))
        })
    }
}

/// Layer recording span creation and events.
struct Capture(CaptureHandle);

/// Visitor that extracts fields as strings.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
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
            .map(|span| span.name().to_string());
        self.0.spans.lock().unwrap().push(Captured {
            name: attrs.metadata().name().to_string(),
            level: *attrs.metadata().level(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let parent_name = ctx
            .event_span(event)
            .map(|span| span.name().to_string());
        self.0.events.lock().unwrap().push(Captured {
            name: event.metadata().name().to_string(),
            level: *event.metadata().level(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }
}

fn with_capture<F: FnOnce()>(f: F) -> CaptureHandle {
    let handle = CaptureHandle::default();
    let subscriber = tracing_subscriber::registry().with(Capture(handle.clone()));
    tracing::subscriber::with_default(subscriber, f);
    handle
}

const DESKTOP: StaticDevice = StaticDevice(false);

fn measured(total: usize) -> VirtualizedState {
    let mut state = VirtualizedState::new(50.0, total, WindowConfig::default());
    state.apply_event(&Event::Attach(ViewportState::new(0.0, 600.0, 800.0)));
    state
}

// ============================================================================
// Span tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn recompute_emits_span_with_inputs() {
    let handle = with_capture(|| {
        let mut state = measured(1000);
        state.apply_event(&Event::Scroll(ScrollEvent::new(2000.0)));
        state.recompute(&DESKTOP);
    });

    let spans = handle.spans();
    let recompute: Vec<_> = spans.iter().filter(|s| s.name == "window_recompute").collect();
    assert_eq!(recompute.len(), 1, "spans: {spans:?}");
    let span = recompute[0];
    assert_eq!(span.level, tracing::Level::DEBUG);
    assert_eq!(span.fields.get("total").map(String::as_str), Some("1000"));
    assert_eq!(span.fields.get("columns").map(String::as_str), Some("1"));
    assert_eq!(span.fields.get("offset").map(String::as_str), Some("2000"));

    let done = handle
        .event_with_message("window recomputed")
        .expect("recompute event");
    assert_eq!(done.parent_name.as_deref(), Some("window_recompute"));
    assert_eq!(done.fields.get("start").map(String::as_str), Some("38"));
    assert_eq!(done.fields.get("count").map(String::as_str), Some("16"));
}

#[test]
#[cfg(feature = "tracing")]
fn render_span_reports_range() {
    let items: Vec<u32> = (0..1000).collect();
    let handle = with_capture(|| {
        let mut state = measured(items.len());
        state.recompute(&DESKTOP);
        let _ = VirtualizedList::new(&items).render(&state, |_, v| *v);
    });
    let render = handle
        .spans()
        .into_iter()
        .find(|s| s.name == "virtualized_render")
        .expect("render span");
    assert_eq!(render.fields.get("start").map(String::as_str), Some("0"));
    assert_eq!(render.fields.get("end").map(String::as_str), Some("16"));
    assert_eq!(render.parent_name, None);
}

// ============================================================================
// Event tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn fallback_is_logged_at_debug() {
    let handle = with_capture(|| {
        let mut state = measured(10);
        state.recompute(&DESKTOP);
    });
    let skipped = handle
        .event_with_message("windowing skipped")
        .expect("fallback event");
    assert_eq!(skipped.level, tracing::Level::DEBUG);
    assert_eq!(
        skipped.fields.get("reason").map(String::as_str),
        Some("below threshold")
    );
}

#[test]
#[cfg(feature = "tracing")]
fn malformed_inputs_warn() {
    let handle = with_capture(|| {
        let mut state = measured(1000);
        state.set_item_extent(f64::NAN);
        state.recompute(&DESKTOP);
        assert_eq!(state.window().visible_count, 1000);
    });
    let warn = handle
        .events()
        .into_iter()
        .find(|e| e.level == tracing::Level::WARN)
        .expect("warn event");
    assert!(warn.fields.get("err").is_some_and(|e| e.contains("item extent")));
}

#[test]
#[cfg(feature = "tracing")]
fn lifecycle_transitions_log_info() {
    let handle = with_capture(|| {
        let mut state = measured(1000);
        state.recompute(&DESKTOP);
        state.unmount();
        state.unmount();
    });
    let infos: Vec<_> = handle
        .events()
        .into_iter()
        .filter(|e| e.level == tracing::Level::INFO)
        .collect();
    assert!(
        infos
            .iter()
            .any(|e| e.fields.get("message").is_some_and(|m| m.contains("phase change")))
    );
    let unmounts = infos
        .iter()
        .filter(|e| e.fields.get("message").is_some_and(|m| m.contains("unmounted")))
        .count();
    assert_eq!(unmounts, 1);
}

// ============================================================================
// Zero-overhead tests
// ============================================================================

#[test]
fn zero_overhead_without_subscriber_calls() {
    // Without the feature nothing reaches the subscriber.
    let handle = with_capture(|| {
        let mut state = measured(1000);
        state.recompute(&DESKTOP);
    });
    if cfg!(feature = "tracing") {
        assert!(!handle.spans().is_empty());
    } else {
        assert!(handle.spans().is_empty());
        assert!(handle.events().is_empty());
    }
}

#[test]
fn zero_overhead_recompute_still_computes() {
    let mut state = measured(1000);
    state.apply_event(&Event::Scroll(ScrollEvent::new(2000.0)));
    assert_eq!(state.recompute(&DESKTOP).start_index, 38);
}
