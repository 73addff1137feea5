#![forbid(unsafe_code)]

//! Tracing instrumentation tests.
//!
//!   cargo test -p ftui-devconsole --features tracing --test tracing_tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use ftui_devconsole::{
    ConsoleConfig, ConsoleKey, DetachedHost, DevConsole, MessageKind, NoClipboard,
};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
}

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
    span: Option<String>,
}

#[derive(Default, Clone)]
struct Capture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl Capture {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn messages(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.message).collect()
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
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
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        let span = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
            span,
        });
    }
}

fn with_capture<F>(f: F) -> Capture
where
    F: FnOnce(),
{
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, f);
    capture
}

fn open_console(columns: usize, lines: usize) -> DevConsole {
    let mut console =
        DevConsole::new(columns, lines, ConsoleConfig::default(), Box::new(DetachedHost)).unwrap();
    console.toggle(true);
    while console.tick() {}
    console
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn attach_and_detach_are_logged() {
    let capture = with_capture(|| {
        let console = open_console(20, 6);
        drop(console);
    });
    let events = capture.events();
    let attach = events
        .iter()
        .find(|e| e.message == "developer console attached")
        .expect("attach event");
    assert_eq!(attach.level, tracing::Level::INFO);
    assert_eq!(attach.fields.get("columns").map(String::as_str), Some("20"));
    assert!(capture
        .messages()
        .iter()
        .any(|m| m == "developer console detached"));
}

#[test]
fn resize_runs_inside_span() {
    let capture = with_capture(|| {
        let mut console = open_console(20, 6);
        console.resize(40, 10).unwrap();
    });

    let spans = capture.spans();
    let resize = spans
        .iter()
        .find(|s| s.name == "devconsole.resize")
        .expect("resize span");
    assert_eq!(resize.fields.get("columns").map(String::as_str), Some("40"));
    assert_eq!(resize.fields.get("lines").map(String::as_str), Some("10"));

    let committed = capture
        .events()
        .into_iter()
        .find(|e| e.message == "resize committed")
        .expect("commit event");
    assert_eq!(committed.span.as_deref(), Some("devconsole.resize"));
}

#[test]
fn failed_resize_warns() {
    let capture = with_capture(|| {
        let mut console = open_console(20, 6);
        assert!(console.resize(0, 6).is_err());
    });
    let warn = capture
        .events()
        .into_iter()
        .find(|e| e.level == tracing::Level::WARN)
        .expect("warn event");
    assert!(warn.message.starts_with("resize failed"));
    assert!(warn.fields["error"].contains("invalid console geometry"));
}

#[test]
fn phase_transitions_are_logged() {
    let capture = with_capture(|| {
        let mut console = open_console(20, 6);
        console.toggle(true);
        while console.tick() {}
    });
    let transitions: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.fields.contains_key("from") && e.fields.contains_key("to"))
        .collect();
    // Closed -> Opening -> OpenFull -> Closing -> Closed
    assert_eq!(transitions.len(), 4);
    assert_eq!(transitions[0].fields["to"], "Opening");
    assert_eq!(transitions[3].fields["to"], "Closed");
}

#[test]
fn clipboard_failure_warns() {
    let capture = with_capture(|| {
        let mut console = open_console(40, 6);
        console.paste(&mut NoClipboard);
    });
    let warn = capture
        .events()
        .into_iter()
        .find(|e| e.message == "paste aborted")
        .expect("paste warning");
    assert_eq!(warn.level, tracing::Level::WARN);
}

#[test]
fn submit_is_logged_at_debug() {
    let capture = with_capture(|| {
        let mut console = open_console(20, 6);
        for ch in "help".chars() {
            console.handle_char(ch);
        }
        console.handle_key(ConsoleKey::Enter);
        console.print(Some("done"), MessageKind::Success, true);
    });
    let submitted = capture
        .events()
        .into_iter()
        .find(|e| e.message == "command submitted")
        .expect("submit event");
    assert_eq!(submitted.level, tracing::Level::DEBUG);
    assert_eq!(submitted.fields.get("command").map(String::as_str), Some("help"));
}

#[test]
fn clamped_config_values_warn() {
    let capture = with_capture(|| {
        let config = ConsoleConfig::default()
            .with_history_lines(0)
            .with_flash_period_ticks(0);
        let console = DevConsole::new(20, 6, config, Box::new(DetachedHost)).unwrap();
        assert_eq!(console.config().history_lines, 1);
    });
    let warned: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .map(|e| e.fields["error"].clone())
        .collect();
    assert_eq!(warned.len(), 2);
    assert!(warned[0].starts_with("history_lines=0"));
    assert!(warned[1].starts_with("flash_period_ticks=0"));
}
