//! Routes `tracing` events to the browser console.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use wasm_bindgen::JsValue;

/// Collects the message and structured fields of one event.
#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: String,
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

pub struct ConsoleLayer {
    max_level: Level,
}

impl ConsoleLayer {
    pub fn new(max_level: Level) -> Self {
        Self { max_level }
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        // Level ordering: TRACE > DEBUG > ... > ERROR
        if *meta.level() > self.max_level {
            return;
        }
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        let line = JsValue::from_str(&format!(
            "[{}] {}: {}{}",
            meta.level(),
            meta.target(),
            visitor.message,
            visitor.fields
        ));
        match *meta.level() {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }
}

/// Install the console subscriber. Safe to call more than once.
pub fn init(max_level: Level) {
    use tracing_subscriber::prelude::*;
    let _ = tracing_subscriber::registry()
        .with(ConsoleLayer::new(max_level))
        .try_init();
}
