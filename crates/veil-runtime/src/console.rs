//! Console sink for VEIL diagnostics.
//!
//! A `tracing` layer that renders events from `veil::*` targets. Diagnostic
//! events (carrying `source`, `kind` and `detail` fields) are rendered as
//! `[ source ] Kind: message`; everything else as `LEVEL target: message`.

use std::io::{self, Write};
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};
use veil_core::render_labeled;

use crate::{ConsoleConfig, RuntimeError, RuntimeResult};

/// First accepted config and whether its sink became the global subscriber
static INIT: OnceLock<(ConsoleConfig, bool)> = OnceLock::new();

/// Install the console sink as the global subscriber.
///
/// Only the first enabled call has effect; later configs are ignored. Returns
/// whether the VEIL sink is the installed subscriber; `false` when disabled
/// or when the host application installed its own first.
pub fn init(config: &ConsoleConfig) -> RuntimeResult<bool> {
    if !config.enabled {
        return Ok(false);
    }

    let filter = EnvFilter::try_new(&config.directive).map_err(|err| {
        RuntimeError::InvalidFilter {
            directive: config.directive.clone(),
            reason: err.to_string(),
        }
    })?;
    let styled = config.styled;

    let (first, installed) = INIT.get_or_init(move || {
        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(DiagnosticConsoleLayer::new(styled))
            .try_init()
            .is_ok();
        (config.clone(), installed)
    });
    if first != config {
        tracing::debug!(
            target: "veil::runtime",
            directive = %config.directive,
            styled = config.styled,
            "console already initialized, ignoring new config"
        );
    }
    Ok(*installed)
}

/// A tracing layer that renders VEIL events to a writer (stderr by default)
pub struct DiagnosticConsoleLayer<W = fn() -> io::Stderr> {
    styled: bool,
    writer: W,
}

impl DiagnosticConsoleLayer {
    pub fn new(styled: bool) -> Self {
        DiagnosticConsoleLayer {
            styled,
            writer: io::stderr,
        }
    }
}

impl<W> DiagnosticConsoleLayer<W> {
    pub fn with_writer<W2>(self, writer: W2) -> DiagnosticConsoleLayer<W2>
    where
        W2: for<'a> MakeWriter<'a> + 'static,
    {
        DiagnosticConsoleLayer {
            styled: self.styled,
            writer,
        }
    }
}

impl<S, W> Layer<S> for DiagnosticConsoleLayer<W>
where
    S: Subscriber,
    W: for<'a> MakeWriter<'a> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        if !target.starts_with("veil::") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level(), target, self.styled);
        let _ = writeln!(self.writer.make_writer(), "{}", output);
    }
}

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    source: Option<String>,
    kind: Option<String>,
    detail: Option<String>,
}

impl EventVisitor {
    fn store(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            "source" => self.source = Some(value),
            "kind" => self.kind = Some(value),
            "detail" => self.detail = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.store(field, format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.store(field, value.to_string());
    }
}

fn format_event(v: &EventVisitor, level: Level, target: &str, styled: bool) -> String {
    if let (Some(source), Some(kind), Some(detail)) = (&v.source, &v.kind, &v.detail) {
        return render_labeled(source, kind, detail, styled);
    }

    let message = v.message.as_deref().unwrap_or("");
    let level = format!("{:>5}", level.as_str());
    if !styled {
        return format!("{} {}: {}", level, target, message);
    }
    format!(
        "{} {}: {}",
        style_level(&level),
        target.bright_black(),
        message
    )
}

fn style_level(level: &str) -> String {
    match level.trim_start() {
        "ERROR" => level.bright_red().bold().to_string(),
        "WARN" => level.yellow().to_string(),
        "INFO" => level.green().to_string(),
        "DEBUG" => level.blue().to_string(),
        _ => level.bright_black().to_string(),
    }
}
