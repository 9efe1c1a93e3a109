//! Diagnostic reporting for open failures, parse failures and fallbacks.
//!
//! Every diagnostic is emitted as a `tracing` event. In addition, a single
//! process-wide [`DiagnosticSink`] can be installed with
//! [`set_diagnostic_sink`]; it receives the same events and can be replaced
//! or removed at any time.
//!
//! Components do not read the process-wide sink directly. They hold a
//! [`Diagnostics`] handle which either forwards to the installed sink
//! ([`Diagnostics::global`], the default), to a specific sink
//! ([`Diagnostics::with_sink`]), or nowhere ([`Diagnostics::none`]).
//!
//! Reporting never changes control flow.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Severity of a diagnostic event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warn => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// A single diagnostic event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// Receiver of diagnostic events.
///
/// Any `Fn(&Diagnostic) + Send + Sync` closure is a sink; its captured state
/// plays the role of the handler context.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn report(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

static GLOBAL_SINK: RwLock<Option<Arc<dyn DiagnosticSink>>> = RwLock::new(None);

/// Installs, replaces (`Some`) or removes (`None`) the process-wide sink.
pub fn set_diagnostic_sink(sink: Option<Arc<dyn DiagnosticSink>>) {
    let mut slot = GLOBAL_SINK.write().unwrap_or_else(PoisonError::into_inner);
    *slot = sink;
}

/// Removes the process-wide sink. Equivalent to `set_diagnostic_sink(None)`.
pub fn clear_diagnostic_sink() {
    set_diagnostic_sink(None);
}

fn global_sink() -> Option<Arc<dyn DiagnosticSink>> {
    GLOBAL_SINK
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

#[derive(Clone, Default)]
enum Target {
    #[default]
    Global,
    Detached,
    Sink(Arc<dyn DiagnosticSink>),
}

/// Handle through which components report diagnostics.
#[derive(Clone, Default)]
pub struct Diagnostics {
    target: Target,
}

impl Diagnostics {
    /// Forwards to the process-wide sink installed at report time.
    pub fn global() -> Self {
        Self {
            target: Target::Global,
        }
    }

    /// Emits `tracing` events only.
    pub fn none() -> Self {
        Self {
            target: Target::Detached,
        }
    }

    /// Forwards to `sink`, ignoring the process-wide one.
    pub fn with_sink(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            target: Target::Sink(sink),
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.report(Severity::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.report(Severity::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.report(Severity::Error, message);
    }

    /// Emits a `tracing` event and forwards the diagnostic to the target sink.
    pub fn report(&self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Info => tracing::info!("{}", message),
            Severity::Warn => tracing::warn!("{}", message),
            Severity::Error => tracing::error!("{}", message),
        }

        let sink = match &self.target {
            Target::Global => global_sink(),
            Target::Detached => None,
            Target::Sink(sink) => Some(Arc::clone(sink)),
        };
        if let Some(sink) = sink {
            sink.report(&Diagnostic { severity, message });
        }
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match self.target {
            Target::Global => "global",
            Target::Detached => "none",
            Target::Sink(_) => "sink",
        };
        f.debug_struct("Diagnostics").field("target", &target).finish()
    }
}

/// Test helper: a handle whose events are collected into a shared vector.
#[cfg(test)]
pub(crate) fn capture() -> (Diagnostics, Arc<std::sync::Mutex<Vec<Diagnostic>>>) {
    let events = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink_events = Arc::clone(&events);
    let diag = Diagnostics::with_sink(Arc::new(move |d: &Diagnostic| {
        sink_events.lock().unwrap().push(d.clone());
    }));
    (diag, events)
}
