use crate::conversation::{Conversation, Sender};
use crate::gateway::AssistantGateway;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender as EventSender};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Processing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Text(String),
    Image(PathBuf),
    VoiceTranscribe(PathBuf),
}

impl RequestKind {
    fn display(&self) -> String {
        match self {
            RequestKind::Text(text) => text.clone(),
            RequestKind::Image(path) => format!("[Image: {}]", file_name(path)),
            RequestKind::VoiceTranscribe(_) => "[Voice recording]".into(),
        }
    }

    fn status_label(&self) -> &'static str {
        match self {
            RequestKind::Text(_) => "Processing...",
            RequestKind::Image(_) => "Processing image...",
            RequestKind::VoiceTranscribe(_) => "Processing audio...",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted(u64),
    /// Blank text; nothing happened.
    Ignored,
    /// The in-flight limit is reached; nothing happened.
    Busy,
}

/// Events sent from worker threads to the UI thread.
#[derive(Debug, Clone)]
pub enum DispatchEvent {
    Reply { sender: Sender, body: String },
    Finished { request_id: u64, failed: bool },
}

struct PendingRequest {
    id: u64,
    kind: RequestKind,
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Owns the conversation and runs assistant calls off the UI thread.
///
/// Only the thread that owns the dispatcher mutates the log and status;
/// workers report back exclusively through the event channel, drained by
/// [`Dispatcher::process_events`].
pub struct Dispatcher {
    gateway: Arc<dyn AssistantGateway>,
    conversation: Conversation,
    status: SessionStatus,
    /// Status label of every request still running, by id.
    active: BTreeMap<u64, &'static str>,
    last_failed: bool,
    max_in_flight: usize,
    next_id: u64,
    event_tx: EventSender<DispatchEvent>,
    event_rx: Receiver<DispatchEvent>,
    waker: Option<Waker>,
}

impl Dispatcher {
    pub fn new(gateway: Arc<dyn AssistantGateway>, max_in_flight: usize) -> Self {
        let (event_tx, event_rx) = mpsc::channel::<DispatchEvent>();
        Self {
            gateway,
            conversation: Conversation::new(),
            status: SessionStatus::Idle,
            active: BTreeMap::new(),
            last_failed: false,
            max_in_flight: max_in_flight.max(1),
            next_id: 0,
            event_tx,
            event_rx,
            waker: None,
        }
    }

    /// Called by workers after every event so the UI repaints promptly.
    pub fn set_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.waker = Some(Arc::new(waker));
    }

    /// Requests already running keep the backend they started with.
    pub fn set_gateway(&mut self, gateway: Arc<dyn AssistantGateway>) {
        log::info!("assistant backend: {}", gateway.name());
        self.gateway = gateway;
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Names the running request, or stays generic when several overlap.
    pub fn status_label(&self) -> &'static str {
        let mut labels = self.active.values();
        match (labels.next(), labels.next()) {
            (None, _) => "Ready",
            (Some(label), None) => *label,
            (Some(_), Some(_)) => "Processing...",
        }
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        self.active.len()
    }

    /// Whether the most recently finished request ended in an error.
    pub fn last_failed(&self) -> bool {
        self.last_failed
    }

    pub fn submit(&mut self, kind: RequestKind) -> SubmitOutcome {
        let kind = match kind {
            RequestKind::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return SubmitOutcome::Ignored;
                }
                RequestKind::Text(trimmed.to_string())
            }
            other => other,
        };
        if self.active.len() >= self.max_in_flight {
            log::debug!(
                "rejecting request: {} of {} workers busy",
                self.active.len(),
                self.max_in_flight
            );
            return SubmitOutcome::Busy;
        }

        self.next_id += 1;
        let id = self.next_id;
        self.conversation.push(Sender::User, kind.display());
        self.status = SessionStatus::Processing;
        self.active.insert(id, kind.status_label());
        self.last_failed = false;

        let request = PendingRequest { id, kind };
        let gateway = self.gateway.clone();
        let tx = self.event_tx.clone();
        let waker = self.waker.clone();
        std::thread::spawn(move || {
            log::debug!("[worker {}] started", request.id);
            run_request(gateway.as_ref(), request, &tx, waker.as_deref());
        });
        SubmitOutcome::Accepted(id)
    }

    /// Apply every event the workers have queued, in arrival order.
    /// Returns the number of events applied.
    pub fn process_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, event: DispatchEvent) {
        match event {
            DispatchEvent::Reply { sender, body } => self.conversation.push(sender, body),
            DispatchEvent::Finished { request_id, failed } => {
                log::debug!("[worker {}] finished (failed={})", request_id, failed);
                self.active.remove(&request_id);
                self.last_failed = failed;
                if self.active.is_empty() {
                    self.status = SessionStatus::Idle;
                }
            }
        }
    }
}

fn run_request(
    gateway: &dyn AssistantGateway,
    request: PendingRequest,
    tx: &EventSender<DispatchEvent>,
    waker: Option<&(dyn Fn() + Send + Sync)>,
) {
    let send = |event: DispatchEvent| {
        // The receiver only goes away when the window closes.
        let _ = tx.send(event);
        if let Some(wake) = waker {
            wake();
        }
    };

    // A panicking backend still has to produce an Error reply and Finished.
    let result = panic::catch_unwind(AssertUnwindSafe(|| match &request.kind {
        RequestKind::Text(text) => gateway.process_text(text),
        RequestKind::Image(path) => gateway.process_image(path),
        RequestKind::VoiceTranscribe(path) => gateway.process_voice(path).and_then(|heard| {
            send(DispatchEvent::Reply {
                sender: Sender::Transcription,
                body: heard.clone(),
            });
            gateway.process_text(&heard)
        }),
    }))
    .unwrap_or_else(|payload| Err(panic_message(payload.as_ref())));

    let failed = match result {
        Ok(reply) => {
            send(DispatchEvent::Reply {
                sender: Sender::Assistant,
                body: reply,
            });
            false
        }
        Err(e) => {
            log::warn!("[worker {}] assistant error: {}", request.id, e);
            send(DispatchEvent::Reply {
                sender: Sender::Error,
                body: e,
            });
            true
        }
    };
    send(DispatchEvent::Finished {
        request_id: request.id,
        failed,
    });
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".into());
    format!("Assistant crashed: {}", detail)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
