//! In-process assistant used when no external one is attached.
//!
//! Each turn streams the user's message back word by word, then renders a
//! small card onto the canvas whose button talks back through the bridge.
//! Turns run on a private tokio runtime and report through a push-event sink.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Duration;

use malleable_session::{Assistant, AssistantError, Attachment, PushEvent};
use parking_lot::Mutex;
use serde_json::json;
use tokio::runtime::Runtime;
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const STEP_DELAY: Duration = Duration::from_millis(40);

/// Message a turn ends with when it is aborted.
pub const ABORTED: &str = "aborted";

struct Shared {
    history: Vec<String>,
    working_directory: PathBuf,
}

struct Turn {
    steer: mpsc::UnboundedSender<String>,
    cancel: Arc<Notify>,
    task: JoinHandle<()>,
}

pub struct LoopbackAssistant {
    runtime: Runtime,
    sink: Sender<PushEvent>,
    shared: Arc<Mutex<Shared>>,
    turn: Option<Turn>,
    step_delay: Duration,
}

impl LoopbackAssistant {
    pub fn new(sink: Sender<PushEvent>, working_directory: PathBuf) -> Result<Self, AssistantError> {
        let runtime = Runtime::new().map_err(|e| AssistantError::Backend(e.to_string()))?;
        Ok(Self {
            runtime,
            sink,
            shared: Arc::new(Mutex::new(Shared {
                history: Vec::new(),
                working_directory,
            })),
            turn: None,
            step_delay: STEP_DELAY,
        })
    }

    /// Pause between streamed steps.
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    /// Every message received since the last clear, steers included.
    pub fn history(&self) -> Vec<String> {
        self.shared.lock().history.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running_turn().is_some()
    }

    fn running_turn(&self) -> Option<&Turn> {
        self.turn.as_ref().filter(|turn| !turn.task.is_finished())
    }
}

impl Assistant for LoopbackAssistant {
    fn send(&mut self, text: &str, images: &[Attachment]) -> Result<(), AssistantError> {
        let working_directory = {
            let mut shared = self.shared.lock();
            shared.history.push(text.to_string());
            shared.working_directory.clone()
        };

        if let Some(turn) = self.running_turn() {
            if turn.steer.send(text.to_string()).is_ok() {
                debug!("steering running turn");
                return Ok(());
            }
        }

        let (steer, steer_rx) = mpsc::unbounded_channel();
        let cancel = Arc::new(Notify::new());
        let script = Script {
            text: text.to_string(),
            images: images.len(),
            working_directory,
        };
        let task = self.runtime.spawn(run_turn(
            script,
            self.sink.clone(),
            steer_rx,
            Arc::clone(&cancel),
            self.step_delay,
        ));
        info!(images = images.len(), "loopback turn started");
        self.turn = Some(Turn { steer, cancel, task });
        Ok(())
    }

    fn abort(&mut self) {
        if let Some(turn) = self.running_turn() {
            turn.cancel.notify_one();
        }
    }

    fn clear(&mut self) {
        self.shared.lock().history.clear();
    }

    fn working_directory(&self) -> PathBuf {
        self.shared.lock().working_directory.clone()
    }

    fn set_working_directory(&mut self, path: &Path) -> Result<(), AssistantError> {
        if !path.is_dir() {
            return Err(AssistantError::Rejected(format!(
                "{} is not a directory",
                path.display()
            )));
        }
        self.shared.lock().working_directory = path.to_path_buf();
        info!(path = %path.display(), "working directory changed");
        Ok(())
    }
}

struct Script {
    text: String,
    images: usize,
    working_directory: PathBuf,
}

impl Script {
    fn reply(&self) -> String {
        match self.images {
            0 => format!("You said: {}", self.text),
            1 => format!("You said: {} (with 1 image)", self.text),
            n => format!("You said: {} (with {n} images)", self.text),
        }
    }

    fn card(&self) -> String {
        format!(
            concat!(
                "<!doctype html><html><head><title>Loopback</title>",
                "<style>body{{margin:0;padding:48px;background:#16181d;color:#e6e6e6;font:16px system-ui}}",
                "button{{margin-top:24px;padding:8px 16px}}</style></head>",
                "<body><h1>{}</h1><p>{}</p>",
                "<button onclick=\"window.malleable.sendChat('run tests')\">Run tests</button>",
                "</body></html>"
            ),
            escape_html(&self.text),
            escape_html(&self.working_directory.display().to_string()),
        )
    }
}

fn emit(sink: &Sender<PushEvent>, event: PushEvent) {
    if sink.send(event).is_err() {
        warn!("push event dropped: receiver is gone");
    }
}

async fn run_turn(
    script: Script,
    sink: Sender<PushEvent>,
    mut steer: mpsc::UnboundedReceiver<String>,
    cancel: Arc<Notify>,
    step_delay: Duration,
) {
    tokio::select! {
        biased;
        _ = cancel.notified() => {
            info!("loopback turn aborted");
            emit(&sink, PushEvent::Error(ABORTED.to_string()));
        }
        _ = stream(&script, &sink, &mut steer, step_delay) => {}
    }
}

async fn stream(
    script: &Script,
    sink: &Sender<PushEvent>,
    steer: &mut mpsc::UnboundedReceiver<String>,
    step_delay: Duration,
) {
    let reply = script.reply();
    for word in reply.split_inclusive(' ') {
        tokio::time::sleep(step_delay).await;
        emit(sink, PushEvent::TextDelta(word.to_string()));
        note_steers(sink, steer);
    }

    emit(
        sink,
        PushEvent::ToolStart {
            name: "render".to_string(),
            args: json!({ "title": script.text }),
        },
    );
    tokio::time::sleep(step_delay).await;
    emit(sink, PushEvent::Render(script.card()));
    emit(
        sink,
        PushEvent::ToolEnd {
            name: "render".to_string(),
            is_error: false,
        },
    );
    // Steers sent after this point are refused and start a new turn.
    steer.close();
    note_steers(sink, steer);
    emit(sink, PushEvent::Done(reply));
}

fn note_steers(sink: &Sender<PushEvent>, steer: &mut mpsc::UnboundedReceiver<String>) {
    while let Ok(note) = steer.try_recv() {
        emit(sink, PushEvent::TextDelta(format!(" [noted: {note}] ")));
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
