//! Stream session controller.
//!
//! Holds exactly one logical turn of UI state: `Idle --send--> Streaming
//! --done|error--> Idle`. Push events mutate the single assistant message of
//! the running turn; steering sends fold into that same message.

use std::time::{Duration, Instant};

use malleable_config::{ChatConfig, SendPolicy};
use tracing::{debug, info, warn};

use crate::assistant::{Assistant, PushEvent};
use crate::attachment::PendingAttachments;
use crate::error::{Result, SessionError};
use crate::message::{ContentPart, Message, TextStyle};
use crate::tool::ToolIndicator;

/// Error reported when an abort is not answered by a terminal event in time.
pub const ABORT_TIMEOUT_MESSAGE: &str = "aborted: assistant did not respond";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Streaming,
}

/// What a successful send did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Opened a new turn.
    Started,
    /// Folded into the running turn.
    Steered,
}

pub struct StreamSession {
    log: Vec<Message>,
    phase: Phase,
    /// Index of the running turn's assistant message in `log`.
    turn: Option<usize>,
    accumulated: String,
    /// Index of the open text part inside the turn's message.
    open_text: Option<usize>,
    typing: bool,
    abort_deadline: Option<Instant>,
    policy: SendPolicy,
    abort_timeout: Duration,
    pending: PendingAttachments,
}

impl StreamSession {
    pub fn new(policy: SendPolicy, abort_timeout: Duration) -> Self {
        Self {
            log: Vec::new(),
            phase: Phase::Idle,
            turn: None,
            accumulated: String::new(),
            open_text: None,
            typing: false,
            abort_deadline: None,
            policy,
            abort_timeout,
            pending: PendingAttachments::default(),
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(config.send_policy, config.abort_timeout())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_streaming(&self) -> bool {
        self.phase == Phase::Streaming
    }

    pub fn messages(&self) -> &[Message] {
        &self.log
    }

    /// Text streamed into the open text block so far.
    pub fn accumulated_text(&self) -> &str {
        &self.accumulated
    }

    /// The turn's message is open but nothing has arrived yet.
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn abort_deadline(&self) -> Option<Instant> {
        self.abort_deadline
    }

    pub fn pending(&self) -> &PendingAttachments {
        &self.pending
    }

    pub fn pending_mut(&mut self) -> &mut PendingAttachments {
        &mut self.pending
    }

    pub fn can_send(&self, draft: &str) -> bool {
        self.pending.can_send(draft)
    }

    /// Send `text` plus any pending attachments.
    ///
    /// While streaming, the send either steers the running turn or fails with
    /// [`SessionError::Busy`] depending on the configured policy. A synchronous
    /// rejection by the assistant paints the error into the turn and ends it.
    pub fn send<A: Assistant + ?Sized>(
        &mut self,
        assistant: &mut A,
        text: &str,
    ) -> Result<SendOutcome> {
        let text = text.trim();
        if !self.can_send(text) {
            return Err(SessionError::Empty);
        }
        if self.is_streaming() && self.policy == SendPolicy::Reject {
            return Err(SessionError::Busy);
        }

        let outcome = if self.is_streaming() {
            SendOutcome::Steered
        } else {
            SendOutcome::Started
        };

        let images = self.pending.take();
        let sent = assistant.send(text, &images);
        let image_count = images.len();
        self.log.push(Message::user(text, images));
        if outcome == SendOutcome::Started {
            self.open_turn();
        }

        if let Err(err) = sent {
            warn!(%err, "send failed");
            self.fail(&err.to_string());
            return Err(err.into());
        }
        info!(?outcome, chars = text.len(), images = image_count, "message sent");
        Ok(outcome)
    }

    /// Apply one push event. Returns `false` if the event was ignored.
    pub fn apply(&mut self, event: &PushEvent) -> bool {
        if !self.is_streaming() {
            debug!(?event, "ignoring push event outside a turn");
            return false;
        }
        match event {
            PushEvent::TextDelta(delta) => self.on_delta(delta),
            PushEvent::ToolStart { name, args } => {
                self.typing = false;
                self.close_text();
                self.turn_message_mut()
                    .content
                    .push(ContentPart::Tool(ToolIndicator::running(name.clone(), args)));
            }
            PushEvent::ToolEnd { name, is_error } => {
                let resolved = self.turn_message_mut().content.iter_mut().rev().find_map(
                    |part| match part {
                        ContentPart::Tool(tool) if tool.name == *name && tool.is_running() => {
                            Some(tool)
                        }
                        _ => None,
                    },
                );
                match resolved {
                    Some(tool) => {
                        tool.finish(*is_error);
                    }
                    None => {
                        debug!(%name, "tool end without a running indicator");
                        return false;
                    }
                }
            }
            PushEvent::Render(_) => return false,
            PushEvent::Done(final_text) => {
                let streamed = !self.turn_message_mut().text().is_empty();
                if !streamed && !final_text.is_empty() {
                    self.on_delta(final_text);
                }
                self.finish();
            }
            PushEvent::Error(message) => self.fail(message),
        }
        true
    }

    /// Request cancellation. The turn stays open until a terminal event
    /// arrives or [`poll_watchdog`](Self::poll_watchdog) gives up on it.
    pub fn abort<A: Assistant + ?Sized>(&mut self, assistant: &mut A, now: Instant) {
        if !self.is_streaming() {
            return;
        }
        assistant.abort();
        if self.abort_deadline.is_none() {
            self.abort_deadline = Some(now + self.abort_timeout);
            info!(timeout_ms = self.abort_timeout.as_millis() as u64, "abort requested");
        }
    }

    /// End an aborted turn locally once its deadline has passed.
    pub fn poll_watchdog(&mut self, now: Instant) -> bool {
        match self.abort_deadline {
            Some(deadline) if self.is_streaming() && now >= deadline => {
                warn!("no terminal event after abort");
                self.apply(&PushEvent::Error(ABORT_TIMEOUT_MESSAGE.to_string()))
            }
            _ => false,
        }
    }

    /// Reset both the assistant's log and the local mirror.
    pub fn clear<A: Assistant + ?Sized>(&mut self, assistant: &mut A) -> Result<()> {
        if self.is_streaming() {
            return Err(SessionError::Busy);
        }
        assistant.clear();
        self.log.clear();
        Ok(())
    }

    fn open_turn(&mut self) {
        self.log.push(Message::assistant());
        self.turn = Some(self.log.len() - 1);
        self.accumulated.clear();
        self.open_text = None;
        self.typing = true;
        self.abort_deadline = None;
        self.phase = Phase::Streaming;
    }

    fn on_delta(&mut self, delta: &str) {
        self.typing = false;
        self.accumulated.push_str(delta);
        let text = self.accumulated.clone();
        let open = self.open_text;
        let content = &mut self.turn_message_mut().content;
        match open.and_then(|i| content.get_mut(i)) {
            Some(ContentPart::Text { text: current, .. }) => *current = text,
            _ => {
                content.push(ContentPart::Text {
                    text,
                    style: TextStyle::Normal,
                });
                self.open_text = Some(self.turn_message_mut().content.len() - 1);
            }
        }
    }

    fn close_text(&mut self) {
        self.open_text = None;
        self.accumulated.clear();
    }

    /// Paint the open text block (or a new one) with the error and end the turn.
    fn fail(&mut self, message: &str) {
        let painted = ContentPart::Text {
            text: format!("Error: {message}"),
            style: TextStyle::Error,
        };
        let open = self.open_text;
        let content = &mut self.turn_message_mut().content;
        match open.and_then(|i| content.get_mut(i)) {
            Some(part) => *part = painted,
            None => content.push(painted),
        }
        self.finish();
    }

    fn finish(&mut self) {
        self.phase = Phase::Idle;
        self.turn = None;
        self.close_text();
        self.typing = false;
        self.abort_deadline = None;
    }

    fn turn_message_mut(&mut self) -> &mut Message {
        let index = match self.turn {
            Some(index) if index < self.log.len() => index,
            _ => {
                self.log.push(Message::assistant());
                self.log.len() - 1
            }
        };
        self.turn = Some(index);
        &mut self.log[index]
    }
}
