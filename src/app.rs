//! Application host: routes window input between the chat panel and the
//! canvas, drains assistant push events, and keeps the content surface in
//! step with the conversation.

use std::sync::mpsc::Receiver;
use std::time::Instant;

use malleable_bridge::{BridgeError, ContentHost, ContentSurface};
use malleable_canvas::{
    Action, CanvasController, InteractionMode, KeyCode, KeyEvent, MouseButton, Point,
    PointerEvent, WheelEvent,
};
use malleable_config::{MalleableConfig, Theme};
use malleable_session::{
    Assistant, AssistantError, Attachment, DirectoryPick, PushEvent, SendOutcome, SessionError,
    StreamSession,
};
use malleable_window::InputEvent;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::layout::{ZoneId, ZoneLayout, clamp_panel_width};
use crate::workdir::CwdIndicator;

/// Work the window shell has to carry out after the host handled something.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Canvas(Action),
    Relayout(ZoneLayout),
    FocusChatInput,
    /// New content went to the surface; acknowledge with
    /// [`App::content_loaded`] once the host has finished loading it.
    ContentPushed,
    OpenFolderDialog,
    /// Conversation state changed.
    Repaint,
}

/// Which zone owns the pointer between press and release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    None,
    Divider,
    Canvas,
}

pub struct App<H, A> {
    layout: ZoneLayout,
    panel_width: f64,
    canvas: CanvasController,
    surface: ContentSurface<H>,
    session: StreamSession,
    assistant: A,
    events: Receiver<PushEvent>,
    cwd: CwdIndicator,
    draft: String,
    capture: Capture,
    title: String,
}

impl<H: ContentHost, A: Assistant> App<H, A> {
    pub fn new(
        config: &MalleableConfig,
        host: H,
        assistant: A,
        events: Receiver<PushEvent>,
        width: f64,
        height: f64,
    ) -> Self {
        let panel_width = f64::from(config.chat.panel_width);
        let layout = ZoneLayout::calculate(width, height, panel_width);
        let cwd = CwdIndicator::new(assistant.working_directory());
        Self {
            canvas: CanvasController::new(layout.canvas.w, layout.canvas.h),
            layout,
            panel_width,
            surface: ContentSurface::new(host, config.appearance.theme),
            session: StreamSession::from_config(&config.chat),
            assistant,
            events,
            cwd,
            draft: String::new(),
            capture: Capture::None,
            title: config.window.title.clone(),
        }
    }

    pub fn layout(&self) -> &ZoneLayout {
        &self.layout
    }

    pub fn canvas(&self) -> &CanvasController {
        &self.canvas
    }

    pub fn session(&self) -> &StreamSession {
        &self.session
    }

    pub fn surface(&self) -> &ContentSurface<H> {
        &self.surface
    }

    pub fn assistant(&self) -> &A {
        &self.assistant
    }

    pub fn cwd(&self) -> &CwdIndicator {
        &self.cwd
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Window title with the current zoom, e.g. `"Malleable (150%)"`.
    pub fn title(&self) -> String {
        format!("{} ({})", self.title, self.canvas.viewport_state().zoom_label())
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Vec<Effect> {
        self.relayout(width, height)
    }

    fn relayout(&mut self, width: f64, height: f64) -> Vec<Effect> {
        self.layout = ZoneLayout::calculate(width, height, self.panel_width);
        self.canvas
            .set_viewport_size(self.layout.canvas.w, self.layout.canvas.h);
        vec![
            Effect::Relayout(self.layout),
            Effect::Canvas(self.canvas.render_transform()),
        ]
    }

    pub fn on_input(&mut self, event: InputEvent) -> Vec<Effect> {
        match event {
            InputEvent::PointerDown(e) => self.pointer_down(e),
            InputEvent::PointerMove(p) => self.pointer_move(p),
            InputEvent::PointerUp(p) => self.pointer_up(p),
            InputEvent::Wheel(w) => self.wheel(w),
            InputEvent::Key(k) => self.key(k),
        }
    }

    fn pointer_down(&mut self, event: PointerEvent) -> Vec<Effect> {
        let zone = self.layout.zone_at(event.position);
        if zone == Some(ZoneId::Canvas) {
            self.capture = Capture::Canvas;
            let local = PointerEvent {
                position: self.layout.to_canvas(event.position),
                ..event
            };
            return canvas_effects(self.canvas.on_pointer_down(&local));
        }

        // Outside the canvas a press can only leave interaction.
        let effects = canvas_effects(self.canvas.on_document_pointer_down());
        if zone == Some(ZoneId::Divider) && event.button == MouseButton::Left {
            self.capture = Capture::Divider;
        }
        effects
    }

    fn pointer_move(&mut self, position: Point) -> Vec<Effect> {
        match self.capture {
            Capture::Divider => {
                let width = self.layout.chat.w + self.layout.canvas.w;
                self.panel_width = clamp_panel_width(position.x, width);
                let height = self.layout.canvas.h;
                self.relayout(width, height)
            }
            Capture::Canvas => {
                canvas_effects(self.canvas.on_pointer_move(self.layout.to_canvas(position)))
            }
            Capture::None if self.layout.zone_at(position) == Some(ZoneId::Canvas) => {
                canvas_effects(self.canvas.on_pointer_move(self.layout.to_canvas(position)))
            }
            Capture::None => Vec::new(),
        }
    }

    fn pointer_up(&mut self, position: Point) -> Vec<Effect> {
        match std::mem::replace(&mut self.capture, Capture::None) {
            Capture::Divider => {
                info!(panel_width = self.panel_width, "chat panel resized");
                Vec::new()
            }
            Capture::Canvas => {
                canvas_effects(self.canvas.on_pointer_up(self.layout.to_canvas(position)))
            }
            Capture::None => Vec::new(),
        }
    }

    fn wheel(&mut self, event: WheelEvent) -> Vec<Effect> {
        if self.layout.zone_at(event.position) != Some(ZoneId::Canvas) {
            return Vec::new();
        }
        let local = WheelEvent {
            position: self.layout.to_canvas(event.position),
            ..event
        };
        canvas_effects(self.canvas.on_wheel(&local))
    }

    fn key(&mut self, event: KeyEvent) -> Vec<Effect> {
        let shortcut = event.modifiers.ctrl || event.modifiers.cmd;
        match event.key {
            KeyCode::Char(c) if shortcut => return self.shortcut(c.to_ascii_lowercase()),
            _ if self.canvas.mode() == InteractionMode::EmbeddedInteractive => {
                return canvas_effects(self.canvas.on_key(&event));
            }
            _ => {}
        }

        match event.key {
            KeyCode::Char(c) => {
                self.draft.push(c);
                vec![Effect::Repaint]
            }
            KeyCode::Backspace => match self.draft.pop() {
                Some(_) => vec![Effect::Repaint],
                None => Vec::new(),
            },
            KeyCode::Enter => match self.send_draft() {
                Ok(_) => vec![Effect::Repaint],
                Err(err) => {
                    debug!(%err, "draft not sent");
                    Vec::new()
                }
            },
            KeyCode::Escape if self.session.is_streaming() => {
                self.abort(Instant::now());
                Vec::new()
            }
            KeyCode::Escape | KeyCode::Other => Vec::new(),
        }
    }

    fn shortcut(&mut self, key: char) -> Vec<Effect> {
        match key {
            'l' => vec![Effect::FocusChatInput],
            'o' => vec![Effect::OpenFolderDialog],
            '0' => canvas_effects(self.canvas.recenter()),
            't' => match self.toggle_theme() {
                Ok(_) => vec![Effect::Repaint],
                Err(err) => {
                    warn!(%err, "theme change not delivered to content");
                    Vec::new()
                }
            },
            'k' => match self.clear() {
                Ok(()) => vec![Effect::Repaint],
                Err(err) => {
                    debug!(%err, "clear refused");
                    Vec::new()
                }
            },
            _ => Vec::new(),
        }
    }

    /// Send `text` with any pending attachments.
    pub fn send(&mut self, text: &str) -> Result<SendOutcome, SessionError> {
        self.session.send(&mut self.assistant, text)
    }

    /// Send the chat input. The draft is kept if the send fails.
    pub fn send_draft(&mut self) -> Result<SendOutcome, SessionError> {
        let draft = std::mem::take(&mut self.draft);
        let sent = self.send(&draft);
        if sent.is_err() {
            self.draft = draft;
        }
        sent
    }

    pub fn attach(&mut self, data: Vec<u8>, mime_type: &str) -> Result<(), SessionError> {
        let attachment = Attachment::image(data, mime_type)?;
        self.session.pending_mut().push(attachment);
        Ok(())
    }

    pub fn remove_attachment(&mut self, index: usize) -> Option<Attachment> {
        self.session.pending_mut().remove(index)
    }

    /// A message posted by the content surface. Chat requests are forwarded
    /// only while no turn is running; everything else is dropped.
    pub fn handle_content_message(&mut self, raw: Value) -> Option<SendOutcome> {
        let text = self.surface.receive(raw)?;
        if self.session.is_streaming() {
            debug!(%text, "dropping content chat request during a turn");
            return None;
        }
        match self.session.send(&mut self.assistant, &text) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                warn!(%err, "content chat request failed");
                None
            }
        }
    }

    /// Drain pending push events and run the abort watchdog.
    pub fn pump(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        let mut changed = false;
        while let Ok(event) = self.events.try_recv() {
            match event {
                PushEvent::Render(html) => self.render(&html, &mut effects),
                event => changed |= self.session.apply(&event),
            }
        }
        changed |= self.session.poll_watchdog(now);
        if changed {
            effects.push(Effect::Repaint);
        }
        effects
    }

    fn render(&mut self, html: &str, effects: &mut Vec<Effect>) {
        match self.surface.push_html(html) {
            Ok(_) => {
                self.canvas.set_content_visible(true);
                effects.push(Effect::ContentPushed);
            }
            Err(err) => warn!(%err, "content push failed"),
        }
    }

    pub fn content_loaded(&mut self) -> Result<(), BridgeError> {
        self.surface.on_load()
    }

    pub fn abort(&mut self, now: Instant) {
        self.session.abort(&mut self.assistant, now);
    }

    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.session.clear(&mut self.assistant)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, BridgeError> {
        let theme = self.surface.theme().toggled();
        self.surface.set_theme(theme)?;
        info!(%theme, "theme changed");
        Ok(theme)
    }

    /// Apply a folder-picker result. Returns `true` if the directory changed.
    pub fn pick_working_directory(&mut self, pick: DirectoryPick) -> Result<bool, AssistantError> {
        if let DirectoryPick::Picked(path) = &pick {
            self.assistant.set_working_directory(path)?;
        }
        Ok(self.cwd.apply(&pick))
    }
}

fn canvas_effects(actions: Vec<Action>) -> Vec<Effect> {
    actions.into_iter().map(Effect::Canvas).collect()
}
