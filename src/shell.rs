//! Window glue: feeds winit input into the [`App`] and carries out its effects.

use std::time::Instant;

use anyhow::Result;
use malleable_bridge::ContentHost;
use malleable_canvas::Action;
use malleable_session::{Assistant, ContentPart, DirectoryPick, Role};
use malleable_window::{EventHandler, FolderDialogService, InputEvent, Pixmap, TextPainter, WindowCtx};
use tracing::{debug, info};

use crate::app::{App, Effect};
use crate::view;

pub struct Shell<H, A> {
    app: App<H, A>,
    dialogs: FolderDialogService,
    next_dialog: u64,
    /// Messages already written to the log.
    reported: usize,
    text: TextPainter,
    pixmap: Pixmap,
}

impl<H: ContentHost, A: Assistant> Shell<H, A> {
    pub fn new(app: App<H, A>, text: TextPainter) -> Self {
        Self {
            app,
            dialogs: FolderDialogService::new(),
            next_dialog: 0,
            reported: 0,
            text,
            pixmap: Pixmap::new(0, 0, 1.0),
        }
    }

    fn apply(&mut self, ctx: &mut WindowCtx, effects: Vec<Effect>) -> Result<()> {
        for effect in effects {
            match effect {
                Effect::Canvas(Action::SetCursor(cursor)) => ctx.set_cursor(cursor),
                Effect::Canvas(Action::RenderTransform { .. }) => {
                    ctx.set_title(&self.app.title());
                    ctx.request_redraw();
                }
                Effect::Canvas(Action::ModeChanged(transition)) => {
                    debug!(from = ?transition.from, to = ?transition.to, "interaction mode");
                    ctx.request_redraw();
                }
                Effect::Canvas(Action::Passthrough) => {}
                Effect::Canvas(Action::FrameChanged { .. }) | Effect::Relayout(_) => {
                    ctx.request_redraw();
                }
                Effect::FocusChatInput => {
                    info!("chat input focused");
                    ctx.request_redraw();
                }
                Effect::ContentPushed => self.app.content_loaded()?,
                Effect::OpenFolderDialog => {
                    if !self.dialogs.has_pending() {
                        self.next_dialog += 1;
                        self.dialogs.request(self.next_dialog);
                    }
                }
                Effect::Repaint => {
                    self.report_messages();
                    ctx.request_redraw();
                }
            }
        }
        Ok(())
    }

    /// Log every finished message that has not been logged yet.
    fn report_messages(&mut self) {
        let session = self.app.session();
        let done = if session.is_streaming() {
            // The last message is still streaming.
            session.messages().len().saturating_sub(1)
        } else {
            session.messages().len()
        };
        if done < self.reported {
            self.reported = 0;
        }
        for message in &session.messages()[self.reported..done] {
            let who = match message.role {
                Role::User => "you",
                Role::Assistant => "assistant",
            };
            for part in &message.content {
                match part {
                    ContentPart::Text { text, .. } => info!("{who}: {text}"),
                    ContentPart::Image(image) => info!("{who}: [{}]", image.mime_type),
                    ContentPart::Tool(tool) => {
                        info!("{who}: {} {} ({:?})", tool.name, tool.args_summary, tool.status())
                    }
                }
            }
        }
        self.reported = done;
    }
}

impl<H: ContentHost, A: Assistant> EventHandler for Shell<H, A> {
    fn init(&mut self, ctx: &mut WindowCtx) -> Result<()> {
        let (width, height) = ctx.size();
        let effects = self.app.resize(width, height);
        self.apply(ctx, effects)?;
        info!(cwd = self.app.cwd().display(), "ready");
        Ok(())
    }

    fn on_resize(&mut self, ctx: &mut WindowCtx, width: f64, height: f64) -> Result<()> {
        let effects = self.app.resize(width, height);
        self.apply(ctx, effects)
    }

    fn on_input(&mut self, ctx: &mut WindowCtx, event: InputEvent) -> Result<()> {
        let effects = self.app.on_input(event);
        self.apply(ctx, effects)
    }

    fn on_redraw(&mut self, ctx: &mut WindowCtx) -> Result<()> {
        let (width, height) = ctx.physical_size();
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixmap.resize(width, height, ctx.scale_factor());
        view::paint(&self.app, &self.text, &mut self.pixmap);
        ctx.present(&self.pixmap)
    }

    fn on_idle(&mut self, ctx: &mut WindowCtx) -> Result<()> {
        let effects = self.app.pump(Instant::now());
        self.apply(ctx, effects)?;

        for result in self.dialogs.poll() {
            let pick = match result.path {
                Some(path) => DirectoryPick::Picked(path),
                None => DirectoryPick::Canceled,
            };
            if self.app.pick_working_directory(pick)? {
                info!(cwd = self.app.cwd().display(), "working directory");
            }
        }
        Ok(())
    }
}
