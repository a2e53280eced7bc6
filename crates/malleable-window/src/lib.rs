//! malleable-window: minimal winit + wgpu window/event wrapper.
//!
//! Responsibilities:
//! - Create the main window from [`WindowConfig`] and a surface to present on.
//! - Paint frames in software ([`Pixmap`], [`TextPainter`]) and present them.
//! - Translate raw input into canvas events ([`InputEvent`]).
//! - Tick the handler regularly so it can drain assistant events.
//! - Run native folder dialogs off the event loop ([`FolderDialogService`]).

use std::time::{Duration, Instant};

use anyhow::Result;
use malleable_canvas::{Cursor, Edges};
use malleable_config::WindowConfig;
use tracing::error;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::window::{CursorIcon, Window, WindowBuilder};

pub mod dialog;
pub mod input;
pub mod paint;
pub mod present;
pub mod text;

pub use dialog::{FolderDialogResult, FolderDialogService};
pub use input::{InputEvent, InputTranslator};
pub use paint::{Pixmap, Rgba};
pub use present::Presenter;
pub use text::TextPainter;

/// Interval between idle ticks while no input arrives.
const TICK: Duration = Duration::from_millis(16);

pub struct MalleableWindow {
    event_loop: EventLoop<()>,
    // Leaked so the wgpu surface can borrow it for 'static.
    window: &'static Window,
    presenter: Presenter,
}

pub struct WindowCtx<'a> {
    window: &'a Window,
    presenter: &'a mut Presenter,
    elwt: &'a EventLoopWindowTarget<()>,
}

impl<'a> WindowCtx<'a> {
    pub fn window(&self) -> &Window { self.window }
    pub fn set_title(&self, title: &str) { self.window.set_title(title); }
    pub fn request_redraw(&self) { self.window.request_redraw(); }
    pub fn exit(&self) { self.elwt.exit(); }
    pub fn scale_factor(&self) -> f64 { self.window.scale_factor() }

    /// Inner size in logical pixels.
    pub fn size(&self) -> (f64, f64) {
        let size: LogicalSize<f64> = self.window.inner_size().to_logical(self.window.scale_factor());
        (size.width, size.height)
    }

    /// Inner size in physical pixels, the size a frame [`Pixmap`] should have.
    pub fn physical_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    pub fn present(&mut self, pixmap: &Pixmap) -> Result<()> {
        self.presenter.present(pixmap)
    }

    pub fn set_cursor(&self, cursor: Cursor) {
        self.window.set_cursor_icon(cursor_icon(cursor));
    }
}

pub trait EventHandler {
    fn init(&mut self, _ctx: &mut WindowCtx) -> Result<()> { Ok(()) }
    fn on_resize(&mut self, _ctx: &mut WindowCtx, _width: f64, _height: f64) -> Result<()> { Ok(()) }
    fn on_input(&mut self, _ctx: &mut WindowCtx, _event: InputEvent) -> Result<()> { Ok(()) }
    /// Called once per loop iteration, at least every [`TICK`].
    fn on_idle(&mut self, _ctx: &mut WindowCtx) -> Result<()> { Ok(()) }
    fn on_redraw(&mut self, _ctx: &mut WindowCtx) -> Result<()> { Ok(()) }
}

/// System cursor for a canvas cursor.
pub fn cursor_icon(cursor: Cursor) -> CursorIcon {
    match cursor {
        Cursor::Grab => CursorIcon::Grab,
        Cursor::Grabbing => CursorIcon::Grabbing,
        Cursor::Resize(edges) => match edges {
            Edges::NW | Edges::SE => CursorIcon::NwseResize,
            Edges::NE | Edges::SW => CursorIcon::NeswResize,
            Edges::N | Edges::S => CursorIcon::NsResize,
            _ => CursorIcon::EwResize,
        },
    }
}

fn report(what: &str, result: Result<()>) {
    if let Err(err) = result {
        error!("{what} failed: {err:#}");
    }
}

impl MalleableWindow {
    pub fn new(config: &WindowConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_min_inner_size(LogicalSize::new(config.min_width, config.min_height))
            .build(&event_loop)?;
        let window: &'static Window = Box::leak(Box::new(window));
        let presenter = Presenter::new(window)?;
        Ok(Self { event_loop, window, presenter })
    }

    pub fn run(self, mut handler: impl EventHandler + 'static) -> Result<()> {
        let Self { event_loop, window, mut presenter } = self;
        let mut translator = InputTranslator::new(window.scale_factor());
        let mut needs_init = true;

        Ok(event_loop.run(move |event, elwt| {
            let mut ctx = WindowCtx { window, presenter: &mut presenter, elwt };
            match event {
                Event::Resumed if needs_init => {
                    report("init", handler.init(&mut ctx));
                    needs_init = false;
                }
                Event::WindowEvent { window_id, event } if window_id == window.id() => {
                    let input = match event {
                        WindowEvent::CloseRequested => {
                            ctx.exit();
                            None
                        }
                        WindowEvent::Resized(size) => {
                            ctx.presenter.resize(size.width, size.height);
                            let (w, h) = ctx.size();
                            report("resize", handler.on_resize(&mut ctx, w, h));
                            None
                        }
                        WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                            translator.set_scale_factor(scale_factor);
                            None
                        }
                        WindowEvent::ModifiersChanged(modifiers) => {
                            translator.modifiers_changed(modifiers.state());
                            None
                        }
                        WindowEvent::CursorMoved { position, .. } => Some(translator.cursor_moved(position)),
                        WindowEvent::MouseInput { state, button, .. } => translator.mouse_input(state, button),
                        WindowEvent::MouseWheel { delta, .. } => Some(translator.mouse_wheel(delta)),
                        WindowEvent::KeyboardInput { event, .. } => translator.key(&event.logical_key, event.state),
                        WindowEvent::RedrawRequested => {
                            report("redraw", handler.on_redraw(&mut ctx));
                            None
                        }
                        _ => None,
                    };
                    if let Some(input) = input {
                        report("input", handler.on_input(&mut ctx, input));
                    }
                }
                Event::AboutToWait => {
                    report("idle", handler.on_idle(&mut ctx));
                    elwt.set_control_flow(ControlFlow::WaitUntil(Instant::now() + TICK));
                }
                _ => {}
            }
        })?)
    }

    pub fn window(&self) -> &Window { self.window }
}
