//! Paints one frame of the window from [`App`] state: the canvas with its
//! frame and selection outline, the chat panel on top of it, and the divider.

use malleable_bridge::{ContentHost, SurfaceState};
use malleable_canvas::frame::{CORNER_RADIUS, HANDLE_SIZE};
use malleable_canvas::{Edges, InteractionMode, Point, Rect, ViewportState};
use malleable_config::Theme;
use malleable_session::{Assistant, ContentPart, Message, Role, TextStyle, ToolStatus};
use malleable_window::paint::rgb;
use malleable_window::{Pixmap, Rgba, TextPainter};

use crate::app::App;

const PAD: f64 = 16.0;
const HEADER_HEIGHT: f64 = 56.0;
const INPUT_HEIGHT: f64 = 44.0;
const BUBBLE_PAD: f64 = 8.0;
const BLOCK_GAP: f64 = 4.0;
const MESSAGE_GAP: f64 = 12.0;
const BODY_PX: f32 = 14.0;
const SMALL_PX: f32 = 12.0;
const OUTLINE_WIDTH: f64 = 2.0;
/// World-space distance between background grid dots.
const GRID_SPACING: f64 = 40.0;

struct Palette {
    canvas: Rgba,
    grid: Rgba,
    chat: Rgba,
    header: Rgba,
    divider: Rgba,
    frame: Rgba,
    placeholder: Rgba,
    accent: Rgba,
    handle: Rgba,
    text: Rgba,
    muted: Rgba,
    bubble: Rgba,
    input: Rgba,
    error: Rgba,
    running: Rgba,
    done: Rgba,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                canvas: rgb(24, 25, 30),
                grid: rgb(44, 46, 54),
                chat: rgb(17, 18, 22),
                header: rgb(22, 23, 28),
                divider: rgb(52, 54, 62),
                frame: rgb(22, 24, 29),
                placeholder: rgb(34, 36, 43),
                accent: rgb(77, 144, 254),
                handle: rgb(255, 255, 255),
                text: rgb(230, 230, 230),
                muted: rgb(140, 144, 156),
                bubble: rgb(38, 41, 50),
                input: rgb(30, 32, 39),
                error: rgb(240, 96, 96),
                running: rgb(230, 180, 80),
                done: rgb(110, 200, 130),
            },
            // Content is inverted in light mode, so the frame gets the
            // inverse of the dark frame colour.
            Theme::Light => Self {
                canvas: rgb(236, 237, 241),
                grid: rgb(210, 212, 220),
                chat: rgb(250, 250, 252),
                header: rgb(243, 244, 247),
                divider: rgb(214, 216, 222),
                frame: rgb(233, 231, 226),
                placeholder: rgb(225, 227, 233),
                accent: rgb(37, 99, 235),
                handle: rgb(255, 255, 255),
                text: rgb(28, 30, 36),
                muted: rgb(110, 114, 126),
                bubble: rgb(232, 236, 246),
                input: rgb(255, 255, 255),
                error: rgb(200, 40, 40),
                running: rgb(180, 120, 0),
                done: rgb(30, 140, 70),
            },
        }
    }
}

pub fn paint<H: ContentHost, A: Assistant>(app: &App<H, A>, text: &TextPainter, pixmap: &mut Pixmap) {
    let colors = Palette::for_theme(app.surface().theme());
    pixmap.fill(colors.canvas);
    paint_canvas(app, text, pixmap, &colors);
    paint_chat(app, text, pixmap, &colors);

    let layout = app.layout();
    pixmap.fill_rect(
        Rect::new(layout.canvas.x - 1.0, 0.0, 1.0, layout.canvas.h),
        colors.divider,
    );
}

fn offset(r: Rect, origin: Rect) -> Rect {
    Rect::new(r.x + origin.x, r.y + origin.y, r.w, r.h)
}

fn paint_canvas<H: ContentHost, A: Assistant>(
    app: &App<H, A>,
    text: &TextPainter,
    pixmap: &mut Pixmap,
    colors: &Palette,
) {
    let zone = app.layout().canvas;
    let canvas = app.canvas();
    let vp = canvas.viewport_state();
    paint_grid(pixmap, zone, &vp, colors.grid);

    let frame = offset(canvas.frame().screen_rect(&vp), zone);
    let radius = CORNER_RADIUS * vp.zoom;
    let label = if !canvas.content_visible() {
        pixmap.fill_round_rect(frame, radius, colors.placeholder);
        "Waiting for content"
    } else {
        pixmap.fill_round_rect(frame, radius, colors.frame);
        match (app.surface().state(), canvas.mode()) {
            (SurfaceState::Loading, _) => "Loading content",
            (_, InteractionMode::Normal) => "Click to select",
            (_, InteractionMode::Selected) => "Click again to use the content",
            (_, InteractionMode::EmbeddedInteractive) => "Esc or click outside to leave",
        }
    };
    text.draw(
        pixmap,
        label,
        frame.x + PAD,
        frame.y + PAD,
        SMALL_PX,
        Some((frame.w - 2.0 * PAD).max(0.0) as f32),
        colors.muted,
    );

    if let Some(outline) = canvas.frame().selection_outline(&vp) {
        let rect = offset(outline.rect, zone);
        pixmap.stroke_round_rect(rect, outline.corner_radius, OUTLINE_WIDTH, colors.accent);
        for edges in Edges::HANDLES {
            let c = handle_center(rect, edges);
            let half = HANDLE_SIZE / 2.0;
            pixmap.fill_rect(Rect::new(c.x - half, c.y - half, HANDLE_SIZE, HANDLE_SIZE), colors.accent);
            pixmap.fill_rect(
                Rect::new(c.x - half + 2.0, c.y - half + 2.0, HANDLE_SIZE - 4.0, HANDLE_SIZE - 4.0),
                colors.handle,
            );
        }
    }

    let zoom = vp.zoom_label();
    let width = (f64::from(text.measure(&zoom, SMALL_PX, None).0) + PAD).max(48.0);
    let pill = Rect::new(zone.x + zone.w - PAD - width, zone.y + zone.h - PAD - 24.0, width, 24.0);
    pixmap.fill_round_rect(pill, 12.0, colors.header);
    text.draw(pixmap, &zoom, pill.x + PAD / 2.0, pill.y + 5.0, SMALL_PX, None, colors.text);
}

fn handle_center(rect: Rect, edges: Edges) -> Point {
    let x = if edges.contains(Edges::W) {
        rect.x
    } else if edges.contains(Edges::E) {
        rect.x + rect.w
    } else {
        rect.x + rect.w / 2.0
    };
    let y = if edges.contains(Edges::N) {
        rect.y
    } else if edges.contains(Edges::S) {
        rect.y + rect.h
    } else {
        rect.y + rect.h / 2.0
    };
    Point::new(x, y)
}

fn paint_grid(pixmap: &mut Pixmap, zone: Rect, vp: &ViewportState, color: Rgba) {
    let mut step = GRID_SPACING * vp.zoom;
    while step < 12.0 {
        step *= 2.0;
    }
    let mut y = zone.y + vp.pan_y.rem_euclid(step);
    while y < zone.y + zone.h {
        let mut x = zone.x + vp.pan_x.rem_euclid(step);
        while x < zone.x + zone.w {
            pixmap.fill_rect(Rect::new(x, y, 2.0, 2.0), color);
            x += step;
        }
        y += step;
    }
}

/// One wrapped run of text inside a message.
struct Block {
    text: String,
    px: f32,
    color: Rgba,
}

fn blocks(message: &Message, colors: &Palette) -> Vec<Block> {
    message
        .content
        .iter()
        .map(|part| match part {
            ContentPart::Text { text, style } => Block {
                text: text.clone(),
                px: BODY_PX,
                color: match style {
                    TextStyle::Normal => colors.text,
                    TextStyle::Error => colors.error,
                },
            },
            ContentPart::Image(image) => Block {
                text: format!("[{}]", image.mime_type),
                px: SMALL_PX,
                color: colors.muted,
            },
            ContentPart::Tool(tool) => {
                let (status, color) = match tool.status() {
                    ToolStatus::Running => ("running", colors.running),
                    ToolStatus::Done => ("done", colors.done),
                    ToolStatus::Error => ("failed", colors.error),
                };
                Block {
                    text: format!("{} {} ({status})", tool.name, tool.args_summary),
                    px: SMALL_PX,
                    color,
                }
            }
        })
        .collect()
}

fn paint_chat<H: ContentHost, A: Assistant>(
    app: &App<H, A>,
    text: &TextPainter,
    pixmap: &mut Pixmap,
    colors: &Palette,
) {
    let zone = app.layout().chat;
    let session = app.session();
    pixmap.fill_rect(zone, colors.chat);

    let inner = (zone.w - 2.0 * PAD).max(0.0);
    let wrap = Some((inner - 2.0 * BUBBLE_PAD).max(1.0) as f32);
    let input = Rect::new(zone.x + PAD, zone.y + zone.h - PAD - INPUT_HEIGHT, inner, INPUT_HEIGHT);
    let mut bottom = input.y - PAD;

    let pending = session.pending().len();
    if pending > 0 {
        bottom -= 18.0;
        let label = match pending {
            1 => "1 image attached".to_string(),
            n => format!("{n} images attached"),
        };
        text.draw(pixmap, &label, zone.x + PAD, bottom, SMALL_PX, wrap, colors.muted);
        bottom -= BLOCK_GAP;
    }

    if session.is_typing() {
        bottom -= 16.0;
        for i in 0..3 {
            let center = Point::new(zone.x + PAD + 6.0 + f64::from(i) * 12.0, bottom + 8.0);
            pixmap.fill_circle(center, 3.5, colors.muted);
        }
        bottom -= MESSAGE_GAP;
    }

    // Newest message at the bottom; older ones stack upwards until the header.
    for message in session.messages().iter().rev() {
        if bottom < zone.y + HEADER_HEIGHT {
            break;
        }
        let blocks = blocks(message, colors);
        if blocks.is_empty() {
            continue;
        }
        let heights: Vec<f64> = blocks
            .iter()
            .map(|b| f64::from(text.measure(&b.text, b.px, wrap).1))
            .collect();
        let body = heights.iter().sum::<f64>() + BLOCK_GAP * (blocks.len() - 1) as f64;
        let bubble = Rect::new(zone.x + PAD, bottom - body - 2.0 * BUBBLE_PAD, inner, body + 2.0 * BUBBLE_PAD);
        if message.role == Role::User {
            pixmap.fill_round_rect(bubble, 8.0, colors.bubble);
        }
        let mut y = bubble.y + BUBBLE_PAD;
        for (block, height) in blocks.iter().zip(&heights) {
            text.draw(pixmap, &block.text, bubble.x + BUBBLE_PAD, y, block.px, wrap, block.color);
            y += height + BLOCK_GAP;
        }
        bottom = bubble.y - MESSAGE_GAP;
    }

    // Header and input cover anything that scrolled under them.
    pixmap.fill_rect(Rect::new(zone.x, zone.y, zone.w, HEADER_HEIGHT), colors.header);
    text.draw(pixmap, "Chat", zone.x + PAD, zone.y + 10.0, 15.0, None, colors.text);
    text.draw(pixmap, app.cwd().display(), zone.x + PAD, zone.y + 32.0, SMALL_PX, None, colors.muted);
    if session.is_streaming() {
        let status = "working";
        let width = f64::from(text.measure(status, SMALL_PX, None).0);
        text.draw(pixmap, status, zone.x + zone.w - PAD - width, zone.y + 12.0, SMALL_PX, None, colors.running);
    }

    let below = input.y - PAD / 2.0;
    pixmap.fill_rect(Rect::new(zone.x, below, zone.w, zone.y + zone.h - below), colors.chat);
    pixmap.fill_round_rect(input, 8.0, colors.input);
    let room = (input.w - 2.0 * 12.0) as f32;
    let (draft, color) = match app.draft() {
        "" => ("Message", colors.muted),
        draft => (fit_tail(text, draft, room), colors.text),
    };
    text.draw(pixmap, draft, input.x + 12.0, input.y + 13.0, BODY_PX, None, color);
}

/// Longest suffix of `draft` that fits in `room` logical pixels on one line.
fn fit_tail<'a>(text: &TextPainter, draft: &'a str, room: f32) -> &'a str {
    let mut start = 0;
    while start < draft.len() && text.measure(&draft[start..], BODY_PX, None).0 > room {
        start += draft[start..].chars().next().map_or(1, char::len_utf8);
    }
    &draft[start..]
}
