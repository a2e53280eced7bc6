//! Interaction mode state machine.
//!
//! Decides whether pointer input drives the viewport or passes through to the
//! embedded content. Each mode owns a fixed table of document-level listeners;
//! a transition tears down the old table and installs the new one, so leaving
//! a mode can never leave a stray listener behind.
//!
//! ```text
//! Normal --click frame--> Selected --click frame--> EmbeddedInteractive
//! Selected --click outside--> Normal
//! EmbeddedInteractive --pointer down outside | Escape | move onto background--> Selected
//! ```

use tracing::debug;

use crate::scene::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// The viewport owns all pointer input.
    #[default]
    Normal,
    /// Frame is outlined; the viewport still owns pointer input.
    Selected,
    /// Pointer input passes through to the content surface.
    EmbeddedInteractive,
}

/// Document-level listeners a mode can register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    /// Capturing pointer-down anywhere in the host document.
    DocumentPointerDown,
    /// Key-down anywhere in the host document.
    DocumentKeyDown,
    /// Pointer movement over the canvas background.
    BackgroundPointerMove,
}

impl InteractionMode {
    pub fn listeners(self) -> &'static [Listener] {
        match self {
            InteractionMode::Normal | InteractionMode::Selected => &[],
            InteractionMode::EmbeddedInteractive => &[
                Listener::DocumentPointerDown,
                Listener::DocumentKeyDown,
                Listener::BackgroundPointerMove,
            ],
        }
    }

    pub fn frame_selected(self) -> bool {
        !matches!(self, InteractionMode::Normal)
    }
}

/// What a hit-tested click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Frame,
    Outside,
}

/// Host-level events observed through the listener table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DocumentEvent {
    PointerDown { on_frame: bool },
    KeyDown(KeyCode),
    PointerMove { on_background: bool },
}

impl DocumentEvent {
    fn listener(&self) -> Listener {
        match self {
            DocumentEvent::PointerDown { .. } => Listener::DocumentPointerDown,
            DocumentEvent::KeyDown(_) => Listener::DocumentKeyDown,
            DocumentEvent::PointerMove { .. } => Listener::BackgroundPointerMove,
        }
    }
}

/// Record of one mode change, including the listener churn it caused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: InteractionMode,
    pub to: InteractionMode,
    pub removed: &'static [Listener],
    pub installed: &'static [Listener],
}

#[derive(Debug, Default)]
pub struct InteractionMachine {
    mode: InteractionMode,
    installed: Vec<Listener>,
}

impl InteractionMachine {
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn is_listening(&self, listener: Listener) -> bool {
        self.installed.contains(&listener)
    }

    /// Handle a click that the overlay classified and hit-tested.
    pub fn click(&mut self, target: ClickTarget) -> Option<ModeTransition> {
        let next = match (self.mode, target) {
            (InteractionMode::Normal, ClickTarget::Frame) => InteractionMode::Selected,
            (InteractionMode::Normal, ClickTarget::Outside) => return None,
            (InteractionMode::Selected, ClickTarget::Frame) => InteractionMode::EmbeddedInteractive,
            (InteractionMode::Selected, ClickTarget::Outside) => InteractionMode::Normal,
            (InteractionMode::EmbeddedInteractive, ClickTarget::Frame) => return None,
            (InteractionMode::EmbeddedInteractive, ClickTarget::Outside) => {
                InteractionMode::Selected
            }
        };
        Some(self.transition(next))
    }

    /// Deliver a document-level event. Only events with an installed
    /// listener are looked at; everything else is a no-op.
    pub fn dispatch(&mut self, event: DocumentEvent) -> Option<ModeTransition> {
        if !self.is_listening(event.listener()) {
            return None;
        }
        let exits = match event {
            DocumentEvent::PointerDown { on_frame } => !on_frame,
            DocumentEvent::KeyDown(key) => key == KeyCode::Escape,
            DocumentEvent::PointerMove { on_background } => on_background,
        };
        exits.then(|| self.transition(InteractionMode::Selected))
    }

    /// Drop back to `Normal` regardless of the current mode.
    pub fn reset(&mut self) -> Option<ModeTransition> {
        (self.mode != InteractionMode::Normal).then(|| self.transition(InteractionMode::Normal))
    }

    fn transition(&mut self, to: InteractionMode) -> ModeTransition {
        let from = self.mode;
        let removed = self.exit(from);
        let installed = self.enter(to);
        debug!(?from, ?to, "interaction mode changed");
        ModeTransition {
            from,
            to,
            removed,
            installed,
        }
    }

    fn exit(&mut self, mode: InteractionMode) -> &'static [Listener] {
        let table = mode.listeners();
        self.installed.retain(|l| !table.contains(l));
        table
    }

    fn enter(&mut self, mode: InteractionMode) -> &'static [Listener] {
        self.mode = mode;
        let table = mode.listeners();
        self.installed.extend_from_slice(table);
        table
    }
}
