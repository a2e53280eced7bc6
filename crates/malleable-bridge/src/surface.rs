//! Content surface lifecycle: empty state, content pushes and theme sync.

use malleable_config::Theme;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::Result;
use crate::inject::{self, Placement};
use crate::protocol::{ContentMessage, HostMessage};

/// Sandboxed renderer for assistant-authored markup.
pub trait ContentHost {
    /// Replace the document with `html`.
    fn load_html(&mut self, html: &str) -> Result<()>;

    /// Post a message into the loaded document.
    fn post_message(&mut self, message: &HostMessage) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// Nothing pushed yet; the placeholder is shown instead of the frame.
    Empty,
    Loading,
    Loaded,
}

pub struct ContentSurface<H> {
    host: H,
    theme: Theme,
    state: SurfaceState,
}

impl<H: ContentHost> ContentSurface<H> {
    pub fn new(host: H, theme: Theme) -> Self {
        Self {
            host,
            theme,
            state: SurfaceState::Empty,
        }
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn is_empty(&self) -> bool {
        self.state == SurfaceState::Empty
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Load new content with the bridge injected.
    pub fn push_html(&mut self, html: &str) -> Result<Placement> {
        let (document, placement) = inject::inject_with_placement(html);
        self.host.load_html(&document)?;
        self.state = SurfaceState::Loading;
        info!(bytes = html.len(), ?placement, "content pushed");
        Ok(placement)
    }

    /// The document finished loading; bring it in line with the host theme.
    pub fn on_load(&mut self) -> Result<()> {
        self.state = SurfaceState::Loaded;
        self.post_theme()
    }

    /// Change the theme and forward it to loaded content.
    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.theme = theme;
        if self.state == SurfaceState::Loaded {
            self.post_theme()?;
        }
        Ok(())
    }

    /// Accept a message posted by content. Anything malformed is dropped.
    pub fn receive(&self, raw: Value) -> Option<String> {
        match ContentMessage::from_value(raw) {
            Ok(ContentMessage::Chat { text }) => Some(text),
            Err(err) => {
                debug!(%err, "dropping content message");
                None
            }
        }
    }

    fn post_theme(&mut self) -> Result<()> {
        self.host.post_message(&HostMessage::Theme { theme: self.theme })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct Recorder {
        loaded: Vec<String>,
        posted: Vec<HostMessage>,
    }

    impl ContentHost for Recorder {
        fn load_html(&mut self, html: &str) -> Result<()> {
            self.loaded.push(html.to_string());
            Ok(())
        }

        fn post_message(&mut self, message: &HostMessage) -> Result<()> {
            self.posted.push(message.clone());
            Ok(())
        }
    }

    #[test]
    fn theme_is_sent_after_each_load() {
        let mut surface = ContentSurface::new(Recorder::default(), Theme::Light);
        assert!(surface.is_empty());

        surface.set_theme(Theme::Dark).unwrap();
        assert!(surface.host().posted.is_empty());

        surface.push_html("<p>one</p>").unwrap();
        assert_eq!(surface.state(), SurfaceState::Loading);
        assert!(surface.host().loaded[0].contains("sendChat"));
        surface.on_load().unwrap();

        surface.set_theme(Theme::Light).unwrap();
        assert_eq!(
            surface.host().posted,
            vec![
                HostMessage::Theme { theme: Theme::Dark },
                HostMessage::Theme { theme: Theme::Light },
            ]
        );
    }

    #[test]
    fn receive_drops_bad_messages() {
        let surface = ContentSurface::new(Recorder::default(), Theme::Dark);
        assert_eq!(
            surface.receive(json!({"type": "chat", "text": " go "})),
            Some("go".to_string())
        );
        assert_eq!(surface.receive(json!({"type": "chat", "text": ""})), None);
        assert_eq!(surface.receive(json!({"type": "nav"})), None);
        assert_eq!(surface.receive(json!(null)), None);
    }
}
