//! Content host that keeps the current document in memory and logs traffic.
//!
//! Loads complete synchronously, so the caller acknowledges them right after
//! a push.

use malleable_bridge::{ContentHost, HostMessage, Result};
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct LogHost {
    document: Option<String>,
    loads: usize,
    posted: Vec<HostMessage>,
}

impl LogHost {
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub fn loads(&self) -> usize {
        self.loads
    }

    pub fn posted(&self) -> &[HostMessage] {
        &self.posted
    }
}

impl ContentHost for LogHost {
    fn load_html(&mut self, html: &str) -> Result<()> {
        self.loads += 1;
        info!(bytes = html.len(), load = self.loads, "content document loaded");
        self.document = Some(html.to_string());
        Ok(())
    }

    fn post_message(&mut self, message: &HostMessage) -> Result<()> {
        debug!(message = %message.to_json()?, "posted to content");
        self.posted.push(message.clone());
        Ok(())
    }
}
