//! Bridge snippet injection into assistant-authored markup.

/// Style and script placed in every rendered document.
///
/// Defines `window.malleable.sendChat(text)` and a listener for theme
/// messages. Content is authored for a dark palette; light mode is emulated
/// by inverting the document and re-inverting media.
pub const BRIDGE_SNIPPET: &str = r#"<style>
html.light-filter { filter: invert(1) hue-rotate(180deg); }
html.light-filter img, html.light-filter video, html.light-filter canvas, html.light-filter svg image { filter: invert(1) hue-rotate(180deg); }
</style>
<script>
window.malleable = {
  sendChat: function(text) {
    window.parent.postMessage({ type: "chat", text: text }, "*");
  }
};
window.addEventListener("message", function(e) {
  if (e.data && e.data.type === "theme") {
    document.documentElement.classList.toggle("light-filter", e.data.theme === "light");
  }
});
</script>"#;

/// Where the snippet ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Right after the document's own `<head>` tag.
    Head,
    /// Inside a synthesized `<head>` right after the `<html>` tag.
    SynthesizedHead,
    /// Before everything else.
    Prepended,
}

/// Insert [`BRIDGE_SNIPPET`] exactly once, ahead of any script in `html`.
pub fn inject(html: &str) -> String {
    inject_with_placement(html).0
}

pub fn inject_with_placement(html: &str) -> (String, Placement) {
    let mut out = String::with_capacity(html.len() + BRIDGE_SNIPPET.len() + 16);

    if let Some(at) = open_tag_end(html, "head") {
        out.push_str(&html[..at]);
        out.push_str(BRIDGE_SNIPPET);
        out.push_str(&html[at..]);
        return (out, Placement::Head);
    }
    if let Some(at) = open_tag_end(html, "html") {
        out.push_str(&html[..at]);
        out.push_str("<head>");
        out.push_str(BRIDGE_SNIPPET);
        out.push_str("</head>");
        out.push_str(&html[at..]);
        return (out, Placement::SynthesizedHead);
    }
    out.push_str(BRIDGE_SNIPPET);
    out.push_str(html);
    (out, Placement::Prepended)
}

/// Byte offset just past the first `<name ...>` opening tag outside an HTML
/// comment. Matching is ASCII case-insensitive and the tag name must end at
/// `>`, `/` or whitespace, so `<header>` is not a `<head>`.
fn open_tag_end(html: &str, name: &str) -> Option<usize> {
    let lower = html.to_ascii_lowercase();
    let needle = format!("<{name}");
    let bytes = lower.as_bytes();

    let mut from = 0;
    while let Some(pos) = lower[from..].find('<') {
        let start = from + pos;
        let rest = &lower[start..];
        if let Some(comment) = rest.strip_prefix("<!--") {
            // An unterminated comment runs to the end of the document.
            let close = comment.find("-->")?;
            from = start + 4 + close + 3;
            continue;
        }
        if !rest.starts_with(&needle) {
            from = start + 1;
            continue;
        }
        let after = start + needle.len();
        match bytes.get(after) {
            Some(b'>') => return Some(after + 1),
            Some(c) if c.is_ascii_whitespace() || *c == b'/' => {
                return lower[after..].find('>').map(|end| after + end + 1);
            }
            None => return None,
            Some(_) => from = after,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(haystack: &str) -> usize {
        haystack.matches("window.malleable =").count()
    }

    #[test]
    fn inserts_after_head() {
        let html = "<!doctype html><html><head><script>go()</script></head><body></body></html>";
        let (out, placement) = inject_with_placement(html);
        assert_eq!(placement, Placement::Head);
        assert!(out.starts_with(&format!("<!doctype html><html><head>{BRIDGE_SNIPPET}<script>go()")));
        assert_eq!(count(&out), 1);
    }

    #[test]
    fn head_with_attributes_and_mixed_case() {
        let out = inject("<HTML><Head lang=\"en\"><title>t</title></Head></HTML>");
        assert!(out.starts_with(&format!("<HTML><Head lang=\"en\">{BRIDGE_SNIPPET}<title>")));
    }

    #[test]
    fn header_is_not_head() {
        let html = "<html><body><header>top</header></body></html>";
        let (out, placement) = inject_with_placement(html);
        assert_eq!(placement, Placement::SynthesizedHead);
        assert!(out.starts_with(&format!("<html><head>{BRIDGE_SNIPPET}</head><body><header>")));
    }

    #[test]
    fn fragment_is_prepended() {
        let (out, placement) = inject_with_placement("<div>hi</div>");
        assert_eq!(placement, Placement::Prepended);
        assert_eq!(out, format!("{BRIDGE_SNIPPET}<div>hi</div>"));
    }

    #[test]
    fn only_first_head_is_used() {
        let out = inject("<head></head><head></head>");
        assert_eq!(count(&out), 1);
        assert!(out.ends_with("</head><head></head>"));
    }

    #[test]
    fn tags_inside_comments_are_skipped() {
        let html = "<!doctype html><!-- <head> goes below --><html><head><title>t</title></head></html>";
        let (out, placement) = inject_with_placement(html);
        assert_eq!(placement, Placement::Head);
        assert!(out.contains(&format!("--><html><head>{BRIDGE_SNIPPET}<title>")));
        assert!(out.starts_with("<!doctype html><!-- <head> goes below -->"));

        let (out, placement) = inject_with_placement("<!--<html>--><div>hi</div>");
        assert_eq!(placement, Placement::Prepended);
        assert_eq!(out, format!("{BRIDGE_SNIPPET}<!--<html>--><div>hi</div>"));

        let (_, placement) = inject_with_placement("<!-- <head> never closed");
        assert_eq!(placement, Placement::Prepended);
    }

    #[test]
    fn unterminated_tag_falls_back() {
        let (_, placement) = inject_with_placement("<head");
        assert_eq!(placement, Placement::Prepended);
    }
}
