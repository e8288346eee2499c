//! HTML rendering.

use std::borrow::Cow;

use super::{Document, RenderError, Renderer, MIME_TEXT_HTML};

/// Minimal HTML page with a field list and anchor links.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn media_type(&self) -> &'static str {
        MIME_TEXT_HTML
    }

    fn render(&self, document: &Document<'_>) -> Result<Vec<u8>, RenderError> {
        let mut out = String::from("<html>\n  <body>\n");

        if !document.fields.is_empty() {
            out.push_str("    Fields:\n");
            for (key, value) in document.fields {
                out.push_str(&format!("      <div>{}: {}</div>\n", escape(key), escape(value)));
            }
        }

        if !document.links.is_empty() {
            out.push_str("    Links:\n");
            for link in document.links {
                out.push_str(&format!(
                    "      <a href=\"{}\">{}</a>\n",
                    escape(&link.href),
                    escape(&link.relation)
                ));
            }
        }

        out.push_str("  </body>\n</html>\n");
        Ok(out.into_bytes())
    }
}

fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
