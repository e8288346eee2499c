//! Accept-header content negotiation.

use super::{HtmlRenderer, JsonRenderer, Renderer, MIME_APPLICATION_JSON, MIME_TEXT_HTML};

/// Picks a renderer for a request's `Accept` header.
pub struct ContentNegotiator {
    renderers: Vec<Box<dyn Renderer>>,
    fallback: String,
    html: HtmlRenderer,
}

impl ContentNegotiator {
    /// Negotiator with HTML and JSON renderers; unmatched requests get
    /// `fallback`.
    pub fn new(fallback: impl Into<String>) -> Self {
        let mut negotiator = Self {
            renderers: Vec::new(),
            fallback: fallback.into(),
            html: HtmlRenderer,
        };
        negotiator.register(Box::new(HtmlRenderer));
        negotiator.register(Box::new(JsonRenderer));
        negotiator
    }

    /// Add a renderer, replacing one with the same media type.
    pub fn register(&mut self, renderer: Box<dyn Renderer>) {
        let media = renderer.media_type();
        self.renderers.retain(|r| !r.media_type().eq_ignore_ascii_case(media));
        self.renderers.push(renderer);
    }

    pub fn supports(&self, media_type: &str) -> bool {
        self.find(media_type).is_some()
    }

    fn find(&self, media_type: &str) -> Option<&dyn Renderer> {
        self.renderers
            .iter()
            .find(|r| r.media_type().eq_ignore_ascii_case(media_type))
            .map(|r| &**r)
    }

    /// Renderer for `accept`: HTML when absent, first registered match
    /// otherwise, the fallback when nothing matches.
    pub fn select(&self, accept: Option<&str>) -> &dyn Renderer {
        let accept = match accept.map(str::trim) {
            None | Some("") => return self.find(MIME_TEXT_HTML).unwrap_or(&self.html),
            Some(accept) => accept,
        };

        accept
            .split(',')
            .filter_map(|range| range.split(';').next())
            .map(str::trim)
            .find_map(|media| self.find(media))
            .or_else(|| self.find(&self.fallback))
            .unwrap_or(&self.html)
    }
}

impl Default for ContentNegotiator {
    fn default() -> Self {
        Self::new(MIME_APPLICATION_JSON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_accept_is_html() {
        let negotiator = ContentNegotiator::default();
        assert_eq!(negotiator.select(None).media_type(), MIME_TEXT_HTML);
        assert_eq!(negotiator.select(Some("  ")).media_type(), MIME_TEXT_HTML);
    }

    #[test]
    fn test_first_supported_range_wins() {
        let negotiator = ContentNegotiator::default();
        let picked = negotiator.select(Some("application/xml, application/json;q=0.9, text/html"));
        assert_eq!(picked.media_type(), MIME_APPLICATION_JSON);
        assert_eq!(negotiator.select(Some("text/html")).media_type(), MIME_TEXT_HTML);
    }

    #[test]
    fn test_unmatched_uses_fallback() {
        let negotiator = ContentNegotiator::default();
        assert_eq!(negotiator.select(Some("*/*")).media_type(), MIME_APPLICATION_JSON);

        let negotiator = ContentNegotiator::new(MIME_TEXT_HTML);
        assert_eq!(negotiator.select(Some("image/png")).media_type(), MIME_TEXT_HTML);
    }
}
