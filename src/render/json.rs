//! JSON rendering: `{"fields": {...}, "links": {relation: url}}`.
//!
//! Fields keep the order the handler added them in. A key added twice
//! appears once, at its first position, with the last value.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use url::Url;

use super::{Document, RenderError, Renderer, MIME_APPLICATION_JSON};

#[derive(serde::Serialize)]
struct JsonDocument<'a> {
    fields: Fields<'a>,
    links: BTreeMap<&'a str, String>,
}

/// Ordered field list serialized as a JSON object.
struct Fields<'a>(&'a [(String, String)]);

impl Serialize for Fields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut keys: Vec<&str> = Vec::with_capacity(self.0.len());
        for (key, _) in self.0 {
            if !keys.contains(&key.as_str()) {
                keys.push(key);
            }
        }

        let mut map = serializer.serialize_map(Some(keys.len()))?;
        for key in keys {
            let value = self
                .0
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .unwrap_or_default();
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Append a root-relative `href` to `base`, keeping any path prefix of the base.
fn absolute(base: &Url, href: &str) -> String {
    let mut url = base.clone();
    let prefix = base.path().trim_end_matches('/');
    let href = href.trim_start_matches('/');
    url.set_path(&format!("{}/{}", prefix, href));
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn media_type(&self) -> &'static str {
        MIME_APPLICATION_JSON
    }

    fn render(&self, document: &Document<'_>) -> Result<Vec<u8>, RenderError> {
        let links = document
            .links
            .iter()
            .map(|link| {
                let href = match document.base_url {
                    Some(base) => absolute(base, &link.href),
                    None => link.href.clone(),
                };
                (link.relation.as_str(), href)
            })
            .collect();

        Ok(serde_json::to_vec(&JsonDocument {
            fields: Fields(document.fields),
            links,
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResolvedLink;
    use serde_json::{json, Value};

    fn render(fields: &[(String, String)], links: &[ResolvedLink], base: Option<&Url>) -> String {
        let doc = Document {
            fields,
            links,
            base_url: base,
        };
        String::from_utf8(JsonRenderer.render(&doc).unwrap()).unwrap()
    }

    fn link(relation: &str, href: &str) -> ResolvedLink {
        ResolvedLink {
            relation: relation.into(),
            href: href.into(),
        }
    }

    #[test]
    fn test_links_fully_qualified() {
        let base = Url::parse("http://localhost:8080").unwrap();
        let fields = vec![("id".to_string(), "42".to_string())];
        let links = vec![link("self", "/widgets/42")];
        let value: Value = serde_json::from_str(&render(&fields, &links, Some(&base))).unwrap();
        assert_eq!(
            value,
            json!({
                "fields": {"id": "42"},
                "links": {"self": "http://localhost:8080/widgets/42"}
            })
        );
    }

    #[test]
    fn test_base_path_prefix_kept() {
        let links = vec![link("self", "/widgets"), link("item", "/widgets/a%20b")];
        for base in ["https://api.example.com/v1", "https://api.example.com/v1/"] {
            let base = Url::parse(base).unwrap();
            let value: Value = serde_json::from_str(&render(&[], &links, Some(&base))).unwrap();
            assert_eq!(
                value["links"],
                json!({
                    "item": "https://api.example.com/v1/widgets/a%20b",
                    "self": "https://api.example.com/v1/widgets"
                })
            );
        }
    }

    #[test]
    fn test_without_base_keeps_path() {
        let links = vec![link("up", "/widgets")];
        let value: Value = serde_json::from_str(&render(&[], &links, None)).unwrap();
        assert_eq!(value, json!({"fields": {}, "links": {"up": "/widgets"}}));
    }

    #[test]
    fn test_fields_keep_insertion_order() {
        let fields = vec![
            ("zeta".to_string(), "1".to_string()),
            ("alpha".to_string(), "2".to_string()),
        ];
        let body = render(&fields, &[], None);
        assert!(body.starts_with(r#"{"fields":{"zeta":"1","alpha":"2"}"#), "{}", body);
    }

    #[test]
    fn test_duplicate_field_last_value_wins() {
        let fields = vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "x".to_string()),
            ("a".to_string(), "2".to_string()),
        ];
        let body = render(&fields, &[], None);
        assert!(body.starts_with(r#"{"fields":{"a":"2","b":"x"}"#), "{}", body);
    }
}
