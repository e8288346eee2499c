//! Hypermedia links between resources.
//!
//! A [`Link`] stores an href template such as `/widgets/:id`. Templates are
//! never rewritten in place; [`Link::resolve`] returns a fresh string for the
//! current request's bindings.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

use crate::routing::Bindings;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":(\w+)").expect("placeholder pattern compiles"));

/// Errors raised when registering links.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("link target {href} is not a registered resource")]
    TargetResourceNotFound { href: String },
}

/// A named reference from one resource to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    href: String,
    relation: String,
}

impl Link {
    pub fn new(href: impl Into<String>, relation: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            relation: relation.into(),
        }
    }

    /// The unresolved template.
    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// Substitute every `:name` placeholder that has a binding.
    ///
    /// Bound values are percent-encoded back into path form. Placeholders
    /// without a binding are kept verbatim.
    pub fn resolve(&self, bindings: &Bindings) -> String {
        PLACEHOLDER
            .replace_all(&self.href, |caps: &Captures<'_>| match bindings.get(&caps[1]) {
                Some(value) => urlencoding::encode(value).into_owned(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

/// A link after placeholder substitution for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub relation: String,
    pub href: String,
}

/// The set of links a resource carries, one per relation.
#[derive(Debug, Clone, Default)]
pub struct Hypermedia {
    links: BTreeMap<String, Link>,
}

impl Hypermedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `link`, returning the one it replaced for the same relation.
    pub fn insert(&mut self, link: Link) -> Option<Link> {
        self.links.insert(link.relation.clone(), link)
    }

    pub fn get(&self, relation: &str) -> Option<&Link> {
        self.links.get(relation)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Resolve every link against `bindings`, ordered by relation.
    pub fn resolve(&self, bindings: &Bindings) -> Vec<ResolvedLink> {
        self.links
            .values()
            .map(|link| ResolvedLink {
                relation: link.relation.clone(),
                href: link.resolve(bindings),
            })
            .collect()
    }
}
