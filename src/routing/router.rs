//! Route table and path matching.
//!
//! # Responsibilities
//! - Store routes as a segment tree
//! - Match a request path to its bound value
//! - Extract parameter bindings in left-to-right order
//!
//! # Design Decisions
//! - Immutable after setup (thread-safe without locks)
//! - O(depth) lookup, one literal scan per level
//! - Literal segments take precedence over the parameter child
//! - A traversed node with no bound value is still a miss

use thiserror::Error;

use super::node::{InsertConflict, RouteNode};
use super::segment::{decode, is_valid_param_name, normalize, param_name, segments};

/// Errors raised while building the route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Two different parameter names at the same tree position.
    #[error("pattern {pattern}: parameter :{requested} conflicts with :{existing} at segment {position}")]
    ConflictingParameter {
        pattern: String,
        position: usize,
        existing: String,
        requested: String,
    },
    /// A `:` segment without a name.
    #[error("pattern {pattern}: parameter segment at {position} has no name")]
    EmptyParameterName { pattern: String, position: usize },
    /// A parameter name outside `[A-Za-z0-9_]` (Unicode word characters).
    #[error("pattern {pattern}: parameter :{name} at segment {position} is not a word")]
    InvalidParameterName {
        pattern: String,
        position: usize,
        name: String,
    },
    /// The pattern already has a value bound to it.
    #[error("pattern {pattern} is already registered")]
    AlreadyBound { pattern: String },
}

/// Ordered `(name, value)` pairs extracted while matching one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    pairs: Vec<(String, String)>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// First value bound under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect(),
        }
    }
}

/// Result of a successful match.
#[derive(Debug, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    pub value: &'a T,
    pub bindings: Bindings,
}

/// Segment-tree router mapping path patterns to values of type `T`.
#[derive(Debug)]
pub struct Router<T> {
    root: RouteNode<T>,
    len: usize,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    pub fn new() -> Self {
        Self {
            root: RouteNode::root(),
            len: 0,
        }
    }

    /// Number of bound patterns.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bind `value` to `pattern`.
    ///
    /// `"/"` binds the root. Segments starting with `:` are parameters.
    pub fn add_route(&mut self, pattern: &str, value: T) -> Result<(), RouteError> {
        let parts = segments(pattern);

        for (position, name) in parts
            .iter()
            .enumerate()
            .filter_map(|(i, s)| param_name(s).map(|name| (i, name)))
        {
            if name.is_empty() {
                return Err(RouteError::EmptyParameterName {
                    pattern: normalize(pattern),
                    position,
                });
            }
            if !is_valid_param_name(name) {
                return Err(RouteError::InvalidParameterName {
                    pattern: normalize(pattern),
                    position,
                    name: name.to_string(),
                });
            }
        }

        self.root.check(&parts, 0).map_err(|conflict| match conflict {
            InsertConflict::Parameter {
                depth,
                existing,
                requested,
            } => RouteError::ConflictingParameter {
                pattern: normalize(pattern),
                position: depth,
                existing,
                requested,
            },
            InsertConflict::Bound => RouteError::AlreadyBound {
                pattern: normalize(pattern),
            },
        })?;

        self.root.insert(&parts, value);
        self.len += 1;
        Ok(())
    }

    /// Find the value bound to `path` and the parameters it binds.
    ///
    /// `path` is the raw request path; each segment is percent-decoded
    /// before comparison, and bindings hold decoded values. A segment that
    /// does not decode to UTF-8 is a miss. Never panics; any miss is `None`.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_, T>> {
        let mut node = &self.root;
        let mut bindings = Bindings::new();

        for raw in segments(path) {
            let segment = decode(raw)?;
            node = match node.literal_child(&segment) {
                Some(child) => child,
                None => {
                    let child = node.param_child()?;
                    if let Some(name) = child.param_name() {
                        bindings.push(name, segment.into_owned());
                    }
                    child
                }
            };
        }

        node.value().map(|value| RouteMatch { value, bindings })
    }

    /// All bound patterns with their values, depth first.
    pub fn routes(&self) -> Vec<(String, &T)> {
        let mut out = Vec::with_capacity(self.len);
        self.root.visit(&mut Vec::new(), &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router(patterns: &[&'static str]) -> Router<&'static str> {
        let mut router = Router::new();
        for pattern in patterns {
            router.add_route(pattern, *pattern).unwrap();
        }
        router
    }

    #[test]
    fn test_param_binding() {
        let router = router(&["/test/:id"]);
        let m = router.match_path("/test/7").unwrap();
        assert_eq!(*m.value, "/test/:id");
        assert_eq!(m.bindings.get("id"), Some("7"));
    }

    #[test]
    fn test_bindings_left_to_right() {
        let router = router(&["/users/:user/posts/:post"]);
        let m = router.match_path("/users/ada/posts/12").unwrap();
        let pairs: Vec<_> = m.bindings.iter().collect();
        assert_eq!(pairs, vec![("user", "ada"), ("post", "12")]);
    }

    #[test]
    fn test_literal_wins_over_param() {
        let router = router(&["/api/:id", "/api/users"]);
        let m = router.match_path("/api/users").unwrap();
        assert_eq!(*m.value, "/api/users");
        assert!(m.bindings.is_empty());

        let m = router.match_path("/api/42").unwrap();
        assert_eq!(*m.value, "/api/:id");
    }

    #[test]
    fn test_no_backtracking_after_literal() {
        let router = router(&["/a/:x/c", "/a/b"]);
        // "b" takes the literal branch, which has no "c" child.
        assert!(router.match_path("/a/b/c").is_none());
        assert!(router.match_path("/a/z/c").is_some());
    }

    #[test]
    fn test_root_binding() {
        let router = router(&["/"]);
        assert_eq!(*router.match_path("/").unwrap().value, "/");
        assert_eq!(*router.match_path("").unwrap().value, "/");
    }

    #[test]
    fn test_misses() {
        let empty: Router<&str> = Router::new();
        assert!(empty.match_path("/").is_none());
        assert!(empty.match_path("/anything").is_none());

        let router = router(&["/a/b/c"]);
        assert!(router.match_path("/a/b").is_none(), "prefix node is not bound");
        assert!(router.match_path("/a/b/c/d").is_none(), "over-run");
        assert!(router.match_path("/nope").is_none());
    }

    #[test]
    fn test_match_is_idempotent() {
        let router = router(&["/w/:id"]);
        let first = router.match_path("/w/1").unwrap();
        let second = router.match_path("/w/1").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_conflicting_param_rejected() {
        let mut router = router(&["/users/:id"]);
        let err = router.add_route("/users/:name/posts", "x").unwrap_err();
        assert_eq!(
            err,
            RouteError::ConflictingParameter {
                pattern: "/users/:name/posts".into(),
                position: 1,
                existing: "id".into(),
                requested: "name".into(),
            }
        );
        // Same name at the same position is shared.
        router.add_route("/users/:id/posts", "posts").unwrap();
        let m = router.match_path("/users/3/posts").unwrap();
        assert_eq!(*m.value, "posts");
    }

    #[test]
    fn test_rejected_pattern_leaves_tree_untouched() {
        let mut router = router(&["/a/:x/b/:y"]);
        assert!(router.add_route("/a/:x/b/:z", "bad").is_err());
        assert!(router.add_route("/q/:fresh/b/:z", "ok").is_ok());
        assert_eq!(router.len(), 2);
        assert!(router.add_route("/q/:other", "conflict").is_err());
    }

    #[test]
    fn test_duplicate_and_empty_names() {
        let mut router = router(&["/dup"]);
        assert_eq!(
            router.add_route("dup/", "again"),
            Err(RouteError::AlreadyBound { pattern: "/dup".into() })
        );
        assert_eq!(
            router.add_route("/x/:", "bad"),
            Err(RouteError::EmptyParameterName { pattern: "/x/:".into(), position: 1 })
        );
    }

    #[test]
    fn test_non_word_param_name_rejected() {
        let mut router: Router<&str> = Router::new();
        assert_eq!(
            router.add_route("/x/:user-id", "bad"),
            Err(RouteError::InvalidParameterName {
                pattern: "/x/:user-id".into(),
                position: 1,
                name: "user-id".into(),
            })
        );
        assert!(router.is_empty());
        assert!(router.add_route("/x/:user_id", "ok").is_ok());
    }

    #[test]
    fn test_segments_are_percent_decoded() {
        let router = router(&["/test/:id", "/café"]);

        let m = router.match_path("/test/a%20b").unwrap();
        assert_eq!(m.bindings.get("id"), Some("a b"));

        let m = router.match_path("/test/a%2Fb").unwrap();
        assert_eq!(m.bindings.get("id"), Some("a/b"));

        assert_eq!(*router.match_path("/caf%C3%A9").unwrap().value, "/café");
        assert_eq!(*router.match_path("/café").unwrap().value, "/café");
    }

    #[test]
    fn test_undecodable_segment_misses() {
        let router = router(&["/test/:id"]);
        assert!(router.match_path("/test/%FF").is_none());
    }

    #[test]
    fn test_routes_listing() {
        let router = router(&["/", "/a", "/a/:id"]);
        let listed: Vec<String> = router.routes().into_iter().map(|(p, _)| p).collect();
        assert_eq!(listed, vec!["/", "/a", "/a/:id"]);
    }
}
