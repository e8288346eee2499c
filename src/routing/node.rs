//! Routing tree nodes.

use super::segment::param_name;

/// What a node matches at its tree position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeKind {
    /// The root node (zero segments consumed).
    Root,
    /// Matches one segment by exact text.
    Literal(String),
    /// Matches any single segment and binds it under this name.
    Param(String),
}

/// Why a pattern cannot be inserted below a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InsertConflict {
    /// A parameter with another name already occupies this position.
    Parameter { depth: usize, existing: String, requested: String },
    /// The terminal node is already bound.
    Bound,
}

/// A node in the routing tree.
///
/// Invariant: at most one parameter child, literal children unique by text.
#[derive(Debug)]
pub(crate) struct RouteNode<T> {
    kind: NodeKind,
    literals: Vec<RouteNode<T>>,
    param: Option<Box<RouteNode<T>>>,
    value: Option<T>,
}

impl<T> RouteNode<T> {
    pub(crate) fn root() -> Self {
        Self::with_kind(NodeKind::Root)
    }

    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            literals: Vec::new(),
            param: None,
            value: None,
        }
    }

    pub(crate) fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Name bound by this node, if it is a parameter node.
    pub(crate) fn param_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Param(name) => Some(name),
            _ => None,
        }
    }

    pub(crate) fn literal_child(&self, segment: &str) -> Option<&RouteNode<T>> {
        self.literals
            .iter()
            .find(|child| matches!(&child.kind, NodeKind::Literal(text) if text == segment))
    }

    pub(crate) fn param_child(&self) -> Option<&RouteNode<T>> {
        self.param.as_deref()
    }

    /// Read-only walk that reports whether `segments` could be inserted.
    ///
    /// Runs before `insert` so a rejected pattern leaves the tree untouched.
    pub(crate) fn check(&self, segments: &[&str], depth: usize) -> Result<(), InsertConflict> {
        let Some((first, rest)) = segments.split_first() else {
            return match self.value {
                Some(_) => Err(InsertConflict::Bound),
                None => Ok(()),
            };
        };

        let next = match param_name(first) {
            Some(name) => match self.param.as_deref() {
                Some(child) => match child.param_name() {
                    Some(existing) if existing != name => {
                        return Err(InsertConflict::Parameter {
                            depth,
                            existing: existing.to_string(),
                            requested: name.to_string(),
                        });
                    }
                    _ => Some(child),
                },
                None => None,
            },
            None => self.literal_child(first),
        };

        match next {
            Some(child) => child.check(rest, depth + 1),
            // The remainder becomes a fresh branch.
            None => Ok(()),
        }
    }

    /// Walk/create nodes for `segments` and bind `value` at the end.
    ///
    /// Callers must have run `check` first.
    pub(crate) fn insert(&mut self, segments: &[&str], value: T) {
        let Some((first, rest)) = segments.split_first() else {
            self.value = Some(value);
            return;
        };

        let child = match param_name(first) {
            Some(name) => &mut **self
                .param
                .get_or_insert_with(|| Box::new(RouteNode::with_kind(NodeKind::Param(name.to_string())))),
            None => {
                let index = match self
                    .literals
                    .iter()
                    .position(|c| matches!(&c.kind, NodeKind::Literal(text) if text == first))
                {
                    Some(index) => index,
                    None => {
                        self.literals
                            .push(RouteNode::with_kind(NodeKind::Literal(first.to_string())));
                        self.literals.len() - 1
                    }
                };
                &mut self.literals[index]
            }
        };
        child.insert(rest, value);
    }

    /// Depth-first visit of every bound node, in insertion order.
    pub(crate) fn visit<'a>(&'a self, prefix: &mut Vec<String>, out: &mut Vec<(String, &'a T)>) {
        if let Some(value) = &self.value {
            out.push((format!("/{}", prefix.join("/")), value));
        }
        for child in &self.literals {
            if let NodeKind::Literal(text) = &child.kind {
                prefix.push(text.clone());
                child.visit(prefix, out);
                prefix.pop();
            }
        }
        if let Some(child) = self.param.as_deref() {
            if let NodeKind::Param(name) = &child.kind {
                prefix.push(format!(":{}", name));
                child.visit(prefix, out);
                prefix.pop();
            }
        }
    }
}
