//! Route tree nodes and path segment classification.
//!
//! The tree maps path segments to child nodes. Static children live in a
//! per-node map keyed by literal segment text; each node additionally holds
//! at most one dynamic child (a `:name` segment), enforced structurally by
//! the [`RouteNode`] layout. Nodes carry the per-method handler chains
//! written by the registrar and the two middleware lists written by the
//! attacher: local middleware applies only when the node is the terminal
//! match, global middleware applies to the node and every descendant.

use std::collections::HashMap;

use http::Method;

use crate::error::ArborError;
use crate::handler::BoxHandler;
use crate::types::BuildHasher;

/// Reserved sigil marking a dynamic path segment.
pub(crate) const DYNAMIC_SIGIL: char = ':';

/// A single path segment, classified once at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
  /// Literal text matched case-sensitively.
  Static(String),
  /// Dynamic segment binding the matched value to the contained name.
  Dynamic(String),
}

impl Segment {
  /// Classifies a raw registration segment.
  ///
  /// Query-string and fragment suffixes are stripped before classification,
  /// so `users?limit=10` and `users#section` both register as `users`.
  pub(crate) fn parse(raw: &str) -> Self {
    let clean = raw
      .split('#')
      .next()
      .unwrap_or_default()
      .split('?')
      .next()
      .unwrap_or_default();

    match clean.strip_prefix(DYNAMIC_SIGIL) {
      Some(name) => Self::Dynamic(name.to_string()),
      None => Self::Static(clean.to_string()),
    }
  }
}

/// The single dynamic child a node may have.
#[derive(Default)]
pub(crate) struct DynamicChild {
  /// Parameter name the matched segment value is bound to.
  pub(crate) name: String,
  pub(crate) node: RouteNode,
}

/// One node of the route tree. The root node represents path `/`.
#[derive(Default)]
pub(crate) struct RouteNode {
  /// Static children keyed by literal segment text.
  pub(crate) children: HashMap<String, RouteNode, BuildHasher>,
  /// At most one dynamic child per node.
  pub(crate) dynamic: Option<Box<DynamicChild>>,
  /// Handler chains keyed by HTTP method, written only by the registrar.
  pub(crate) method_handlers: HashMap<Method, Vec<BoxHandler>, BuildHasher>,
  /// Middleware applied only when this node is the terminal match.
  pub(crate) local_middlewares: Vec<BoxHandler>,
  /// Middleware applied to this node and every descendant.
  pub(crate) global_middlewares: Vec<BoxHandler>,
}

impl RouteNode {
  /// Descends into the child for `segment`, creating it if absent.
  ///
  /// A dynamic segment whose parameter name differs from an already-present
  /// dynamic sibling is a `route-conflict`: only one dynamic pattern is
  /// allowed per parent, and the tree retains the first one registered.
  pub(crate) fn descend_mut(
    &mut self,
    segment: &Segment,
    full_path: &str,
  ) -> Result<&mut RouteNode, ArborError> {
    match segment {
      Segment::Static(text) => Ok(self.children.entry(text.clone()).or_default()),
      Segment::Dynamic(name) => {
        let child = self.dynamic.get_or_insert_with(|| {
          Box::new(DynamicChild {
            name: name.clone(),
            node: RouteNode::default(),
          })
        });

        if child.name != *name {
          return Err(ArborError::error(
            "route-conflict",
            format!(
              "route {full_path} conflicts with existing dynamic segment :{}; \
               only one dynamic segment is allowed per parent",
              child.name
            ),
          ));
        }

        Ok(&mut child.node)
      }
    }
  }
}

impl std::fmt::Debug for RouteNode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RouteNode")
      .field("children", &self.children.keys().collect::<Vec<_>>())
      .field("dynamic", &self.dynamic.as_ref().map(|d| d.name.clone()))
      .field(
        "methods",
        &self.method_handlers.keys().collect::<Vec<_>>(),
      )
      .field("local_middlewares", &self.local_middlewares.len())
      .field("global_middlewares", &self.global_middlewares.len())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_strips_query_and_fragment() {
    assert_eq!(Segment::parse("users"), Segment::Static("users".into()));
    assert_eq!(
      Segment::parse("users?limit=10"),
      Segment::Static("users".into())
    );
    assert_eq!(
      Segment::parse("users#section"),
      Segment::Static("users".into())
    );
    assert_eq!(Segment::parse(":id"), Segment::Dynamic("id".into()));
    assert_eq!(Segment::parse(":id?x=1"), Segment::Dynamic("id".into()));
  }

  #[test]
  fn second_dynamic_sibling_conflicts() {
    let mut root = RouteNode::default();
    root
      .descend_mut(&Segment::Dynamic("id".into()), "/user/:id")
      .unwrap();

    let err = root
      .descend_mut(&Segment::Dynamic("name".into()), "/user/:name")
      .unwrap_err();
    assert_eq!(err.code(), "route-conflict");

    // The tree keeps the first dynamic name.
    assert_eq!(root.dynamic.as_ref().unwrap().name, "id");
  }

  #[test]
  fn same_dynamic_name_reuses_node() {
    let mut root = RouteNode::default();
    root
      .descend_mut(&Segment::Dynamic("id".into()), "/user/:id")
      .unwrap();
    root
      .descend_mut(&Segment::Dynamic("id".into()), "/user/:id/tracks")
      .unwrap();
    assert!(root.dynamic.is_some());
    assert!(root.children.is_empty());
  }
}
