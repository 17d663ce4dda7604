//! Consumer interface for the decoded event stream, plus the stack of
//! currently-open tag names shared with consumers.

use crate::{Element, Namespace, Text};

pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Ordered sequence of currently-open element names, root first.
///
/// The decoder maintains one of these and passes it to the element
/// hooks; consumers that run outside a decode pass (or want their own
/// bookkeeping) can maintain one themselves via [`push`](Self::push)
/// and [`pop`](Self::pop).
#[derive(Debug, Clone)]
pub struct TagPath {
    names: Vec<String>,
    max_depth: usize,
}

impl TagPath {
    pub fn new(max_depth: usize) -> Self {
        Self {
            names: Vec::new(),
            max_depth,
        }
    }

    /// Pushes an opening tag. Returns `false` when the depth ceiling is
    /// hit, in which case the path is unchanged.
    pub fn push(&mut self, name: &str) -> bool {
        if self.names.len() >= self.max_depth {
            return false;
        }
        self.names.push(name.to_owned());
        true
    }

    /// Pops the innermost tag. Popping an empty path is a no-op so that
    /// surplus end tags in malformed input stay harmless.
    pub fn pop(&mut self) {
        self.names.pop();
    }

    pub fn depth(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// True when the tags open below the document root equal `tags`
    /// exactly. `matches(&["application"])` holds while the path is
    /// `manifest/application`, whatever the root is called.
    pub fn matches(&self, tags: &[&str]) -> bool {
        if self.names.len() != tags.len() + 1 {
            return false;
        }
        self.names
            .iter()
            .skip(1)
            .zip(tags)
            .all(|(have, want)| have == want)
    }

    /// True when the innermost open tag's name ends with `suffix`.
    pub fn last_ends_with(&self, suffix: &str) -> bool {
        self.names
            .last()
            .map(|name| name.ends_with(suffix))
            .unwrap_or(false)
    }
}

impl Default for TagPath {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

/// The five event hooks, dispatched synchronously in source byte order.
/// All hooks default to no-ops so consumers implement only what they
/// match on.
///
/// For element hooks, `path` includes the element the event is about:
/// the start hook sees it freshly pushed, the end hook sees it about to
/// be popped.
pub trait XmlVisitor {
    fn on_namespace_start(&mut self, _ns: &Namespace) {}

    fn on_namespace_end(&mut self, _ns: &Namespace) {}

    fn on_element_start(&mut self, _element: &Element, _path: &TagPath) {}

    fn on_element_end(&mut self, _namespace: Option<&str>, _name: &str, _path: &TagPath) {}

    fn on_text(&mut self, _text: &Text) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_matching_skips_the_root() {
        let mut path = TagPath::default();
        path.push("manifest");
        path.push("application");
        path.push("activity");

        assert!(path.matches(&["application", "activity"]));
        assert!(!path.matches(&["application"]));
        assert!(!path.matches(&["application", "service"]));

        path.pop();
        assert!(path.matches(&["application"]));
    }

    #[test]
    fn suffix_matching_checks_innermost_tag() {
        let mut path = TagPath::default();
        assert!(!path.last_ends_with("activity"));
        path.push("manifest");
        path.push("activity-alias");
        assert!(path.last_ends_with("alias"));
        assert!(!path.last_ends_with("activity"));
    }

    #[test]
    fn depth_ceiling_refuses_push() {
        let mut path = TagPath::new(2);
        assert!(path.push("a"));
        assert!(path.push("b"));
        assert!(!path.push("c"));
        assert_eq!(path.depth(), 2);
    }

    #[test]
    fn surplus_pop_is_harmless() {
        let mut path = TagPath::default();
        path.pop();
        assert_eq!(path.depth(), 0);
    }
}
