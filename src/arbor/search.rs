//! # Search Index
//!
//! Case-insensitive substring search over node texts, with a cyclic cursor
//! over the hits.
//!
//! [`find_matches`] is the pure query. [`SearchState`] keeps the last query's
//! results per document; focusing a hit (and expanding its ancestors) is done
//! by the cursor commands in [`crate::commands::cursor`].

use crate::model::NodeId;
use crate::tree::Tree;
use serde::{Deserialize, Serialize};

/// Which nodes a search looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    /// Visible order only: nodes under a collapsed ancestor are skipped.
    #[default]
    Visible,
    /// Every node, collapsed or not.
    All,
}

/// Ids whose text contains `query`, ignoring case, in document order.
/// An empty query matches nothing.
pub fn find_matches(tree: &Tree, query: &str, scope: SearchScope) -> Vec<NodeId> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    let walk = match scope {
        SearchScope::Visible => tree.walk_visible(),
        SearchScope::All => tree.walk(),
    };
    walk.filter(|(n, _)| n.text.to_lowercase().contains(&needle))
        .map(|(n, _)| n.id.clone())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Inactive,
    NoResults,
    /// `position` is 1-based, as shown to the user ("2 / 5").
    At { position: usize, total: usize },
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStatus::Inactive => Ok(()),
            SearchStatus::NoResults => write!(f, "no results"),
            SearchStatus::At { position, total } => write!(f, "{} / {}", position, total),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    query: String,
    scope: SearchScope,
    results: Vec<NodeId>,
    cursor: Option<usize>,
}

impl SearchState {
    /// Run `query` and park the cursor on the first hit.
    pub fn run(&mut self, tree: &Tree, query: &str, scope: SearchScope) -> SearchStatus {
        self.query = query.to_string();
        self.scope = scope;
        self.results = find_matches(tree, query, scope);
        self.cursor = if self.results.is_empty() { None } else { Some(0) };
        self.status()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn scope(&self) -> SearchScope {
        self.scope
    }

    pub fn results(&self) -> &[NodeId] {
        &self.results
    }

    pub fn current(&self) -> Option<&NodeId> {
        self.cursor.and_then(|i| self.results.get(i))
    }

    pub fn status(&self) -> SearchStatus {
        if self.query.is_empty() {
            return SearchStatus::Inactive;
        }
        match self.cursor {
            Some(i) => SearchStatus::At {
                position: i + 1,
                total: self.results.len(),
            },
            None => SearchStatus::NoResults,
        }
    }

    /// Advance to the next hit, wrapping past the last.
    pub fn next(&mut self) -> Option<&NodeId> {
        let len = self.results.len();
        let i = self.cursor?;
        self.cursor = Some((i + 1) % len);
        self.current()
    }

    /// Step back to the previous hit, wrapping past the first.
    pub fn prev(&mut self) -> Option<&NodeId> {
        let len = self.results.len();
        let i = self.cursor?;
        self.cursor = Some((i + len - 1) % len);
        self.current()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Forget hits that no longer exist in `tree`, keeping the cursor on the
    /// same hit when it survives.
    pub fn retain_existing(&mut self, tree: &Tree) {
        if self.results.iter().all(|id| tree.contains(id)) {
            return;
        }
        let current = self.current().cloned();
        self.results.retain(|id| tree.contains(id));
        self.cursor = if self.results.is_empty() {
            None
        } else {
            let kept = current.and_then(|c| self.results.iter().position(|id| *id == c));
            Some(kept.unwrap_or(0))
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixture;

    #[test]
    fn empty_query_matches_nothing() {
        let (tree, _) = fixture(&[(0, "anything")]);
        assert!(find_matches(&tree, "", SearchScope::All).is_empty());

        let mut state = SearchState::default();
        assert_eq!(state.run(&tree, "", SearchScope::Visible), SearchStatus::Inactive);
    }

    #[test]
    fn matching_is_case_insensitive_in_document_order() {
        let (tree, ids) = fixture(&[(0, "Buy milk"), (0, "walk"), (1, "Buy eggs")]);
        let mut state = SearchState::default();
        let status = state.run(&tree, "buy", SearchScope::Visible);
        assert_eq!(state.results(), &[ids[0].clone(), ids[2].clone()]);
        assert_eq!(status, SearchStatus::At { position: 1, total: 2 });
        assert_eq!(state.current(), Some(&ids[0]));
    }

    #[test]
    fn no_hits_reports_no_results() {
        let (tree, _) = fixture(&[(0, "a")]);
        let mut state = SearchState::default();
        assert_eq!(state.run(&tree, "zzz", SearchScope::All), SearchStatus::NoResults);
        assert!(state.next().is_none());
        assert_eq!(state.status().to_string(), "no results");
    }

    #[test]
    fn cursor_cycles_both_ways() {
        let (tree, ids) = fixture(&[(0, "x1"), (0, "x2"), (0, "x3")]);
        let mut state = SearchState::default();
        state.run(&tree, "x", SearchScope::Visible);
        assert_eq!(state.prev(), Some(&ids[2]));
        assert_eq!(state.next(), Some(&ids[0]));
        assert_eq!(state.next(), Some(&ids[1]));
        assert_eq!(state.status().to_string(), "2 / 3");
    }

    #[test]
    fn scope_decides_whether_collapsed_nodes_count() {
        let (mut tree, ids) = fixture(&[(0, "top"), (1, "hidden note")]);
        tree.find_mut(&ids[0]).unwrap().collapsed = true;
        assert!(find_matches(&tree, "note", SearchScope::Visible).is_empty());
        assert_eq!(find_matches(&tree, "note", SearchScope::All), vec![ids[1].clone()]);
    }

    #[test]
    fn retain_existing_keeps_cursor_on_surviving_hit() {
        let (mut tree, ids) = fixture(&[(0, "x1"), (0, "x2"), (0, "x3")]);
        let mut state = SearchState::default();
        state.run(&tree, "x", SearchScope::Visible);
        state.next();
        state.next();
        tree.detach(&ids[0]);
        state.retain_existing(&tree);
        assert_eq!(state.results().len(), 2);
        assert_eq!(state.current(), Some(&ids[2]));
    }
}
