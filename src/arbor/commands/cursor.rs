//! Focus, selection and search-result movement.
//!
//! Nothing here records history. Moving focus ends a pending text/memo edit
//! (committing it) the same way a blur would.
//!
//! Up/down movement uses same-level navigation, which crosses parent
//! boundaries; the strict-sibling variants are kept for hosts that prefer
//! them.

use crate::document::Document;
use crate::model::NodeId;
use crate::navigation;
use crate::search::{SearchScope, SearchStatus};
use crate::tree::Tree;

fn move_focus(doc: &mut Document, id: NodeId) {
    doc.commit_edit();
    doc.set_focus(Some(id));
}

/// Focus `id` (a click). Clears the selection.
pub fn focus_node(doc: &mut Document, id: &NodeId) -> bool {
    if id.is_root() || !doc.tree().contains(id) {
        return false;
    }
    doc.selection_mut().clear();
    move_focus(doc, id.clone());
    true
}

pub fn focus_next(doc: &mut Document) -> bool {
    step(doc, navigation::next_at_same_level)
}

pub fn focus_prev(doc: &mut Document) -> bool {
    step(doc, navigation::prev_at_same_level)
}

pub fn focus_next_sibling(doc: &mut Document) -> bool {
    step(doc, navigation::next_sibling)
}

pub fn focus_prev_sibling(doc: &mut Document) -> bool {
    step(doc, navigation::prev_sibling)
}

/// Plain arrow movement: clears the selection, then moves if there is
/// somewhere to go.
fn step(doc: &mut Document, neighbour: fn(&Tree, &NodeId) -> Option<NodeId>) -> bool {
    doc.selection_mut().clear();
    let Some(target) = doc.focus().and_then(|id| neighbour(doc.tree(), id)) else {
        return false;
    };
    move_focus(doc, target);
    true
}

/// Left arrow: focus the parent unless it is the root.
pub fn focus_parent(doc: &mut Document) -> bool {
    let parent = doc
        .focus()
        .and_then(|id| doc.tree().find_parent(id))
        .filter(|p| !p.id.is_root())
        .map(|p| p.id.clone());
    match parent {
        Some(parent) => {
            move_focus(doc, parent);
            true
        }
        None => false,
    }
}

/// Right arrow: focus the first child of an expanded node.
pub fn focus_first_child(doc: &mut Document) -> bool {
    let child = doc
        .focused_node()
        .filter(|n| !n.collapsed)
        .and_then(|n| n.children.first())
        .map(|c| c.id.clone());
    match child {
        Some(child) => {
            move_focus(doc, child);
            true
        }
        None => false,
    }
}

pub fn extend_selection_up(doc: &mut Document) -> bool {
    extend(doc, navigation::prev_at_same_level)
}

pub fn extend_selection_down(doc: &mut Document) -> bool {
    extend(doc, navigation::next_at_same_level)
}

/// Shift+arrow: add the focused node and its same-level neighbour to the
/// selection and focus the neighbour.
fn extend(doc: &mut Document, neighbour: fn(&Tree, &NodeId) -> Option<NodeId>) -> bool {
    let Some(current) = doc.focus().cloned() else {
        return false;
    };
    let Some(target) = neighbour(doc.tree(), &current) else {
        return false;
    };
    let selection = doc.selection_mut();
    selection.insert(current);
    selection.insert(target.clone());
    move_focus(doc, target);
    true
}

pub fn clear_selection(doc: &mut Document) {
    doc.selection_mut().clear();
}

/// Replace the selection. Unknown ids and the root are dropped; order is kept.
pub fn select_range(doc: &mut Document, ids: &[NodeId]) -> usize {
    let tree = doc.tree();
    let keep: Vec<NodeId> = ids
        .iter()
        .filter(|id| !id.is_root() && tree.contains(id))
        .cloned()
        .collect();
    let selection = doc.selection_mut();
    selection.clear();
    selection.extend(keep);
    selection.len()
}

/// Clear `collapsed` on every ancestor of `id` so it shows in visible order.
/// Returns how many ancestors were expanded.
///
/// A pending edit is committed first so the expansion never lands in its
/// snapshot.
pub fn reveal(doc: &mut Document, id: &NodeId) -> usize {
    doc.commit_edit();
    let ancestors = doc.tree().ancestors(id);
    let mut expanded = 0;
    for ancestor in ancestors {
        if let Some(node) = doc.tree_mut().find_mut(&ancestor) {
            if node.collapsed {
                node.collapsed = false;
                expanded += 1;
            }
        }
    }
    expanded
}

/// Run a search and focus the first hit.
pub fn search(doc: &mut Document, query: &str, scope: SearchScope) -> SearchStatus {
    let status = doc.run_search(query, scope);
    tracing::debug!(query, %status, "search");
    search_focus_current(doc);
    status
}

/// Focus the current hit, expanding whatever hides it.
pub fn search_focus_current(doc: &mut Document) -> Option<NodeId> {
    let id = doc.search_state().current().cloned()?;
    if !doc.tree().contains(&id) {
        return None;
    }
    reveal(doc, &id);
    move_focus(doc, id.clone());
    Some(id)
}

pub fn search_next(doc: &mut Document) -> Option<NodeId> {
    doc.search_state_mut().next()?;
    search_focus_current(doc)
}

pub fn search_prev(doc: &mut Document) -> Option<NodeId> {
    doc.search_state_mut().prev()?;
    search_focus_current(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::decorate;
    use crate::document::EditField;
    use crate::test_utils::doc_fixture;

    #[test]
    fn focus_next_uses_same_level() {
        let (mut doc, ids) = doc_fixture(&[(0, "a"), (1, "a1"), (0, "b"), (1, "b1")]);
        doc.set_focus(Some(ids[1].clone()));
        assert!(focus_next(&mut doc));
        assert_eq!(doc.focus(), Some(&ids[3]));
        assert!(!focus_next(&mut doc));
        assert!(focus_prev(&mut doc));
        assert_eq!(doc.focus(), Some(&ids[1]));
    }

    #[test]
    fn sibling_focus_stays_in_parent() {
        let (mut doc, ids) = doc_fixture(&[(0, "a"), (1, "a1"), (0, "b"), (1, "b1")]);
        doc.set_focus(Some(ids[1].clone()));
        assert!(!focus_next_sibling(&mut doc));
        doc.set_focus(Some(ids[0].clone()));
        assert!(focus_next_sibling(&mut doc));
        assert_eq!(doc.focus(), Some(&ids[2]));
        assert!(focus_prev_sibling(&mut doc));
        assert_eq!(doc.focus(), Some(&ids[0]));
    }

    #[test]
    fn arrows_clear_selection() {
        let (mut doc, ids) = doc_fixture(&[(0, "a"), (0, "b")]);
        doc.selection_mut().insert(ids[1].clone());
        focus_next(&mut doc);
        assert!(doc.selection().is_empty());
    }

    #[test]
    fn parent_and_child_focus() {
        let (mut doc, ids) = doc_fixture(&[(0, "a"), (1, "x")]);
        assert!(!focus_parent(&mut doc));
        assert!(focus_first_child(&mut doc));
        assert_eq!(doc.focus(), Some(&ids[1]));
        assert!(focus_parent(&mut doc));
        assert_eq!(doc.focus(), Some(&ids[0]));

        doc.tree_mut().find_mut(&ids[0]).unwrap().collapsed = true;
        assert!(!focus_first_child(&mut doc));
    }

    #[test]
    fn focus_node_rejects_root_and_unknown() {
        let (mut doc, ids) = doc_fixture(&[(0, "a"), (0, "b")]);
        assert!(!focus_node(&mut doc, &NodeId::root()));
        assert!(!focus_node(&mut doc, &NodeId::new("node-50")));
        assert!(focus_node(&mut doc, &ids[1]));
        assert_eq!(doc.focus(), Some(&ids[1]));
    }

    #[test]
    fn moving_focus_commits_pending_edit() {
        let (mut doc, ids) = doc_fixture(&[(0, "a"), (0, "b")]);
        doc.set_text("edited");
        assert!(doc.edit_session().is_some());
        focus_node(&mut doc, &ids[1]);
        assert!(doc.edit_session().is_none());
        assert_eq!(doc.history().len(), 2);
        assert!(doc.begin_edit(EditField::Memo));
    }

    #[test]
    fn shift_arrows_grow_the_selection() {
        let (mut doc, ids) = doc_fixture(&[(0, "a"), (0, "b"), (0, "c")]);
        assert!(extend_selection_down(&mut doc));
        assert!(extend_selection_down(&mut doc));
        let selected: Vec<_> = doc.selection().iter().cloned().collect();
        assert_eq!(selected, ids);
        assert_eq!(doc.focus(), Some(&ids[2]));
        assert!(!extend_selection_down(&mut doc));

        clear_selection(&mut doc);
        assert!(doc.selection().is_empty());
    }

    #[test]
    fn select_range_filters_unknown_ids() {
        let (mut doc, ids) = doc_fixture(&[(0, "a"), (0, "b")]);
        let n = select_range(
            &mut doc,
            &[ids[1].clone(), NodeId::root(), NodeId::new("ghost"), ids[0].clone()],
        );
        assert_eq!(n, 2);
        assert_eq!(doc.selection().get_index(0), Some(&ids[1]));
    }

    #[test]
    fn search_focuses_and_reveals_hits() {
        let (mut doc, ids) = doc_fixture(&[(0, "list"), (1, "Buy milk"), (0, "Buy eggs")]);
        doc.tree_mut().find_mut(&ids[0]).unwrap().collapsed = true;
        let history = doc.history().len();

        let status = search(&mut doc, "buy", SearchScope::All);
        assert_eq!(status, SearchStatus::At { position: 1, total: 2 });
        assert_eq!(doc.focus(), Some(&ids[1]));
        assert!(!doc.tree().find(&ids[0]).unwrap().collapsed);
        assert_eq!(doc.history().len(), history);

        assert_eq!(search_next(&mut doc), Some(ids[2].clone()));
        assert_eq!(search_next(&mut doc), Some(ids[1].clone()));
        assert_eq!(search_prev(&mut doc), Some(ids[2].clone()));
    }

    #[test]
    fn search_during_an_untouched_edit_records_nothing() {
        let (mut doc, ids) = doc_fixture(&[(0, "list"), (1, "hidden"), (0, "other")]);
        assert!(decorate::toggle_collapse(&mut doc, &ids[0]).is_applied());
        focus_node(&mut doc, &ids[2]);
        assert!(doc.begin_edit(EditField::Text));
        let history = doc.history().len();

        search(&mut doc, "hidden", SearchScope::All);
        assert_eq!(doc.focus(), Some(&ids[1]));
        assert!(!doc.tree().find(&ids[0]).unwrap().collapsed);
        assert!(doc.edit_session().is_none());
        assert_eq!(doc.history().len(), history);
    }

    #[test]
    fn visible_search_skips_collapsed() {
        let (mut doc, ids) = doc_fixture(&[(0, "list"), (1, "Buy milk"), (0, "Buy eggs")]);
        doc.tree_mut().find_mut(&ids[0]).unwrap().collapsed = true;
        search(&mut doc, "buy", SearchScope::Visible);
        assert_eq!(doc.search_state().results(), &[ids[2].clone()]);
        assert_eq!(doc.focus(), Some(&ids[2]));
    }

    #[test]
    fn search_without_hits_keeps_focus() {
        let (mut doc, ids) = doc_fixture(&[(0, "a")]);
        assert_eq!(search(&mut doc, "zzz", SearchScope::Visible), SearchStatus::NoResults);
        assert_eq!(doc.focus(), Some(&ids[0]));
        assert!(search_next(&mut doc).is_none());
    }
}
