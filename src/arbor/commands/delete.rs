//! Subtree deletion.
//!
//! Deleting removes the node together with everything below it; children are
//! never spliced up into the parent.

use crate::commands::{detach_all, focused_id, Outcome};
use crate::document::Document;
use crate::model::NodeId;

/// Delete the selection when there is one, otherwise the focused node.
pub fn delete(doc: &mut Document) -> Outcome {
    if doc.selection().is_empty() {
        delete_focused(doc)
    } else {
        delete_selected(doc)
    }
}

/// Remove the focused node.
///
/// Focus moves to the sibling now sitting just before the gap (or the one
/// that slid into it when the node was first), then to the parent, and is
/// cleared only when the tree has no nodes left.
pub fn delete_focused(doc: &mut Document) -> Outcome {
    doc.apply("delete", remove_focused)
}

/// Single-delete body shared with cut. Runs inside the caller's `apply`.
pub(crate) fn remove_focused(doc: &mut Document) -> Outcome {
    let Some(id) = focused_id(doc) else {
        return Outcome::Ignored;
    };
    let Some(detached) = doc.tree_mut().detach(&id) else {
        return Outcome::Ignored;
    };

    let focus = focus_after_removal(doc, &detached.parent, detached.index);
    doc.set_focus(focus.clone());
    Outcome::Applied { focus }
}

fn focus_after_removal(doc: &Document, parent: &NodeId, index: usize) -> Option<NodeId> {
    let parent_node = doc.tree().find(parent)?;
    match parent_node.children.get(index.saturating_sub(1)) {
        Some(sibling) => Some(sibling.id.clone()),
        None if !parent.is_root() => Some(parent.clone()),
        None => None,
    }
}

/// Remove every selected node. Nodes nested under another selected node go
/// with their ancestor.
pub fn delete_selected(doc: &mut Document) -> Outcome {
    doc.apply("delete_selected", |doc| {
        let tree = doc.tree();
        let doomed: Vec<NodeId> = tree
            .document_order()
            .into_iter()
            .filter(|id| doc.selection().contains(id))
            .filter(|id| {
                !tree
                    .ancestors(id)
                    .iter()
                    .any(|anc| doc.selection().contains(anc))
            })
            .collect();
        if doomed.is_empty() {
            return Outcome::Ignored;
        }

        detach_all(doc.tree_mut(), &doomed);
        doc.selection_mut().clear();
        let focus = doc.tree().top_level().first().map(|n| n.id.clone());
        doc.set_focus(focus.clone());
        Outcome::Applied { focus }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::doc_fixture;

    #[test]
    fn delete_focuses_previous_sibling() {
        let (mut doc, ids) = doc_fixture(&[(0, "a"), (0, "b"), (0, "c")]);
        doc.set_focus(Some(ids[2].clone()));
        let outcome = delete_focused(&mut doc);
        assert_eq!(outcome.focus(), Some(&ids[1]));
        assert_eq!(doc.tree().len(), 2);
    }

    #[test]
    fn deleting_first_sibling_focuses_the_next_one() {
        let (mut doc, ids) = doc_fixture(&[(0, "a"), (0, "b")]);
        delete_focused(&mut doc);
        assert_eq!(doc.focus(), Some(&ids[1]));
    }

    #[test]
    fn deleting_only_child_focuses_parent() {
        let (mut doc, ids) = doc_fixture(&[(0, "a"), (1, "x")]);
        doc.set_focus(Some(ids[1].clone()));
        delete_focused(&mut doc);
        assert_eq!(doc.focus(), Some(&ids[0]));
    }

    #[test]
    fn deleting_last_node_clears_focus() {
        let (mut doc, _) = doc_fixture(&[(0, "only")]);
        let outcome = delete_focused(&mut doc);
        assert_eq!(outcome, Outcome::Applied { focus: None });
        assert!(doc.tree().is_empty());
    }

    #[test]
    fn delete_takes_the_whole_subtree() {
        let (mut doc, ids) = doc_fixture(&[(0, "a"), (1, "b"), (2, "c"), (0, "d")]);
        doc.set_focus(Some(ids[1].clone()));
        delete_focused(&mut doc);
        assert!(!doc.tree().contains(&ids[1]));
        assert!(!doc.tree().contains(&ids[2]));
        assert!(doc.tree().find(&ids[0]).unwrap().children.is_empty());
    }

    #[test]
    fn delete_without_focus_is_ignored() {
        let (mut doc, _) = doc_fixture(&[(0, "a")]);
        doc.set_focus(None);
        assert_eq!(delete_focused(&mut doc), Outcome::Ignored);
        assert_eq!(doc.history().len(), 1);
    }

    #[test]
    fn multi_delete_removes_across_parents() {
        let (mut doc, ids) = doc_fixture(&[(0, "a"), (1, "x"), (0, "b"), (1, "y"), (0, "c")]);
        doc.selection_mut().insert(ids[3].clone());
        doc.selection_mut().insert(ids[1].clone());
        doc.selection_mut().insert(ids[4].clone());

        let outcome = delete(&mut doc);
        assert_eq!(doc.tree().len(), 2);
        assert!(doc.selection().is_empty());
        assert_eq!(outcome.focus(), Some(&ids[0]));
    }

    #[test]
    fn multi_delete_of_everything_clears_focus() {
        let (mut doc, ids) = doc_fixture(&[(0, "a"), (1, "x"), (0, "b")]);
        for id in &ids {
            doc.selection_mut().insert(id.clone());
        }
        assert_eq!(delete(&mut doc), Outcome::Applied { focus: None });
        assert!(doc.tree().is_empty());
    }

    #[test]
    fn multi_delete_ignores_stale_selection() {
        let (mut doc, _) = doc_fixture(&[(0, "a")]);
        doc.selection_mut().insert(NodeId::new("node-99"));
        assert_eq!(delete_selected(&mut doc), Outcome::Ignored);
        assert_eq!(doc.tree().len(), 1);
    }

    #[test]
    fn undo_brings_the_subtree_back() {
        let (mut doc, ids) = doc_fixture(&[(0, "a"), (1, "b"), (0, "c")]);
        let before = doc.to_json().unwrap();
        delete_focused(&mut doc);
        doc.undo();
        assert_eq!(doc.to_json().unwrap(), before);
        assert_eq!(doc.focus(), Some(&ids[0]));
    }
}
