//! # Navigation
//!
//! Read-only queries over a [`Tree`] that keyboard movement and search build on.
//!
//! ## Levels and Visible Order
//!
//! A node's level is its depth below the root, top-level nodes being level 1.
//! Visible order is document order with the descendants of every collapsed
//! node removed; [`flatten_visible`] materializes it as `(node, level)` pairs.
//!
//! ## Two Neighbour Models
//!
//! - **Same level, anywhere** ([`next_at_same_level`], [`prev_at_same_level`]):
//!   scan visible order for the nearest entry at the same level, crossing
//!   parent boundaries. Up/down movement in the outliner uses this one.
//! - **Strict siblings** ([`next_sibling`], [`prev_sibling`]): adjacency in the
//!   parent's children. Used by the toolbar swaps and by move-right.
//!
//! A node hidden under a collapsed ancestor is not in visible order, so it
//! has no same-level neighbours. Its strict siblings are still reported.

use crate::model::{Node, NodeId};
use crate::tree::Tree;

pub fn level(tree: &Tree, id: &NodeId) -> Option<usize> {
    tree.level_of(id)
}

pub fn flatten_visible(tree: &Tree) -> Vec<(&Node, usize)> {
    tree.walk_visible().collect()
}

pub fn next_at_same_level(tree: &Tree, id: &NodeId) -> Option<NodeId> {
    let visible = flatten_visible(tree);
    let at = visible.iter().position(|(n, _)| &n.id == id)?;
    let level = visible[at].1;
    visible[at + 1..]
        .iter()
        .find(|(_, l)| *l == level)
        .map(|(n, _)| n.id.clone())
}

pub fn prev_at_same_level(tree: &Tree, id: &NodeId) -> Option<NodeId> {
    let visible = flatten_visible(tree);
    let at = visible.iter().position(|(n, _)| &n.id == id)?;
    let level = visible[at].1;
    visible[..at]
        .iter()
        .rev()
        .find(|(_, l)| *l == level)
        .map(|(n, _)| n.id.clone())
}

pub fn next_sibling(tree: &Tree, id: &NodeId) -> Option<NodeId> {
    let parent = tree.find_parent(id)?;
    let index = parent.child_index(id)?;
    parent.children.get(index + 1).map(|n| n.id.clone())
}

pub fn prev_sibling(tree: &Tree, id: &NodeId) -> Option<NodeId> {
    let parent = tree.find_parent(id)?;
    let index = parent.child_index(id)?;
    index
        .checked_sub(1)
        .and_then(|i| parent.children.get(i))
        .map(|n| n.id.clone())
}

/// Texts from the top-level ancestor down to `id`.
///
/// Each entry is cut to `width` characters followed by `...` when longer;
/// empty texts show as `placeholder`. Unknown ids give an empty path.
pub fn breadcrumb(tree: &Tree, id: &NodeId, width: usize, placeholder: &str) -> Vec<String> {
    let Some(node) = tree.find(id) else {
        return Vec::new();
    };
    if node.id.is_root() {
        return Vec::new();
    }

    let mut path: Vec<&Node> = tree
        .ancestors(id)
        .iter()
        .filter_map(|a| tree.find(a))
        .collect();
    path.reverse();
    path.push(node);

    path.into_iter()
        .map(|n| crumb(&n.text, width, placeholder))
        .collect()
}

fn crumb(text: &str, width: usize, placeholder: &str) -> String {
    if text.is_empty() {
        return placeholder.to_string();
    }
    if text.chars().count() > width {
        let cut: String = text.chars().take(width).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixture;

    fn outline() -> (Tree, Vec<NodeId>) {
        fixture(&[
            (0, "a"),
            (1, "a1"),
            (1, "a2"),
            (0, "b"),
            (1, "b1"),
            (2, "b1x"),
            (0, "c"),
        ])
    }

    #[test]
    fn flatten_visible_pairs_nodes_with_levels() {
        let (tree, _) = outline();
        let flat: Vec<_> = flatten_visible(&tree)
            .into_iter()
            .map(|(n, l)| (n.text.as_str(), l))
            .collect();
        assert_eq!(
            flat,
            vec![("a", 1), ("a1", 2), ("a2", 2), ("b", 1), ("b1", 2), ("b1x", 3), ("c", 1)]
        );
    }

    #[test]
    fn flatten_visible_hides_collapsed_descendants() {
        let (mut tree, ids) = outline();
        tree.find_mut(&ids[3]).unwrap().collapsed = true;
        let flat = flatten_visible(&tree);
        assert!(flat.iter().all(|(n, _)| n.id != ids[4] && n.id != ids[5]));
        // the collapsed node itself stays visible
        assert!(flat.iter().any(|(n, _)| n.id == ids[3]));
    }

    #[test]
    fn same_level_crosses_parents() {
        let (tree, ids) = outline();
        assert_eq!(next_at_same_level(&tree, &ids[2]), Some(ids[4].clone()));
        assert_eq!(prev_at_same_level(&tree, &ids[4]), Some(ids[2].clone()));
        assert_eq!(next_at_same_level(&tree, &ids[0]), Some(ids[3].clone()));
    }

    #[test]
    fn same_level_stops_at_the_ends() {
        let (tree, ids) = outline();
        assert_eq!(prev_at_same_level(&tree, &ids[0]), None);
        assert_eq!(next_at_same_level(&tree, &ids[6]), None);
        assert_eq!(next_at_same_level(&tree, &ids[5]), None);
    }

    #[test]
    fn same_level_skips_collapsed_subtrees() {
        let (mut tree, ids) = outline();
        tree.find_mut(&ids[3]).unwrap().collapsed = true;
        assert_eq!(next_at_same_level(&tree, &ids[2]), None);
        // hidden nodes have no same-level neighbours
        assert_eq!(prev_at_same_level(&tree, &ids[4]), None);
    }

    #[test]
    fn strict_siblings_stay_within_parent() {
        let (tree, ids) = outline();
        assert_eq!(next_sibling(&tree, &ids[1]), Some(ids[2].clone()));
        assert_eq!(next_sibling(&tree, &ids[2]), None);
        assert_eq!(prev_sibling(&tree, &ids[4]), None);
        assert_eq!(prev_sibling(&tree, &ids[3]), Some(ids[0].clone()));
    }

    #[test]
    fn strict_siblings_ignore_collapse() {
        let (mut tree, ids) = outline();
        tree.find_mut(&ids[0]).unwrap().collapsed = true;
        assert_eq!(next_sibling(&tree, &ids[1]), Some(ids[2].clone()));
    }

    #[test]
    fn levels() {
        let (tree, ids) = outline();
        assert_eq!(level(&tree, &ids[0]), Some(1));
        assert_eq!(level(&tree, &ids[5]), Some(3));
        assert_eq!(level(&tree, &NodeId::new("nope")), None);
    }

    #[test]
    fn breadcrumb_truncates_and_fills_placeholders() {
        let (mut tree, ids) = outline();
        tree.find_mut(&ids[3]).unwrap().text = "x".repeat(40);
        tree.find_mut(&ids[4]).unwrap().text.clear();

        let crumbs = breadcrumb(&tree, &ids[5], 30, "(empty)");
        assert_eq!(
            crumbs,
            vec![format!("{}...", "x".repeat(30)), "(empty)".to_string(), "b1x".to_string()]
        );
        assert!(breadcrumb(&tree, &NodeId::root(), 30, "-").is_empty());
    }
}
