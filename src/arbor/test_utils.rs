use crate::document::Document;
use crate::model::NodeId;
use crate::tree::Tree;

/// Build a tree from `(depth, text)` rows, depth 0 being top-level.
///
/// A row at depth `d` becomes the last child of the most recent row at depth
/// `d - 1`, so rows read like an indented outline. Returns the tree and the
/// ids in row order.
pub fn fixture(rows: &[(usize, &str)]) -> (Tree, Vec<NodeId>) {
    let mut tree = Tree::new();
    let mut ids = Vec::with_capacity(rows.len());
    let mut path: Vec<NodeId> = vec![NodeId::root()];

    for (depth, text) in rows {
        assert!(*depth < path.len(), "fixture row skips a level: {}", text);
        path.truncate(depth + 1);
        let node = tree.create_node(text);
        let id = node.id.clone();
        let parent = path[*depth].clone();
        tree.attach(&parent, usize::MAX, vec![node]);
        path.push(id.clone());
        ids.push(id);
    }

    (tree, ids)
}

/// A document over [`fixture`] rows, focused on the first row.
pub fn doc_fixture(rows: &[(usize, &str)]) -> (Document, Vec<NodeId>) {
    let (tree, ids) = fixture(rows);
    (Document::from_tree(tree), ids)
}
