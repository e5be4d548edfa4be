use crate::commands::{focused_id, Direction, Outcome};
use crate::document::Document;

pub fn swap_up(doc: &mut Document) -> Outcome {
    swap(doc, Direction::Up)
}

pub fn swap_down(doc: &mut Document) -> Outcome {
    swap(doc, Direction::Down)
}

/// Exchange the focused node with its immediate sibling. Ignores the
/// selection and never changes the parent.
fn swap(doc: &mut Document, direction: Direction) -> Outcome {
    let op = match direction {
        Direction::Up => "swap_up",
        Direction::Down => "swap_down",
    };
    doc.apply(op, |doc| {
        let Some(id) = focused_id(doc) else {
            return Outcome::Ignored;
        };
        let Some(parent) = doc.tree_mut().find_parent_mut(&id) else {
            return Outcome::Ignored;
        };
        let Some(index) = parent.child_index(&id) else {
            return Outcome::Ignored;
        };
        let other = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1).filter(|i| *i < parent.children.len()),
        };
        let Some(other) = other else {
            return Outcome::Ignored;
        };

        parent.children.swap(index, other);
        Outcome::Applied { focus: Some(id) }
    })
}
