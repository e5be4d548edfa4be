//! Ctrl+Arrow relocation of the focused node or, when there is one, the whole
//! selection.
//!
//! The neighbour that decides where the group goes is always taken relative
//! to the focused node; the group then moves as one, preserving document
//! order, even when it spans several parents.

use crate::commands::{focused_id, moving_set, relocate, Anchor, Direction, Outcome};
use crate::document::Document;
use crate::navigation;

pub fn move_up(doc: &mut Document) -> Outcome {
    move_vertical(doc, Direction::Up)
}

pub fn move_down(doc: &mut Document) -> Outcome {
    move_vertical(doc, Direction::Down)
}

/// Put the moving group right before (up) or after (down) the focused node's
/// same-level neighbour, under that neighbour's parent.
fn move_vertical(doc: &mut Document, direction: Direction) -> Outcome {
    let op = match direction {
        Direction::Up => "move_up",
        Direction::Down => "move_down",
    };
    doc.apply(op, |doc| {
        let Some(id) = focused_id(doc) else {
            return Outcome::Ignored;
        };
        let neighbour = match direction {
            Direction::Up => navigation::prev_at_same_level(doc.tree(), &id),
            Direction::Down => navigation::next_at_same_level(doc.tree(), &id),
        };
        let Some(neighbour) = neighbour else {
            return Outcome::Ignored;
        };
        let anchor = match direction {
            Direction::Up => Anchor::Before(neighbour),
            Direction::Down => Anchor::After(neighbour),
        };
        shift(doc, &anchor)
    })
}

/// Make the moving group the last children of the focused node's previous
/// sibling.
pub fn move_right(doc: &mut Document) -> Outcome {
    doc.apply("move_right", |doc| {
        let Some(id) = focused_id(doc) else {
            return Outcome::Ignored;
        };
        let Some(prev) = navigation::prev_sibling(doc.tree(), &id) else {
            return Outcome::Ignored;
        };
        shift(doc, &Anchor::LastChildOf(prev))
    })
}

/// Put the moving group right after the focused node's parent.
pub fn move_left(doc: &mut Document) -> Outcome {
    doc.apply("move_left", |doc| {
        let Some(id) = focused_id(doc) else {
            return Outcome::Ignored;
        };
        let Some((parent, _)) = doc.tree().position(&id) else {
            return Outcome::Ignored;
        };
        if parent.is_root() {
            return Outcome::Ignored;
        }
        shift(doc, &Anchor::After(parent))
    })
}

fn shift(doc: &mut Document, anchor: &Anchor) -> Outcome {
    let moving = moving_set(doc);
    if relocate(doc.tree_mut(), &moving, anchor) {
        Outcome::Applied {
            focus: doc.focus().cloned(),
        }
    } else {
        Outcome::Ignored
    }
}
