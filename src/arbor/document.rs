//! # Document Session
//!
//! A [`Document`] is one open outline: the tree, the focus and selection
//! cursors, the clipboard, the undo history, the saved baseline used for the
//! unsaved-changes signal, the active text/memo edit session and the last
//! search. Nothing here is global; two open files are two `Document`s.
//!
//! ## Mutations
//!
//! Structural operations live in [`crate::commands`] and run through
//! [`Document::apply`], which gives every operation the same shape:
//!
//! 1. commit a pending text/memo edit, so typing and structure stay separate undo steps
//! 2. run the operation; it validates first and returns [`Outcome::Ignored`]
//!    without touching anything when a precondition fails
//! 3. on [`Outcome::Applied`], record a snapshot of the resulting state
//!
//! ## Edit Sessions
//!
//! Typing is not snapshotted per keystroke. The host calls [`Document::begin_edit`]
//! when a text or memo field gains focus, writes through with
//! [`Document::set_text`] / [`Document::set_memo`], and calls
//! [`Document::commit_edit`] on blur or after its own idle timeout. A commit
//! only records history when the tree actually changed since the last snapshot.

use crate::commands::Outcome;
use crate::error::{LoadError, Result};
use crate::format::{self, LoadReport};
use crate::history::{History, Snapshot, DEFAULT_HISTORY_LIMIT};
use crate::model::{Node, NodeId};
use crate::search::{SearchScope, SearchState, SearchStatus};
use crate::tree::Tree;
use indexmap::IndexSet;

/// Contents of the in-document clipboard.
///
/// The `cut` flag is informational: paste always inserts a fresh copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardEntry {
    pub node: Node,
    pub cut: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Text,
    Memo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub node: NodeId,
    pub field: EditField,
}

#[derive(Debug, Clone)]
pub struct Document {
    tree: Tree,
    focus: Option<NodeId>,
    selection: IndexSet<NodeId>,
    clipboard: Option<ClipboardEntry>,
    history: History,
    saved: Node,
    edit: Option<EditSession>,
    search: SearchState,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A new document holding one empty, focused node.
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(limit: usize) -> Self {
        let mut tree = Tree::new();
        let seed = tree.create_node("");
        let focus = seed.id.clone();
        tree.root_mut().children.push(seed);

        let mut doc = Self::assemble(tree, History::with_limit(limit));
        doc.focus = Some(focus);
        doc.reset_baseline();
        doc
    }

    /// Wrap an existing tree, focusing its first top-level node.
    pub fn from_tree(tree: Tree) -> Self {
        Self::from_tree_with_limit(tree, DEFAULT_HISTORY_LIMIT)
    }

    pub fn from_tree_with_limit(tree: Tree, limit: usize) -> Self {
        let mut doc = Self::assemble(tree, History::with_limit(limit));
        doc.focus = doc.tree.top_level().first().map(|n| n.id.clone());
        doc.reset_baseline();
        doc
    }

    /// Parse persisted JSON into a fresh document.
    pub fn parse(text: &str, limit: usize) -> std::result::Result<(Self, LoadReport), LoadError> {
        let (tree, report) = format::parse(text)?;
        Ok((Self::from_tree_with_limit(tree, limit), report))
    }

    fn assemble(tree: Tree, history: History) -> Self {
        let saved = tree.root().clone();
        Self {
            tree,
            focus: None,
            selection: IndexSet::new(),
            clipboard: None,
            history,
            saved,
            edit: None,
            search: SearchState::default(),
        }
    }

    /// Replace the whole document from persisted JSON.
    ///
    /// On failure nothing changes. On success history restarts from a single
    /// baseline, the cursors reset, and the loaded state becomes the saved
    /// baseline. The clipboard survives.
    pub fn load(&mut self, text: &str) -> std::result::Result<LoadReport, LoadError> {
        let (tree, report) = format::parse(text)?;
        self.tree = tree;
        self.focus = self.tree.top_level().first().map(|n| n.id.clone());
        self.selection.clear();
        self.edit = None;
        self.search.clear();
        self.history.clear();
        self.reset_baseline();
        tracing::info!(nodes = report.nodes, next_id = report.next_id, "document loaded");
        Ok(report)
    }

    fn reset_baseline(&mut self) {
        let snapshot = self.snapshot();
        self.history.record(snapshot);
        self.mark_saved();
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn focus(&self) -> Option<&NodeId> {
        self.focus.as_ref()
    }

    pub fn focused_node(&self) -> Option<&Node> {
        self.focus.as_ref().and_then(|id| self.tree.find(id))
    }

    pub(crate) fn set_focus(&mut self, focus: Option<NodeId>) {
        self.focus = focus;
    }

    pub fn selection(&self) -> &IndexSet<NodeId> {
        &self.selection
    }

    pub(crate) fn selection_mut(&mut self) -> &mut IndexSet<NodeId> {
        &mut self.selection
    }

    pub fn clipboard(&self) -> Option<&ClipboardEntry> {
        self.clipboard.as_ref()
    }

    pub(crate) fn set_clipboard(&mut self, entry: ClipboardEntry) {
        self.clipboard = Some(entry);
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    pub(crate) fn search_state_mut(&mut self) -> &mut SearchState {
        &mut self.search
    }

    pub(crate) fn run_search(&mut self, query: &str, scope: SearchScope) -> SearchStatus {
        self.search.run(&self.tree, query, scope)
    }

    /// True whenever the tree differs from what was last loaded or saved.
    pub fn has_unsaved_changes(&self) -> bool {
        self.tree.root() != &self.saved
    }

    pub fn mark_saved(&mut self) {
        self.saved = self.tree.root().clone();
    }

    pub fn to_json(&self) -> Result<String> {
        format::serialize(&self.tree)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            root: self.tree.root().clone(),
            focus: self.focus.clone(),
            next_id: self.tree.next_id(),
        }
    }

    /// Run one mutation with the shared commit/validate/record protocol.
    pub(crate) fn apply<F>(&mut self, op: &'static str, f: F) -> Outcome
    where
        F: FnOnce(&mut Document) -> Outcome,
    {
        self.commit_edit();
        let outcome = f(self);
        match &outcome {
            Outcome::Applied { focus } => {
                let tree = &self.tree;
                self.selection.retain(|id| tree.contains(id));
                self.search.retain_existing(tree);
                let snapshot = self.snapshot();
                self.history.record(snapshot);
                tracing::debug!(op, focus = ?focus, "applied");
            }
            Outcome::Ignored => tracing::debug!(op, "ignored"),
        }
        outcome
    }

    pub fn undo(&mut self) -> bool {
        self.commit_edit();
        match self.history.undo().cloned() {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.commit_edit();
        match self.history.redo().cloned() {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    /// Put tree, focus and counter back as recorded. Selection is cleared
    /// because it may name ids the restored tree does not contain.
    fn restore(&mut self, snapshot: &Snapshot) {
        self.tree
            .restore_parts(snapshot.root.clone(), snapshot.next_id);
        self.focus = snapshot.focus.clone();
        self.selection.clear();
        self.edit = None;
        self.search.clear();
    }

    /// Start a text or memo edit on the focused node.
    pub fn begin_edit(&mut self, field: EditField) -> bool {
        self.commit_edit();
        match self.focus.clone() {
            Some(node) if self.tree.contains(&node) => {
                self.edit = Some(EditSession { node, field });
                true
            }
            _ => false,
        }
    }

    /// Overwrite the focused node's text without recording history.
    pub fn set_text(&mut self, text: &str) -> Outcome {
        self.write_field(EditField::Text, text)
    }

    /// Overwrite the focused node's memo without recording history.
    pub fn set_memo(&mut self, memo: &str) -> Outcome {
        self.write_field(EditField::Memo, memo)
    }

    fn write_field(&mut self, field: EditField, value: &str) -> Outcome {
        let Some(id) = self.focus.clone() else {
            return Outcome::Ignored;
        };
        let same_session = matches!(&self.edit, Some(s) if s.node == id && s.field == field);
        if !same_session && !self.begin_edit(field) {
            return Outcome::Ignored;
        }
        let Some(node) = self.tree.find_mut(&id) else {
            return Outcome::Ignored;
        };
        match field {
            EditField::Text => node.text = value.to_string(),
            EditField::Memo => node.memo = value.to_string(),
        }
        Outcome::Applied { focus: Some(id) }
    }

    /// Close the edit session; record a snapshot if the tree changed since the
    /// latest one. Returns whether a snapshot was recorded.
    pub fn commit_edit(&mut self) -> bool {
        let Some(session) = self.edit.take() else {
            return false;
        };
        let changed = self
            .history
            .current()
            .map(|s| &s.root != self.tree.root())
            .unwrap_or(true);
        if changed {
            let snapshot = self.snapshot();
            self.history.record(snapshot);
            tracing::debug!(node = %session.node, field = ?session.field, "edit committed");
        }
        changed
    }
}
