//! # API Facade
//!
//! The API layer is a **thin facade** between a host and the engine. It owns
//! the storage backend and the configuration, and is the single place where
//! persisted text turns into a [`Document`] and back.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Opens and saves** documents through a [`DocumentStore`]
//! - **Normalizes inputs** (node ids from the command line become focus moves
//!   followed by the matching command)
//! - **Returns structured types** (`Result<Outcome>`, `LoadReport`, strings for exports)
//!
//! ## What the API Does NOT Do
//!
//! - **Tree logic**: that belongs in `commands/*.rs`
//! - **Presentation**: no stdout, no colors; the CLI formats what it gets back
//!
//! ## Generic Over DocumentStore
//!
//! `ArborApi<S: DocumentStore>` is generic over the storage backend:
//! - Production: `ArborApi<FileStore>`
//! - Testing: `ArborApi<InMemoryStore>`

use crate::commands::{
    copy_paste, cursor, decorate, delete, drag, indent, insert, relocate, reorder, Outcome,
};
use crate::config::ArborConfig;
use crate::document::{Document, EditField};
use crate::error::{ArborError, Result};
use crate::export::{self, ExportFormat};
use crate::format::LoadReport;
use crate::model::{Color, NodeId};
use crate::navigation;
use crate::search::{SearchScope, SearchStatus};
use crate::store::{is_known_extension, DocumentStore};
use std::path::{Path, PathBuf};

/// Where a new node goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// After the last top-level node.
    End,
    Under(NodeId),
    After(NodeId),
    Before(NodeId),
}

/// A structural move of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    Into(NodeId),
    Before(NodeId),
    After(NodeId),
    Up,
    Down,
    Left,
    Right,
    Indent,
    Outdent,
    SwapUp,
    SwapDown,
}

/// Field changes applied to one node. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeEdit {
    pub text: Option<String>,
    pub memo: Option<String>,
    pub toggle_bold: bool,
    /// `Some(None)` clears the color.
    pub color: Option<Option<Color>>,
}

/// The main API facade for arbor documents.
pub struct ArborApi<S: DocumentStore> {
    store: S,
    config: ArborConfig,
}

impl<S: DocumentStore> ArborApi<S> {
    pub fn new(store: S, config: ArborConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ArborConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The path `path` is stored under.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.store.resolve(path)
    }

    /// Read and parse the document at `path`.
    pub fn open(&self, path: &Path) -> Result<(Document, LoadReport)> {
        let resolved = self.store.resolve(path);
        if !is_known_extension(&resolved) {
            tracing::warn!(path = %resolved.display(), "unrecognized extension, reading as a tree document");
        }
        let text = self.store.read(path)?;
        let (doc, report) = Document::parse(&text, self.config.history_limit)?;
        tracing::info!(path = %resolved.display(), nodes = report.nodes, "opened");
        Ok((doc, report))
    }

    /// Validate the document at `path` without keeping it.
    pub fn check(&self, path: &Path) -> Result<LoadReport> {
        self.open(path).map(|(_, report)| report)
    }

    /// Create a document holding one empty node and write it out.
    ///
    /// Refuses to replace an existing document unless `force` is set.
    pub fn create(&mut self, path: &Path, force: bool) -> Result<Document> {
        if self.store.exists(path) && !force {
            return Err(ArborError::Api(format!(
                "{} already exists (use --force to overwrite)",
                self.store.resolve(path).display()
            )));
        }
        let mut doc = Document::with_history_limit(self.config.history_limit);
        self.save(path, &mut doc)?;
        Ok(doc)
    }

    /// Write `doc` to `path` and make the written state its saved baseline.
    pub fn save(&mut self, path: &Path, doc: &mut Document) -> Result<()> {
        let json = doc.to_json()?;
        self.store.write(path, &json)?;
        doc.mark_saved();
        tracing::info!(path = %self.store.resolve(path).display(), nodes = doc.tree().len(), "saved");
        Ok(())
    }

    /// Save only when the document differs from its baseline. Returns whether it wrote.
    pub fn save_if_changed(&mut self, path: &Path, doc: &mut Document) -> Result<bool> {
        if !doc.has_unsaved_changes() {
            return Ok(false);
        }
        self.save(path, doc)?;
        Ok(true)
    }

    pub fn export(&self, doc: &Document, format: ExportFormat) -> String {
        let out = format.render(doc.tree(), &self.config.empty_placeholder);
        tracing::info!(format = format.extension(), nodes = doc.tree().len(), "exported");
        out
    }

    /// Tab outline of one subtree, as placed on the system clipboard.
    pub fn outline_of(&self, doc: &Document, id: &NodeId) -> Result<String> {
        let node = doc
            .tree()
            .find(id)
            .filter(|n| !n.id.is_root())
            .ok_or_else(|| ArborError::NodeNotFound(id.clone()))?;
        Ok(export::tab_outline(node, &self.config.empty_placeholder))
    }

    /// Breadcrumb trail for the focused node.
    pub fn breadcrumb(&self, doc: &Document) -> Vec<String> {
        match doc.focus() {
            Some(id) => navigation::breadcrumb(
                doc.tree(),
                id,
                self.config.breadcrumb_width,
                &self.config.empty_placeholder,
            ),
            None => Vec::new(),
        }
    }

    /// Add a node with `text` and return its id.
    pub fn add_node(&self, doc: &mut Document, text: &str, placement: &Placement) -> Result<NodeId> {
        let outcome = match placement {
            Placement::End => {
                if let Some(seed) = lone_empty_node(doc) {
                    focus(doc, &seed)?;
                    Outcome::Applied { focus: Some(seed) }
                } else if let Some(last) = doc.tree().top_level().last().map(|n| n.id.clone()) {
                    focus(doc, &last)?;
                    insert::insert_sibling_below(doc)
                } else {
                    insert::ensure_seed(doc)
                }
            }
            Placement::Under(id) => {
                focus(doc, id)?;
                insert::insert_child(doc)
            }
            Placement::After(id) => {
                focus(doc, id)?;
                insert::insert_sibling_below(doc)
            }
            Placement::Before(id) => {
                focus(doc, id)?;
                insert::insert_sibling_above(doc)
            }
        };
        let id = outcome
            .focus()
            .cloned()
            .ok_or_else(|| ArborError::Api("Node could not be added there".to_string()))?;
        if !text.is_empty() {
            doc.set_text(text);
            doc.commit_edit();
        }
        Ok(id)
    }

    /// Apply field changes to one node. Returns whether anything changed.
    pub fn edit_node(&self, doc: &mut Document, id: &NodeId, edit: &NodeEdit) -> Result<bool> {
        focus(doc, id)?;
        let mut changed = false;
        if let Some(text) = &edit.text {
            doc.begin_edit(EditField::Text);
            doc.set_text(text);
            changed |= doc.commit_edit();
        }
        if let Some(memo) = &edit.memo {
            doc.begin_edit(EditField::Memo);
            doc.set_memo(memo);
            changed |= doc.commit_edit();
        }
        if edit.toggle_bold {
            changed |= decorate::toggle_bold(doc).is_applied();
        }
        if let Some(color) = edit.color {
            changed |= decorate::set_color(doc, color).is_applied();
        }
        Ok(changed)
    }

    /// Delete one node, or with several ids, the multi-select delete.
    pub fn delete_nodes(&self, doc: &mut Document, ids: &[NodeId]) -> Result<Outcome> {
        match ids {
            [] => Ok(Outcome::Ignored),
            [id] => {
                focus(doc, id)?;
                Ok(delete::delete_focused(doc))
            }
            many => {
                if let Some(missing) = many.iter().find(|id| !doc.tree().contains(id)) {
                    return Err(ArborError::NodeNotFound(missing.clone()));
                }
                cursor::select_range(doc, many);
                Ok(delete::delete_selected(doc))
            }
        }
    }

    pub fn move_node(&self, doc: &mut Document, id: &NodeId, to: &Move) -> Result<Outcome> {
        focus(doc, id)?;
        let outcome = match to {
            Move::Into(target) => drag::drop_onto(doc, id, existing(doc, target)?),
            Move::Before(target) => drag::drop_before(doc, id, existing(doc, target)?),
            Move::After(target) => drag::drop_after(doc, id, existing(doc, target)?),
            Move::Up => relocate::move_up(doc),
            Move::Down => relocate::move_down(doc),
            Move::Left => relocate::move_left(doc),
            Move::Right => relocate::move_right(doc),
            Move::Indent => indent::indent(doc),
            Move::Outdent => indent::outdent(doc),
            Move::SwapUp => reorder::swap_up(doc),
            Move::SwapDown => reorder::swap_down(doc),
        };
        Ok(outcome)
    }

    pub fn toggle_collapse(&self, doc: &mut Document, id: &NodeId) -> Result<Outcome> {
        existing(doc, id)?;
        Ok(decorate::toggle_collapse(doc, id))
    }

    /// Copy a subtree and paste the copy as the last child of the same parent.
    /// Top-level nodes have no parent to paste under and are ignored.
    pub fn duplicate(&self, doc: &mut Document, id: &NodeId) -> Result<Outcome> {
        let parent = match doc.tree().position(id) {
            Some((parent, _)) => parent,
            None => return Err(ArborError::NodeNotFound(id.clone())),
        };
        if parent.is_root() {
            return Ok(Outcome::Ignored);
        }
        focus(doc, id)?;
        copy_paste::copy(doc);
        focus(doc, &parent)?;
        Ok(copy_paste::paste(doc))
    }

    /// Search with the configured scope, or everywhere when `all` is set.
    pub fn search(&self, doc: &mut Document, query: &str, all: bool) -> SearchStatus {
        let scope = if all {
            SearchScope::All
        } else {
            self.config.search_scope()
        };
        cursor::search(doc, query, scope)
    }
}

fn focus(doc: &mut Document, id: &NodeId) -> Result<()> {
    if cursor::focus_node(doc, id) {
        Ok(())
    } else {
        Err(ArborError::NodeNotFound(id.clone()))
    }
}

fn existing<'a>(doc: &Document, id: &'a NodeId) -> Result<&'a NodeId> {
    if doc.tree().contains(id) {
        Ok(id)
    } else {
        Err(ArborError::NodeNotFound(id.clone()))
    }
}

/// The seeded node of an untouched document, if that is all there is.
fn lone_empty_node(doc: &Document) -> Option<NodeId> {
    match doc.tree().top_level() {
        [only] if only.text.is_empty() && !only.has_children() && !only.has_memo() => {
            Some(only.id.clone())
        }
        _ => None,
    }
}
