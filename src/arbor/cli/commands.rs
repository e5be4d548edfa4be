//! # CLI Layer
//!
//! One possible host for the arbor engine, not the application itself. Each
//! invocation opens one document, runs one operation through [`ArborApi`],
//! prints the result and saves only when the document changed.
//!
//! This is the only place that knows about stdout, stderr and exit codes.
//! Ignored operations are not errors: they print a notice and exit 0.

use super::print::{print_info, print_outline, print_success, print_warning, ShowOptions};
use super::setup::{Cli, Commands, MoveArgs, PlaceArgs};
use arbor::api::{ArborApi, Move, NodeEdit, Placement};
use arbor::clipboard::copy_to_clipboard;
use arbor::commands::{decorate, Outcome};
use arbor::document::Document;
use arbor::error::{ArborError, Result};
use arbor::export::ExportFormat;
use arbor::init::{config_dir, initialize, ArborContext};
use arbor::model::{Color, NodeId};
use arbor::navigation;
use arbor::search::SearchStatus;
use arbor::store::fs::FileStore;
use chrono::Local;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ARBOR_LOG";

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = initialize(&config_dir()?);

    match cli.command {
        Commands::New { file, force } => handle_new(&mut ctx, &file, force),
        Commands::Show { file, all, ids } => handle_show(&ctx, &file, all, ids),
        Commands::Add { file, text, place } => handle_add(&mut ctx, &file, &text, place),
        Commands::Edit {
            file,
            id,
            text,
            memo,
            bold,
            color,
        } => {
            let edit = NodeEdit {
                text,
                memo,
                toggle_bold: bold,
                color: color.as_deref().map(parse_color).transpose()?,
            };
            handle_edit(&mut ctx, &file, &id, &edit)
        }
        Commands::Delete { file, ids } => handle_delete(&mut ctx, &file, &ids),
        Commands::Move { file, id, to } => handle_move(&mut ctx, &file, &id, to),
        Commands::Duplicate { file, id } => handle_duplicate(&mut ctx, &file, &id),
        Commands::Collapse { file, id } => handle_collapse(&mut ctx, &file, &id),
        Commands::ExpandAll { file } => handle_expand_all(&mut ctx, &file),
        Commands::Search { file, query, all } => handle_search(&ctx, &file, &query, all),
        Commands::Export {
            file,
            format,
            output,
        } => handle_export(&ctx, &file, &format, output),
        Commands::Copy { file, id } => handle_copy(&ctx, &file, &id),
        Commands::Check { file } => handle_check(&ctx, &file),
        Commands::Config { key, value } => handle_config(&mut ctx, key, value),
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "arbor=debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Open `file`, run `op`, then save when the document changed.
fn with_document<T, F>(ctx: &mut ArborContext, file: &Path, op: F) -> Result<T>
where
    F: FnOnce(&ArborApi<FileStore>, &mut Document) -> Result<T>,
{
    let (mut doc, _) = ctx.api.open(file)?;
    let value = op(&ctx.api, &mut doc)?;
    ctx.api.save_if_changed(file, &mut doc)?;
    Ok(value)
}

fn report(outcome: &Outcome, done: &str) {
    match outcome {
        Outcome::Applied { .. } => print_success(done),
        Outcome::Ignored => print_warning("Nothing changed."),
    }
}

fn node_id(raw: &str) -> NodeId {
    NodeId::new(raw.trim())
}

fn parse_color(raw: &str) -> Result<Option<Color>> {
    if raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    raw.parse::<Color>().map(Some).map_err(ArborError::Api)
}

fn handle_new(ctx: &mut ArborContext, file: &Path, force: bool) -> Result<()> {
    let doc = ctx.api.create(file, force)?;
    let path = ctx.api.resolve(file);
    print_success(&format!("Created {}", path.display()));
    if let Some(id) = doc.focus() {
        print_info(&format!("First node: {}", id));
    }
    Ok(())
}

fn handle_show(ctx: &ArborContext, file: &Path, all: bool, ids: bool) -> Result<()> {
    let (doc, report) = ctx.api.open(file)?;
    if report.repaired_ids > 0 {
        print_warning(&format!(
            "{} node(s) had no id; ids were assigned (save to keep them)",
            report.repaired_ids
        ));
    }
    print_outline(
        doc.tree(),
        ShowOptions {
            all,
            ids,
            placeholder: &ctx.api.config().empty_placeholder,
        },
    );
    Ok(())
}

fn handle_add(ctx: &mut ArborContext, file: &Path, text: &str, place: PlaceArgs) -> Result<()> {
    let placement = match (place.under, place.after, place.before) {
        (Some(id), _, _) => Placement::Under(node_id(&id)),
        (_, Some(id), _) => Placement::After(node_id(&id)),
        (_, _, Some(id)) => Placement::Before(node_id(&id)),
        _ => Placement::End,
    };
    let id = with_document(ctx, file, |api, doc| api.add_node(doc, text, &placement))?;
    print_success(&format!("Added {}", id));
    Ok(())
}

fn handle_edit(ctx: &mut ArborContext, file: &Path, id: &str, edit: &NodeEdit) -> Result<()> {
    let id = node_id(id);
    let changed = with_document(ctx, file, |api, doc| api.edit_node(doc, &id, edit))?;
    if changed {
        print_success(&format!("Updated {}", id));
    } else {
        print_warning("Nothing changed.");
    }
    Ok(())
}

fn handle_delete(ctx: &mut ArborContext, file: &Path, ids: &[String]) -> Result<()> {
    let ids: Vec<NodeId> = ids.iter().map(|s| node_id(s)).collect();
    let outcome = with_document(ctx, file, |api, doc| api.delete_nodes(doc, &ids))?;
    let names: Vec<String> = ids.iter().map(NodeId::to_string).collect();
    report(&outcome, &format!("Deleted {}", names.join(", ")));
    Ok(())
}

fn move_target(to: MoveArgs) -> Move {
    if let Some(id) = to.into {
        Move::Into(node_id(&id))
    } else if let Some(id) = to.before {
        Move::Before(node_id(&id))
    } else if let Some(id) = to.after {
        Move::After(node_id(&id))
    } else if to.up {
        Move::Up
    } else if to.down {
        Move::Down
    } else if to.left {
        Move::Left
    } else if to.right {
        Move::Right
    } else if to.indent {
        Move::Indent
    } else if to.outdent {
        Move::Outdent
    } else if to.swap_up {
        Move::SwapUp
    } else {
        Move::SwapDown
    }
}

fn handle_move(ctx: &mut ArborContext, file: &Path, id: &str, to: MoveArgs) -> Result<()> {
    let id = node_id(id);
    let target = move_target(to);
    let outcome = with_document(ctx, file, |api, doc| api.move_node(doc, &id, &target))?;
    report(&outcome, &format!("Moved {}", id));
    Ok(())
}

fn handle_duplicate(ctx: &mut ArborContext, file: &Path, id: &str) -> Result<()> {
    let id = node_id(id);
    let outcome = with_document(ctx, file, |api, doc| api.duplicate(doc, &id))?;
    match outcome.focus() {
        Some(copy) => print_success(&format!("Duplicated {} as {}", id, copy)),
        None => print_warning("Nothing changed."),
    }
    Ok(())
}

fn handle_collapse(ctx: &mut ArborContext, file: &Path, id: &str) -> Result<()> {
    let id = node_id(id);
    let collapsed = with_document(ctx, file, |api, doc| {
        let outcome = api.toggle_collapse(doc, &id)?;
        Ok(outcome
            .is_applied()
            .then(|| doc.tree().find(&id).map(|n| n.collapsed).unwrap_or(false)))
    })?;
    match collapsed {
        Some(true) => print_success(&format!("Collapsed {}", id)),
        Some(false) => print_success(&format!("Expanded {}", id)),
        None => print_warning("Nothing changed."),
    }
    Ok(())
}

fn handle_expand_all(ctx: &mut ArborContext, file: &Path) -> Result<()> {
    let outcome = with_document(ctx, file, |_, doc| Ok(decorate::expand_all(doc)))?;
    report(&outcome, "Expanded all nodes");
    Ok(())
}

/// Read-only: revealing hits changes collapse state in memory, which is not saved.
fn handle_search(ctx: &ArborContext, file: &Path, query: &str, all: bool) -> Result<()> {
    let (mut doc, _) = ctx.api.open(file)?;
    let status = ctx.api.search(&mut doc, query, all);
    match status {
        SearchStatus::Inactive => print_warning("Empty query."),
        SearchStatus::NoResults => print_info("No results."),
        SearchStatus::At { total, .. } => {
            let config = ctx.api.config();
            for id in doc.search_state().results() {
                let crumbs = navigation::breadcrumb(
                    doc.tree(),
                    id,
                    config.breadcrumb_width,
                    &config.empty_placeholder,
                );
                println!("{}  {}", id, crumbs.join(" > "));
            }
            print_info(&format!("{} result(s)", total));
        }
    }
    Ok(())
}

fn default_export_path(source: &Path, format: ExportFormat) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "outline".to_string());
    let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let name = format!("{}-{}.{}", stem, stamp, format.extension());
    match source.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

fn handle_export(ctx: &ArborContext, file: &Path, format: &str, output: Option<PathBuf>) -> Result<()> {
    let format: ExportFormat = format.parse().map_err(ArborError::Api)?;
    let (doc, _) = ctx.api.open(file)?;
    let rendered = ctx.api.export(&doc, format);

    let target = match output {
        Some(path) if path.as_os_str() == "-" => {
            print!("{}", rendered);
            return Ok(());
        }
        Some(path) => path,
        None => default_export_path(&ctx.api.resolve(file), format),
    };
    std::fs::write(&target, rendered)?;
    print_success(&format!("Exported to {}", target.display()));
    Ok(())
}

fn handle_copy(ctx: &ArborContext, file: &Path, id: &str) -> Result<()> {
    let id = node_id(id);
    let (doc, _) = ctx.api.open(file)?;
    let outline = ctx.api.outline_of(&doc, &id)?;
    copy_to_clipboard(&outline)?;
    print_success(&format!("Copied {} line(s) to the clipboard", outline.lines().count()));
    Ok(())
}

fn handle_check(ctx: &ArborContext, file: &Path) -> Result<()> {
    let report = ctx.api.check(file)?;
    print_success(&format!(
        "OK: {} node(s), next id {}",
        report.nodes,
        NodeId::from_counter(report.next_id)
    ));
    if report.repaired_ids > 0 {
        print_warning(&format!(
            "{} node(s) without an id would be assigned one on load",
            report.repaired_ids
        ));
    }
    Ok(())
}

fn handle_config(ctx: &mut ArborContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let mut config = ctx.api.config().clone();
    match (key, value) {
        (None, _) => {
            for (key, value) in config.entries() {
                println!("{} = {}", key, value);
            }
        }
        (Some(key), None) => println!("{}", config.get(&key)?),
        (Some(key), Some(value)) => {
            config.set(&key, &value)?;
            config.save(&ctx.config_dir)?;
            print_success(&format!("{} = {}", key, config.get(&key)?));
        }
    }
    Ok(())
}
