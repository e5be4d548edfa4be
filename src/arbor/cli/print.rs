use arbor::model::{Color, Node};
use arbor::tree::Tree;
use colored::{ColoredString, Colorize};
use unicode_width::UnicodeWidthStr;

const INDENT: &str = "  ";
const MARKER_LEAF: &str = "•";
const MARKER_OPEN: &str = "▾";
const MARKER_CLOSED: &str = "▸";
const MEMO_BAR: &str = "│";
/// Ids never start further right than this, however deep the outline.
const MAX_ID_COLUMN: usize = 60;

#[derive(Debug, Clone, Copy)]
pub(super) struct ShowOptions<'a> {
    pub all: bool,
    pub ids: bool,
    pub placeholder: &'a str,
}

pub(super) fn print_outline(tree: &Tree, opts: ShowOptions<'_>) {
    if tree.is_empty() {
        println!("{}", "Empty outline.".dimmed());
        return;
    }
    for line in outline_lines(tree, opts) {
        println!("{}", line);
    }
}

pub(super) fn print_success(message: &str) {
    println!("{}", message.green());
}

pub(super) fn print_info(message: &str) {
    println!("{}", message.dimmed());
}

pub(super) fn print_warning(message: &str) {
    println!("{}", message.yellow());
}

fn marker(node: &Node) -> &'static str {
    match (node.has_children(), node.collapsed) {
        (false, _) => MARKER_LEAF,
        (true, false) => MARKER_OPEN,
        (true, true) => MARKER_CLOSED,
    }
}

fn paint(text: &str, node: &Node) -> ColoredString {
    let mut styled = match node.color {
        Some(Color::Red) => text.red(),
        Some(Color::Blue) => text.blue(),
        Some(Color::Green) => text.green(),
        Some(Color::Orange) => text.truecolor(255, 165, 0),
        Some(Color::Purple) => text.magenta(),
        None => text.normal(),
    };
    if node.bold {
        styled = styled.bold();
    }
    if node.text.is_empty() {
        styled = styled.dimmed();
    }
    styled
}

/// One line per node, plus one per memo. With `ids`, node ids are lined up
/// in a column after the widest entry.
pub(super) fn outline_lines(tree: &Tree, opts: ShowOptions<'_>) -> Vec<String> {
    let rows: Vec<(&Node, usize)> = if opts.all {
        tree.walk().collect()
    } else {
        tree.walk_visible().collect()
    };

    let label = |node: &Node| -> String {
        if node.text.is_empty() {
            opts.placeholder.to_string()
        } else {
            node.text.clone()
        }
    };
    let head = |node: &Node, level: usize| -> String {
        format!("{}{} ", INDENT.repeat(level - 1), marker(node))
    };

    let id_column = rows
        .iter()
        .map(|(node, level)| head(*node, *level).width() + label(*node).width())
        .max()
        .unwrap_or(0)
        .min(MAX_ID_COLUMN);

    let mut lines = Vec::with_capacity(rows.len());
    for (node, level) in rows {
        let prefix = head(node, level);
        let text = label(node);
        let mut line = format!("{}{}", prefix, paint(&text, node));
        if opts.ids {
            let used = prefix.width() + text.width();
            let pad = id_column.saturating_sub(used) + 2;
            line.push_str(&" ".repeat(pad));
            line.push_str(&node.id.to_string().dimmed().to_string());
        }
        lines.push(line);

        if node.has_memo() {
            for memo_line in node.memo.trim().lines() {
                lines.push(format!(
                    "{}{} {}",
                    INDENT.repeat(level),
                    MEMO_BAR.dimmed(),
                    memo_line.italic()
                ));
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor::format;

    fn plain() {
        colored::control::set_override(false);
    }

    fn sample() -> Tree {
        let json = r#"{"id":"root","text":"","children":[
            {"id":"node-1","text":"Plan","collapsed":true,"children":[
                {"id":"node-2","text":"Buy","children":[]}
            ]},
            {"id":"node-3","text":"日本語","memo":"look up\nkanji","children":[]},
            {"id":"node-4","text":"","children":[]}
        ]}"#;
        let (tree, _) = format::parse(json).unwrap();
        tree
    }

    fn opts(all: bool, ids: bool) -> ShowOptions<'static> {
        ShowOptions {
            all,
            ids,
            placeholder: "(empty)",
        }
    }

    #[test]
    fn collapsed_children_are_hidden_unless_all() {
        plain();
        let tree = sample();
        let lines = outline_lines(&tree, opts(false, false));
        assert_eq!(
            lines,
            vec!["▸ Plan", "• 日本語", "  │ look up", "  │ kanji", "• (empty)"]
        );

        let all = outline_lines(&tree, opts(true, false));
        assert_eq!(all[1], "  • Buy");
    }

    #[test]
    fn ids_line_up_by_display_width() {
        plain();
        let tree = sample();
        let lines = outline_lines(&tree, opts(false, true));
        // "• (empty)" is the widest entry at 9 columns; CJK counts double.
        assert_eq!(lines[0], "▸ Plan     node-1");
        assert_eq!(lines[1], "• 日本語   node-3");
        assert_eq!(lines[4], "• (empty)  node-4");
    }

    #[test]
    fn empty_document_has_no_lines() {
        assert!(outline_lines(&Tree::new(), opts(true, true)).is_empty());
    }
}
