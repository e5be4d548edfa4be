//! Text renderings of a tree for export and the system clipboard.
//!
//! All of them walk the whole tree, collapsed subtrees included. Empty node
//! texts are written as the configured placeholder so no line is blank.

use crate::model::Node;
use crate::tree::Tree;
use std::fmt::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Text,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
        }
    }

    pub fn render(&self, tree: &Tree, placeholder: &str) -> String {
        match self {
            ExportFormat::Markdown => markdown(tree, placeholder),
            ExportFormat::Text => plain_text(tree, placeholder),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "text" | "txt" => Ok(ExportFormat::Text),
            other => Err(format!("Unknown export format: {}", other)),
        }
    }
}

fn label<'a>(node: &'a Node, placeholder: &'a str) -> &'a str {
    if node.text.is_empty() {
        placeholder
    } else {
        &node.text
    }
}

/// Top-level nodes become headings; everything below is a nested bullet list.
/// Memos are written as blockquotes under their node.
pub fn markdown(tree: &Tree, placeholder: &str) -> String {
    let mut out = String::new();
    for (node, level) in tree.walk() {
        let depth = level - 1;
        let indent = "  ".repeat(depth);
        let text = label(node, placeholder);
        if depth == 0 {
            let _ = write!(out, "# {}\n\n", text);
        } else {
            let _ = writeln!(out, "{}- {}", indent, text);
        }
        if node.has_memo() {
            let _ = writeln!(out, "{}  > {}", indent, node.memo.trim());
        }
    }
    out
}

/// Two-space indentation per level, memos in brackets.
pub fn plain_text(tree: &Tree, placeholder: &str) -> String {
    let mut out = String::new();
    for (node, level) in tree.walk() {
        let indent = "  ".repeat(level - 1);
        let _ = writeln!(out, "{}{}", indent, label(node, placeholder));
        if node.has_memo() {
            let _ = writeln!(out, "{}  [memo: {}]", indent, node.memo.trim());
        }
    }
    out
}

/// One subtree as tab-indented lines, memos left out. This is what outliners
/// and spreadsheets accept on paste.
pub fn tab_outline(node: &Node, placeholder: &str) -> String {
    let mut out = String::new();
    push_tabbed(&mut out, node, 0, placeholder);
    out
}

fn push_tabbed(out: &mut String, node: &Node, depth: usize, placeholder: &str) {
    let _ = writeln!(out, "{}{}", "\t".repeat(depth), label(node, placeholder));
    for child in &node.children {
        push_tabbed(out, child, depth + 1, placeholder);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixture;

    fn sample() -> Tree {
        let (mut tree, ids) = fixture(&[(0, "Plan"), (1, "Buy"), (2, ""), (0, "Later")]);
        tree.find_mut(&ids[1]).unwrap().memo = "  before noon ".into();
        tree.find_mut(&ids[3]).unwrap().memo = "   ".into();
        tree.find_mut(&ids[0]).unwrap().collapsed = true;
        tree
    }

    #[test]
    fn markdown_headings_bullets_and_quotes() {
        let md = markdown(&sample(), "(empty)");
        assert_eq!(
            md,
            "# Plan\n\n  - Buy\n    > before noon\n    - (empty)\n# Later\n\n"
        );
    }

    #[test]
    fn plain_text_indents_and_brackets_memos() {
        let text = plain_text(&sample(), "-");
        assert_eq!(text, "Plan\n  Buy\n    [memo: before noon]\n    -\nLater\n");
    }

    #[test]
    fn tab_outline_covers_one_subtree() {
        let tree = sample();
        let out = tab_outline(&tree.top_level()[0], "(empty)");
        assert_eq!(out, "Plan\n\tBuy\n\t\t(empty)\n");
    }

    #[test]
    fn format_names_parse() {
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("TEXT".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("png".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Text.extension(), "txt");
    }
}
