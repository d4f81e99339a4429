use regex::Regex;
use std::io::{self, Write};
use tree_filter::{FilterMode, NodeId, Tree};

use crate::generate::Entry;
use crate::Line;
use crate::Style;

macro_rules! set_cursor_position {
    ($out:expr, $x:expr, $y:expr) => {
        write!($out, "\x1B[{};{}H", $y, $x)
    };
}

/// Longest prefix of `s` holding at most `n` characters.
pub fn truncate(s: &str, n: usize) -> &str {
    s.char_indices().nth(n).map_or(s, |(end, _)| &s[..end])
}

fn fixed_length_string(s: &str, n: usize) -> String {
    let len = s.chars().count();
    match len.cmp(&n) {
        std::cmp::Ordering::Less => format!("{}{}", s, " ".repeat(n - len)),
        std::cmp::Ordering::Greater => truncate(s, n).to_string(),
        std::cmp::Ordering::Equal => s.to_string(),
    }
}

fn flatten_tree(
    tree: &Tree<Entry>,
    id: NodeId,
    prefix: &str,
    is_last: bool,
    style: &Style,
) -> Vec<Line> {
    let presentation = tree.presentation(id);
    if !presentation.is_laid_out() {
        return vec![];
    }

    let node = tree.node(id);
    let entry = node.data();

    let connector = match (style, is_last) {
        (Style::Compact, true) => "└",
        (Style::Compact, false) => "├",
        (Style::Full, true) => "└─",
        (Style::Full, false) => "├─",
    };

    let error = entry
        .error
        .as_ref()
        .map_or_else(String::new, |e| format!(" {e}"));

    let mut lines = vec![Line {
        first_part: format!("{prefix}{connector}"),
        last_part: format!("{}{error}", node.title()),
        color: entry.color,
        presentation,
    }];

    let children = node.children().unwrap_or_default();

    // Removed children must not leave a dangling "├" above them.
    let index_of_last_shown = children
        .iter()
        .enumerate()
        .filter_map(|(i, child)| tree.presentation(*child).is_laid_out().then_some(i))
        .last()
        .unwrap_or(0);

    let child_prefix = match (style, is_last) {
        (Style::Compact, true) => format!("{prefix} "),
        (Style::Full, true) => format!("{prefix}  "),
        (Style::Compact, false) => format!("{prefix}│"),
        (Style::Full, false) => format!("{prefix}│ "),
    };

    for (i, child) in children.iter().enumerate() {
        lines.extend(flatten_tree(
            tree,
            *child,
            &child_prefix,
            i == index_of_last_shown,
            style,
        ));
    }

    lines
}

fn render_tree(
    tree: &[Line],
    max_width: usize,
    max_height: usize,
    scroll: usize,
    re: Option<&Regex>,
) -> String {
    let blank_line = &(" ".repeat(max_width) + "\r");

    tree.iter()
        .skip(scroll)
        .take(max_height)
        .fold(String::new(), |acc, line| {
            acc + blank_line + line.render(re, max_width).as_str() + "\r\n"
        })
        + ((tree.len() - scroll)..max_height)
            .fold(String::new(), |acc, _| acc + blank_line + "\r\n")
            .as_str()
}

/// What the prompt area shows below the tree.
pub struct Status<'a> {
    pub pattern: &'a str,
    pub pattern_is_valid: bool,
    pub filtering: bool,
    pub match_count: usize,
    pub mode: FilterMode,
}

fn render_input(status: &Status, screen_size: (u16, u16)) -> String {
    let width = screen_size.0 as usize;

    let mode = match status.mode {
        FilterMode::Dim => "dim",
        FilterMode::Hide => "hide",
    };

    let summary = if !status.pattern_is_valid {
        format!("Invalid Pattern ({mode})")
    } else if status.filtering {
        format!("{} matches ({mode})", status.match_count)
    } else {
        format!("No filter ({mode})")
    };

    format!(
        "{}\r\n{}\r\n{}",
        fixed_length_string(&summary, width),
        fixed_length_string(format!("Pattern: {}", status.pattern).as_str(), width),
        fixed_length_string("Tab: dim/hide  Enter: print matches  Ctrl+D: exit", width)
    )
}

pub fn render(
    directory_tree: &Tree<Entry>,
    status: &Status,
    style: &Style,
    scroll: &mut usize,
    cursor_pos: usize,
    re: Option<&Regex>,
) -> io::Result<()> {
    let screen_size = crossterm::terminal::size().unwrap_or((80, 24));
    let mut out = io::stdout().lock();

    set_cursor_position!(out, 1, 1)?;
    let lines = flatten_tree(directory_tree, directory_tree.root(), "", true, style);

    if *scroll >= lines.len() {
        *scroll = lines.len().saturating_sub(1);
    }

    write!(
        out,
        "{}\r\n",
        render_tree(
            &lines,
            screen_size.0 as usize,
            (screen_size.1 as usize).saturating_sub(3),
            *scroll,
            re,
        )
    )?;
    set_cursor_position!(out, 1, screen_size.1.saturating_sub(2))?;
    write!(out, "{}", render_input(status, screen_size))?;

    set_cursor_position!(
        out,
        u16::try_from(cursor_pos + 10).unwrap_or(u16::MAX),
        screen_size.1.saturating_sub(1)
    )?;

    out.flush()
}
