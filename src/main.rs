use clap::Parser;
use clap::ValueEnum;
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use log::{debug, info};
use regex::Regex;
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tree_filter::{
    apply_filter, clear_filter, matches, FilterMode, FilterOptions, Node, PatternPredicate,
    Predicate, Presentation, PresentationState, TextPredicate, Tree,
};

mod generate;
mod input;
mod render;

use generate::{build_directory_tree, Entry};
use input::{handle_input, next_event, Outcome, Prompt};
use render::{render, truncate, Status};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Style {
    Compact,
    Full,
}

pub enum Direction {
    Left,
    Right,
}

pub enum Navigation {
    PageUp,
    PageDown,
    Home,
    End,
}

pub enum Event {
    Key(char),
    Direction(Direction),
    Navigation(Navigation),
    Backspace,
    Clear,
    ToggleMode,
    Resize,
    Enter,
    Exit,
}

const RED: &str = "\x1B[31m";
const NORMAL: &str = "\x1B[0m";
const BOLD: &str = "\x1B[1m";
const DIM: &str = "\x1B[2m";
const INVERT: &str = "\x1B[7m";
const UNINVERT: &str = "\x1B[27m";

#[derive(Parser, Debug)]
#[clap(author = "Sam Christy", version, about = "An interactive program for filtering directory trees.", long_about = None)]
struct Args {
    /// Directory to render
    #[clap(short, long, default_value = ".")]
    directory: String,

    /// Dim entries that do not match, or hide them
    #[clap(short, long, value_enum, default_value_t = FilterMode::Dim, env = "TREE_FILTER_MODE")]
    mode: FilterMode,

    /// Only test files (leaves) against the filter
    #[clap(short, long, env = "TREE_FILTER_LEAVES_ONLY")]
    leaves_only: bool,

    /// Keep everything below a matching directory visible
    #[clap(short, long, env = "TREE_FILTER_KEEP_CHILDREN")]
    keep_children: bool,

    /// Treat the filter text as a regular expression instead of literal text
    #[clap(short, long)]
    regex: bool,

    /// Use case-sensitive regex matching (default is case-insensitive)
    #[clap(short, long, requires = "regex")]
    case_sensitive: bool,

    /// Style to use for rendering
    #[clap(short, long, value_enum, default_value_t = Style::Full)]
    style: Style,

    /// Include hidden (dot) entries
    #[clap(short, long)]
    all: bool,

    /// Write logs to this file
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// Log level used with --log-file
    #[clap(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

struct Line {
    first_part: String,
    last_part: String,
    color: &'static str,
    presentation: Presentation,
}

impl Line {
    fn highlight(s: &str, re: &Regex) -> String {
        let mut highlighted = String::new();
        let mut last_end = 0;

        for mat in re.find_iter(s) {
            highlighted.push_str(&s[last_end..mat.start()]);
            highlighted.push_str(&format!(
                "{INVERT}{}{}",
                &s[mat.start()..mat.end()],
                UNINVERT
            ));
            last_end = mat.end();
        }

        highlighted.push_str(&s[last_end..]);
        highlighted
    }

    fn render(&self, re: Option<&Regex>, n: usize) -> String {
        let first_len = self.first_part.chars().count();
        if n < first_len {
            return truncate(&self.first_part, n).to_string();
        }

        let s = truncate(&self.last_part, n - first_len);

        match (self.presentation.state(), re) {
            (PresentationState::Matched, Some(re)) => {
                let last_part = Self::highlight(s, re);
                format!("{}{}{last_part}{NORMAL}", self.first_part, self.color)
            }
            (PresentationState::AncestorOfMatch, _) => {
                format!("{}{BOLD}{}{s}{NORMAL}", self.first_part, self.color)
            }
            (PresentationState::Dimmed, _) => {
                format!("{DIM}{}{}{s}{NORMAL}", self.first_part, self.color)
            }
            _ => format!("{}{}{s}{NORMAL}", self.first_part, self.color),
        }
    }
}

/// Predicate built from the text typed at the prompt.
enum Matcher {
    Text(TextPredicate),
    Pattern(PatternPredicate),
}

impl Matcher {
    fn new(pattern: &str, args: &Args) -> tree_filter::Result<Self> {
        if args.regex {
            PatternPredicate::new(pattern, args.case_sensitive).map(Matcher::Pattern)
        } else {
            TextPredicate::new(pattern).map(Matcher::Text)
        }
    }

    fn regex(&self) -> &Regex {
        match self {
            Matcher::Text(p) => p.regex(),
            Matcher::Pattern(p) => p.regex(),
        }
    }
}

impl Predicate<Entry> for Matcher {
    fn evaluate(&self, node: &Node<Entry>) -> tree_filter::Result<bool> {
        match self {
            Matcher::Text(p) => p.evaluate(node),
            Matcher::Pattern(p) => p.evaluate(node),
        }
    }
}

/// Raw mode and the alternate screen, undone on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn matched_paths(tree: &Tree<Entry>) -> Vec<String> {
    matches(tree)
        .into_iter()
        .map(|id| tree.node(id).data().path.display().to_string())
        .collect()
}

fn main_loop(tree: &mut Tree<Entry>, args: &Args) -> tree_filter::Result<Option<Vec<String>>> {
    let _terminal = TerminalGuard::enter()?;

    let mut options = FilterOptions {
        mode: args.mode,
        leaves_only: args.leaves_only,
        keep_children: args.keep_children,
    };

    let mut prompt = Prompt::default();
    let mut matcher: Option<Matcher> = None;
    let mut pattern_is_valid = true;
    let mut match_count = 0;
    let mut refilter = false;

    tree.request_redraw();
    loop {
        if refilter {
            refilter = false;

            if prompt.pattern.is_empty() {
                matcher = None;
                pattern_is_valid = true;
            } else {
                // An invalid regex keeps the last working one active.
                match Matcher::new(&prompt.pattern, args) {
                    Ok(m) => {
                        pattern_is_valid = true;
                        matcher = Some(m);
                    }
                    Err(err) => {
                        debug!("keeping last working pattern: {err}");
                        pattern_is_valid = false;
                    }
                }
            }

            match &matcher {
                Some(m) => match_count = apply_filter(tree, m, options),
                None => {
                    match_count = 0;
                    clear_filter(tree);
                }
            }
        }

        if tree.take_redraw() {
            let status = Status {
                pattern: &prompt.pattern,
                pattern_is_valid,
                filtering: tree.filter_state().is_active(),
                match_count,
                mode: options.mode,
            };
            render(
                tree,
                &status,
                &args.style,
                &mut prompt.scroll,
                prompt.cursor_pos,
                matcher.as_ref().map(Matcher::regex),
            )?;
        }

        match handle_input(next_event()?, &mut prompt) {
            Outcome::Edited => refilter = true,
            Outcome::Moved => tree.request_redraw(),
            Outcome::ToggleMode => {
                options.mode = options.mode.toggled();
                info!("switched to {:?} mode", options.mode);
                refilter = true;
            }
            Outcome::Accept => return Ok(Some(matched_paths(tree))),
            Outcome::Exit => return Ok(None),
        }
    }
}

fn init_logging(path: &Path, level: LevelFilter) -> tree_filter::Result<()> {
    let log_file = File::create(path)?;
    // Only fails if a logger is already installed.
    let _ = WriteLogger::init(level, Config::default(), log_file);
    Ok(())
}

fn run(args: &Args) -> tree_filter::Result<Option<Vec<String>>> {
    if let Some(path) = &args.log_file {
        init_logging(path, args.log_level)?;
    }

    let mut tree = build_directory_tree(&args.directory, args.all)?;
    main_loop(&mut tree, args)
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(paths) => {
            for path in paths.into_iter().flatten() {
                println!("{path}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{RED}{e}{NORMAL}");
            ExitCode::FAILURE
        }
    }
}
