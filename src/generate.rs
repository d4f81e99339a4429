use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use log::{debug, info, warn};
use tree_filter::{Error, NodeBuilder, Result, Tree};

const CYAN: &str = "\x1B[36m";
const MAGENTA: &str = "\x1B[35m";
const YELLOW: &str = "\x1B[33m";
const RED: &str = "\x1B[31m";

/// Payload attached to every node of the directory tree.
#[derive(Debug)]
pub struct Entry {
    pub path: PathBuf,
    pub color: &'static str,
    pub error: Option<io::Error>,
}

fn determine_color(path: &Path) -> &'static str {
    if path.is_symlink() {
        YELLOW // Symlinks
    } else if path.is_dir() {
        CYAN // Directories
    } else {
        MAGENTA // Regular files
    }
}

fn file_title(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

struct Walker {
    include_hidden: bool,
    count: usize,
}

impl Walker {
    fn folder(&mut self, path: PathBuf) -> NodeBuilder<Entry> {
        let title = file_title(&path);

        let entries = match fs::read_dir(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("cannot read {}: {e}", path.display());
                return NodeBuilder::folder(
                    title,
                    Entry {
                        path,
                        color: RED,
                        error: Some(e),
                    },
                    Vec::new(),
                );
            }
        };

        let mut listing: Vec<(PathBuf, bool)> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| self.include_hidden || !is_hidden(&entry.file_name().to_string_lossy()))
            .map(|entry| {
                let is_dir = entry.file_type().is_ok_and(|kind| kind.is_dir());
                (entry.path(), is_dir)
            })
            .collect();
        listing.sort();

        let mut children = Vec::with_capacity(listing.len());
        for (child, is_dir) in listing {
            self.count += 1;
            if self.count % 100_000 == 0 {
                debug!("Count: {} {}", self.count, child.display());
            }

            children.push(if is_dir {
                self.folder(child)
            } else {
                NodeBuilder::leaf(
                    file_title(&child),
                    Entry {
                        color: determine_color(&child),
                        path: child,
                        error: None,
                    },
                )
            });
        }

        NodeBuilder::folder(
            title,
            Entry {
                color: determine_color(&path),
                path,
                error: None,
            },
            children,
        )
    }
}

/// Reads `dir` recursively into a tree. Folders that cannot be read stay in
/// the tree, empty, with their error attached.
pub fn build_directory_tree(dir: &str, include_hidden: bool) -> Result<Tree<Entry>> {
    let path = PathBuf::from(dir);

    if !path.is_dir() {
        return Err(Error::NotADirectory(path));
    }

    let mut walker = Walker {
        include_hidden,
        count: 0,
    };
    let root = walker.folder(path);
    info!("scanned {} entries under {dir}", walker.count);

    Ok(Tree::new(root))
}
