//! Filter engine.
//!
//! A filter pass never adds, removes or reorders nodes. It recomputes the
//! [`FilterFlags`] of every node from scratch so that the visible set is the
//! union of matches and their ancestor chains, optionally extended with the
//! paths down to the leaves below a match (`keep_children`).

use log::{debug, trace, warn};

use crate::predicate::{Predicate, TextPredicate};
use crate::tree::{Node, NodeId, Tree, Visit, Walk};
use crate::Result;

/// How hidden nodes are presented. Flag computation does not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FilterMode {
    /// Keep hidden nodes laid out but de-emphasized.
    #[default]
    Dim,
    /// Remove hidden nodes from the layout.
    Hide,
}

impl FilterMode {
    pub fn toggled(self) -> Self {
        match self {
            FilterMode::Dim => FilterMode::Hide,
            FilterMode::Hide => FilterMode::Dim,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterOptions {
    pub mode: FilterMode,
    /// Only leaves are tested against the predicate.
    pub leaves_only: bool,
    /// Leaves below a match stay visible, along with the path up to it.
    pub keep_children: bool,
}

/// Per-node filter annotations. The default value is the "never filtered"
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterFlags {
    pub matched: bool,
    pub sub_match: bool,
    pub child_sub_match: bool,
    pub hide: bool,
}

impl FilterFlags {
    const RESET: Self = Self {
        matched: false,
        sub_match: false,
        child_sub_match: false,
        hide: true,
    };

    pub fn is_visible(&self) -> bool {
        !self.hide
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterState {
    pub(crate) active: bool,
    pub(crate) options: FilterOptions,
}

impl FilterState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn options(&self) -> FilterOptions {
        self.options
    }
}

/// Flags every node of `tree` against `predicate` and returns the number of
/// direct matches.
pub fn apply_filter<T, P>(tree: &mut Tree<T>, predicate: &P, options: FilterOptions) -> usize
where
    P: Predicate<T> + ?Sized,
{
    tree.filter = FilterState {
        active: true,
        options,
    };

    tree.visit_mut(|node| {
        node.flags = FilterFlags::RESET;
        Visit::Continue
    });

    // Ancestors are always visited before their descendants, so by the time
    // a leaf is corrected every ancestor's `matched` flag is final.
    let order: Vec<NodeId> = tree.pre_order().collect();
    let mut count = 0;
    for id in order {
        let node = tree.node(id);
        let leaf = node.is_leaf();
        if (!options.leaves_only || leaf) && evaluate(predicate, node) {
            count += 1;
            mark_match(tree, id);
        } else if options.keep_children && leaf {
            keep_children(tree, id);
        }
    }

    debug!(
        "filter applied to {} nodes: {count} matches ({options:?})",
        tree.node_count()
    );
    tree.request_redraw();
    count
}

/// Same as [`apply_filter`] with a case-insensitive literal match on titles.
pub fn apply_text_filter<T>(tree: &mut Tree<T>, text: &str, options: FilterOptions) -> Result<usize> {
    let predicate = TextPredicate::new(text)?;
    Ok(apply_filter(tree, &predicate, options))
}

/// Returns every node to the unfiltered state and deactivates filtering.
pub fn clear_filter<T>(tree: &mut Tree<T>) {
    tree.visit_mut(|node| {
        node.flags = FilterFlags::default();
        Visit::Continue
    });
    tree.filter.active = false;
    debug!("filter cleared");
    tree.request_redraw();
}

/// Ids of directly matched nodes, in pre-order.
pub fn matches<T>(tree: &Tree<T>) -> Vec<NodeId> {
    tree.pre_order()
        .filter(|id| tree.node(*id).flags.matched)
        .collect()
}

fn evaluate<T, P>(predicate: &P, node: &Node<T>) -> bool
where
    P: Predicate<T> + ?Sized,
{
    match predicate.evaluate(node) {
        Ok(matched) => matched,
        Err(err) => {
            warn!(
                "treating node {} ({:?}) as non-matching: {err}",
                node.id(),
                node.title()
            );
            false
        }
    }
}

fn mark_match<T>(tree: &mut Tree<T>, id: NodeId) {
    let node = tree.node_mut(id);
    node.flags.hide = false;
    node.flags.matched = true;

    // A node carrying `sub_match` already has its whole ancestor chain marked.
    tree.visit_parents_mut(id, false, |parent| {
        if parent.flags.sub_match {
            return Walk::Stop;
        }
        parent.flags.hide = false;
        parent.flags.sub_match = true;
        Walk::Continue
    });
}

/// Shows a non-matching leaf and its path up to the closest matching
/// ancestor. Does nothing if no ancestor matches.
fn keep_children<T>(tree: &mut Tree<T>, leaf: NodeId) {
    if !tree.ancestors(leaf).any(|node| node.flags.matched) {
        return;
    }

    trace!("keeping leaf {leaf} below a match");
    tree.visit_parents_mut(leaf, true, |node| {
        if node.flags.matched {
            return Walk::Stop;
        }
        node.flags.hide = false;
        node.flags.child_sub_match = true;
        Walk::Continue
    });
}
