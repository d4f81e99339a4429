//! Non-destructive filtering for hierarchical trees.
//!
//! [`apply_filter`] flags every node of a [`Tree`] as a match, an ancestor of
//! a match, a kept child below a match, or hidden. Nothing is removed from
//! the tree; a presentation layer calls [`Tree::presentation`] per node to
//! decide whether to draw it normally, dim it or leave it out.
//!
//! ```
//! use tree_filter::{apply_text_filter, clear_filter, FilterOptions, NodeBuilder, Tree};
//!
//! let mut tree = Tree::new(NodeBuilder::folder(
//!     "src",
//!     (),
//!     vec![NodeBuilder::leaf("main.rs", ()), NodeBuilder::leaf("lib.rs", ())],
//! ));
//!
//! let count = apply_text_filter(&mut tree, "MAIN", FilterOptions::default()).unwrap();
//! assert_eq!(count, 1);
//! assert!(tree.presentation(tree.root()).ancestor);
//!
//! clear_filter(&mut tree);
//! assert!(!tree.filter_state().is_active());
//! ```

mod error;
mod filter;
mod predicate;
mod present;
mod tree;

pub use error::{Error, Result};
pub use filter::{
    apply_filter, apply_text_filter, clear_filter, matches, FilterFlags, FilterMode,
    FilterOptions, FilterState,
};
pub use predicate::{PatternPredicate, Predicate, TextPredicate};
pub use present::{present, Presentation, PresentationState, Visibility};
pub use tree::{Ancestors, Node, NodeBuilder, NodeId, PreOrder, Tree, Visit, Walk};
