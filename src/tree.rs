//! Arena-backed tree owned by the host.
//!
//! Nodes live in a flat `Vec` and refer to each other by [`NodeId`]. The
//! parent link is an index, so walking upwards never involves ownership.
//! Every node carries a [`FilterFlags`] record that only the filter engine
//! writes to.

use std::fmt;

use crate::filter::{FilterFlags, FilterState};
use crate::{Error, Result};

/// Index of a node inside the [`Tree`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a pre-order visitor wants to happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Continue,
    /// Do not descend into the children of the node just visited.
    SkipChildren,
    Stop,
}

/// What an ancestor walker wants to happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    Stop,
}

#[derive(Debug, Clone)]
pub struct Node<T> {
    id: NodeId,
    title: String,
    parent: Option<NodeId>,
    /// `None` marks a leaf. An empty folder is `Some(vec![])`.
    children: Option<Vec<NodeId>>,
    pub(crate) flags: FilterFlags,
    data: T,
}

impl<T> Node<T> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> Option<&[NodeId]> {
        self.children.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn flags(&self) -> &FilterFlags {
        &self.flags
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }
}

/// Owned description of a subtree, turned into arena nodes by [`Tree::new`]
/// and [`Tree::add_child`].
#[derive(Debug, Clone)]
pub struct NodeBuilder<T> {
    title: String,
    data: T,
    children: Option<Vec<NodeBuilder<T>>>,
}

impl<T> NodeBuilder<T> {
    pub fn leaf(title: impl Into<String>, data: T) -> Self {
        Self {
            title: title.into(),
            data,
            children: None,
        }
    }

    pub fn folder(title: impl Into<String>, data: T, children: Vec<NodeBuilder<T>>) -> Self {
        Self {
            title: title.into(),
            data,
            children: Some(children),
        }
    }

    /// Appends a child, turning a leaf into a folder.
    pub fn child(mut self, child: NodeBuilder<T>) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Tree<T> {
    nodes: Vec<Node<T>>,
    pub(crate) filter: FilterState,
    redraw: bool,
}

impl<T> Tree<T> {
    pub fn new(root: NodeBuilder<T>) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            filter: FilterState::default(),
            redraw: false,
        };
        tree.insert(None, root);
        tree
    }

    fn insert(&mut self, parent: Option<NodeId>, builder: NodeBuilder<T>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let NodeBuilder {
            title,
            data,
            children,
        } = builder;

        self.nodes.push(Node {
            id,
            title,
            parent,
            children: children.as_ref().map(|c| Vec::with_capacity(c.len())),
            flags: FilterFlags::default(),
            data,
        });

        if let Some(siblings) = parent.and_then(|p| self.nodes[p.0].children.as_mut()) {
            siblings.push(id);
        }

        for child in children.into_iter().flatten() {
            self.insert(Some(id), child);
        }

        id
    }

    /// Attaches `child` (and its whole subtree) as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeBuilder<T>) -> Result<NodeId> {
        if self.node(parent).is_leaf() {
            return Err(Error::LeafParent(parent));
        }
        Ok(self.insert(Some(parent), child))
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.0)
    }

    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.0]
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<T>> {
        self.nodes.iter()
    }

    /// Titles from the root down to `id`, inclusive.
    pub fn path(&self, id: NodeId) -> Vec<&str> {
        let mut path: Vec<&str> = self.ancestors(id).map(Node::title).collect();
        path.reverse();
        path.push(self.node(id).title());
        path
    }

    pub fn pre_order(&self) -> PreOrder<'_, T> {
        PreOrder {
            tree: self,
            stack: vec![self.root()],
        }
    }

    /// Strict ancestors of `id`, closest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, T> {
        Ancestors {
            tree: self,
            next: self.node(id).parent,
        }
    }

    /// Visits every node in pre-order. Returns `false` if the visitor stopped
    /// the traversal.
    pub fn visit<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&Node<T>) -> Visit,
    {
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            match f(node) {
                Visit::Continue => {
                    if let Some(children) = node.children() {
                        stack.extend(children.iter().rev());
                    }
                }
                Visit::SkipChildren => {}
                Visit::Stop => return false,
            }
        }
        true
    }

    pub fn visit_mut<F>(&mut self, mut f: F) -> bool
    where
        F: FnMut(&mut Node<T>) -> Visit,
    {
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id.0];
            match f(node) {
                Visit::Continue => {
                    if let Some(children) = node.children() {
                        stack.extend(children.iter().rev());
                    }
                }
                Visit::SkipChildren => {}
                Visit::Stop => return false,
            }
        }
        true
    }

    /// Walks from `id` towards the root, closest first, optionally starting
    /// with `id` itself. Returns `false` if the walker stopped early.
    pub fn visit_parents<F>(&self, id: NodeId, include_self: bool, mut f: F) -> bool
    where
        F: FnMut(&Node<T>) -> Walk,
    {
        let mut current = if include_self {
            Some(id)
        } else {
            self.node(id).parent
        };
        while let Some(cur) = current {
            let node = self.node(cur);
            if f(node) == Walk::Stop {
                return false;
            }
            current = node.parent;
        }
        true
    }

    pub fn visit_parents_mut<F>(&mut self, id: NodeId, include_self: bool, mut f: F) -> bool
    where
        F: FnMut(&mut Node<T>) -> Walk,
    {
        let mut current = if include_self {
            Some(id)
        } else {
            self.node(id).parent
        };
        while let Some(cur) = current {
            let node = &mut self.nodes[cur.0];
            if f(node) == Walk::Stop {
                return false;
            }
            current = node.parent;
        }
        true
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    /// Asks the presentation layer to re-derive visuals from the flags.
    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// Returns whether a redraw was requested since the last call.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }
}

/// Lazy pre-order walk over node ids. Cloning it restarts from the same
/// position.
#[derive(Debug)]
pub struct PreOrder<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<NodeId>,
}

// `T` does not need to be `Clone`.
impl<T> Clone for PreOrder<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
        }
    }
}

impl<T> Iterator for PreOrder<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(children) = self.tree.node(id).children() {
            self.stack.extend(children.iter().rev());
        }
        Some(id)
    }
}

#[derive(Debug)]
pub struct Ancestors<'a, T> {
    tree: &'a Tree<T>,
    next: Option<NodeId>,
}

impl<T> Clone for Ancestors<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            next: self.next,
        }
    }
}

impl<'a, T> Iterator for Ancestors<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<&'a Node<T>> {
        let node = self.tree.node(self.next?);
        self.next = node.parent;
        Some(node)
    }
}
