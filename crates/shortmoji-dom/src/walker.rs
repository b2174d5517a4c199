//! [§ 6 Traversal](https://dom.spec.whatwg.org/#traversal)
//!
//! A `TreeWalker` that works over any tree implementing [`Traversable`].
//! It yields, in document order, the nodes under a root that are shown by
//! `whatToShow` and accepted by a filter callback. A filter can reject a
//! node, which also hides everything beneath it.

use std::iter::FusedIterator;

use crate::NodeKind;

/// The minimal navigation a tree needs to be walked.
///
/// Anything with parent/first-child/next-sibling links and a notion of node
/// kind can implement this; the walker never looks at node payloads itself.
pub trait Traversable {
    /// Handle used to refer to a node of this tree.
    type NodeRef: Copy + Eq;

    /// The node's parent, if attached.
    fn parent(&self, node: Self::NodeRef) -> Option<Self::NodeRef>;

    /// The node's first child.
    fn first_child(&self, node: Self::NodeRef) -> Option<Self::NodeRef>;

    /// The node's next sibling.
    fn next_sibling(&self, node: Self::NodeRef) -> Option<Self::NodeRef>;

    /// The node's kind, or `None` for an unknown handle.
    fn node_kind(&self, node: Self::NodeRef) -> Option<NodeKind>;
}

/// [§ 6.3 Interface NodeFilter](https://dom.spec.whatwg.org/#interface-nodefilter)
///
/// Result of filtering a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeFilter {
    /// `FILTER_ACCEPT`: the walker returns this node.
    Accept,
    /// `FILTER_REJECT`: skip this node and all of its descendants.
    Reject,
    /// `FILTER_SKIP`: skip this node but still visit its descendants.
    Skip,
}

/// [§ 6.3 whatToShow](https://dom.spec.whatwg.org/#dom-nodefilter-show_all)
///
/// Bitmask of node kinds a walker considers before consulting its filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhatToShow(u32);

impl WhatToShow {
    /// `SHOW_ALL`
    pub const ALL: Self = Self(0xFFFF_FFFF);
    /// `SHOW_ELEMENT`
    pub const ELEMENT: Self = Self(0x1);
    /// `SHOW_TEXT`
    pub const TEXT: Self = Self(0x4);
    /// `SHOW_COMMENT`
    pub const COMMENT: Self = Self(0x80);
    /// `SHOW_DOCUMENT`
    pub const DOCUMENT: Self = Self(0x100);
    /// `SHOW_DOCUMENT_TYPE`
    pub const DOCUMENT_TYPE: Self = Self(0x200);

    /// Combine two masks.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// "If the nth bit (where 0 is the least significant bit) of whatToShow
    /// is not set, return FILTER_SKIP", n being the node type minus one.
    #[must_use]
    pub const fn shows(self, kind: NodeKind) -> bool {
        let bit = match kind {
            NodeKind::Element => Self::ELEMENT.0,
            NodeKind::Text => Self::TEXT.0,
            NodeKind::Comment => Self::COMMENT.0,
            NodeKind::Document => Self::DOCUMENT.0,
            NodeKind::DocumentType => Self::DOCUMENT_TYPE.0,
        };
        self.0 & bit != 0
    }
}

/// [§ 6.2 Interface TreeWalker](https://dom.spec.whatwg.org/#interface-treewalker)
///
/// Only `nextNode()` is provided, exposed as [`Iterator::next`]. The walk is
/// finite and cannot be restarted; once it returns `None` it stays exhausted.
pub struct TreeWalker<'a, T, F>
where
    T: Traversable + ?Sized,
{
    tree: &'a T,
    root: T::NodeRef,
    current: T::NodeRef,
    what_to_show: WhatToShow,
    filter: F,
    finished: bool,
}

impl<'a, T, F> TreeWalker<'a, T, F>
where
    T: Traversable + ?Sized,
    F: FnMut(&T, T::NodeRef) -> NodeFilter,
{
    /// [§ 6.1 createTreeWalker](https://dom.spec.whatwg.org/#dom-document-createtreewalker)
    ///
    /// "Set walker's root and walker's current to root."
    pub fn new(tree: &'a T, root: T::NodeRef, what_to_show: WhatToShow, filter: F) -> Self
    where
        F: FnMut(&T, T::NodeRef) -> NodeFilter,
    {
        Self {
            tree,
            root,
            current: root,
            what_to_show,
            filter,
            finished: false,
        }
    }

    /// The walker's root.
    pub const fn root(&self) -> T::NodeRef {
        self.root
    }

    /// [§ 6.2 filter](https://dom.spec.whatwg.org/#concept-node-filter)
    fn filter_node(&mut self, node: T::NodeRef) -> NodeFilter {
        match self.tree.node_kind(node) {
            Some(kind) if self.what_to_show.shows(kind) => (self.filter)(self.tree, node),
            _ => NodeFilter::Skip,
        }
    }

    /// [§ 6.2 nextNode()](https://dom.spec.whatwg.org/#dom-treewalker-nextnode)
    fn next_node(&mut self) -> Option<T::NodeRef> {
        let mut node = self.current;
        let mut result = NodeFilter::Accept;

        loop {
            // "While result is not FILTER_REJECT and node has a child"
            while result != NodeFilter::Reject {
                let Some(child) = self.tree.first_child(node) else {
                    break;
                };
                node = child;
                result = self.filter_node(node);
                if result == NodeFilter::Accept {
                    self.current = node;
                    return Some(node);
                }
            }

            // "Let sibling be null. Let temporary be node."
            let mut temporary = Some(node);
            let mut sibling = None;
            while let Some(candidate) = temporary {
                if candidate == self.root {
                    return None;
                }
                sibling = self.tree.next_sibling(candidate);
                if sibling.is_some() {
                    break;
                }
                temporary = self.tree.parent(candidate);
            }
            node = sibling?;

            result = self.filter_node(node);
            if result == NodeFilter::Accept {
                self.current = node;
                return Some(node);
            }
        }
    }
}

impl<T, F> Iterator for TreeWalker<'_, T, F>
where
    T: Traversable + ?Sized,
    F: FnMut(&T, T::NodeRef) -> NodeFilter,
{
    type Item = T::NodeRef;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let next = self.next_node();
        self.finished = next.is_none();
        next
    }
}

impl<T, F> FusedIterator for TreeWalker<'_, T, F>
where
    T: Traversable + ?Sized,
    F: FnMut(&T, T::NodeRef) -> NodeFilter,
{
}
