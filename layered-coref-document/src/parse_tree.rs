//! Immutable constituency parse trees.
//!
//! Trees arrive from an upstream parser. They are stored as an arena of nodes
//! with parent pointers computed once at construction, so ancestor queries
//! never rebuild a lookup map.
//!
//! ```text
//! (ROOT (S (NP (NNP John)) (VP (VBD saw) (NP (PRP him)))))
//!
//!   0 ROOT ─ 1 S ─┬─ 2 NP ─ 3 NNP ─ 4 John
//!                 └─ 5 VP ─┬─ 6 VBD ─ 7 saw
//!                          └─ 8 NP ─ 9 PRP ─ 10 him
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::{CorefError, CorefResult};

/// Index of a node inside its [`ParseTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Recursive description of a tree, used to build a [`ParseTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub label: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(label: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// A word.
    pub fn leaf(word: impl Into<String>) -> Self {
        Self::new(word, Vec::new())
    }

    /// A part-of-speech node dominating a single word.
    pub fn preterminal(tag: impl Into<String>, word: impl Into<String>) -> Self {
        Self::new(tag, vec![Self::leaf(word)])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Node {
    label: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    /// Token span `[begin, end)` covered by this node.
    span: (usize, usize),
}

/// A parse tree covering one sentence. The root is always `NodeId(0)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseTree {
    nodes: Vec<Node>,
}

impl ParseTree {
    /// Build a tree from its recursive description.
    pub fn from_node(root: TreeNode) -> CorefResult<Self> {
        if root.children.is_empty() {
            return Err(CorefError::invalid_tree(format!(
                "root `{}` has no children",
                root.label
            )));
        }
        let mut tree = ParseTree { nodes: Vec::new() };
        let mut next_token = 0;
        tree.push(root, None, &mut next_token);
        Ok(tree)
    }

    /// Read a Penn-Treebank style bracketed tree.
    ///
    /// A node without a label (`( (S ...))`) is labelled `ROOT`.
    pub fn parse(text: &str) -> CorefResult<Self> {
        let mut reader = BracketReader::new(text);
        let root = reader.read_tree()?;
        if let Some(extra) = reader.peek() {
            return Err(CorefError::invalid_tree(format!(
                "unexpected {} after the tree",
                extra.describe()
            )));
        }
        Self::from_node(root)
    }

    fn push(&mut self, node: TreeNode, parent: Option<NodeId>, next_token: &mut usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        let begin = *next_token;
        self.nodes.push(Node {
            label: node.label,
            children: Vec::new(),
            parent,
            span: (begin, begin),
        });

        if node.children.is_empty() {
            *next_token += 1;
        } else {
            let children: Vec<NodeId> = node
                .children
                .into_iter()
                .map(|child| self.push(child, Some(id), next_token))
                .collect();
            self.nodes[id.0].children = children;
        }

        self.nodes[id.0].span = (begin, *next_token);
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, leaves included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of words covered by the tree.
    pub fn token_count(&self) -> usize {
        self.span(self.root()).1
    }

    pub fn label(&self, node: NodeId) -> &str {
        &self.nodes[node.0].label
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn span(&self, node: NodeId) -> (usize, usize) {
        self.nodes[node.0].span
    }

    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.nodes[node.0].children.is_empty()
    }

    /// Returns true for phrase and tag nodes carrying `label`; words never match.
    pub fn has_label(&self, node: NodeId, label: &str) -> bool {
        !self.is_leaf(node) && self.label(node) == label
    }

    /// Proper ancestors of `node`, nearest first.
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(node),
        }
    }

    /// Nodes from `ancestor` down to `descendant`, both included.
    ///
    /// Returns `None` if `ancestor` does not dominate `descendant`.
    pub fn path(&self, ancestor: NodeId, descendant: NodeId) -> Option<Vec<NodeId>> {
        let mut path = vec![descendant];
        let mut current = descendant;
        while current != ancestor {
            current = self.parent(current)?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }

    /// Level-order traversal below `start`.
    ///
    /// With a `boundary` path (`[start, .., end]`) only nodes strictly left of
    /// the path are yielded: path nodes themselves are skipped, nothing at or
    /// below the last path node is explored, and branches right of the path
    /// are never entered. Without a boundary, `start` and everything below it
    /// is yielded.
    pub fn breadth_first(&self, start: NodeId, boundary: Option<&[NodeId]>) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            let on_path = boundary.and_then(|path| {
                path.iter()
                    .position(|&p| p == node)
                    .map(|i| path.get(i + 1).copied())
            });

            match on_path {
                Some(Some(next)) => {
                    for &child in self.children(node) {
                        queue.push_back(child);
                        if child == next {
                            break;
                        }
                    }
                }
                Some(None) => {}
                None => {
                    order.push(node);
                    queue.extend(self.children(node).iter().copied());
                }
            }
        }

        order
    }

    /// `(tag, word)` for every word, in sentence order.
    pub fn tagged_words(&self) -> Vec<(&str, &str)> {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|&n| self.is_leaf(n))
            .map(|leaf| {
                let tag = self
                    .parent(leaf)
                    .map(|p| self.label(p))
                    .unwrap_or_default();
                (tag, self.label(leaf))
            })
            .collect()
    }

    /// The node a mention over `[begin, end)` is anchored at.
    ///
    /// Prefers the highest node whose span is exactly `[begin, end)`; falls back
    /// to the smallest node covering it (the deepest one on ties).
    pub fn covering_node(&self, begin: usize, end: usize) -> Option<NodeId> {
        let ids = (0..self.nodes.len()).map(NodeId);

        // Preorder visits parents first, so the first exact match is the highest.
        if let Some(exact) = ids.clone().find(|&n| self.span(n) == (begin, end)) {
            return Some(exact);
        }

        ids.filter(|&n| {
            let (b, e) = self.span(n);
            b <= begin && end <= e
        })
        .fold(None, |best: Option<NodeId>, n| match best {
            Some(b) if width(self.span(b)) < width(self.span(n)) => Some(b),
            _ => Some(n),
        })
    }
}

fn width((begin, end): (usize, usize)) -> usize {
    end - begin
}

/// Iterator over proper ancestors, nearest first.
pub struct Ancestors<'a> {
    tree: &'a ParseTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

// ============================================================================
// BRACKETED TREE READER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tok<'a> {
    Open,
    Close,
    Atom(&'a str),
}

impl<'a> Tok<'a> {
    fn describe(&self) -> String {
        match self {
            Tok::Open => "'('".to_string(),
            Tok::Close => "')'".to_string(),
            Tok::Atom(atom) => format!("`{}`", atom),
        }
    }
}

struct BracketReader<'a> {
    toks: Vec<Tok<'a>>,
    pos: usize,
}

impl<'a> BracketReader<'a> {
    fn new(text: &'a str) -> Self {
        let mut toks = Vec::new();
        let mut atom_start: Option<usize> = None;

        for (i, ch) in text.char_indices() {
            if ch == '(' || ch == ')' || ch.is_whitespace() {
                if let Some(start) = atom_start.take() {
                    toks.push(Tok::Atom(&text[start..i]));
                }
                match ch {
                    '(' => toks.push(Tok::Open),
                    ')' => toks.push(Tok::Close),
                    _ => {}
                }
            } else if atom_start.is_none() {
                atom_start = Some(i);
            }
        }
        if let Some(start) = atom_start {
            toks.push(Tok::Atom(&text[start..]));
        }

        Self { toks, pos: 0 }
    }

    fn peek(&self) -> Option<Tok<'a>> {
        self.toks.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Tok<'a>> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn read_tree(&mut self) -> CorefResult<TreeNode> {
        match self.next() {
            Some(Tok::Atom(word)) => Ok(TreeNode::leaf(word)),
            Some(Tok::Open) => {
                let label = match self.peek() {
                    Some(Tok::Atom(label)) => {
                        self.pos += 1;
                        label.to_string()
                    }
                    _ => "ROOT".to_string(),
                };

                let mut children = Vec::new();
                loop {
                    match self.peek() {
                        Some(Tok::Close) => {
                            self.pos += 1;
                            break;
                        }
                        Some(_) => children.push(self.read_tree()?),
                        None => {
                            return Err(CorefError::invalid_tree(format!(
                                "unclosed node `{}`",
                                label
                            )))
                        }
                    }
                }

                if children.is_empty() {
                    return Err(CorefError::invalid_tree(format!(
                        "node `{}` has no children",
                        label
                    )));
                }
                Ok(TreeNode::new(label, children))
            }
            Some(Tok::Close) => Err(CorefError::invalid_tree("unexpected ')'")),
            None => Err(CorefError::invalid_tree("empty tree")),
        }
    }
}
