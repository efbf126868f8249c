//! The site map tree and the builder that assembles it during a crawl.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One page in the site map. Children are in the order their links appear on
/// this page, and each child is owned by exactly one parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteMapNode {
    pub url: String,
    pub depth: usize,
    pub children: Vec<SiteMapNode>,
}

impl SiteMapNode {
    pub fn new(url: impl Into<String>, depth: usize) -> Self {
        Self {
            url: url.into(),
            depth,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SiteMapNode::node_count).sum::<usize>()
    }

    /// Deepest `depth` value found in this subtree.
    pub fn max_depth(&self) -> usize {
        self.children
            .iter()
            .map(SiteMapNode::max_depth)
            .max()
            .unwrap_or(self.depth)
    }

    /// Pre-order traversal.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    pub fn urls(&self) -> Vec<&str> {
        self.iter().map(|node| node.url.as_str()).collect()
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a SiteMapNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a SiteMapNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Children claimed while expanding one page.
#[derive(Debug, Clone)]
pub struct Expansion {
    pub parent: String,
    pub children: Vec<String>,
}

/// Collects parent -> children edges as pages are expanded and turns them
/// into an owned tree once the crawl is over.
///
/// URLs are unique across a crawl (the visited registry guarantees it), so a
/// URL identifies its node. The builder has a single owner; workers report
/// expansions to it instead of touching the tree.
#[derive(Debug)]
pub struct SiteMapBuilder {
    root: String,
    edges: HashMap<String, Vec<String>>,
}

impl SiteMapBuilder {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            edges: HashMap::new(),
        }
    }

    pub fn attach(&mut self, expansion: Expansion) {
        if expansion.children.is_empty() {
            return;
        }
        self.edges
            .entry(expansion.parent)
            .or_default()
            .extend(expansion.children);
    }

    pub fn finish(mut self) -> SiteMapNode {
        let root = std::mem::take(&mut self.root);
        self.materialize(root, 0)
    }

    fn materialize(&mut self, url: String, depth: usize) -> SiteMapNode {
        // Each edge list is consumed once, so a node can never be built twice.
        let children = self
            .edges
            .remove(&url)
            .unwrap_or_default()
            .into_iter()
            .map(|child| self.materialize(child, depth + 1))
            .collect();

        SiteMapNode {
            url,
            depth,
            children,
        }
    }
}
