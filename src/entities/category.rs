//! Category tree nodes for hierarchical browsing

use serde::{Deserialize, Serialize};

/// Separator between category path segments
pub const PATH_SEPARATOR: char = '/';

/// A node in the category tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: Vec::new(),
        }
    }

    /// Direct child with the given name
    pub fn child(&self, name: &str) -> Option<&CategoryNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Insert a path below this node, reusing existing children
    fn insert_path<'a, I>(&mut self, mut segments: I)
    where
        I: Iterator<Item = &'a str>,
    {
        if let Some(segment) = segments.next() {
            let idx = match self.children.iter().position(|c| c.name == segment) {
                Some(idx) => idx,
                None => {
                    self.children.push(CategoryNode::new(segment));
                    self.children.len() - 1
                }
            };
            self.children[idx].insert_path(segments);
        }
    }

    /// Number of nodes in this subtree, including this node
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(CategoryNode::size).sum::<usize>()
    }
}

/// Split a category path into trimmed, non-empty segments
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(PATH_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Build a forest from category paths, keeping first-appearance order
pub fn build_tree<'a, I>(paths: I) -> Vec<CategoryNode>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut root = CategoryNode::new("");
    for path in paths {
        root.insert_path(split_path(path).into_iter());
    }
    root.children
}

/// Walk a forest along `path`, returning the node at the end
pub fn find<'a>(roots: &'a [CategoryNode], path: &[&str]) -> Option<&'a CategoryNode> {
    let (first, rest) = path.split_first()?;
    let mut node = roots.iter().find(|n| n.name == *first)?;
    for segment in rest {
        node = node.child(segment)?;
    }
    Some(node)
}
