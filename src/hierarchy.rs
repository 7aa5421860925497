use crate::node::TocNode;

/// A TOC entry from a flat listing where depth is given by `level`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatTocEntry {
    pub level: usize,
    pub title: String,
    pub src: String,
}

impl FlatTocEntry {
    pub fn new(level: usize, title: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            src: src.into(),
        }
    }
}

/// Rebuilds a tree from entries listed in document order.
///
/// Keeps a stack of open ancestors: entries at the same or a shallower level
/// close the ancestors above them, then the entry becomes a child of whatever
/// is left on top (or a new root when nothing is).
pub fn build_tree<I>(entries: I) -> Vec<TocNode>
where
    I: IntoIterator<Item = FlatTocEntry>,
{
    let mut roots = Vec::new();
    let mut stack: Vec<TocNode> = Vec::new();

    for entry in entries {
        while stack.last().is_some_and(|top| top.level >= entry.level) {
            close_top(&mut stack, &mut roots);
        }
        stack.push(TocNode::new(entry.title, entry.src, entry.level));
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    roots
}

fn close_top(stack: &mut Vec<TocNode>, roots: &mut Vec<TocNode>) {
    let Some(node) = stack.pop() else {
        return;
    };
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}
