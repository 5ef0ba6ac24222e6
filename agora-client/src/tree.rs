use std::collections::{HashMap, HashSet};

use crate::api::{Comment, CommentId};

/// A comment with its replies, in creation order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommentNode {
    pub comment: Comment,
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    /// Nodes in this subtree, the node itself included
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(CommentNode::count).sum::<usize>()
    }

    pub fn find_in<'a>(
        nodes: &'a mut [CommentNode],
        id: &CommentId,
    ) -> Option<&'a mut CommentNode> {
        for n in nodes.iter_mut() {
            if n.comment.id == *id {
                return Some(n);
            }
            if let Some(res) = CommentNode::find_in(&mut n.children, id) {
                return Some(res);
            }
        }
        None
    }
}

/// Thread a post's flat comment list into its forest of root nodes.
///
/// The input must be sorted by creation time ascending; both the root
/// sequence and every child sequence then come out chronological without
/// any re-sorting here. A comment whose parent is not part of the input
/// (deleted, or not loaded yet) is dropped from the forest, children
/// included. When an id appears twice, the last record wins for the
/// node's contents and the node sits at the first occurrence's position.
pub fn build_tree(comments: Vec<Comment>) -> Vec<CommentNode> {
    let mut by_id = HashMap::with_capacity(comments.len());
    let mut layout = Vec::with_capacity(comments.len());
    for c in comments {
        let id = c.id;
        layout.push((id, c.parent_id));
        if by_id.insert(id, c).is_some() {
            tracing::warn!(comment = ?id, "duplicate comment id, keeping last record");
        }
    }

    let mut roots = Vec::new();
    let mut children: HashMap<CommentId, Vec<CommentId>> = HashMap::new();
    let mut placed = HashSet::with_capacity(layout.len());
    for (id, parent) in layout {
        if !placed.insert(id) {
            continue;
        }
        match parent {
            None => roots.push(id),
            Some(p) if by_id.contains_key(&p) => children.entry(p).or_default().push(id),
            Some(p) => {
                tracing::warn!(comment = ?id, parent = ?p, "dropping comment with unknown parent")
            }
        }
    }

    roots
        .into_iter()
        .filter_map(|id| assemble(id, &mut by_id, &children))
        .collect()
}

fn assemble(
    id: CommentId,
    by_id: &mut HashMap<CommentId, Comment>,
    children: &HashMap<CommentId, Vec<CommentId>>,
) -> Option<CommentNode> {
    // A comment can only be taken out of the map once, so a malformed
    // self-referencing parent cannot recurse forever
    let comment = by_id.remove(&id)?;
    let children = children
        .get(&id)
        .into_iter()
        .flatten()
        .filter_map(|c| assemble(*c, by_id, children))
        .collect();
    Some(CommentNode { comment, children })
}
