//! Second decoding pass: turn positional node ids into arena links.

use super::error::{CodecError, FormatError, InvariantViolation};
use crate::graph::{Graph, Label, NodeId, Schema};
use tracing::debug;

/// A node read from a stream whose edges still hold raw target ids.
pub(crate) struct PendingNode<P> {
    pub payload: P,
    pub edges: Vec<(Label, usize)>,
    pub attachment: Vec<u8>,
    pub root: bool,
}

/// Check every reference and the single-root invariant, then build the graph.
///
/// Node `i` of `pending` becomes `NodeId(i)` of the result.
pub(crate) fn resolve<P>(
    schema: Schema,
    pending: Vec<PendingNode<P>>,
) -> Result<Graph<P>, CodecError> {
    let count = pending.len();
    for (node, entry) in pending.iter().enumerate() {
        if let Some(&(_, target)) = entry.edges.iter().find(|(_, target)| *target >= count) {
            return Err(FormatError::DanglingReference { node, target }.into());
        }
    }

    let roots: Vec<usize> = pending
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.root)
        .map(|(index, _)| index)
        .collect();
    let root = match roots.as_slice() {
        [root] => NodeId(*root),
        [] => return Err(InvariantViolation::NoRoot.into()),
        many => {
            return Err(InvariantViolation::MultipleRoots { count: many.len() }.into());
        }
    };

    let mut graph = Graph::new(schema);
    let mut links = Vec::with_capacity(count);
    for entry in pending {
        let id = graph.add_node(entry.payload);
        if let Some(node) = graph.node_mut(id) {
            node.set_attachment(entry.attachment);
        }
        links.push((id, entry.edges));
    }
    for (from, edges) in links {
        for (label, target) in edges {
            graph
                .connect(from, label, NodeId(target))
                .map_err(|source| FormatError::Label {
                    node: from.index(),
                    source,
                })?;
        }
    }
    graph.set_root(root)?;

    debug!(nodes = count, "resolved node references");
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(edges: Vec<(Label, usize)>, root: bool) -> PendingNode<()> {
        PendingNode {
            payload: (),
            edges,
            attachment: Vec::new(),
            root,
        }
    }

    #[test]
    fn references_become_arena_links() {
        let graph = resolve(
            Schema::open(0),
            vec![
                node(vec![(Label::default(), 1)], true),
                node(vec![(Label::default(), 0), (Label::default(), 1)], false),
            ],
        )
        .unwrap();

        assert_eq!(graph.root(), Some(NodeId(0)));
        let second = graph.node(NodeId(1)).unwrap();
        assert_eq!(second.edges()[0].target, NodeId(0));
        assert_eq!(second.edges()[1].target, NodeId(1));
    }

    #[test]
    fn dangling_reference_is_a_format_error() {
        let result = resolve(Schema::open(0), vec![node(vec![(Label::default(), 4)], true)]);
        assert!(matches!(
            result,
            Err(CodecError::Format(FormatError::DanglingReference { node: 0, target: 4 }))
        ));
    }

    #[test]
    fn exactly_one_root_is_required() {
        let none = resolve(Schema::open(0), vec![node(Vec::new(), false)]);
        assert!(matches!(
            none,
            Err(CodecError::Invariant(InvariantViolation::NoRoot))
        ));

        let two = resolve(
            Schema::open(0),
            vec![node(Vec::new(), true), node(Vec::new(), true)],
        );
        assert!(matches!(
            two,
            Err(CodecError::Invariant(InvariantViolation::MultipleRoots { count: 2 }))
        ));
    }
}
