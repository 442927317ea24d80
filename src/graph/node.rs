//! Arena of payload-carrying nodes connected by labeled edges.

use super::error::ConstructionError;
use super::schema::{Label, Schema};
use std::collections::VecDeque;
use std::fmt;

/// Position of a node in its [`Graph`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Directed, labeled reference to another node of the same graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub label: Label,
    pub target: NodeId,
}

/// A node: opaque payload, labeled out-edges and a trailing byte attachment.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode<P> {
    payload: P,
    attachment: Vec<u8>,
    edges: Vec<Edge>,
    root: bool,
}

impl<P> GraphNode<P> {
    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    /// Opaque bytes stored after the edges.
    pub fn attachment(&self) -> &[u8] {
        &self.attachment
    }

    pub fn set_attachment(&mut self, attachment: Vec<u8>) {
        self.attachment = attachment;
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_root(&self) -> bool {
        self.root
    }
}

/// Rooted, possibly cyclic directed graph.
///
/// Nodes live in an arena and refer to each other by [`NodeId`], so cycles and
/// shared nodes need no reference counting. Edge labels are checked against
/// the graph's [`Schema`] when an edge is added.
///
/// # Example
///
/// ```rust
/// use automata_engine::graph::{Graph, Schema};
///
/// let schema = Schema::open(1);
/// let mut graph = Graph::new(schema.clone());
/// let root = graph.add_node("root");
/// let leaf = graph.add_node("leaf");
/// graph.set_root(root).unwrap();
///
/// graph.connect(root, schema.label(&["down"]).unwrap(), leaf).unwrap();
/// graph.connect(leaf, schema.label(&["up"]).unwrap(), root).unwrap();
///
/// assert_eq!(graph.bfs_order().unwrap(), [root, leaf]);
/// assert!(graph.connect(root, schema.label(&["x"]).unwrap(), root).is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Graph<P> {
    schema: Schema,
    nodes: Vec<GraphNode<P>>,
    root: Option<NodeId>,
}

impl<P> Graph<P> {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            nodes: Vec::new(),
            root: None,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn add_node(&mut self, payload: P) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(GraphNode {
            payload,
            attachment: Vec::new(),
            edges: Vec::new(),
            root: false,
        });
        id
    }

    /// Make `id` the only root node.
    pub fn set_root(&mut self, id: NodeId) -> Result<(), ConstructionError> {
        if id.0 >= self.nodes.len() {
            return Err(ConstructionError::UnknownNode(id));
        }
        if let Some(previous) = self.root.and_then(|old| self.nodes.get_mut(old.0)) {
            previous.root = false;
        }
        self.nodes[id.0].root = true;
        self.root = Some(id);
        Ok(())
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn root_node(&self) -> Option<&GraphNode<P>> {
        self.root.and_then(|id| self.node(id))
    }

    /// Add an edge from `from` to `to` after checking `label` against the schema.
    pub fn connect(
        &mut self,
        from: NodeId,
        label: Label,
        to: NodeId,
    ) -> Result<(), ConstructionError> {
        if to.0 >= self.nodes.len() {
            return Err(ConstructionError::UnknownNode(to));
        }
        self.schema.check(&label)?;
        let node = self
            .nodes
            .get_mut(from.0)
            .ok_or(ConstructionError::UnknownNode(from))?;
        node.edges.push(Edge { label, target: to });
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode<P>> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut GraphNode<P>> {
        self.nodes.get_mut(id.0)
    }

    /// Target node of the `index`-th edge of `id`.
    pub fn follow(&self, id: NodeId, index: usize) -> Option<&GraphNode<P>> {
        let edge = self.node(id)?.edges.get(index)?;
        self.node(edge.target)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &GraphNode<P>)> + '_ {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes reachable from the root in breadth-first order.
    ///
    /// Edges are visited in insertion order and every node appears once, at
    /// its first discovery, however many edges lead to it. The root is first.
    /// Nodes the root cannot reach are not listed.
    pub fn bfs_order(&self) -> Result<Vec<NodeId>, ConstructionError> {
        let root = self.root.ok_or(ConstructionError::MissingRoot)?;
        let mut seen = vec![false; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::from([root]);
        seen[root.0] = true;

        while let Some(id) = queue.pop_front() {
            order.push(id);
            for edge in &self.nodes[id.0].edges {
                if !seen[edge.target.0] {
                    seen[edge.target.0] = true;
                    queue.push_back(edge.target);
                }
            }
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Domain, Token};

    fn cycle() -> (Graph<&'static str>, [NodeId; 3]) {
        let schema = Schema::new(vec![Domain::closed(["next"])]).unwrap();
        let next = schema.label(&["next"]).unwrap();
        let mut graph = Graph::new(schema);
        let root = graph.add_node("root");
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        graph.set_root(root).unwrap();
        graph.connect(root, next.clone(), a).unwrap();
        graph.connect(a, next.clone(), b).unwrap();
        graph.connect(b, next, root).unwrap();
        (graph, [root, a, b])
    }

    #[test]
    fn bfs_visits_each_node_once() {
        let (graph, [root, a, b]) = cycle();
        assert_eq!(graph.bfs_order().unwrap(), [root, a, b]);
    }

    #[test]
    fn bfs_lists_shared_nodes_at_first_discovery() {
        let schema = Schema::open(1);
        let mut graph = Graph::new(schema.clone());
        let root = graph.add_node(0);
        let shared = graph.add_node(1);
        let left = graph.add_node(2);
        graph.set_root(root).unwrap();
        graph.connect(root, schema.label(&["l"]).unwrap(), left).unwrap();
        graph.connect(root, schema.label(&["s"]).unwrap(), shared).unwrap();
        graph.connect(left, schema.label(&["s"]).unwrap(), shared).unwrap();

        assert_eq!(graph.bfs_order().unwrap(), [root, left, shared]);
    }

    #[test]
    fn unreachable_nodes_are_skipped() {
        let (mut graph, [root, a, b]) = cycle();
        graph.add_node("island");
        assert_eq!(graph.bfs_order().unwrap(), [root, a, b]);
    }

    #[test]
    fn bfs_requires_a_root() {
        let mut graph: Graph<()> = Graph::new(Schema::default());
        graph.add_node(());
        assert_eq!(graph.bfs_order(), Err(ConstructionError::MissingRoot));
    }

    #[test]
    fn set_root_moves_the_flag() {
        let (mut graph, [root, a, _]) = cycle();
        graph.set_root(a).unwrap();
        assert!(!graph.node(root).unwrap().is_root());
        assert!(graph.node(a).unwrap().is_root());
        assert_eq!(graph.nodes().filter(|(_, n)| n.is_root()).count(), 1);
        assert_eq!(
            graph.set_root(NodeId(9)),
            Err(ConstructionError::UnknownNode(NodeId(9)))
        );
    }

    #[test]
    fn connect_checks_schema_and_endpoints() {
        let (mut graph, [root, _, _]) = cycle();
        let bad = Label::new(vec![Token::Str("next".into())]);
        assert_eq!(
            graph.connect(root, bad, root),
            Err(ConstructionError::ExpectedIndex { position: 0 })
        );
        assert_eq!(
            graph.connect(root, Label::new(vec![Token::Int(0)]), NodeId(7)),
            Err(ConstructionError::UnknownNode(NodeId(7)))
        );
    }

    #[test]
    fn follow_walks_edges_by_index() {
        let (graph, [root, _, _]) = cycle();
        let a = graph.follow(root, 0).unwrap();
        assert_eq!(*a.payload(), "a");
        assert!(graph.follow(root, 1).is_none());
    }
}
