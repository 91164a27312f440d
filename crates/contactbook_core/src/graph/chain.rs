//! Insertion-order chain of contact nodes.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeId(u64);

/// One graph node mirroring a contact's name and category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    id: NodeId,
    pub name: String,
    pub category: String,
    links: Vec<NodeId>,
}

impl GraphNode {
    /// Number of adjacent nodes.
    pub fn degree(&self) -> usize {
        self.links.len()
    }
}

/// Adjacency structure where each node joins the previous one.
#[derive(Debug, Default)]
pub struct RelationshipGraph {
    nodes: Vec<GraphNode>,
    next_id: u64,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node and links it both ways to the latest surviving node.
    pub fn link(&mut self, name: &str, category: &str) {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        let mut node = GraphNode {
            id,
            name: name.to_string(),
            category: category.to_string(),
            links: Vec::new(),
        };
        if let Some(previous) = self.nodes.last_mut() {
            previous.links.push(id);
            node.links.push(previous.id);
        }
        self.nodes.push(node);
    }

    /// Removes the first node named `name`.
    ///
    /// Neighbours forget the removed node but are not joined to each other,
    /// so the chain may split. Returns `false` when no node matched.
    pub fn unlink(&mut self, name: &str) -> bool {
        let Some(index) = self.nodes.iter().position(|node| node.name == name) else {
            return false;
        };
        let removed = self.nodes.remove(index);
        for node in &mut self.nodes {
            node.links.retain(|link| *link != removed.id);
        }
        true
    }

    /// Names adjacent to the first node named `name`, in link order.
    pub fn neighbors(&self, name: &str) -> Vec<&str> {
        let Some(node) = self.nodes.iter().find(|node| node.name == name) else {
            return Vec::new();
        };
        node.links
            .iter()
            .filter_map(|link| self.nodes.iter().find(|candidate| candidate.id == *link))
            .map(|neighbor| neighbor.name.as_str())
            .collect()
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.nodes.iter()
    }

    /// Number of maximal linked runs of nodes.
    pub fn component_count(&self) -> usize {
        let mut seen = HashSet::new();
        let mut components = 0;
        for start in &self.nodes {
            if !seen.insert(start.id) {
                continue;
            }
            components += 1;
            let mut pending = start.links.clone();
            while let Some(next) = pending.pop() {
                if !seen.insert(next) {
                    continue;
                }
                if let Some(node) = self.nodes.iter().find(|node| node.id == next) {
                    pending.extend(node.links.iter().copied());
                }
            }
        }
        components
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
