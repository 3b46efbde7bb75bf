//! Dependency graph between the fields of one form.
//!
//! Nodes are fields in declaration order and an edge runs from a parent to
//! each field it restricts.

use std::collections::{BTreeSet, HashMap};

use petgraph::Direction::{Incoming, Outgoing};
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, Reversed};
use serde::Serialize;

use crate::error::ConfigError;
use crate::field::FieldDeclaration;

/// A dependent field restricted by a parent field's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    /// The restricted field.
    pub dependent: String,
    /// The restricting field.
    pub parent: String,
    /// Attribute on the dependent's candidates compared with the parent value.
    pub attribute: String,
}

/// Acyclic dependency graph with a stable topological order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyGraph {
    #[serde(skip)]
    graph: DiGraph<String, ()>,
    edges: Vec<Dependency>,
    order: Vec<String>,
}

impl DependencyGraph {
    /// Builds the graph for a list of fields.
    ///
    /// Every parent must already be known to be declared. Ties in the
    /// topological order are broken by declaration order.
    pub fn build(fields: &[FieldDeclaration]) -> Result<Self, ConfigError> {
        let mut graph = DiGraph::with_capacity(fields.len(), fields.len());
        let nodes: HashMap<&str, NodeIndex> = fields
            .iter()
            .map(|f| (f.name.as_str(), graph.add_node(f.name.clone())))
            .collect();

        let mut edges = Vec::new();
        for field in fields {
            let node = nodes[field.name.as_str()];
            for (parent, attribute) in field.parents() {
                let Some(&p) = nodes.get(parent) else {
                    return Err(ConfigError::UndeclaredDependency {
                        field: field.name.clone(),
                        parent: parent.to_string(),
                    });
                };
                graph.update_edge(p, node, ());
                edges.push(Dependency {
                    dependent: field.name.clone(),
                    parent: parent.to_string(),
                    attribute: attribute.to_string(),
                });
            }
        }

        if let Err(cycle) = toposort(&graph, None) {
            let cycle = cycle_through(&graph, cycle.node_id())
                .into_iter()
                .map(|n| graph[n].clone())
                .collect();
            return Err(ConfigError::CyclicDependency { cycle });
        }

        let order = declaration_order_topo(&graph)
            .into_iter()
            .map(|n| graph[n].clone())
            .collect();

        Ok(Self { graph, edges, order })
    }

    /// Returns every edge in declaration order.
    pub fn edges(&self) -> &[Dependency] {
        &self.edges
    }

    /// Returns the edges whose dependent is `field`.
    pub fn parents<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Dependency> + 'a {
        self.edges.iter().filter(move |e| e.dependent == field)
    }

    /// Returns the edges whose parent is `field`.
    pub fn dependents<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Dependency> + 'a {
        self.edges.iter().filter(move |e| e.parent == field)
    }

    /// Returns true if the field has at least one parent.
    pub fn is_dependent(&self, field: &str) -> bool {
        self.node(field)
            .is_some_and(|n| self.graph.neighbors_directed(n, Incoming).next().is_some())
    }

    /// Returns all field names, parents before dependents.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Returns the transitive parents of a field in topological order.
    pub fn ancestors(&self, field: &str) -> Vec<&str> {
        let Some(start) = self.node(field) else {
            return Vec::new();
        };

        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, start);
        let mut found: BTreeSet<&str> = BTreeSet::new();
        while let Some(n) = dfs.next(reversed) {
            if n != start {
                found.insert(self.graph[n].as_str());
            }
        }

        self.order
            .iter()
            .map(String::as_str)
            .filter(|name| found.contains(name))
            .collect()
    }

    fn node(&self, field: &str) -> Option<NodeIndex> {
        self.graph.node_indices().find(|&n| self.graph[n] == field)
    }
}

/// Topological order of an acyclic graph, preferring the lowest node index
/// among the nodes that are ready.
fn declaration_order_topo(graph: &DiGraph<String, ()>) -> Vec<NodeIndex> {
    let mut pending: Vec<usize> = graph
        .node_indices()
        .map(|n| graph.neighbors_directed(n, Incoming).count())
        .collect();
    let mut ready: BTreeSet<NodeIndex> = graph
        .node_indices()
        .filter(|n| pending[n.index()] == 0)
        .collect();

    let mut order = Vec::with_capacity(graph.node_count());
    while let Some(next) = ready.pop_first() {
        order.push(next);
        for child in graph.neighbors_directed(next, Outgoing) {
            pending[child.index()] -= 1;
            if pending[child.index()] == 0 {
                ready.insert(child);
            }
        }
    }
    order
}

/// Returns a closed path of parents through the cycle containing `node`,
/// e.g. `[a, b, a]` where `a` depends on `b` and `b` on `a`.
fn cycle_through(graph: &DiGraph<String, ()>, node: NodeIndex) -> Vec<NodeIndex> {
    let Some(component) = tarjan_scc(graph).into_iter().find(|scc| scc.contains(&node)) else {
        return vec![node, node];
    };

    // Each member of a cyclic component has a parent inside it, so following
    // the lowest-indexed one must revisit a node.
    let Some(&start) = component.iter().min() else {
        return vec![node, node];
    };
    let mut path = vec![start];
    let mut current = start;
    loop {
        let Some(parent) = graph
            .neighbors_directed(current, Incoming)
            .filter(|p| component.contains(p))
            .min()
        else {
            return path;
        };
        if let Some(pos) = path.iter().position(|&n| n == parent) {
            let mut cycle = path.split_off(pos);
            cycle.push(parent);
            return cycle;
        }
        path.push(parent);
        current = parent;
    }
}
