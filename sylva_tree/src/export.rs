// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graphviz export of a tree's structure.

use std::io;

use crate::dimension::Dimension;
use crate::entity::Spatial;
use crate::node::{NodeRef, NodeTree};

/// A named, labelled graph vertex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DotElem {
    /// Vertex identifier.
    pub name: String,
    /// Display label.
    pub label: String,
}

/// Snapshot of a tree as a directed graph: one vertex per node and per stored entity,
/// edges from each node to its children and from each leaf to its entities.
///
/// Non-root nodes are named `node_{parent index}_{depth}_{index}`. The name does not
/// identify the whole ancestry, so deep trees can repeat names and Graphviz will fold
/// those vertices together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DotGraph {
    /// Graph name.
    pub name: String,
    /// Tree nodes in traversal order.
    pub nodes: Vec<DotElem>,
    /// Entities in traversal order.
    pub entities: Vec<DotElem>,
    /// `(from, to)` vertex names.
    pub edges: Vec<(String, String)>,
}

impl DotGraph {
    /// Collect the graph by traversing `tree`.
    pub fn from_tree<D: Dimension, E: Spatial + Clone>(tree: &NodeTree<D, E>) -> Self {
        let mut graph = Self {
            name: D::NAME.to_string(),
            ..Self::default()
        };
        tree.traverse(|node| {
            let elem = node_elem(tree, node);
            if let Some(parent) = node.parent().and_then(|p| tree.node(p)) {
                graph
                    .edges
                    .push((node_elem(tree, parent).name, elem.name.clone()));
            }
            if node.is_leaf() {
                for entity in node.entities() {
                    let id = entity.id();
                    let child = DotElem {
                        name: format!("entity_{id}"),
                        label: id.to_string(),
                    };
                    graph.edges.push((elem.name.clone(), child.name.clone()));
                    graph.entities.push(child);
                }
            }
            graph.nodes.push(elem);
            true
        });
        graph
    }

    /// Render as Graphviz DOT. Vertex names are quoted, so negative entity IDs stay valid.
    pub fn write_to(&self, mut out: impl io::Write) -> io::Result<()> {
        writeln!(out, "digraph \"{}\" {{", self.name)?;
        writeln!(out, "    node [shape=box];")?;
        for n in &self.nodes {
            writeln!(out, "    \"{}\" [label=\"{}\"];", n.name, n.label)?;
        }
        for e in &self.entities {
            writeln!(out, "    \"{}\" [label=\"{}\", shape=ellipse];", e.name, e.label)?;
        }
        for (from, to) in &self.edges {
            writeln!(out, "    \"{from}\" -> \"{to}\";")?;
        }
        writeln!(out, "}}")
    }
}

fn node_elem<D: Dimension, E: Spatial + Clone>(
    tree: &NodeTree<D, E>,
    node: NodeRef<'_, D, E>,
) -> DotElem {
    match node.parent().and_then(|p| tree.node(p)) {
        None => DotElem {
            name: "root".to_string(),
            label: "root".to_string(),
        },
        Some(parent) => DotElem {
            name: format!("node_{}_{}_{}", parent.index(), node.depth(), node.index()),
            label: format!("node_{}_{}", node.depth(), node.index()),
        },
    }
}
