// src/dag/graph.rs

use std::collections::HashMap;
use std::sync::Arc;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::errors::{Result, UnibuildError};
use crate::task::{Task, TaskNode};

/// Snapshot of the nodes reachable from a set of roots.
///
/// Nodes are identified by their allocation, not their name, so two
/// distinct nodes with the same name stay distinct here.
///
/// Edge direction: dependency -> dependent. For `A.depend_on(B)` we add
/// edge B -> A.
#[derive(Debug)]
pub struct TaskGraph {
    graph: DiGraph<Task, ()>,
}

impl TaskGraph {
    pub fn from_roots(roots: &[Task]) -> Self {
        let mut graph: DiGraph<Task, ()> = DiGraph::new();
        let mut index: HashMap<*const TaskNode, NodeIndex> = HashMap::new();

        // First pass: every reachable node, once. Visited-set based, so this
        // terminates even if the graph contains a cycle.
        let mut stack: Vec<Task> = roots.to_vec();
        while let Some(task) = stack.pop() {
            let key = Arc::as_ptr(&task);
            if index.contains_key(&key) {
                continue;
            }
            stack.extend(task.dependencies());
            let idx = graph.add_node(task);
            index.insert(key, idx);
        }

        // Second pass: edges.
        let nodes: Vec<NodeIndex> = graph.node_indices().collect();
        for idx in nodes {
            let deps = graph[idx].dependencies();
            for dep in deps {
                if let Some(&dep_idx) = index.get(&Arc::as_ptr(&dep)) {
                    graph.add_edge(dep_idx, idx, ());
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "collected task graph"
        );

        Self { graph }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// All nodes, dependencies before their dependents.
    pub fn ordered(&self) -> Result<Vec<Task>> {
        match toposort(&self.graph, None) {
            Ok(order) => Ok(order
                .into_iter()
                .map(|idx| Arc::clone(&self.graph[idx]))
                .collect()),
            Err(cycle) => {
                let task = &self.graph[cycle.node_id()];
                Err(UnibuildError::CyclicDependency(task.name().to_string()))
            }
        }
    }
}

/// Every node reachable from `roots`, in dependency order.
pub fn collect(roots: &[Task]) -> Result<Vec<Task>> {
    TaskGraph::from_roots(roots).ordered()
}
