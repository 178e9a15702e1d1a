//! Dependency graph algorithms
//!
//! Nodes are component names, edges point from a dependent to each of its
//! providers. Nodes carry their registration index, which breaks ties so
//! the produced order is deterministic.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

/// Directed dependency graph over component names
#[derive(Debug, Default)]
pub(crate) struct DependencyGraph {
    /// `(registration index, name)` for every node
    nodes: Vec<(usize, &'static str)>,
    /// Providers of each node, deduplicated, in declaration order
    providers: HashMap<&'static str, Vec<&'static str>>,
}

impl DependencyGraph {
    pub(crate) fn add_node(&mut self, position: usize, name: &'static str) {
        self.nodes.push((position, name));
        self.providers.entry(name).or_default();
    }

    pub(crate) fn add_edge(&mut self, dependent: &'static str, provider: &'static str) {
        let providers = self.providers.entry(dependent).or_default();
        if !providers.contains(&provider) {
            providers.push(provider);
        }
    }

    fn sorted_nodes(&self) -> Vec<(usize, &'static str)> {
        let mut nodes = self.nodes.clone();
        nodes.sort_unstable();
        nodes
    }

    fn providers_of(&self, name: &str) -> &[&'static str] {
        self.providers.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// First cycle found by depth-first traversal, closed on the repeated node
    pub(crate) fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        fn visit(
            graph: &DependencyGraph,
            node: &'static str,
            marks: &mut HashMap<&'static str, Mark>,
            stack: &mut Vec<&'static str>,
        ) -> Option<Vec<String>> {
            match marks.get(node) {
                Some(Mark::Done) => return None,
                Some(Mark::Visiting) => {
                    let start = stack.iter().position(|n| *n == node).unwrap_or(0);
                    let mut path: Vec<String> =
                        stack[start..].iter().map(ToString::to_string).collect();
                    path.push(node.to_string());
                    return Some(path);
                }
                None => {}
            }

            marks.insert(node, Mark::Visiting);
            stack.push(node);
            for &provider in graph.providers_of(node) {
                if let Some(cycle) = visit(graph, provider, marks, stack) {
                    return Some(cycle);
                }
            }
            stack.pop();
            marks.insert(node, Mark::Done);
            None
        }

        let mut marks = HashMap::new();
        let mut stack = Vec::new();
        self.sorted_nodes()
            .into_iter()
            .find_map(|(_, node)| visit(self, node, &mut marks, &mut stack))
    }

    /// Providers before dependents; ties broken by registration index
    ///
    /// Must only be called on an acyclic graph; nodes on a cycle are omitted.
    pub(crate) fn topological_order(&self) -> Vec<&'static str> {
        let mut pending: HashMap<&'static str, usize> = HashMap::new();
        let mut dependents: HashMap<&'static str, BTreeSet<(usize, &'static str)>> =
            HashMap::new();
        for &(index, name) in &self.nodes {
            let providers = self.providers_of(name);
            pending.insert(name, providers.len());
            for &provider in providers {
                dependents.entry(provider).or_default().insert((index, name));
            }
        }

        let mut ready: BinaryHeap<Reverse<(usize, &'static str)>> = self
            .nodes
            .iter()
            .filter(|(_, name)| pending.get(name) == Some(&0))
            .map(|&node| Reverse(node))
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(Reverse((_, name))) = ready.pop() {
            order.push(name);
            for &(index, dependent) in dependents.get(name).into_iter().flatten() {
                if let Some(count) = pending.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push(Reverse((index, dependent)));
                    }
                }
            }
        }
        order
    }
}
