//! Dependency graph management using petgraph.

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::error::{Error, Result};
use crate::registry::PackageRegistry;

/// Directed graph of package dependencies.
///
/// Built once from an immutable registry snapshot and queried by shared
/// reference; rebuilding after a manifest change means constructing a new
/// graph, never mutating this one.
///
/// Edges run from a package to each declared dependency that exists in the
/// registry; declared names with no registry entry are ignored, not errors.
/// Outgoing neighbors of a node are therefore its direct dependencies and
/// incoming neighbors its direct dependents, so the two relations cannot
/// drift apart.
#[derive(Debug)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    nodes: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Builds the graph from a registry snapshot.
    ///
    /// Nodes are inserted in registry (discovery) order, which `build_order`
    /// relies on for deterministic tie-breaking. Cycles are representable;
    /// they surface as an error from `build_order`, not here.
    pub fn build(registry: &PackageRegistry) -> Self {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::with_capacity(registry.len());

        for package in registry.packages() {
            let node = graph.add_node(package.name.clone());
            nodes.insert(package.name.clone(), node);
        }

        for package in registry.packages() {
            let from = nodes[&package.name];
            for dep_name in &package.dependencies {
                if let Some(&to) = nodes.get(dep_name.as_str()) {
                    // update_edge keeps a dependency declared twice from
                    // double-counting in the in-degree bookkeeping.
                    graph.update_edge(from, to, ());
                }
            }
        }

        Self { graph, nodes }
    }

    /// Whether `name` is a package in this graph.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Number of packages in the graph.
    #[inline]
    pub fn package_count(&self) -> usize {
        self.graph.node_count()
    }

    fn node(&self, name: &str) -> Result<NodeIndex> {
        self.nodes
            .get(name)
            .copied()
            .ok_or_else(|| Error::PackageNotFound {
                name: name.to_string(),
                available: self.known_names(),
            })
    }

    fn known_names(&self) -> String {
        let mut names: Vec<&str> = self.graph.node_weights().map(String::as_str).collect();
        names.sort_unstable();
        names.join(", ")
    }

    /// Returns the direct dependencies of a package, sorted by name.
    ///
    /// A package with no dependencies yields an empty vec, not an error.
    ///
    /// # Errors
    ///
    /// Returns `PackageNotFound` for a name absent from the graph.
    pub fn dependencies(&self, name: &str) -> Result<Vec<String>> {
        let node = self.node(name)?;
        let mut deps: Vec<String> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .map(|idx| self.graph[idx].clone())
            .collect();
        deps.sort_unstable();
        Ok(deps)
    }

    /// Returns the direct dependents of a package, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `PackageNotFound` for a name absent from the graph.
    pub fn dependents(&self, name: &str) -> Result<Vec<String>> {
        let node = self.node(name)?;
        let mut dependents: Vec<String> = self
            .graph
            .neighbors_directed(node, Direction::Incoming)
            .map(|idx| self.graph[idx].clone())
            .collect();
        dependents.sort_unstable();
        Ok(dependents)
    }

    /// Returns all transitive dependents of a package, excluding the
    /// package itself.
    ///
    /// A visited set guards against revisiting nodes in diamond-shaped
    /// dependency graphs, so each package is expanded at most once and the
    /// result is stable across calls.
    ///
    /// # Errors
    ///
    /// Returns `PackageNotFound` for a name absent from the graph.
    pub fn all_dependents(&self, name: &str) -> Result<BTreeSet<String>> {
        let start = self.node(name)?;
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut stack = vec![start];
        visited.insert(start);

        let mut result = BTreeSet::new();
        while let Some(current) = stack.pop() {
            for dependent in self.graph.neighbors_directed(current, Direction::Incoming) {
                if visited.insert(dependent) {
                    result.insert(self.graph[dependent].clone());
                    stack.push(dependent);
                }
            }
        }

        Ok(result)
    }

    /// Returns the given packages together with all their transitive
    /// dependents: the full set impacted when those packages change.
    ///
    /// # Errors
    ///
    /// Returns `PackageNotFound` if any seed package is absent.
    pub fn affected_packages(&self, changed: &[String]) -> Result<BTreeSet<String>> {
        let mut affected = BTreeSet::new();
        for name in changed {
            affected.extend(self.all_dependents(name)?);
            affected.insert(name.clone());
        }
        Ok(affected)
    }

    /// Computes a build order: every package appears after all packages it
    /// depends on.
    ///
    /// Kahn's algorithm; the ready set is keyed by discovery index, so ties
    /// among simultaneously-ready packages always break toward the package
    /// discovered first. Two calls on the same graph return identical
    /// sequences.
    ///
    /// A future parallel orchestrator may fan out independent packages, but
    /// must preserve the invariant that a package starts only after all of
    /// its direct dependencies completed successfully.
    ///
    /// # Errors
    ///
    /// Returns `CircularDependency` naming the packages left unordered when
    /// the dependency relation contains a cycle.
    pub fn build_order(&self) -> Result<Vec<String>> {
        let count = self.graph.node_count();

        // Node indices are assigned sequentially at construction, so a
        // node's index doubles as its discovery index.
        let mut in_degree: Vec<usize> = (0..count)
            .map(|i| {
                self.graph
                    .neighbors_directed(NodeIndex::new(i), Direction::Outgoing)
                    .count()
            })
            .collect();

        let mut ready: BTreeSet<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(i, _)| i)
            .collect();

        let mut order = Vec::with_capacity(count);
        let mut placed = vec![false; count];

        while let Some(i) = ready.pop_first() {
            let node = NodeIndex::new(i);
            placed[i] = true;
            order.push(self.graph[node].clone());

            for dependent in self.graph.neighbors_directed(node, Direction::Incoming) {
                let degree = &mut in_degree[dependent.index()];
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(dependent.index());
                }
            }
        }

        if order.len() != count {
            let mut leftover: Vec<&str> = placed
                .iter()
                .enumerate()
                .filter(|(_, placed)| !**placed)
                .map(|(i, _)| self.graph[NodeIndex::new(i)].as_str())
                .collect();
            leftover.sort_unstable();
            return Err(Error::CircularDependency(leftover.join(", ")));
        }

        Ok(order)
    }
}
