//! Path finding over a built EntityGraph.
//!
//! Traversal is a breadth-first search that keeps, for every node it
//! reaches, the shortest known path (`best_path`) and every path variant the
//! frontier produced along the way (`all_paths`).
//!
//! Only the first path to reach a node is extended further, so the number
//! of recorded paths is bounded by the number of edge endpoints visited
//! rather than by the number of simple paths in the graph.

use std::collections::{HashMap, VecDeque};

use petgraph::graph::NodeIndex;
use serde::Serialize;

use super::{EntityGraph, GraphError, GraphResult};
use crate::source::SourceAdapter;

/// Paths discovered to one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathRecord {
    best_path: Vec<String>,
    all_paths: Vec<Vec<String>>,
}

impl PathRecord {
    /// Shortest path, start to end inclusive.
    pub fn best_path(&self) -> &[String] {
        &self.best_path
    }

    /// Every distinct path discovered, in discovery order.
    pub fn all_paths(&self) -> &[Vec<String>] {
        &self.all_paths
    }

    /// Hops on the best path.
    pub fn hops(&self) -> usize {
        self.best_path.len().saturating_sub(1)
    }

    /// Whether `path` was discovered.
    pub fn contains_path(&self, path: &[&str]) -> bool {
        self.all_paths
            .iter()
            .any(|p| p.len() == path.len() && p.iter().zip(path).all(|(a, b)| a.as_str() == *b))
    }
}

/// Result of a start/end query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    Found(PathRecord),
    /// The end is not reachable from the start. Expected for disconnected
    /// graphs; not an error.
    NoPath { from: String, to: String },
}

impl PathOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, PathOutcome::Found(_))
    }

    pub fn record(&self) -> Option<&PathRecord> {
        match self {
            PathOutcome::Found(record) => Some(record),
            PathOutcome::NoPath { .. } => None,
        }
    }

    pub fn best_path(&self) -> Option<&[String]> {
        self.record().map(PathRecord::best_path)
    }
}

/// Path records of every node reachable from one start node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traversal {
    start: String,
    /// Reachable identifiers in visit order, the start first.
    order: Vec<String>,
    records: HashMap<String, PathRecord>,
}

impl Traversal {
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Path record for `identifier`, if it was reached.
    pub fn get(&self, identifier: &str) -> Option<&PathRecord> {
        self.records.get(identifier)
    }

    /// Reached identifiers in visit order, the start first.
    pub fn reachable(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of reached nodes, including the start.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Per-node bookkeeping while the frontier is open.
struct NodePaths {
    best: Vec<NodeIndex>,
    all: Vec<Vec<NodeIndex>>,
}

impl<S: SourceAdapter> EntityGraph<S> {
    /// Traverse from `start`, recording paths to every reachable node.
    pub fn traverse(&self, start: &str) -> GraphResult<Traversal> {
        if !self.built {
            return Err(GraphError::NotBuilt);
        }
        let start_idx = self.index_of(start)?;

        let mut visits: HashMap<NodeIndex, NodePaths> = HashMap::new();
        let mut order = vec![start_idx];
        let mut queue: VecDeque<Vec<NodeIndex>> = VecDeque::new();

        visits.insert(
            start_idx,
            NodePaths {
                best: vec![start_idx],
                all: vec![vec![start_idx]],
            },
        );
        queue.push_back(vec![start_idx]);

        while let Some(path) = queue.pop_front() {
            let Some(&current) = path.last() else {
                continue;
            };
            for neighbor in self.sorted_neighbors(current) {
                // Simple paths only.
                if path.contains(&neighbor) {
                    continue;
                }
                let mut next = path.clone();
                next.push(neighbor);

                match visits.get_mut(&neighbor) {
                    None => {
                        visits.insert(
                            neighbor,
                            NodePaths {
                                best: next.clone(),
                                all: vec![next.clone()],
                            },
                        );
                        order.push(neighbor);
                        queue.push_back(next);
                    }
                    Some(paths) => {
                        if !paths.all.contains(&next) {
                            // No longer than the current best: the latest shortest path wins ties.
                            if next.len() <= paths.best.len() {
                                paths.best = next.clone();
                            }
                            paths.all.push(next);
                        }
                    }
                }
            }
        }

        let records = visits
            .into_iter()
            .map(|(idx, paths)| {
                let record = PathRecord {
                    best_path: self.identifiers(&paths.best),
                    all_paths: paths.all.iter().map(|p| self.identifiers(p)).collect(),
                };
                (self.graph[idx].identifier().to_string(), record)
            })
            .collect();

        Ok(Traversal {
            start: start.to_string(),
            order: self.identifiers(&order),
            records,
        })
    }

    /// Shortest path and discovered alternatives from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Unknown identifiers and unbuilt graphs are errors; an unreachable
    /// `end` is [`PathOutcome::NoPath`].
    pub fn find_paths(&self, start: &str, end: &str) -> GraphResult<PathOutcome> {
        if !self.built {
            return Err(GraphError::NotBuilt);
        }
        self.index_of(end)?;
        let mut traversal = self.traverse(start)?;
        Ok(match traversal.records.remove(end) {
            Some(record) => PathOutcome::Found(record),
            None => PathOutcome::NoPath {
                from: start.to_string(),
                to: end.to_string(),
            },
        })
    }

    /// Only the shortest path, or `None` when unreachable.
    pub fn shortest_path(&self, start: &str, end: &str) -> GraphResult<Option<Vec<String>>> {
        Ok(match self.find_paths(start, end)? {
            PathOutcome::Found(record) => Some(record.best_path),
            PathOutcome::NoPath { .. } => None,
        })
    }

    /// Direct neighbors of an entity, in node insertion order.
    pub fn neighbors(&self, identifier: &str) -> GraphResult<Vec<&str>> {
        let idx = self.index_of(identifier)?;
        Ok(self
            .sorted_neighbors(idx)
            .into_iter()
            .map(|n| self.graph[n].identifier())
            .collect())
    }

    /// Entities reachable from `identifier`, excluding itself, in visit
    /// order.
    pub fn reachable(&self, identifier: &str) -> GraphResult<Vec<String>> {
        let traversal = self.traverse(identifier)?;
        Ok(traversal.order.into_iter().skip(1).collect())
    }

    /// Neighbors ordered by node index so traversal is deterministic.
    fn sorted_neighbors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors(idx).collect();
        neighbors.sort();
        neighbors.dedup();
        neighbors
    }

    fn identifiers(&self, path: &[NodeIndex]) -> Vec<String> {
        path.iter()
            .map(|&idx| self.graph[idx].identifier().to_string())
            .collect()
    }
}
