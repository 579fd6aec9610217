//! Graph construction.
//!
//! ```text
//! list_entities ─► nodes
//! defined_edges ─► schema edges            (authoritative)
//! passes        ─► inferred keys merged    (never downgrade schema)
//! samples       ─► cardinality per edge    (estimate)
//! ```

use petgraph::graph::EdgeIndex;

use super::{EntityGraph, GraphResult};
use crate::model::{Cardinality, EdgeOrigin};
use crate::semantic::inference::{BuildReport, SkipReason, CARDINALITY_PASS};
use crate::source::{DefinedEdge, SourceAdapter};

/// Name under which declared relationships are recorded.
const SCHEMA_RULE: &str = "schema";

impl<S: SourceAdapter> EntityGraph<S> {
    /// Build the graph from the source. Runs at most once per graph.
    ///
    /// Entities and declared relationships are fetched before anything is
    /// added, so an adapter failure leaves the graph empty and unbuilt.
    /// Heuristic failures on individual pairs never fail the build; they
    /// are returned in the [`BuildReport`].
    pub fn build(&mut self) -> GraphResult<&BuildReport> {
        if self.built {
            tracing::debug!(source = %self.source.name(), "graph already built");
            return Ok(&self.report);
        }

        tracing::info!(source = %self.source.name(), shape = ?self.source.shape(), "building entity graph");
        let entities = self.source.list_entities()?.to_vec();
        let defined = self.source.defined_edges()?.to_vec();

        let mut report = BuildReport::default();
        for entity in entities {
            self.add_node(entity);
        }
        self.ingest_defined_edges(&defined, &mut report);
        self.infer_edges(&mut report);
        self.classify_edges(&mut report);

        report.nodes = self.graph.node_count();
        report.schema_edges = self.edges().filter(|e| e.is_schema()).count();
        report.inferred_edges = self.graph.edge_count() - report.schema_edges;
        report.classified_edges = self.edges().filter(|e| e.cardinality().is_some()).count();

        tracing::info!(
            source = %self.source.name(),
            nodes = report.nodes,
            schema_edges = report.schema_edges,
            inferred_edges = report.inferred_edges,
            skipped = report.diagnostics.len(),
            "entity graph built"
        );

        self.report = report;
        self.built = true;
        Ok(&self.report)
    }

    /// Add declared relationships as schema edges.
    ///
    /// The referenced side's key is the column the catalog names, else the
    /// referenced entity's identity column.
    fn ingest_defined_edges(&mut self, defined: &[DefinedEdge], report: &mut BuildReport) {
        for declared in defined {
            let (Some(&from), Some(&to)) = (
                self.node_indices.get(&declared.referencing),
                self.node_indices.get(&declared.referenced),
            ) else {
                let missing = if self.has_entity(&declared.referencing) {
                    &declared.referenced
                } else {
                    &declared.referencing
                };
                report.skip(
                    SCHEMA_RULE,
                    &declared.referencing,
                    Some(declared.referenced.as_str()),
                    SkipReason::UnknownEntity {
                        identifier: missing.clone(),
                    },
                );
                continue;
            };
            if from == to {
                tracing::debug!(entity = %declared.referencing, column = %declared.column, "skipping self-reference");
                continue;
            }

            let referenced_column = declared
                .referenced_column
                .clone()
                .unwrap_or_else(|| self.graph[to].identity_column().to_string());
            let idx = self.upsert_edge(from, to, EdgeOrigin::Schema);
            self.graph[idx].merge_keys(
                EdgeOrigin::Schema,
                SCHEMA_RULE,
                [
                    (declared.referencing.clone(), declared.column.clone()),
                    (declared.referenced.clone(), referenced_column),
                ],
            );
        }
    }

    /// Run the engine's passes and merge their proposals.
    fn infer_edges(&mut self, report: &mut BuildReport) {
        let proposals = {
            let entities: Vec<_> = self.graph.node_weights().collect();
            self.engine
                .propose_edges(self.source.shape(), &entities, report)
        };

        for proposal in proposals {
            let (Some(&a), Some(&b)) = (
                self.node_indices.get(&proposal.left),
                self.node_indices.get(&proposal.right),
            ) else {
                continue;
            };
            let idx = self.upsert_edge(a, b, EdgeOrigin::Inferred);
            self.graph[idx].merge_keys(EdgeOrigin::Inferred, proposal.rule, proposal.keys);
        }
    }

    /// Classify every edge whose join columns are known.
    fn classify_edges(&mut self, report: &mut BuildReport) {
        let results: Vec<(EdgeIndex, Result<Option<Cardinality>, SkipReason>)> = self
            .graph
            .edge_indices()
            .map(|idx| {
                let edge = &self.graph[idx];
                let outcome = match (self.entity(edge.left()), self.entity(edge.right())) {
                    (Some(left), Some(right)) => {
                        self.engine.classify_edge(&self.source, left, right, edge)
                    }
                    _ => Err(SkipReason::UnknownEntity {
                        identifier: edge.left().to_string(),
                    }),
                };
                (idx, outcome)
            })
            .collect();

        for (idx, outcome) in results {
            match outcome {
                Ok(Some(cardinality)) => {
                    tracing::debug!(
                        left = %self.graph[idx].left(),
                        right = %self.graph[idx].right(),
                        cardinality = %cardinality,
                        "classified edge"
                    );
                    self.graph[idx].set_cardinality(cardinality);
                }
                Ok(None) => {}
                Err(reason) => {
                    let edge = &self.graph[idx];
                    report.skip(CARDINALITY_PASS, edge.left(), Some(edge.right()), reason);
                }
            }
        }
    }
}
