//! Node and spring registry that feeds the stiffness pipeline.

use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, EdgeReference, Graph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::errors::{AnalysisError, Endpoint, ItemKind, NetworkEditError};
use crate::solution::Solution;
use crate::solver::{self, SolverOptions};

/// Boundary condition carried by a node.
///
/// Exactly one of force or displacement is prescribed; the other is the
/// unknown the analysis solves for.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Support with a prescribed displacement. Its reaction force is unknown.
    Restricted {
        /// Prescribed displacement.
        displacement: f64,
    },
    /// Free node with a prescribed applied force. Its displacement is unknown.
    Unrestricted {
        /// Applied force.
        force: f64,
    },
}

/// A node of a spring network.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    /// Unique identifier of the node.
    id: String,
    /// Prescribed boundary condition.
    condition: Condition,
}

impl Node {
    /// Identifier of the node.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Boundary condition of the node.
    #[must_use]
    pub fn condition(&self) -> Condition {
        self.condition
    }

    /// Whether the node is a support with a prescribed displacement.
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        matches!(self.condition, Condition::Restricted { .. })
    }

    /// Applied force, zero for restricted nodes.
    #[must_use]
    pub fn force(&self) -> f64 {
        match self.condition {
            Condition::Restricted { .. } => 0.0,
            Condition::Unrestricted { force } => force,
        }
    }

    /// Prescribed displacement, zero for unrestricted nodes.
    #[must_use]
    pub fn displacement(&self) -> f64 {
        match self.condition {
            Condition::Restricted { displacement } => displacement,
            Condition::Unrestricted { .. } => 0.0,
        }
    }
}

/// A linear spring connecting two nodes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Spring {
    /// Unique identifier of the spring.
    id: String,
    /// Axial stiffness, strictly positive.
    stiffness: f64,
}

impl Spring {
    /// Identifier of the spring.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Stiffness `k` of the spring.
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }
}

/// Container for a one-dimensional spring network.
///
/// Nodes and springs are stored in a directed graph whose indices are stable:
/// the network only grows, so a [`NodeIndex`] always refers to the node it
/// was returned for. Springs point from their `from` node to their `to` node.
#[derive(Clone, Debug, Default)]
pub struct SpringNetwork {
    /// Underlying graph storage for nodes and springs.
    graph: Graph<Node, Spring>,
    /// Lookup from node identifier to graph index.
    node_ids: HashMap<String, NodeIndex>,
    /// Lookup from spring identifier to graph index.
    spring_ids: HashMap<String, EdgeIndex>,
}

impl SpringNetwork {
    /// Create an empty network.
    ///
    /// # Examples
    /// ```
    /// use springx::SpringNetwork;
    ///
    /// let network = SpringNetwork::new();
    /// assert_eq!(network.node_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the number of nodes in the network.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of springs in the network.
    #[must_use]
    pub fn spring_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Return the number of nodes with a prescribed displacement.
    #[must_use]
    pub fn restricted_count(&self) -> usize {
        self.graph
            .node_weights()
            .filter(|node| node.is_restricted())
            .count()
    }

    /// Return the number of nodes with a prescribed force.
    #[must_use]
    pub fn unrestricted_count(&self) -> usize {
        self.node_count() - self.restricted_count()
    }

    /// Add a support node with a prescribed displacement.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkEditError`] when `id` is empty or already used, or when
    /// `displacement` is not finite.
    pub fn add_restricted_node(
        &mut self,
        displacement: f64,
        id: impl Into<String>,
    ) -> Result<NodeIndex, NetworkEditError> {
        self.add_node(id.into(), Condition::Restricted { displacement })
    }

    /// Add a free node loaded by an applied force.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkEditError`] when `id` is empty or already used, or when
    /// `force` is not finite.
    ///
    /// # Examples
    /// ```
    /// use springx::SpringNetwork;
    ///
    /// let mut network = SpringNetwork::new();
    /// let node = network.add_unrestricted_node(-4.0, "v2").expect("node accepted");
    /// assert_eq!(node.index(), 0);
    /// assert_eq!(network.node("v2").map(|node| node.force()), Some(-4.0));
    /// ```
    pub fn add_unrestricted_node(
        &mut self,
        force: f64,
        id: impl Into<String>,
    ) -> Result<NodeIndex, NetworkEditError> {
        self.add_node(id.into(), Condition::Unrestricted { force })
    }

    /// Add a node with an explicit boundary condition.
    ///
    /// # Errors
    ///
    /// See [`SpringNetwork::add_restricted_node`].
    pub fn add_node(
        &mut self,
        id: String,
        condition: Condition,
    ) -> Result<NodeIndex, NetworkEditError> {
        if id.is_empty() {
            return Err(NetworkEditError::EmptyIdentifier {
                kind: ItemKind::Node,
            });
        }
        if self.node_ids.contains_key(&id) {
            return Err(NetworkEditError::DuplicateIdentifier {
                kind: ItemKind::Node,
                id,
            });
        }
        let value = match condition {
            Condition::Restricted { displacement } => displacement,
            Condition::Unrestricted { force } => force,
        };
        if !value.is_finite() {
            return Err(NetworkEditError::NonFiniteValue { node: id, value });
        }
        let index = self.graph.add_node(Node {
            id: id.clone(),
            condition,
        });
        self.node_ids.insert(id, index);
        Ok(index)
    }

    /// Connect two existing nodes with a spring of stiffness `stiffness`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkEditError::UnknownReference`] when either endpoint is
    /// missing, [`NetworkEditError::SelfLoop`] when both endpoints are the same
    /// node and [`NetworkEditError::NonPositiveStiffness`] when `stiffness` is
    /// not strictly positive.
    ///
    /// # Examples
    /// ```
    /// use springx::{NetworkEditError, SpringNetwork};
    ///
    /// let mut network = SpringNetwork::new();
    /// network.add_restricted_node(0.0, "v1").expect("node accepted");
    /// let error = network
    ///     .add_spring("v1", "v9", 10.0, "e1")
    ///     .expect_err("missing endpoint rejected");
    /// assert!(matches!(error, NetworkEditError::UnknownReference { .. }));
    /// ```
    pub fn add_spring(
        &mut self,
        from: &str,
        to: &str,
        stiffness: f64,
        id: impl Into<String>,
    ) -> Result<EdgeIndex, NetworkEditError> {
        let id = id.into();
        if id.is_empty() {
            return Err(NetworkEditError::EmptyIdentifier {
                kind: ItemKind::Spring,
            });
        }
        if self.spring_ids.contains_key(&id) {
            return Err(NetworkEditError::DuplicateIdentifier {
                kind: ItemKind::Spring,
                id,
            });
        }
        let start = self.resolve(&id, from, Endpoint::From)?;
        let end = self.resolve(&id, to, Endpoint::To)?;
        if start == end {
            return Err(NetworkEditError::SelfLoop {
                spring: id,
                node: from.to_owned(),
            });
        }
        if !(stiffness.is_finite() && stiffness > 0.0) {
            return Err(NetworkEditError::NonPositiveStiffness {
                spring: id,
                stiffness,
            });
        }
        let index = self.graph.add_edge(
            start,
            end,
            Spring {
                id: id.clone(),
                stiffness,
            },
        );
        self.spring_ids.insert(id, index);
        Ok(index)
    }

    /// Look up an endpoint for a spring being declared.
    fn resolve(
        &self,
        spring: &str,
        node: &str,
        endpoint: Endpoint,
    ) -> Result<NodeIndex, NetworkEditError> {
        self.node_ids
            .get(node)
            .copied()
            .ok_or_else(|| NetworkEditError::UnknownReference {
                spring: spring.to_owned(),
                endpoint,
                node: node.to_owned(),
            })
    }

    /// Retrieve a node by identifier.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_ids.get(id).map(|&index| &self.graph[index])
    }

    /// Retrieve the graph index of a node.
    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_ids.get(id).copied()
    }

    /// Retrieve a node by graph index.
    pub(crate) fn node_at(&self, index: NodeIndex) -> &Node {
        &self.graph[index]
    }

    /// Retrieve a spring by identifier.
    #[must_use]
    pub fn spring(&self, id: &str) -> Option<&Spring> {
        self.spring_ids.get(id).map(|&index| &self.graph[index])
    }

    /// Retrieve the `(from, to)` node identifiers of a spring.
    #[must_use]
    pub fn spring_endpoints(&self, id: &str) -> Option<(&str, &str)> {
        let index = *self.spring_ids.get(id)?;
        let (start, end) = self.graph.edge_endpoints(index)?;
        Some((self.graph[start].id(), self.graph[end].id()))
    }

    /// Iterate over the nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &Node)> + '_ {
        self.graph
            .node_indices()
            .map(move |index| (index, &self.graph[index]))
    }

    /// Iterate over the springs in insertion order.
    ///
    /// Use [`petgraph::visit::EdgeRef`] to read the endpoints of each reference.
    pub fn springs(&self) -> impl Iterator<Item = EdgeReference<'_, Spring>> + '_ {
        self.graph.edge_references()
    }

    /// Analyse the network with default [`SolverOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when the network is empty or under-constrained.
    pub fn solve(&self) -> Result<Solution, AnalysisError> {
        self.solve_with(&SolverOptions::default())
    }

    /// Analyse the network with explicit solver options.
    ///
    /// Every call runs the full pipeline on a snapshot of the network and
    /// leaves the network untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when the network is empty or under-constrained.
    pub fn solve_with(&self, options: &SolverOptions) -> Result<Solution, AnalysisError> {
        solver::solve(self, options)
    }
}
