//! Error types produced while building or analysing spring networks.

use thiserror::Error;

/// Which end of a spring an identifier refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// The node the spring starts at (`u_i`).
    From,
    /// The node the spring ends at (`u_j`).
    To,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::From => f.write_str("from"),
            Endpoint::To => f.write_str("to"),
        }
    }
}

/// Whether an identifier names a node or a spring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    /// A node of the network.
    Node,
    /// A spring connecting two nodes.
    Spring,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Node => f.write_str("node"),
            ItemKind::Spring => f.write_str("spring"),
        }
    }
}

/// Error returned when editing a [`SpringNetwork`](crate::SpringNetwork) with invalid input.
///
/// # Examples
///
/// ```
/// use springx::{NetworkEditError, SpringNetwork};
///
/// let mut network = SpringNetwork::new();
/// network.add_restricted_node(0.0, "v1").expect("first node accepted");
/// let error = network
///     .add_unrestricted_node(5.0, "v1")
///     .expect_err("reused id is rejected");
/// assert!(matches!(error, NetworkEditError::DuplicateIdentifier { .. }));
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
pub enum NetworkEditError {
    /// Returned when a node or spring is declared with an empty identifier.
    #[error("{kind} identifier must not be empty")]
    EmptyIdentifier {
        /// Kind of item being declared.
        kind: ItemKind,
    },
    /// Returned when a node or spring identifier is already in use.
    #[error("the {kind} id {id:?} already exists")]
    DuplicateIdentifier {
        /// Kind of item being declared.
        kind: ItemKind,
        /// The reused identifier.
        id: String,
    },
    /// Returned when a spring names an endpoint that is not part of the network.
    #[error("spring {spring:?} references unknown {endpoint} node {node:?}")]
    UnknownReference {
        /// Identifier of the spring being declared.
        spring: String,
        /// Which endpoint could not be resolved.
        endpoint: Endpoint,
        /// The unresolved node identifier.
        node: String,
    },
    /// Returned when both ends of a spring are the same node.
    #[error("spring {spring:?} connects node {node:?} to itself")]
    SelfLoop {
        /// Identifier of the spring being declared.
        spring: String,
        /// The node used for both ends.
        node: String,
    },
    /// Returned when the spring stiffness is zero, negative or not finite.
    #[error("spring {spring:?} stiffness must be positive and finite (received {stiffness})")]
    NonPositiveStiffness {
        /// Identifier of the spring being declared.
        spring: String,
        /// Rejected stiffness.
        stiffness: f64,
    },
    /// Returned when a prescribed force or displacement is NaN or infinite.
    #[error("node {node:?} value must be finite (received {value})")]
    NonFiniteValue {
        /// Identifier of the node being declared.
        node: String,
        /// Rejected boundary value.
        value: f64,
    },
}

/// Error returned when a spring network analysis fails.
///
/// A failed analysis never publishes a partial [`Solution`](crate::Solution).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Returned when the network has no nodes to analyse.
    #[error("network has no nodes")]
    EmptyNetwork,
    /// Returned when the unrestricted stiffness block cannot be inverted.
    #[error(
        "unrestricted stiffness block is singular (pivot {pivot:e} <= {threshold:e}); \
         check supports and connectivity"
    )]
    IllPosedSystem {
        /// Smallest pivot magnitude found while factorising the block.
        pivot: f64,
        /// Threshold below which a pivot is treated as zero.
        threshold: f64,
    },
    /// Returned when the solve produced NaN or infinite values.
    #[error("solved {quantity} is not finite at node {node:?}")]
    NonFiniteResult {
        /// The quantity that degenerated, either `displacement` or `reaction`.
        quantity: &'static str,
        /// Identifier of the affected node.
        node: String,
    },
}

/// Error returned when a [`NetworkDescription`](crate::NetworkDescription) cannot be loaded.
#[derive(Debug, Error)]
pub enum DescriptionError {
    /// Returned when the JSON text is malformed or does not match the schema.
    #[error("failed to parse network description: {0}")]
    Parse(#[from] serde_json::Error),
    /// Returned when the description is well formed but describes an invalid network.
    #[error("invalid network description: {0}")]
    Invalid(#[from] NetworkEditError),
}
