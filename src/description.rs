//! Plain-data description of a network, loadable from JSON.

use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::errors::{DescriptionError, NetworkEditError};
use crate::network::{Condition, SpringNetwork};

/// A node entry of a [`NetworkDescription`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    /// Unique node identifier.
    pub id: String,
    /// `true` when `value` is a prescribed displacement, `false` when it is an applied force.
    pub restricted: bool,
    /// Prescribed displacement or applied force.
    pub value: f64,
}

/// A spring entry of a [`NetworkDescription`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringDescription {
    /// Unique spring identifier.
    pub id: String,
    /// Identifier of the `from` node.
    pub from: String,
    /// Identifier of the `to` node.
    pub to: String,
    /// Stiffness `k`.
    pub stiffness: f64,
}

/// Serializable description of a spring network.
///
/// # Examples
/// ```
/// use springx::{NetworkDescription, SpringNetwork};
///
/// let json = r#"{
///     "nodes": [
///         { "id": "wall", "restricted": true, "value": 0.0 },
///         { "id": "tip", "restricted": false, "value": 2.0 }
///     ],
///     "springs": [{ "id": "s", "from": "wall", "to": "tip", "stiffness": 4.0 }]
/// }"#;
/// let description = NetworkDescription::from_json(json).expect("valid json");
/// let network = SpringNetwork::try_from(description).expect("valid network");
/// let solution = network.solve().expect("well posed");
/// assert_eq!(solution.node_displacement("tip"), Some(0.5));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescription {
    /// Nodes in DOF insertion order.
    #[serde(default)]
    pub nodes: Vec<NodeDescription>,
    /// Springs in evaluation order.
    #[serde(default)]
    pub springs: Vec<SpringDescription>,
}

impl NetworkDescription {
    /// Parse a description from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptionError::Parse`] when `json` is malformed.
    pub fn from_json(json: &str) -> Result<Self, DescriptionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Describe an existing network.
    #[must_use]
    pub fn from_network(network: &SpringNetwork) -> Self {
        let nodes = network
            .nodes()
            .map(|(_, node)| NodeDescription {
                id: node.id().to_owned(),
                restricted: node.is_restricted(),
                value: match node.condition() {
                    Condition::Restricted { displacement } => displacement,
                    Condition::Unrestricted { force } => force,
                },
            })
            .collect();
        let springs = network
            .springs()
            .map(|edge| SpringDescription {
                id: edge.weight().id().to_owned(),
                from: network.node_at(edge.source()).id().to_owned(),
                to: network.node_at(edge.target()).id().to_owned(),
                stiffness: edge.weight().stiffness(),
            })
            .collect();
        Self { nodes, springs }
    }

    /// Serialize the description as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl TryFrom<NetworkDescription> for SpringNetwork {
    type Error = NetworkEditError;

    fn try_from(description: NetworkDescription) -> Result<Self, Self::Error> {
        let mut network = SpringNetwork::new();
        for node in description.nodes {
            let condition = if node.restricted {
                Condition::Restricted {
                    displacement: node.value,
                }
            } else {
                Condition::Unrestricted { force: node.value }
            };
            network.add_node(node.id, condition)?;
        }
        for spring in description.springs {
            network.add_spring(&spring.from, &spring.to, spring.stiffness, spring.id)?;
        }
        Ok(network)
    }
}

/// Parse JSON text straight into a validated network.
///
/// # Errors
///
/// Returns [`DescriptionError::Parse`] for malformed JSON and
/// [`DescriptionError::Invalid`] when the described network is rejected.
pub fn network_from_json(json: &str) -> Result<SpringNetwork, DescriptionError> {
    let description = NetworkDescription::from_json(json)?;
    Ok(SpringNetwork::try_from(description)?)
}
