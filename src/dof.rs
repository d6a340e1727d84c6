//! Degree-of-freedom ordering.
//!
//! Restricted nodes are placed first so the global system splits into
//! contiguous blocks: positions `0..R` hold supports and `R..N` hold free
//! nodes. Within each group nodes keep their insertion order.

use indexmap::IndexMap;
use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::network::SpringNetwork;

/// Position of a single node in the global system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DofEntry {
    /// Whether the node has a prescribed displacement.
    pub is_restricted: bool,
    /// Row and column of the node in the global stiffness matrix.
    pub position: usize,
}

/// Mapping from node identifier to its global degree of freedom.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DofOrder {
    /// Entries keyed by node id, in node insertion order.
    entries: IndexMap<String, DofEntry>,
    /// Global position for each node, indexed by graph node index.
    #[serde(skip)]
    positions: Vec<usize>,
    /// Number of restricted nodes, `R`.
    restricted: usize,
}

impl DofOrder {
    /// Assign a global position to every node of `network`.
    ///
    /// The result depends only on the order in which nodes were added.
    ///
    /// # Examples
    /// ```
    /// use springx::{DofOrder, SpringNetwork};
    ///
    /// let mut network = SpringNetwork::new();
    /// network.add_unrestricted_node(5.0, "v1").expect("node accepted");
    /// network.add_restricted_node(0.0, "v4").expect("node accepted");
    /// let order = DofOrder::assign(&network);
    /// assert_eq!(order.get("v4").map(|entry| entry.position), Some(0));
    /// assert_eq!(order.get("v1").map(|entry| entry.position), Some(1));
    /// ```
    #[must_use]
    pub fn assign(network: &SpringNetwork) -> Self {
        let (restricted, unrestricted): (Vec<_>, Vec<_>) = network
            .nodes()
            .map(|(index, node)| (index, node.is_restricted()))
            .partition(|&(_, is_restricted)| is_restricted);

        let mut positions = vec![0; network.node_count()];
        for (position, &(index, _)) in restricted.iter().chain(&unrestricted).enumerate() {
            positions[index.index()] = position;
        }

        let entries = network
            .nodes()
            .map(|(index, node)| {
                (
                    node.id().to_owned(),
                    DofEntry {
                        is_restricted: node.is_restricted(),
                        position: positions[index.index()],
                    },
                )
            })
            .collect();

        Self {
            entries,
            positions,
            restricted: restricted.len(),
        }
    }

    /// Total number of degrees of freedom, `N`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the ordering holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of restricted degrees of freedom, `R`.
    #[must_use]
    pub fn restricted_count(&self) -> usize {
        self.restricted
    }

    /// Number of unrestricted degrees of freedom, `U = N - R`.
    #[must_use]
    pub fn unrestricted_count(&self) -> usize {
        self.len() - self.restricted
    }

    /// Look up the entry for a node identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<DofEntry> {
        self.entries.get(id).copied()
    }

    /// Iterate over `(node id, entry)` pairs in node insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, DofEntry)> + '_ {
        self.entries.iter().map(|(id, entry)| (id.as_str(), *entry))
    }

    /// Global position of a node of the network this ordering was built from.
    pub(crate) fn position(&self, node: NodeIndex) -> usize {
        self.positions[node.index()]
    }
}
