//! Boundary force and displacement vectors.

use std::fmt;

use nalgebra::DVector;
use serde::Serialize;

use crate::dof::DofOrder;
use crate::network::SpringNetwork;

/// Entry of a global boundary vector before solving.
///
/// The placeholders only label what the solve will produce; the solver itself
/// consumes the numeric halves in [`BoundaryVectors`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryValue {
    /// Prescribed value.
    Known(f64),
    /// Reaction force at a restricted node.
    UnknownReaction(String),
    /// Displacement of an unrestricted node.
    UnknownDisplacement(String),
}

impl BoundaryValue {
    /// The prescribed value, if known.
    #[must_use]
    pub fn known(&self) -> Option<f64> {
        match self {
            BoundaryValue::Known(value) => Some(*value),
            _ => None,
        }
    }

    /// The node an unknown placeholder stands for.
    #[must_use]
    pub fn node_id(&self) -> Option<&str> {
        match self {
            BoundaryValue::Known(_) => None,
            BoundaryValue::UnknownReaction(id) | BoundaryValue::UnknownDisplacement(id) => {
                Some(id)
            }
        }
    }
}

impl fmt::Display for BoundaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryValue::Known(value) => write!(f, "{value}"),
            BoundaryValue::UnknownReaction(id) => write!(f, "P_{id}"),
            BoundaryValue::UnknownDisplacement(id) => write!(f, "u_{id}"),
        }
    }
}

/// Global boundary vectors in the restricted-first layout.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoundaryVectors {
    /// Global force vector; reactions are placeholders.
    pub force: Vec<BoundaryValue>,
    /// Global displacement vector; free displacements are placeholders.
    pub displacement: Vec<BoundaryValue>,
    /// Applied forces at unrestricted nodes, `F_u` (length `U`).
    pub known_forces: DVector<f64>,
    /// Prescribed displacements at restricted nodes, `U_r` (length `R`).
    pub known_displacements: DVector<f64>,
}

impl BoundaryVectors {
    /// Build the boundary vectors of `network` in the layout of `order`.
    #[must_use]
    pub(crate) fn build(network: &SpringNetwork, order: &DofOrder) -> Self {
        let n = order.len();
        let r = order.restricted_count();
        let mut force = vec![BoundaryValue::Known(0.0); n];
        let mut displacement = vec![BoundaryValue::Known(0.0); n];
        let mut known_forces = DVector::zeros(n - r);
        let mut known_displacements = DVector::zeros(r);

        for (index, node) in network.nodes() {
            let position = order.position(index);
            if node.is_restricted() {
                force[position] = BoundaryValue::UnknownReaction(node.id().to_owned());
                displacement[position] = BoundaryValue::Known(node.displacement());
                known_displacements[position] = node.displacement();
            } else {
                force[position] = BoundaryValue::Known(node.force());
                displacement[position] = BoundaryValue::UnknownDisplacement(node.id().to_owned());
                known_forces[position - r] = node.force();
            }
        }

        Self {
            force,
            displacement,
            known_forces,
            known_displacements,
        }
    }
}
