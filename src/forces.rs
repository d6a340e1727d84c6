//! Member force recovery from the solved displacement field.

use indexmap::IndexMap;
use nalgebra::DVector;
use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::dof::DofOrder;
use crate::network::SpringNetwork;

/// Response of a single spring.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MemberForce {
    /// Displacement of the `from` node.
    pub u_i: f64,
    /// Displacement of the `to` node.
    pub u_j: f64,
    /// Elongation `u_j - u_i`.
    pub delta: f64,
    /// Internal force `k * delta`, positive in tension.
    pub internal_force: f64,
}

impl MemberForce {
    /// Evaluate the response of a spring of stiffness `k` from its end displacements.
    #[must_use]
    pub fn from_displacements(k: f64, u_i: f64, u_j: f64) -> Self {
        let delta = u_j - u_i;
        Self {
            u_i,
            u_j,
            delta,
            internal_force: k * delta,
        }
    }

    /// Whether the spring is stretched.
    #[must_use]
    pub fn is_tension(&self) -> bool {
        self.internal_force > 0.0
    }
}

/// Compute the member force of every spring keyed by spring id, in insertion order.
///
/// `displacements` is the global solved vector in the layout of `order`.
#[must_use]
pub(crate) fn evaluate_member_forces(
    network: &SpringNetwork,
    order: &DofOrder,
    displacements: &DVector<f64>,
) -> IndexMap<String, MemberForce> {
    network
        .springs()
        .map(|edge| {
            let u_i = displacements[order.position(edge.source())];
            let u_j = displacements[order.position(edge.target())];
            let spring = edge.weight();
            (
                spring.id().to_owned(),
                MemberForce::from_displacements(spring.stiffness(), u_i, u_j),
            )
        })
        .collect()
}
