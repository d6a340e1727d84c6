//! Immutable snapshot of a completed analysis.

use indexmap::IndexMap;
use nalgebra::DVector;
use serde::Serialize;

use crate::boundary::BoundaryVectors;
use crate::dof::DofOrder;
use crate::forces::MemberForce;
use crate::stiffness::StiffnessBlocks;

/// A global nodal vector alongside its restricted and unrestricted halves.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodalVectors {
    /// Full vector of length `N` in the restricted-first layout.
    pub global: DVector<f64>,
    /// Entries for restricted nodes (length `R`).
    pub restricted: DVector<f64>,
    /// Entries for unrestricted nodes (length `U`).
    pub unrestricted: DVector<f64>,
}

impl NodalVectors {
    /// Join a restricted and an unrestricted half into a global vector.
    #[must_use]
    pub fn from_halves(restricted: DVector<f64>, unrestricted: DVector<f64>) -> Self {
        let r = restricted.len();
        let mut global = DVector::zeros(r + unrestricted.len());
        global.rows_mut(0, r).copy_from(&restricted);
        global.rows_mut(r, unrestricted.len()).copy_from(&unrestricted);
        Self {
            global,
            restricted,
            unrestricted,
        }
    }
}

/// Result of analysing a [`SpringNetwork`](crate::SpringNetwork).
///
/// Every unknown is resolved: displacements hold both prescribed and solved
/// values, forces hold both applied loads and reactions.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Solution {
    /// Degree-of-freedom layout shared by every vector and matrix.
    order: DofOrder,
    /// Global stiffness matrix and its blocks.
    stiffness: StiffnessBlocks,
    /// Boundary vectors as they stood before solving.
    boundary: BoundaryVectors,
    /// Solved nodal displacements.
    displacements: NodalVectors,
    /// Solved nodal forces.
    forces: NodalVectors,
    /// Member response keyed by spring id.
    member_forces: IndexMap<String, MemberForce>,
}

impl Solution {
    /// Bundle the outputs of every pipeline stage.
    pub(crate) fn new(
        order: DofOrder,
        stiffness: StiffnessBlocks,
        boundary: BoundaryVectors,
        displacements: NodalVectors,
        forces: NodalVectors,
        member_forces: IndexMap<String, MemberForce>,
    ) -> Self {
        Self {
            order,
            stiffness,
            boundary,
            displacements,
            forces,
            member_forces,
        }
    }

    /// The degree-of-freedom layout.
    #[must_use]
    pub fn dof_order(&self) -> &DofOrder {
        &self.order
    }

    /// The global stiffness matrix and its blocks.
    #[must_use]
    pub fn stiffness(&self) -> &StiffnessBlocks {
        &self.stiffness
    }

    /// Boundary vectors with their unknown placeholders.
    #[must_use]
    pub fn boundary(&self) -> &BoundaryVectors {
        &self.boundary
    }

    /// Solved displacement vectors.
    #[must_use]
    pub fn displacements(&self) -> &NodalVectors {
        &self.displacements
    }

    /// Solved force vectors.
    #[must_use]
    pub fn forces(&self) -> &NodalVectors {
        &self.forces
    }

    /// Member response of every spring in insertion order.
    #[must_use]
    pub fn member_forces(&self) -> &IndexMap<String, MemberForce> {
        &self.member_forces
    }

    /// Member response of a single spring.
    #[must_use]
    pub fn member_force(&self, id: &str) -> Option<&MemberForce> {
        self.member_forces.get(id)
    }

    /// Displacement of a node, prescribed or solved.
    #[must_use]
    pub fn node_displacement(&self, id: &str) -> Option<f64> {
        self.order
            .get(id)
            .map(|entry| self.displacements.global[entry.position])
    }

    /// Force at a node, applied load or reaction.
    #[must_use]
    pub fn node_force(&self, id: &str) -> Option<f64> {
        self.order
            .get(id)
            .map(|entry| self.forces.global[entry.position])
    }

    /// Residual `K U - F` of the solved system.
    #[must_use]
    pub fn residual(&self) -> DVector<f64> {
        &self.stiffness.global * &self.displacements.global - &self.forces.global
    }

    /// Sum of applied loads and reactions, zero for a system in equilibrium.
    #[must_use]
    pub fn equilibrium_imbalance(&self) -> f64 {
        self.forces.global.sum()
    }

    /// Serialize the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
