//! Partitioned solve and the end-to-end analysis pipeline.

use log::{debug, trace, warn};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::boundary::{BoundaryValue, BoundaryVectors};
use crate::dof::DofOrder;
use crate::errors::AnalysisError;
use crate::forces::evaluate_member_forces;
use crate::network::SpringNetwork;
use crate::solution::{NodalVectors, Solution};
use crate::stiffness::{assemble_global, StiffnessBlocks};

/// Numerical settings for the partitioned solve.
///
/// # Examples
/// ```
/// use springx::SolverOptions;
///
/// let options = SolverOptions::default().with_pivot_tolerance(1.0e-9);
/// assert_eq!(options.pivot_tolerance, 1.0e-9);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Relative pivot magnitude below which `kuu` is treated as singular.
    ///
    /// The absolute threshold is `pivot_tolerance * max|kuu_ij|`, so it scales
    /// with the stiffness units.
    pub pivot_tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            pivot_tolerance: 1.0e-12,
        }
    }
}

impl SolverOptions {
    /// Replace the relative pivot tolerance.
    #[must_use]
    pub fn with_pivot_tolerance(mut self, pivot_tolerance: f64) -> Self {
        self.pivot_tolerance = pivot_tolerance;
        self
    }
}

/// Unknowns produced by the block elimination.
#[derive(Clone, Debug, PartialEq)]
pub struct PartitionedSolution {
    /// Displacements of the unrestricted nodes, `U_u` (length `U`).
    pub displacements: DVector<f64>,
    /// Reaction forces at the restricted nodes, `F_r` (length `R`).
    pub reactions: DVector<f64>,
}

/// Solve the partitioned system for the unknown displacements and reactions.
///
/// ```text
/// U_u = kuu^-1 (F_u - kur U_r)
/// F_r = krr U_r + kru U_u
/// ```
///
/// # Errors
///
/// Returns [`AnalysisError::IllPosedSystem`] when `kuu` has a pivot at or below
/// the threshold configured in `options` and [`AnalysisError::NonFiniteResult`]
/// when a solved displacement or reaction is NaN or infinite.
pub fn solve_partitioned(
    stiffness: &StiffnessBlocks,
    boundary: &BoundaryVectors,
    options: &SolverOptions,
) -> Result<PartitionedSolution, AnalysisError> {
    let known_displacements = &boundary.known_displacements;
    let displacements = if stiffness.kuu.is_empty() {
        DVector::zeros(0)
    } else {
        let threshold = options.pivot_tolerance * stiffness.kuu.amax();
        let lu = stiffness.kuu.clone().lu();
        let pivot = lu
            .u()
            .diagonal()
            .iter()
            .fold(f64::INFINITY, |smallest, value| smallest.min(value.abs()));
        trace!("kuu smallest pivot {pivot:e}, threshold {threshold:e}");
        if pivot <= threshold || threshold.is_nan() {
            warn!("rejecting singular kuu: pivot {pivot:e} <= {threshold:e}");
            return Err(AnalysisError::IllPosedSystem { pivot, threshold });
        }
        let rhs = &boundary.known_forces - &stiffness.kur * known_displacements;
        lu.solve(&rhs)
            .ok_or(AnalysisError::IllPosedSystem { pivot, threshold })?
    };
    let reactions = &stiffness.krr * known_displacements + &stiffness.kru * &displacements;

    let r = stiffness.restricted_count();
    ensure_finite(&displacements, &boundary.displacement, r, "displacement")?;
    ensure_finite(&reactions, &boundary.force, 0, "reaction")?;
    Ok(PartitionedSolution {
        displacements,
        reactions,
    })
}

/// Run the full analysis pipeline on `network`.
///
/// The stages run in a fixed order: DOF ordering, assembly, partitioning,
/// boundary vectors, partitioned solve and member force recovery. No result
/// is produced unless every stage succeeds.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyNetwork`] for a network without nodes,
/// [`AnalysisError::IllPosedSystem`] when the free nodes are under-constrained
/// and [`AnalysisError::NonFiniteResult`] when the solve overflows.
///
/// # Examples
/// ```
/// use springx::{solve, SolverOptions, SpringNetwork};
///
/// let mut network = SpringNetwork::new();
/// network.add_restricted_node(0.0, "wall").expect("node accepted");
/// network.add_unrestricted_node(10.0, "tip").expect("node accepted");
/// network.add_spring("wall", "tip", 100.0, "s").expect("spring accepted");
///
/// let solution = solve(&network, &SolverOptions::default()).expect("well-posed network");
/// assert!((solution.node_displacement("tip").expect("tip solved") - 0.1).abs() < 1.0e-12);
/// assert!((solution.node_force("wall").expect("wall solved") + 10.0).abs() < 1.0e-12);
/// ```
pub fn solve(network: &SpringNetwork, options: &SolverOptions) -> Result<Solution, AnalysisError> {
    if network.node_count() == 0 {
        return Err(AnalysisError::EmptyNetwork);
    }

    let order = DofOrder::assign(network);
    debug!(
        "ordered {} degrees of freedom ({} restricted, {} unrestricted)",
        order.len(),
        order.restricted_count(),
        order.unrestricted_count()
    );

    let global = assemble_global(network, &order);
    debug!("assembled {} springs into global stiffness", network.spring_count());
    trace!("global stiffness matrix: {global}");

    let stiffness = StiffnessBlocks::partition(global, order.restricted_count());
    let boundary = BoundaryVectors::build(network, &order);

    let partitioned = solve_partitioned(&stiffness, &boundary, options)?;
    debug!("solved partitioned system");

    let displacements = NodalVectors::from_halves(
        boundary.known_displacements.clone(),
        partitioned.displacements,
    );
    let forces = NodalVectors::from_halves(partitioned.reactions, boundary.known_forces.clone());
    let member_forces = evaluate_member_forces(network, &order, &displacements.global);
    debug!("recovered {} member forces", member_forces.len());

    Ok(Solution::new(
        order,
        stiffness,
        boundary,
        displacements,
        forces,
        member_forces,
    ))
}

/// Reject NaN or infinite unknowns instead of publishing them.
///
/// `labels` is the global boundary vector the unknowns belong to and
/// `offset` the global position of the first entry of `values`.
fn ensure_finite(
    values: &DVector<f64>,
    labels: &[BoundaryValue],
    offset: usize,
    quantity: &'static str,
) -> Result<(), AnalysisError> {
    match values.iter().position(|value| !value.is_finite()) {
        None => Ok(()),
        Some(index) => {
            let position = offset + index;
            let node = labels
                .get(position)
                .and_then(BoundaryValue::node_id)
                .map_or_else(|| format!("#{position}"), str::to_owned);
            Err(AnalysisError::NonFiniteResult { quantity, node })
        }
    }
}
