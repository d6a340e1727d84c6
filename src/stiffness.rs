//! Local stiffness, global assembly and block partitioning.

use nalgebra::{DMatrix, Matrix2};
use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::dof::DofOrder;
use crate::network::SpringNetwork;

/// Local stiffness matrix of a spring with stiffness `k`.
///
/// Encodes `F = k (u_j - u_i)` for the end forces of the spring.
///
/// # Examples
/// ```
/// use springx::local_stiffness;
///
/// let local = local_stiffness(10.0);
/// assert_eq!(local[(0, 0)], 10.0);
/// assert_eq!(local[(0, 1)], -10.0);
/// ```
#[must_use]
pub fn local_stiffness(k: f64) -> Matrix2<f64> {
    Matrix2::new(k, -k, -k, k)
}

/// Assemble the global stiffness matrix for `network` in the layout of `order`.
///
/// Every spring's local matrix is scatter-added at its `[p_from, p_to]`
/// positions, so springs sharing a node accumulate on that diagonal entry.
#[must_use]
pub(crate) fn assemble_global(network: &SpringNetwork, order: &DofOrder) -> DMatrix<f64> {
    let dof = order.len();
    let mut matrix = DMatrix::zeros(dof, dof);
    for edge in network.springs() {
        let local = local_stiffness(edge.weight().stiffness());
        let dof_map = [order.position(edge.source()), order.position(edge.target())];
        for (row_local, &global_row) in dof_map.iter().enumerate() {
            for (col_local, &global_col) in dof_map.iter().enumerate() {
                matrix[(global_row, global_col)] += local[(row_local, col_local)];
            }
        }
    }
    matrix
}

/// The global stiffness matrix together with its restricted/unrestricted blocks.
///
/// ```text
/// | krr  kru |
/// | kur  kuu |
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StiffnessBlocks {
    /// Assembled `N x N` matrix.
    pub global: DMatrix<f64>,
    /// Restricted rows, restricted columns (`R x R`).
    pub krr: DMatrix<f64>,
    /// Restricted rows, unrestricted columns (`R x U`).
    pub kru: DMatrix<f64>,
    /// Unrestricted rows, restricted columns (`U x R`).
    pub kur: DMatrix<f64>,
    /// Unrestricted rows, unrestricted columns (`U x U`).
    pub kuu: DMatrix<f64>,
}

impl StiffnessBlocks {
    /// Split `global` at `restricted` rows and columns.
    ///
    /// Blocks are exact copies of the corresponding sub-matrices. `global` must
    /// be square with at least `restricted` rows.
    #[must_use]
    pub(crate) fn partition(global: DMatrix<f64>, restricted: usize) -> Self {
        assert!(global.is_square(), "stiffness matrix must be square");
        let n = global.nrows();
        assert!(restricted <= n, "restricted count exceeds matrix size");
        let u = n - restricted;
        let r = restricted;

        let krr = global.view((0, 0), (r, r)).into_owned();
        let kru = global.view((0, r), (r, u)).into_owned();
        let kur = global.view((r, 0), (u, r)).into_owned();
        let kuu = global.view((r, r), (u, u)).into_owned();

        Self {
            global,
            krr,
            kru,
            kur,
            kuu,
        }
    }

    /// Number of restricted degrees of freedom.
    #[must_use]
    pub fn restricted_count(&self) -> usize {
        self.krr.nrows()
    }

    /// Number of unrestricted degrees of freedom.
    #[must_use]
    pub fn unrestricted_count(&self) -> usize {
        self.kuu.nrows()
    }
}
