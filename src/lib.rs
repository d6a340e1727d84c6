#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

mod boundary;
mod description;
mod dof;
mod errors;
mod forces;
mod network;
mod solution;
mod solver;
mod stiffness;

pub use boundary::{BoundaryValue, BoundaryVectors};
pub use description::{network_from_json, NetworkDescription, NodeDescription, SpringDescription};
pub use dof::{DofEntry, DofOrder};
pub use errors::{AnalysisError, DescriptionError, Endpoint, ItemKind, NetworkEditError};
pub use forces::MemberForce;
pub use network::{Condition, Node, Spring, SpringNetwork};
pub use solution::{NodalVectors, Solution};
pub use solver::{solve, solve_partitioned, PartitionedSolution, SolverOptions};
pub use stiffness::{local_stiffness, StiffnessBlocks};

/// Re-export of the graph index types used to address nodes and springs.
pub use petgraph::graph::{EdgeIndex, NodeIndex};
