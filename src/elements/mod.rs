//! Element kinds and their shared contract
//!
//! Every element exposes its artifacts through the [`Element`] trait so a
//! heterogeneous mesh can be assembled through one interface. The per-element
//! DOF ordering is always 6 per node in the local frame:
//! `ux, uy, uz, rx, ry, rz`. Elements whose native formulation carries fewer
//! DOFs (the axial link, the membranes) scatter their native blocks into this
//! layout; the remaining rows and columns stay identically zero.

mod beam;
mod link;
mod material;
mod membrane3;
mod membrane4;
mod node;
mod plate4;
mod section;

pub use beam::{Beam, Releases};
pub use link::Link;
pub use material::Material;
pub use membrane3::Membrane3;
pub use membrane4::Membrane4;
pub use node::Node;
pub use plate4::Plate4;
pub use section::Section;

use std::sync::Arc;

use nalgebra::DVector;
use nalgebra_sparse::CsrMatrix;
use serde::{Deserialize, Serialize};

use crate::csys::CartesianFrame;

/// Number of DOFs carried per node in the exposed layout
pub const NODE_DOF: usize = 6;

/// Mass matrix model for line elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MassModel {
    /// Concentrated mass on the diagonal
    #[default]
    Lumped,
    /// Cubic-Hermite consistent mass matrix
    Consistent,
}

/// Common contract all element kinds satisfy.
///
/// Artifacts are computed eagerly at construction and owned by the element;
/// accessors borrow. None of the methods touch process-wide state or perform
/// I/O, so an assembler may evaluate elements in parallel.
pub trait Element {
    /// Stable element identity (caller-supplied or generated UUID)
    fn name(&self) -> &str;

    /// Dense integer id assigned by the assembler, if any
    fn id(&self) -> Option<usize>;

    /// Assign the dense integer id
    fn set_id(&mut self, id: usize);

    /// Geometric dimension: 1 for lines, 2 for surfaces
    fn dimension(&self) -> usize;

    /// Total DOF count of the exposed layout (12, 18, or 24)
    fn dof(&self) -> usize;

    /// Ordered node list
    fn nodes(&self) -> &[Arc<Node>];

    /// Local coordinate frame
    fn frame(&self) -> &CartesianFrame;

    /// Orthogonal block-diagonal local-to-global transformation T
    fn transform(&self) -> &CsrMatrix<f64>;

    /// Local stiffness matrix K_e (condensed form where applicable)
    fn stiffness(&self) -> &CsrMatrix<f64>;

    /// Local mass matrix M_e
    fn mass(&self) -> &CsrMatrix<f64>;

    /// Local nodal force vector r_e
    fn nodal_force(&self) -> &DVector<f64>;

    /// Total element mass in kg
    fn total_mass(&self) -> f64;
}
