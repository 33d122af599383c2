//! fe-elements - per-element finite element kernels
//!
//! This library computes, for each supported element kind, the four artifacts
//! a global assembler needs: the local stiffness matrix `K_e`, the local mass
//! matrix `M_e`, the nodal force vector `r_e`, and the local-to-global
//! transformation `T`. Supported kinds:
//! - [`Link`](elements::Link): axial bar in the 12-DOF line layout
//! - [`Beam`](elements::Beam): 3D Euler-Bernoulli beam with end releases and
//!   static condensation
//! - [`Membrane3`](elements::Membrane3): constant-strain triangle (18 DOF)
//! - [`Membrane4`](elements::Membrane4): isoparametric quadrilateral membrane
//!   (24 DOF)
//! - [`Plate4`](elements::Plate4): DKQ thin-plate bending quadrilateral with
//!   drilling DOFs (24 DOF)
//!
//! Global assembly, boundary conditions, and solving are left to the caller;
//! every element exposes the same borrow-based accessors so heterogeneous
//! meshes can be assembled through one interface.
//!
//! ## Example
//! ```
//! use std::sync::Arc;
//! use fe_elements::prelude::*;
//!
//! let node_i = Arc::new(Node::new("N1", 0.0, 0.0, 0.0));
//! let node_j = Arc::new(Node::new("N2", 1.0, 0.0, 0.0));
//!
//! let steel = Material::isotropic(200e9, 0.3, 7850.0)?;
//! let section = Section::new(1e-3, 1e-6, 1e-6, 2e-6)?;
//!
//! let mut beam = Beam::new(node_i, node_j, &steel, &section, MassModel::Lumped)?;
//! assert_eq!(beam.dof(), 12);
//!
//! // Release the moment about local 3 at the far end and recondense.
//! let mut releases = [false; 12];
//! releases[11] = true;
//! beam.set_releases(&releases)?;
//! # Ok::<(), fe_elements::error::ElementError>(())
//! ```

pub mod csys;
pub mod elements;
pub mod error;
pub mod math;

// Re-export common types
pub mod prelude {
    pub use crate::csys::CartesianFrame;
    pub use crate::elements::{
        Beam, Element, Link, MassModel, Material, Membrane3, Membrane4, Node, Plate4, Releases,
        Section,
    };
    pub use crate::error::{ElementError, ElementResult};
}
