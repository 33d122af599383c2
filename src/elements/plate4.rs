//! Plate4 element - thin-plate bending quadrilateral with drilling DOFs
//!
//! Bending follows the DKQ formulation (see [`crate::math::plate`]). The
//! drilling rotations carry a weak relative-rotation penalty so the exposed
//! 24x24 stiffness has no spurious zero-energy columns while rigid in-plane
//! rotation stays force-free. In-plane membrane behaviour belongs to
//! [`Membrane4`](crate::elements::Membrane4); pairing the two on the same
//! corners yields a full shell.

use std::sync::Arc;

use log::trace;
use nalgebra::{DMatrix, DVector, Vector2};
use nalgebra_sparse::CsrMatrix;
use uuid::Uuid;

use crate::csys::CartesianFrame;
use crate::elements::{Element, Material, Node};
use crate::error::{ElementError, ElementResult};
use crate::math::{self, plate, surface};

/// Rows of the 24-DOF layout holding the bending DOFs (uz, rx, ry per
/// corner)
const SCATTER: [usize; 12] = [2, 3, 4, 8, 9, 10, 14, 15, 16, 20, 21, 22];

/// Rows of the 24-DOF layout holding the drilling rotations
const DRILLING: [usize; 4] = [5, 11, 17, 23];

/// Drilling penalty as a fraction of the smallest bending rotational
/// stiffness
const DRILLING_FACTOR: f64 = 1e-3;

/// A four-node thin-plate bending quadrilateral with drilling DOFs
#[derive(Debug, Clone)]
pub struct Plate4 {
    name: String,
    id: Option<usize>,
    nodes: [Arc<Node>; 4],
    frame: CartesianFrame,
    area: f64,
    thickness: f64,
    total_mass: f64,
    xy: [Vector2<f64>; 4],
    transform: CsrMatrix<f64>,
    stiffness: CsrMatrix<f64>,
    mass: CsrMatrix<f64>,
    nodal_force: DVector<f64>,
}

impl Plate4 {
    /// Create a new plate element. Corners must be given in cyclic order;
    /// the winding direction does not matter.
    pub fn new(
        node_i: Arc<Node>,
        node_j: Arc<Node>,
        node_k: Arc<Node>,
        node_l: Arc<Node>,
        t: f64,
        material: &Material,
    ) -> ElementResult<Self> {
        if t <= 0.0 || !t.is_finite() {
            return Err(ElementError::InvalidParameter { name: "t", value: t });
        }

        let p = [
            node_i.position(),
            node_j.position(),
            node_k.position(),
            node_l.position(),
        ];
        let frame = surface::quad_frame(&p)?;
        let xy = surface::project_nodes(&frame, &p);
        let area = surface::quad_area(&p[0], &p[1], &p[2], &p[3]);

        let d_b = surface::plane_stress_d(material.e, material.nu) * (t.powi(3) / 12.0);
        let k_b = plate::dkq_bending_stiffness(&xy, &d_b)?;

        let mut ke = DMatrix::zeros(24, 24);
        for (i, &gi) in SCATTER.iter().enumerate() {
            for (j, &gj) in SCATTER.iter().enumerate() {
                ke[(gi, gj)] = k_b[(i, j)];
            }
        }

        // Weak penalty on relative drilling rotations, sized from the
        // smallest bending rotational stiffness. Uniform drilling rotation
        // (a rigid in-plane spin) stays force-free.
        let mut min_rot = f64::MAX;
        for n in 0..4 {
            for c in [1, 2] {
                let kd = k_b[(3 * n + c, 3 * n + c)];
                if kd > 0.0 && kd < min_rot {
                    min_rot = kd;
                }
            }
        }
        let k_drill = min_rot * DRILLING_FACTOR;
        for &gi in &DRILLING {
            for &gj in &DRILLING {
                let delta = if gi == gj { 1.0 } else { 0.0 };
                ke[(gi, gj)] += k_drill * (delta - 0.25);
            }
        }

        trace!("plate {:?}: drilling stiffness {:.3e}", xy, k_drill);

        // Lumped translations plus rotational inertia rho t^3/12 per unit
        // area shared equally among the corners
        let total_mass = material.rho * area * t;
        let rot_inertia = material.rho * area * t.powi(3) / 12.0 / 4.0;
        let mut me = DMatrix::zeros(24, 24);
        for n in 0..4 {
            for c in 0..3 {
                me[(6 * n + c, 6 * n + c)] = total_mass / 4.0;
                me[(6 * n + 3 + c, 6 * n + 3 + c)] = rot_inertia;
            }
        }

        Ok(Self {
            name: Uuid::new_v4().to_string(),
            id: None,
            nodes: [node_i, node_j, node_k, node_l],
            frame: frame.clone(),
            area,
            thickness: t,
            total_mass,
            xy,
            transform: math::to_csr(&math::block_transformation(&frame, 8)),
            stiffness: math::to_csr(&ke),
            mass: math::to_csr(&me),
            nodal_force: DVector::zeros(24),
        })
    }

    /// Replace the auto-generated name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Plate area
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Plate thickness
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Projected corner coordinates in the local xy plane
    pub fn local_coords(&self) -> &[Vector2<f64>; 4] {
        &self.xy
    }

    /// Set the local nodal force vector
    pub fn set_nodal_force(&mut self, force: &[f64]) -> ElementResult<()> {
        if force.len() != 24 {
            return Err(ElementError::InvalidLength {
                expected: 24,
                actual: force.len(),
            });
        }
        self.nodal_force = DVector::from_row_slice(force);
        Ok(())
    }
}

impl Element for Plate4 {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> Option<usize> {
        self.id
    }

    fn set_id(&mut self, id: usize) {
        self.id = Some(id);
    }

    fn dimension(&self) -> usize {
        2
    }

    fn dof(&self) -> usize {
        24
    }

    fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    fn frame(&self) -> &CartesianFrame {
        &self.frame
    }

    fn transform(&self) -> &CsrMatrix<f64> {
        &self.transform
    }

    fn stiffness(&self) -> &CsrMatrix<f64> {
        &self.stiffness
    }

    fn mass(&self) -> &CsrMatrix<f64> {
        &self.mass
    }

    fn nodal_force(&self) -> &DVector<f64> {
        &self.nodal_force
    }

    fn total_mass(&self) -> f64 {
        self.total_mass
    }
}
