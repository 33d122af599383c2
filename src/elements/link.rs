//! Link element - axial bar in the 12-DOF line layout

use std::sync::Arc;

use log::trace;
use nalgebra::DVector;
use nalgebra_sparse::CsrMatrix;
use uuid::Uuid;

use crate::csys::CartesianFrame;
use crate::elements::{Element, Node};
use crate::error::{ElementError, ElementResult};
use crate::math::{self, Mat12};

/// A two-node axial bar.
///
/// Only the local-x translation of each end carries stiffness
/// (`k = EA/L`); the element still exposes the full 12-DOF line layout so
/// the assembler treats it exactly like a beam.
#[derive(Debug, Clone)]
pub struct Link {
    name: String,
    id: Option<usize>,
    nodes: [Arc<Node>; 2],
    frame: CartesianFrame,
    length: f64,
    total_mass: f64,
    transform: CsrMatrix<f64>,
    stiffness: CsrMatrix<f64>,
    mass: CsrMatrix<f64>,
    nodal_force: DVector<f64>,
}

impl Link {
    /// Create a new link element
    pub fn new(
        node_i: Arc<Node>,
        node_j: Arc<Node>,
        e: f64,
        a: f64,
        rho: f64,
    ) -> ElementResult<Self> {
        check_positive("e", e)?;
        check_positive("a", a)?;
        check_positive("rho", rho)?;

        let (frame, length) =
            math::line_frame(&node_i.position(), &node_j.position(), math::VERTICAL_TOL)?;

        let k = e * a / length;
        let mut ke = Mat12::zeros();
        ke[(0, 0)] = k;
        ke[(6, 6)] = k;
        ke[(0, 6)] = -k;
        ke[(6, 0)] = -k;

        // Half the bar mass concentrated on each end's translations
        let half_mass = rho * a * length / 2.0;
        let mut me = Mat12::zeros();
        for p in [0, 1, 2, 6, 7, 8] {
            me[(p, p)] = half_mass;
        }

        trace!(
            "link {} -> {}: L = {:.6}, k = {:.6e}",
            node_i.name,
            node_j.name,
            length,
            k
        );

        Ok(Self {
            name: Uuid::new_v4().to_string(),
            id: None,
            nodes: [node_i, node_j],
            frame: frame.clone(),
            length,
            total_mass: rho * a * length,
            transform: math::to_csr(&math::block_transformation(&frame, 4)),
            stiffness: math::to_csr(&ke),
            mass: math::to_csr(&me),
            nodal_force: DVector::zeros(12),
        })
    }

    /// Replace the auto-generated name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Element length
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Set the local nodal force vector
    pub fn set_nodal_force(&mut self, force: &[f64]) -> ElementResult<()> {
        if force.len() != 12 {
            return Err(ElementError::InvalidLength {
                expected: 12,
                actual: force.len(),
            });
        }
        self.nodal_force = DVector::from_row_slice(force);
        Ok(())
    }
}

impl Element for Link {
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
        1
    }

    fn dof(&self) -> usize {
        12
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

fn check_positive(name: &'static str, value: f64) -> ElementResult<()> {
    if value <= 0.0 || !value.is_finite() {
        return Err(ElementError::InvalidParameter { name, value });
    }
    Ok(())
}
