//! Beam element - 3D Euler-Bernoulli line element with end releases

use std::sync::Arc;

use log::debug;
use nalgebra::DVector;
use nalgebra_sparse::CsrMatrix;
use uuid::Uuid;

use crate::csys::CartesianFrame;
use crate::elements::{Element, MassModel, Material, Node, Section};
use crate::error::{ElementError, ElementResult};
use crate::math::{self, Mat12, Vec12};

/// End releases for a beam (allowing specific DOFs to rotate/translate
/// freely)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Releases {
    /// i-end releases [ux, uy, uz, rx, ry, rz]
    pub i_end: [bool; 6],
    /// j-end releases [ux, uy, uz, rx, ry, rz]
    pub j_end: [bool; 6],
}

impl Releases {
    /// No end releases
    pub fn none() -> Self {
        Self::default()
    }

    /// Moment releases (pin) at the i-end
    pub fn pin_i() -> Self {
        Self {
            i_end: [false, false, false, false, true, true],
            j_end: [false; 6],
        }
    }

    /// Moment releases (pin) at the j-end
    pub fn pin_j() -> Self {
        Self {
            i_end: [false; 6],
            j_end: [false, false, false, false, true, true],
        }
    }

    /// Pins at both ends
    pub fn pin_both() -> Self {
        Self {
            i_end: [false, false, false, false, true, true],
            j_end: [false, false, false, false, true, true],
        }
    }

    /// Get combined releases as a 12-element array
    pub fn as_array(&self) -> [bool; 12] {
        let mut arr = [false; 12];
        arr[0..6].copy_from_slice(&self.i_end);
        arr[6..12].copy_from_slice(&self.j_end);
        arr
    }

    /// Build from a 12-element slice
    pub fn from_slice(rls: &[bool]) -> ElementResult<Self> {
        if rls.len() != 12 {
            return Err(ElementError::InvalidLength {
                expected: 12,
                actual: rls.len(),
            });
        }
        let mut releases = Self::default();
        releases.i_end.copy_from_slice(&rls[0..6]);
        releases.j_end.copy_from_slice(&rls[6..12]);
        Ok(releases)
    }

    /// True when any DOF is released
    pub fn any(&self) -> bool {
        self.i_end.iter().chain(self.j_end.iter()).any(|&r| r)
    }
}

/// A two-node 3D Euler-Bernoulli beam.
///
/// The uncondensed stiffness, mass, and force stay immutable after
/// construction; changing the releases or the nodal force re-derives the
/// exposed condensed artifacts from them.
#[derive(Debug, Clone)]
pub struct Beam {
    name: String,
    id: Option<usize>,
    nodes: [Arc<Node>; 2],
    frame: CartesianFrame,
    length: f64,
    total_mass: f64,
    mass_model: MassModel,
    releases: Releases,

    // Uncondensed local forms
    k_local: Mat12,
    m_local: Mat12,
    r_local: Vec12,

    // Condensed working copies kept dense for force recovery
    k_cond: Mat12,
    r_cond: Vec12,

    // Exposed artifacts
    transform: CsrMatrix<f64>,
    stiffness: CsrMatrix<f64>,
    mass: CsrMatrix<f64>,
    nodal_force: DVector<f64>,
}

impl Beam {
    /// Create a new beam element
    pub fn new(
        node_i: Arc<Node>,
        node_j: Arc<Node>,
        material: &Material,
        section: &Section,
        mass_model: MassModel,
    ) -> ElementResult<Self> {
        let (frame, length) =
            math::line_frame(&node_i.position(), &node_j.position(), math::VERTICAL_TOL)?;

        let g = material.e / (2.0 * (1.0 + material.nu));
        let k_local = local_stiffness(
            material.e, g, section.a, section.i2, section.i3, section.j, length,
        );
        let m_local = match mass_model {
            MassModel::Lumped => lumped_mass(material.rho, section.a, length),
            MassModel::Consistent => {
                consistent_mass(material.rho, section.a, section.j, length)
            }
        };
        let r_local = Vec12::zeros();

        Ok(Self {
            name: Uuid::new_v4().to_string(),
            id: None,
            nodes: [node_i, node_j],
            frame: frame.clone(),
            length,
            total_mass: material.rho * section.a * length,
            mass_model,
            releases: Releases::none(),
            k_local,
            m_local,
            r_local,
            k_cond: k_local,
            r_cond: r_local,
            transform: math::to_csr(&math::block_transformation(&frame, 4)),
            stiffness: math::to_csr(&k_local),
            mass: math::to_csr(&m_local),
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

    /// Mass matrix model
    pub fn mass_model(&self) -> MassModel {
        self.mass_model
    }

    /// Current end releases
    pub fn releases(&self) -> &Releases {
        &self.releases
    }

    /// Uncondensed local stiffness matrix
    pub fn stiffness_uncondensed(&self) -> &Mat12 {
        &self.k_local
    }

    /// Set the end releases from a 12-element boolean array (i-end DOFs
    /// first) and re-derive the condensed artifacts.
    pub fn set_releases(&mut self, rls: &[bool]) -> ElementResult<()> {
        self.releases = Releases::from_slice(rls)?;
        self.static_condensation()
    }

    /// Set the local nodal force vector and re-derive the condensed
    /// artifacts
    pub fn set_nodal_force(&mut self, force: &[f64]) -> ElementResult<()> {
        if force.len() != 12 {
            return Err(ElementError::InvalidLength {
                expected: 12,
                actual: force.len(),
            });
        }
        self.r_local = Vec12::from_row_slice(force);
        self.static_condensation()
    }

    /// Re-derive the condensed stiffness, mass, and force from the
    /// uncondensed forms and the current releases.
    ///
    /// Always starts from the immutable uncondensed matrices, so repeating
    /// the call with the same release pattern is idempotent. On a singular
    /// pivot the exposed artifacts are left unchanged.
    pub fn static_condensation(&mut self) -> ElementResult<()> {
        let mut k = self.k_local;
        let mut m = self.m_local;
        let mut r = self.r_local;

        if self.releases.any() {
            debug!(
                "condensing beam {}: releases {:?}",
                self.name,
                self.releases.as_array()
            );
            math::condense_released(&mut k, &mut m, &mut r, &self.releases.as_array())?;
        }

        self.k_cond = k;
        self.r_cond = r;
        self.stiffness = math::to_csr(&k);
        self.mass = math::to_csr(&m);
        self.nodal_force = DVector::from_iterator(12, r.iter().copied());
        Ok(())
    }

    /// Recover the element end forces from solved local displacements:
    /// `f_e = K* u_e + r*`
    pub fn element_force(&self, u: &DVector<f64>) -> ElementResult<DVector<f64>> {
        if u.len() != 12 {
            return Err(ElementError::InvalidLength {
                expected: 12,
                actual: u.len(),
            });
        }
        let uv = Vec12::from_iterator(u.iter().copied());
        let f = self.k_cond * uv + self.r_cond;
        Ok(DVector::from_iterator(12, f.iter().copied()))
    }
}

impl Element for Beam {
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

/// Closed-form 12x12 local stiffness matrix in the DOF ordering
/// {ux_i, uy_i, uz_i, rx_i, ry_i, rz_i, ux_j, ...}
fn local_stiffness(e: f64, g: f64, a: f64, i2: f64, i3: f64, j: f64, length: f64) -> Mat12 {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let ea_l = e * a / l;
    let gj_l = g * j / l;

    let ei2_l3 = e * i2 / l3;
    let ei2_l2 = e * i2 / l2;
    let ei2_l = e * i2 / l;

    let ei3_l3 = e * i3 / l3;
    let ei3_l2 = e * i3 / l2;
    let ei3_l = e * i3 / l;

    #[rustfmt::skip]
    let data = [
        // Row 0: axial at i
        ea_l,      0.0,          0.0,           0.0,    0.0,           0.0,          -ea_l,     0.0,          0.0,           0.0,    0.0,           0.0,
        // Row 1: shear along local 2 at i
        0.0,       12.0*ei3_l3,  0.0,           0.0,    0.0,           6.0*ei3_l2,   0.0,       -12.0*ei3_l3, 0.0,           0.0,    0.0,           6.0*ei3_l2,
        // Row 2: shear along local 3 at i
        0.0,       0.0,          12.0*ei2_l3,   0.0,    -6.0*ei2_l2,   0.0,          0.0,       0.0,          -12.0*ei2_l3,  0.0,    -6.0*ei2_l2,   0.0,
        // Row 3: torsion at i
        0.0,       0.0,          0.0,           gj_l,   0.0,           0.0,          0.0,       0.0,          0.0,           -gj_l,  0.0,           0.0,
        // Row 4: moment about local 2 at i
        0.0,       0.0,          -6.0*ei2_l2,   0.0,    4.0*ei2_l,     0.0,          0.0,       0.0,          6.0*ei2_l2,    0.0,    2.0*ei2_l,     0.0,
        // Row 5: moment about local 3 at i
        0.0,       6.0*ei3_l2,   0.0,           0.0,    0.0,           4.0*ei3_l,    0.0,       -6.0*ei3_l2,  0.0,           0.0,    0.0,           2.0*ei3_l,
        // Row 6: axial at j
        -ea_l,     0.0,          0.0,           0.0,    0.0,           0.0,          ea_l,      0.0,          0.0,           0.0,    0.0,           0.0,
        // Row 7: shear along local 2 at j
        0.0,       -12.0*ei3_l3, 0.0,           0.0,    0.0,           -6.0*ei3_l2,  0.0,       12.0*ei3_l3,  0.0,           0.0,    0.0,           -6.0*ei3_l2,
        // Row 8: shear along local 3 at j
        0.0,       0.0,          -12.0*ei2_l3,  0.0,    6.0*ei2_l2,    0.0,          0.0,       0.0,          12.0*ei2_l3,   0.0,    6.0*ei2_l2,    0.0,
        // Row 9: torsion at j
        0.0,       0.0,          0.0,           -gj_l,  0.0,           0.0,          0.0,       0.0,          0.0,           gj_l,   0.0,           0.0,
        // Row 10: moment about local 2 at j
        0.0,       0.0,          -6.0*ei2_l2,   0.0,    2.0*ei2_l,     0.0,          0.0,       0.0,          6.0*ei2_l2,    0.0,    4.0*ei2_l,     0.0,
        // Row 11: moment about local 3 at j
        0.0,       6.0*ei3_l2,   0.0,           0.0,    0.0,           2.0*ei3_l,    0.0,       -6.0*ei3_l2,  0.0,           0.0,    0.0,           4.0*ei3_l,
    ];

    Mat12::from_row_slice(&data)
}

/// Concentrated mass matrix: half the bar mass on every DOF of each end
fn lumped_mass(rho: f64, a: f64, length: f64) -> Mat12 {
    Mat12::identity() * (rho * a * length / 2.0)
}

/// Cubic-Hermite consistent mass matrix scaled by rho*A*L/420, with the
/// torsional entries scaled by J/A
fn consistent_mass(rho: f64, a: f64, j: f64, length: f64) -> Mat12 {
    let l = length;
    let l2 = l * l;
    let ja = j / a;

    let mut m = Mat12::zeros();

    m[(0, 0)] = 140.0;
    m[(0, 6)] = 70.0;

    m[(1, 1)] = 156.0;
    m[(1, 5)] = 22.0 * l;
    m[(1, 7)] = 54.0;
    m[(1, 11)] = -13.0 * l;

    m[(2, 2)] = 156.0;
    m[(2, 4)] = -22.0 * l;
    m[(2, 8)] = 54.0;
    m[(2, 10)] = 13.0 * l;

    m[(3, 3)] = 140.0 * ja;
    m[(3, 9)] = 70.0 * ja;

    m[(4, 4)] = 4.0 * l2;
    m[(4, 8)] = -13.0 * l;
    m[(4, 10)] = -3.0 * l2;

    m[(5, 5)] = 4.0 * l2;
    m[(5, 7)] = 13.0 * l;
    m[(5, 11)] = -3.0 * l2;

    m[(6, 6)] = 140.0;

    m[(7, 7)] = 156.0;
    m[(7, 11)] = -22.0 * l;

    m[(8, 8)] = 156.0;
    m[(8, 10)] = 22.0 * l;

    m[(9, 9)] = 140.0 * ja;

    m[(10, 10)] = 4.0 * l2;

    m[(11, 11)] = 4.0 * l2;

    // Mirror the upper triangle
    for row in 0..12 {
        for col in (row + 1)..12 {
            m[(col, row)] = m[(row, col)];
        }
    }

    m * (rho * a * l / 420.0)
}
