//! Membrane3 element - constant-strain triangle

use std::sync::Arc;

use nalgebra::{DMatrix, DVector, Matrix3, SMatrix, Vector2, Vector3};
use nalgebra_sparse::CsrMatrix;
use uuid::Uuid;

use crate::csys::CartesianFrame;
use crate::elements::{Element, Material, Node};
use crate::error::{ElementError, ElementResult};
use crate::math::{self, surface};

/// Native strain-displacement matrix: 3 strain rows by 6 translational DOFs
type StrainB = SMatrix<f64, 3, 6>;

/// Rows of the 18-DOF layout holding the native in-plane translations
const SCATTER: [usize; 6] = [0, 1, 6, 7, 12, 13];

/// A three-node constant-strain membrane triangle.
///
/// Strain is uniform over the element, so the stiffness integral collapses
/// to the closed form `K = t A Bᵀ D B`. The element exposes the 18-DOF
/// layout; only the in-plane translations carry stiffness.
#[derive(Debug, Clone)]
pub struct Membrane3 {
    name: String,
    id: Option<usize>,
    nodes: [Arc<Node>; 3],
    frame: CartesianFrame,
    area: f64,
    thickness: f64,
    total_mass: f64,
    d: Matrix3<f64>,
    b: StrainB,
    /// Doubled signed area of the projected triangle
    area2: f64,
    abc: [[f64; 3]; 3],
    transform: CsrMatrix<f64>,
    stiffness: CsrMatrix<f64>,
    mass: CsrMatrix<f64>,
    nodal_force: DVector<f64>,
}

impl Membrane3 {
    /// Create a new constant-strain triangle
    pub fn new(
        node_i: Arc<Node>,
        node_j: Arc<Node>,
        node_k: Arc<Node>,
        t: f64,
        material: &Material,
    ) -> ElementResult<Self> {
        if t <= 0.0 || !t.is_finite() {
            return Err(ElementError::InvalidParameter { name: "t", value: t });
        }

        let p = [node_i.position(), node_j.position(), node_k.position()];
        let area = surface::triangle_area(&p[0], &p[1], &p[2]);
        if area < 1e-12 {
            return Err(ElementError::GeometryDegenerate(
                "triangle corners are collinear".to_string(),
            ));
        }

        let frame = surface::triangle_frame(&p)?;
        let xy = surface::project_nodes(&frame, &p);

        let abc = strain_constants(&xy);
        let area2 = abc[0][0] + abc[1][0] + abc[2][0];

        let mut b = StrainB::zeros();
        for n in 0..3 {
            let [_, bn, cn] = abc[n];
            b[(0, 2 * n)] = bn / area2;
            b[(1, 2 * n + 1)] = cn / area2;
            b[(2, 2 * n)] = cn / area2;
            b[(2, 2 * n + 1)] = bn / area2;
        }

        let d = surface::plane_stress_d(material.e, material.nu);
        let k_native = b.transpose() * d * b * (t * area);

        let mut ke = DMatrix::zeros(18, 18);
        for (i, &gi) in SCATTER.iter().enumerate() {
            for (j, &gj) in SCATTER.iter().enumerate() {
                ke[(gi, gj)] = k_native[(i, j)];
            }
        }

        let total_mass = material.rho * area * t;
        let mut me = DMatrix::zeros(18, 18);
        for n in 0..3 {
            for c in 0..3 {
                me[(6 * n + c, 6 * n + c)] = total_mass / 3.0;
            }
        }

        Ok(Self {
            name: Uuid::new_v4().to_string(),
            id: None,
            nodes: [node_i, node_j, node_k],
            frame: frame.clone(),
            area,
            thickness: t,
            total_mass,
            d,
            b,
            area2,
            abc,
            transform: math::to_csr(&math::block_transformation(&frame, 6)),
            stiffness: math::to_csr(&ke),
            mass: math::to_csr(&me),
            nodal_force: DVector::zeros(18),
        })
    }

    /// Replace the auto-generated name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Triangle area
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Membrane thickness
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Area-coordinate shape functions at a point of the local xy plane
    pub fn shape_functions(&self, x: f64, y: f64) -> [f64; 3] {
        let mut l = [0.0; 3];
        for n in 0..3 {
            let [an, bn, cn] = self.abc[n];
            l[n] = (an + bn * x + cn * y) / self.area2;
        }
        l
    }

    /// In-plane stress (sx, sy, txy) from the element-local displacement
    /// vector. Constant over the element.
    pub fn stress(&self, u: &DVector<f64>) -> ElementResult<Vector3<f64>> {
        if u.len() != 18 {
            return Err(ElementError::InvalidLength {
                expected: 18,
                actual: u.len(),
            });
        }
        let mut u_native = SMatrix::<f64, 6, 1>::zeros();
        for (i, &gi) in SCATTER.iter().enumerate() {
            u_native[i] = u[gi];
        }
        Ok(self.d * self.b * u_native)
    }

    /// Set the local nodal force vector
    pub fn set_nodal_force(&mut self, force: &[f64]) -> ElementResult<()> {
        if force.len() != 18 {
            return Err(ElementError::InvalidLength {
                expected: 18,
                actual: force.len(),
            });
        }
        self.nodal_force = DVector::from_row_slice(force);
        Ok(())
    }
}

/// Per-node constants (a, b, c) over the cyclic vertex pairs, from the
/// projected corner coordinates. `a_n + b_n x + c_n y` over the doubled
/// signed area gives the area coordinate of node n.
fn strain_constants(xy: &[Vector2<f64>; 3]) -> [[f64; 3]; 3] {
    let mut abc = [[0.0; 3]; 3];
    for n in 0..3 {
        let j = (n + 1) % 3;
        let m = (n + 2) % 3;
        abc[n] = [
            xy[j].x * xy[m].y - xy[m].x * xy[j].y,
            xy[j].y - xy[m].y,
            xy[m].x - xy[j].x,
        ];
    }
    abc
}

impl Element for Membrane3 {
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
        18
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
