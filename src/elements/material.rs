//! Material properties

use serde::{Deserialize, Serialize};

use crate::error::{ElementError, ElementResult};

/// Material properties for structural analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus) in Pa
    pub e: f64,
    /// Shear modulus in Pa
    pub g: f64,
    /// Poisson's ratio
    pub nu: f64,
    /// Density in kg/m³
    pub rho: f64,
}

impl Material {
    /// Create a new material with given properties
    pub fn new(e: f64, g: f64, nu: f64, rho: f64) -> ElementResult<Self> {
        check_positive("e", e)?;
        check_positive("g", g)?;
        check_positive("rho", rho)?;
        if nu.abs() >= 0.5 {
            return Err(ElementError::InvalidParameter {
                name: "nu",
                value: nu,
            });
        }
        Ok(Self { e, g, nu, rho })
    }

    /// Create a new isotropic material from E and nu.
    /// G is calculated as E / (2 * (1 + nu)).
    pub fn isotropic(e: f64, nu: f64, rho: f64) -> ElementResult<Self> {
        let g = e / (2.0 * (1.0 + nu));
        Self::new(e, g, nu, rho)
    }

    /// Create a standard steel material (A36)
    pub fn steel() -> Self {
        Self {
            e: 200e9,
            g: 77e9,
            nu: 0.3,
            rho: 7850.0,
        }
    }

    /// Create a standard concrete material from its compressive strength
    /// `fc` in Pa. E is estimated with the ACI formula
    /// E = 4700 * sqrt(f'c in MPa) MPa.
    pub fn concrete(fc: f64) -> ElementResult<Self> {
        check_positive("fc", fc)?;
        let fc_mpa = fc / 1e6;
        let e = 4700.0 * fc_mpa.sqrt() * 1e6;
        Self::isotropic(e, 0.2, 2400.0)
    }

    /// Create an aluminum material (6061-T6)
    pub fn aluminum() -> Self {
        Self {
            e: 68.9e9,
            g: 26e9,
            nu: 0.33,
            rho: 2700.0,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}

fn check_positive(name: &'static str, value: f64) -> ElementResult<()> {
    if value <= 0.0 || !value.is_finite() {
        return Err(ElementError::InvalidParameter { name, value });
    }
    Ok(())
}
