//! Section properties for line elements

use serde::{Deserialize, Serialize};

use crate::error::{ElementError, ElementResult};

/// Cross-section properties for line elements.
///
/// The inertia axes follow the element-local convention: `i2` resists
/// bending about local 2 (coupling the local-z translations) and `i3`
/// resists bending about local 3 (coupling the local-y translations).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Cross-sectional area in m²
    pub a: f64,
    /// Moment of inertia about the local 2 axis in m⁴
    pub i2: f64,
    /// Moment of inertia about the local 3 axis in m⁴
    pub i3: f64,
    /// Torsional constant in m⁴
    pub j: f64,
}

impl Section {
    /// Create a new section with the given properties
    pub fn new(a: f64, i2: f64, i3: f64, j: f64) -> ElementResult<Self> {
        check_positive("a", a)?;
        check_positive("i2", i2)?;
        check_positive("i3", i3)?;
        check_positive("j", j)?;
        Ok(Self { a, i2, i3, j })
    }

    /// Create a rectangular section
    pub fn rectangular(width: f64, depth: f64) -> ElementResult<Self> {
        let a = width * depth;
        let i2 = width * depth.powi(3) / 12.0;
        let i3 = depth * width.powi(3) / 12.0;

        // Torsional constant for a rectangle (approximate)
        let (long, short) = if width > depth {
            (width, depth)
        } else {
            (depth, width)
        };
        let j = long * short.powi(3) / 3.0 * (1.0 - 0.63 * short / long);

        Self::new(a, i2, i3, j)
    }

    /// Create a circular section
    pub fn circular(diameter: f64) -> ElementResult<Self> {
        let r = diameter / 2.0;
        let a = std::f64::consts::PI * r.powi(2);
        let i = std::f64::consts::PI * r.powi(4) / 4.0;
        let j = std::f64::consts::PI * r.powi(4) / 2.0;

        Self::new(a, i, i, j)
    }

    /// Create a hollow circular (pipe) section
    pub fn pipe(outer_diameter: f64, wall_thickness: f64) -> ElementResult<Self> {
        let r_o = outer_diameter / 2.0;
        let r_i = r_o - wall_thickness;

        let a = std::f64::consts::PI * (r_o.powi(2) - r_i.powi(2));
        let i = std::f64::consts::PI * (r_o.powi(4) - r_i.powi(4)) / 4.0;
        let j = std::f64::consts::PI * (r_o.powi(4) - r_i.powi(4)) / 2.0;

        Self::new(a, i, i, j)
    }

    /// Create a wide flange (I-beam) section
    ///
    /// # Arguments
    /// * `depth` - Total depth of section
    /// * `flange_width` - Width of flange
    /// * `flange_thickness` - Thickness of flange
    /// * `web_thickness` - Thickness of web
    pub fn wide_flange(
        depth: f64,
        flange_width: f64,
        flange_thickness: f64,
        web_thickness: f64,
    ) -> ElementResult<Self> {
        let bf = flange_width;
        let tf = flange_thickness;
        let tw = web_thickness;
        let d = depth;
        let hw = d - 2.0 * tf;

        let a = 2.0 * bf * tf + hw * tw;
        let i2 = (bf * d.powi(3) - (bf - tw) * hw.powi(3)) / 12.0;
        let i3 = (2.0 * tf * bf.powi(3) + hw * tw.powi(3)) / 12.0;
        let j = (2.0 * bf * tf.powi(3) + hw * tw.powi(3)) / 3.0;

        Self::new(a, i2, i3, j)
    }

    /// Create a box/tube section
    pub fn box_section(width: f64, depth: f64, wall_thickness: f64) -> ElementResult<Self> {
        let t = wall_thickness;
        let b = width;
        let d = depth;
        let bi = b - 2.0 * t;
        let di = d - 2.0 * t;

        let a = b * d - bi * di;
        let i2 = (b * d.powi(3) - bi * di.powi(3)) / 12.0;
        let i3 = (d * b.powi(3) - di * bi.powi(3)) / 12.0;

        // Torsional constant for a closed thin-walled section
        let am = (b - t) * (d - t);
        let s = 2.0 * (b + d) - 4.0 * t;
        let j = 4.0 * am.powi(2) * t / s;

        Self::new(a, i2, i3, j)
    }

    /// Get the radius of gyration about the local 2 axis
    pub fn r2(&self) -> f64 {
        (self.i2 / self.a).sqrt()
    }

    /// Get the radius of gyration about the local 3 axis
    pub fn r3(&self) -> f64 {
        (self.i3 / self.a).sqrt()
    }

    /// Get the polar moment of inertia
    pub fn ip(&self) -> f64 {
        self.i2 + self.i3
    }
}

fn check_positive(name: &'static str, value: f64) -> ElementResult<()> {
    if value <= 0.0 || !value.is_finite() {
        return Err(ElementError::InvalidParameter { name, value });
    }
    Ok(())
}
