//! Geometry nodes shared read-only between elements

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A named point in 3-D space
///
/// Nodes are owned by the caller and shared among elements behind `Arc`;
/// elements never mutate them. The name is the stable identity the
/// surrounding assembler keys on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Stable identity
    pub name: String,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Node {
    /// Create a new node at the given coordinates
    pub fn new(name: &str, x: f64, y: f64, z: f64) -> Self {
        Self {
            name: name.to_string(),
            x,
            y,
            z,
        }
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Get the position as a vector
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        (other.position() - self.position()).norm()
    }
}
