use crate::errors::*;
use crate::spatial_ref::Crs;

/// Triangulated irregular network.
#[derive(Clone, Debug, Default)]
pub struct Tin {
    name: String,
    crs: Crs,
    nodes: Vec<[f64; 3]>,
    triangles: Vec<[usize; 3]>,
}

impl Tin {
    pub fn new(name: &str) -> Tin {
        Tin {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn add_node(&mut self, x: f64, y: f64, z: f64) -> usize {
        self.nodes.push([x, y, z]);
        self.nodes.len() - 1
    }

    /// Add a triangle referencing three existing nodes.
    pub fn add_triangle(&mut self, a: usize, b: usize, c: usize) -> Result<usize> {
        if [a, b, c].iter().any(|&i| i >= self.nodes.len()) {
            return Err(HelperError::BadArgument(format!(
                "triangle ({a}, {b}, {c}) references a missing node"
            )));
        }
        self.triangles.push([a, b, c]);
        Ok(self.triangles.len() - 1)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}
