use crate::errors::*;
use crate::geo_transform::{Extent, GeoTransform};
use crate::spatial_ref::Crs;

#[cfg(feature = "array")]
use ndarray::Array2;

/// Geometry of a raster: number of cells, cell size and lower-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSystem {
    pub nx: usize,
    pub ny: usize,
    pub cellsize: f64,
    pub xmin: f64,
    pub ymin: f64,
}

impl GridSystem {
    pub fn new(nx: usize, ny: usize, cellsize: f64, xmin: f64, ymin: f64) -> Result<GridSystem> {
        if nx == 0 || ny == 0 || cellsize <= 0.0 {
            return Err(HelperError::BadArgument(format!(
                "invalid grid system: {nx} x {ny} cells of size {cellsize}"
            )));
        }
        Ok(GridSystem {
            nx,
            ny,
            cellsize,
            xmin,
            ymin,
        })
    }

    /// Build a grid system from a north-up transform of a raster of
    /// `size` (columns, rows).
    pub fn from_geo_transform(transform: &GeoTransform, size: (usize, usize)) -> Result<GridSystem> {
        if transform[2] != 0.0 || transform[4] != 0.0 {
            return Err(HelperError::BadArgument(
                "rotated rasters are not supported".to_string(),
            ));
        }
        if (transform[1] + transform[5]).abs() > 1e-9 * transform[1].abs() {
            return Err(HelperError::BadArgument(
                "raster cells must be square".to_string(),
            ));
        }
        let extent = Extent::from_geo_transform(transform, size);
        GridSystem::new(size.0, size.1, transform[1], extent.xmin, extent.ymin)
    }

    pub fn geo_transform(&self) -> GeoTransform {
        [
            self.xmin,
            self.cellsize,
            0.0,
            self.ymin + self.ny as f64 * self.cellsize,
            0.0,
            -self.cellsize,
        ]
    }

    pub fn extent(&self) -> Extent {
        Extent::new(
            self.xmin,
            self.xmin + self.nx as f64 * self.cellsize,
            self.ymin,
            self.ymin + self.ny as f64 * self.cellsize,
        )
    }

    pub fn cell_count(&self) -> usize {
        self.nx * self.ny
    }
}

/// A single raster band.
///
/// Values are stored row by row, starting with the southernmost row.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    name: String,
    crs: Crs,
    system: GridSystem,
    no_data: Option<f64>,
    values: Vec<f64>,
}

impl Grid {
    /// Create a grid with every cell set to `0.0`.
    pub fn new(name: &str, system: GridSystem) -> Grid {
        Grid {
            name: name.to_string(),
            crs: Crs::undefined(),
            system,
            no_data: None,
            values: vec![0.0; system.cell_count()],
        }
    }

    pub fn from_values(name: &str, system: GridSystem, values: Vec<f64>) -> Result<Grid> {
        if values.len() != system.cell_count() {
            return Err(HelperError::BadArgument(format!(
                "expected {} cell values, got {}",
                system.cell_count(),
                values.len()
            )));
        }
        Ok(Grid {
            values,
            ..Grid::new(name, system)
        })
    }

    pub fn with_crs(mut self, crs: Crs) -> Grid {
        self.crs = crs;
        self
    }

    pub fn with_no_data(mut self, no_data: f64) -> Grid {
        self.no_data = Some(no_data);
        self
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

    pub fn system(&self) -> &GridSystem {
        &self.system
    }

    pub fn extent(&self) -> Extent {
        self.system.extent()
    }

    pub fn no_data(&self) -> Option<f64> {
        self.no_data
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn value(&self, x: usize, y: usize) -> Option<f64> {
        (x < self.system.nx && y < self.system.ny).then(|| self.values[y * self.system.nx + x])
    }

    pub fn set_value(&mut self, x: usize, y: usize, value: f64) -> Result<()> {
        if x >= self.system.nx || y >= self.system.ny {
            return Err(HelperError::BadArgument(format!(
                "cell ({x}, {y}) is outside of a {} x {} grid",
                self.system.nx, self.system.ny
            )));
        }
        self.values[y * self.system.nx + x] = value;
        Ok(())
    }

    pub fn is_no_data(&self, x: usize, y: usize) -> bool {
        match (self.value(x, y), self.no_data) {
            (Some(value), Some(no_data)) => value == no_data || value.is_nan(),
            (Some(value), None) => value.is_nan(),
            (None, _) => true,
        }
    }

    /// Copy the cell values into a 2D array, northernmost row first.
    #[cfg(feature = "array")]
    pub fn to_array(&self) -> Result<Array2<f64>> {
        let (nx, ny) = (self.system.nx, self.system.ny);
        let rows = self.values.chunks(nx).rev().flatten().copied().collect();
        Array2::from_shape_vec((ny, nx), rows)
            .map_err(|e| HelperError::BadArgument(e.to_string()))
    }
}
