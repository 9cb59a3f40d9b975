use crate::data::{Grid, GridSystem, Handle};
use crate::errors::*;
use crate::spatial_ref::Crs;

/// Multi-band raster collection.
///
/// Bands are held through [`Handle`]s, so the same band may be shared with
/// other collections or with the caller.
#[derive(Clone, Debug, Default)]
pub struct Grids {
    name: String,
    crs: Crs,
    bands: Vec<Handle<Grid>>,
}

impl Grids {
    pub fn new(name: &str) -> Grids {
        Grids {
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

    pub fn set_crs(&mut self, crs: Crs) {
        self.crs = crs;
    }

    /// Grid system shared by all bands, `None` for an empty collection.
    pub fn system(&self) -> Option<GridSystem> {
        self.bands.first().map(|band| *band.borrow().system())
    }

    pub fn grid_count(&self) -> usize {
        self.bands.len()
    }

    /// Alias of the band at `index`.
    pub fn grid(&self, index: usize) -> Option<Handle<Grid>> {
        self.bands.get(index).cloned()
    }

    pub fn grids(&self) -> impl Iterator<Item = &Handle<Grid>> {
        self.bands.iter()
    }

    /// Insert `band` at `index`, shifting later bands up.
    ///
    /// An index beyond the band count appends. Every band must share the
    /// grid system of the bands already present.
    pub fn insert_grid(&mut self, index: usize, band: Handle<Grid>) -> Result<()> {
        if let Some(system) = self.system() {
            if *band.borrow().system() != system {
                return Err(HelperError::BadArgument(format!(
                    "band '{}' does not match the grid system of '{}'",
                    band.borrow().name(),
                    self.name
                )));
            }
        }
        if self.bands.is_empty() && !self.crs.is_okay() {
            self.crs = band.borrow().crs().clone();
        }
        let index = index.min(self.bands.len());
        self.bands.insert(index, band);
        Ok(())
    }

    pub fn add_grid(&mut self, band: Handle<Grid>) -> Result<()> {
        self.insert_grid(self.bands.len(), band)
    }
}
