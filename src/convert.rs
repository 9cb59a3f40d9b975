//! Conversions between grid collections and lists of grids.
//!
//! Both directions alias the bands; no cell values are copied.

use crate::data::{Grid, Grids, Handle};
use crate::errors::*;

/// The bands of `grids`, in band order.
pub fn grids_to_list(grids: &Handle<Grids>) -> Vec<Handle<Grid>> {
    grids.borrow().grids().cloned().collect()
}

/// A new collection named `name` holding `bands` at their list positions.
///
/// All bands must share one grid system. The collection takes the
/// reference system of the first band.
///
/// ```
/// use saga_helpers::data::{Grid, GridSystem, Handle};
/// use saga_helpers::{grids_from_list, grids_to_list};
///
/// let system = GridSystem::new(3, 3, 10.0, 0.0, 0.0).unwrap();
/// let bands = vec![
///     Handle::new(Grid::new("red", system)),
///     Handle::new(Grid::new("nir", system)),
/// ];
/// let grids = grids_from_list(&bands, "image").unwrap();
/// assert!(grids_to_list(&grids)[1].ptr_eq(&bands[1]));
/// ```
pub fn grids_from_list(bands: &[Handle<Grid>], name: &str) -> Result<Handle<Grids>> {
    let mut grids = Grids::new(name);
    for (index, band) in bands.iter().enumerate() {
        grids.insert_grid(index, band.clone())?;
    }
    log::debug!("collected {} band(s) into '{name}'", bands.len());
    Ok(Handle::new(grids))
}
