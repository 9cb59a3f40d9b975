//! Areas of interest.
//!
//! An area of interest (AOI) is a polygon layer describing the region a
//! script works on. It is built from explicit bounds or read from a vector
//! or raster dataset whose coordinate reference system is known.

use std::path::Path;

use geo_types::{Geometry, LineString, Polygon};

use crate::context::Context;
use crate::data::{DataObject, Handle, ShapeType, Shapes};
use crate::errors::*;
use crate::geo_transform::Extent;
use crate::spatial_ref::Crs;

const AOI_NAME: &str = "AOI";

/// A polygon layer holding the rectangle `(xmin, xmax, ymin, ymax)` in the
/// reference system `epsg`, or the configured default code if `None`.
///
/// The bounds are taken as given; nothing checks that `xmin < xmax`.
///
/// ```
/// # use std::rc::Rc;
/// # use saga_helpers::{aoi::aoi_from_extent, data::MemoryStore, tool::ToolRegistry, Context};
/// let ctx = Context::new(Rc::new(ToolRegistry::new()), Rc::new(MemoryStore::new()));
/// let aoi = aoi_from_extent(&ctx, 10.0, 20.0, 45.0, 50.0, Some(4326)).unwrap();
/// assert_eq!(aoi.borrow().shape_count(), 1);
/// assert_eq!(aoi.borrow().crs().epsg(), Some(4326));
/// ```
pub fn aoi_from_extent(
    ctx: &Context,
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
    epsg: Option<u32>,
) -> Result<Handle<Shapes>> {
    let crs = Crs::from_epsg(epsg.unwrap_or(ctx.config().default_epsg)).map_err(|e| ctx.report(e))?;
    let extent = Extent {
        xmin,
        xmax,
        ymin,
        ymax,
    };
    rectangle(ctx, extent, crs)
}

/// Load the vector dataset at `path` as area of interest.
///
/// Fails if the file cannot be opened or has no defined reference system.
pub fn aoi_from_features<P: AsRef<Path>>(ctx: &Context, path: P) -> Result<Handle<Shapes>> {
    let path = path.as_ref();
    let shapes = ctx.store().open_shapes(path).map_err(|e| {
        log::debug!("{e}");
        ctx.messenger().error(&format!(
            "failed to load AOI from file '{}'",
            path.display()
        ));
        e
    })?;

    if !shapes.borrow().crs().is_okay() {
        ctx.store().release(DataObject::Shapes(shapes));
        return Err(undefined_crs(ctx, path));
    }
    Ok(shapes)
}

/// Area of interest covering the extent of the raster at `path`, in the
/// raster's reference system.
///
/// The raster is only read for its extent and released before returning.
pub fn aoi_from_raster<P: AsRef<Path>>(ctx: &Context, path: P) -> Result<Handle<Shapes>> {
    let path = path.as_ref();
    let grid = ctx.store().open_grid(path).map_err(|e| {
        log::debug!("{e}");
        ctx.messenger().error(&format!(
            "failed to load AOI from file '{}'",
            path.display()
        ));
        e
    })?;

    let (crs, extent) = {
        let grid = grid.borrow();
        (grid.crs().clone(), grid.extent())
    };
    ctx.store().release(DataObject::Grid(grid));

    if !crs.is_okay() {
        return Err(undefined_crs(ctx, path));
    }
    rectangle(ctx, extent, crs)
}

fn undefined_crs(ctx: &Context, path: &Path) -> HelperError {
    ctx.messenger().error(&format!(
        "coordinate reference system of AOI is not defined '{}'",
        path.display()
    ));
    HelperError::UndefinedCrs(path.to_path_buf())
}

fn rectangle(ctx: &Context, extent: Extent, crs: Crs) -> Result<Handle<Shapes>> {
    let Extent {
        xmin,
        xmax,
        ymin,
        ymax,
    } = extent;
    let ring = LineString::from(vec![
        (xmin, ymin),
        (xmin, ymax),
        (xmax, ymax),
        (xmax, ymin),
        (xmin, ymin),
    ]);
    let mut aoi = Shapes::new(AOI_NAME, ShapeType::Polygon).with_crs(crs);
    aoi.add_shape(Geometry::Polygon(Polygon::new(ring, vec![])), vec![])
        .map_err(|e| ctx.report(e))?;
    Ok(Handle::new(aoi))
}
