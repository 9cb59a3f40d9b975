//! Scripting helpers for a SAGA-style geoprocessing engine.
//!
//! The engine provides data objects (grids, vector layers, tables) and a
//! library of parameterized tools. This crate adds the convenience layer
//! scripts are written against:
//!
//! * areas of interest from bounds, vector or raster files ([`aoi`]),
//! * virtual raster mosaics of a directory of tiles ([`build_mosaic`]),
//! * text listings of tables ([`print_table`], [`print_table_fields`]),
//! * grid collection to list conversions ([`grids_to_list`], [`grids_from_list`]),
//! * single tool runs with staged bindings ([`tool::ToolWrapper`]).
//!
//! The engine's services are reached through a [`Context`]: a tool library
//! manager, a dataset store and a messenger. With the `gdal` feature,
//! `gdal_backend` provides a store and a VRT tool based on GDAL.
//!
//! ## Use
//!
//! ```
//! use std::rc::Rc;
//! use saga_helpers::data::MemoryStore;
//! use saga_helpers::tool::{ToolRegistry, ToolWrapper};
//! use saga_helpers::{aoi::aoi_from_extent, Context};
//!
//! let ctx = Context::new(Rc::new(ToolRegistry::new()), Rc::new(MemoryStore::new()));
//! let aoi = aoi_from_extent(&ctx, 3.0, 6.5, 50.5, 51.5, Some(4326)).unwrap();
//! assert!(aoi.borrow().crs().is_okay());
//!
//! // no tool libraries are loaded, so this wrapper stays unbound
//! let mut tool = ToolWrapper::new(&ctx, "shapes_polygons", "7", "Polygon Clipping");
//! assert!(!tool.set_input("CLIP", aoi));
//! assert!(!tool.execute());
//! ```

#![crate_name = "saga_helpers"]
#![crate_type = "lib"]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod aoi;
pub mod config;
mod context;
pub mod convert;
pub mod data;
pub mod errors;
#[cfg(feature = "gdal")]
pub mod gdal_backend;
pub mod geo_transform;
pub mod mosaic;
pub mod spatial_ref;
pub mod table_print;
pub mod tool;
pub mod ui;

pub use aoi::{aoi_from_extent, aoi_from_features, aoi_from_raster};
pub use context::Context;
pub use convert::{grids_from_list, grids_to_list};
pub use geo_transform::{Extent, GeoTransform, GeoTransformEx};
pub use mosaic::build_mosaic;
pub use spatial_ref::Crs;
pub use table_print::{print_table, print_table_fields, FieldSelector, PrintOptions};

#[cfg(test)]
pub(crate) mod test_utils;
