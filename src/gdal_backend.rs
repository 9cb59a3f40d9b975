//! GDAL backed engine services.
//!
//! [`GdalStore`] loads vector and raster files through GDAL, and
//! [`register_tools`] adds a native "Create Virtual Raster (VRT)" tool
//! built on `gdalbuildvrt`, so that the helpers work without a running
//! engine.

use std::path::{Path, PathBuf};

use gdal::spatial_ref::SpatialRef;
use gdal::vector::{FieldValue as OgrValue, LayerAccess, OGRFieldType};
use gdal::Dataset;
use geo_types::Geometry;

use crate::data::{
    DataManager, DataObject, DataStore, FieldDefn, FieldType, FieldValue, Grid, GridSystem, Handle,
    ShapeType, Shapes,
};
use crate::errors::*;
use crate::mosaic::parse_file_list;
use crate::spatial_ref::Crs;
use crate::tool::{OptionType, Parameter, Parameters, Tool, ToolRegistry};

/// Opens datasets with GDAL and copies them into engine objects.
#[derive(Debug, Default)]
pub struct GdalStore;

impl GdalStore {
    pub fn new() -> Self {
        GdalStore
    }
}

fn open(path: &Path) -> Result<Dataset> {
    Dataset::open(path).map_err(|e| HelperError::OpenFailed {
        path: path.to_path_buf(),
        msg: e.to_string(),
    })
}

fn layer_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn crs_from(srs: Option<SpatialRef>) -> Crs {
    let Some(srs) = srs else {
        return Crs::undefined();
    };
    let epsg = srs.auth_code().ok().and_then(|code| u32::try_from(code).ok());
    match (srs.to_wkt().ok().map(|wkt| Crs::from_wkt(&wkt)), epsg) {
        (Some(Ok(crs)), Some(code)) => crs.with_epsg(code),
        (Some(Ok(crs)), None) => crs,
        (_, Some(code)) => Crs::from_epsg(code).unwrap_or_default(),
        (_, None) => Crs::undefined(),
    }
}

fn field_type(ogr_type: OGRFieldType::Type) -> FieldType {
    match ogr_type {
        OGRFieldType::OFTInteger | OGRFieldType::OFTInteger64 => FieldType::Integer,
        OGRFieldType::OFTReal => FieldType::Double,
        OGRFieldType::OFTDate | OGRFieldType::OFTDateTime => FieldType::Date,
        _ => FieldType::String,
    }
}

fn field_value(value: Option<OgrValue>, field_type: FieldType) -> FieldValue {
    let Some(value) = value else {
        return FieldValue::Null;
    };
    match (value, field_type) {
        (OgrValue::IntegerValue(v), FieldType::Integer) => FieldValue::Integer(v.into()),
        (OgrValue::Integer64Value(v), FieldType::Integer) => FieldValue::Integer(v),
        (OgrValue::RealValue(v), FieldType::Double) => FieldValue::Double(v),
        (OgrValue::DateValue(v), FieldType::Date) => FieldValue::Date(v),
        (OgrValue::DateTimeValue(v), FieldType::Date) => FieldValue::Date(v.date_naive()),
        (OgrValue::StringValue(v), FieldType::String) => FieldValue::String(v),
        _ => FieldValue::Null,
    }
}

fn shape_type(geometry: &Geometry<f64>) -> Option<ShapeType> {
    match geometry {
        Geometry::Point(_) => Some(ShapeType::Point),
        Geometry::MultiPoint(_) => Some(ShapeType::Points),
        Geometry::LineString(_) | Geometry::MultiLineString(_) => Some(ShapeType::Line),
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::Rect(_) => {
            Some(ShapeType::Polygon)
        }
        _ => None,
    }
}

/// Shape type of a layer holding `geometries`: the type of the first
/// supported geometry, widened to `Points` when single and multi points mix.
fn layer_shape_type(geometries: &[Geometry<f64>]) -> ShapeType {
    let mut types = geometries.iter().filter_map(shape_type);
    let Some(first) = types.next() else {
        return ShapeType::Polygon;
    };
    types.fold(first, |layer, next| match (layer, next) {
        (ShapeType::Point, ShapeType::Points) => ShapeType::Points,
        _ => layer,
    })
}

impl DataStore for GdalStore {
    fn open_shapes(&self, path: &Path) -> Result<Handle<Shapes>> {
        let dataset = open(path)?;
        let mut layer = dataset.layer(0)?;
        let crs = crs_from(layer.spatial_ref());
        let fields: Vec<FieldDefn> = layer
            .defn()
            .fields()
            .map(|field| FieldDefn::new(&field.name(), field_type(field.field_type())))
            .collect();

        let mut geometries = Vec::new();
        let mut records = Vec::new();
        for feature in layer.features() {
            let Some(geometry) = feature.geometry() else {
                continue;
            };
            geometries.push(geometry.to_geo()?);
            let values: Vec<FieldValue> = feature
                .fields()
                .zip(&fields)
                .map(|((_, value), defn)| field_value(value, defn.field_type()))
                .collect();
            records.push(values);
        }

        let shape_type = layer_shape_type(&geometries);
        let mut shapes = Shapes::new(&layer_name(path), shape_type).with_crs(crs);
        for defn in fields {
            shapes.add_field(defn);
        }
        for (index, (geometry, values)) in geometries.into_iter().zip(records).enumerate() {
            if let Err(e) = shapes.add_shape(geometry, values) {
                log::warn!("skipping feature {index} of '{}': {e}", path.display());
            }
        }
        log::debug!(
            "loaded {} shape(s) from '{}'",
            shapes.shape_count(),
            path.display()
        );
        Ok(Handle::new(shapes))
    }

    fn open_grid(&self, path: &Path) -> Result<Handle<Grid>> {
        let dataset = open(path)?;
        let (cols, rows) = dataset.raster_size();
        let system = GridSystem::from_geo_transform(&dataset.geo_transform()?, (cols, rows))?;
        let band = dataset.rasterband(1)?;
        let buffer = band.read_as::<f64>((0, 0), (cols, rows), (cols, rows), None)?;

        // GDAL rows run north to south, grid rows south to north
        let values = buffer
            .data()
            .chunks(cols)
            .rev()
            .flatten()
            .copied()
            .collect();
        let mut grid =
            Grid::from_values(&layer_name(path), system, values)?.with_crs(crs_from(dataset.spatial_ref().ok()));
        if let Some(no_data) = band.no_data_value() {
            grid = grid.with_no_data(no_data);
        }
        Ok(Handle::new(grid))
    }

    fn release(&self, object: DataObject) {
        log::debug!("releasing {} '{}'", object.object_type(), object.name());
    }
}

/// "Create Virtual Raster (VRT)" on top of `gdalbuildvrt`.
///
/// Takes the quoted file list in `FILES` and writes the VRT to `VRT_NAME`.
pub struct BuildVrtTool {
    parameters: Parameters,
}

impl BuildVrtTool {
    pub fn new() -> Self {
        BuildVrtTool {
            parameters: Parameters::new()
                .with(Parameter::option("FILES", "Files", OptionType::String, None))
                .with(Parameter::option(
                    "VRT_NAME",
                    "VRT Filename",
                    OptionType::FilePath,
                    None,
                )),
        }
    }

    fn build(&self) -> Result<()> {
        let files = self
            .parameters
            .get("FILES")
            .and_then(|p| p.as_string())
            .map(|files| parse_file_list(&files))
            .unwrap_or_default();
        if files.is_empty() {
            return Err(HelperError::BadArgument("no input files".to_string()));
        }
        let target = self
            .parameters
            .get("VRT_NAME")
            .and_then(|p| p.as_string())
            .map(PathBuf::from)
            .ok_or_else(|| HelperError::BadArgument("no VRT file name".to_string()))?;

        let datasets = files
            .iter()
            .map(PathBuf::as_path)
            .map(open)
            .collect::<Result<Vec<_>>>()?;
        gdal::programs::raster::build_vrt(Some(target.as_path()), &datasets, None)?;
        Ok(())
    }
}

impl Default for BuildVrtTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for BuildVrtTool {
    fn name(&self) -> &str {
        "Create Virtual Raster (VRT)"
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn on_execute(&mut self, _data: &mut DataManager) -> bool {
        match self.build() {
            Ok(()) => true,
            Err(e) => {
                log::error!("{}: {e}", self.name());
                false
            }
        }
    }
}

/// Register the GDAL based tools under their engine identifiers.
pub fn register_tools(registry: &mut ToolRegistry) {
    registry.register("io_gdal", "12", || Box::new(BuildVrtTool::new()));
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use gdal::raster::Buffer;
    use gdal::DriverManager;

    use super::*;
    use crate::context::Context;
    use crate::test_utils::TempFixture;

    fn write_tile(path: &Path, xmin: f64) {
        let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
        let mut dataset = driver
            .create_with_band_type::<f64, _>(path, 4, 3, 1)
            .unwrap();
        dataset
            .set_geo_transform(&[xmin, 10.0, 0.0, 30.0, 0.0, -10.0])
            .unwrap();
        dataset
            .set_spatial_ref(&SpatialRef::from_epsg(32631).unwrap())
            .unwrap();
        let mut band = dataset.rasterband(1).unwrap();
        let mut buffer = Buffer::new((4, 3), (0..12).map(f64::from).collect());
        band.write((0, 0), (4, 3), &mut buffer).unwrap();
    }

    #[test]
    fn open_grid_flips_rows() {
        let fixture = TempFixture::empty();
        let path = fixture.path().join("tile.tif");
        write_tile(&path, 100.0);

        let grid = GdalStore::new().open_grid(&path).unwrap();
        let grid = grid.borrow();
        assert_eq!(grid.name(), "tile");
        assert_eq!(grid.crs().epsg(), Some(32631));
        assert_eq!(*grid.system(), GridSystem::new(4, 3, 10.0, 100.0, 0.0).unwrap());
        // northwest cell of the raster is the last row of the grid
        assert_eq!(grid.value(0, 2), Some(0.0));
        assert_eq!(grid.value(3, 0), Some(11.0));
    }

    #[test]
    fn builds_vrt_from_tiles() {
        let fixture = TempFixture::empty();
        write_tile(&fixture.path().join("a.tif"), 0.0);
        write_tile(&fixture.path().join("b.tif"), 40.0);

        let mut registry = ToolRegistry::new();
        register_tools(&mut registry);
        let ctx = Context::new(Rc::new(registry), Rc::new(GdalStore::new()));

        let vrt = crate::mosaic::build_mosaic(&ctx, fixture.path(), "tif", "tiles", None).unwrap();
        let grid = ctx.store().open_grid(&vrt).unwrap();
        assert_eq!(grid.borrow().system().nx, 8);
    }

    #[test]
    fn mixed_geometries() {
        let fixture = TempFixture::empty();
        let path = fixture.path().join("wells.geojson");
        std::fs::write(
            &path,
            r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature", "properties": { "id": 1 },
      "geometry": { "type": "Point", "coordinates": [4.4, 51.2] } },
    { "type": "Feature", "properties": { "id": 2 },
      "geometry": { "type": "MultiPoint", "coordinates": [[4.5, 51.3], [4.6, 51.4]] } },
    { "type": "Feature", "properties": { "id": 3 },
      "geometry": { "type": "GeometryCollection", "geometries": [
        { "type": "Point", "coordinates": [4.7, 51.5] } ] } }
  ]
}"#,
        )
        .unwrap();

        let shapes = GdalStore::new().open_shapes(&path).unwrap();
        let shapes = shapes.borrow();
        assert_eq!(shapes.shape_type(), ShapeType::Points);
        assert_eq!(shapes.shape_count(), 2);
        assert!(shapes.crs().is_okay());
    }

    #[test]
    fn layer_type_of_geometries() {
        use geo_types::{line_string, point, MultiPoint};

        let point: Geometry<f64> = point!(x: 0.0, y: 0.0).into();
        let points: Geometry<f64> = MultiPoint::from(vec![(1.0, 1.0), (2.0, 2.0)]).into();
        let line: Geometry<f64> = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)].into();

        assert_eq!(layer_shape_type(&[]), ShapeType::Polygon);
        assert_eq!(layer_shape_type(&[point.clone(), point.clone()]), ShapeType::Point);
        assert_eq!(layer_shape_type(&[point.clone(), points.clone()]), ShapeType::Points);
        assert_eq!(layer_shape_type(&[points, point.clone()]), ShapeType::Points);
        assert_eq!(layer_shape_type(&[line, point]), ShapeType::Line);
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            GdalStore::new().open_grid(Path::new("/no/such/file.tif")),
            Err(HelperError::OpenFailed { .. })
        ));
    }
}
