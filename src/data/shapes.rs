use geo_types::{Coord, Geometry};

use crate::data::table::{FieldDefn, FieldValue, Table, Tabular};
use crate::errors::*;
use crate::geo_transform::Extent;
use crate::spatial_ref::Crs;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeType {
    Point,
    Points,
    Line,
    Polygon,
}

impl ShapeType {
    fn accepts(&self, geometry: &Geometry<f64>) -> bool {
        matches!(
            (self, geometry),
            (ShapeType::Point, Geometry::Point(_))
                | (ShapeType::Points, Geometry::Point(_) | Geometry::MultiPoint(_))
                | (
                    ShapeType::Line,
                    Geometry::LineString(_) | Geometry::MultiLineString(_)
                )
                | (
                    ShapeType::Polygon,
                    Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::Rect(_)
                )
        )
    }
}

/// Vector layer: geometries of one [`ShapeType`] plus an attribute table
/// with one record per shape.
#[derive(Clone, Debug)]
pub struct Shapes {
    shape_type: ShapeType,
    crs: Crs,
    geometries: Vec<Geometry<f64>>,
    attributes: Table,
}

impl Shapes {
    pub fn new(name: &str, shape_type: ShapeType) -> Shapes {
        Shapes {
            shape_type,
            crs: Crs::undefined(),
            geometries: Vec::new(),
            attributes: Table::new(name),
        }
    }

    pub fn with_crs(mut self, crs: Crs) -> Shapes {
        self.crs = crs;
        self
    }

    pub fn name(&self) -> &str {
        self.attributes.name()
    }

    pub fn set_name(&mut self, name: &str) {
        self.attributes.set_name(name);
    }

    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn set_crs(&mut self, crs: Crs) {
        self.crs = crs;
    }

    pub fn attributes(&self) -> &Table {
        &self.attributes
    }

    pub fn add_field(&mut self, defn: FieldDefn) {
        self.attributes.add_field(defn);
    }

    /// Append a shape together with its attribute values.
    pub fn add_shape(&mut self, geometry: Geometry<f64>, values: Vec<FieldValue>) -> Result<usize> {
        if !self.shape_type.accepts(&geometry) {
            return Err(HelperError::BadArgument(format!(
                "geometry does not fit a {:?} layer",
                self.shape_type
            )));
        }
        let index = self.attributes.add_record(values)?;
        self.geometries.push(geometry);
        Ok(index)
    }

    pub fn shape_count(&self) -> usize {
        self.geometries.len()
    }

    pub fn shape(&self, index: usize) -> Option<&Geometry<f64>> {
        self.geometries.get(index)
    }

    /// Bounding box of all shapes, `None` when the layer is empty.
    pub fn extent(&self) -> Option<Extent> {
        let mut coords = self.geometries.iter().flat_map(geometry_coords);
        let first = coords.next()?;
        let mut extent = Extent::new(first.x, first.x, first.y, first.y);
        for c in coords {
            extent.union(&Extent::new(c.x, c.x, c.y, c.y));
        }
        Some(extent)
    }
}

fn geometry_coords(geometry: &Geometry<f64>) -> Vec<Coord<f64>> {
    match geometry {
        Geometry::Point(p) => vec![p.0],
        Geometry::Line(l) => vec![l.start, l.end],
        Geometry::LineString(ls) => ls.0.clone(),
        Geometry::Polygon(p) => p.exterior().0.clone(),
        Geometry::MultiPoint(mp) => mp.iter().map(|p| p.0).collect(),
        Geometry::MultiLineString(mls) => mls.iter().flat_map(|ls| ls.0.iter().copied()).collect(),
        Geometry::MultiPolygon(mp) => mp
            .iter()
            .flat_map(|p| p.exterior().0.iter().copied())
            .collect(),
        Geometry::Rect(r) => vec![r.min(), r.max()],
        Geometry::Triangle(t) => t.to_array().to_vec(),
        Geometry::GeometryCollection(gc) => gc.iter().flat_map(geometry_coords).collect(),
    }
}

impl Tabular for Shapes {
    fn table_name(&self) -> &str {
        self.attributes.name()
    }

    fn fields(&self) -> &[FieldDefn] {
        self.attributes.fields()
    }

    fn record_count(&self) -> usize {
        self.attributes.record_count()
    }

    fn value(&self, record: usize, field: usize) -> Option<&FieldValue> {
        self.attributes.value(record, field)
    }
}
