use crate::data::table::{FieldDefn, FieldValue, Table, Tabular};
use crate::errors::*;
use crate::geo_transform::Extent;
use crate::spatial_ref::Crs;

/// Point cloud with x/y/z coordinates and per-point attributes.
#[derive(Clone, Debug)]
pub struct PointCloud {
    crs: Crs,
    points: Vec<[f64; 3]>,
    attributes: Table,
}

impl PointCloud {
    pub fn new(name: &str) -> PointCloud {
        PointCloud {
            crs: Crs::undefined(),
            points: Vec::new(),
            attributes: Table::new(name),
        }
    }

    pub fn with_crs(mut self, crs: Crs) -> PointCloud {
        self.crs = crs;
        self
    }

    pub fn name(&self) -> &str {
        self.attributes.name()
    }

    pub fn set_name(&mut self, name: &str) {
        self.attributes.set_name(name);
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn add_field(&mut self, defn: FieldDefn) {
        self.attributes.add_field(defn);
    }

    pub fn add_point(&mut self, x: f64, y: f64, z: f64, values: Vec<FieldValue>) -> Result<usize> {
        let index = self.attributes.add_record(values)?;
        self.points.push([x, y, z]);
        Ok(index)
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn point(&self, index: usize) -> Option<[f64; 3]> {
        self.points.get(index).copied()
    }

    pub fn extent(&self) -> Option<Extent> {
        let (first, rest) = self.points.split_first()?;
        let mut extent = Extent::new(first[0], first[0], first[1], first[1]);
        for p in rest {
            extent.union(&Extent::new(p[0], p[0], p[1], p[1]));
        }
        Some(extent)
    }
}

impl Tabular for PointCloud {
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
