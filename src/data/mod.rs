//! Data objects handed between the helpers and the engine.
//!
//! The engine owns the objects; this layer only holds [`Handle`]s to them.
//! [`DataObject`] is the type-erased form used by tool parameters.

use std::cell::Ref;
use std::fmt::{self, Display, Formatter};

pub use crate::data::grid::{Grid, GridSystem};
pub use crate::data::grids::Grids;
pub use crate::data::handle::Handle;
pub use crate::data::manager::DataManager;
pub use crate::data::point_cloud::PointCloud;
pub use crate::data::shapes::{ShapeType, Shapes};
pub use crate::data::store::{DataStore, MemoryStore};
pub use crate::data::table::{FieldDefn, FieldType, FieldValue, Table, Tabular};
pub use crate::data::tin::Tin;

use crate::errors::*;
use crate::spatial_ref::Crs;

mod grid;
mod grids;
mod handle;
mod manager;
mod point_cloud;
mod shapes;
mod store;
mod table;
mod tin;

/// Caller owned list receiving the items of a list output.
pub type DataList = Handle<Vec<DataObject>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Grid,
    Grids,
    Table,
    Shapes,
    PointCloud,
    Tin,
}

impl ObjectType {
    /// Whether a parameter expecting `self` can take an object of type `found`.
    ///
    /// Shapes and point clouds carry attribute tables and are accepted
    /// wherever a table is expected.
    pub fn accepts(&self, found: ObjectType) -> bool {
        *self == found
            || (*self == ObjectType::Table
                && matches!(found, ObjectType::Shapes | ObjectType::PointCloud))
    }
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectType::Grid => "Grid",
            ObjectType::Grids => "Grids",
            ObjectType::Table => "Table",
            ObjectType::Shapes => "Shapes",
            ObjectType::PointCloud => "Point Cloud",
            ObjectType::Tin => "TIN",
        };
        f.write_str(name)
    }
}

/// Type-erased handle to any data object.
#[derive(Clone, Debug)]
pub enum DataObject {
    Grid(Handle<Grid>),
    Grids(Handle<Grids>),
    Table(Handle<Table>),
    Shapes(Handle<Shapes>),
    PointCloud(Handle<PointCloud>),
    Tin(Handle<Tin>),
}

impl DataObject {
    pub fn object_type(&self) -> ObjectType {
        match self {
            DataObject::Grid(_) => ObjectType::Grid,
            DataObject::Grids(_) => ObjectType::Grids,
            DataObject::Table(_) => ObjectType::Table,
            DataObject::Shapes(_) => ObjectType::Shapes,
            DataObject::PointCloud(_) => ObjectType::PointCloud,
            DataObject::Tin(_) => ObjectType::Tin,
        }
    }

    pub fn name(&self) -> String {
        match self {
            DataObject::Grid(h) => h.borrow().name().to_string(),
            DataObject::Grids(h) => h.borrow().name().to_string(),
            DataObject::Table(h) => h.borrow().name().to_string(),
            DataObject::Shapes(h) => h.borrow().name().to_string(),
            DataObject::PointCloud(h) => h.borrow().name().to_string(),
            DataObject::Tin(h) => h.borrow().name().to_string(),
        }
    }

    pub fn crs(&self) -> Crs {
        match self {
            DataObject::Grid(h) => h.borrow().crs().clone(),
            DataObject::Grids(h) => h.borrow().crs().clone(),
            DataObject::Table(_) => Crs::undefined(),
            DataObject::Shapes(h) => h.borrow().crs().clone(),
            DataObject::PointCloud(h) => h.borrow().crs().clone(),
            DataObject::Tin(h) => h.borrow().crs().clone(),
        }
    }

    /// Returns `true` if both refer to the same engine object.
    pub fn ptr_eq(&self, other: &DataObject) -> bool {
        match (self, other) {
            (DataObject::Grid(a), DataObject::Grid(b)) => a.ptr_eq(b),
            (DataObject::Grids(a), DataObject::Grids(b)) => a.ptr_eq(b),
            (DataObject::Table(a), DataObject::Table(b)) => a.ptr_eq(b),
            (DataObject::Shapes(a), DataObject::Shapes(b)) => a.ptr_eq(b),
            (DataObject::PointCloud(a), DataObject::PointCloud(b)) => a.ptr_eq(b),
            (DataObject::Tin(a), DataObject::Tin(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Replace the contents of this object with a copy of `source`.
    ///
    /// Both objects must be of the same type. Bands of a grid collection are
    /// copied, not aliased.
    pub fn assign(&self, source: &DataObject) -> Result<()> {
        if self.ptr_eq(source) {
            return Ok(());
        }
        match (self, source) {
            (DataObject::Grid(target), DataObject::Grid(source)) => {
                let copy = source.borrow().clone();
                *target.borrow_mut() = copy;
            }
            (DataObject::Grids(target), DataObject::Grids(source)) => {
                let source = source.borrow();
                let mut copy = Grids::new(source.name());
                copy.set_crs(source.crs().clone());
                for band in source.grids() {
                    copy.add_grid(Handle::new(band.borrow().clone()))?;
                }
                *target.borrow_mut() = copy;
            }
            (DataObject::Table(target), DataObject::Table(source)) => {
                let copy = source.borrow().clone();
                *target.borrow_mut() = copy;
            }
            (DataObject::Shapes(target), DataObject::Shapes(source)) => {
                let copy = source.borrow().clone();
                *target.borrow_mut() = copy;
            }
            (DataObject::PointCloud(target), DataObject::PointCloud(source)) => {
                let copy = source.borrow().clone();
                *target.borrow_mut() = copy;
            }
            (DataObject::Tin(target), DataObject::Tin(source)) => {
                let copy = source.borrow().clone();
                *target.borrow_mut() = copy;
            }
            _ => {
                return Err(HelperError::TypeMismatch {
                    expected: self.object_type(),
                    found: source.object_type(),
                })
            }
        }
        Ok(())
    }

    /// Table view of this object, `None` for objects without attributes.
    pub fn as_tabular(&self) -> Option<Ref<'_, dyn Tabular>> {
        match self {
            DataObject::Table(h) => Some(Ref::map(h.borrow(), |t| t as &dyn Tabular)),
            DataObject::Shapes(h) => Some(Ref::map(h.borrow(), |t| t as &dyn Tabular)),
            DataObject::PointCloud(h) => Some(Ref::map(h.borrow(), |t| t as &dyn Tabular)),
            DataObject::Grid(_) | DataObject::Grids(_) | DataObject::Tin(_) => None,
        }
    }

    pub fn as_grid(&self) -> Option<&Handle<Grid>> {
        match self {
            DataObject::Grid(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_grids(&self) -> Option<&Handle<Grids>> {
        match self {
            DataObject::Grids(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Handle<Table>> {
        match self {
            DataObject::Table(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_shapes(&self) -> Option<&Handle<Shapes>> {
        match self {
            DataObject::Shapes(h) => Some(h),
            _ => None,
        }
    }
}

macro_rules! impl_from_handle {
    ($($variant:ident),*) => {
        $(
            impl From<Handle<$variant>> for DataObject {
                fn from(handle: Handle<$variant>) -> Self {
                    DataObject::$variant(handle)
                }
            }
        )*
    };
}

impl_from_handle!(Grid, Grids, Table, Shapes, PointCloud, Tin);
