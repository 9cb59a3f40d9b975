use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::data::{DataObject, Grid, Handle, Shapes};
use crate::errors::*;

/// Loads datasets from files.
///
/// Every object handed out by `open_*` is released through [`DataStore::release`]
/// once the caller no longer needs it.
pub trait DataStore {
    fn open_shapes(&self, path: &Path) -> Result<Handle<Shapes>>;

    fn open_grid(&self, path: &Path) -> Result<Handle<Grid>>;

    fn release(&self, object: DataObject);
}

/// A [`DataStore`] serving datasets registered in memory under a path.
///
/// Each `open_*` call returns a fresh copy of the registered object, as a
/// file based store would. Open and release calls are counted.
#[derive(Default)]
pub struct MemoryStore {
    objects: RefCell<HashMap<PathBuf, DataObject>>,
    opened: Cell<usize>,
    released: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<P: AsRef<Path>>(&self, path: P, object: impl Into<DataObject>) {
        self.objects
            .borrow_mut()
            .insert(path.as_ref().to_path_buf(), object.into());
    }

    pub fn opened(&self) -> usize {
        self.opened.get()
    }

    pub fn released(&self) -> usize {
        self.released.get()
    }

    fn lookup(&self, path: &Path) -> Result<DataObject> {
        self.objects
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| HelperError::OpenFailed {
                path: path.to_path_buf(),
                msg: "no such dataset".to_string(),
            })
    }
}

impl DataStore for MemoryStore {
    fn open_shapes(&self, path: &Path) -> Result<Handle<Shapes>> {
        match self.lookup(path)? {
            DataObject::Shapes(shapes) => {
                self.opened.set(self.opened.get() + 1);
                Ok(Handle::new(shapes.borrow().clone()))
            }
            other => Err(HelperError::OpenFailed {
                path: path.to_path_buf(),
                msg: format!("expected vector data, found {}", other.object_type()),
            }),
        }
    }

    fn open_grid(&self, path: &Path) -> Result<Handle<Grid>> {
        match self.lookup(path)? {
            DataObject::Grid(grid) => {
                self.opened.set(self.opened.get() + 1);
                Ok(Handle::new(grid.borrow().clone()))
            }
            other => Err(HelperError::OpenFailed {
                path: path.to_path_buf(),
                msg: format!("expected raster data, found {}", other.object_type()),
            }),
        }
    }

    fn release(&self, object: DataObject) {
        log::debug!("releasing {} '{}'", object.object_type(), object.name());
        self.released.set(self.released.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{GridSystem, ShapeType};

    #[test]
    fn open_returns_copies() {
        let store = MemoryStore::new();
        let system = GridSystem::new(1, 1, 1.0, 0.0, 0.0).unwrap();
        store.insert("dem.sgrd", Handle::new(Grid::new("dem", system)));

        let a = store.open_grid(Path::new("dem.sgrd")).unwrap();
        let b = store.open_grid(Path::new("dem.sgrd")).unwrap();
        assert!(!a.ptr_eq(&b));
        assert_eq!(store.opened(), 2);

        store.release(a.into());
        assert_eq!(store.released(), 1);
    }

    #[test]
    fn open_checks_kind() {
        let store = MemoryStore::new();
        store.insert("roads.shp", Handle::new(Shapes::new("roads", ShapeType::Line)));
        assert!(store.open_grid(Path::new("roads.shp")).is_err());
        assert!(store.open_shapes(Path::new("missing.shp")).is_err());
        assert_eq!(store.opened(), 0);
    }
}
