use crate::data::DataObject;

/// Data objects registered with a single tool instance.
///
/// Inputs are added before a tool runs so that the engine can resolve them.
/// Outputs the engine creates while running are registered here as well,
/// and are gone once removed unless the caller kept a handle.
#[derive(Debug, Default)]
pub struct DataManager {
    objects: Vec<DataObject>,
}

impl DataManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `object`. Returns `false` if it is already registered.
    pub fn add(&mut self, object: DataObject) -> bool {
        if self.contains(&object) {
            return false;
        }
        self.objects.push(object);
        true
    }

    pub fn contains(&self, object: &DataObject) -> bool {
        self.objects.iter().any(|o| o.ptr_eq(object))
    }

    /// Drop the registration of `object`. Returns `false` if it was not registered.
    pub fn remove(&mut self, object: &DataObject) -> bool {
        let count = self.objects.len();
        self.objects.retain(|o| !o.ptr_eq(object));
        self.objects.len() != count
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Handle, Table};

    #[test]
    fn add_and_remove_by_identity() {
        let a: DataObject = Handle::new(Table::new("a")).into();
        let twin: DataObject = Handle::new(Table::new("a")).into();
        let mut manager = DataManager::new();

        assert!(manager.add(a.clone()));
        assert!(!manager.add(a.clone()));
        assert!(manager.add(twin.clone()));
        assert_eq!(manager.len(), 2);

        assert!(manager.remove(&a));
        assert!(!manager.remove(&a));
        assert!(manager.contains(&twin));
        manager.clear();
        assert!(manager.is_empty());
    }
}
