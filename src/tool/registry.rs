use std::cell::Cell;
use std::collections::HashMap;
use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};

use crate::tool::Tool;

/// Creates and destroys tool instances.
pub trait ToolLibraryManager {
    /// Create a new instance of `tool` from `library`, `None` if unknown.
    fn create_tool(&self, library: &str, tool: &str) -> Option<Box<dyn Tool>>;

    /// Destroy an instance obtained from [`ToolLibraryManager::create_tool`].
    fn delete_tool(&self, tool: Box<dyn Tool>) -> bool;
}

pub type ToolFactory = Box<dyn Fn() -> Box<dyn Tool>>;

/// A [`ToolLibraryManager`] backed by registered factories.
#[derive(Default)]
pub struct ToolRegistry {
    factories: HashMap<(String, String), ToolFactory>,
    live: Cell<usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` as tool `tool` of `library`, replacing any
    /// previous registration.
    pub fn register<F>(&mut self, library: &str, tool: &str, factory: F)
    where
        F: Fn() -> Box<dyn Tool> + 'static,
    {
        self.factories
            .insert((library.to_string(), tool.to_string()), Box::new(factory));
    }

    /// Number of instances created and not yet deleted.
    pub fn live_tools(&self) -> usize {
        self.live.get()
    }
}

impl ToolLibraryManager for ToolRegistry {
    fn create_tool(&self, library: &str, tool: &str) -> Option<Box<dyn Tool>> {
        let factory = self
            .factories
            .get(&(library.to_string(), tool.to_string()))?;
        self.live.set(self.live.get() + 1);
        Some(factory())
    }

    fn delete_tool(&self, tool: Box<dyn Tool>) -> bool {
        log::debug!("deleting tool instance '{}'", tool.name());
        self.live.set(self.live.get().saturating_sub(1));
        true
    }
}

/// A tool instance that is handed back to its manager when dropped.
pub struct ToolInstance<'a> {
    tool: ManuallyDrop<Box<dyn Tool>>,
    manager: &'a dyn ToolLibraryManager,
}

impl<'a> ToolInstance<'a> {
    pub fn create(manager: &'a dyn ToolLibraryManager, library: &str, tool: &str) -> Option<Self> {
        let tool = manager.create_tool(library, tool)?;
        Some(ToolInstance {
            tool: ManuallyDrop::new(tool),
            manager,
        })
    }
}

impl Deref for ToolInstance<'_> {
    type Target = dyn Tool;

    fn deref(&self) -> &Self::Target {
        &**self.tool
    }
}

impl DerefMut for ToolInstance<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut **self.tool
    }
}

impl Drop for ToolInstance<'_> {
    fn drop(&mut self) {
        // `tool` is never touched again after this.
        let tool = unsafe { ManuallyDrop::take(&mut self.tool) };
        self.manager.delete_tool(tool);
    }
}
