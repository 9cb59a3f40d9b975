use std::rc::Rc;

use crate::config::HelperConfig;
use crate::data::DataStore;
use crate::tool::ToolLibraryManager;
use crate::ui::{LogMessenger, Messenger};

/// The engine services the helpers run against.
///
/// ```
/// use std::rc::Rc;
/// use saga_helpers::{data::MemoryStore, tool::ToolRegistry, ui::RecordingMessenger, Context};
///
/// let messenger = Rc::new(RecordingMessenger::new());
/// let ctx = Context::new(Rc::new(ToolRegistry::new()), Rc::new(MemoryStore::new()))
///     .with_messenger(messenger.clone());
///
/// ctx.messenger().error("something went wrong");
/// assert_eq!(messenger.errors(), ["something went wrong"]);
/// ```
#[derive(Clone)]
pub struct Context {
    tools: Rc<dyn ToolLibraryManager>,
    store: Rc<dyn DataStore>,
    messenger: Rc<dyn Messenger>,
    config: HelperConfig,
}

impl Context {
    /// Context logging through [`LogMessenger`] with the default configuration.
    pub fn new(tools: Rc<dyn ToolLibraryManager>, store: Rc<dyn DataStore>) -> Self {
        Context {
            tools,
            store,
            messenger: Rc::new(LogMessenger::new()),
            config: HelperConfig::default(),
        }
    }

    pub fn with_messenger(mut self, messenger: Rc<dyn Messenger>) -> Self {
        self.messenger = messenger;
        self
    }

    pub fn with_config(mut self, config: HelperConfig) -> Self {
        self.config = config;
        self
    }

    pub fn tools(&self) -> &dyn ToolLibraryManager {
        &*self.tools
    }

    pub fn store(&self) -> &dyn DataStore {
        &*self.store
    }

    pub fn messenger(&self) -> &dyn Messenger {
        &*self.messenger
    }

    pub fn config(&self) -> &HelperConfig {
        &self.config
    }

    /// Report `err` through the messenger and hand it back.
    pub(crate) fn report<E: std::fmt::Display>(&self, err: E) -> E {
        self.messenger.error(&err.to_string());
        err
    }
}
