//! Tools: named, parameterized algorithms provided by tool libraries.
//!
//! Tools are created through a [`ToolLibraryManager`] and handed back to it
//! for destruction. [`ToolInstance`] pairs both steps, and [`ToolWrapper`]
//! drives a tool through staging, execution and result harvesting.

pub use crate::tool::parameter::{
    OptionType, Parameter, ParameterFlags, ParameterKind, ParameterValue, Parameters, Value,
};
pub use crate::tool::registry::{ToolFactory, ToolInstance, ToolLibraryManager, ToolRegistry};
pub use crate::tool::wrapper::{Input, OutputTarget, ToolState, ToolWrapper, Verbosity};

use crate::data::DataManager;

mod parameter;
mod registry;
mod wrapper;

#[cfg(test)]
mod tests;

/// A parameterized algorithm.
///
/// Implementors provide the parameter set and [`Tool::on_execute`]; the
/// remaining methods have defaults.
pub trait Tool {
    fn name(&self) -> &str;

    fn parameters(&self) -> &Parameters;

    fn parameters_mut(&mut self) -> &mut Parameters;

    /// Runs the algorithm. Inputs are registered with `data`; objects the
    /// tool creates should be registered there too.
    fn on_execute(&mut self, data: &mut DataManager) -> bool;

    /// Called before parameters are bound for an execution. Returning
    /// `false` cancels the execution.
    fn on_before_execution(&mut self) -> bool {
        true
    }

    /// Called after [`Tool::execute`], whatever its outcome.
    fn on_after_execution(&mut self) {}

    /// Checks that every mandatory input is set, then runs the algorithm.
    fn execute(&mut self, data: &mut DataManager) -> bool {
        let missing: Vec<&str> = self
            .parameters()
            .iter()
            .filter(|p| p.is_missing())
            .map(|p| p.id())
            .collect();
        if !missing.is_empty() {
            log::error!(
                "{}: missing mandatory input(s) {}",
                self.name(),
                missing.join(", ")
            );
            return false;
        }
        self.on_execute(data)
    }

    /// Restores all parameters to their defaults.
    fn reset(&mut self) {
        self.parameters_mut().restore_defaults();
    }
}
