use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::context::Context;
use crate::data::{DataList, DataManager, DataObject, Grid, Grids, Handle, PointCloud, Shapes, Table, Tin};
use crate::errors::*;
use crate::tool::{ParameterKind, Tool, ToolInstance, Value};
use crate::ui::{Messenger, UiLock};

/// How much a [`ToolWrapper`] reports while executing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// UI locked during execution, no status line.
    Silent,
    /// UI locked during execution, one status line afterwards.
    Status,
    /// Tool messages and progress shown, plus the status line.
    Full,
}

impl Display for Verbosity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verbosity::Silent => "silent",
            Verbosity::Status => "status",
            Verbosity::Full => "full",
        })
    }
}

impl FromStr for Verbosity {
    type Err = HelperError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "silent" => Ok(Verbosity::Silent),
            "1" | "status" => Ok(Verbosity::Status),
            "2" | "full" => Ok(Verbosity::Full),
            _ => Err(HelperError::BadArgument(format!(
                "Invalid verbosity: '{s}'"
            ))),
        }
    }
}

/// Lifecycle of a [`ToolWrapper`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolState {
    /// The tool could not be resolved. Terminal.
    Unbound,
    /// Tool acquired, nothing staged.
    Ready,
    /// Inputs, outputs or options are staged.
    Configuring,
    /// Set from binding until the outputs are harvested. `execute` holds the
    /// wrapper mutably, so callers only see it through a tool hook.
    Executing,
    Succeeded,
    Failed,
    /// Tool handed back to its manager. Terminal.
    Released,
}

/// Data staged for an input parameter.
#[derive(Clone, Debug)]
pub enum Input {
    Object(DataObject),
    List(Vec<DataObject>),
}

impl From<DataObject> for Input {
    fn from(object: DataObject) -> Self {
        Input::Object(object)
    }
}

impl From<Vec<DataObject>> for Input {
    fn from(items: Vec<DataObject>) -> Self {
        Input::List(items)
    }
}

macro_rules! impl_input_from_handle {
    ($($object:ident),*) => {
        $(
            impl From<Handle<$object>> for Input {
                fn from(handle: Handle<$object>) -> Self {
                    Input::Object(handle.into())
                }
            }
        )*
    };
}

impl_input_from_handle!(Grid, Grids, Table, Shapes, PointCloud, Tin);

/// Where the result of an output parameter goes.
#[derive(Clone, Debug)]
pub enum OutputTarget {
    /// Copy the created object into this caller owned object on success.
    Object(DataObject),
    /// Let the tool create the output, then drop it.
    Discard,
    /// Append the created items of a list output on success.
    List(DataList),
}

struct StagedInput {
    id: String,
    input: Input,
}

struct StagedOutput {
    id: String,
    target: OutputTarget,
}

struct StagedOption {
    id: String,
    value: Value,
}

/// Runs a single tool: stage inputs, outputs and options, then [`execute`].
///
/// A wrapper whose tool could not be resolved stays [`ToolState::Unbound`];
/// every call on it is a no-op returning `false`. After each execution the
/// staged bindings are cleared and the tool is reset, so the same wrapper
/// can run again with fresh bindings. The tool is handed back to its manager
/// by [`ToolWrapper::destroy`] or when the wrapper is dropped.
///
/// ```
/// # use std::rc::Rc;
/// # use saga_helpers::{data::MemoryStore, tool::{ToolRegistry, ToolWrapper, ToolState}, Context};
/// let ctx = Context::new(Rc::new(ToolRegistry::new()), Rc::new(MemoryStore::new()));
/// let mut wrapper = ToolWrapper::new(&ctx, "grid_tools", "0", "Resampling");
/// assert_eq!(wrapper.state(), ToolState::Unbound);
/// assert!(!wrapper.set_option("SCALE_UP", 5));
/// assert!(!wrapper.execute());
/// ```
///
/// [`execute`]: ToolWrapper::execute
pub struct ToolWrapper<'a> {
    ctx: &'a Context,
    tool: Option<ToolInstance<'a>>,
    data: DataManager,
    inputs: Vec<StagedInput>,
    outputs: Vec<StagedOutput>,
    options: Vec<StagedOption>,
    verbosity: Verbosity,
    state: ToolState,
}

impl<'a> ToolWrapper<'a> {
    /// Request tool `tool` of `library`. `expected` names the tool in the
    /// error message emitted when it cannot be resolved.
    pub fn new(ctx: &'a Context, library: &str, tool: &str, expected: &str) -> Self {
        let tool = ToolInstance::create(ctx.tools(), library, tool);
        let state = match tool {
            Some(_) => ToolState::Ready,
            None => {
                ctx.messenger()
                    .error(&format!("failed to request tool: {expected}"));
                ToolState::Unbound
            }
        };
        ToolWrapper {
            ctx,
            tool,
            data: DataManager::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            options: Vec::new(),
            verbosity: ctx.config().verbosity,
            state,
        }
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn is_okay(&self) -> bool {
        self.tool.is_some()
    }

    pub fn state(&self) -> ToolState {
        self.state
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn tool_name(&self) -> Option<&str> {
        self.tool.as_deref().map(|tool| tool.name())
    }

    /// Number of bindings currently staged (inputs, outputs, options).
    pub fn staged(&self) -> (usize, usize, usize) {
        (self.inputs.len(), self.outputs.len(), self.options.len())
    }

    /// Stage `input` for the input parameter `id`.
    ///
    /// Returns `false`, staging nothing, if the wrapper is not usable, the
    /// parameter is unknown or not a data object input, or a list is given
    /// for a single object parameter.
    pub fn set_input(&mut self, id: &str, input: impl Into<Input>) -> bool {
        let Some(tool) = self.tool.as_deref() else {
            return false;
        };
        let input = input.into();
        let accepted = match tool.parameters().get(id) {
            Some(p) if p.is_input() && p.is_data_object() => matches!(input, Input::Object(_)),
            Some(p) if p.is_input() && p.is_data_object_list() => true,
            _ => false,
        };
        if !accepted {
            log::warn!("{}: ignoring input for parameter '{id}'", tool.name());
            return false;
        }
        self.inputs.push(StagedInput {
            id: id.to_string(),
            input,
        });
        self.state = ToolState::Configuring;
        true
    }

    /// Stage `target` as destination of the output parameter `id`.
    ///
    /// An object target must be of the type the parameter produces.
    pub fn set_output(&mut self, id: &str, target: OutputTarget) -> bool {
        let Some(tool) = self.tool.as_deref() else {
            return false;
        };
        let accepted = match (tool.parameters().get(id), &target) {
            (Some(p), OutputTarget::Object(object)) => {
                p.is_output()
                    && matches!(p.kind(), ParameterKind::DataObject(expected) if expected.accepts(object.object_type()))
            }
            (Some(p), OutputTarget::Discard) => p.is_output() && p.is_data_object(),
            (Some(p), OutputTarget::List(_)) => p.is_output() && p.is_data_object_list(),
            (None, _) => false,
        };
        if !accepted {
            log::warn!("{}: ignoring output for parameter '{id}'", tool.name());
            return false;
        }
        self.outputs.push(StagedOutput {
            id: id.to_string(),
            target,
        });
        self.state = ToolState::Configuring;
        true
    }

    /// Stage an option value. The value is checked when the tool executes.
    pub fn set_option(&mut self, id: &str, value: impl Into<Value>) -> bool {
        let Some(tool) = self.tool.as_deref() else {
            return false;
        };
        if !tool.parameters().get(id).is_some_and(|p| p.is_option()) {
            log::warn!("{}: ignoring option '{id}'", tool.name());
            return false;
        }
        self.options.push(StagedOption {
            id: id.to_string(),
            value: value.into(),
        });
        self.state = ToolState::Configuring;
        true
    }

    /// Bind everything staged, run the tool and harvest its outputs.
    ///
    /// Staged bindings are cleared and the tool is reset afterwards, whether
    /// the run succeeded or not.
    pub fn execute(&mut self) -> bool {
        let ctx = self.ctx;
        let messenger = ctx.messenger();
        let Some(tool) = self.tool.as_deref_mut() else {
            return false;
        };

        // an outer caller holding the UI lock wants silence
        let verbosity = if messenger.is_locked() {
            Verbosity::Silent
        } else {
            self.verbosity
        };

        self.state = ToolState::Executing;
        let success = {
            let _lock = (verbosity < Verbosity::Full).then(|| UiLock::new(messenger));
            let success = run(
                tool,
                &mut self.data,
                &self.inputs,
                &self.outputs,
                &self.options,
                messenger,
            );
            harvest(tool, &mut self.data, &self.outputs, success, messenger)
        };

        let name = tool.name().to_string();
        self.inputs.clear();
        self.outputs.clear();
        self.options.clear();
        self.data.clear();
        tool.reset();

        if !success {
            messenger.error(&format!("failed to execute tool: {name}"));
        }
        if verbosity >= Verbosity::Status {
            let outcome = if success { "succeeded" } else { "failed" };
            messenger.message(&format!("{name}: {outcome}"));
        }
        self.state = if success {
            ToolState::Succeeded
        } else {
            ToolState::Failed
        };
        success
    }

    /// Hand the tool back to its manager and drop all staged bindings.
    /// Calling this more than once is harmless.
    pub fn destroy(&mut self) {
        if self.tool.take().is_some() {
            self.state = ToolState::Released;
        }
        self.inputs.clear();
        self.outputs.clear();
        self.options.clear();
        self.data.clear();
    }
}

impl Drop for ToolWrapper<'_> {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn run(
    tool: &mut dyn Tool,
    data: &mut DataManager,
    inputs: &[StagedInput],
    outputs: &[StagedOutput],
    options: &[StagedOption],
    messenger: &dyn Messenger,
) -> bool {
    if !tool.on_before_execution() {
        log::debug!("{}: cancelled before execution", tool.name());
        return false;
    }

    // Some options only become valid once their inputs are bound, so every
    // option is applied once before and once after binding the inputs.
    for option in options {
        if let Err(e) = tool.parameters_mut().set_value(&option.id, option.value.clone()) {
            log::debug!("{}: first pass, option '{}': {e}", tool.name(), option.id);
        }
    }

    let bound = bind_inputs(tool, data, inputs)
        .and_then(|_| apply_options(tool, options))
        .and_then(|_| bind_outputs(tool, outputs));
    let success = match bound {
        Ok(()) => tool.execute(data),
        Err(e) => {
            messenger.error(&format!("{}: {e}", tool.name()));
            false
        }
    };
    tool.on_after_execution();
    success
}

fn bind_inputs(tool: &mut dyn Tool, data: &mut DataManager, inputs: &[StagedInput]) -> Result<()> {
    for staged in inputs {
        match &staged.input {
            Input::Object(object) => {
                if tool.parameters().get(&staged.id).is_some_and(|p| p.is_data_object_list()) {
                    tool.parameters_mut()
                        .add_list_item(&staged.id, object.clone())?;
                } else {
                    tool.parameters_mut().set_object(&staged.id, object.clone())?;
                }
                data.add(object.clone());
            }
            Input::List(items) => {
                for item in items {
                    tool.parameters_mut().add_list_item(&staged.id, item.clone())?;
                    data.add(item.clone());
                }
            }
        }
        log::debug!("{}: bound input '{}'", tool.name(), staged.id);
    }
    Ok(())
}

fn apply_options(tool: &mut dyn Tool, options: &[StagedOption]) -> Result<()> {
    for option in options {
        tool.parameters_mut()
            .set_value(&option.id, option.value.clone())?;
    }
    Ok(())
}

fn bind_outputs(tool: &mut dyn Tool, outputs: &[StagedOutput]) -> Result<()> {
    for staged in outputs {
        if let OutputTarget::Object(_) | OutputTarget::Discard = staged.target {
            tool.parameters_mut().set_create(&staged.id)?;
        }
    }
    Ok(())
}

/// Move results into their targets and drop everything else the run
/// registered. Single objects are copied first; list items are appended
/// only if the run and every copy succeeded. Returns the final outcome.
fn harvest(
    tool: &mut dyn Tool,
    data: &mut DataManager,
    outputs: &[StagedOutput],
    success: bool,
    messenger: &dyn Messenger,
) -> bool {
    let mut success = success;
    for staged in outputs {
        let Some(result) = tool.parameters().get(&staged.id).and_then(|p| p.as_object()) else {
            continue;
        };
        if let (true, OutputTarget::Object(target)) = (success, &staged.target) {
            if let Err(e) = target.assign(result) {
                messenger.error(&format!("{}: output '{}': {e}", tool.name(), staged.id));
                success = false;
            }
        }
        data.remove(result);
        log::debug!("{}: harvested output '{}'", tool.name(), staged.id);
    }

    for staged in outputs {
        let (OutputTarget::List(list), Some(parameter)) =
            (&staged.target, tool.parameters().get(&staged.id))
        else {
            continue;
        };
        for item in parameter.as_list() {
            if success {
                list.borrow_mut().push(item.clone());
            }
            data.remove(item);
        }
        log::debug!("{}: harvested output list '{}'", tool.name(), staged.id);
    }
    success
}
