use std::cell::Cell;
use std::rc::Rc;

use test_log::test;

use crate::context::Context;
use crate::data::{
    DataManager, DataObject, FieldDefn, FieldType, Grid, GridSystem, Handle, MemoryStore,
    ObjectType, Table,
};
use crate::test_utils::ScriptedTool;
use crate::tool::*;
use crate::ui::{RecordingMessenger, UiLock};

fn field_stats(parameters: &mut Parameters, data: &mut DataManager) -> bool {
    let Some(field) = parameters.get("FIELD").and_then(|p| p.as_int()) else {
        return false;
    };
    let name = {
        let table = parameters.get("TABLE").unwrap().as_object().unwrap();
        let tabular = table.as_tabular().unwrap();
        tabular.fields()[field as usize].name().to_string()
    };
    let result: DataObject = Handle::new(Table::new(&format!("stats of {name}"))).into();
    data.add(result.clone());
    parameters
        .get_mut("RESULT")
        .unwrap()
        .set_result(ParameterValue::Object(result));
    true
}

fn split(parameters: &mut Parameters, data: &mut DataManager) -> bool {
    let count = parameters.get("COUNT").and_then(|p| p.as_int()).unwrap();
    if count < 1 {
        return false;
    }
    let mut parts = Vec::new();
    for grid in parameters.get("GRIDS").unwrap().as_list() {
        for _ in 0..count {
            let part: DataObject = Handle::new(grid.as_grid().unwrap().borrow().clone()).into();
            data.add(part.clone());
            parts.push(part);
        }
    }
    parameters
        .get_mut("PARTS")
        .unwrap()
        .set_result(ParameterValue::List(parts));
    true
}

struct Fixture {
    registry: Rc<ToolRegistry>,
    messenger: Rc<RecordingMessenger>,
    ctx: Context,
    locks_seen: Rc<Cell<usize>>,
}

fn fixture() -> Fixture {
    let messenger = Rc::new(RecordingMessenger::new());
    let locks_seen = Rc::new(Cell::new(usize::MAX));

    let mut registry = ToolRegistry::new();
    registry.register("table_tools", "0", || {
        let parameters = Parameters::new()
            .with(Parameter::input("TABLE", "Table", ObjectType::Table))
            .with(Parameter::option(
                "FIELD",
                "Field",
                OptionType::TableField {
                    parent: "TABLE".into(),
                },
                None,
            ))
            .with(Parameter::output("RESULT", "Result", ObjectType::Table));
        ScriptedTool::new("Field Statistics", parameters, field_stats).boxed()
    });
    registry.register("grid_tools", "3", || {
        let parameters = Parameters::new()
            .with(Parameter::input_list("GRIDS", "Grids", ObjectType::Grid))
            .with(Parameter::output_list("PARTS", "Parts", ObjectType::Grid))
            .with(Parameter::option("COUNT", "Count", OptionType::Int, Some(Value::Int(1))));
        ScriptedTool::new("Split", parameters, split).boxed()
    });
    registry.register("grid_tools", "4", || {
        let parameters = Parameters::new()
            .with(Parameter::input_list("GRIDS", "Grids", ObjectType::Grid))
            .with(Parameter::output_list("PARTS", "Parts", ObjectType::Grid))
            .with(Parameter::output("SUMMARY", "Summary", ObjectType::Table))
            .with(Parameter::option("COUNT", "Count", OptionType::Int, Some(Value::Int(1))));
        // reports its summary as a grid instead of a table
        ScriptedTool::new("Split Summary", parameters, |parameters, data| {
            if !split(parameters, data) {
                return false;
            }
            let summary: DataObject = grid("summary").into();
            data.add(summary.clone());
            parameters
                .get_mut("SUMMARY")
                .unwrap()
                .set_result(ParameterValue::Object(summary));
            true
        })
        .boxed()
    });
    let probe_messenger = messenger.clone();
    let probe_locks = locks_seen.clone();
    registry.register("debug", "0", move || {
        let messenger = probe_messenger.clone();
        let locks = probe_locks.clone();
        ScriptedTool::new("Probe", Parameters::new(), move |_, _| {
            locks.set(messenger.lock_count());
            true
        })
        .boxed()
    });
    registry.register("debug", "1", || {
        let mut tool = ScriptedTool::new("Reluctant", Parameters::new(), |_, _| true);
        tool.proceed = false;
        tool.boxed()
    });

    let registry = Rc::new(registry);
    let ctx = Context::new(registry.clone(), Rc::new(MemoryStore::new()))
        .with_messenger(messenger.clone());
    Fixture {
        registry,
        messenger,
        ctx,
        locks_seen,
    }
}

fn heights() -> Handle<Table> {
    let mut table = Table::new("heights");
    table.add_field(FieldDefn::new("id", FieldType::Integer));
    table.add_field(FieldDefn::new("height", FieldType::Double));
    Handle::new(table)
}

fn grid(name: &str) -> Handle<Grid> {
    let system = GridSystem::new(2, 2, 10.0, 0.0, 0.0).unwrap();
    Handle::new(Grid::from_values(name, system, vec![1.0, 2.0, 3.0, 4.0]).unwrap())
}

#[test]
fn unknown_tool_is_unbound() {
    let f = fixture();
    let mut wrapper = ToolWrapper::new(&f.ctx, "grid_tools", "99", "Resampling");

    assert_eq!(wrapper.state(), ToolState::Unbound);
    assert!(!wrapper.is_okay());
    assert_eq!(wrapper.tool_name(), None);
    assert_eq!(f.messenger.errors(), ["failed to request tool: Resampling"]);

    assert!(!wrapper.set_input("GRIDS", grid("a")));
    assert!(!wrapper.set_output("PARTS", OutputTarget::Discard));
    assert!(!wrapper.set_option("COUNT", 2));
    assert!(!wrapper.execute());
    assert_eq!(wrapper.state(), ToolState::Unbound);
    assert_eq!(f.messenger.errors().len(), 1);
    assert_eq!(f.registry.live_tools(), 0);
}

#[test]
fn field_option_is_resolved_after_inputs() {
    let f = fixture();
    let target = Handle::new(Table::new("target"));
    let mut wrapper = ToolWrapper::new(&f.ctx, "table_tools", "0", "Field Statistics");
    assert_eq!(wrapper.state(), ToolState::Ready);

    // staged before the table it refers to
    assert!(wrapper.set_option("FIELD", "height"));
    assert!(wrapper.set_input("TABLE", heights()));
    assert!(wrapper.set_output("RESULT", OutputTarget::Object(target.clone().into())));
    assert_eq!(wrapper.state(), ToolState::Configuring);

    assert!(wrapper.execute());
    assert_eq!(wrapper.state(), ToolState::Succeeded);
    assert_eq!(target.borrow().name(), "stats of height");
    assert!(f.messenger.errors().is_empty());
}

#[test]
fn invalid_option_fails_and_tool_stays_usable() {
    let f = fixture();
    let target = Handle::new(Table::new("target"));
    let mut wrapper = ToolWrapper::new(&f.ctx, "table_tools", "0", "Field Statistics");

    wrapper.set_input("TABLE", heights());
    wrapper.set_option("FIELD", "depth");
    wrapper.set_output("RESULT", OutputTarget::Object(target.clone().into()));
    assert!(!wrapper.execute());
    assert_eq!(wrapper.state(), ToolState::Failed);
    assert_eq!(target.borrow().name(), "target");
    let errors = f.messenger.errors();
    assert!(errors.iter().any(|e| e.contains("depth")));
    assert_eq!(
        errors.last().map(String::as_str),
        Some("failed to execute tool: Field Statistics")
    );
    assert_eq!(wrapper.staged(), (0, 0, 0));

    wrapper.set_input("TABLE", heights());
    wrapper.set_option("FIELD", 0);
    wrapper.set_output("RESULT", OutputTarget::Object(target.clone().into()));
    assert!(wrapper.execute());
    assert_eq!(target.borrow().name(), "stats of id");
}

#[test]
fn missing_input_fails() {
    let f = fixture();
    let mut wrapper = ToolWrapper::new(&f.ctx, "table_tools", "0", "Field Statistics");
    wrapper.set_output("RESULT", OutputTarget::Discard);

    assert!(!wrapper.execute());
    assert_eq!(
        f.messenger.errors(),
        ["failed to execute tool: Field Statistics"]
    );
}

#[test]
fn mismatched_input_fails_at_execution() {
    let f = fixture();
    let mut wrapper = ToolWrapper::new(&f.ctx, "table_tools", "0", "Field Statistics");

    assert!(wrapper.set_input("TABLE", grid("a")));
    assert!(!wrapper.execute());
    assert!(f.messenger.errors()[0].contains("Table"));
}

#[test]
fn staging_checks_direction() {
    let f = fixture();
    let mut wrapper = ToolWrapper::new(&f.ctx, "table_tools", "0", "Field Statistics");

    assert!(!wrapper.set_input("RESULT", heights()));
    assert!(!wrapper.set_input("FIELD", heights()));
    assert!(!wrapper.set_input("TABLE", vec![DataObject::from(heights())]));
    assert!(!wrapper.set_output("TABLE", OutputTarget::Discard));
    assert!(!wrapper.set_output("RESULT", OutputTarget::List(Handle::new(Vec::new()))));
    assert!(!wrapper.set_output("RESULT", OutputTarget::Object(grid("a").into())));
    assert!(!wrapper.set_option("TABLE", 1));
    assert!(!wrapper.set_option("NOPE", 1));
    assert_eq!(wrapper.staged(), (0, 0, 0));
    assert_eq!(wrapper.state(), ToolState::Ready);
}

#[test]
fn list_outputs_are_appended_on_success_only() {
    let f = fixture();
    let parts: crate::data::DataList = Handle::new(Vec::new());
    let mut wrapper = ToolWrapper::new(&f.ctx, "grid_tools", "3", "Split");

    let grids: Vec<DataObject> = vec![grid("a").into(), grid("b").into()];
    assert!(wrapper.set_input("GRIDS", grids.clone()));
    assert!(wrapper.set_output("PARTS", OutputTarget::List(parts.clone())));
    assert!(wrapper.set_option("COUNT", 0));
    assert!(!wrapper.execute());
    assert!(parts.borrow().is_empty());

    assert!(wrapper.set_input("GRIDS", grids));
    assert!(wrapper.set_input("GRIDS", grid("c")));
    assert!(wrapper.set_output("PARTS", OutputTarget::List(parts.clone())));
    assert!(wrapper.set_option("COUNT", "2"));
    assert!(wrapper.execute());
    assert_eq!(parts.borrow().len(), 6);
    assert_eq!(parts.borrow()[4].name(), "c");
}

#[test]
fn failed_copy_keeps_list_outputs_out() {
    let f = fixture();
    let parts: crate::data::DataList = Handle::new(Vec::new());
    let summary = Handle::new(Table::new("summary"));
    let mut wrapper = ToolWrapper::new(&f.ctx, "grid_tools", "4", "Split Summary");

    assert!(wrapper.set_input("GRIDS", grid("a")));
    assert!(wrapper.set_output("PARTS", OutputTarget::List(parts.clone())));
    assert!(wrapper.set_output("SUMMARY", OutputTarget::Object(summary.clone().into())));
    assert!(!wrapper.execute());

    assert_eq!(wrapper.state(), ToolState::Failed);
    assert!(parts.borrow().is_empty());
    assert_eq!(summary.borrow().name(), "summary");
    let errors = f.messenger.errors();
    assert!(errors[0].contains("output 'SUMMARY'"));
    assert_eq!(errors[1], "failed to execute tool: Split Summary");
}

#[test]
fn status_line_and_lock() {
    let f = fixture();
    let mut wrapper = ToolWrapper::new(&f.ctx, "debug", "0", "Probe");
    assert_eq!(wrapper.verbosity(), Verbosity::Status);

    assert!(wrapper.execute());
    assert_eq!(f.locks_seen.get(), 1);
    assert_eq!(f.messenger.lock_count(), 0);
    assert_eq!(f.messenger.infos(), ["Probe: succeeded"]);

    let mut wrapper = wrapper.with_verbosity(Verbosity::Full);
    assert!(wrapper.execute());
    assert_eq!(f.locks_seen.get(), 0);

    f.messenger.clear();
    let mut wrapper = wrapper.with_verbosity(Verbosity::Silent);
    assert!(wrapper.execute());
    assert!(f.messenger.infos().is_empty());
}

#[test]
fn outer_lock_silences_execution() {
    let f = fixture();
    let mut wrapper =
        ToolWrapper::new(&f.ctx, "debug", "0", "Probe").with_verbosity(Verbosity::Full);
    {
        let _outer = UiLock::new(&*f.messenger);
        assert!(wrapper.execute());
        assert_eq!(f.locks_seen.get(), 2);
    }
    assert!(f.messenger.infos().is_empty());
    assert_eq!(f.messenger.lock_count(), 0);
}

#[test]
fn cancelled_before_execution() {
    let f = fixture();
    let mut wrapper = ToolWrapper::new(&f.ctx, "debug", "1", "Reluctant");
    assert!(!wrapper.execute());
    assert_eq!(wrapper.state(), ToolState::Failed);
    assert_eq!(f.messenger.errors(), ["failed to execute tool: Reluctant"]);
    assert_eq!(f.messenger.infos(), ["Reluctant: failed"]);
}

#[test]
fn destroy_returns_tool_once() {
    let f = fixture();
    let mut wrapper = ToolWrapper::new(&f.ctx, "grid_tools", "3", "Split");
    assert_eq!(f.registry.live_tools(), 1);
    wrapper.set_option("COUNT", 3);

    wrapper.destroy();
    assert_eq!(wrapper.state(), ToolState::Released);
    assert_eq!(f.registry.live_tools(), 0);
    assert_eq!(wrapper.staged(), (0, 0, 0));

    wrapper.destroy();
    assert_eq!(wrapper.state(), ToolState::Released);
    assert!(!wrapper.set_option("COUNT", 3));
    assert!(!wrapper.execute());
    drop(wrapper);
    assert_eq!(f.registry.live_tools(), 0);

    {
        let _wrapper = ToolWrapper::new(&f.ctx, "debug", "0", "Probe");
        assert_eq!(f.registry.live_tools(), 1);
    }
    assert_eq!(f.registry.live_tools(), 0);
}

#[test]
fn tool_instance_returns_to_manager() {
    let f = fixture();
    {
        let mut tool = ToolInstance::create(f.ctx.tools(), "grid_tools", "3").unwrap();
        assert_eq!(tool.name(), "Split");
        tool.parameters_mut().set_value("COUNT", 4.into()).unwrap();
        tool.reset();
        assert_eq!(tool.parameters().get("COUNT").unwrap().as_int(), Some(1));
        assert_eq!(f.registry.live_tools(), 1);
    }
    assert_eq!(f.registry.live_tools(), 0);
    assert!(ToolInstance::create(f.ctx.tools(), "grid_tools", "4").is_none());
}

#[test]
fn verbosity_from_str() {
    assert_eq!("silent".parse::<Verbosity>().unwrap(), Verbosity::Silent);
    assert_eq!(" Full ".parse::<Verbosity>().unwrap(), Verbosity::Full);
    assert_eq!("1".parse::<Verbosity>().unwrap(), Verbosity::Status);
    assert!("loud".parse::<Verbosity>().is_err());
    assert_eq!(Verbosity::Status.to_string(), "status");
    assert!(Verbosity::Silent < Verbosity::Full);
}
