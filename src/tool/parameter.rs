use std::fmt::{self, Display, Formatter};

use bitflags::bitflags;

use crate::data::{DataObject, ObjectType};
use crate::errors::*;

bitflags! {
    /// Direction and optionality of a tool parameter.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ParameterFlags: u32 {
        const INPUT = 0x01;
        const OUTPUT = 0x02;
        const OPTIONAL = 0x04;
    }
}

/// Plain option value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum OptionType {
    Bool,
    Int,
    Double,
    String,
    FilePath,
    /// Index into a fixed list of items. Accepts the index or the item text.
    Choice(Vec<String>),
    /// Field of the table bound to the input parameter `parent`. Accepts
    /// the field index or the field name, and can only be set once the
    /// parent holds a table.
    TableField { parent: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParameterKind {
    DataObject(ObjectType),
    DataObjectList(ObjectType),
    Option(OptionType),
}

/// Current value of a parameter.
#[derive(Clone, Debug, Default)]
pub enum ParameterValue {
    #[default]
    Empty,
    Object(DataObject),
    /// Asks the tool to create this output.
    Create,
    List(Vec<DataObject>),
    Value(Value),
}

#[derive(Clone, Debug)]
pub struct Parameter {
    id: String,
    name: String,
    flags: ParameterFlags,
    kind: ParameterKind,
    value: ParameterValue,
    default: ParameterValue,
}

impl Parameter {
    fn new(id: &str, name: &str, flags: ParameterFlags, kind: ParameterKind) -> Parameter {
        let default = match kind {
            ParameterKind::DataObjectList(_) => ParameterValue::List(Vec::new()),
            _ => ParameterValue::Empty,
        };
        Parameter {
            id: id.to_string(),
            name: name.to_string(),
            flags,
            kind,
            value: default.clone(),
            default,
        }
    }

    pub fn input(id: &str, name: &str, object_type: ObjectType) -> Parameter {
        Self::new(id, name, ParameterFlags::INPUT, ParameterKind::DataObject(object_type))
    }

    pub fn input_list(id: &str, name: &str, object_type: ObjectType) -> Parameter {
        Self::new(
            id,
            name,
            ParameterFlags::INPUT,
            ParameterKind::DataObjectList(object_type),
        )
    }

    pub fn output(id: &str, name: &str, object_type: ObjectType) -> Parameter {
        Self::new(id, name, ParameterFlags::OUTPUT, ParameterKind::DataObject(object_type))
    }

    pub fn output_list(id: &str, name: &str, object_type: ObjectType) -> Parameter {
        Self::new(
            id,
            name,
            ParameterFlags::OUTPUT,
            ParameterKind::DataObjectList(object_type),
        )
    }

    pub fn option(id: &str, name: &str, option_type: OptionType, default: Option<Value>) -> Parameter {
        let mut parameter = Self::new(
            id,
            name,
            ParameterFlags::INPUT,
            ParameterKind::Option(option_type),
        );
        if let Some(default) = default {
            parameter.default = ParameterValue::Value(default);
            parameter.value = parameter.default.clone();
        }
        parameter
    }

    pub fn optional(mut self) -> Parameter {
        self.flags |= ParameterFlags::OPTIONAL;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> ParameterFlags {
        self.flags
    }

    pub fn kind(&self) -> &ParameterKind {
        &self.kind
    }

    pub fn is_input(&self) -> bool {
        self.flags.contains(ParameterFlags::INPUT)
    }

    pub fn is_output(&self) -> bool {
        self.flags.contains(ParameterFlags::OUTPUT)
    }

    pub fn is_optional(&self) -> bool {
        self.flags.contains(ParameterFlags::OPTIONAL)
    }

    pub fn is_data_object(&self) -> bool {
        matches!(self.kind, ParameterKind::DataObject(_))
    }

    pub fn is_data_object_list(&self) -> bool {
        matches!(self.kind, ParameterKind::DataObjectList(_))
    }

    pub fn is_option(&self) -> bool {
        matches!(self.kind, ParameterKind::Option(_))
    }

    pub fn value(&self) -> &ParameterValue {
        &self.value
    }

    /// Object held by a data object parameter.
    pub fn as_object(&self) -> Option<&DataObject> {
        match &self.value {
            ParameterValue::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Items held by a data object list parameter.
    pub fn as_list(&self) -> &[DataObject] {
        match &self.value {
            ParameterValue::List(items) => items,
            _ => &[],
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match &self.value {
            ParameterValue::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<String> {
        self.as_value().map(Value::to_string)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.as_value()? {
            Value::Int(v) => Some(*v),
            Value::Bool(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self.as_value()? {
            Value::Double(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.as_value()? {
            Value::Bool(v) => Some(*v),
            Value::Int(v) => Some(*v != 0),
            _ => None,
        }
    }

    /// Whether a mandatory input is still missing its data.
    pub fn is_missing(&self) -> bool {
        if !self.is_input() || self.is_optional() {
            return false;
        }
        match (&self.kind, &self.value) {
            (ParameterKind::DataObject(_), ParameterValue::Object(_)) => false,
            (ParameterKind::DataObject(_), _) => true,
            (ParameterKind::DataObjectList(_), ParameterValue::List(items)) => items.is_empty(),
            (ParameterKind::DataObjectList(_), _) => true,
            (ParameterKind::Option(_), _) => false,
        }
    }

    /// Store a value produced by the tool.
    pub fn set_result(&mut self, value: ParameterValue) {
        self.value = value;
    }
}

/// Ordered parameter set of a tool.
#[derive(Clone, Debug, Default)]
pub struct Parameters {
    items: Vec<Parameter>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, parameter: Parameter) -> Self {
        self.add(parameter);
        self
    }

    pub fn add(&mut self, parameter: Parameter) {
        self.items.push(parameter);
    }

    pub fn get(&self, id: &str) -> Option<&Parameter> {
        self.items.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Parameter> {
        self.items.iter_mut().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn lookup(&self, id: &str) -> Result<&Parameter> {
        self.get(id)
            .ok_or_else(|| HelperError::ParameterNotFound(id.to_string()))
    }

    fn lookup_mut(&mut self, id: &str) -> Result<&mut Parameter> {
        self.get_mut(id)
            .ok_or_else(|| HelperError::ParameterNotFound(id.to_string()))
    }

    /// Set an option, converting `value` to the option's type.
    pub fn set_value(&mut self, id: &str, value: Value) -> Result<()> {
        let converted = {
            let parameter = self.lookup(id)?;
            let ParameterKind::Option(option_type) = &parameter.kind else {
                return Err(HelperError::BadArgument(format!(
                    "parameter '{id}' is not an option"
                )));
            };
            self.convert(id, option_type, value)?
        };
        self.lookup_mut(id)?.value = ParameterValue::Value(converted);
        Ok(())
    }

    fn convert(&self, id: &str, option_type: &OptionType, value: Value) -> Result<Value> {
        let text = value.to_string();
        let invalid =
            || HelperError::BadArgument(format!("invalid value '{text}' for option '{id}'"));
        let converted = match (option_type, value) {
            (OptionType::Bool, Value::Bool(v)) => Value::Bool(v),
            (OptionType::Bool, Value::Int(v)) => Value::Bool(v != 0),
            (OptionType::Bool, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Value::Bool(true),
                "false" | "0" => Value::Bool(false),
                _ => return Err(invalid()),
            },
            (OptionType::Int, Value::Int(v)) => Value::Int(v),
            (OptionType::Int, Value::Bool(v)) => Value::Int(i64::from(v)),
            (OptionType::Int, Value::String(s)) => {
                Value::Int(s.trim().parse().map_err(|_| invalid())?)
            }
            (OptionType::Double, Value::Double(v)) => Value::Double(v),
            (OptionType::Double, Value::Int(v)) => Value::Double(v as f64),
            (OptionType::Double, Value::String(s)) => {
                Value::Double(s.trim().parse().map_err(|_| invalid())?)
            }
            (OptionType::String | OptionType::FilePath, _) => Value::String(text.clone()),
            (OptionType::Choice(items), Value::Int(index)) => {
                if usize::try_from(index).map_or(true, |i| i >= items.len()) {
                    return Err(invalid());
                }
                Value::Int(index)
            }
            (OptionType::Choice(items), Value::String(item)) => {
                let index = items
                    .iter()
                    .position(|i| *i == item)
                    .ok_or_else(invalid)?;
                Value::Int(index as i64)
            }
            (OptionType::TableField { parent }, value @ (Value::Int(_) | Value::String(_))) => {
                let object = self.lookup(parent)?.as_object().ok_or_else(|| {
                    HelperError::BadArgument(format!(
                        "option '{id}' needs a table bound to '{parent}'"
                    ))
                })?;
                let table = object
                    .as_tabular()
                    .ok_or_else(|| HelperError::NotTabular(object.object_type()))?;
                let index = match &value {
                    Value::Int(index) => usize::try_from(*index)
                        .ok()
                        .filter(|&i| i < table.field_count()),
                    Value::String(name) => table.field_index(name),
                    _ => None,
                };
                Value::Int(index.ok_or_else(invalid)? as i64)
            }
            _ => return Err(invalid()),
        };
        Ok(converted)
    }

    /// Bind `object` to a single data object parameter.
    pub fn set_object(&mut self, id: &str, object: DataObject) -> Result<()> {
        let parameter = self.lookup_mut(id)?;
        let ParameterKind::DataObject(expected) = parameter.kind else {
            return Err(HelperError::BadArgument(format!(
                "parameter '{id}' does not take a single data object"
            )));
        };
        if !expected.accepts(object.object_type()) {
            return Err(HelperError::TypeMismatch {
                expected,
                found: object.object_type(),
            });
        }
        parameter.value = ParameterValue::Object(object);
        Ok(())
    }

    /// Append `object` to a data object list parameter.
    pub fn add_list_item(&mut self, id: &str, object: DataObject) -> Result<()> {
        let parameter = self.lookup_mut(id)?;
        let ParameterKind::DataObjectList(expected) = parameter.kind else {
            return Err(HelperError::BadArgument(format!(
                "parameter '{id}' does not take a list of data objects"
            )));
        };
        if !expected.accepts(object.object_type()) {
            return Err(HelperError::TypeMismatch {
                expected,
                found: object.object_type(),
            });
        }
        match &mut parameter.value {
            ParameterValue::List(items) => items.push(object),
            value => *value = ParameterValue::List(vec![object]),
        }
        Ok(())
    }

    /// Ask the tool to create the single data object output `id`.
    pub fn set_create(&mut self, id: &str) -> Result<()> {
        let parameter = self.lookup_mut(id)?;
        if !parameter.is_output() || !parameter.is_data_object() {
            return Err(HelperError::BadArgument(format!(
                "parameter '{id}' is not a single data object output"
            )));
        }
        parameter.value = ParameterValue::Create;
        Ok(())
    }

    pub fn restore_defaults(&mut self) {
        for parameter in &mut self.items {
            parameter.value = parameter.default.clone();
        }
    }
}
