use std::fmt::{self, Display, Formatter};

use chrono::NaiveDate;

use crate::errors::*;

/// Data type of a table field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Double,
    String,
    Date,
}

impl FieldType {
    /// Human readable name, as listed by
    /// [`print_table_fields`](crate::print_table_fields).
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Double => "floating point",
            FieldType::String => "string",
            FieldType::Date => "date",
        }
    }
}

/// A single cell of a table record.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Double(f64),
    String(String),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            FieldValue::Null => None,
            FieldValue::Integer(_) => Some(FieldType::Integer),
            FieldValue::Double(_) => Some(FieldType::Double),
            FieldValue::String(_) => Some(FieldType::String),
            FieldValue::Date(_) => Some(FieldType::Date),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Double(value) => write!(f, "{value}"),
            FieldValue::String(value) => f.write_str(value),
            FieldValue::Date(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Double(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

/// Field schema entry.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDefn {
    name: String,
    field_type: FieldType,
    no_data: Option<FieldValue>,
}

impl FieldDefn {
    pub fn new(name: &str, field_type: FieldType) -> FieldDefn {
        FieldDefn {
            name: name.to_string(),
            field_type,
            no_data: None,
        }
    }

    /// Declare `value` as the stored value marking missing data in this field.
    pub fn with_no_data(mut self, value: FieldValue) -> FieldDefn {
        self.no_data = Some(value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn no_data(&self) -> Option<&FieldValue> {
        self.no_data.as_ref()
    }
}

/// Read access to tabular data.
///
/// Implemented by every data object that carries an attribute table. Use
/// [`DataObject::as_tabular`](crate::data::DataObject::as_tabular) to check
/// for the capability at runtime.
pub trait Tabular {
    fn table_name(&self) -> &str;

    fn fields(&self) -> &[FieldDefn];

    fn record_count(&self) -> usize;

    /// Stored value of a cell, `None` when `record` or `field` is out of range.
    fn value(&self, record: usize, field: usize) -> Option<&FieldValue>;

    fn field_count(&self) -> usize {
        self.fields().len()
    }

    fn field_index(&self, name: &str) -> Option<usize> {
        self.fields().iter().position(|f| f.name() == name)
    }

    /// A cell holds no data when it is null or equals the field's no-data value.
    fn is_no_data(&self, record: usize, field: usize) -> bool {
        match self.value(record, field) {
            None | Some(FieldValue::Null) => true,
            Some(value) => self
                .fields()
                .get(field)
                .and_then(FieldDefn::no_data)
                .is_some_and(|no_data| no_data == value),
        }
    }
}

/// In-memory attribute table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    name: String,
    fields: Vec<FieldDefn>,
    records: Vec<Vec<FieldValue>>,
}

impl Table {
    pub fn new(name: &str) -> Table {
        Table {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Append a field; existing records get a null cell.
    pub fn add_field(&mut self, defn: FieldDefn) {
        self.fields.push(defn);
        for record in &mut self.records {
            record.push(FieldValue::Null);
        }
    }

    /// Append a record. Missing trailing values are stored as null.
    pub fn add_record(&mut self, mut values: Vec<FieldValue>) -> Result<usize> {
        if values.len() > self.fields.len() {
            return Err(HelperError::BadArgument(format!(
                "record has {} values, table '{}' has {} fields",
                values.len(),
                self.name,
                self.fields.len()
            )));
        }
        for (value, defn) in values.iter().zip(&self.fields) {
            if let Some(value_type) = value.field_type() {
                if value_type != defn.field_type {
                    return Err(HelperError::BadArgument(format!(
                        "field '{}' expects {} values",
                        defn.name,
                        defn.field_type.type_name()
                    )));
                }
            }
        }
        values.resize(self.fields.len(), FieldValue::Null);
        self.records.push(values);
        Ok(self.records.len() - 1)
    }

    pub fn set_value(&mut self, record: usize, field: usize, value: FieldValue) -> Result<()> {
        let cell = self
            .records
            .get_mut(record)
            .and_then(|r| r.get_mut(field))
            .ok_or_else(|| {
                HelperError::BadArgument(format!("no cell at record {record}, field {field}"))
            })?;
        *cell = value;
        Ok(())
    }
}

impl Tabular for Table {
    fn table_name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &[FieldDefn] {
        &self.fields
    }

    fn record_count(&self) -> usize {
        self.records.len()
    }

    fn value(&self, record: usize, field: usize) -> Option<&FieldValue> {
        self.records.get(record).and_then(|r| r.get(field))
    }
}
