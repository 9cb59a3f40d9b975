//! Plain text listings of tabular data objects.

use std::io::Write;

use crate::data::{DataObject, Tabular};
use crate::errors::*;

/// Selects a column by position or by field name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldSelector {
    Index(usize),
    Name(String),
}

impl From<usize> for FieldSelector {
    fn from(index: usize) -> Self {
        FieldSelector::Index(index)
    }
}

impl From<&str> for FieldSelector {
    fn from(name: &str) -> Self {
        FieldSelector::Name(name.to_string())
    }
}

impl From<String> for FieldSelector {
    fn from(name: String) -> Self {
        FieldSelector::Name(name)
    }
}

/// Options of [`print_table`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintOptions {
    /// Column separator.
    pub separator: String,
    /// Columns to print, in this order. Empty prints every column.
    pub fields: Vec<FieldSelector>,
    /// Printed instead of no-data cells. If `None` the stored value is printed.
    pub no_data: Option<String>,
    /// Maximum number of records, 0 prints all of them.
    pub max_rows: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions {
            separator: "\t".to_string(),
            fields: Vec::new(),
            no_data: None,
            max_rows: 0,
        }
    }
}

impl PrintOptions {
    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    pub fn with_fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldSelector>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_no_data(mut self, no_data: &str) -> Self {
        self.no_data = Some(no_data.to_string());
        self
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }
}

/// Write the records of `object` to `out`.
///
/// Objects without attribute table are rejected with
/// [`HelperError::NotTabular`] before anything is written. Selected fields
/// that do not exist are skipped.
///
/// ```
/// use saga_helpers::data::{FieldDefn, FieldType, FieldValue, Handle, Table};
/// use saga_helpers::{print_table, PrintOptions};
///
/// let mut table = Table::new("stations");
/// table.add_field(FieldDefn::new("id", FieldType::Integer));
/// table.add_field(FieldDefn::new("name", FieldType::String));
/// table.add_record(vec![FieldValue::Integer(1), "Uccle".into()]).unwrap();
///
/// let mut out = Vec::new();
/// let options = PrintOptions::default().with_separator(";");
/// print_table(&Handle::new(table).into(), &mut out, &options).unwrap();
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "Name: stations\nFields: 2\nRecords: 1\nid;name\n1;Uccle\n"
/// );
/// ```
pub fn print_table<W: Write>(object: &DataObject, out: &mut W, options: &PrintOptions) -> Result<()> {
    let table = object
        .as_tabular()
        .ok_or_else(|| HelperError::NotTabular(object.object_type()))?;
    let table: &dyn Tabular = &*table;

    let columns = select_columns(table, &options.fields);
    let rows = match options.max_rows {
        0 => table.record_count(),
        n => n.min(table.record_count()),
    };

    write_header(table, out)?;
    let names: Vec<&str> = columns.iter().map(|&i| table.fields()[i].name()).collect();
    writeln!(out, "{}", names.join(options.separator.as_str()))?;

    for record in 0..rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|&field| match (&options.no_data, table.is_no_data(record, field)) {
                (Some(no_data), true) => no_data.clone(),
                _ => table
                    .value(record, field)
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            })
            .collect();
        writeln!(out, "{}", cells.join(options.separator.as_str()))?;
    }
    Ok(())
}

/// Write the schema of `object`: the header block, then one line per field
/// with its index, name and type.
pub fn print_table_fields<W: Write>(object: &DataObject, out: &mut W, separator: &str) -> Result<()> {
    let table = object
        .as_tabular()
        .ok_or_else(|| HelperError::NotTabular(object.object_type()))?;

    write_header(&*table, out)?;
    for (i, field) in table.fields().iter().enumerate() {
        writeln!(
            out,
            "{i}{separator}{}{separator}{}",
            field.name(),
            field.field_type().type_name()
        )?;
    }
    Ok(())
}

fn write_header<W: Write>(table: &dyn Tabular, out: &mut W) -> Result<()> {
    writeln!(out, "Name: {}", table.table_name())?;
    writeln!(out, "Fields: {}", table.field_count())?;
    writeln!(out, "Records: {}", table.record_count())?;
    Ok(())
}

fn select_columns(table: &dyn Tabular, fields: &[FieldSelector]) -> Vec<usize> {
    if fields.is_empty() {
        return (0..table.field_count()).collect();
    }
    fields
        .iter()
        .filter_map(|selector| match selector {
            FieldSelector::Index(i) => (*i < table.field_count()).then_some(*i),
            FieldSelector::Name(name) => table.field_index(name),
        })
        .collect()
}
