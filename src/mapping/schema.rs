//! Field mapping metadata for record types.
//!
//! A record type describes its columns once through [`TableRecord::columns`];
//! [`FieldMapping::build`] validates that description against a
//! [`FileDescription`] and resolves the ordered field list used by both
//! mapping directions. No I/O happens here, so a structurally invalid record
//! type is reported before any resource is opened.

use super::field_types::{ConversionRule, FieldType};
use crate::config::FileDescription;
use crate::culture::Culture;
use crate::error::{ConversionErrorKind, MappingError, Result};
use std::collections::HashSet;
use tracing::debug;

type CellParser<T> =
    Box<dyn Fn(&mut T, &str, &ConversionRule) -> std::result::Result<(), ConversionErrorKind> + Send + Sync>;
type CellFormatter<T> =
    Box<dyn Fn(&T, &ConversionRule) -> std::result::Result<String, ConversionErrorKind> + Send + Sync>;

/// A record type that can be mapped to and from rows
pub trait TableRecord: Default + 'static {
    /// Column declarations in declaration order
    fn columns() -> Vec<Column<Self>>;
}

/// Declaration of one mapped field of `T`
pub struct Column<T> {
    name: String,
    ordinal: Option<u32>,
    max_length: i64,
    required: bool,
    format: Option<String>,
    culture: Option<String>,
    declared: bool,
    kind: &'static str,
    parse: CellParser<T>,
    render: CellFormatter<T>,
}

impl<T: 'static> Column<T> {
    /// Bind a column to a field through a getter/setter pair.
    ///
    /// The column is undeclared until one of the builder methods is used, so it
    /// is dropped when the file description enforces column declarations.
    pub fn new<F>(name: impl Into<String>, get: fn(&T) -> &F, set: fn(&mut T) -> &mut F) -> Self
    where
        F: FieldType + 'static,
    {
        Self {
            name: name.into(),
            ordinal: None,
            max_length: 0,
            required: false,
            format: None,
            culture: None,
            declared: false,
            kind: F::KIND,
            parse: Box::new(move |record: &mut T, raw: &str, rule: &ConversionRule| {
                *set(record) = F::parse_cell(raw, rule)?;
                Ok(())
            }),
            render: Box::new(move |record: &T, rule: &ConversionRule| get(record).format_cell(rule)),
        }
    }
}

impl<T> Column<T> {
    /// 1-based position of the column when rows carry no names
    pub fn ordinal(mut self, ordinal: u32) -> Self {
        self.ordinal = Some(ordinal);
        self.declared = true;
        self
    }

    /// Fixed character width of the column on read (0 = unbounded)
    pub fn max_length(mut self, max_length: i64) -> Self {
        self.max_length = max_length;
        self.declared = true;
        self
    }

    /// The cell must hold a value
    pub fn required(mut self) -> Self {
        self.required = true;
        self.declared = true;
        self
    }

    /// Explicit number format (`F2`, `N0`, `D5`, ...) or strftime pattern
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self.declared = true;
        self
    }

    /// Culture override for this column
    pub fn culture(mut self, culture_name: impl Into<String>) -> Self {
        self.culture = Some(culture_name.into());
        self.declared = true;
        self
    }

    /// Mark the column as declared without changing any other setting
    pub fn declared(mut self) -> Self {
        self.declared = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_declared(&self) -> bool {
        self.declared
    }
}

/// Build a [`Column`] named after a struct field.
///
/// ```
/// use tablemap::{table_column, Column, TableRecord};
///
/// #[derive(Default)]
/// struct Product {
///     name: String,
///     price: f64,
/// }
///
/// impl TableRecord for Product {
///     fn columns() -> Vec<Column<Self>> {
///         vec![table_column!(Product, name).required(), table_column!(Product, price).format("F2")]
///     }
/// }
/// ```
#[macro_export]
macro_rules! table_column {
    ($record:ty, $field:ident) => {
        $crate::Column::new(
            stringify!($field),
            |r: &$record| &r.$field,
            |r: &mut $record| &mut r.$field,
        )
    };
    ($record:ty, $field:ident, $name:expr) => {
        $crate::Column::new($name, |r: &$record| &r.$field, |r: &mut $record| &mut r.$field)
    };
}

/// One resolved entry of a [`FieldMapping`]
pub struct FieldInfo<T> {
    /// 1-based position after ordering
    pub position: usize,
    pub name: String,
    /// Read-side fixed width (0 = unbounded)
    pub max_length: usize,
    pub required: bool,
    pub kind: &'static str,
    pub rule: ConversionRule,
    parse: CellParser<T>,
    render: CellFormatter<T>,
}

impl<T> FieldInfo<T> {
    /// Parse `raw` and store it in the record's field
    pub fn assign(&self, record: &mut T, raw: &str) -> std::result::Result<(), ConversionErrorKind> {
        (self.parse)(record, raw, &self.rule)
    }

    /// Format the record's field value
    pub fn render(&self, record: &T) -> std::result::Result<String, ConversionErrorKind> {
        (self.render)(record, &self.rule)
    }
}

impl<T> std::fmt::Debug for FieldInfo<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldInfo")
            .field("position", &self.position)
            .field("name", &self.name)
            .field("max_length", &self.max_length)
            .field("required", &self.required)
            .field("kind", &self.kind)
            .field("rule", &self.rule)
            .finish()
    }
}

/// Ordered mapping between the fields of `T` and row columns
#[derive(Debug)]
pub struct FieldMapping<T> {
    type_name: String,
    fields: Vec<FieldInfo<T>>,
}

impl<T: TableRecord> FieldMapping<T> {
    /// Derive and validate the mapping for `T` under `description`
    pub fn build(description: &FileDescription) -> Result<Self> {
        let type_name = short_type_name::<T>();
        let file_culture = description.culture()?;

        let mut columns: Vec<Column<T>> = T::columns();
        if description.enforce_column_attribute {
            columns.retain(|c| c.declared);
        }
        if columns.is_empty() {
            return Err(MappingError::schema(&type_name, "no mappable fields"));
        }

        let mut ordinals = HashSet::new();
        for column in &columns {
            if column.max_length < 0 {
                return Err(MappingError::schema(
                    &type_name,
                    format!("column '{}' has negative length {}", column.name, column.max_length),
                ));
            }
            if let Some(ordinal) = column.ordinal {
                if ordinal == 0 {
                    return Err(MappingError::schema(
                        &type_name,
                        format!("column '{}' has ordinal 0 (ordinals start at 1)", column.name),
                    ));
                }
                if !ordinals.insert(ordinal) {
                    return Err(MappingError::schema(
                        &type_name,
                        format!("ordinal {} is used by more than one column", ordinal),
                    ));
                }
            }
        }

        if description.first_line_has_column_names {
            let mut names = HashSet::new();
            for column in &columns {
                if !names.insert(column.name.as_str()) {
                    return Err(MappingError::schema(
                        &type_name,
                        format!("column name '{}' is used by more than one field", column.name),
                    ));
                }
            }
        }

        // Stable: columns without an ordinal keep declaration order, after the rest
        columns.sort_by_key(|c| c.ordinal.unwrap_or(u32::MAX));

        let mut fields = Vec::with_capacity(columns.len());
        for (index, column) in columns.into_iter().enumerate() {
            let culture = match &column.culture {
                Some(name) => Culture::from_name(name).ok_or_else(|| {
                    MappingError::configuration(format!(
                        "Unknown culture '{}' on column '{}' of {}",
                        name, column.name, type_name
                    ))
                })?,
                None => file_culture.clone(),
            };

            fields.push(FieldInfo {
                position: index + 1,
                name: column.name,
                max_length: column.max_length as usize,
                required: column.required,
                kind: column.kind,
                rule: ConversionRule::new(column.format, culture),
                parse: column.parse,
                render: column.render,
            });
        }

        debug!(
            "Built field mapping for {}: {}",
            type_name,
            fields
                .iter()
                .map(|f| format!("{}={}", f.position, f.name))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self { type_name, fields })
    }
}

impl<T> FieldMapping<T> {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[FieldInfo<T>] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Index of the field with this column name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// Type name without its module path
pub(crate) fn short_type_name<T>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    let short = base.rsplit("::").next().unwrap_or(base);
    format!("{}{}", short, &full[base.len()..])
}
