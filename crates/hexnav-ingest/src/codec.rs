//! Shared low-level Parquet plumbing for the staging readers and writers.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use parquet::basic::{Compression, ConvertedType, Repetition, Type as PhysicalType};
use parquet::data_type::{ByteArray, ByteArrayType, DoubleType};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::record::Field;
use parquet::schema::types::{Type, TypePtr};

use crate::error::IngestError;

/// A fully materialized column ready to be written.
pub(crate) enum StagedColumn {
    Doubles(Vec<f64>),
    Strings(Vec<ByteArray>),
}

/// A required DOUBLE field.
pub(crate) fn double_field(name: &str) -> Result<TypePtr, IngestError> {
    Ok(Arc::new(
        Type::primitive_type_builder(name, PhysicalType::DOUBLE)
            .with_repetition(Repetition::REQUIRED)
            .build()?,
    ))
}

/// A required UTF8 field.
pub(crate) fn utf8_field(name: &str) -> Result<TypePtr, IngestError> {
    Ok(Arc::new(
        Type::primitive_type_builder(name, PhysicalType::BYTE_ARRAY)
            .with_converted_type(ConvertedType::UTF8)
            .with_repetition(Repetition::REQUIRED)
            .build()?,
    ))
}

/// Write one row group of staged columns to a new file.
///
/// `fields` and `columns` must be positionally aligned.
pub(crate) fn write_table(
    path: &Path,
    fields: Vec<TypePtr>,
    columns: Vec<StagedColumn>,
) -> Result<(), IngestError> {
    let schema = Arc::new(
        Type::group_type_builder("schema")
            .with_fields(fields)
            .build()?,
    );
    let props = Arc::new(
        WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build(),
    );
    let file = File::create(path)?;
    let mut writer = SerializedFileWriter::new(file, schema, props)?;

    let mut row_group = writer.next_row_group()?;
    let mut staged = columns.into_iter();
    while let Some(mut column) = row_group.next_column()? {
        match staged.next() {
            Some(StagedColumn::Doubles(values)) => {
                column
                    .typed::<DoubleType>()
                    .write_batch(&values, None, None)?;
            }
            Some(StagedColumn::Strings(values)) => {
                column
                    .typed::<ByteArrayType>()
                    .write_batch(&values, None, None)?;
            }
            None => break,
        }
        column.close()?;
    }
    row_group.close()?;
    writer.close()?;
    Ok(())
}

/// UTF8 column values from owned strings.
pub(crate) fn utf8_values<I: IntoIterator<Item = String>>(values: I) -> Vec<ByteArray> {
    values
        .into_iter()
        .map(|s| ByteArray::from(s.into_bytes()))
        .collect()
}

/// Numeric view of a row field, if it has one.
pub(crate) fn numeric_field(field: &Field) -> Option<f64> {
    match field {
        Field::Double(v) => Some(*v),
        Field::Float(v) => Some(f64::from(*v)),
        Field::Int(v) => Some(f64::from(*v)),
        Field::Long(v) => Some(*v as f64),
        Field::Short(v) => Some(f64::from(*v)),
        Field::Byte(v) => Some(f64::from(*v)),
        Field::UInt(v) => Some(f64::from(*v)),
        Field::ULong(v) => Some(*v as f64),
        Field::UShort(v) => Some(f64::from(*v)),
        Field::UByte(v) => Some(f64::from(*v)),
        _ => None,
    }
}
