use bson::{Bson, Document};
use serde::Serialize;

use super::{FieldKind, ModelField};
use crate::common::FIELD_SEPARATOR;
use crate::errors::MogulResult;

/// Computes the equality predicates of a struct filter.
///
/// Each field with a filter key and a non-zero value contributes one
/// `(key, value)` pair, in declaration order. A nested struct contributes
/// one pair per non-zero inner field, keyed by the dotted path of storage
/// names below the outer filter key (`location.city`), at any depth.
/// Array fields never contribute.
///
/// # Arguments
///
/// * `fields` - The descriptor table of the struct
///
/// # Returns
///
/// The ordered equality pairs, or the `EncodingError` of the first
/// contributing value that has no bson form.
pub fn extract_filter(fields: &[ModelField<'_>]) -> MogulResult<Vec<(String, Bson)>> {
    let mut entries = Vec::new();
    for field in fields {
        let Some(key) = field.filter_key() else {
            continue;
        };
        collect_field(key, field, &mut entries)?;
    }
    Ok(entries)
}

fn collect_field(
    path: &str,
    field: &ModelField<'_>,
    entries: &mut Vec<(String, Bson)>,
) -> MogulResult<()> {
    let value = field.value();
    if value.is_zero() {
        return Ok(());
    }

    match value.kind() {
        FieldKind::Array => {}
        FieldKind::Struct => {
            if let Some(nested) = value.nested_fields() {
                for inner in &nested {
                    let inner_path = format!("{}{}{}", path, FIELD_SEPARATOR, inner.name());
                    collect_field(&inner_path, inner, entries)?;
                }
            }
        }
        FieldKind::Scalar => entries.push((path.to_string(), value.to_bson()?)),
    }
    Ok(())
}

/// Whether every field of the table holds a zero value.
pub fn all_zero(fields: &[ModelField<'_>]) -> bool {
    fields.iter().all(|field| field.value().is_zero())
}

/// Builds the document of a descriptor table, keyed by storage names.
///
/// Zero fields flagged `omitempty` are left out.
pub fn fields_to_document(fields: &[ModelField<'_>]) -> MogulResult<Document> {
    let mut doc = Document::new();
    for field in fields {
        let value = field.value();
        if field.omit_empty() && value.is_zero() {
            continue;
        }
        doc.insert(field.name(), value.to_bson()?);
    }
    Ok(doc)
}

/// Builds the `$set` body of an update-by-struct.
///
/// Returns `None` when the struct is entirely zero-valued, in which case
/// the update is a no-op.
pub fn set_document(fields: &[ModelField<'_>]) -> MogulResult<Option<Document>> {
    if all_zero(fields) {
        Ok(None)
    } else {
        fields_to_document(fields).map(Some)
    }
}

/// Serializes a value into a document.
///
/// # Panics
///
/// Panics if the value does not serialize to a document, which means a
/// non-struct type was used where a model was expected.
pub fn to_document<T: Serialize + ?Sized>(value: &T) -> MogulResult<Document> {
    match bson::to_bson(value)? {
        Bson::Document(doc) => Ok(doc),
        other => panic!(
            "expected a value serializing to a document, got {:?}",
            other.element_type()
        ),
    }
}
