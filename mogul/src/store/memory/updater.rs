use bson::{Bson, Document};

use super::compare::values_equal;
use crate::common::*;
use crate::errors::{ErrorKind, MogulError, MogulResult};

/// Whether an update document replaces the target instead of modifying it.
pub(crate) fn is_replacement(update: &Document) -> bool {
    !update.keys().any(|key| key.starts_with('$'))
}

/// Applies an operator update (`$set`, `$unset`, `$inc`, `$push`) or a
/// replacement document. The `_id` of the target is preserved and may not
/// be changed.
pub(crate) fn apply_update(target: &mut Document, update: &Document) -> MogulResult<()> {
    if is_replacement(update) {
        return replace(target, update);
    }

    for (op, spec) in update {
        let Bson::Document(spec) = spec else {
            return Err(MogulError::new(
                &format!("{} needs a document", op),
                ErrorKind::InvalidOperation,
            ));
        };
        for (path, value) in spec {
            if path == DOC_ID && op != OP_UNSET {
                if target.get(DOC_ID).is_some_and(|id| values_equal(id, value)) {
                    continue;
                }
                return Err(immutable_id());
            }
            match op.as_str() {
                OP_SET => set_path(target, path, value.clone())?,
                OP_UNSET => {
                    if path == DOC_ID {
                        return Err(immutable_id());
                    }
                    unset_path(target, path);
                }
                OP_INC => increment(target, path, value)?,
                OP_PUSH => push(target, path, value)?,
                _ => {
                    log::error!("Unsupported update operator {}", op);
                    return Err(MogulError::new(
                        &format!("unsupported update operator {}", op),
                        ErrorKind::UnsupportedOperator,
                    ));
                }
            }
        }
    }
    Ok(())
}

fn replace(target: &mut Document, replacement: &Document) -> MogulResult<()> {
    let id = target.get(DOC_ID).cloned();
    if let (Some(id), Some(new_id)) = (&id, replacement.get(DOC_ID)) {
        if !values_equal(id, new_id) {
            return Err(immutable_id());
        }
    }

    let mut doc = Document::new();
    if let Some(id) = id {
        doc.insert(DOC_ID, id);
    }
    for (key, value) in replacement {
        if key != DOC_ID {
            doc.insert(key.clone(), value.clone());
        }
    }
    *target = doc;
    Ok(())
}

fn immutable_id() -> MogulError {
    MogulError::new("the _id field cannot be changed", ErrorKind::InvalidOperation)
}

/// Sets a dotted path, creating intermediate documents.
pub(crate) fn set_path(target: &mut Document, path: &str, value: Bson) -> MogulResult<()> {
    match path.split_once(FIELD_SEPARATOR) {
        None => {
            target.insert(path, value);
            Ok(())
        }
        Some((head, rest)) => {
            if !target.contains_key(head) {
                target.insert(head, Document::new());
            }
            match target.get_mut(head) {
                Some(Bson::Document(doc)) => set_path(doc, rest, value),
                _ => Err(MogulError::new(
                    &format!("cannot create field {} inside a non-document value", path),
                    ErrorKind::InvalidOperation,
                )),
            }
        }
    }
}

fn get_path_mut<'a>(target: &'a mut Document, path: &str) -> Option<&'a mut Bson> {
    match path.split_once(FIELD_SEPARATOR) {
        None => target.get_mut(path),
        Some((head, rest)) => match target.get_mut(head)? {
            Bson::Document(doc) => get_path_mut(doc, rest),
            _ => None,
        },
    }
}

pub(crate) fn unset_path(target: &mut Document, path: &str) {
    match path.rsplit_once(FIELD_SEPARATOR) {
        None => {
            target.remove(path);
        }
        Some((parent, leaf)) => {
            if let Some(Bson::Document(doc)) = get_path_mut(target, parent) {
                doc.remove(leaf);
            }
        }
    }
}

fn increment(target: &mut Document, path: &str, amount: &Bson) -> MogulResult<()> {
    let current = get_path_mut(target, path).map(|v| v.clone());
    let next = match (current, amount) {
        (None, amount) => amount.clone(),
        (Some(Bson::Int32(a)), Bson::Int32(b)) => match a.checked_add(*b) {
            Some(sum) => Bson::Int32(sum),
            None => Bson::Int64(i64::from(a) + i64::from(*b)),
        },
        (Some(Bson::Int32(a)), Bson::Int64(b)) => Bson::Int64(i64::from(a) + b),
        (Some(Bson::Int64(a)), Bson::Int32(b)) => Bson::Int64(a + i64::from(*b)),
        (Some(Bson::Int64(a)), Bson::Int64(b)) => Bson::Int64(a + b),
        (Some(Bson::Double(a)), Bson::Double(b)) => Bson::Double(a + b),
        (Some(Bson::Double(a)), Bson::Int32(b)) => Bson::Double(a + f64::from(*b)),
        (Some(Bson::Double(a)), Bson::Int64(b)) => Bson::Double(a + *b as f64),
        (Some(Bson::Int32(a)), Bson::Double(b)) => Bson::Double(f64::from(a) + b),
        (Some(Bson::Int64(a)), Bson::Double(b)) => Bson::Double(a as f64 + b),
        _ => {
            return Err(MogulError::new(
                &format!("cannot apply $inc to non-numeric field {}", path),
                ErrorKind::InvalidOperation,
            ))
        }
    };
    set_path(target, path, next)
}

fn push(target: &mut Document, path: &str, value: &Bson) -> MogulResult<()> {
    let items = match value {
        Bson::Document(spec) if spec.contains_key("$each") => match spec.get("$each") {
            Some(Bson::Array(items)) => items.clone(),
            _ => {
                return Err(MogulError::new(
                    "$each needs an array",
                    ErrorKind::InvalidOperation,
                ))
            }
        },
        other => vec![other.clone()],
    };

    match get_path_mut(target, path) {
        None => set_path(target, path, Bson::Array(items)),
        Some(Bson::Array(array)) => {
            array.extend(items);
            Ok(())
        }
        Some(_) => Err(MogulError::new(
            &format!("cannot apply $push to non-array field {}", path),
            ErrorKind::InvalidOperation,
        )),
    }
}

/// Seeds the document inserted by an upsert from the equality predicates
/// of its filter, including those nested in `$and`.
pub(crate) fn seed_from_filter(filter: &Document) -> MogulResult<Document> {
    let mut seed = Document::new();
    seed_into(&mut seed, filter)?;
    Ok(seed)
}

fn seed_into(seed: &mut Document, filter: &Document) -> MogulResult<()> {
    for (key, value) in filter {
        if key == OP_AND {
            if let Bson::Array(items) = value {
                for item in items {
                    if let Bson::Document(sub) = item {
                        seed_into(seed, sub)?;
                    }
                }
            }
            continue;
        }
        if key.starts_with('$') {
            continue;
        }
        match value {
            Bson::Document(doc) if doc.keys().next().is_some_and(|k| k.starts_with('$')) => {
                if let Some(eq) = doc.get(OP_EQ) {
                    set_path(seed, key, eq.clone())?;
                }
            }
            Bson::RegularExpression(_) => {}
            other => set_path(seed, key, other.clone())?,
        }
    }
    Ok(())
}
