use std::cmp::Ordering;

use bson::{Bson, Document};
use regex::{Regex, RegexBuilder};

use super::compare::{compare_same_type, values_equal};
use crate::common::*;
use crate::errors::{ErrorKind, MogulError, MogulResult};

/// Collects the values found at a dotted path.
///
/// Arrays met along the way are traversed: `items.sku` yields the `sku` of
/// every document in `items`. A numeric segment indexes into an array.
pub(crate) fn resolve_path(doc: &Document, path: &str) -> Vec<Bson> {
    let parts: Vec<&str> = path.split(FIELD_SEPARATOR).collect();
    let mut out = Vec::new();
    collect_in_document(doc, &parts, &mut out);
    out
}

fn collect_in_document(doc: &Document, parts: &[&str], out: &mut Vec<Bson>) {
    if let Some((head, rest)) = parts.split_first() {
        if let Some(value) = doc.get(*head) {
            collect_value(value, rest, out);
        }
    }
}

fn collect_value(value: &Bson, parts: &[&str], out: &mut Vec<Bson>) {
    let Some((head, rest)) = parts.split_first() else {
        out.push(value.clone());
        return;
    };

    match value {
        Bson::Document(doc) => collect_in_document(doc, parts, out),
        Bson::Array(items) => {
            if let Ok(index) = head.parse::<usize>() {
                if let Some(item) = items.get(index) {
                    collect_value(item, rest, out);
                }
            }
            for item in items {
                if let Bson::Document(doc) = item {
                    collect_in_document(doc, parts, out);
                }
            }
        }
        _ => {}
    }
}

/// Values at a path plus the elements of every array among them.
fn expand(candidates: &[Bson]) -> Vec<&Bson> {
    let mut out = Vec::new();
    for candidate in candidates {
        out.push(candidate);
        if let Bson::Array(items) = candidate {
            out.extend(items.iter());
        }
    }
    out
}

/// Whether `doc` satisfies `filter`.
///
/// # Errors
///
/// `UnsupportedOperator` for `$expr` and any operator the store does not
/// evaluate, `FilterError` for malformed operands.
pub(crate) fn matches(doc: &Document, filter: &Document) -> MogulResult<bool> {
    for (key, condition) in filter {
        if !matches_entry(doc, key, condition)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn matches_entry(doc: &Document, key: &str, condition: &Bson) -> MogulResult<bool> {
    match key {
        OP_AND => {
            for sub in sub_filters(key, condition)? {
                if !matches(doc, sub)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        OP_OR => {
            for sub in sub_filters(key, condition)? {
                if matches(doc, sub)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        OP_NOR => {
            for sub in sub_filters(key, condition)? {
                if matches(doc, sub)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ if key.starts_with('$') => Err(unsupported(key)),
        _ => {
            let candidates = resolve_path(doc, key);
            matches_condition(&candidates, condition)
        }
    }
}

fn sub_filters<'a>(op: &str, condition: &'a Bson) -> MogulResult<Vec<&'a Document>> {
    let Bson::Array(items) = condition else {
        return Err(MogulError::new(
            &format!("{} needs an array", op),
            ErrorKind::FilterError,
        ));
    };
    items
        .iter()
        .map(|item| match item {
            Bson::Document(doc) => Ok(doc),
            _ => Err(MogulError::new(
                &format!("{} entries must be documents", op),
                ErrorKind::FilterError,
            )),
        })
        .collect()
}

fn is_operator_document(condition: &Bson) -> Option<&Document> {
    match condition {
        Bson::Document(doc) if doc.keys().next().is_some_and(|k| k.starts_with('$')) => Some(doc),
        _ => None,
    }
}

fn matches_condition(candidates: &[Bson], condition: &Bson) -> MogulResult<bool> {
    if let Some(operators) = is_operator_document(condition) {
        return matches_operators(candidates, operators);
    }
    if let Bson::RegularExpression(regex) = condition {
        let regex = compile(&regex.pattern, &regex.options)?;
        return Ok(matches_regex(candidates, &regex));
    }
    Ok(matches_eq(candidates, condition))
}

fn matches_operators(candidates: &[Bson], operators: &Document) -> MogulResult<bool> {
    for (op, operand) in operators {
        let matched = match op.as_str() {
            OP_EQ => matches_eq(candidates, operand),
            OP_NE => !matches_eq(candidates, operand),
            OP_GT => matches_range(candidates, operand, |o| o == Ordering::Greater),
            OP_GTE => matches_range(candidates, operand, |o| o != Ordering::Less),
            OP_LT => matches_range(candidates, operand, |o| o == Ordering::Less),
            OP_LTE => matches_range(candidates, operand, |o| o != Ordering::Greater),
            OP_IN => matches_in(candidates, operand)?,
            OP_NIN => !matches_in(candidates, operand)?,
            OP_EXISTS => truthy(operand) == !candidates.is_empty(),
            OP_NOT => !matches_condition(candidates, operand)?,
            OP_REGEX => {
                let options = operators.get_str(OP_OPTIONS).unwrap_or_default();
                let regex = match operand {
                    Bson::String(pattern) => compile(pattern, options)?,
                    Bson::RegularExpression(regex) => compile(&regex.pattern, &regex.options)?,
                    _ => {
                        return Err(MogulError::new(
                            "$regex needs a string pattern",
                            ErrorKind::FilterError,
                        ))
                    }
                };
                matches_regex(candidates, &regex)
            }
            OP_OPTIONS => true,
            OP_TYPE => matches_type(candidates, operand)?,
            _ => return Err(unsupported(op)),
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn matches_eq(candidates: &[Bson], value: &Bson) -> bool {
    if candidates.is_empty() {
        return matches!(value, Bson::Null);
    }
    expand(candidates)
        .into_iter()
        .any(|candidate| values_equal(candidate, value))
}

fn matches_range(candidates: &[Bson], operand: &Bson, accept: impl Fn(Ordering) -> bool) -> bool {
    expand(candidates)
        .into_iter()
        .filter_map(|candidate| compare_same_type(candidate, operand))
        .any(accept)
}

fn matches_in(candidates: &[Bson], operand: &Bson) -> MogulResult<bool> {
    let Bson::Array(values) = operand else {
        return Err(MogulError::new("$in needs an array", ErrorKind::FilterError));
    };
    for value in values {
        let matched = match value {
            Bson::RegularExpression(regex) => {
                matches_regex(candidates, &compile(&regex.pattern, &regex.options)?)
            }
            _ => matches_eq(candidates, value),
        };
        if matched {
            return Ok(true);
        }
    }
    Ok(false)
}

fn matches_regex(candidates: &[Bson], regex: &Regex) -> bool {
    expand(candidates).into_iter().any(|candidate| match candidate {
        Bson::String(s) => regex.is_match(s),
        _ => false,
    })
}

fn matches_type(candidates: &[Bson], operand: &Bson) -> MogulResult<bool> {
    let specs: Vec<&Bson> = match operand {
        Bson::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    for spec in specs {
        for candidate in expand(candidates) {
            if type_matches(candidate, spec)? {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn type_matches(value: &Bson, spec: &Bson) -> MogulResult<bool> {
    let code = value.element_type() as i64;
    let expected = match spec {
        Bson::Int32(n) => i64::from(*n),
        Bson::Int64(n) => *n,
        Bson::Double(n) => *n as i64,
        Bson::String(alias) => match alias.as_str() {
            "number" => {
                return Ok(matches!(
                    value,
                    Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_)
                ))
            }
            "double" => 1,
            "string" => 2,
            "object" => 3,
            "array" => 4,
            "binData" => 5,
            "undefined" => 6,
            "objectId" => 7,
            "bool" => 8,
            "date" => 9,
            "null" => 10,
            "regex" => 11,
            "int" => 16,
            "timestamp" => 17,
            "long" => 18,
            "decimal" => 19,
            _ => {
                return Err(MogulError::new(
                    &format!("unknown $type alias {}", alias),
                    ErrorKind::FilterError,
                ))
            }
        },
        _ => {
            return Err(MogulError::new(
                "$type needs a type code or alias",
                ErrorKind::FilterError,
            ))
        }
    };
    Ok(code == expected)
}

pub(crate) fn truthy(value: &Bson) -> bool {
    match value {
        Bson::Boolean(b) => *b,
        Bson::Int32(i) => *i != 0,
        Bson::Int64(i) => *i != 0,
        Bson::Double(d) => *d != 0.0,
        Bson::Null | Bson::Undefined => false,
        _ => true,
    }
}

/// Compiles a pattern with driver-style single-letter options.
pub(crate) fn compile(pattern: &str, options: &str) -> MogulResult<Regex> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(options.contains('i'))
        .multi_line(options.contains('m'))
        .dot_matches_new_line(options.contains('s'))
        .ignore_whitespace(options.contains('x'))
        .build()?;
    Ok(regex)
}

fn unsupported(op: &str) -> MogulError {
    log::error!("Unsupported query operator {}", op);
    MogulError::new(
        &format!("unsupported query operator {}", op),
        ErrorKind::UnsupportedOperator,
    )
}
