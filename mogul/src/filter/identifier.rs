use bson::oid::ObjectId;

use crate::errors::{ErrorKind, MogulError, MogulResult};

/// An identifier in either of its accepted forms.
///
/// Converted to an [`ObjectId`] when a predicate uses it; the hex form must
/// parse and neither form may be the nil id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdInput {
    ObjectId(ObjectId),
    Hex(String),
}

impl IdInput {
    pub fn object_id(&self) -> MogulResult<ObjectId> {
        match self {
            IdInput::ObjectId(oid) => check_not_nil(*oid, &oid.to_hex()),
            IdInput::Hex(hex) => parse_object_id(hex),
        }
    }
}

/// Parses a 24-character hex string into a non-nil [`ObjectId`].
pub fn parse_object_id(hex: &str) -> MogulResult<ObjectId> {
    match ObjectId::parse_str(hex) {
        Ok(oid) => check_not_nil(oid, hex),
        Err(err) => Err(MogulError::new_with_cause(
            &format!("invalid identifier {:?}", hex),
            ErrorKind::InvalidId,
            err.into(),
        )),
    }
}

fn check_not_nil(oid: ObjectId, source: &str) -> MogulResult<ObjectId> {
    if oid.bytes() == [0u8; 12] {
        Err(MogulError::new(
            &format!("invalid identifier {:?}: nil object id", source),
            ErrorKind::InvalidId,
        ))
    } else {
        Ok(oid)
    }
}

impl From<ObjectId> for IdInput {
    fn from(oid: ObjectId) -> Self {
        IdInput::ObjectId(oid)
    }
}

impl From<&ObjectId> for IdInput {
    fn from(oid: &ObjectId) -> Self {
        IdInput::ObjectId(*oid)
    }
}

impl From<&str> for IdInput {
    fn from(hex: &str) -> Self {
        IdInput::Hex(hex.to_string())
    }
}

impl From<String> for IdInput {
    fn from(hex: String) -> Self {
        IdInput::Hex(hex)
    }
}

impl From<&String> for IdInput {
    fn from(hex: &String) -> Self {
        IdInput::Hex(hex.clone())
    }
}
