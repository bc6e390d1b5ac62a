use std::collections::{BTreeMap, HashMap};

use bson::oid::ObjectId;
use bson::{Bson, DateTime, Document};

use super::{FieldKind, FieldValue, ModelField};
use crate::errors::{ErrorKind, MogulError, MogulResult};

macro_rules! int32_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn to_bson(&self) -> MogulResult<Bson> {
                    Ok(Bson::Int32(i32::from(*self)))
                }

                fn is_zero(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

macro_rules! int64_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn to_bson(&self) -> MogulResult<Bson> {
                    match i64::try_from(*self) {
                        Ok(value) => Ok(Bson::Int64(value)),
                        Err(_) => {
                            log::error!("{} does not fit in a 64-bit signed integer", self);
                            Err(MogulError::new(
                                &format!("{} does not fit in a 64-bit signed integer", self),
                                ErrorKind::EncodingError,
                            ))
                        }
                    }
                }

                fn is_zero(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

int32_field_value!(i8, i16, i32, u8, u16);
int64_field_value!(i64, u32, u64, usize, isize);

impl FieldValue for bool {
    fn to_bson(&self) -> MogulResult<Bson> {
        Ok(Bson::Boolean(*self))
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

impl FieldValue for f32 {
    fn to_bson(&self) -> MogulResult<Bson> {
        Ok(Bson::Double(f64::from(*self)))
    }

    fn is_zero(&self) -> bool {
        *self == 0.0
    }
}

impl FieldValue for f64 {
    fn to_bson(&self) -> MogulResult<Bson> {
        Ok(Bson::Double(*self))
    }

    fn is_zero(&self) -> bool {
        *self == 0.0
    }
}

impl FieldValue for String {
    fn to_bson(&self) -> MogulResult<Bson> {
        Ok(Bson::String(self.clone()))
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl FieldValue for ObjectId {
    fn to_bson(&self) -> MogulResult<Bson> {
        Ok(Bson::ObjectId(*self))
    }

    fn is_zero(&self) -> bool {
        self.bytes() == [0u8; 12]
    }
}

impl FieldValue for DateTime {
    fn to_bson(&self) -> MogulResult<Bson> {
        Ok(Bson::DateTime(*self))
    }

    fn is_zero(&self) -> bool {
        self.timestamp_millis() == 0
    }
}

impl FieldValue for Bson {
    fn to_bson(&self) -> MogulResult<Bson> {
        Ok(self.clone())
    }

    fn is_zero(&self) -> bool {
        match self {
            Bson::Null | Bson::Undefined => true,
            Bson::Document(doc) => doc.is_empty(),
            Bson::Array(array) => array.is_empty(),
            Bson::String(s) => s.is_empty(),
            Bson::Int32(i) => *i == 0,
            Bson::Int64(i) => *i == 0,
            Bson::Double(d) => *d == 0.0,
            Bson::Boolean(b) => !*b,
            _ => false,
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            Bson::Array(_) => FieldKind::Array,
            _ => FieldKind::Scalar,
        }
    }
}

impl FieldValue for Document {
    fn to_bson(&self) -> MogulResult<Bson> {
        Ok(Bson::Document(self.clone()))
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_bson(&self) -> MogulResult<Bson> {
        match self {
            Some(value) => value.to_bson(),
            None => Ok(Bson::Null),
        }
    }

    // a present value is never zero, even when it wraps a zero value
    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn kind(&self) -> FieldKind {
        match self {
            Some(value) => value.kind(),
            None => FieldKind::Scalar,
        }
    }

    fn nested_fields(&self) -> Option<Vec<ModelField<'_>>> {
        self.as_ref().and_then(|value| value.nested_fields())
    }
}

impl<T: FieldValue> FieldValue for Box<T> {
    fn to_bson(&self) -> MogulResult<Bson> {
        self.as_ref().to_bson()
    }

    fn is_zero(&self) -> bool {
        self.as_ref().is_zero()
    }

    fn kind(&self) -> FieldKind {
        self.as_ref().kind()
    }

    fn nested_fields(&self) -> Option<Vec<ModelField<'_>>> {
        self.as_ref().nested_fields()
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn to_bson(&self) -> MogulResult<Bson> {
        let values = self
            .iter()
            .map(FieldValue::to_bson)
            .collect::<MogulResult<Vec<_>>>()?;
        Ok(Bson::Array(values))
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Array
    }
}

impl<T: FieldValue> FieldValue for HashMap<String, T> {
    fn to_bson(&self) -> MogulResult<Bson> {
        let mut doc = Document::new();
        for (key, value) in self {
            doc.insert(key.clone(), value.to_bson()?);
        }
        Ok(Bson::Document(doc))
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: FieldValue> FieldValue for BTreeMap<String, T> {
    fn to_bson(&self) -> MogulResult<Bson> {
        let mut doc = Document::new();
        for (key, value) in self {
            doc.insert(key.clone(), value.to_bson()?);
        }
        Ok(Bson::Document(doc))
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}
