/// Direction of a sort key.
///
/// Serialized as `1` for ascending and `-1` for descending, the numeric form
/// document stores expect inside a sort specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest value first
    Ascending,
    /// Largest value first
    Descending,
}

impl SortOrder {
    pub fn as_i32(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    /// Splits a `-`-prefixed field name into the bare field and its direction.
    pub fn parse_field(field: &str) -> (&str, SortOrder) {
        match field.strip_prefix('-') {
            Some(stripped) => (stripped, SortOrder::Descending),
            None => (field, SortOrder::Ascending),
        }
    }
}
