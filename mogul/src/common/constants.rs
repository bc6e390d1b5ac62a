/// Primary identifier field of every stored document.
pub const DOC_ID: &str = "_id";

/// Default field written by soft deletes.
pub const DELETED_AT: &str = "deleted_at";

/// Database used when neither the client config nor the session names one.
pub const DEFAULT_DATABASE: &str = "test";

/// Separator between the segments of a nested field path.
pub const FIELD_SEPARATOR: &str = ".";

/// Separator between the segments of a filter tag.
pub const TAG_SEPARATOR: char = ',';

/// Filter tag value that excludes a field from struct filters.
pub const TAG_SKIP: &str = "-";

pub const OP_EQ: &str = "$eq";
pub const OP_NE: &str = "$ne";
pub const OP_GT: &str = "$gt";
pub const OP_GTE: &str = "$gte";
pub const OP_LT: &str = "$lt";
pub const OP_LTE: &str = "$lte";
pub const OP_IN: &str = "$in";
pub const OP_NIN: &str = "$nin";
pub const OP_NOT: &str = "$not";
pub const OP_EXISTS: &str = "$exists";
pub const OP_REGEX: &str = "$regex";
pub const OP_OPTIONS: &str = "$options";
pub const OP_TYPE: &str = "$type";
pub const OP_AND: &str = "$and";
pub const OP_OR: &str = "$or";
pub const OP_NOR: &str = "$nor";
pub const OP_EXPR: &str = "$expr";

pub const OP_SET: &str = "$set";
pub const OP_UNSET: &str = "$unset";
pub const OP_INC: &str = "$inc";
pub const OP_PUSH: &str = "$push";

pub const STAGE_MATCH: &str = "$match";
pub const STAGE_SORT: &str = "$sort";
pub const STAGE_SKIP: &str = "$skip";
pub const STAGE_LIMIT: &str = "$limit";
pub const STAGE_PROJECT: &str = "$project";
pub const STAGE_COUNT: &str = "$count";

/// Regex options applied by the case-insensitive pattern predicates.
pub const CASE_INSENSITIVE: &str = "i";
