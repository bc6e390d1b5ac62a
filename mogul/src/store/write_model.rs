use bson::Document;

/// One operation of a bulk write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteModel {
    InsertOne {
        document: Document,
    },
    UpdateOne {
        filter: Document,
        update: Document,
        upsert: Option<bool>,
    },
    UpdateMany {
        filter: Document,
        update: Document,
        upsert: Option<bool>,
    },
    ReplaceOne {
        filter: Document,
        replacement: Document,
        upsert: Option<bool>,
    },
    DeleteOne {
        filter: Document,
    },
    DeleteMany {
        filter: Document,
    },
}

impl WriteModel {
    /// Name of the operation, as used in log lines.
    pub fn operation(&self) -> &'static str {
        match self {
            WriteModel::InsertOne { .. } => "insert_one",
            WriteModel::UpdateOne { .. } => "update_one",
            WriteModel::UpdateMany { .. } => "update_many",
            WriteModel::ReplaceOne { .. } => "replace_one",
            WriteModel::DeleteOne { .. } => "delete_one",
            WriteModel::DeleteMany { .. } => "delete_many",
        }
    }
}
