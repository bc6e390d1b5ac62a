use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use bson::{Bson, Document};

use crate::errors::{ErrorKind, MogulError, MogulResult};

/// A value `filter_by` can turn into equality predicates.
///
/// `#[derive(Model)]` and `#[derive(Embedded)]` implement it from the
/// struct's filter tags. Maps contribute one equality per entry in their
/// iteration order, which is unspecified for `HashMap`.
pub trait FilterSource {
    fn filter_entries(&self) -> MogulResult<Vec<(String, Bson)>>;
}

impl FilterSource for Document {
    fn filter_entries(&self) -> MogulResult<Vec<(String, Bson)>> {
        Ok(self
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

impl<V, S> FilterSource for HashMap<String, V, S>
where
    V: Into<Bson> + Clone,
    S: BuildHasher,
{
    fn filter_entries(&self) -> MogulResult<Vec<(String, Bson)>> {
        Ok(self
            .iter()
            .map(|(key, value)| (key.clone(), value.clone().into()))
            .collect())
    }
}

impl<V> FilterSource for BTreeMap<String, V>
where
    V: Into<Bson> + Clone,
{
    fn filter_entries(&self) -> MogulResult<Vec<(String, Bson)>> {
        Ok(self
            .iter()
            .map(|(key, value)| (key.clone(), value.clone().into()))
            .collect())
    }
}

impl FilterSource for Bson {
    fn filter_entries(&self) -> MogulResult<Vec<(String, Bson)>> {
        match self {
            Bson::Document(doc) => doc.filter_entries(),
            other => Err(MogulError::new(
                &format!(
                    "filter_by needs a struct or a map, got {:?}",
                    other.element_type()
                ),
                ErrorKind::InvalidFilterSource,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn documents_keep_order() {
        let entries = doc! { "b": 1, "a": 2 }.filter_entries().unwrap();
        assert_eq!(entries[0].0, "b");
        assert_eq!(entries[1].0, "a");
    }

    #[test]
    fn maps_yield_every_entry() {
        let mut map = HashMap::new();
        map.insert("name".to_string(), "ann");
        map.insert("city".to_string(), "NYC");
        let mut entries = map.filter_entries().unwrap();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            entries,
            vec![
                ("city".to_string(), Bson::String("NYC".into())),
                ("name".to_string(), Bson::String("ann".into())),
            ]
        );

        let mut tree = BTreeMap::new();
        tree.insert("z".to_string(), 1);
        tree.insert("a".to_string(), 2);
        let keys: Vec<String> = tree.filter_entries().unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "z"]);
    }

    #[test]
    fn scalars_are_rejected() {
        let err = Bson::Int32(5).filter_entries().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidFilterSource);
        assert!(err.message().starts_with("filter_by needs a struct or a map"));
    }
}
