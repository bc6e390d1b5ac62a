//! Collection name resolution.
//!
//! A model's collection name comes from, in priority order:
//!
//! 1. the value's own [`Model::custom_collection_name`], never cached;
//! 2. the resolver's per-type cache;
//! 3. the default value's `custom_collection_name`, which is cached;
//! 4. the naming convention applied to [`Model::type_name`], not cached.
//!
//! The cache belongs to the [`NameResolver`], which a client creates once
//! and shares with all its sessions. Separate clients never share names.

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use dashmap::DashMap;

use crate::common::NamingConvention;
use crate::errors::{ErrorKind, MogulError, MogulResult};
use crate::model::Model;

/// A resolved collection name and the type it was resolved for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDescriptor {
    name: String,
    type_name: &'static str,
}

impl CollectionDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Maps model types to collection names.
///
/// Cheap to clone; clones share the cache. Safe to use from many threads:
/// concurrent resolutions of the same type write the same name.
#[derive(Clone)]
pub struct NameResolver {
    cache: Arc<DashMap<TypeId, String>>,
    convention: NamingConvention,
}

impl NameResolver {
    pub fn new(convention: NamingConvention) -> Self {
        NameResolver {
            cache: Arc::new(DashMap::new()),
            convention,
        }
    }

    pub fn convention(&self) -> &NamingConvention {
        &self.convention
    }

    /// Resolves the collection of a model value.
    ///
    /// # Arguments
    ///
    /// * `value` - The model whose collection is needed; its own name
    ///   override wins over every other source
    ///
    /// # Returns
    ///
    /// The descriptor, or `InvalidCollectionName` when the resolved name is
    /// not usable.
    pub fn resolve<T: Model>(&self, value: &T) -> MogulResult<CollectionDescriptor> {
        if let Some(name) = value.custom_collection_name().filter(|n| !n.is_empty()) {
            return descriptor::<T>(name);
        }
        self.resolve_type::<T>()
    }

    /// Resolves the collection of a model type without a value at hand.
    pub fn resolve_type<T: Model>(&self) -> MogulResult<CollectionDescriptor> {
        let type_id = TypeId::of::<T>();
        if let Some(name) = self.cache.get(&type_id).filter(|n| !n.is_empty()) {
            log::trace!("Collection name cache hit for {}: {}", T::type_name(), *name);
            return descriptor::<T>(name.clone());
        }

        if let Some(name) = T::default().custom_collection_name().filter(|n| !n.is_empty()) {
            let descriptor = descriptor::<T>(name)?;
            self.cache.insert(type_id, descriptor.name.clone());
            return Ok(descriptor);
        }

        descriptor::<T>(self.convention.apply(T::type_name()))
    }

    /// Resolves the collection of a slice's element type.
    pub fn resolve_slice<T: Model>(&self, _values: &[T]) -> MogulResult<CollectionDescriptor> {
        self.resolve_type::<T>()
    }

    /// Resolves the collection of a map's value type.
    pub fn resolve_map<K, T: Model, S>(
        &self,
        _values: &HashMap<K, T, S>,
    ) -> MogulResult<CollectionDescriptor> {
        self.resolve_type::<T>()
    }

    /// Resolves the collection of a sorted map's value type.
    pub fn resolve_btree_map<K, T: Model>(
        &self,
        _values: &BTreeMap<K, T>,
    ) -> MogulResult<CollectionDescriptor> {
        self.resolve_type::<T>()
    }

    /// The cached name of a type, if one was cached.
    pub fn cached_name<T: Model>(&self) -> Option<String> {
        self.cache.get(&TypeId::of::<T>()).map(|name| name.clone())
    }
}

impl Default for NameResolver {
    fn default() -> Self {
        NameResolver::new(NamingConvention::default())
    }
}

impl Debug for NameResolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameResolver")
            .field("cached", &self.cache.len())
            .finish()
    }
}

fn descriptor<T: Model>(name: String) -> MogulResult<CollectionDescriptor> {
    validate_collection_name(&name, T::type_name())?;
    Ok(CollectionDescriptor {
        name,
        type_name: T::type_name(),
    })
}

fn validate_collection_name(name: &str, type_name: &str) -> MogulResult<()> {
    if name.is_empty() || name.contains('$') || name.contains('\0') {
        log::error!("{:?} is not a valid collection name for {}", name, type_name);
        return Err(MogulError::new(
            &format!("{:?} is not a valid collection name for {}", name, type_name),
            ErrorKind::InvalidCollectionName,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CollectionName, Model};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize, Model)]
    struct UserAccount {
        name: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize, Model)]
    #[model(collection = "people")]
    struct Person {
        name: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize, Model)]
    #[model(custom_name)]
    struct TenantOrder {
        tenant: String,
    }

    impl CollectionName for TenantOrder {
        fn collection_name(&self) -> String {
            if self.tenant.is_empty() {
                "orders".to_string()
            } else {
                format!("orders_{}", self.tenant)
            }
        }
    }

    #[derive(Debug, Default, Serialize, Deserialize, Model)]
    #[model(collection = "bad$name")]
    struct Broken {
        name: String,
    }

    #[test]
    fn convention_applies_to_type_name() {
        let resolver = NameResolver::default();
        let first = resolver.resolve(&UserAccount::default()).unwrap();
        let second = resolver.resolve(&UserAccount::default()).unwrap();
        assert_eq!(first.name(), "user_account");
        assert_eq!(first, second);
        assert_eq!(first.type_name(), "UserAccount");
        assert!(resolver.cached_name::<UserAccount>().is_none());
    }

    #[test]
    fn declared_name_is_cached() {
        let resolver = NameResolver::default();
        assert_eq!(resolver.resolve_type::<Person>().unwrap().name(), "people");
        assert_eq!(resolver.cached_name::<Person>().as_deref(), Some("people"));
        assert_eq!(resolver.resolve_slice(&[Person::default()]).unwrap().name(), "people");
        let mut map = HashMap::new();
        map.insert(1, Person::default());
        assert_eq!(resolver.resolve_map(&map).unwrap().name(), "people");
    }

    #[test]
    fn value_override_wins_over_cache() {
        let resolver = NameResolver::default();
        assert_eq!(resolver.resolve_type::<TenantOrder>().unwrap().name(), "orders");
        let acme = TenantOrder {
            tenant: "acme".into(),
        };
        assert_eq!(resolver.resolve(&acme).unwrap().name(), "orders_acme");
        assert_eq!(resolver.resolve_type::<TenantOrder>().unwrap().name(), "orders");
    }

    #[test]
    fn resolvers_do_not_share_caches() {
        let left = NameResolver::default();
        let right = NameResolver::new(NamingConvention::identity());
        left.resolve_type::<Person>().unwrap();
        assert!(right.cached_name::<Person>().is_none());
        assert_eq!(right.resolve_type::<UserAccount>().unwrap().name(), "UserAccount");
    }

    #[test]
    fn invalid_names_are_rejected() {
        let resolver = NameResolver::default();
        let err = resolver.resolve_type::<Broken>().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidCollectionName);

        let empty = NameResolver::new(NamingConvention::new(|_| String::new()));
        let err = empty.resolve_type::<UserAccount>().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidCollectionName);
    }
}
