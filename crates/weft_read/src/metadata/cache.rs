use alloc::format;
use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;

use indexmap::IndexMap;
use weft_introspect::info::{AttributeInfo, ParentInfo, TypeInfo};
use weft_utils::hash::{FixedHashState, HashSet};

use crate::extension::ExtensionRegistry;
use crate::filter::AttributeFilter;
use crate::injector::{FieldInjector, Injector, InjectorFactory};
use crate::memo::Memo;
use crate::metadata::{AttributeDescriptor, AttributeMap, InjectorMap};

// -----------------------------------------------------------------------------
// MetadataRules

/// Everything attribute discovery and injector resolution depend on.
#[derive(Clone, Copy)]
pub struct MetadataRules<'a> {
    pub extensions: &'a ExtensionRegistry,
    pub filters: &'a [Arc<dyn AttributeFilter>],
    pub factories: &'a [Arc<dyn InjectorFactory>],
}

// -----------------------------------------------------------------------------
// TypeMetadataCache

/// Per-type memo of [`AttributeMap`]s and [`InjectorMap`]s.
///
/// Concurrent first requests for one type run exactly one build and all
/// observe its result; requests for other types are not serialized behind it.
///
/// The maps are pure functions of the type and the [`MetadataRules`]; a cache
/// must be cleared (or replaced) whenever the rules change.
#[derive(Default)]
pub struct TypeMetadataCache {
    attributes: Memo<Arc<AttributeMap>>,
    injectors: Memo<Arc<InjectorMap>>,
}

impl TypeMetadataCache {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The deep attribute map of `info`, built on first request.
    pub fn attributes_of(&self, info: &'static TypeInfo, rules: &MetadataRules<'_>) -> Arc<AttributeMap> {
        self.attributes
            .get_or_init(info.type_id(), || Arc::new(build_attribute_map(info, rules)))
    }

    /// The injector map of `info`, built on first request from [`attributes_of`](Self::attributes_of).
    pub fn injectors_of(&self, info: &'static TypeInfo, rules: &MetadataRules<'_>) -> Arc<InjectorMap> {
        self.injectors.get_or_init(info.type_id(), || {
            let attributes = self.attributes_of(info, rules);
            Arc::new(build_injector_map(&attributes, rules))
        })
    }

    /// Number of types with a cached attribute map.
    #[inline]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.attributes.clear();
        self.injectors.clear();
    }
}

// -----------------------------------------------------------------------------
// Builders

/// Walks `info` and its parents, most-derived first.
///
/// Exclusions accumulate on the way up: names excluded for a type stay
/// excluded for all of its ancestors.
pub(crate) fn build_attribute_map(info: &'static TypeInfo, rules: &MetadataRules<'_>) -> AttributeMap {
    let mut entries = IndexMap::with_hasher(FixedHashState);
    let mut exclusions: HashSet<&str> = HashSet::with_hasher(FixedHashState);
    let mut path: Vec<&'static ParentInfo> = Vec::new();
    let mut current = Some(info);

    while let Some(declaring) = current {
        exclusions.extend(rules.extensions.excluded_names(declaring.ty()));

        for attribute in declaring.attributes() {
            let name = attribute.name();
            if attribute.is_static()
                || exclusions.contains(name)
                || is_filtered(attribute, declaring, rules.filters)
            {
                continue;
            }

            let descriptor = AttributeDescriptor::new(attribute, declaring, path.as_slice());
            if entries.contains_key(name) {
                // A more derived type already owns the bare name.
                entries.insert(format!("{}.{name}", declaring.name()), descriptor);
            } else {
                entries.insert(name.to_string(), descriptor);
            }
        }

        current = declaring.parent().map(|parent| {
            path.push(parent);
            parent.type_info()
        });
    }

    log::trace!("attribute map of `{}`: {} entries", info.type_path(), entries.len());
    AttributeMap::from_entries(entries)
}

fn is_filtered(attribute: &AttributeInfo, declaring: &TypeInfo, filters: &[Arc<dyn AttributeFilter>]) -> bool {
    filters.iter().any(|filter| match filter.excludes(attribute, declaring) {
        Ok(excluded) => excluded,
        Err(err) => {
            log::debug!(
                "attribute filter ignored for `{}.{}`: {err}",
                declaring.name(),
                attribute.name(),
            );
            false
        }
    })
}

/// First factory that produces an injector wins; otherwise a [`FieldInjector`]
/// is used, and attributes without any write path are left out.
pub(crate) fn build_injector_map(attributes: &AttributeMap, rules: &MetadataRules<'_>) -> InjectorMap {
    let mut entries = IndexMap::with_capacity_and_hasher(attributes.len(), FixedHashState);

    for (key, attribute) in attributes.iter() {
        let injector = find_injector(attribute, key, rules).or_else(|| {
            FieldInjector::new(key, attribute.clone()).map(|i| Arc::new(i) as Arc<dyn Injector>)
        });

        match injector {
            Some(injector) => {
                entries.insert(key.to_string(), injector);
            }
            None => log::debug!("no injector for `{attribute:?}`, attribute is read-only"),
        }
    }

    InjectorMap::from_entries(entries)
}

fn find_injector(attribute: &AttributeDescriptor, key: &str, rules: &MetadataRules<'_>) -> Option<Arc<dyn Injector>> {
    let mappings = rules.extensions.non_standard_mappings();
    for factory in rules.factories {
        match factory.create(attribute, key, mappings) {
            Ok(Some(injector)) => return Some(injector),
            Ok(None) => {}
            Err(err) => log::debug!("injector factory declined `{attribute:?}`: {err}"),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;

    use serde_json::json;
    use weft_introspect::info::{AttributeInfo, Type, TypeInfo, Typed};
    use weft_utils::collections::SealFlag;

    use super::{MetadataRules, TypeMetadataCache, build_attribute_map};
    use crate::extension::{ExtensionRegistry, NonStandardMappings};
    use crate::filter::{AttributeFilter, EnumAttributeFilter, StaticAttributeFilter};
    use crate::fixtures::{Animal, Dog, Person, Robot};
    use crate::injector::{Injector, InjectorFactory, MethodInjectorFactory};
    use crate::metadata::AttributeDescriptor;
    use crate::{BoxError, InjectError};

    fn default_filters() -> Vec<Arc<dyn AttributeFilter>> {
        alloc::vec![Arc::new(StaticAttributeFilter), Arc::new(EnumAttributeFilter)]
    }

    fn default_factories() -> Vec<Arc<dyn InjectorFactory>> {
        alloc::vec![Arc::new(MethodInjectorFactory)]
    }

    fn keys_of(info: &'static TypeInfo, extensions: &ExtensionRegistry) -> Vec<String> {
        let (filters, factories) = (default_filters(), default_factories());
        let rules = MetadataRules {
            extensions,
            filters: &filters,
            factories: &factories,
        };
        build_attribute_map(info, &rules).keys().map(String::from).collect()
    }

    #[test]
    fn shadowed_ancestor_attribute_is_qualified() {
        let extensions = ExtensionRegistry::new(SealFlag::new());
        let (filters, factories) = (default_filters(), default_factories());
        let rules = MetadataRules {
            extensions: &extensions,
            filters: &filters,
            factories: &factories,
        };

        let cache = TypeMetadataCache::new();
        let map = cache.attributes_of(Dog::type_info(), &rules);

        assert_eq!(map.keys().collect::<Vec<_>>(), ["name", "breed", "Animal.name", "age"]);
        assert_eq!(map.get("name").unwrap().declaring_type(), Type::of::<Dog>());
        let shadowed = map.get("Animal.name").unwrap();
        assert_eq!(shadowed.declaring_type(), Type::of::<Animal>());
        assert_eq!(shadowed.name(), "name");
        assert_eq!(shadowed.depth(), 1);
        assert!(!map.contains_key("LEGS"));
    }

    #[test]
    fn maps_are_memoized_and_stable() {
        let extensions = ExtensionRegistry::new(SealFlag::new());
        let (filters, factories) = (default_filters(), default_factories());
        let rules = MetadataRules {
            extensions: &extensions,
            filters: &filters,
            factories: &factories,
        };

        let cache = TypeMetadataCache::new();
        let first = cache.attributes_of(Dog::type_info(), &rules);
        let second = cache.attributes_of(Dog::type_info(), &rules);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, build_attribute_map(Dog::type_info(), &rules));

        let injectors = cache.injectors_of(Dog::type_info(), &rules);
        assert!(Arc::ptr_eq(&injectors, &cache.injectors_of(Dog::type_info(), &rules)));
        assert_eq!(injectors.keys().collect::<Vec<_>>(), first.keys().collect::<Vec<_>>());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn exclusions_accumulate_up_the_chain() {
        let mut extensions = ExtensionRegistry::new(SealFlag::new());
        extensions.exclude_attributes(Type::of::<Dog>(), ["age"]).unwrap();
        assert_eq!(keys_of(Dog::type_info(), &extensions), ["name", "breed", "Animal.name"]);

        // Excluding on the ancestor does not hide the subtype's own attribute.
        let mut extensions = ExtensionRegistry::new(SealFlag::new());
        extensions
            .exclude_injector_attributes(Type::of::<Animal>(), ["name"])
            .unwrap();
        assert_eq!(keys_of(Dog::type_info(), &extensions), ["name", "breed", "age"]);
        assert_eq!(keys_of(Animal::type_info(), &extensions), ["age"]);
    }

    #[test]
    fn injectors_write_through_parent_links() {
        let extensions = ExtensionRegistry::new(SealFlag::new());
        let (filters, factories) = (default_filters(), default_factories());
        let rules = MetadataRules {
            extensions: &extensions,
            filters: &filters,
            factories: &factories,
        };
        let injectors = TypeMetadataCache::new().injectors_of(Dog::type_info(), &rules);

        let mut dog = Dog::default();
        injectors.get("name").unwrap().inject(&mut dog, json!("Fido")).unwrap();
        injectors.get("Animal.name").unwrap().inject(&mut dog, json!("Rex")).unwrap();
        injectors.get("age").unwrap().inject(&mut dog, json!(3)).unwrap();
        assert_eq!((dog.name.as_str(), dog.animal.name.as_str(), dog.animal.age), ("Fido", "Rex", 3));

        let age = injectors.get("age").unwrap();
        assert_eq!(age.declaring_type(), Type::of::<Animal>());
        assert!(matches!(
            age.inject(&mut Robot::default(), json!(3)),
            Err(InjectError::TargetMismatch { .. })
        ));
        assert!(matches!(
            age.inject(&mut dog, json!("old")),
            Err(InjectError::Access { .. })
        ));
    }

    #[test]
    fn setters_cover_attributes_without_accessors() {
        let mut extensions = ExtensionRegistry::new(SealFlag::new());
        let (filters, factories) = (default_filters(), default_factories());
        {
            let rules = MetadataRules {
                extensions: &extensions,
                filters: &filters,
                factories: &factories,
            };
            let injectors = TypeMetadataCache::new().injectors_of(Person::type_info(), &rules);

            // `id` has neither an accessor nor a setter.
            assert_eq!(injectors.keys().collect::<Vec<_>>(), ["nickname", "title"]);
            let nickname = injectors.get("nickname").unwrap();
            assert!(format!("{nickname:?}").contains("set_nickname"));

            let mut person = Person::default();
            nickname.inject(&mut person, json!("Bo")).unwrap();
            injectors.get("title").unwrap().inject(&mut person, json!("dr")).unwrap();
            assert_eq!((person.nickname.as_str(), person.title.as_str()), ("Bo", "dr"));
        }

        extensions
            .set_non_standard_mapping(Type::of::<Person>(), "title", "assign_title")
            .unwrap();
        let rules = MetadataRules {
            extensions: &extensions,
            filters: &filters,
            factories: &factories,
        };
        let injectors = TypeMetadataCache::new().injectors_of(Person::type_info(), &rules);
        let mut person = Person::default();
        injectors.get("title").unwrap().inject(&mut person, json!("dr")).unwrap();
        assert_eq!(person.title, "DR");
    }

    struct Failing;

    impl InjectorFactory for Failing {
        fn create(
            &self,
            _: &AttributeDescriptor,
            _: &str,
            _: &NonStandardMappings,
        ) -> Result<Option<Arc<dyn Injector>>, BoxError> {
            Err("unsupported".into())
        }
    }

    impl AttributeFilter for Failing {
        fn excludes(&self, _: &AttributeInfo, _: &TypeInfo) -> Result<bool, BoxError> {
            Err("unsupported".into())
        }
    }

    #[test]
    fn failing_strategies_decline() {
        let extensions = ExtensionRegistry::new(SealFlag::new());
        let filters: Vec<Arc<dyn AttributeFilter>> = alloc::vec![Arc::new(Failing), Arc::new(StaticAttributeFilter)];
        let factories: Vec<Arc<dyn InjectorFactory>> = alloc::vec![Arc::new(Failing), Arc::new(MethodInjectorFactory)];
        let rules = MetadataRules {
            extensions: &extensions,
            filters: &filters,
            factories: &factories,
        };

        let injectors = TypeMetadataCache::new().injectors_of(Person::type_info(), &rules);
        assert_eq!(injectors.keys().collect::<Vec<_>>(), ["nickname", "title"]);
    }

    struct Counting(AtomicUsize);

    impl AttributeFilter for Counting {
        fn excludes(&self, _: &AttributeInfo, _: &TypeInfo) -> Result<bool, BoxError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(false)
        }
    }

    #[test]
    fn concurrent_first_use_builds_once() {
        let extensions = ExtensionRegistry::new(SealFlag::new());
        let counting = Arc::new(Counting(AtomicUsize::new(0)));
        let filters: Vec<Arc<dyn AttributeFilter>> = alloc::vec![counting.clone()];
        let factories = default_factories();
        let rules = MetadataRules {
            extensions: &extensions,
            filters: &filters,
            factories: &factories,
        };

        let cache = TypeMetadataCache::new();
        let barrier = Barrier::new(8);
        let maps: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        cache.injectors_of(Dog::type_info(), &rules)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        // Dog declares two attributes and Animal two non-static ones.
        assert_eq!(counting.0.load(Ordering::SeqCst), 4);
        assert!(maps.iter().all(|m| Arc::ptr_eq(m, &maps[0])));
    }
}
