//! Synthetic class factory and the per-pair cache in front of it.

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;

use swizzle_core::{ClassEntry, RegistrationError, TypeHash};
use swizzle_registry::TypeRegistry;

use super::TemplateInfo;
use crate::error::SwizzleError;

/// Map of (actual class, template class) to the synthetic class built for them.
#[derive(Debug, Default)]
pub struct SyntheticCache {
    by_pair: FxHashMap<(TypeHash, TypeHash), TypeHash>,
}

impl SyntheticCache {
    pub fn get(&self, actual: TypeHash, template: TypeHash) -> Option<TypeHash> {
        self.by_pair.get(&(actual, template)).copied()
    }

    fn insert(&mut self, actual: TypeHash, template: TypeHash, combined: TypeHash) {
        self.by_pair.insert((actual, template), combined);
    }

    pub fn len(&self) -> usize {
        self.by_pair.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty()
    }
}

/// Name of the class combining `actual` with `template`.
pub fn synthetic_class_name(prefix: &str, template: &str, actual: &str) -> String {
    format!("{prefix}{template}_{actual}")
}

/// Find or build the synthetic class for (`actual`, `template`).
///
/// Runs entirely under the cache lock, so for any pair the class is built
/// and registered at most once; concurrent callers wait and then see the
/// cached class. The type table write lock is only taken inside.
pub fn resolve_combined_type(
    cache: &Mutex<SyntheticCache>,
    types: &RwLock<TypeRegistry>,
    prefix: &str,
    actual: TypeHash,
    template: &TemplateInfo,
) -> Result<TypeHash, SwizzleError> {
    let mut cache = cache.lock();
    if let Some(combined) = cache.get(actual, template.template) {
        tracing::trace!(template = %template.name, %combined, "synthetic class cache hit");
        return Ok(combined);
    }

    let mut registry = types.write();
    let actual_name = registry
        .class(actual)
        .map(|c| c.name.clone())
        .ok_or(SwizzleError::UnknownType(actual))?;
    let name = synthetic_class_name(prefix, &template.name, &actual_name);

    if let Some(existing) = registry.class_by_name(&name) {
        if existing.is_synthetic && existing.base_class == Some(actual) && existing.adopts(template.tag) {
            let combined = existing.type_hash;
            cache.insert(actual, template.template, combined);
            tracing::trace!(class = %name, "adopted existing synthetic class");
            return Ok(combined);
        }
        return Err(SwizzleError::RegistrationFailure {
            source: RegistrationError::DuplicateType(name.clone()),
            name,
        });
    }

    let source = registry
        .class(template.template)
        .ok_or(SwizzleError::UnknownType(template.template))?;
    // Only the template's own methods; inherited ones already reach the
    // object through its real ancestry.
    let entry = source
        .methods
        .iter()
        .fold(
            ClassEntry::synthetic(name.clone(), actual).with_protocol(template.tag),
            |entry, method| entry.with_method_entry(method),
        );
    let method_count = entry.methods.len();

    let combined = registry
        .register_class(entry)
        .map_err(|source| SwizzleError::RegistrationFailure {
            name: name.clone(),
            source,
        })?;
    cache.insert(actual, template.template, combined);

    tracing::debug!(
        class = %name,
        base = %actual_name,
        template = %template.name,
        methods = method_count,
        "synthesized class"
    );
    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swizzle::validate_template;
    use swizzle_core::{ProtocolEntry, Value};

    struct Fixture {
        cache: Mutex<SyntheticCache>,
        types: RwLock<TypeRegistry>,
        base: TypeHash,
        info: TemplateInfo,
    }

    fn fixture() -> Fixture {
        let mut registry = TypeRegistry::with_root(ProtocolEntry::new("Object"), ClassEntry::new("Object"));
        let root = TypeHash::from_name("Object");
        let base = registry
            .register_class(
                ClassEntry::new("Base")
                    .with_base(root)
                    .with_method("describe", |_| Ok(Value::from("base")))
                    .with_method("greet", |_| Ok(Value::from("hello"))),
            )
            .unwrap();
        let tag = registry.register_protocol(ProtocolEntry::new("Flavor")).unwrap();
        let template = registry
            .register_class(
                ClassEntry::new("Flavor")
                    .with_base(base)
                    .with_protocol(tag)
                    .with_method("describe", |_| Ok(Value::from("flavored")))
                    .with_method("sweeten", |_| Ok(Value::Void)),
            )
            .unwrap();
        let info = validate_template(&registry, template).unwrap();
        Fixture {
            cache: Mutex::new(SyntheticCache::default()),
            types: RwLock::new(registry),
            base,
            info,
        }
    }

    fn resolve(f: &Fixture, actual: TypeHash) -> Result<TypeHash, SwizzleError> {
        resolve_combined_type(&f.cache, &f.types, "SwizzledWith", actual, &f.info)
    }

    #[test]
    fn name_is_deterministic() {
        assert_eq!(
            synthetic_class_name("SwizzledWith", "Flavor", "Base"),
            "SwizzledWithFlavor_Base"
        );
    }

    #[test]
    fn builds_synthetic_class() {
        let f = fixture();
        let combined = resolve(&f, f.base).unwrap();

        let registry = f.types.read();
        let class = registry.class(combined).unwrap();
        assert_eq!(class.name, "SwizzledWithFlavor_Base");
        assert!(class.is_synthetic);
        assert_eq!(class.base_class, Some(f.base));
        assert!(class.fields.is_empty());
        assert!(class.adopts(f.info.tag));
        assert_eq!(registry.instance_layout(combined), registry.instance_layout(f.base));

        let selectors: Vec<&str> = class.methods.iter().map(|m| m.selector.as_str()).collect();
        assert_eq!(selectors, ["describe", "sweeten"]);
        let template = registry.class(f.info.template).unwrap();
        assert!(class.methods[0].imp.same_impl(&template.methods[0].imp));
        assert_eq!(class.methods[0].owner, combined);
    }

    #[test]
    fn inherited_methods_are_not_copied() {
        let f = fixture();
        let combined = resolve(&f, f.base).unwrap();
        let registry = f.types.read();
        let class = registry.class(combined).unwrap();
        assert!(class.method("greet").is_none());
        assert_eq!(registry.find_method(combined, "greet").unwrap().owner, f.base);
        assert_eq!(registry.find_super_method(combined, "describe").unwrap().owner, f.base);
    }

    #[test]
    fn second_request_hits_cache() {
        let f = fixture();
        let first = resolve(&f, f.base).unwrap();
        let second = resolve(&f, f.base).unwrap();
        assert_eq!(first, second);
        assert_eq!(f.cache.lock().len(), 1);
        assert_eq!(f.types.read().synthetic_classes().count(), 1);
    }

    #[test]
    fn existing_synthetic_class_is_adopted() {
        let f = fixture();
        let combined = resolve(&f, f.base).unwrap();
        // A fresh cache in front of the same table still finds the class by name.
        let fresh = Mutex::new(SyntheticCache::default());
        let again = resolve_combined_type(&fresh, &f.types, "SwizzledWith", f.base, &f.info).unwrap();
        assert_eq!(again, combined);
        assert_eq!(fresh.lock().get(f.base, f.info.template), Some(combined));
    }

    #[test]
    fn foreign_class_with_same_name_fails() {
        let f = fixture();
        f.types
            .write()
            .register_class(ClassEntry::new("SwizzledWithFlavor_Base").with_base(f.base))
            .unwrap();

        let err = resolve(&f, f.base).unwrap_err();
        assert_eq!(
            err,
            SwizzleError::RegistrationFailure {
                name: "SwizzledWithFlavor_Base".into(),
                source: RegistrationError::DuplicateType("SwizzledWithFlavor_Base".into()),
            }
        );
        assert!(f.cache.lock().is_empty());
    }

    #[test]
    fn unknown_actual_class() {
        let f = fixture();
        let missing = TypeHash::from_name("Missing");
        assert_eq!(resolve(&f, missing), Err(SwizzleError::UnknownType(missing)));
    }
}
