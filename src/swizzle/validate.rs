//! Compatibility validation for template classes.

use swizzle_core::{PrepareHook, TypeHash};
use swizzle_registry::TypeRegistry;

use crate::error::{IncompatibilityReason, SwizzleError};

/// What the engine needs to know about a validated template.
#[derive(Debug, Clone)]
pub struct TemplateInfo {
    /// Template class hash.
    pub template: TypeHash,
    /// Template class name.
    pub name: String,
    /// The class objects must descend from.
    pub expected_base: TypeHash,
    /// The template's capability protocol.
    pub tag: TypeHash,
    /// Hook to run after a successful swizzle.
    pub prepare_hook: Option<PrepareHook>,
}

/// Check that a template class can be layered onto live objects.
///
/// A template must not add storage: no fields, and no property without the
/// `DYNAMIC` attribute. It must have a base class, and it must adopt a
/// protocol carrying its own name.
pub fn validate_template(registry: &TypeRegistry, template: TypeHash) -> Result<TemplateInfo, SwizzleError> {
    let entry = registry.class(template).ok_or(SwizzleError::UnknownType(template))?;
    let incompatible = |reason| SwizzleError::Incompatible {
        template: entry.name.clone(),
        reason,
    };

    if !entry.fields.is_empty() {
        let names = entry.fields.iter().map(|f| f.name.clone()).collect();
        return Err(incompatible(IncompatibilityReason::DeclaresFields(names)));
    }

    let stored: Vec<String> = entry
        .properties
        .iter()
        .filter(|p| !p.is_dynamic())
        .map(|p| p.name.clone())
        .collect();
    if !stored.is_empty() {
        return Err(incompatible(IncompatibilityReason::DeclaresStoredProperties(stored)));
    }

    let expected_base = entry
        .base_class
        .ok_or_else(|| incompatible(IncompatibilityReason::NoBaseClass))?;

    let tag = registry
        .protocol_by_name(&entry.name)
        .map(|p| p.type_hash)
        .filter(|&tag| entry.adopts(tag))
        .ok_or_else(|| incompatible(IncompatibilityReason::MissingCapabilityTag(entry.name.clone())))?;

    Ok(TemplateInfo {
        template,
        name: entry.name.clone(),
        expected_base,
        tag,
        prepare_hook: entry.prepare_hook.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use swizzle_core::{ClassEntry, FieldEntry, PropertyEntry, ProtocolEntry, Value, ValueKind};

    fn registry() -> (TypeRegistry, TypeHash) {
        let registry = TypeRegistry::with_root(ProtocolEntry::new("Object"), ClassEntry::new("Object"));
        (registry, TypeHash::from_name("Object"))
    }

    fn tagged(registry: &mut TypeRegistry, name: &str) -> TypeHash {
        registry.register_protocol(ProtocolEntry::new(name)).unwrap()
    }

    fn reason(result: Result<TemplateInfo, SwizzleError>) -> IncompatibilityReason {
        match result {
            Err(SwizzleError::Incompatible { reason, .. }) => reason,
            other => panic!("expected Incompatible, got {other:?}"),
        }
    }

    #[test]
    fn accepts_method_only_template() {
        let (mut registry, root) = registry();
        let tag = tagged(&mut registry, "Flavor");
        let template = registry
            .register_class(
                ClassEntry::new("Flavor")
                    .with_base(root)
                    .with_protocol(tag)
                    .with_method("describe", |_| Ok(Value::from("flavored")))
                    .with_property(PropertyEntry::dynamic("topping", ValueKind::String)),
            )
            .unwrap();

        let info = validate_template(&registry, template).unwrap();
        assert_eq!(info.name, "Flavor");
        assert_eq!(info.expected_base, root);
        assert_eq!(info.tag, tag);
        assert!(info.prepare_hook.is_none());
    }

    #[test]
    fn rejects_fields() {
        let (mut registry, root) = registry();
        let tag = tagged(&mut registry, "BadFlavor");
        let template = registry
            .register_class(
                ClassEntry::new("BadFlavor")
                    .with_base(root)
                    .with_protocol(tag)
                    .with_field(FieldEntry::new("count", ValueKind::Int)),
            )
            .unwrap();

        assert_eq!(
            reason(validate_template(&registry, template)),
            IncompatibilityReason::DeclaresFields(vec!["count".into()])
        );
    }

    #[test]
    fn rejects_stored_properties() {
        let (mut registry, root) = registry();
        let tag = tagged(&mut registry, "Sticky");
        let template = registry
            .register_class(
                ClassEntry::new("Sticky")
                    .with_base(root)
                    .with_protocol(tag)
                    .with_property(PropertyEntry::dynamic("ok", ValueKind::Int))
                    .with_property(PropertyEntry::stored("glue", ValueKind::Int)),
            )
            .unwrap();

        assert_eq!(
            reason(validate_template(&registry, template)),
            IncompatibilityReason::DeclaresStoredProperties(vec!["glue".into()])
        );
    }

    #[test]
    fn rejects_missing_tag() {
        let (mut registry, root) = registry();
        let template = registry
            .register_class(ClassEntry::new("Untagged").with_base(root))
            .unwrap();
        assert_eq!(
            reason(validate_template(&registry, template)),
            IncompatibilityReason::MissingCapabilityTag("Untagged".into())
        );

        // A protocol with the right name that the template does not adopt is not enough.
        tagged(&mut registry, "Untagged");
        assert!(matches!(
            reason(validate_template(&registry, template)),
            IncompatibilityReason::MissingCapabilityTag(_)
        ));
    }

    #[test]
    fn rejects_root_template() {
        let (registry, root) = registry();
        // The root adopts its own protocol but has no base.
        assert_eq!(
            reason(validate_template(&registry, root)),
            IncompatibilityReason::NoBaseClass
        );
    }

    #[test]
    fn unknown_template() {
        let (registry, _) = registry();
        let missing = TypeHash::from_name("Missing");
        assert!(matches!(
            validate_template(&registry, missing),
            Err(SwizzleError::UnknownType(h)) if h == missing
        ));
    }
}
