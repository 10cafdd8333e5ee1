//! Swizzle state check.

use swizzle_core::TypeHash;
use swizzle_registry::TypeRegistry;

use super::TemplateInfo;

/// Check whether objects of `class` already carry the template's capability.
///
/// True for classes synthesized from the template, for anything derived
/// from them, and for the template class itself and its subclasses.
pub fn is_already_swizzled(registry: &TypeRegistry, class: TypeHash, template: &TemplateInfo) -> bool {
    registry.class_conforms_to(class, template.tag)
}
