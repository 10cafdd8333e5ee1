//! Member entries shared by class descriptors.

use bitflags::bitflags;

use crate::ValueKind;

/// A stored field (instance variable).
///
/// Fields are the only thing that occupies space in an object's field block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    /// Field name, unique along a class's ancestry.
    pub name: String,
    /// Declared kind.
    pub kind: ValueKind,
}

impl FieldEntry {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

bitflags! {
    /// Attributes of a declared property.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertyAttributes: u8 {
        /// Accessors are provided at runtime; no backing field is synthesized.
        const DYNAMIC = 1 << 0;
        /// No setter.
        const READONLY = 1 << 1;
        /// Accessors are not synchronized.
        const NONATOMIC = 1 << 2;
        /// Holds a non-owning object reference.
        const WEAK = 1 << 3;
    }
}

/// A declared property.
///
/// A property without [`PropertyAttributes::DYNAMIC`] implies a backing field
/// in the instance layout, even if no [`FieldEntry`] names it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    /// Property name.
    pub name: String,
    /// Property value kind.
    pub kind: ValueKind,
    /// Declared attributes.
    pub attributes: PropertyAttributes,
}

impl PropertyEntry {
    pub fn new(name: impl Into<String>, kind: ValueKind, attributes: PropertyAttributes) -> Self {
        Self {
            name: name.into(),
            kind,
            attributes,
        }
    }

    /// A property whose storage lives outside the object.
    pub fn dynamic(name: impl Into<String>, kind: ValueKind) -> Self {
        Self::new(name, kind, PropertyAttributes::DYNAMIC)
    }

    /// A property backed by a compiler-synthesized field.
    pub fn stored(name: impl Into<String>, kind: ValueKind) -> Self {
        Self::new(name, kind, PropertyAttributes::empty())
    }

    pub fn is_dynamic(&self) -> bool {
        self.attributes.contains(PropertyAttributes::DYNAMIC)
    }

    pub fn is_read_only(&self) -> bool {
        self.attributes.contains(PropertyAttributes::READONLY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_and_stored_properties() {
        let dynamic = PropertyEntry::dynamic("flavor", ValueKind::String);
        assert!(dynamic.is_dynamic());
        assert!(!dynamic.is_read_only());

        let stored = PropertyEntry::stored("count", ValueKind::Int);
        assert!(!stored.is_dynamic());
    }

    #[test]
    fn attributes_combine() {
        let prop = PropertyEntry::new(
            "owner",
            ValueKind::Object,
            PropertyAttributes::DYNAMIC | PropertyAttributes::WEAK | PropertyAttributes::READONLY,
        );
        assert!(prop.is_dynamic());
        assert!(prop.is_read_only());
        assert!(prop.attributes.contains(PropertyAttributes::WEAK));
    }
}
