//! Protocol (capability tag) entry.

use crate::TypeHash;

/// A marker protocol.
///
/// Protocols carry no behavior; they exist so that "has this object been
/// given capability X" is a single conformance query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolEntry {
    /// Protocol name.
    pub name: String,
    /// Protocol hash (`TypeHash::from_protocol(name)`).
    pub type_hash: TypeHash,
    /// Protocols this one refines.
    pub base_protocols: Vec<TypeHash>,
}

impl ProtocolEntry {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_protocol(&name);
        Self {
            name,
            type_hash,
            base_protocols: Vec::new(),
        }
    }

    /// Add a refined protocol.
    pub fn with_base(mut self, base: TypeHash) -> Self {
        self.base_protocols.push(base);
        self
    }
}
