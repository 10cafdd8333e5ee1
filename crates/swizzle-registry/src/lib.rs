//! isa-swizzle type table.
//!
//! [`TypeRegistry`] is the runtime's table of classes and protocols. It
//! answers the questions message dispatch and swizzling ask: what is a
//! class's ancestry, does it conform to a protocol, which method answers a
//! selector, and where does a field live in the instance layout.

mod registry;

pub use registry::{Ancestry, TypeRegistry};
