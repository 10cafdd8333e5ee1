//! Per-object class substitution.
//!
//! Swizzling an object replaces its isa with a synthetic class that derives
//! from the object's current class and carries a template class's methods:
//!
//! 1. validate the template (no storage, has a base, adopts its tag)
//! 2. return early if the object already carries the tag
//! 3. check the object's class descends from the template's base
//! 4. find or build the synthetic class for (current class, template)
//! 5. compare-and-swap the isa
//! 6. run the template's prepare hook
//!
//! Steps 2 to 6 run with the object claimed, so concurrent swizzles of one
//! object see it either untouched or swizzled with its hook already run.
//!
//! Nothing about the object's field block changes, which is why templates
//! may not add storage.

mod factory;
mod in_flight;
mod state;
mod validate;

pub use factory::{SyntheticCache, resolve_combined_type, synthetic_class_name};
pub use in_flight::{InFlightGuard, InFlightSwizzles};
pub use state::is_already_swizzled;
pub use validate::{TemplateInfo, validate_template};

use swizzle_core::{ObjectHandle, TypeHash};

use crate::error::SwizzleError;
use crate::runtime::Runtime;

/// Result of a successful swizzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwizzleOutcome {
    /// The object's class was replaced.
    Swizzled {
        /// The synthetic class the object now has.
        class: TypeHash,
    },
    /// The object already carried the template's tag; nothing changed.
    AlreadySwizzled {
        /// The object's (unchanged) class.
        class: TypeHash,
    },
}

impl SwizzleOutcome {
    /// The object's class after the call.
    pub fn class(&self) -> TypeHash {
        match self {
            SwizzleOutcome::Swizzled { class } | SwizzleOutcome::AlreadySwizzled { class } => *class,
        }
    }

    /// Whether this call changed the object's class.
    pub fn was_applied(&self) -> bool {
        matches!(self, SwizzleOutcome::Swizzled { .. })
    }
}

impl Runtime {
    /// Layer `template`'s methods onto a single live object.
    ///
    /// Idempotent: swizzling an object that already carries the template's
    /// tag returns [`SwizzleOutcome::AlreadySwizzled`] and changes nothing.
    /// On error the object keeps its class.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn swizzle(&self, object: ObjectHandle, template: TypeHash) -> Result<SwizzleOutcome, SwizzleError> {
        let info = validate_template(&self.registry.read(), template)?;
        // Held until the prepare hook has returned.
        let _claim = self.in_flight.claim(object);

        let combined = loop {
            let actual = self.isa(object)?;
            {
                let registry = self.registry.read();
                if is_already_swizzled(&registry, actual, &info) {
                    drop(registry);
                    tracing::trace!(?object, template = %info.name, "already swizzled");
                    if self.config().prepare_on_reswizzle() {
                        self.prepare(&info, object);
                    }
                    return Ok(SwizzleOutcome::AlreadySwizzled { class: actual });
                }
                if !registry.is_subclass_of(actual, info.expected_base) {
                    let name = |hash: TypeHash| {
                        registry
                            .class(hash)
                            .map(|c| c.name.clone())
                            .unwrap_or_else(|| format!("{hash}"))
                    };
                    return Err(SwizzleError::NotSwizzlable {
                        actual: name(actual),
                        template: info.name.clone(),
                        expected: name(info.expected_base),
                    });
                }
            }

            let combined = resolve_combined_type(
                &self.synthesized,
                &self.registry,
                self.config().synthetic_prefix(),
                actual,
                &info,
            )?;

            match self.compare_exchange_isa(object, actual, combined)? {
                Ok(_) => break combined,
                // Another caller changed the class in between; start over
                // from the class the object has now.
                Err(current) => {
                    tracing::trace!(?object, %current, "isa changed during swizzle, retrying");
                }
            }
        };

        tracing::debug!(?object, template = %info.name, class = %combined, "swizzled object");
        self.prepare(&info, object);
        Ok(SwizzleOutcome::Swizzled { class: combined })
    }

    /// Boolean form of [`swizzle`](Self::swizzle).
    ///
    /// Returns true when the object carries the template's methods afterwards,
    /// whether this call installed them or an earlier one did. Failures are
    /// logged.
    pub fn swizzle_object(&self, object: ObjectHandle, template: TypeHash) -> bool {
        match self.swizzle(object, template) {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(?object, %err, "swizzle failed");
                false
            }
        }
    }

    fn compare_exchange_isa(
        &self,
        object: ObjectHandle,
        current: TypeHash,
        new: TypeHash,
    ) -> Result<Result<TypeHash, TypeHash>, SwizzleError> {
        self.with_object(object, |o| o.compare_exchange_isa(current, new))
    }

    fn prepare(&self, info: &TemplateInfo, object: ObjectHandle) {
        if let Some(hook) = &info.prepare_hook {
            hook.call(self, object);
        }
    }
}
