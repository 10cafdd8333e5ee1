//! Call context handed to native method bodies.

use crate::{NativeError, TypeHash, Value};

use super::{ObjectEnv, ObjectHandle};

/// Everything a native method body can see about the current message send.
pub struct CallContext<'a> {
    env: &'a dyn ObjectEnv,
    receiver: ObjectHandle,
    /// Class whose method table supplied the running implementation.
    implementing_class: TypeHash,
    selector: &'a str,
    args: &'a [Value],
}

impl<'a> CallContext<'a> {
    pub fn new(
        env: &'a dyn ObjectEnv,
        receiver: ObjectHandle,
        implementing_class: TypeHash,
        selector: &'a str,
        args: &'a [Value],
    ) -> Self {
        Self {
            env,
            receiver,
            implementing_class,
            selector,
            args,
        }
    }

    pub fn env(&self) -> &'a dyn ObjectEnv {
        self.env
    }

    pub fn receiver(&self) -> ObjectHandle {
        self.receiver
    }

    /// The class the running method was found on.
    ///
    /// For a method copied onto a synthetic class this is the synthetic
    /// class, not the template it was copied from.
    pub fn implementing_class(&self) -> TypeHash {
        self.implementing_class
    }

    pub fn selector(&self) -> &'a str {
        self.selector
    }

    pub fn args(&self) -> &'a [Value] {
        self.args
    }

    /// Fail unless exactly `count` arguments were passed.
    pub fn expect_args(&self, count: usize) -> Result<(), NativeError> {
        if self.args.len() != count {
            return Err(NativeError::ArgumentCount {
                expected: count,
                got: self.args.len(),
            });
        }
        Ok(())
    }

    pub fn arg(&self, index: usize) -> Result<&'a Value, NativeError> {
        self.args.get(index).ok_or(NativeError::ArgumentCount {
            expected: index + 1,
            got: self.args.len(),
        })
    }

    pub fn arg_int(&self, index: usize) -> Result<i64, NativeError> {
        let value = self.arg(index)?;
        value.as_int().ok_or(NativeError::ArgumentType {
            index,
            expected: "int",
            got: value.type_name(),
        })
    }

    pub fn arg_str(&self, index: usize) -> Result<&'a str, NativeError> {
        let value = self.arg(index)?;
        value.as_str().ok_or(NativeError::ArgumentType {
            index,
            expected: "string",
            got: value.type_name(),
        })
    }

    /// Send a message to the receiver.
    pub fn send(&self, selector: &str, args: &[Value]) -> Result<Value, NativeError> {
        self.env.send(self.receiver, selector, args)
    }

    /// Send the current selector to the implementation above the
    /// implementing class.
    pub fn send_super(&self, args: &[Value]) -> Result<Value, NativeError> {
        self.env
            .send_super(self.receiver, self.implementing_class, self.selector, args)
    }

    pub fn field(&self, name: &str) -> Result<Value, NativeError> {
        self.env.field(self.receiver, name)
    }

    pub fn set_field(&self, name: &str, value: Value) -> Result<(), NativeError> {
        self.env.set_field(self.receiver, name, value)
    }

    /// Read externally backed storage for the receiver.
    pub fn associated(&self, key: &str) -> Option<Value> {
        self.env.associated(self.receiver, key)
    }

    /// Write externally backed storage for the receiver.
    pub fn set_associated(&self, key: &str, value: Value) -> Result<(), NativeError> {
        self.env.set_associated(self.receiver, key, value)
    }
}
