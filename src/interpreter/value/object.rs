use std::{
    any::Any,
    cell::RefCell,
    fmt::{self, Debug},
    rc::Rc,
};

use tracing::debug;

use crate::interpreter::{
    evaluator::core::{Context, EvalResult},
    plugin::core::{plugin_error, Argument, NativeType},
    value::{core::Value, types::Type},
};

struct ObjectCell {
    native:   Rc<dyn NativeType>,
    instance: RefCell<Option<Box<dyn Any>>>,
}

impl Drop for ObjectCell {
    fn drop(&mut self) {
        if let Some(instance) = self.instance.get_mut().take() {
            debug!(native = %self.native.interface().name, "destroying object");
            self.native.destroy(instance);
        }
    }
}

/// A native object instance owned by a plugin.
///
/// Cloning the wrapper aliases the same instance. The native type releases
/// the instance once, when the last alias goes away.
///
/// Two wrappers are equal when they alias the same instance.
#[derive(Clone)]
pub struct Complex {
    cell: Rc<ObjectCell>,
}

impl Complex {
    /// Wraps an instance built by `native`.
    #[must_use]
    pub fn new(native: Rc<dyn NativeType>, instance: Box<dyn Any>) -> Self {
        debug!(native = %native.interface().name, "created object");
        Self { cell: Rc::new(ObjectCell { native,
                                          instance: RefCell::new(Some(instance)) }) }
    }

    /// Name of the native type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.cell.native.interface().name
    }

    /// The static type of the object.
    #[must_use]
    pub fn object_type(&self) -> Type {
        Type::object(self.type_name())
    }

    /// The native type that owns the instance.
    #[must_use]
    pub fn native(&self) -> Rc<dyn NativeType> {
        Rc::clone(&self.cell.native)
    }

    /// Number of wrappers aliasing the instance.
    #[must_use]
    pub fn aliases(&self) -> usize {
        Rc::strong_count(&self.cell)
    }

    /// Runs method number `method` on the instance.
    ///
    /// # Errors
    /// `Plugin` when the instance is already running a method, which happens
    /// when a method receives its own object as an argument and calls back
    /// into it, and any error reported by the method itself.
    pub fn invoke(&self,
                  method: usize,
                  ctx: &mut Context,
                  args: &[Argument],
                  line: usize)
                  -> EvalResult<Value> {
        let native = self.cell.native.as_ref();
        let mut guard = self.cell
                            .instance
                            .try_borrow_mut()
                            .map_err(|_| plugin_error(native, "object is busy", line))?;
        let instance = guard.as_mut()
                            .ok_or_else(|| plugin_error(native, "object was released", line))?;
        native.invoke(&mut **instance, method, ctx, args, line)
    }
}

impl PartialEq for Complex {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl Debug for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Complex")
         .field("type", &self.type_name())
         .field("aliases", &self.aliases())
         .finish()
    }
}
