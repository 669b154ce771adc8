use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{Debug, Display, Formatter};

/// Helper struct for managing a stack of mapped type paths.
///
/// This is useful for tracking the type hierarchy when serializing and deserializing types.
#[derive(Default, Clone)]
#[cfg_attr(not(all(debug_assertions, feature = "debug")), allow(dead_code))]
pub(crate) struct TypeStack {
    stack: Vec<&'static str>,
}

#[cfg_attr(not(all(debug_assertions, feature = "debug")), allow(dead_code))]
impl TypeStack {
    pub const fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, type_path: &'static str) {
        self.stack.push(type_path);
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

impl Debug for TypeStack {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let mut iter = self.stack.iter();

        if let Some(first) = iter.next() {
            write!(f, "`{first}`")?;
        }

        for path in iter {
            write!(f, " -> `{path}`")?;
        }

        Ok(())
    }
}

#[cfg(all(debug_assertions, feature = "debug"))]
std::thread_local! {
    static TYPE_STACK: core::cell::RefCell<TypeStack> =
        const { core::cell::RefCell::new(TypeStack::new()) };
}

// -----------------------------------------------------------------------------
// Guard

/// Keeps a type on the stack for the lifetime of the guard.
pub(crate) struct StackGuard(());

impl StackGuard {
    #[inline]
    pub fn push(type_path: &'static str) -> Self {
        #[cfg(all(debug_assertions, feature = "debug"))]
        TYPE_STACK.with_borrow_mut(|stack| stack.push(type_path));
        #[cfg(not(all(debug_assertions, feature = "debug")))]
        let _ = type_path;
        Self(())
    }
}

impl Drop for StackGuard {
    #[inline]
    fn drop(&mut self) {
        #[cfg(all(debug_assertions, feature = "debug"))]
        TYPE_STACK.with_borrow_mut(TypeStack::pop);
    }
}

/// Renders an error message, followed by the type stack when tracing is on.
pub(crate) fn stack_message(msg: impl Display) -> String {
    #[cfg(all(debug_assertions, feature = "debug"))]
    {
        TYPE_STACK.with_borrow(|stack| {
            if stack.is_empty() {
                msg.to_string()
            } else {
                alloc::format!("{msg} (stack: {stack:?})")
            }
        })
    }
    #[cfg(not(all(debug_assertions, feature = "debug")))]
    {
        msg.to_string()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(all(test, debug_assertions, feature = "debug"))]
mod tests {
    use super::*;

    #[test]
    fn guard_pops_on_drop() {
        {
            let _outer = StackGuard::push("demo::Outer");
            let _inner = StackGuard::push("demo::Inner");
            assert_eq!(
                stack_message("boom"),
                "boom (stack: `demo::Outer` -> `demo::Inner`)"
            );
        }
        assert_eq!(stack_message("boom"), "boom");
    }
}
