//! Views over composite values.

use alloc::boxed::Box;

use crate::Loggable;
use crate::info::NamedField;

// -----------------------------------------------------------------------------
// Struct

/// A struct with statically described fields.
///
/// Implemented by `#[derive(Loggable)]`.
pub trait Struct: Loggable {
    /// Field descriptors in declaration order.
    fn fields(&self) -> &'static [NamedField];

    /// The field at `index`, in declaration order.
    fn field_at(&self, index: usize) -> Option<&dyn Loggable>;

    /// Number of declared fields.
    #[inline]
    fn field_len(&self) -> usize {
        self.fields().len()
    }
}

// -----------------------------------------------------------------------------
// List

/// An ordered sequence: `Vec`, `VecDeque`, arrays.
pub trait List: Loggable {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&dyn Loggable>;

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Loggable> + '_>;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// -----------------------------------------------------------------------------
// Map

/// A key/value collection. Only string keys are emitted by the encoder.
pub trait Map: Loggable {
    fn len(&self) -> usize;

    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Loggable, &dyn Loggable)> + '_>;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// -----------------------------------------------------------------------------
// Pointer

/// One level of indirection: `Option`, smart pointers and cells.
///
/// A target of `None` is a nil pointer. Shared pointers report an identity
/// (the address of the shared allocation) so graphs built from `Rc`/`Arc`
/// can be checked for cycles; owning wrappers report none.
///
/// ```
/// use std::rc::Rc;
/// use fl_reflect::{Loggable, LogRef};
///
/// let shared = Rc::new(5_i32);
/// let LogRef::Pointer(ptr) = shared.log_ref() else { unreachable!() };
/// assert_eq!(ptr.identity(), Some(Rc::as_ptr(&shared) as *const () as usize));
///
/// let mut seen = None;
/// ptr.with_target(&mut |target| seen = target.and_then(|t| t.downcast_ref::<i32>().copied()));
/// assert_eq!(seen, Some(5));
///
/// let none: Option<i32> = None;
/// let LogRef::Pointer(ptr) = none.log_ref() else { unreachable!() };
/// assert_eq!(ptr.identity(), None);
/// ```
pub trait Pointer: Loggable {
    /// Identity of the pointee, if it can be shared.
    fn identity(&self) -> Option<usize>;

    /// Calls `f` with the pointee, or with `None` when nil or unavailable.
    fn with_target(&self, f: &mut dyn FnMut(Option<&dyn Loggable>));

    /// Returns `true` if the pointer has no target.
    fn is_nil(&self) -> bool {
        let mut nil = true;
        self.with_target(&mut |target| nil = target.is_none());
        nil
    }
}
