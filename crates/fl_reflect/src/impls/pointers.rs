use alloc::boxed::Box;
use alloc::rc::{self, Rc};
use alloc::sync::{self, Arc};
use alloc::vec::Vec;
use core::cell::RefCell;
use std::sync::{Mutex, RwLock, TryLockError};

use crate::loggable::{BoxError, impl_loggable_cast_fn};
use crate::ops::Pointer;
use crate::{LogKind, Loggable, Typed};

/// Pointers forward the conditional and marshal capabilities of their target.
macro_rules! impl_pointer {
    ($({$($generics:tt)*} $ty:ty),* $(,)?) => {$(
        impl<$($generics)*> Loggable for $ty {
            impl_loggable_cast_fn!(Pointer);

            fn reflect_should_log(&self) -> Option<bool> {
                let mut out = None;
                self.with_target(&mut |t| out = t.and_then(Loggable::reflect_should_log));
                out
            }

            fn reflect_marshal_log(&self) -> Option<Result<Vec<u8>, BoxError>> {
                let mut out = None;
                self.with_target(&mut |t| out = t.and_then(Loggable::reflect_marshal_log));
                out
            }

            fn reflect_marshal_json(&self) -> Option<Result<Vec<u8>, BoxError>> {
                let mut out = None;
                self.with_target(&mut |t| out = t.and_then(Loggable::reflect_marshal_json));
                out
            }
        }

        impl<$($generics)*> Typed for $ty {
            const KIND: LogKind = LogKind::Pointer;
        }
    )*};
}

impl_pointer!(
    {T: Loggable} Option<T>,
    {T: Loggable + ?Sized} Box<T>,
    {T: Loggable + ?Sized} Rc<T>,
    {T: Loggable + ?Sized} Arc<T>,
    {T: Loggable + ?Sized} rc::Weak<T>,
    {T: Loggable + ?Sized} sync::Weak<T>,
    {T: Loggable} RefCell<T>,
    {T: Loggable} Mutex<T>,
    {T: Loggable} RwLock<T>,
);

#[inline]
fn address<T: ?Sized>(ptr: *const T) -> usize {
    ptr.cast::<()>() as usize
}

impl<T: Loggable> Pointer for Option<T> {
    #[inline]
    fn identity(&self) -> Option<usize> {
        None
    }

    fn with_target(&self, f: &mut dyn FnMut(Option<&dyn Loggable>)) {
        f(self.as_ref().map(Loggable::as_loggable));
    }
}

impl<T: Loggable + ?Sized> Pointer for Box<T> {
    // A box is uniquely owned and cannot close a cycle.
    #[inline]
    fn identity(&self) -> Option<usize> {
        None
    }

    fn with_target(&self, f: &mut dyn FnMut(Option<&dyn Loggable>)) {
        f(Some((**self).as_loggable()));
    }
}

impl<T: Loggable + ?Sized> Pointer for Rc<T> {
    #[inline]
    fn identity(&self) -> Option<usize> {
        Some(address(Rc::as_ptr(self)))
    }

    fn with_target(&self, f: &mut dyn FnMut(Option<&dyn Loggable>)) {
        f(Some((**self).as_loggable()));
    }
}

impl<T: Loggable + ?Sized> Pointer for Arc<T> {
    #[inline]
    fn identity(&self) -> Option<usize> {
        Some(address(Arc::as_ptr(self)))
    }

    fn with_target(&self, f: &mut dyn FnMut(Option<&dyn Loggable>)) {
        f(Some((**self).as_loggable()));
    }
}

impl<T: Loggable + ?Sized> Pointer for rc::Weak<T> {
    fn identity(&self) -> Option<usize> {
        self.upgrade().map(|strong| address(Rc::as_ptr(&strong)))
    }

    fn with_target(&self, f: &mut dyn FnMut(Option<&dyn Loggable>)) {
        let strong = self.upgrade();
        f(strong.as_deref().map(Loggable::as_loggable));
    }
}

impl<T: Loggable + ?Sized> Pointer for sync::Weak<T> {
    fn identity(&self) -> Option<usize> {
        self.upgrade().map(|strong| address(Arc::as_ptr(&strong)))
    }

    fn with_target(&self, f: &mut dyn FnMut(Option<&dyn Loggable>)) {
        let strong = self.upgrade();
        f(strong.as_deref().map(Loggable::as_loggable));
    }
}

impl<T: Loggable> Pointer for RefCell<T> {
    #[inline]
    fn identity(&self) -> Option<usize> {
        None
    }

    // A cell that is mutably borrowed elsewhere reads as nil.
    fn with_target(&self, f: &mut dyn FnMut(Option<&dyn Loggable>)) {
        match self.try_borrow() {
            Ok(guard) => f(Some((*guard).as_loggable())),
            Err(_) => f(None),
        }
    }
}

impl<T: Loggable> Pointer for Mutex<T> {
    #[inline]
    fn identity(&self) -> Option<usize> {
        None
    }

    // Never blocks: a held lock reads as nil, a poisoned one is still read.
    fn with_target(&self, f: &mut dyn FnMut(Option<&dyn Loggable>)) {
        match self.try_lock() {
            Ok(guard) => f(Some((*guard).as_loggable())),
            Err(TryLockError::Poisoned(poisoned)) => {
                let guard = poisoned.into_inner();
                f(Some((*guard).as_loggable()));
            }
            Err(TryLockError::WouldBlock) => f(None),
        }
    }
}

impl<T: Loggable> Pointer for RwLock<T> {
    #[inline]
    fn identity(&self) -> Option<usize> {
        None
    }

    fn with_target(&self, f: &mut dyn FnMut(Option<&dyn Loggable>)) {
        match self.try_read() {
            Ok(guard) => f(Some((*guard).as_loggable())),
            Err(TryLockError::Poisoned(poisoned)) => {
                let guard = poisoned.into_inner();
                f(Some((*guard).as_loggable()));
            }
            Err(TryLockError::WouldBlock) => f(None),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::sync::Arc;
    use core::cell::RefCell;
    use std::sync::{Mutex, RwLock};

    use crate::{LogRef, Loggable, Pointer};

    fn pointer_of(value: &dyn Loggable) -> &dyn Pointer {
        match value.log_ref() {
            LogRef::Pointer(p) => p,
            other => panic!("expected a pointer, got {other:?}"),
        }
    }

    #[test]
    fn option_nil() {
        let none: Option<u8> = None;
        assert!(pointer_of(&none).is_nil());
        assert!(!pointer_of(&Some(1_u8)).is_nil());
    }

    #[test]
    fn rc_clones_share_identity() {
        let a = Rc::new(String::from("x"));
        let b = Rc::clone(&a);
        let c = Rc::new(String::from("x"));
        assert_eq!(pointer_of(&a).identity(), pointer_of(&b).identity());
        assert_ne!(pointer_of(&a).identity(), pointer_of(&c).identity());
    }

    #[test]
    fn weak_dead_is_nil() {
        let weak = {
            let strong = Rc::new(1_i32);
            Rc::downgrade(&strong)
        };
        assert!(pointer_of(&weak).is_nil());
        assert_eq!(pointer_of(&weak).identity(), None);
    }

    #[test]
    fn borrowed_cell_reads_nil() {
        let cell = RefCell::new(3_i32);
        let _guard = cell.borrow_mut();
        assert!(pointer_of(&cell).is_nil());
    }

    #[test]
    fn boxed_trait_object() {
        let boxed: Box<dyn Loggable> = Box::new(7_u16);
        let mut seen = None;
        pointer_of(&boxed).with_target(&mut |t| seen = t.map(|t| t.log_ref().kind()));
        assert_eq!(seen, Some(crate::LogKind::Uint));
    }

    #[test]
    fn locks_are_pointers() {
        let shared = Arc::new(Mutex::new(4_i32));
        let mut seen = None;
        pointer_of(&*shared)
            .with_target(&mut |t| seen = t.and_then(|t| t.downcast_ref::<i32>().copied()));
        assert_eq!(seen, Some(4));

        let guard = shared.lock().unwrap();
        assert!(pointer_of(&*shared).is_nil());
        drop(guard);

        let lock = RwLock::new(String::from("r"));
        let _reader = lock.read().unwrap();
        assert!(!pointer_of(&lock).is_nil());
    }
}
