use alloc::borrow::Cow;
use alloc::string::String;

use crate::{LogKind, LogRef, Loggable, Typed};

macro_rules! impl_primitive {
    ($kind:ident => $($ty:ty),* $(,)? ; |$v:ident| $conv:expr) => {$(
        impl Loggable for $ty {
            #[inline]
            fn as_loggable(&self) -> &dyn Loggable {
                self
            }

            #[inline]
            fn log_ref(&self) -> LogRef<'_> {
                let $v = self;
                LogRef::$kind($conv)
            }
        }

        impl Typed for $ty {
            const KIND: LogKind = LogKind::$kind;
        }
    )*};
}

impl_primitive!(Int => i8, i16, i32, i64, isize; |v| *v as i64);
impl_primitive!(Uint => u8, u16, u32, u64, usize; |v| *v as u64);
impl_primitive!(Bool => bool; |v| *v);
impl_primitive!(Float32 => f32; |v| *v);
impl_primitive!(Float64 => f64; |v| *v);
impl_primitive!(Str => String, &'static str, Cow<'static, str>; |v| &**v);

impl Loggable for () {
    #[inline]
    fn as_loggable(&self) -> &dyn Loggable {
        self
    }

    #[inline]
    fn log_ref(&self) -> LogRef<'_> {
        LogRef::Null
    }
}

impl Typed for () {
    const KIND: LogKind = LogKind::Null;
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::borrow::Cow;
    use alloc::string::String;

    use crate::{LogKind, LogRef, Loggable, Typed};

    #[test]
    fn integers_widen() {
        assert!(matches!((-3_i8).log_ref(), LogRef::Int(-3)));
        assert!(matches!(u64::MAX.log_ref(), LogRef::Uint(u64::MAX)));
        assert_eq!(<usize as Typed>::KIND, LogKind::Uint);
    }

    #[test]
    fn strings_borrow() {
        let owned = String::from("abc");
        let cow: Cow<'static, str> = Cow::Borrowed("xyz");
        assert!(matches!(owned.log_ref(), LogRef::Str("abc")));
        assert!(matches!(cow.log_ref(), LogRef::Str("xyz")));
        assert!(matches!("lit".log_ref(), LogRef::Str("lit")));
    }

    #[test]
    fn unit_is_null() {
        assert_eq!(().log_ref().kind(), LogKind::Null);
    }
}
