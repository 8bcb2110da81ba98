use alloc::boxed::Box;
use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec::Vec;
use std::collections::HashMap;

use crate::loggable::impl_loggable_cast_fn;
use crate::ops::{List, Map};
use crate::{LogKind, Loggable, Typed};

// -----------------------------------------------------------------------------
// Lists

macro_rules! impl_list {
    ($({$($generics:tt)*} $ty:ty),* $(,)?) => {$(
        impl<$($generics)*> Loggable for $ty {
            impl_loggable_cast_fn!(List);
        }

        impl<$($generics)*> Typed for $ty {
            const KIND: LogKind = LogKind::List;
        }

        impl<$($generics)*> List for $ty {
            #[inline]
            fn len(&self) -> usize {
                <[T]>::len(self.as_ref())
            }

            #[inline]
            fn get(&self, index: usize) -> Option<&dyn Loggable> {
                <[T]>::get(self.as_ref(), index).map(Loggable::as_loggable)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Loggable> + '_> {
                Box::new(<[T]>::iter(self.as_ref()).map(Loggable::as_loggable))
            }
        }
    )*};
}

impl_list!(
    {T: Loggable} Vec<T>,
    {T: Loggable, const N: usize} [T; N],
);

impl<T: Loggable> Loggable for VecDeque<T> {
    impl_loggable_cast_fn!(List);
}

impl<T: Loggable> Typed for VecDeque<T> {
    const KIND: LogKind = LogKind::List;
}

impl<T: Loggable> List for VecDeque<T> {
    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Loggable> {
        VecDeque::get(self, index).map(Loggable::as_loggable)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Loggable> + '_> {
        Box::new(VecDeque::iter(self).map(Loggable::as_loggable))
    }
}

// -----------------------------------------------------------------------------
// Maps

macro_rules! impl_map {
    ($({$($generics:tt)*} $ty:ident<$($args:ty),*>),* $(,)?) => {$(
        impl<$($generics)*> Loggable for $ty<$($args),*> {
            impl_loggable_cast_fn!(Map);
        }

        impl<$($generics)*> Typed for $ty<$($args),*> {
            const KIND: LogKind = LogKind::Map;
        }

        impl<$($generics)*> Map for $ty<$($args),*> {
            #[inline]
            fn len(&self) -> usize {
                $ty::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Loggable, &dyn Loggable)> + '_> {
                Box::new(
                    $ty::iter(self).map(|(k, v)| (k.as_loggable(), v.as_loggable())),
                )
            }
        }
    )*};
}

impl_map!(
    {K: Loggable, V: Loggable, S: 'static} HashMap<K, V, S>,
    {K: Loggable, V: Loggable} BTreeMap<K, V>,
);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;

    use crate::{LogRef, Loggable};

    #[test]
    fn vec_elements_in_order() {
        let v = vec![1_i32, 2, 3];
        let LogRef::List(list) = v.log_ref() else {
            panic!("expected a list");
        };
        assert_eq!(list.len(), 3);
        let items: Vec<i64> = list
            .iter()
            .map(|item| match item.log_ref() {
                LogRef::Int(i) => i,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(items, [1, 2, 3]);
    }

    #[test]
    fn array_get() {
        let arr = [true, false];
        let LogRef::List(list) = arr.log_ref() else {
            panic!("expected a list");
        };
        assert!(matches!(list.get(1).map(|v| v.log_ref()), Some(LogRef::Bool(false))));
        assert!(list.get(2).is_none());
    }

    #[test]
    fn map_entries() {
        let mut map = BTreeMap::new();
        map.insert(String::from("a"), 1_u8);
        let LogRef::Map(view) = map.log_ref() else {
            panic!("expected a map");
        };
        let (key, value) = view.iter().next().unwrap();
        assert!(matches!(key.log_ref(), LogRef::Str("a")));
        assert!(matches!(value.log_ref(), LogRef::Uint(1)));
    }
}
