use fl_reflect::{LogRef, Loggable};

/// Whether `value` counts as empty for `omitempty`.
///
/// Structs use their `IsZero` capability when they have one; otherwise a
/// struct is empty when all its declared fields are. Opaque values are
/// never empty.
pub(crate) fn is_empty(value: &dyn Loggable) -> bool {
    match value.log_ref() {
        LogRef::Null => true,
        LogRef::Bool(v) => !v,
        LogRef::Int(v) => v == 0,
        LogRef::Uint(v) => v == 0,
        LogRef::Float32(v) => v == 0.0,
        LogRef::Float64(v) => v == 0.0,
        LogRef::Str(s) => s.is_empty(),
        LogRef::List(list) => list.is_empty(),
        LogRef::Map(map) => map.is_empty(),
        LogRef::Pointer(ptr) => ptr.is_nil(),
        LogRef::Struct(s) => match value.reflect_is_zero() {
            Some(zero) => zero,
            None => (0..s.field_len()).all(|i| s.field_at(i).is_none_or(is_empty)),
        },
        LogRef::Opaque => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::rc::{Rc, Weak};

    use fl_reflect::IsZero;
    use fl_reflect::derive::Loggable;

    use super::is_empty;

    #[derive(Loggable, Default)]
    struct Pair {
        #[log = "a"]
        a: i32,
        b: String,
    }

    #[derive(Loggable)]
    #[log(is_zero)]
    struct Money {
        cents: i64,
    }

    impl IsZero for Money {
        fn is_zero(&self) -> bool {
            self.cents < 0
        }
    }

    #[test]
    fn scalars_and_containers() {
        assert!(is_empty(&0_u8));
        assert!(is_empty(&0.0_f64));
        assert!(is_empty(&false));
        assert!(is_empty(&String::new()));
        assert!(is_empty(&Vec::<i32>::new()));
        assert!(is_empty(&BTreeMap::<String, i32>::new()));
        assert!(is_empty(&None::<i32>));
        assert!(is_empty(&Weak::<i32>::new()));
        assert!(!is_empty(&Some(0)));
        assert!(!is_empty(&Rc::new(0)));
        assert!(!is_empty(&"x"));
    }

    #[test]
    fn structs() {
        assert!(is_empty(&Pair::default()));
        let untagged_set = Pair {
            a: 0,
            b: "x".into(),
        };
        assert!(!is_empty(&untagged_set));
        assert!(is_empty(&Money { cents: -1 }));
        assert!(!is_empty(&Money { cents: 0 }));
    }
}
