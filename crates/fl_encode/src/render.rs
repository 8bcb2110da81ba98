use core::any::Any;
use std::panic::{self, AssertUnwindSafe};

use fl_reflect::{LogRef, Loggable};

use crate::error::EncodeError;
use crate::sensitive::is_sensitive;

/// `FIELD_SERIALIZE_ERROR{field:<name>, value:<value>, error:<message>}`,
/// with the value hidden when it looks sensitive.
pub(crate) fn field_error_string(field: &str, value: &dyn Loggable, err: &EncodeError) -> String {
    let mut rendered = render_value(value);
    if is_sensitive(field, &rendered) {
        rendered = "<sensitive>".to_owned();
    }
    format!("FIELD_SERIALIZE_ERROR{{field:{field}, value:{rendered}, error:{err}}}")
}

/// Short text form of a value for error messages. Never panics.
pub(crate) fn render_value(value: &dyn Loggable) -> String {
    match panic::catch_unwind(AssertUnwindSafe(|| render(value))) {
        Ok(text) => text,
        Err(payload) => format!("<panic:{}>", panic_message(&*payload)),
    }
}

fn render(value: &dyn Loggable) -> String {
    match value.log_ref() {
        LogRef::Null => "<nil>".to_owned(),
        LogRef::Bool(v) => v.to_string(),
        LogRef::Int(v) => v.to_string(),
        LogRef::Uint(v) => v.to_string(),
        LogRef::Float32(v) => format!("{:.6}", v as f64),
        LogRef::Float64(v) => format!("{v:.6}"),
        LogRef::Str(s) => s.to_owned(),
        LogRef::Pointer(ptr) => {
            let mut out = None;
            ptr.with_target(&mut |target| out = target.map(render));
            out.unwrap_or_else(|| "<nil>".to_owned())
        }
        LogRef::List(list) => format!("{}[len={}]", value.short_type_name(), list.len()),
        LogRef::Map(map) => format!("{}[len={}]", value.short_type_name(), map.len()),
        LogRef::Struct(_) => format!("{}{{...}}", value.short_type_name()),
        LogRef::Opaque => value.short_type_name(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use fl_reflect::derive::Loggable;
    use fl_reflect::LogRef;

    use super::{field_error_string, render_value};
    use crate::error::EncodeError;

    #[derive(Loggable)]
    struct User {
        #[log = "id"]
        id: u32,
    }

    struct Exploding;

    impl fl_reflect::Loggable for Exploding {
        fn as_loggable(&self) -> &dyn fl_reflect::Loggable {
            self
        }

        fn log_ref(&self) -> LogRef<'_> {
            panic!("boom")
        }
    }

    #[test]
    fn forms() {
        assert_eq!(render_value(&"plain"), "plain");
        assert_eq!(render_value(&-7_i16), "-7");
        assert_eq!(render_value(&1.5_f64), "1.500000");
        assert_eq!(render_value(&None::<u8>), "<nil>");
        assert_eq!(render_value(&Some(Box::new(3_u8))), "3");
        assert_eq!(render_value(&vec![1, 2, 3]), "Vec<i32>[len=3]");
        assert_eq!(render_value(&User { id: 1 }), "User{...}");
    }

    #[test]
    fn panics_are_caught() {
        assert_eq!(render_value(&Exploding), "<panic:boom>");
    }

    #[test]
    fn error_text() {
        let err = EncodeError::SerializerNotFound("nope".into());
        assert_eq!(
            field_error_string("Amount", &12_i32, &err),
            "FIELD_SERIALIZE_ERROR{field:Amount, value:12, error:serializer 'nope' not found}"
        );
        assert_eq!(
            field_error_string("Password", &"hunter2", &err),
            "FIELD_SERIALIZE_ERROR{field:Password, value:<sensitive>, error:serializer 'nope' not found}"
        );
        assert!(field_error_string("Contact", &"a@b.io", &err).contains("value:<sensitive>"));
    }
}
