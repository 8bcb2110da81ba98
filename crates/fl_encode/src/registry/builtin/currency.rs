use fl_reflect::{BoxError, LogRef, Loggable};

use super::to_json;
use crate::registry::Registry;

const CURRENCIES: &[(&str, &str, usize)] = &[
    ("currency_cny", "¥", 2),
    ("currency_usd", "$", 2),
    ("currency_eur", "€", 2),
    ("currency_gbp", "£", 2),
    ("currency_jpy", "¥", 0),
    ("currency_krw", "₩", 0),
    ("currency_cny4", "¥", 4),
    ("currency_usd4", "$", 4),
    ("currency", "¥", 2),
];

pub(super) fn install(registry: &Registry) {
    for &(name, symbol, decimals) in CURRENCIES {
        registry.register_lazy_serializer(name, move || currency(symbol, decimals));
    }
}

fn currency(
    symbol: &'static str,
    decimals: usize,
) -> impl Fn(&dyn Loggable) -> Result<Vec<u8>, BoxError> + Send + Sync + 'static {
    move |value: &dyn Loggable| {
        let amount = to_f64(value)?;
        let text = if decimals == 0 {
            format!("{symbol}{}", amount as i64)
        } else {
            format!("{symbol}{amount:.decimals$}")
        };
        to_json(&text)
    }
}

/// Reads numbers and numeric strings.
fn to_f64(value: &dyn Loggable) -> Result<f64, BoxError> {
    let view = value.log_ref();
    if let Some(number) = view.as_f64() {
        return Ok(number);
    }
    match view {
        LogRef::Str(s) => Ok(s.trim().parse::<f64>()?),
        _ => Err(format!("cannot convert {} to a number", value.short_type_name()).into()),
    }
}

#[cfg(test)]
mod tests {
    use fl_reflect::Loggable;

    use super::currency;

    fn run(symbol: &'static str, decimals: usize, value: &dyn Loggable) -> String {
        String::from_utf8(currency(symbol, decimals)(value).unwrap()).unwrap()
    }

    #[test]
    fn fixed_decimals() {
        assert_eq!(run("$", 2, &1234.5_f64), r#""$1234.50""#);
        assert_eq!(run("¥", 4, &7_i32), r#""¥7.0000""#);
        assert_eq!(run("€", 2, &String::from("19.999")), r#""€20.00""#);
    }

    #[test]
    fn zero_decimals_truncate() {
        assert_eq!(run("¥", 0, &1999.99_f64), r#""¥1999""#);
        assert_eq!(run("₩", 0, &-5.7_f64), r#""₩-5""#);
    }

    #[test]
    fn rejects_non_numbers() {
        assert!(currency("$", 2)(&true).is_err());
        assert!(currency("$", 2)(&String::from("abc")).is_err());
    }
}
