use crate::node::Node;
use crate::options::Options;
use crate::registry::{DEFAULT_MASK, Registry};
use crate::tag::FieldOptions;

/// Applies mask, then precision, then the `string` option to a field's
/// resolved node.
pub(crate) fn post_process(
    mut node: Node,
    field: &FieldOptions,
    options: &Options,
    registry: &Registry,
) -> Node {
    if (options.mask_sensitive || field.mask.is_some())
        && let Node::String(s) = &node
    {
        let mask = field.mask.as_deref().unwrap_or(DEFAULT_MASK);
        node = Node::String(registry.apply_mask(mask, s));
    }

    if let Some(precision) = field.precision {
        node = match node {
            Node::Float32(v) => Node::Float64(round_to(v as f64, precision)),
            Node::Float64(v) => Node::Float64(round_to(v, precision)),
            other => other,
        };
    }

    if field.force_string {
        node = Node::String(node.to_string());
    }

    node
}

/// Rounds half away from zero. Keeps `value` when scaling overflows.
fn round_to(value: f64, precision: u32) -> f64 {
    let scale = 10_f64.powi(i32::try_from(precision).unwrap_or(i32::MAX));
    let rounded = (value * scale).round() / scale;
    if rounded.is_finite() { rounded } else { value }
}

#[cfg(test)]
mod tests {
    use super::{post_process, round_to};
    use crate::node::Node;
    use crate::options::Options;
    use crate::registry::Registry;
    use crate::tag::parse_field_options;

    fn run(tag: &str, node: Node, options: &Options) -> Node {
        let field = parse_field_options(tag, "field", false).unwrap();
        post_process(node, &field, options, &Registry::with_builtins())
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(123.456, 2), 123.46);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(1.0, 400), 1.0);
    }

    #[test]
    fn order_is_mask_precision_string() {
        let opts = Options::default();
        let node = run("v,precision=2,string", Node::Float32(123.456), &opts);
        assert!(matches!(node, Node::String(ref s) if s == "123.46"));

        let node = run("v,mask=email", Node::String("alice@example.com".into()), &opts);
        assert!(matches!(node, Node::String(ref s) if s == "ali***@example.com"));

        let node = run("v,mask=email", Node::Int(5), &opts);
        assert!(matches!(node, Node::Int(5)));
    }

    #[test]
    fn global_mask_uses_default() {
        let opts = Options::default().with_mask_sensitive(true);
        let node = run("v", Node::String("abcdef".into()), &opts);
        assert!(matches!(node, Node::String(ref s) if s == "a****f"));
    }
}
