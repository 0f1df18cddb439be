//! The schema-driven builder for types without a dedicated builder.

use tracing::debug;

use super::{BuildContext, CreateOptions, FactoryError, UnresolvedKind};
use crate::{
    convert::to_normal,
    model::{Node, ZObject},
    schema::{TypeDescriptor, TypeSchema},
};

/// Instantiates every declared key of a known type, or emits a shell.
pub(super) fn build_composite(
    cx: &mut BuildContext<'_, '_>,
    descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Result<Node, FactoryError> {
    match descriptor {
        TypeDescriptor::Literal(id) => match cx.schemas().type_schema(id) {
            Some(schema) => build_from_schema(cx, descriptor.to_node(), schema, options),
            None => {
                cx.mark_unresolved(id, UnresolvedKind::Type, options);
                Ok(ZObject::new(descriptor.to_node()).into())
            }
        },
        TypeDescriptor::Inline(definition) => {
            let id = descriptor.inline_identity().unwrap_or_default();
            let schema = TypeSchema::from_definition(id, definition);
            build_from_schema(cx, descriptor.to_node(), &schema, options)
        }
        TypeDescriptor::Generic { function, .. } => {
            // The shape of a custom generic type is only known after evaluation
            debug!(path = %cx.path(), zid = %function, "Shell for custom generic type");
            Ok(ZObject::new(descriptor.to_node()).into())
        }
    }
}

fn build_from_schema(
    cx: &mut BuildContext<'_, '_>,
    tag: Node,
    schema: &TypeSchema,
    options: &CreateOptions,
) -> Result<Node, FactoryError> {
    let mut object = ZObject::new(tag);
    for key in &schema.keys {
        let value = match (&options.value, key.is_identity) {
            (Some(seed), true) => to_normal(seed),
            (None, true) if options.root => Node::reference(cx.context().object_id.as_str()),
            _ => cx.create(&key.key, &key.value_type, &CreateOptions::new())?,
        };
        object.insert(key.key.as_str(), value);
    }
    Ok(object.into())
}
