//! Default shapes of the built-in types.

use super::{BuildContext, CreateOptions, FactoryError, UnresolvedKind};
use crate::{
    constants::*,
    model::{Node, ZList, ZObject, keys::global_key},
    schema::TypeDescriptor,
};

type Built = Result<Node, FactoryError>;

/// A composite with a wrapped `Z1K1` tag.
fn tagged(type_id: &str) -> ZObject {
    ZObject::new(Node::reference(type_id))
}

fn blank_reference() -> Node {
    Node::reference("")
}

fn seeded_reference(options: &CreateOptions) -> Node {
    Node::reference(options.value_text().unwrap_or_default())
}

fn seeded_string(options: &CreateOptions) -> Node {
    Node::string(options.value_text().unwrap_or_default())
}

/// Identity field of a built-in type: a self-reference when building the root.
fn identity(cx: &BuildContext<'_, '_>, options: &CreateOptions) -> Node {
    if options.root {
        Node::reference(cx.context().object_id.as_str())
    } else {
        seeded_reference(options)
    }
}

/// Language of a new monolingual entry.
///
/// Appended entries start without a language so the user picks a new one.
fn entry_lang(cx: &BuildContext<'_, '_>, options: &CreateOptions) -> String {
    match &options.lang {
        Some(lang) => lang.clone(),
        None if options.append => String::new(),
        None => cx.context().user_lang.clone(),
    }
}

fn language(cx: &mut BuildContext<'_, '_>, key: &str, lang: String) -> Built {
    cx.create(key, &Node::text(Z_NATURAL_LANGUAGE), &CreateOptions::new().value(lang))
}

pub(super) fn build_object(
    _cx: &mut BuildContext<'_, '_>,
    _descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Built {
    Ok(ZObject::new(seeded_reference(options)).into())
}

pub(super) fn build_persistent_object(
    cx: &mut BuildContext<'_, '_>,
    _descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Built {
    let value = match &options.value {
        Some(value_type) => {
            let mut value_options = CreateOptions::new().root();
            value_options.lang = options.lang.clone();
            cx.create(Z_PERSISTENT_OBJECT_VALUE, value_type, &value_options)?
        }
        None => blank_reference(),
    };

    let object = tagged(Z_PERSISTENT_OBJECT)
        .with(Z_PERSISTENT_OBJECT_ID, Node::string(cx.context().object_id.as_str()))
        .with(Z_PERSISTENT_OBJECT_VALUE, value)
        .with(
            Z_PERSISTENT_OBJECT_LABEL,
            cx.create_default(Z_PERSISTENT_OBJECT_LABEL, Z_MULTILINGUAL_STRING)?,
        )
        .with(
            Z_PERSISTENT_OBJECT_ALIASES,
            cx.create_default(Z_PERSISTENT_OBJECT_ALIASES, Z_MULTILINGUAL_STRINGSET)?,
        )
        .with(
            Z_PERSISTENT_OBJECT_DESCRIPTION,
            cx.create_default(Z_PERSISTENT_OBJECT_DESCRIPTION, Z_MULTILINGUAL_STRING)?,
        );
    Ok(object.into())
}

pub(super) fn build_key(
    cx: &mut BuildContext<'_, '_>,
    _descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Built {
    let is_identity = cx.create(
        Z_KEY_IS_IDENTITY,
        &Node::text(Z_BOOLEAN),
        &CreateOptions::new().value(Z_BOOLEAN_FALSE),
    )?;
    let object = tagged(Z_KEY)
        .with(Z_KEY_TYPE, blank_reference())
        .with(Z_KEY_ID, seeded_string(options))
        .with(Z_KEY_LABEL, cx.create_default(Z_KEY_LABEL, Z_MULTILINGUAL_STRING)?)
        .with(Z_KEY_IS_IDENTITY, is_identity);
    Ok(object.into())
}

pub(super) fn build_type(
    cx: &mut BuildContext<'_, '_>,
    _descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Built {
    let mut object = tagged(Z_TYPE)
        .with(Z_TYPE_IDENTITY, identity(cx, options))
        .with(Z_TYPE_KEYS, ZList::new(Node::reference(Z_KEY)));
    for key in Z_TYPE_FUNCTION_KEYS {
        object.insert(key, blank_reference());
    }
    let object = object
        .with(Z_TYPE_SERIALISERS, ZList::new(Node::reference(Z_SERIALISER)))
        .with(Z_TYPE_DESERIALISERS, ZList::new(Node::reference(Z_DESERIALISER)));
    Ok(object.into())
}

pub(super) fn build_string(
    _cx: &mut BuildContext<'_, '_>,
    _descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Built {
    Ok(seeded_string(options))
}

pub(super) fn build_reference(
    _cx: &mut BuildContext<'_, '_>,
    _descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Built {
    Ok(seeded_reference(options))
}

/// A call to the seeded function, with one field per declared argument.
pub(super) fn build_function_call(
    cx: &mut BuildContext<'_, '_>,
    _descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Built {
    let function = options.value_text().unwrap_or_default();
    let mut object = tagged(Z_FUNCTION_CALL).with(Z_FUNCTION_CALL_FUNCTION, Node::reference(function));
    if function.is_empty() {
        return Ok(object.into());
    }

    match cx.schemas().function_signature(function) {
        Some(signature) => {
            for argument in &signature.arguments {
                let value = cx.create(&argument.key, &argument.value_type, &CreateOptions::new())?;
                object.insert(argument.key.as_str(), value);
            }
        }
        None => cx.mark_unresolved(function, UnresolvedKind::Function, options),
    }
    Ok(object.into())
}

pub(super) fn build_function(
    cx: &mut BuildContext<'_, '_>,
    _descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Built {
    let first_key = global_key(&cx.context().object_id, 1);
    let argument = cx.create(
        format!("{Z_FUNCTION_ARGUMENTS}.1"),
        &Node::text(Z_ARGUMENT),
        &CreateOptions {
            value: Some(Node::text(first_key)),
            lang: options.lang.clone(),
            ..CreateOptions::default()
        },
    )?;

    let object = tagged(Z_FUNCTION)
        .with(
            Z_FUNCTION_ARGUMENTS,
            ZList::from_items(Node::reference(Z_ARGUMENT), [argument]),
        )
        .with(Z_FUNCTION_RETURN_TYPE, blank_reference())
        .with(Z_FUNCTION_TESTERS, ZList::new(Node::reference(Z_TESTER)))
        .with(
            Z_FUNCTION_IMPLEMENTATIONS,
            ZList::new(Node::reference(Z_IMPLEMENTATION)),
        )
        .with(Z_FUNCTION_IDENTITY, identity(cx, options));
    Ok(object.into())
}

pub(super) fn build_monolingual_string(
    cx: &mut BuildContext<'_, '_>,
    _descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Built {
    let lang = entry_lang(cx, options);
    let object = tagged(Z_MONOLINGUAL_STRING)
        .with(
            Z_MONOLINGUAL_STRING_LANGUAGE,
            language(cx, Z_MONOLINGUAL_STRING_LANGUAGE, lang)?,
        )
        .with(Z_MONOLINGUAL_STRING_VALUE, seeded_string(options));
    Ok(object.into())
}

/// An empty multilingual text, or one entry when a value is seeded.
pub(super) fn build_multilingual_string(
    cx: &mut BuildContext<'_, '_>,
    _descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Built {
    let mut entries = ZList::new(Node::reference(Z_MONOLINGUAL_STRING));
    if options.value.is_some() {
        let entry = cx.create(
            format!("{Z_MULTILINGUAL_STRING_VALUE}.1"),
            &Node::text(Z_MONOLINGUAL_STRING),
            options,
        )?;
        entries.push(entry);
    }
    Ok(tagged(Z_MULTILINGUAL_STRING)
        .with(Z_MULTILINGUAL_STRING_VALUE, entries)
        .into())
}

pub(super) fn build_monolingual_stringset(
    cx: &mut BuildContext<'_, '_>,
    _descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Built {
    let lang = entry_lang(cx, options);
    let mut strings = ZList::new(Node::reference(Z_STRING));
    if let Some(text) = options.value_text() {
        strings.push(Node::string(text));
    }
    let object = tagged(Z_MONOLINGUAL_STRINGSET)
        .with(
            Z_MONOLINGUAL_STRINGSET_LANGUAGE,
            language(cx, Z_MONOLINGUAL_STRINGSET_LANGUAGE, lang)?,
        )
        .with(Z_MONOLINGUAL_STRINGSET_VALUE, strings);
    Ok(object.into())
}

pub(super) fn build_multilingual_stringset(
    cx: &mut BuildContext<'_, '_>,
    _descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Built {
    let mut sets = ZList::new(Node::reference(Z_MONOLINGUAL_STRINGSET));
    if options.value.is_some() {
        let set = cx.create(
            format!("{Z_MULTILINGUAL_STRINGSET_VALUE}.1"),
            &Node::text(Z_MONOLINGUAL_STRINGSET),
            options,
        )?;
        sets.push(set);
    }
    Ok(tagged(Z_MULTILINGUAL_STRINGSET)
        .with(Z_MULTILINGUAL_STRINGSET_VALUE, sets)
        .into())
}

/// An implementation, by default a composition with an empty call.
pub(super) fn build_implementation(
    cx: &mut BuildContext<'_, '_>,
    _descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Built {
    let composition = cx.create_default(Z_IMPLEMENTATION_COMPOSITION, Z_FUNCTION_CALL)?;
    let object = tagged(Z_IMPLEMENTATION)
        .with(Z_IMPLEMENTATION_FUNCTION, seeded_reference(options))
        .with(Z_IMPLEMENTATION_COMPOSITION, composition);
    Ok(object.into())
}

pub(super) fn build_code(
    cx: &mut BuildContext<'_, '_>,
    _descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Built {
    let language = cx.create_default(Z_CODE_LANGUAGE, Z_PROGRAMMING_LANGUAGE)?;
    let object = tagged(Z_CODE)
        .with(Z_CODE_LANGUAGE, language)
        .with(Z_CODE_CODE, seeded_string(options));
    Ok(object.into())
}

/// An argument declaration; the seed is its key.
pub(super) fn build_argument(
    cx: &mut BuildContext<'_, '_>,
    _descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Built {
    let label = cx.create_default(Z_ARGUMENT_LABEL, Z_MULTILINGUAL_STRING)?;
    let object = tagged(Z_ARGUMENT)
        .with(Z_ARGUMENT_TYPE, blank_reference())
        .with(Z_ARGUMENT_KEY, seeded_string(options))
        .with(Z_ARGUMENT_LABEL, label);
    Ok(object.into())
}

pub(super) fn build_argument_reference(
    _cx: &mut BuildContext<'_, '_>,
    _descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Built {
    Ok(tagged(Z_ARGUMENT_REFERENCE)
        .with(Z_ARGUMENT_REFERENCE_KEY, seeded_string(options))
        .into())
}

pub(super) fn build_tester(
    cx: &mut BuildContext<'_, '_>,
    _descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Built {
    let call = cx.create_default(Z_TESTER_CALL, Z_FUNCTION_CALL)?;
    let validation = cx.create_default(Z_TESTER_VALIDATION, Z_FUNCTION_CALL)?;
    let object = tagged(Z_TESTER)
        .with(Z_TESTER_FUNCTION, seeded_reference(options))
        .with(Z_TESTER_CALL, call)
        .with(Z_TESTER_VALIDATION, validation);
    Ok(object.into())
}

pub(super) fn build_boolean(
    _cx: &mut BuildContext<'_, '_>,
    _descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Built {
    Ok(tagged(Z_BOOLEAN)
        .with(Z_BOOLEAN_IDENTITY, seeded_reference(options))
        .into())
}

#[cfg(test)]
mod tests {
    use crate::{
        config::EditorContext,
        convert::to_canonical,
        factory::{BuilderRegistry, CreateOptions, Factory},
        model::Node,
        schema::SchemaCache,
    };

    fn create(type_id: &str, options: CreateOptions) -> String {
        let context = EditorContext::default();
        let schemas = SchemaCache::new();
        let registry = BuilderRegistry::with_builtins();
        let node = Factory::new(&context, &schemas, &registry)
            .create(type_id, &options)
            .unwrap();
        serde_json::to_string(&to_canonical(&node)).unwrap()
    }

    #[test]
    fn test_function_root() {
        assert_eq!(
            create("Z8", CreateOptions::new().root()),
            concat!(
                r#"{"Z1K1":"Z8","Z8K1":["Z17",{"Z1K1":"Z17","Z17K1":"","Z17K2":"Z0K1","#,
                r#""Z17K3":{"Z1K1":"Z12","Z12K1":["Z11"]}}],"Z8K2":"","Z8K3":["Z20"],"#,
                r#""Z8K4":["Z14"],"Z8K5":"Z0"}"#
            )
        );
    }

    #[test]
    fn test_persistent_function() {
        let json = create("Z2", CreateOptions::new().value("Z8"));
        assert!(json.starts_with(r#"{"Z1K1":"Z2","Z2K1":{"Z1K1":"Z6","Z6K1":"Z0"},"Z2K2":{"Z1K1":"Z8""#));
        assert!(json.contains(r#""Z8K5":"Z0""#));
        assert!(json.ends_with(
            r#""Z2K3":{"Z1K1":"Z12","Z12K1":["Z11"]},"Z2K4":{"Z1K1":"Z32","Z32K1":["Z31"]},"Z2K5":{"Z1K1":"Z12","Z12K1":["Z11"]}}"#
        ));
    }

    #[test]
    fn test_monolingual_defaults_to_user_language() {
        assert_eq!(
            create("Z11", CreateOptions::new().value("label")),
            r#"{"Z1K1":"Z11","Z11K1":"Z1002","Z11K2":"label"}"#
        );
        assert_eq!(
            create("Z11", CreateOptions::new().append()),
            r#"{"Z1K1":"Z11","Z11K1":"","Z11K2":""}"#
        );
        assert_eq!(
            create("Z12", CreateOptions::new().value("name").lang("Z1003")),
            r#"{"Z1K1":"Z12","Z12K1":["Z11",{"Z1K1":"Z11","Z11K1":"Z1003","Z11K2":"name"}]}"#
        );
    }

    #[test]
    fn test_type_and_key() {
        assert_eq!(
            create("Z4", CreateOptions::new().root()),
            r#"{"Z1K1":"Z4","Z4K1":"Z0","Z4K2":["Z3"],"Z4K3":"","Z4K4":"","Z4K5":"","Z4K6":"","Z4K7":["Z46"],"Z4K8":["Z64"]}"#
        );
        assert_eq!(
            create("Z3", CreateOptions::new()),
            r#"{"Z1K1":"Z3","Z3K1":"","Z3K2":"","Z3K3":{"Z1K1":"Z12","Z12K1":["Z11"]},"Z3K4":{"Z1K1":"Z40","Z40K1":"Z42"}}"#
        );
    }

    #[test]
    fn test_implementation_tester_and_code() {
        assert_eq!(
            create("Z14", CreateOptions::new().value("Z801")),
            r#"{"Z1K1":"Z14","Z14K1":"Z801","Z14K2":{"Z1K1":"Z7","Z7K1":""}}"#
        );
        assert_eq!(
            create("Z20", CreateOptions::new()),
            r#"{"Z1K1":"Z20","Z20K1":"","Z20K2":{"Z1K1":"Z7","Z7K1":""},"Z20K3":{"Z1K1":"Z7","Z7K1":""}}"#
        );
        assert_eq!(
            create("Z16", CreateOptions::new()),
            r#"{"Z1K1":"Z16","Z16K1":"","Z16K2":""}"#
        );
    }

    #[test]
    fn test_terminals() {
        assert_eq!(create("Z9", CreateOptions::new().value("Z11")), r#""Z11""#);
        assert_eq!(create("Z6", CreateOptions::new().value("Z11")), r#"{"Z1K1":"Z6","Z6K1":"Z11"}"#);
        assert_eq!(create("Z18", CreateOptions::new().value("Z801K1")), r#"{"Z1K1":"Z18","Z18K1":"Z801K1"}"#);
        assert_eq!(
            create("Z31", CreateOptions::new().value("alias")),
            r#"{"Z1K1":"Z31","Z31K1":"Z1002","Z31K2":["Z6","alias"]}"#
        );
        let node: Node = serde_json::from_str(&create("Z1", CreateOptions::new())).unwrap();
        assert_eq!(node.type_id(), Some(""));
    }
}
