//! Builder registry.
//!
//! Scaffolding dispatches on the type id of a descriptor through a lookup
//! table of [`TypeBuilder`]s. Built-in types, the generic constructors and the
//! schema-driven composite builder are registered by
//! [`BuilderRegistry::with_builtins`]; callers can register their own builders
//! for further types without touching the dispatcher.

use std::{collections::HashMap, fmt, sync::Arc};

use super::{BuildContext, CreateOptions, FactoryError, builders, composite, generic};
use crate::{
    constants::{
        Z_ARGUMENT, Z_ARGUMENT_REFERENCE, Z_BOOLEAN, Z_CODE, Z_FUNCTION, Z_FUNCTION_CALL,
        Z_IMPLEMENTATION, Z_KEY, Z_MONOLINGUAL_STRING, Z_MONOLINGUAL_STRINGSET,
        Z_MULTILINGUAL_STRING, Z_MULTILINGUAL_STRINGSET, Z_OBJECT, Z_PERSISTENT_OBJECT,
        Z_REFERENCE, Z_STRING, Z_TESTER, Z_TYPE, Z_TYPED_LIST, Z_TYPED_MAP, Z_TYPED_PAIR,
    },
    model::Node,
    schema::TypeDescriptor,
};

/// Produces the default instance of one category of types.
///
/// Implemented for any `Fn(&mut BuildContext, &TypeDescriptor, &CreateOptions)`
/// with the right signature, so plain functions can be registered directly.
pub trait TypeBuilder: Send + Sync {
    fn build(
        &self,
        cx: &mut BuildContext<'_, '_>,
        descriptor: &TypeDescriptor,
        options: &CreateOptions,
    ) -> Result<Node, FactoryError>;
}

impl<F> TypeBuilder for F
where
    F: Fn(&mut BuildContext<'_, '_>, &TypeDescriptor, &CreateOptions) -> Result<Node, FactoryError>
        + Send
        + Sync,
{
    fn build(
        &self,
        cx: &mut BuildContext<'_, '_>,
        descriptor: &TypeDescriptor,
        options: &CreateOptions,
    ) -> Result<Node, FactoryError> {
        self(cx, descriptor, options)
    }
}

/// Lookup table from type id to builder, with a fallback for everything else.
#[derive(Clone)]
pub struct BuilderRegistry {
    builders: HashMap<String, Arc<dyn TypeBuilder>>,
    fallback: Arc<dyn TypeBuilder>,
}

impl BuilderRegistry {
    /// A registry with no dedicated builders; every type goes to `fallback`.
    pub fn new(fallback: impl TypeBuilder + 'static) -> Self {
        Self {
            builders: HashMap::new(),
            fallback: Arc::new(fallback),
        }
    }

    /// The registry with every built-in builder.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new(composite::build_composite);
        registry
            .register(Z_OBJECT, builders::build_object)
            .register(Z_PERSISTENT_OBJECT, builders::build_persistent_object)
            .register(Z_KEY, builders::build_key)
            .register(Z_TYPE, builders::build_type)
            .register(Z_STRING, builders::build_string)
            .register(Z_FUNCTION_CALL, builders::build_function_call)
            .register(Z_FUNCTION, builders::build_function)
            .register(Z_REFERENCE, builders::build_reference)
            .register(Z_MONOLINGUAL_STRING, builders::build_monolingual_string)
            .register(Z_MULTILINGUAL_STRING, builders::build_multilingual_string)
            .register(Z_IMPLEMENTATION, builders::build_implementation)
            .register(Z_CODE, builders::build_code)
            .register(Z_ARGUMENT, builders::build_argument)
            .register(Z_ARGUMENT_REFERENCE, builders::build_argument_reference)
            .register(Z_TESTER, builders::build_tester)
            .register(Z_MONOLINGUAL_STRINGSET, builders::build_monolingual_stringset)
            .register(Z_MULTILINGUAL_STRINGSET, builders::build_multilingual_stringset)
            .register(Z_BOOLEAN, builders::build_boolean)
            .register(Z_TYPED_LIST, generic::build_typed_list)
            .register(Z_TYPED_PAIR, generic::build_typed_pair)
            .register(Z_TYPED_MAP, generic::build_typed_map);
        registry
    }

    /// Registers `builder` for `type_id`, replacing any previous one.
    pub fn register(
        &mut self,
        type_id: impl Into<String>,
        builder: impl TypeBuilder + 'static,
    ) -> &mut Self {
        self.builders.insert(type_id.into(), Arc::new(builder));
        self
    }

    /// The builder for `type_id`, or the fallback.
    pub fn get(&self, type_id: &str) -> &dyn TypeBuilder {
        self.builders
            .get(type_id)
            .map(Arc::as_ref)
            .unwrap_or_else(|| self.fallback.as_ref())
    }

    /// The builder used for types without a dedicated one.
    pub fn fallback(&self) -> &dyn TypeBuilder {
        self.fallback.as_ref()
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.builders.contains_key(type_id)
    }
}

impl Default for BuilderRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for BuilderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&str> = self.builders.keys().map(String::as_str).collect();
        types.sort_unstable();
        f.debug_struct("BuilderRegistry")
            .field("types", &types)
            .finish_non_exhaustive()
    }
}
