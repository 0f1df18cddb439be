//! Type scaffolding.
//!
//! The [`Factory`] produces default instances of arbitrary type descriptors in
//! normalized form. It is a pure function of its input, the
//! [`EditorContext`] and the [`SchemaCache`]: nothing is fetched while
//! scaffolding. Where a type's schema is not cached yet the factory emits a
//! *shell* carrying only the type tag and reports it in
//! [`Scaffold::unresolved`], so the caller can fetch the schema and patch the
//! shell later.
//!
//! Decision order for every descriptor:
//!
//! 1. descriptor already on the ancestor chain → blank reference stub
//! 2. linked type without `literal` → reference stub seeded from `value`
//! 3. otherwise dispatch through the [`BuilderRegistry`]
//!
//! The ancestor chain is copied into each child, so sibling branches never
//! see each other's history.
//!
//! ```
//! use zobject::{config::EditorContext, factory::{BuilderRegistry, CreateOptions, Factory},
//!     model::Node, schema::SchemaCache};
//!
//! let context = EditorContext::default();
//! let schemas = SchemaCache::new();
//! let registry = BuilderRegistry::with_builtins();
//! let factory = Factory::new(&context, &schemas, &registry);
//!
//! let node = factory.create("Z6", &CreateOptions::new().value("hello"))?;
//! assert_eq!(node, Node::string("hello"));
//! # Ok::<(), zobject::factory::FactoryError>(())
//! ```

use tracing::debug;

use crate::{
    config::EditorContext,
    model::{Node, PathBuf},
    schema::{SchemaCache, TypeDescriptor},
};

mod builders;
mod composite;
pub mod errors;
mod generic;
pub mod registry;

pub use errors::FactoryError;
pub use registry::{BuilderRegistry, TypeBuilder};

/// Options for a single `create` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Seed value: text of a string, target of a reference, function of a
    /// call, item type of a list, value type of a persistent object.
    pub value: Option<Node>,
    /// Language of monolingual entries; defaults to the user language.
    pub lang: Option<String>,
    /// The instance is a new item appended to an existing list.
    pub append: bool,
    /// Build an inline instance even for linked types.
    pub literal: bool,
    /// Leave the two fields of a typed pair as shells.
    pub bare: bool,
    /// Building the root of the edited object: identity fields self-reference.
    pub root: bool,
}

impl CreateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, value: impl Into<Node>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn append(mut self) -> Self {
        self.append = true;
        self
    }

    pub fn literal(mut self) -> Self {
        self.literal = true;
        self
    }

    pub fn bare(mut self) -> Self {
        self.bare = true;
        self
    }

    pub fn root(mut self) -> Self {
        self.root = true;
        self
    }

    /// The seed as text, when it is a terminal.
    pub fn value_text(&self) -> Option<&str> {
        self.value.as_ref().and_then(Node::terminal_value)
    }
}

/// What an unresolved placeholder is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnresolvedKind {
    /// A shell `{Z1K1: T}` waiting for the key schema of type `T`
    Type,
    /// A function call waiting for the signature of its function
    Function,
}

/// A placeholder in a scaffolded tree that needs a schema to be completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    /// Location relative to the scaffolded node; empty for the node itself.
    pub path: PathBuf,
    /// The type or function whose schema is missing.
    pub id: String,
    pub kind: UnresolvedKind,
    /// Options the placeholder was built with, reused when it is completed.
    pub options: CreateOptions,
}

/// A scaffolded node together with its unresolved placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffold {
    pub node: Node,
    pub unresolved: Vec<Unresolved>,
}

/// Creates default instances of type descriptors.
#[derive(Debug, Clone, Copy)]
pub struct Factory<'a> {
    context: &'a EditorContext,
    schemas: &'a SchemaCache,
    registry: &'a BuilderRegistry,
}

impl<'a> Factory<'a> {
    pub fn new(
        context: &'a EditorContext,
        schemas: &'a SchemaCache,
        registry: &'a BuilderRegistry,
    ) -> Self {
        Self {
            context,
            schemas,
            registry,
        }
    }

    /// Creates a default instance of `descriptor`.
    ///
    /// Fails only when `descriptor` is not a type descriptor at all.
    pub fn create(
        &self,
        descriptor: impl Into<Node>,
        options: &CreateOptions,
    ) -> Result<Node, FactoryError> {
        self.scaffold(descriptor, options).map(|scaffold| scaffold.node)
    }

    /// Like [`create`](Self::create), also reporting unresolved placeholders.
    pub fn scaffold(
        &self,
        descriptor: impl Into<Node>,
        options: &CreateOptions,
    ) -> Result<Scaffold, FactoryError> {
        let descriptor = descriptor.into();
        let mut unresolved = Vec::new();
        let mut cx = BuildContext {
            factory: *self,
            seen: Vec::new(),
            path: PathBuf::new(),
            unresolved: &mut unresolved,
        };
        let node = self.build(&mut cx, &descriptor, options)?;
        Ok(Scaffold { node, unresolved })
    }

    fn build(
        &self,
        cx: &mut BuildContext<'a, '_>,
        descriptor: &Node,
        options: &CreateOptions,
    ) -> Result<Node, FactoryError> {
        let descriptor = TypeDescriptor::parse(descriptor)?;
        let key = descriptor.to_string();

        if cx.seen.contains(&key) {
            debug!(path = %cx.path, type_id = %key, "Cycle detected, emitting reference stub");
            return Ok(Node::reference(""));
        }

        if let Some(id) = descriptor.literal_id()
            && self.context.is_linked_type(id)
            && !options.literal
        {
            let target = options.value_text().unwrap_or_default();
            return Ok(Node::reference(target));
        }

        cx.seen.push(key);
        let builder = match &descriptor {
            TypeDescriptor::Inline(_) => self.registry.fallback(),
            _ => self.registry.get(descriptor.dispatch_id()),
        };
        builder.build(cx, &descriptor, options)
    }
}

/// State threaded through one scaffolding run.
///
/// Each nested field gets its own context through [`create`](Self::create),
/// with a copy of the ancestor chain and its own relative path.
pub struct BuildContext<'f, 'u> {
    factory: Factory<'f>,
    seen: Vec<String>,
    path: PathBuf,
    unresolved: &'u mut Vec<Unresolved>,
}

impl<'f> BuildContext<'f, '_> {
    pub fn context(&self) -> &'f EditorContext {
        self.factory.context
    }

    pub fn schemas(&self) -> &'f SchemaCache {
        self.factory.schemas
    }

    /// Location of the node being built, relative to the scaffold root.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Builds the value of the child at `key`.
    pub fn create(
        &mut self,
        key: impl std::fmt::Display,
        descriptor: &Node,
        options: &CreateOptions,
    ) -> Result<Node, FactoryError> {
        let factory = self.factory;
        let mut child = BuildContext {
            factory,
            seen: self.seen.clone(),
            path: self.path.clone().push(key.to_string()),
            unresolved: &mut *self.unresolved,
        };
        factory.build(&mut child, descriptor, options)
    }

    /// Builds a child with default options.
    pub fn create_default(
        &mut self,
        key: impl std::fmt::Display,
        type_id: &str,
    ) -> Result<Node, FactoryError> {
        self.create(key, &Node::text(type_id), &CreateOptions::default())
    }

    /// Records the node being built as waiting for the schema of `id`.
    pub fn mark_unresolved(&mut self, id: &str, kind: UnresolvedKind, options: &CreateOptions) {
        debug!(path = %self.path, zid = id, ?kind, "Scaffolded placeholder");
        self.unresolved.push(Unresolved {
            path: self.path.clone(),
            id: id.to_string(),
            kind,
            options: options.clone(),
        });
    }
}
