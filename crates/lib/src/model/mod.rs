//! The generic typed-object tree model.
//!
//! A function-object document is a [`Document`]: a set of namespaces, each
//! holding a root [`Node`]. Nodes are terminal text, tagged composites
//! ([`ZObject`]) or typed lists ([`ZList`]). Locations inside a document are
//! addressed by dot separated key paths ([`Path`]/[`PathBuf`]) and found with
//! [`resolve`]/[`resolve_mut`].
//!
//! # Usage
//!
//! ```
//! use zobject::model::{Document, Node, PathBuf, ZList, ZObject, resolve};
//!
//! let function = ZObject::new(Node::reference("Z8"))
//!     .with("Z8K1", ZList::new(Node::reference("Z17")));
//! let mut document = Document::new();
//! document.set_root("main", function.into());
//!
//! let path = PathBuf::from("main.Z8K1");
//! let list = resolve(&document, &path)?.value().and_then(Node::as_list);
//! assert_eq!(list.map(ZList::len), Some(0));
//! # Ok::<(), zobject::model::ModelError>(())
//! ```

pub mod document;
pub mod errors;
pub mod keys;
pub mod list;
pub mod node;
pub mod path;
pub mod resolve;

pub use document::Document;
pub use errors::ModelError;
pub use list::{IndexOutOfRange, ZList};
pub use node::{Node, NodeKind, ZObject};
pub use path::{Path, PathBuf, Segment};
pub use resolve::{Container, ContainerMut, Location, LocationMut, resolve, resolve_mut};
