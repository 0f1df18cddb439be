//! Scaffold command - prints a default instance of a type.
//!
//! Types the builtin builders do not know are looked up in the object store,
//! the same way an editor fetches them in the background.

use std::sync::Arc;

use zobject::{
    Store,
    constants::NS_MAIN,
    convert::to_normal,
    factory::CreateOptions,
    model::Node,
    services::FetchDispatcher,
};

use crate::backend::{load_context, open_objects};
use crate::cli::ScaffoldArgs;
use crate::output::{OutputFormat, print_json, print_pretty};

/// Run the scaffold command
pub async fn run(args: &ScaffoldArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let descriptor = parse_descriptor(&args.type_descriptor)?;
    let mut options = CreateOptions::new();
    if let Some(value) = &args.value {
        options = options.value(value.as_str());
    }
    if args.literal {
        options = options.literal();
    }
    if args.root {
        options = options.root();
    }

    let mut store = Store::new(load_context(&args.context)?);
    store.create_root(NS_MAIN, descriptor, &options)?;

    let objects = open_objects(&args.store).await?;
    let (dispatcher, mut events) = FetchDispatcher::new(Arc::new(objects));
    let patched = dispatcher.settle(&mut store, &mut events).await;
    if patched > 0 {
        tracing::info!("Patched {patched} placeholders from the object store");
    }
    if !store.pending().is_empty() {
        tracing::warn!(
            "{} placeholders could not be resolved",
            store.pending().len()
        );
    }

    let Some(canonical) = store.canonical(NS_MAIN) else {
        return Err("scaffolding produced no object".into());
    };
    let scaffold = if args.normal {
        to_normal(&canonical)
    } else {
        canonical
    };

    match format {
        OutputFormat::Human => print_pretty(&scaffold)?,
        OutputFormat::Json => print_json(&scaffold)?,
    }
    Ok(())
}

/// A bare id, or a JSON type descriptor such as a generic call.
fn parse_descriptor(descriptor: &str) -> Result<Node, serde_json::Error> {
    let trimmed = descriptor.trim();
    if trimmed.starts_with('{') {
        serde_json::from_str(trimmed)
    } else {
        Ok(Node::text(trimmed))
    }
}
