//! Object store and editor context setup shared by the commands.

use std::{io::Read, path::Path};

use zobject::{config::EditorContext, model::Node, services::InMemoryObjects};

use crate::cli::{ContextArgs, StoreArgs};

/// Builds the editor context from the config file and overrides.
pub fn load_context(args: &ContextArgs) -> Result<EditorContext, Box<dyn std::error::Error>> {
    let context = match &args.config {
        Some(path) => {
            tracing::debug!("Loading editor context from {}", path.display());
            EditorContext::load(path)?
        }
        None => EditorContext::default(),
    };
    Ok(match &args.lang {
        Some(lang) => context.with_lang(lang.as_str()),
        None => context,
    })
}

/// Opens the file-backed object store. A missing file starts an empty store.
pub async fn open_objects(args: &StoreArgs) -> Result<InMemoryObjects, Box<dyn std::error::Error>> {
    let objects = InMemoryObjects::load_from_file(&args.store).await?;
    tracing::info!(
        "Using object store at {} ({} objects)",
        args.store.display(),
        objects.len().await
    );
    Ok(objects)
}

/// Writes the object store back to its file.
pub async fn save_objects(
    objects: &InMemoryObjects,
    args: &StoreArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    objects.save_to_file(&args.store).await?;
    tracing::info!("Saved object store to {}", args.store.display());
    Ok(())
}

/// Reads a JSON document from a file, or from standard input for `-`.
pub async fn read_document(input: &Path) -> Result<Node, Box<dyn std::error::Error>> {
    let json = if input.as_os_str() == "-" {
        let mut json = String::new();
        std::io::stdin().read_to_string(&mut json)?;
        json
    } else {
        tokio::fs::read_to_string(input).await?
    };
    Ok(serde_json::from_str(&json)?)
}
