//! Show command - prints a stored object, or lists the stored ids.

use zobject::services::ObjectSource;

use crate::backend::open_objects;
use crate::cli::ShowArgs;
use crate::output::{OutputFormat, print_json, print_pretty, print_table};

/// Run the show command
pub async fn run(args: &ShowArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let objects = open_objects(&args.store).await?;

    if let Some(id) = &args.id {
        let Some(object) = objects.fetch_object(id).await? else {
            eprintln!("No object with id {id}");
            std::process::exit(1);
        };
        match format {
            OutputFormat::Human => print_pretty(&object)?,
            OutputFormat::Json => print_json(&object)?,
        }
        return Ok(());
    }

    let mut revisions = Vec::new();
    for id in objects.ids().await {
        let revision = objects.revision(&id).await.unwrap_or_default();
        revisions.push((id, revision));
    }
    match format {
        OutputFormat::Human if revisions.is_empty() => println!("No objects stored"),
        OutputFormat::Human => {
            let rows: Vec<Vec<String>> = revisions
                .iter()
                .map(|(id, revision)| vec![id.clone(), revision.to_string()])
                .collect();
            print_table(&["ID", "REVISION"], &rows);
        }
        OutputFormat::Json => {
            let value: Vec<_> = revisions
                .iter()
                .map(|(id, revision)| serde_json::json!({ "id": id, "revision": revision }))
                .collect();
            print_json(&value)?;
        }
    }
    Ok(())
}
