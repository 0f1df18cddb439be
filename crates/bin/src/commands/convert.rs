//! Convert command - rewrites a document in canonical or normalized form.

use zobject::convert::{to_canonical, to_normal};

use crate::backend::read_document;
use crate::cli::{ConvertArgs, Form};
use crate::output::{OutputFormat, print_json, print_pretty};

/// Run the convert command
pub async fn run(args: &ConvertArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let document = read_document(&args.input).await?;
    let converted = match args.to {
        Form::Canonical => to_canonical(&document),
        Form::Normal => to_normal(&document),
    };
    tracing::debug!(form = ?args.to, "Converted document");

    match format {
        OutputFormat::Human => print_pretty(&converted)?,
        OutputFormat::Json => print_json(&converted)?,
    }
    Ok(())
}
