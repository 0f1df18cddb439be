//! Validate command - normalizes an object and reports its violations.

use zobject::{
    convert::to_normal,
    store::InvalidItems,
    submit::{NormalizeOptions, normalize, validate},
};

use crate::backend::read_document;
use crate::cli::ValidateArgs;
use crate::output::{OutputFormat, print_json, print_table};

/// Run the validate command
pub async fn run(args: &ValidateArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let mut root = to_normal(&read_document(&args.input).await?);
    normalize(
        &mut root,
        &mut InvalidItems::new(),
        &NormalizeOptions::new().disconnect(args.disconnect),
    );
    let report = validate(&root);

    match format {
        OutputFormat::Human => {
            if report.is_valid() {
                println!("valid");
            } else {
                let rows: Vec<Vec<String>> = report
                    .violations()
                    .iter()
                    .map(|v| vec![v.location.clone(), v.kind.to_string()])
                    .collect();
                print_table(&["LOCATION", "VIOLATION"], &rows);
            }
        }
        OutputFormat::Json => print_json(report.violations())?,
    }

    if !report.is_valid() {
        std::process::exit(1);
    }
    Ok(())
}
