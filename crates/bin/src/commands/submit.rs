//! Submit command - normalizes, validates and saves an object.

use zobject::{
    Store,
    constants::{NS_MAIN, Z_PERSISTENT_OBJECT_ID},
    model::Node,
    submit::{SubmitOptions, SubmitOutcome, submit},
};

use crate::backend::{load_context, open_objects, read_document, save_objects};
use crate::cli::SubmitArgs;
use crate::output::{OutputFormat, print_json, print_table};

/// Run the submit command
pub async fn run(args: &SubmitArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let document = read_document(&args.input).await?;
    let mut context = load_context(&args.context)?;
    if let Some(id) = object_id(&document) {
        context = context.with_object_id(id);
    }

    let mut store = Store::new(context);
    store.load_canonical(NS_MAIN, &document);
    let objects = open_objects(&args.store).await?;

    let mut options = SubmitOptions::new().summary(args.summary.as_str());
    if let Some(target) = &args.target {
        options = options.target(target.as_str());
    }
    if args.disconnect {
        options = options.disconnect();
    }

    match submit(&mut store, &objects, &options).await? {
        SubmitOutcome::Saved(revision) => {
            save_objects(&objects, &args.store).await?;
            match format {
                OutputFormat::Human => {
                    println!("Saved {} (revision {})", revision.id, revision.revision)
                }
                OutputFormat::Json => print_json(&revision)?,
            }
            Ok(())
        }
        SubmitOutcome::Rejected(report) => {
            match format {
                OutputFormat::Human => {
                    eprintln!("Submission rejected:");
                    let rows: Vec<Vec<String>> = report
                        .violations()
                        .iter()
                        .map(|v| vec![v.location.clone(), v.kind.to_string()])
                        .collect();
                    print_table(&["LOCATION", "VIOLATION"], &rows);
                }
                OutputFormat::Json => print_json(report.violations())?,
            }
            std::process::exit(1);
        }
    }
}

/// The persistent id of a canonical document, if it has one.
fn object_id(document: &Node) -> Option<String> {
    let id = document.as_object()?.get(Z_PERSISTENT_OBJECT_ID)?;
    id.terminal_value()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
