//! CLI argument definitions for the zobject binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Representation to convert a document into
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Form {
    /// Terse wire form
    Canonical,
    /// Fully explicit editing form
    Normal,
}

/// Typed function-object documents
#[derive(Parser, Debug)]
#[command(name = "zobject")]
#[command(about = "zobject: scaffold, convert, validate and submit function objects")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print machine-readable JSON instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a document between canonical and normalized form
    Convert(ConvertArgs),
    /// Print a default instance of a type
    Scaffold(ScaffoldArgs),
    /// Normalize and validate an object without saving it
    Validate(ValidateArgs),
    /// Normalize, validate and save an object to the object store
    Submit(SubmitArgs),
    /// Print a stored object, or list stored ids
    Show(ShowArgs),
}

/// Editor context shared by commands that scaffold or validate
#[derive(clap::Args, Debug)]
pub struct ContextArgs {
    /// JSON file with the editor context (language, linked types, object id)
    #[arg(long, env = "ZOBJECT_CONFIG")]
    pub config: Option<PathBuf>,

    /// User language, overriding the config file
    #[arg(long, env = "ZOBJECT_LANG")]
    pub lang: Option<String>,
}

/// Location of the file-backed object store
#[derive(clap::Args, Debug)]
pub struct StoreArgs {
    /// JSON file holding the stored objects
    #[arg(long, default_value = "zobject.json", env = "ZOBJECT_STORE")]
    pub store: PathBuf,
}

/// Arguments for the convert command
#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Input JSON file, or `-` for standard input
    pub input: PathBuf,

    /// Target representation
    #[arg(long, value_enum, default_value = "normal")]
    pub to: Form,
}

/// Arguments for the scaffold command
#[derive(clap::Args, Debug)]
pub struct ScaffoldArgs {
    /// Type descriptor: an id such as `Z8`, or a JSON generic call or type
    pub type_descriptor: String,

    /// Seed value (string text, reference target, called function, ...)
    #[arg(long)]
    pub value: Option<String>,

    /// Build a literal instance even for linked types
    #[arg(long)]
    pub literal: bool,

    /// Build a fresh root whose identity fields reference the object itself
    #[arg(long)]
    pub root: bool,

    /// Print the normalized form instead of the canonical form
    #[arg(long)]
    pub normal: bool,

    #[command(flatten)]
    pub context: ContextArgs,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Arguments for the validate command
#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Canonical object JSON file, or `-` for standard input
    pub input: PathBuf,

    /// Detach connected implementations and testers while normalizing
    #[arg(long)]
    pub disconnect: bool,
}

/// Arguments for the submit command
#[derive(clap::Args, Debug)]
pub struct SubmitArgs {
    /// Canonical object JSON file, or `-` for standard input
    pub input: PathBuf,

    /// Edit summary recorded with the revision
    #[arg(short, long, default_value = "")]
    pub summary: String,

    /// Save under this id instead of the object's own
    #[arg(long)]
    pub target: Option<String>,

    /// Detach connected implementations and testers
    #[arg(long)]
    pub disconnect: bool,

    #[command(flatten)]
    pub context: ContextArgs,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Arguments for the show command
#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Id of the object to print; lists all ids when omitted
    pub id: Option<String>,

    #[command(flatten)]
    pub store: StoreArgs,
}
