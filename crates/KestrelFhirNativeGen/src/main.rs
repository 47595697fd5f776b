//! Command-line entry point for the decoder generator.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use kestrel_fhir_lib::FhirVersion;
use kestrel_fhir_native_gen::{extract_all, generate};
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "kestrel-fhir-native-gen",
    about = "Generates the native record decoding routines for the runtime crate"
)]
struct Cli {
    /// FHIR release to generate against.
    #[arg(long, value_enum, default_value = "r4")]
    fhir_version: FhirVersion,

    /// Write the generated module here instead of stdout.
    ///
    /// Run the output through rustfmt before checking it in.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Dump the extracted mapping plans as JSON instead of generating code.
    #[arg(long)]
    dump_mappings: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    if cli.dump_mappings {
        let mappings = extract_all(cli.fhir_version)?;
        println!("{}", serde_json::to_string_pretty(&mappings)?);
        return Ok(());
    }

    let module = generate(cli.fhir_version)?;
    match cli.output {
        Some(path) => {
            std::fs::write(&path, module)?;
            info!(path = %path.display(), version = %cli.fhir_version, "wrote generated module");
        }
        None => print!("{module}"),
    }
    Ok(())
}
