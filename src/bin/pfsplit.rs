use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use pfsplit::app::{App, RunResult};
use pfsplit::config::{ConfigLoader, ConfigOverrides};
use pfsplit::error::PfSplitError;
use pfsplit::output::JsonOutput;

#[derive(Parser)]
#[command(name = "pfsplit")]
#[command(about = "Split a MetaPathways PathoLogic export into per-MAG Pathway Tools input bundles")]
#[command(version, author)]
struct Cli {
    #[arg(long, help = "Compacted reaction record file (normally 0.pf)")]
    pf: Option<String>,

    #[arg(long, help = "ORF-to-contig annotation table")]
    annotation: Option<String>,

    #[arg(long, help = "Contig-to-bin map (UniteM output)")]
    bin_map: Option<String>,

    #[arg(long, help = "Duplicate ORF map")]
    orf_map: Option<String>,

    #[arg(long, help = "Output root for the results directory")]
    output: Option<String>,

    #[arg(long, help = "Sample name for organism-params and dummy files")]
    sample: Option<String>,

    #[arg(long, help = "JSON config file (default: pfsplit.json if present)")]
    config: Option<String>,

    #[arg(long, help = "Print the run summary as JSON")]
    json: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<PfSplitError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &PfSplitError) -> u8 {
    match error {
        PfSplitError::UnseparatedField { .. }
        | PfSplitError::UnterminatedRecord { .. }
        | PfSplitError::RecordWithoutId { .. }
        | PfSplitError::MissingColumn { .. }
        | PfSplitError::TableParse { .. }
        | PfSplitError::MissingIntactOrf(_)
        | PfSplitError::ConfigParse(_) => 2,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let overrides = ConfigOverrides {
        pf: cli.pf.map(Utf8PathBuf::from),
        annotation: cli.annotation.map(Utf8PathBuf::from),
        bin_map: cli.bin_map.map(Utf8PathBuf::from),
        orf_map: cli.orf_map.map(Utf8PathBuf::from),
        output: cli.output.map(Utf8PathBuf::from),
        sample_name: cli.sample,
    };

    let config = ConfigLoader::resolve(cli.config.as_deref(), overrides).into_diagnostic()?;
    let app = App::new(config);
    let result = app.run().into_diagnostic()?;

    if cli.json {
        JsonOutput::print_run(&result).into_diagnostic()?;
    } else {
        print_run_summary(&result);
    }
    Ok(())
}

fn print_run_summary(result: &RunResult) {
    let green = "\x1b[32m";
    let cyan = "\x1b[36m";
    let reset = "\x1b[0m";

    println!("{cyan}pfsplit summary for sample {}{reset}", result.sample_name);
    println!(
        "{green}{} records across {} bins{reset}",
        result.total_records,
        result.bins.len()
    );
    for bin in &result.bins {
        println!("  {} ({} records) -> {}", bin.bin_id, bin.records, bin.path);
    }
}
