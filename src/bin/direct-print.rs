//! direct-print CLI tool
//!
//! Prints a piece of marked-up content on a named printer, no dialog involved.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use direct_print::backend::{CupsBackend, DirectoryBackend};
use direct_print::dispatch::PrintDispatcher;
use direct_print::invocation::RawInvocation;
use direct_print::job::JobSubmitter;
use direct_print::layout::{Length, PageFormat, Paper};
use direct_print::registry::{PrinterEnumerator, PrinterRegistry};
use direct_print::render::MarkupRenderer;
use direct_print::report::{
    BatchReporter, ConsoleNotifier, Notifier, Severity, APPLICATION_ERROR_TITLE,
    BATCH_FAILURE_TITLE,
};
use direct_print::logging;

/// direct-print - Print marked-up content directly on a named printer
#[derive(Parser)]
#[command(name = "direct-print")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "All four positional parameters are percent-encoded ('+' is a space).

EXAMPLES:
    # Print on a local queue using its whole imageable area
    direct-print '%3Cb%3EOrder+42%3C%2Fb%3E' HP1 default '1%3B1'

    # Print on a shared printer, into a 3\" x 2\" box, at half size
    direct-print 'Hello' '%5C%5CSRV%5CHP1' '72%3B72%3B216%3B144' '0.5%3B0.5'

    # Write PDFs into ./spool/<printer>/ instead of printing
    direct-print --backend directory --spool-dir spool 'Hello' HP1 default '1%3B1'")]
struct Cli {
    /// Marked-up content to print
    #[arg(allow_hyphen_values = true)]
    content: Option<String>,

    /// Printer name, optionally qualified as \\machine\printer
    #[arg(allow_hyphen_values = true)]
    printer: Option<String>,

    /// "default" or x;y;width;height in points
    #[arg(allow_hyphen_values = true)]
    region: Option<String>,

    /// Horizontal and vertical scale as x;y
    #[arg(allow_hyphen_values = true)]
    scale: Option<String>,

    /// Print service to use
    #[arg(long, value_enum, default_value_t = BackendArg::Cups)]
    backend: BackendArg,

    /// Root directory of the directory backend; each sub-directory is a printer
    #[arg(long)]
    spool_dir: Option<PathBuf>,

    /// Paper assumed when the printer does not report one
    #[arg(long, value_enum, default_value_t = PaperArg::Letter)]
    paper: PaperArg,

    /// Unprintable margin on every side of the page, in millimeters
    #[arg(long, default_value_t = 25.4)]
    margin_mm: f64,

    /// Base font size in points
    #[arg(long, default_value_t = 10.0)]
    font_size: f64,

    /// Job title shown by the print service
    #[arg(long, default_value = "direct-print")]
    title: String,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    /// Local CUPS queues
    Cups,
    /// PDF files in per-printer directories
    Directory,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    Letter,
    A4,
    Legal,
}

impl From<PaperArg> for Paper {
    fn from(paper: PaperArg) -> Self {
        match paper {
            PaperArg::Letter => Paper::Letter,
            PaperArg::A4 => Paper::A4,
            PaperArg::Legal => Paper::Legal,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let notifier = ConsoleNotifier;
    match run(&cli, &notifier) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            notifier.notify(APPLICATION_ERROR_TITLE, &format!("{e:#}"), Severity::Error);
            process::exit(1);
        }
    }
}

/// Returns whether every ticket printed
fn run(cli: &Cli, notifier: &dyn Notifier) -> anyhow::Result<bool> {
    let paper = Paper::from(cli.paper);
    let margin = Length::from_mm(cli.margin_mm);

    match cli.backend {
        BackendArg::Cups => print_with(cli, &CupsBackend::new(paper, margin), notifier),
        BackendArg::Directory => {
            let root = cli
                .spool_dir
                .as_ref()
                .context("--spool-dir is required with --backend directory")?;
            let backend = DirectoryBackend::new(root, PageFormat::with_margin(paper, margin));
            print_with(cli, &backend, notifier)
        }
    }
}

fn print_with<B>(cli: &Cli, backend: &B, notifier: &dyn Notifier) -> anyhow::Result<bool>
where
    B: PrinterEnumerator + JobSubmitter,
{
    let registry = PrinterRegistry::build(backend)?;

    let invocation = RawInvocation {
        content: cli.content.clone(),
        printer: cli.printer.clone(),
        region: cli.region.clone(),
        scale: cli.scale.clone(),
    }
    .decode()?;
    let batch = invocation.batch()?;

    let renderer = MarkupRenderer::new(cli.font_size);
    let result = PrintDispatcher::new(&registry, backend, &renderer)
        .with_title(cli.title.as_str())
        .dispatch(batch);

    match BatchReporter::report(&result) {
        None => Ok(true),
        Some(message) => {
            notifier.notify(BATCH_FAILURE_TITLE, &message, Severity::Error);
            Ok(false)
        }
    }
}
