use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use log::{error, LevelFilter};
use simple_logger::SimpleLogger;

use provenance::XattrTool;

// rmprov <file> # delete com.apple.provenance, or clear all attributes if that fails
#[derive(Parser)]
#[clap(version, about = "Remove the 'com.apple.provenance' extended attribute from a file")]
struct Arguments {
    #[clap(value_parser, help = "Path to the file or directory")]
    file: Option<PathBuf>,

    #[clap(
        long,
        value_parser,
        env = "RMPROV_XATTR",
        default_value = "xattr",
        value_name = "PROGRAM",
        help = "The extended attribute tool to run"
    )]
    xattr: PathBuf,

    #[clap(
        long,
        help = "Fail if the clear-all fallback exits non-zero",
        long_help = r#"Fail if the clear-all fallback exits non-zero.
Without this flag, the fallback counts as success once it has run."#
    )]
    strict: bool,

    #[clap(short, long, help = "Print debug output")]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = match Arguments::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_logger(args.verbose);

    let result = || -> Result<(), ()> {
        let file = args.file.ok_or_else(|| {
            eprintln!("{}", Arguments::command().render_usage());
            error!("missing file path");
        })?;
        if !file.exists() {
            error!("File not found: {}", file.display());
            return Err(());
        }

        let tool = XattrTool::new(args.xattr);
        let removal = provenance::remove_provenance(&tool, &file).map_err(|_| {
            error!("❌ Failed to remove provenance from {}", file.display());
        })?;
        if args.strict && !removal.is_strict_success() {
            error!("❌ Failed to remove provenance from {}", file.display());
            return Err(());
        }

        println!("✅ Removed provenance from {}", file.display());
        Ok(())
    }();
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = SimpleLogger::new()
        .with_level(level)
        .with_colors(std::io::stderr().is_terminal())
        .without_timestamps()
        .init();
}
