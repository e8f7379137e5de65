use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use glyphspkg::package_to_single;
use std::path::PathBuf;

/// Convert a Glyphs package directory to a single-file Glyphs source
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Glyphs package to convert
    input: PathBuf,

    /// Output file, or directory to place the converted file in
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.into())
        .init();

    match package_to_single(&args.input, args.output.as_deref()) {
        Ok(written) => log::debug!("Converted to {}", written.display()),
        Err(e) => {
            log::error!("Conversion failed: {e}");
            std::process::exit(1);
        }
    }
}
