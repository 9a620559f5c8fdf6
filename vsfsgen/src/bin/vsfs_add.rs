// SPDX-License-Identifier: MIT

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use vsfsgen::utils::{level_from_flags, set_log_level};
use vsfsgen::{image, log_error, log_info, log_verbose};

#[derive(Parser)]
#[command(name = "vsfs-add", version, about = "Add a file to the root of a MiniVSFS image", long_about = None)]
struct Cli {
    /// Existing image
    #[arg(long)]
    input: PathBuf,

    /// Destination image (may equal --input)
    #[arg(long)]
    output: PathBuf,

    /// Host file to embed
    #[arg(long)]
    file: PathBuf,

    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut img = image::read_image(&cli.input)?;
    let content = image::read_host_file(&cli.file)?;
    log_verbose!(
        "Loaded '{}' ({} bytes) and '{}' ({} bytes)",
        cli.input.display(),
        img.len(),
        cli.file.display(),
        content.len()
    );

    let name = image::host_file_name(&cli.file);
    let inode = image::add_file(&mut img, &name, &content)?;
    image::persist(&cli.output, &img)?;

    log_info!(
        "File '{}' added as inode {} ({} bytes) into '{}'.",
        cli.file.display(),
        inode,
        content.len(),
        cli.output.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    set_log_level(level_from_flags(cli.quiet, cli.verbose));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
