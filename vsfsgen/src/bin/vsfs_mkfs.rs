// SPDX-License-Identifier: MIT

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use vsfsgen::config::BuildConfig;
use vsfsgen::utils::{level_from_flags, set_log_level};
use vsfsgen::{image, log_error, log_info, log_verbose};

#[derive(Parser)]
#[command(name = "vsfs-mkfs", version, about = "Create an empty MiniVSFS image", long_about = None)]
struct Cli {
    /// Output image path
    #[arg(long)]
    image: Option<PathBuf>,

    /// Image size in KiB (180..4096, multiple of 4)
    #[arg(long = "size-kib")]
    size_kib: Option<u64>,

    /// Number of inodes (128..512)
    #[arg(long)]
    inodes: Option<u64>,

    /// TOML build file; flags given on the command line take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let base = match &cli.config {
        Some(path) => {
            log_verbose!("Loading build config: {}", path.display());
            BuildConfig::from_file(path)?
        }
        None => BuildConfig::default(),
    };
    let params = base
        .merge(BuildConfig {
            image: cli.image,
            size_kib: cli.size_kib,
            inodes: cli.inodes,
        })
        .resolve()?;

    let (meta, buf) = image::build_image(params.size_kib, params.inodes, None)?;
    for region in meta.regions() {
        log_verbose!(
            "  {:<12} blocks {:>4}..{:<4} ({} blocks)",
            region.name,
            region.start,
            region.end(),
            region.blocks
        );
    }

    image::persist(&params.image, &buf)?;

    log_info!(
        "MiniVSFS image '{}' created successfully.",
        params.image.display()
    );
    log_info!(
        "  size_kib={}  total_blocks={}",
        params.size_kib,
        meta.total_blocks
    );
    log_info!(
        "  inodes={}  inode_table_blocks={}  data_region_blocks={}",
        meta.inode_count,
        meta.inode_table_blocks,
        meta.data_region_blocks
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
