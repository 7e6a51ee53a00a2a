//! dyldinfo - Inspect dyld shared cache records.
//!
//! Decode image info extra tables from a cache file and print the layout
//! descriptors of the supported record types.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use memmap2::Mmap;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use dyldinfo::{
    decode_image_info_extras, dyld_type_catalog, DecodeOptions, Describe, DyldCacheImageInfo,
    DyldCacheImageInfoExtra, DyldCacheMappingInfo, Endian, Error,
};

/// Inspect dyld shared cache records.
#[derive(Parser, Debug)]
#[command(name = "dyldinfo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode dyld_cache_image_info_extra records from a file
    Extra {
        /// Path to the cache (or any file containing the table)
        file: PathBuf,

        /// File offset of the first record (decimal or 0x hex)
        #[arg(short, long, default_value = "0", value_parser = parse_number)]
        offset: u64,

        /// Number of consecutive records to decode
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Treat the data as big-endian
        #[arg(long)]
        big_endian: bool,

        /// Verbosity level (0=quiet, 1=warnings, 2=info, 3=debug)
        #[arg(short, long, default_value = "1")]
        verbosity: u8,
    },

    /// Print record layout descriptors
    Describe {
        /// Record type to describe (all types if omitted)
        #[arg(short = 't', long = "type", value_enum)]
        record: Option<RecordType>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RecordType {
    /// dyld_cache_image_info_extra
    Extra,
    /// dyld_cache_image_info
    Image,
    /// dyld_cache_mapping_info
    Mapping,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extra {
            file,
            offset,
            count,
            big_endian,
            verbosity,
        } => {
            setup_logging(verbosity);
            let endian = if big_endian {
                Endian::Big
            } else {
                Endian::Little
            };
            cmd_extra(
                file,
                DecodeOptions {
                    endian,
                    offset,
                    count,
                },
            )
        }
        Commands::Describe { record } => cmd_describe(record),
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        _ => Level::DEBUG,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .finish();

    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Parses a decimal or `0x`-prefixed hex number.
fn parse_number(s: &str) -> std::result::Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid number '{}': {}", s, e))
}

fn cmd_extra(path: PathBuf, options: DecodeOptions) -> Result<()> {
    let file = File::open(&path).map_err(|source| Error::FileOpen {
        path: path.clone(),
        source,
    })?;
    // SAFETY: the mapping is read-only and lives only for this command
    let mmap = unsafe { Mmap::map(&file) }.map_err(|source| Error::MemoryMap {
        path: path.clone(),
        source,
    })?;
    info!("Mapped {} ({} bytes)", path.display(), mmap.len());

    let extras = decode_image_info_extras(&mmap, &options).with_context(|| {
        format!(
            "failed to decode {} record(s) at {:#x} in {}",
            options.count,
            options.offset,
            path.display()
        )
    })?;

    for (i, extra) in extras.iter().enumerate() {
        let offset = options.offset + (i * DyldCacheImageInfoExtra::SIZE) as u64;
        println!("[{}] {:#010x}: {}", i, offset, extra);
    }

    Ok(())
}

fn cmd_describe(record: Option<RecordType>) -> Result<()> {
    let descriptors = match record {
        Some(RecordType::Extra) => vec![DyldCacheImageInfoExtra::describe()],
        Some(RecordType::Image) => vec![DyldCacheImageInfo::describe()],
        Some(RecordType::Mapping) => vec![DyldCacheMappingInfo::describe()],
        None => dyld_type_catalog()?.iter().cloned().collect(),
    };

    for desc in &descriptors {
        println!("{}\n", desc);
    }

    Ok(())
}
