//! SnapKV Snapshot Inspector
//!
//! Offline tool for looking at a snapshot directory: list snapshots, verify
//! checksums, dump entries and run the retention sweep by hand.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use snapkv::snapshot::{catalog, checksum, read_snapshot, retention, Compression};
use tracing_subscriber::{fmt, EnvFilter};

/// SnapKV snapshot inspector
#[derive(Parser, Debug)]
#[command(name = "snapkv-inspect")]
#[command(about = "Inspect SnapKV snapshot directories")]
#[command(version)]
struct Args {
    /// Snapshot directory
    #[arg(short, long, default_value = "./snapkv_data")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List snapshots, oldest first
    List,

    /// Verify checksums of one snapshot or all of them
    Verify {
        /// Snapshot identifier (all snapshots if omitted)
        #[arg(short, long)]
        id: Option<u64>,
    },

    /// Print the entries of a snapshot as hex
    Dump {
        /// Snapshot identifier (newest if omitted)
        #[arg(short, long)]
        id: Option<u64>,

        /// Snapshot frames are gzip-compressed
        #[arg(long)]
        gzip: bool,

        /// Print at most this many entries
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Delete all but the newest `keep + 1` snapshots
    Prune {
        /// Prior snapshots to keep besides the newest
        #[arg(short, long)]
        keep: u32,
    },
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,snapkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!("SnapKV Inspector v{}", snapkv::VERSION);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> snapkv::Result<ExitCode> {
    let dir = args.dir;

    match args.command {
        Commands::List => {
            for entry in catalog::list(&dir)? {
                println!(
                    "{:06}  {:>12} bytes  checksum={}",
                    entry.id,
                    entry.file_size,
                    if entry.has_checksum { "yes" } else { "missing" }
                );
            }
        }

        Commands::Verify { id } => {
            let ids = match id {
                Some(id) => vec![id],
                None => catalog::list_ids(&dir)?,
            };

            let mut failed = 0usize;
            for id in ids {
                match checksum::verify_checksum(&dir, id) {
                    Ok(digest) => println!("{:06}  ok   {}", id, checksum::to_hex(&digest)),
                    Err(e) => {
                        println!("{:06}  FAIL {}", id, e);
                        failed += 1;
                    }
                }
            }

            if failed > 0 {
                tracing::error!(failed, "snapshot verification failed");
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Dump { id, gzip, limit } => {
            let id = match id {
                Some(id) => id,
                None => match catalog::max_id(&dir)? {
                    0 => return Err(snapkv::SnapKvError::SnapshotNotFound),
                    id => id,
                },
            };
            let compression = if gzip {
                Compression::gzip()
            } else {
                Compression::None
            };

            let (table, summary) = read_snapshot(&dir, id, compression)?;
            println!(
                "# snapshot {:06}: {} frames, {} entries, {} bytes",
                summary.id,
                summary.entry_count,
                table.entry_count(),
                summary.file_size
            );

            let limit = limit.unwrap_or(usize::MAX);
            for (key, value) in table.iter().take(limit) {
                println!("{} => {}", hex::encode(key), hex::encode(value));
            }
        }

        Commands::Prune { keep } => {
            let deleted = retention::cleanup_up_to(&dir, keep)?;
            for id in &deleted {
                println!("deleted {:06}", id);
            }
            println!("{} snapshot(s) deleted", deleted.len());
        }
    }

    Ok(ExitCode::SUCCESS)
}
