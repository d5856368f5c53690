use clap::{Arg, ArgAction, Command};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use std::{path::Path, process, sync::Arc};

use compressor::{Compressor, Lzw};
use crypto::{KeyedCipher, SymmetricCipher};
use pipeline::{collect_jobs, Direction, Pipeline};

struct Args {
    direction: Direction,
    threads: usize,
    output: String,
    source: String,
    key: Vec<u8>,
}

fn get_compressor() -> Arc<dyn Compressor> {
    let compressor: Arc<dyn Compressor> = Arc::new(Lzw::new());
    compressor
}

fn get_cipher() -> Arc<dyn SymmetricCipher> {
    let cipher: Arc<dyn SymmetricCipher> = Arc::new(KeyedCipher::new());
    cipher
}

fn get_args() -> Args {
    let matches = Command::new("rbshard")
        .about("Compresses files with LZW and encrypts them, or reverses both steps")
        .arg(Arg::new("decode")
            .short('d')
            .long("decode")
            .action(ArgAction::SetTrue)
            .help("Decrypt and decompress instead of compress and encrypt"))
        .arg(Arg::new("threads")
            .short('T')
            .long("threads")
            .value_parser(clap::value_parser!(u32).range(1..))
            .default_value("4")
            .help("Number of worker threads"))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .num_args(1)
            .required(true)
            .help("Output file, or output folder when the source is a folder"))
        .arg(Arg::new("source")
            .short('s')
            .long("source")
            .num_args(1)
            .required(true)
            .help("File or folder to read"))
        .arg(Arg::new("key")
            .short('k')
            .long("key")
            .num_args(1)
            .required(true)
            .env("RBSHARD_KEY")
            .hide_env_values(true)
            .help("Encryption key"))
        .get_matches();

    let direction = if matches.get_flag("decode") { Direction::Decode } else { Direction::Encode };
    let threads = *matches.get_one::<u32>("threads").unwrap_or(&4) as usize;
    let output = matches.get_one::<String>("output").expect("output is required");
    let source = matches.get_one::<String>("source").expect("source is required");
    let key = matches.get_one::<String>("key").expect("key is required");

    Args {
        direction,
        threads,
        output: output.clone(),
        source: source.clone(),
        key: key.as_bytes().to_vec(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rbshard=info,pipeline=info")),
        )
        .with_target(false)
        .init();

    let args = get_args();

    if args.key.is_empty() {
        error!("Key must not be empty");
        process::exit(1);
    }

    let pipeline = Pipeline::new(get_compressor(), get_cipher());

    let source_path = Path::new(&args.source);
    let output_path = Path::new(&args.output);

    let jobs = match collect_jobs(source_path, output_path, args.direction) {
        Ok(jobs) => jobs,
        Err(e) => {
            error!("Cannot read {}: {}", source_path.display(), e);
            process::exit(1);
        }
    };

    if jobs.is_empty() {
        warn!("Nothing to do in {}", source_path.display());
    }

    match args.direction {
        Direction::Encode => info!("Started encode process..."),
        Direction::Decode => info!("Started decode process..."),
    }

    let report = pipeline.run_batch(jobs, &args.key, args.threads);

    if !report.is_success() {
        if args.direction == Direction::Decode {
            error!("{} file(s) failed to decode. Maybe your key is incorrect!", report.failed.len());
        }
        process::exit(1);
    }

    info!("Process done! {} file(s) written", report.finished.len());
}
