use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use memmap2::Mmap;
use rinflate::{BatchConfig, BatchInflater};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rinflate")]
#[command(about = "Decompress raw DEFLATE (RFC 1951) streams")]
#[command(version)]
struct Args {
    /// Input files holding raw DEFLATE data (use - for stdin)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file for a single input (use - for stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of threads (0 = auto, 1 = single-threaded)
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,

    /// Cross-check every output against the flate2 reference decoder
    #[arg(long)]
    verify: bool,

    /// Show verbose statistics
    #[arg(short, long)]
    verbose: bool,
}

/// Exit codes
const EXIT_OK: u8 = 0;
const EXIT_VERIFY_FAILED: u8 = 1;
const EXIT_ERROR: u8 = 2;

/// Where a decoded stream goes
enum Destination {
    Stdout,
    File(PathBuf),
}

/// Compressed input, mapped for files and buffered for stdin
enum Input {
    Mapped(Mmap),
    Buffered(Vec<u8>),
}

impl AsRef<[u8]> for Input {
    fn as_ref(&self) -> &[u8] {
        match self {
            Input::Mapped(map) => &map[..],
            Input::Buffered(data) => &data[..],
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn run(args: &Args) -> Result<u8, Box<dyn std::error::Error>> {
    if args.output.is_some() && args.inputs.len() > 1 {
        return Err("--output requires exactly one input".into());
    }
    if args.inputs.iter().filter(|path| is_stdio(path)).count() > 1 {
        return Err("stdin can only be read once".into());
    }

    let destinations: Vec<Destination> =
        args.inputs.iter().map(|path| destination_for(path, args.output.as_deref())).collect();
    check_overwrites(&args.inputs, &destinations)?;

    let inputs = args.inputs.iter().map(|path| open_input(path)).collect::<io::Result<Vec<_>>>()?;

    let start = std::time::Instant::now();
    let config = BatchConfig { num_threads: args.threads };
    let results = BatchInflater::new(config).decompress_all(&inputs)?;
    let elapsed = start.elapsed();

    let mut exit_code = EXIT_OK;
    let mut total_in = 0u64;
    let mut total_out = 0u64;

    for (((path, input), result), destination) in
        args.inputs.iter().zip(&inputs).zip(results).zip(&destinations)
    {
        let decoded = result.map_err(|e| format!("{}: {}", path.display(), e))?;
        let compressed = input.as_ref();

        if args.verify && !matches_reference(compressed, &decoded)? {
            eprintln!("{}: output differs from reference decoder", path.display());
            exit_code = EXIT_VERIFY_FAILED;
        }

        write_output(destination, &decoded)?;

        if args.verbose {
            eprintln!("{}:", path.display());
            eprintln!("  Input bytes:      {}", compressed.len());
            eprintln!("  Output bytes:     {}", decoded.len());
            eprintln!("  CRC32:            {:08x}", crc32fast::hash(&decoded));
        }

        total_in += compressed.len() as u64;
        total_out += decoded.len() as u64;
    }

    if args.verbose {
        eprintln!("Decompression complete:");
        eprintln!("  Streams:          {}", inputs.len());
        eprintln!("  Input bytes:      {}", total_in);
        eprintln!("  Output bytes:     {}", total_out);
        eprintln!("  Time:             {:.2?}", elapsed);
        eprintln!(
            "  Throughput:       {:.1} MB/s",
            total_out as f64 / elapsed.as_secs_f64() / 1_000_000.0
        );
    }

    Ok(exit_code)
}

fn is_stdio(path: &Path) -> bool {
    path.to_str() == Some("-")
}

fn open_input(path: &Path) -> io::Result<Input> {
    if is_stdio(path) {
        let mut data = Vec::new();
        io::stdin().lock().read_to_end(&mut data)?;
        return Ok(Input::Buffered(data));
    }

    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        // Empty files cannot be mapped on every platform
        return Ok(Input::Buffered(Vec::new()));
    }
    // SAFETY: the map is read-only and lives only for this process; inputs are
    // not expected to be modified while they are decoded.
    let map = unsafe { Mmap::map(&file)? };
    Ok(Input::Mapped(map))
}

/// Output path for `input`: explicit, stdout for stdin, or derived from the input name
fn destination_for(input: &Path, output: Option<&Path>) -> Destination {
    match output {
        Some(path) if is_stdio(path) => Destination::Stdout,
        Some(path) => Destination::File(path.to_path_buf()),
        None if is_stdio(input) => Destination::Stdout,
        None => {
            let stripped = matches!(
                input.extension().and_then(|ext| ext.to_str()),
                Some("deflate") | Some("raw")
            );
            if stripped {
                Destination::File(input.with_extension(""))
            } else {
                let mut name = input.as_os_str().to_owned();
                name.push(".out");
                Destination::File(PathBuf::from(name))
            }
        }
    }
}

/// Refuse destinations that would truncate an input while it is still mapped
fn check_overwrites(inputs: &[PathBuf], destinations: &[Destination]) -> Result<(), String> {
    for destination in destinations {
        let Destination::File(output) = destination else { continue };
        if let Some(input) = inputs.iter().find(|input| !is_stdio(input) && same_file(input, output))
        {
            return Err(format!(
                "output {} would overwrite input {}",
                output.display(),
                input.display()
            ));
        }
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    matches!((a.canonicalize(), b.canonicalize()), (Ok(a), Ok(b)) if a == b)
}

fn write_output(destination: &Destination, data: &[u8]) -> io::Result<()> {
    match destination {
        Destination::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()
        }
        Destination::File(path) => {
            let mut output = BufWriter::new(File::create(path)?);
            output.write_all(data)?;
            output.flush()
        }
    }
}

/// Decode with flate2 and compare
fn matches_reference(compressed: &[u8], decoded: &[u8]) -> io::Result<bool> {
    let mut reference = Vec::with_capacity(decoded.len());
    flate2::read::DeflateDecoder::new(compressed).read_to_end(&mut reference)?;
    Ok(reference == decoded)
}
