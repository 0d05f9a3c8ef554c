use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use simple_huffman::metadata::{read_frequency_table, write_frequency_table};
use simple_huffman::{count_frequencies, HuffmanCodec, Result};

#[derive(Parser)]
#[command(name = "simple-huffman", about = "Huffman compression of text files")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a text file
    Compress {
        /// Input file
        file: PathBuf,
        /// Output file (default: <file>.huff)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Frequency table file (default: <output>.freq)
        #[arg(short, long)]
        table: Option<PathBuf>,
    },
    /// Decompress a .huff file
    Decompress {
        /// Input file
        file: PathBuf,
        /// Frequency table written by `compress`
        #[arg(short, long)]
        table: PathBuf,
        /// Output file (default: strip .huff extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the code of every character in a file
    Codes {
        /// Input file
        file: PathBuf,
    },
    /// Print the code tree of a file
    Tree {
        /// Input file
        file: PathBuf,
    },
    /// Compress, decompress and verify each file, reporting failures per file
    Batch {
        /// Input files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let result = match cli.command {
        Commands::Compress { file, output, table } => compress(&file, output, table),
        Commands::Decompress { file, table, output } => decompress(&file, &table, output),
        Commands::Codes { file } => print_codes(&file),
        Commands::Tree { file } => print_tree(&file),
        Commands::Batch { files } => return batch(&files),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn compress(file: &Path, output: Option<PathBuf>, table: Option<PathBuf>) -> Result<()> {
    let output = output.unwrap_or_else(|| with_suffix(file, ".huff"));
    let table = table.unwrap_or_else(|| with_suffix(&output, ".freq"));

    let frequencies = count_frequencies(file)?;
    let codec = HuffmanCodec::new(&frequencies);
    let stats = codec.compress_file(file, &output)?;

    let mut writer = BufWriter::new(File::create(&table)?);
    write_frequency_table(&mut writer, &frequencies)?;
    log::info!(
        "wrote {} and {} ({:.1}% of original)",
        output.display(),
        table.display(),
        stats.ratio() * 100.0
    );
    Ok(())
}

fn decompress(file: &Path, table: &Path, output: Option<PathBuf>) -> Result<()> {
    let output = output.unwrap_or_else(|| match file.to_string_lossy().strip_suffix(".huff") {
        Some(stripped) => PathBuf::from(stripped),
        None => with_suffix(file, ".out"),
    });

    let frequencies = read_frequency_table(&mut BufReader::new(File::open(table)?))?;
    let codec = HuffmanCodec::new(&frequencies);
    codec.decompress_file(file, &output)?;
    Ok(())
}

fn print_codes(file: &Path) -> Result<()> {
    let codec = HuffmanCodec::from_file(file)?;
    for (symbol, code) in codec.table().iter() {
        println!("{}\t{}", symbol.escape_default(), code);
    }
    Ok(())
}

fn print_tree(file: &Path) -> Result<()> {
    let codec = HuffmanCodec::from_file(file)?;
    match codec.tree() {
        Some(tree) => print!("{tree}"),
        None => println!("(empty)"),
    }
    Ok(())
}

fn batch_one(file: &Path) -> Result<bool> {
    let compressed = with_suffix(file, ".huff");
    let restored = with_suffix(file, ".huff.out");

    let codec = HuffmanCodec::from_file(file)?;
    codec.compress_file(file, &compressed)?;
    codec.decompress_file(&compressed, &restored)?;

    let original = std::fs::read(file)?;
    let roundtrip = std::fs::read(&restored)?;
    Ok(original == roundtrip)
}

fn batch(files: &[PathBuf]) -> ExitCode {
    let mut failed = 0usize;
    for file in files {
        match batch_one(file) {
            Ok(true) => log::info!("{}: ok", file.display()),
            Ok(false) => {
                failed += 1;
                log::error!("{}: decompressed output differs from input", file.display());
            }
            Err(e) => {
                failed += 1;
                log::error!("{}: {e}", file.display());
            }
        }
    }
    log::info!("{} of {} files ok", files.len() - failed, files.len());
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
