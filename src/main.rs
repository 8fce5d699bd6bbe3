use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use bio::io::{fasta, fastq};
use clap::Parser;
use flate2::read::MultiGzDecoder;
use log::{debug, info};

use mccreight_rs::SuffixTree;

/// Suffix-tree indexing CLI: builds the tree for one sequence and reports
/// statistics, the BWT and the longest exact matching repeat.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// FASTA/FASTQ/plain-text file holding the sequence to index (gzip ok)
    input: String,

    /// File of whitespace-separated alphabet symbols (default: A C G T)
    #[arg(long)]
    alphabet: Option<String>,

    /// Minimum string depth for leaf-interval annotation
    #[arg(long)]
    lambda: Option<usize>,

    /// Write the Burrows-Wheeler transform here, one character per line
    #[arg(long)]
    bwt_out: Option<String>,

    /// Print tree statistics
    #[arg(long)]
    stats: bool,

    /// Dump every node of the finished tree
    #[arg(long)]
    print_tree: bool,

    /// Report the longest exact matching repeat
    #[arg(long)]
    longest_repeat: bool,

    /// Write statistics and the repeat report as JSON
    #[arg(long)]
    json_out: Option<String>,

    /// Verbose/info output (default: quiet)
    #[arg(long, short = 'v', alias = "info")]
    verbose: bool,

    /// Debug output
    #[arg(long)]
    debug: bool,

    /// Trace output
    #[arg(long)]
    trace: bool,
}

fn main() {
    let args = Args::parse();
    let log_level = if args.trace {
        "trace"
    } else if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "error"
    };
    std::env::set_var("RUST_LOG", log_level);
    env_logger::init();

    if let Err(error) = run(&args) {
        eprintln!("Indexing failed: {error:?}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SequenceFormat {
    Fastq,
    Fasta,
    Lines,
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz") || ext.eq_ignore_ascii_case("bgz"))
        .unwrap_or(false)
}

fn infer_format(path: &Path) -> SequenceFormat {
    let mut ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    if ext == "gz" || ext == "bgz" {
        if let Some(stem) = path.file_stem() {
            ext = Path::new(stem)
                .extension()
                .and_then(|e| e.to_str())
                .map(|s| s.to_ascii_lowercase())
                .unwrap_or_default();
        }
    }

    match ext.as_str() {
        "fastq" | "fq" => SequenceFormat::Fastq,
        "fasta" | "fa" | "fna" => SequenceFormat::Fasta,
        _ => SequenceFormat::Lines,
    }
}

fn open_reader(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    if is_gzip(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn uppercase_sequence(bytes: &[u8]) -> Result<String> {
    let upper = bytes
        .iter()
        .map(|b| b.to_ascii_uppercase())
        .collect::<Vec<u8>>();
    String::from_utf8(upper).map_err(|_| anyhow!("Encountered non-UTF-8 symbols in sequence data"))
}

/// Read every record/line and concatenate into the single sequence to index.
fn read_sequence(path: &Path) -> Result<String> {
    let format = infer_format(path);
    let reader = open_reader(path)?;

    let mut parts = Vec::new();
    match format {
        SequenceFormat::Fastq => {
            for record in fastq::Reader::new(reader).records() {
                let record = record.with_context(|| {
                    format!("Error reading FASTQ record from {}", path.display())
                })?;
                parts.push(uppercase_sequence(record.seq())?);
            }
        }
        SequenceFormat::Fasta => {
            for record in fasta::Reader::new(reader).records() {
                let record = record.with_context(|| {
                    format!("Error reading FASTA record from {}", path.display())
                })?;
                parts.push(uppercase_sequence(record.seq())?);
            }
        }
        SequenceFormat::Lines => {
            let mut buf_reader = reader;
            loop {
                let mut line = String::new();
                if buf_reader.read_line(&mut line)? == 0 {
                    break;
                }
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_ascii_uppercase());
                }
            }
        }
    }

    if parts.is_empty() {
        bail!("No sequence data found in {}", path.display());
    }
    if parts.len() > 1 {
        info!(
            "Concatenating {} records from {} into one sequence",
            parts.len(),
            path.display()
        );
    }
    Ok(parts.concat())
}

fn read_alphabet(path: Option<&str>) -> Result<Vec<char>> {
    let Some(path) = path else {
        return Ok(vec!['A', 'C', 'G', 'T']);
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read alphabet from {path}"))?;
    let mut symbols = Vec::new();
    for token in content.split_whitespace() {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => symbols.push(ch.to_ascii_uppercase()),
            _ => bail!("Alphabet token {token:?} is not a single symbol"),
        }
    }
    if symbols.is_empty() {
        bail!("Alphabet file {path} is empty");
    }
    Ok(symbols)
}

fn run(args: &Args) -> Result<()> {
    let sequence = read_sequence(Path::new(&args.input))
        .with_context(|| format!("Failed to parse sequence from {}", args.input))?;
    let alphabet = read_alphabet(args.alphabet.as_deref())?;
    info!(
        "Indexing {} characters over alphabet {:?}",
        sequence.len(),
        alphabet
    );

    let mut tree = SuffixTree::build(&sequence, &alphabet)
        .context("Suffix tree construction failed")?;
    info!("Tree built: {} nodes", tree.node_count());

    if let Some(lambda) = args.lambda {
        tree.annotate(lambda);
        info!("Annotated leaf intervals with lambda = {lambda}");
        debug!("Leaf order: {:?}", tree.leaf_order()?);
    }

    // With no explicit output requested, fall back to the stats summary so
    // the tool always says something useful.
    let no_outputs = !args.stats
        && !args.print_tree
        && !args.longest_repeat
        && args.bwt_out.is_none()
        && args.json_out.is_none();

    let stats = tree.stats();
    if args.stats || no_outputs {
        println!("Total number of nodes: {}", stats.total_nodes);
        println!("Number of internal nodes: {}", stats.internal_nodes);
        println!("Number of leaves: {}", stats.leaves);
        println!("Size of the tree (bytes): {}", stats.approx_bytes);
        println!(
            "Average string depth of an internal node: {:.3}",
            stats.average_internal_depth
        );
        println!(
            "String depth of the deepest internal node: {}",
            stats.max_internal_depth
        );
    }

    if args.print_tree {
        print!("{}", tree.render());
    }

    let repeat = tree.longest_repeat();
    if args.longest_repeat {
        println!("Longest exact matching repeat:");
        println!("\tLength = {}", repeat.length);
        println!(
            "\tStarting positions: {}",
            repeat
                .positions
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        );
    }

    if let Some(path) = &args.bwt_out {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut fh = File::create(path)
            .with_context(|| format!("Failed to create BWT output {path}"))?;
        for &b in &tree.bwt() {
            writeln!(fh, "{}", b as char)?;
        }
        info!("BWT written to {path}");
    }

    if let Some(path) = &args.json_out {
        use serde_json::json;
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let report = json!({
            "input_length": sequence.len(),
            "lambda": args.lambda,
            "stats": stats,
            "longest_repeat": repeat,
        });
        let mut fh = File::create(path)
            .with_context(|| format!("Failed to create JSON output {path}"))?;
        writeln!(fh, "{}", serde_json::to_string_pretty(&report)?)?;
        info!("JSON report written to {path}");
    }

    Ok(())
}
