use std::path::PathBuf;
use std::{fmt::Display, fmt::Formatter};

use clap::{Parser, Subcommand};
use log::{info, LevelFilter};

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Warnings,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    /// `-q` wins over any number of `-v`.
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Warnings,
            (false, 1) => Verbosity::Info,
            (false, 2) => Verbosity::Debug,
            _ => Verbosity::Trace,
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Off,
            Verbosity::Warnings => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

/// Compress, Decompress
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Compress,
    Decompress,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct DiffOpts {
    /// Compress/Decompress
    pub op_mode: Mode,
    /// Compress: the original file. Decompress: the `.bin` payload.
    pub file_a: PathBuf,
    /// Compress: the changed file. Decompress: the `.huf` tree artifact.
    pub file_b: PathBuf,
    /// Directory the compress artifacts are written to
    pub out_dir: PathBuf,
    /// Decompress target; stdout when None
    pub output: Option<PathBuf>,
    /// Write the `.bin`, `.huf` and bits `.txt` files
    pub write_artifacts: bool,
    /// Print the diff text after compressing
    pub print_diff: bool,
    /// Print the encoded bits after compressing
    pub print_bits: bool,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl DiffOpts {
    pub fn new() -> Self {
        Self {
            op_mode: Mode::Compress,
            file_a: PathBuf::new(),
            file_b: PathBuf::new(),
            out_dir: PathBuf::from("."),
            output: None,
            write_artifacts: true,
            print_diff: false,
            print_bits: false,
            verbose: Verbosity::Warnings,
        }
    }
}

impl Default for DiffOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Command line interpretation - uses the clap crate.
#[derive(Parser, Debug)]
#[clap(
    name = "huffdiff",
    version,
    about = "Line diff of two text files, compressed with a Huffman code",
    long_about = "
    Computes the lines removed from FILE_A and added in FILE_B (along their longest common
    subsequence), Huffman-encodes that diff text and packs the bits into bytes. The payload,
    the Huffman tree and a readable copy of the bits are saved next to each other, named
    after FILE_A. The decompress command turns a saved payload and tree back into the diff."
)]
pub struct Args {
    #[clap(subcommand)]
    command: Command,

    /// Sets verbosity. -v shows progress, -vvv is chatty
    #[clap(short = 'v', long = "verbose", parse(from_occurrences), global = true)]
    verbose: u8,

    /// Only report errors on stderr
    #[clap(short = 'q', long = "quiet", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Diff two files and compress the diff
    Compress {
        /// The original file
        file_a: PathBuf,
        /// The changed file
        file_b: PathBuf,
        /// Directory for the saved artifacts
        #[clap(short = 'o', long = "out-dir", default_value = ".")]
        out_dir: PathBuf,
        /// Do not save any artifacts
        #[clap(long = "no-artifacts")]
        no_artifacts: bool,
        /// Print the diff text
        #[clap(long = "print-diff")]
        print_diff: bool,
        /// Print the encoded bits
        #[clap(long = "print-bits")]
        print_bits: bool,
    },
    /// Rebuild the diff text from a saved payload and tree
    Decompress {
        /// The `_compressed.bin` payload
        bin_file: PathBuf,
        /// The `_tree.huf` tree artifact
        tree_file: PathBuf,
        /// Write the diff here instead of stdout
        #[clap(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

impl From<Args> for DiffOpts {
    fn from(args: Args) -> Self {
        let mut opts = DiffOpts::new();
        opts.verbose = Verbosity::from_flags(args.quiet, args.verbose);
        match args.command {
            Command::Compress {
                file_a,
                file_b,
                out_dir,
                no_artifacts,
                print_diff,
                print_bits,
            } => {
                opts.op_mode = Mode::Compress;
                opts.file_a = file_a;
                opts.file_b = file_b;
                opts.out_dir = out_dir;
                opts.write_artifacts = !no_artifacts;
                opts.print_diff = print_diff;
                opts.print_bits = print_bits;
            }
            Command::Decompress {
                bin_file,
                tree_file,
                output,
            } => {
                opts.op_mode = Mode::Decompress;
                opts.file_a = bin_file;
                opts.file_b = tree_file;
                opts.output = output;
            }
        }
        opts
    }
}

/// Parse an explicit argument list (the first item is the program name).
pub fn parse_from<I, T>(args: I) -> Result<DiffOpts, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Args::try_parse_from(args).map(DiffOpts::from)
}

/// Read the command line, set the log level and report the settings.
pub fn diffopts_init() -> DiffOpts {
    let opts = DiffOpts::from(Args::parse());

    // Set the log level
    log::set_max_level(opts.verbose.level_filter());

    // Below we report initialization status to the user
    info!("---- huffdiff Initialization Start ----");
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    match opts.op_mode {
        Mode::Compress => {
            info!(
                "Comparing {} with {}",
                opts.file_a.display(),
                opts.file_b.display()
            );
            if opts.write_artifacts {
                info!("Saving artifacts to {}", opts.out_dir.display());
            } else {
                info!("Not saving artifacts");
            }
        }
        Mode::Decompress => {
            info!(
                "Decoding {} with tree {}",
                opts.file_a.display(),
                opts.file_b.display()
            );
            match &opts.output {
                Some(p) => info!("Writing the diff to {}", p.display()),
                None => info!("Writing the diff to stdout"),
            }
        }
    }
    info!("---- huffdiff Initialization End ----");
    opts
}

#[cfg(test)]
mod test {
    use super::{parse_from, Mode, Verbosity};
    use std::path::Path;

    #[test]
    fn compress_defaults() {
        let opts = parse_from(["huffdiff", "compress", "a.txt", "b.txt"]).unwrap();
        assert_eq!(opts.op_mode, Mode::Compress);
        assert_eq!(opts.file_a, Path::new("a.txt"));
        assert_eq!(opts.file_b, Path::new("b.txt"));
        assert_eq!(opts.out_dir, Path::new("."));
        assert!(opts.write_artifacts);
        assert!(!opts.print_diff);
        assert_eq!(opts.verbose, Verbosity::Warnings);
    }

    #[test]
    fn compress_flags() {
        let opts = parse_from([
            "huffdiff",
            "-vv",
            "compress",
            "--no-artifacts",
            "--print-diff",
            "--print-bits",
            "-o",
            "out",
            "a.txt",
            "b.txt",
        ])
        .unwrap();
        assert!(!opts.write_artifacts);
        assert!(opts.print_diff);
        assert!(opts.print_bits);
        assert_eq!(opts.out_dir, Path::new("out"));
        assert_eq!(opts.verbose, Verbosity::Debug);
    }

    #[test]
    fn decompress_args() {
        let opts =
            parse_from(["huffdiff", "decompress", "x.bin", "x.huf", "-o", "x.diff", "-q"]).unwrap();
        assert_eq!(opts.op_mode, Mode::Decompress);
        assert_eq!(opts.file_a, Path::new("x.bin"));
        assert_eq!(opts.file_b, Path::new("x.huf"));
        assert_eq!(opts.output.as_deref(), Some(Path::new("x.diff")));
        assert_eq!(opts.verbose, Verbosity::Quiet);
    }

    #[test]
    fn missing_file_is_a_usage_error() {
        assert!(parse_from(["huffdiff", "compress", "a.txt"]).is_err());
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Warnings);
        assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Info);
        assert_eq!(Verbosity::from_flags(false, 7), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(true, 3), Verbosity::Quiet);
        assert_eq!(Verbosity::Quiet.level_filter(), log::LevelFilter::Off);
    }
}
