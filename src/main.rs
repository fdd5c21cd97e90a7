//! CLI entry point for fshash

use std::io::{self, IsTerminal};
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::info;

use fstree_hash::logging::init_logging;
use fstree_hash::output::DEFAULT_TEMPLATE;
use fstree_hash::{
    DEFAULT_ALGORITHM, HashEngine, LocalFs, OutputConfig, StreamingFormatter, TreeRenderer,
    TreeWalker, WalkerConfig,
};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "fshash")]
#[command(about = "Content-addressed hashes and tree listings of directory trees")]
#[command(version)]
struct Args {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

/// Arguments shared by every subcommand.
#[derive(clap::Args, Debug)]
struct CommonArgs {
    /// File or directory to process
    #[arg(default_value = ".")]
    path: String,

    /// Hash algorithm: sha224, sha256, sha384, sha512, sha512_224, sha512_256, blake3
    #[arg(short = 'A', long = "algo", default_value = DEFAULT_ALGORITHM)]
    algo: String,

    /// Skip paths matching this shell pattern (can be used multiple times).
    /// `*` also matches `/`, so `*/x` needs a parent directory: use both
    /// `-e '.*' -e '*/.*'` to skip hidden entries at every level.
    #[arg(short = 'e', long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Only keep paths matching one of these shell patterns (can be used multiple times)
    #[arg(short = 'i', long = "include", value_name = "PATTERN")]
    include: Vec<String>,
}

impl CommonArgs {
    fn walker_config(&self, dirs_first: bool) -> WalkerConfig {
        WalkerConfig {
            excludes: self.exclude.clone(),
            includes: self.include.clone(),
            dirs_first,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the hash of PATH as "<type> <hash>"
    Hash {
        #[command(flatten)]
        common: CommonArgs,

        /// Print the lines a directory's hash is computed from. Hashing
        /// always uses \n line endings, whatever the platform.
        #[arg(short = 'L', long = "ls")]
        ls: bool,
    },

    /// Print the directory structure, like tree(1)
    Tree {
        #[command(flatten)]
        common: CommonArgs,

        /// Descend only N levels deep (display only, hashes are unaffected)
        #[arg(short = 'd', long = "max-depth", value_name = "N")]
        max_depth: Option<usize>,

        /// Line format. Fields: {name} {path} {type} {size} {bsize} {hash},
        /// e.g. "{type:.1} {hash:.6} {size:>10} {name}"
        #[arg(short = 'f', long = "format", default_value = DEFAULT_TEMPLATE)]
        format: String,

        /// Do not print the directory and file counts
        #[arg(long = "no-stats")]
        no_stats: bool,

        /// List files and directories together, sorted by name
        #[arg(long = "files-first")]
        files_first: bool,

        /// Control color output: auto, always, never
        #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
        color: ColorMode,
    },
}

/// Failures reported by the binary.
#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Core(#[from] fstree_hash::Error),

    #[error("error writing output: {0}")]
    Output(#[from] io::Error),
}

fn run_hash(common: &CommonArgs, ls: bool) -> Result<(), CliError> {
    let backend = LocalFs::new();
    let walker = TreeWalker::new(&backend, &common.walker_config(true));
    let mut engine = HashEngine::new(&walker, &common.algo)?;
    let mut out = StreamingFormatter::new(false);

    if ls {
        for line in engine.listing(&common.path)? {
            out.write_line(&line)?;
        }
    } else {
        let line = engine.path_hash(&common.path)?;
        out.write_line(&line)?;
    }
    info!("hashed {} paths", engine.cache().len());
    out.flush()?;
    Ok(())
}

fn run_tree(
    common: &CommonArgs,
    output_config: OutputConfig,
    dirs_first: bool,
) -> Result<(), CliError> {
    let backend = LocalFs::new();
    let use_color = output_config.use_color;
    let mut renderer = TreeRenderer::new(
        &backend,
        &common.walker_config(dirs_first),
        output_config,
        &common.algo,
    )?;
    let mut out = StreamingFormatter::new(use_color);

    let mut lines = renderer.lines(&common.path);
    for line in lines.by_ref() {
        out.write_tree_line(&line?)?;
    }
    info!("{}", lines.stats());
    out.flush()?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let result = match &args.command {
        Command::Hash { common, ls } => run_hash(common, *ls),
        Command::Tree {
            common,
            max_depth,
            format,
            no_stats,
            files_first,
            color,
        } => {
            let output_config = OutputConfig {
                template: format.clone(),
                max_depth: *max_depth,
                print_stats: !no_stats,
                use_color: should_use_color(*color),
            };
            run_tree(common, output_config, !files_first)
        }
    };

    if let Err(e) = result {
        eprintln!("fshash: {}", e);
        process::exit(1);
    }
}
