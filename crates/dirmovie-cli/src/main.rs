use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dirmovie::DirectorFile;

#[derive(Parser)]
#[command(name = "dirmovie", about = "Director movie container inspector")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a one-line summary of the container and its casts.
    Info {
        /// Path to a .dir/.dxr/.cst/.cxt file.
        file: PathBuf,
    },
    /// Dump the parsed chunk graph as JSON.
    Dump {
        /// Path to a .dir/.dxr/.cst/.cxt file.
        file: PathBuf,
        /// Write to a file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Info { file } => {
            let movie = open(&file)?;
            println!(
                "{}: codec {} ({:?} endian), version {}, {} slots",
                file.display(),
                movie.codec(),
                movie.endian(),
                movie.version(),
                movie.slots().len(),
            );
            for (_, cast) in movie.casts() {
                println!("  cast {:?}: {} members", cast.name, cast.members.len());
            }
        }
        Command::Dump { file, output } => {
            let movie = open(&file)?;
            let dump = serde_json::to_string_pretty(&movie.to_json())?;
            match output {
                Some(path) => fs::write(&path, dump)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{dump}"),
            }
        }
    }
    Ok(())
}

fn open(path: &PathBuf) -> Result<DirectorFile> {
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut movie =
        DirectorFile::read(data).with_context(|| format!("failed to parse {}", path.display()))?;
    movie
        .load()
        .with_context(|| format!("failed to load chunk graph from {}", path.display()))?;
    Ok(movie)
}
