use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "guarani_rag",
    about = "Guaraní grammar assistant: RAG prompt construction over OpenRouter",
    version
)]
pub struct Cli {
    /// Defaults to `serve` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Start the HTTP API
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Build the vector index from a directory of .txt/.md documents
    Index {
        /// Directory with the reference documents
        #[arg(long)]
        docs: PathBuf,

        /// Output directory for the index
        #[arg(long)]
        out: PathBuf,

        /// Target chunk size, in characters
        #[arg(long, default_value_t = 800)]
        chunk_size: usize,

        /// Fraction of a chunk repeated at the start of the next one
        #[arg(long, default_value_t = 0.1)]
        overlap: f32,

        /// Embedding dimension
        #[arg(long, default_value_t = 256)]
        dimension: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["guarani_rag"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_serve_port() {
        let cli = Cli::try_parse_from(["guarani_rag", "serve", "--port", "9000"]).unwrap();
        assert_eq!(cli.command, Some(Command::Serve { port: Some(9000) }));
    }

    #[test]
    fn test_index_defaults() {
        let cli =
            Cli::try_parse_from(["guarani_rag", "index", "--docs", "docs", "--out", "idx"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Index {
                docs: PathBuf::from("docs"),
                out: PathBuf::from("idx"),
                chunk_size: 800,
                overlap: 0.1,
                dimension: 256,
            })
        );
    }

    #[test]
    fn test_index_requires_paths() {
        assert!(Cli::try_parse_from(["guarani_rag", "index", "--docs", "docs"]).is_err());
    }
}
