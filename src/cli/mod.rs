// Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "recommender")]
#[command(about = "Recipe recommender - find dishes by ingredients or name", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the recommendation server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Resolve a query against the local catalog
    Ask {
        /// Ingredients, a dish name or small talk
        query: String,

        /// Return only the best match, subject to the minimum score
        #[arg(long)]
        single: bool,

        /// Number of ranked results
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Show catalog statistics
    Stats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from(["recommender", "ask", "onion rice", "--single"]).unwrap();
        match cli.command {
            Commands::Ask {
                query,
                single,
                top_k,
            } => {
                assert_eq!(query, "onion rice");
                assert!(single);
                assert_eq!(top_k, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["recommender", "ask", "dal", "-k", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Ask { top_k: Some(3), .. }));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
