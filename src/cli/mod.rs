// Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "recipe-search")]
#[command(about = "Recipe search - keyword and similarity search over a recipe database", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Run database migrations
    Migrate,

    /// Search recipes, e.g. `search 鶏肉 ヘルシー`
    Search {
        /// Search terms; every term must match
        #[arg(required = true)]
        terms: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Query a running server instead of the local database (defaults to EXTERNAL_URL)
        #[arg(long)]
        server: Option<String>,
    },

    /// List recipes similar to a recipe
    Similar {
        /// Recipe ID
        recipe_id: i64,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Query a running server instead of the local database (defaults to EXTERNAL_URL)
        #[arg(long)]
        server: Option<String>,
    },

    /// Show synonyms containing a term and the ingredients they link to
    Synonyms {
        /// Term to look up
        term: String,

        /// Maximum number of links to show
        #[arg(short, long, default_value_t = 20)]
        limit: i64,
    },
}
