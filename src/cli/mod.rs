// Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "portfolio")]
#[command(about = "Portfolio site - pages, blog, projects and GitHub repositories", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// List recently updated repositories
    Repos {
        /// Account to list (defaults to GITHUB_OWNER)
        #[arg(short, long)]
        owner: Option<String>,

        /// Maximum number of repositories
        #[arg(short, long)]
        limit: Option<u8>,
    },

    /// Show one repository
    Repo {
        /// Repository name
        name: String,

        /// Account owning the repository (defaults to GITHUB_OWNER)
        #[arg(short, long)]
        owner: Option<String>,

        /// Also print the README
        #[arg(long)]
        readme: bool,
    },

    /// Filter and sort the blog or the project showcase
    Search {
        /// `blog` or `projects`
        collection: String,

        /// Free-text search term
        #[arg(default_value = "")]
        query: String,

        /// Category, `All` for every category
        #[arg(short, long)]
        category: Option<String>,

        /// date-desc, date-asc, popularity or name
        #[arg(short, long)]
        sort: Option<String>,
    },

    /// Load and validate site content
    CheckContent {
        /// Directory holding the content files (defaults to the embedded copy)
        #[arg(short, long, env = "CONTENT_DIR")]
        dir: Option<PathBuf>,
    },
}
