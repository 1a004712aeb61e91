//! CLI entry point for inkpost

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "inkpost")]
#[command(version)]
#[command(about = "A markdown blog content engine", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Category slug (directory) for the post
        #[arg(short = 'C', long)]
        category: String,

        /// Slug (derived from the title when omitted)
        #[arg(short, long)]
        slug: Option<String>,

        /// Tag, may be repeated
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Short description
        #[arg(long)]
        description: Option<String>,
    },

    /// Create a new, empty category
    NewCategory {
        /// Display name of the category
        name: String,

        /// Slug (derived from the name when omitted)
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// List site content
    List {
        /// Type of content to list (post, tag, category)
        #[arg(default_value = "post")]
        r#type: String,

        /// Only posts in this category
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Only posts with this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Show a post with its neighbours and rendered HTML
    Show {
        slug: String,
    },

    /// Print the table of contents of a post
    Toc {
        slug: String,
    },

    /// Search posts by title, description, content and tags
    Search {
        query: String,
    },

    /// Generate feed.xml, sitemap.xml and search.json
    #[command(alias = "g")]
    Generate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "inkpost=debug,info"
    } else {
        "inkpost=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            inkpost::commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::New {
            title,
            category,
            slug,
            tags,
            description,
        } => {
            let blog = inkpost::Blog::new(&base_dir)?;
            inkpost::commands::new::create_post(
                &blog,
                &title,
                &category,
                slug.as_deref(),
                &tags,
                description.as_deref(),
            )?;
        }

        Commands::NewCategory { name, slug } => {
            let blog = inkpost::Blog::new(&base_dir)?;
            inkpost::commands::new::create_category(&blog, &name, slug.as_deref())?;
        }

        Commands::List {
            r#type,
            category,
            tag,
        } => {
            let blog = inkpost::Blog::new(&base_dir)?;
            if category.is_some() || tag.is_some() {
                inkpost::commands::list::filtered(&blog, category.as_deref(), tag.as_deref())?;
            } else {
                inkpost::commands::list::run(&blog, &r#type)?;
            }
        }

        Commands::Show { slug } => {
            let blog = inkpost::Blog::new(&base_dir)?;
            inkpost::commands::show::run(&blog, &slug)?;
        }

        Commands::Toc { slug } => {
            let blog = inkpost::Blog::new(&base_dir)?;
            inkpost::commands::show::toc(&blog, &slug)?;
        }

        Commands::Search { query } => {
            let blog = inkpost::Blog::new(&base_dir)?;
            inkpost::commands::list::search(&blog, &query)?;
        }

        Commands::Generate => {
            let blog = inkpost::Blog::new(&base_dir)?;
            tracing::info!("Generating feed, sitemap and search index...");
            inkpost::commands::generate::run(&blog)?;
            println!("Generated successfully!");
        }
    }

    Ok(())
}
