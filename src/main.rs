use clap::{Parser, Subcommand};
use serde_json::Value;
use simple_blog::collections::Collections;
use simple_blog::{config, filters, generate, output, scan};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "simple-blog")]
#[command(about = "Static site generator for a markdown blog")]
#[command(long_about = "\
Static site generator for a markdown blog

Markdown posts with TOML front matter become a static site: an index of
published posts, one page per post with related posts, a tag index, one page
per tag, and an RSS feed.

Source structure:

  src/
  ├── config.toml                      # Site config (optional)
  ├── robots.txt                       # Passthrough file
  ├── assets/                          # Passthrough directories
  │   ├── images/
  │   ├── js/
  │   └── styles/
  └── posts/
      ├── 2024-01-05-hello-world.md    # Date prefix = fallback date
      └── error-handling.md

Front matter (optional, fenced by +++):

  +++
  title = \"Error Handling\"
  date = 2024-02-10
  tags = [\"rust\", \"errors\"]
  draft = false
  description = \"Result, ? and thiserror\"
  +++

Resolution (first available wins):
  Date:  front matter → filename prefix → file modification time
  Title: front matter → first '# heading' → slug

Run 'simple-blog gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Source directory
    #[arg(long, default_value = "src", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "_site", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site: scan → derive → generate
    Build {
        /// Production build: minify HTML (also enabled by SIMPLE_BLOG_ENV=production)
        #[arg(long)]
        production: bool,
    },
    /// Validate the source directory without building
    Check,
    /// Show the related-post ranking for one post
    Related {
        /// Slug of the post
        slug: String,
        /// Number of related posts (defaults to collections.related_limit)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build { production } => {
            let production = production
                || config::is_production_env(std::env::var(config::ENV_VAR).ok().as_deref());

            println!("==> Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);

            init_thread_pool(&manifest.config.processing);
            let minify = production || manifest.config.build.minify;
            println!("==> Generating HTML → {}", cli.output.display());
            let report = generate::generate(&manifest, &cli.source, &cli.output, minify)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            println!("==> Content is valid");
        }
        Command::Related { slug, limit } => {
            let manifest = scan::scan(&cli.source)?;
            let collections = Collections::derive(&manifest.posts);
            let current =
                filters::find_by(&collections.published, "slug", &Value::from(slug.as_str()))
                    .ok_or_else(|| format!("no published post with slug '{slug}'"))?;
            let limit = limit.unwrap_or(manifest.config.collections.related_limit);
            let related = collections.related_to(current, limit);
            output::print_related_output(current, &related);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
