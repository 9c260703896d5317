use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use clap::{Parser, Subcommand};
use mdsite::types::ContentIndex;
use mdsite::{config, generate, output, scan};

/// Shared toggles for commands that generate derived indices.
#[derive(clap::Args, Clone)]
struct IndexArgs {
    /// Skip the navigation index
    #[arg(long)]
    skip_navigation: bool,

    /// Skip the metadata index
    #[arg(long)]
    skip_metadata: bool,

    /// Skip copying content files into the output tree
    #[arg(long)]
    skip_copy: bool,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "mdsite")]
#[command(about = "Content indexing pipeline for markdown sites")]
#[command(long_about = "\
Content indexing pipeline for markdown sites

Your filesystem is the data source. Category folders hold markdown files
with YAML frontmatter; filename prefixes carry dates and ordering.

Content structure:

  content/
  ├── site.toml                    # Site config (optional)
  ├── blog/
  │   └── 2024-01-15-launch.md     # Date prefix = publish order (newest first)
  ├── docs/
  │   ├── 01-getting-started.md    # Number prefix = menu order
  │   └── 02-concepts/             # Folder-based page with colocated assets
  │       ├── index.md
  │       └── diagram.png
  ├── projects/  articles/  features/
  └── guides/                      # Dynamic section (declared in site.toml)

Generated artifacts (consumed by the client runtime):
  content/index.json               # File lists per category
  navigation-index.json            # Menu items
  content-metadata.json            # Lightweight per-entry records

Run 'mdsite gen-config' to print a documented site.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the content directory into a content index
    Scan,
    /// Generate all JSON indices (and copy content) into the output directory
    Index(IndexArgs),
    /// Run the full pipeline: scan → index
    Build(IndexArgs),
    /// Validate content without writing anything
    Check,
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let config = config::load_config(&cli.source)?;
            let index = scan::scan(&cli.source, &config)?;
            generate::write_content_index(&index, &cli.output)?;
            output::print_scan_output(&index);
        }
        Command::Index(args) => {
            let config = config::load_config(&cli.source)?;
            let index = scan::scan(&cli.source, &config)?;
            run_generators(&cli.source, &cli.output, &config, &index, &args)?;
        }
        Command::Build(args) => {
            let config = config::load_config(&cli.source)?;

            println!("==> Stage 1: Scanning {}", cli.source.display());
            let index = scan::scan(&cli.source, &config)?;
            output::print_scan_output(&index);

            println!("==> Stage 2: Generating indices");
            run_generators(&cli.source, &cli.output, &config, &index, &args)?;
        }
        Command::Check => {
            let config = config::load_config(&cli.source)?;
            let index = scan::scan(&cli.source, &config)?;
            let report = generate::check(&cli.source, &index, &config.parse_options());
            output::print_check_output(&report);
            if !report.errors.is_empty() {
                std::process::exit(1);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_text());
        }
    }

    Ok(())
}

/// Run the generation steps with per-step fault isolation: a failing step
/// logs and the remaining steps still run.
fn run_generators(
    source: &Path,
    out: &Path,
    config: &config::SiteConfig,
    index: &ContentIndex,
    args: &IndexArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let cancel = AtomicBool::new(false);

    generate::write_content_index(index, out)?;

    let mut nav_items = 0;
    if !args.skip_navigation {
        match generate::generate_navigation_index(source, index, &cancel) {
            Ok(nav) => {
                nav_items = nav.projects.len()
                    + nav.articles.len()
                    + nav.docs.len()
                    + nav.sections.values().map(Vec::len).sum::<usize>();
                generate::write_navigation_index(&nav, out)?;
            }
            Err(err) => log::error!("navigation index generation failed: {err}"),
        }
    }

    let mut metadata_records = 0;
    if !args.skip_metadata {
        match generate::generate_metadata_index(
            source,
            index,
            config.content.words_per_minute,
            &cancel,
        ) {
            Ok(meta) => {
                metadata_records = index
                    .categories()
                    .iter()
                    .map(|c| meta.records(c).len())
                    .sum();
                generate::write_metadata_index(&meta, out)?;
            }
            Err(err) => log::error!("metadata index generation failed: {err}"),
        }
    }

    let mut copied = 0;
    if !args.skip_copy {
        match generate::copy_content(source, index, out, &cancel) {
            Ok(count) => copied = count,
            Err(err) => log::error!("content copy failed: {err}"),
        }
    }

    output::print_index_output(nav_items, metadata_records, copied);
    Ok(())
}
