use clap::{Parser, Subcommand};
use pipeline_meta::config::{self, Overrides, ToolConfig};
use pipeline_meta::{image_metadata, media_index, output};
use std::path::PathBuf;

/// Shared flags for commands that scan the public asset tree.
#[derive(clap::Args, Clone)]
struct MediaArgs {
    /// Root holding images/ and videos/ [default: public]
    #[arg(long)]
    public_dir: Option<PathBuf>,

    /// Directory receiving images.json and videos.json [default: public/_media]
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl MediaArgs {
    fn overrides(self) -> Overrides {
        Overrides {
            public_dir: self.public_dir,
            media_output_dir: self.output_dir,
            ..Overrides::default()
        }
    }
}

#[derive(Parser)]
#[command(name = "pipeline-meta")]
#[command(about = "Metadata generators for the build pipeline")]
#[command(long_about = "\
Metadata generators for the build pipeline

  gen          Describe a published container image:
               name + digest + newline-separated tags
               → image-metadata-<name>.json

  media-index  Index website media:
               public/images/**  → public/_media/images.json
               public/videos/**  → public/_media/videos.json

A category whose directory is missing or has no matching files is skipped
and its previous index is kept.

Settings can be placed in ./pipeline-meta.toml; run 'pipeline-meta gen-config'
for a documented template. Command-line flags override the file.")]
#[command(version)]
struct Cli {
    /// Config file [default: ./pipeline-meta.toml when present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write image-metadata-<name>.json for a published container image
    Gen {
        /// Image name, e.g. `xcontrol`
        name: String,
        /// Image digest, e.g. `sha256:…`
        digest: String,
        /// Tags, one per line, as a single argument
        tags: String,
        /// Further positional arguments are accepted and ignored
        #[arg(hide = true)]
        extra: Vec<String>,
        /// Registry namespace [default: ghcr.io/cloud-neutral-toolkit]
        #[arg(long)]
        registry: Option<String>,
        /// Directory to write the metadata file into [default: .]
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Scan public media and write sorted JSON indices
    MediaIndex(MediaArgs),
    /// Show what media-index would write, without writing
    Check(MediaArgs),
    /// Print a stock pipeline-meta.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Usage errors exit 1 so pipeline steps fail the same way for any misuse.
        Err(e) if e.use_stderr() => {
            e.print()?;
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    match cli.command {
        Command::Gen {
            name,
            digest,
            tags,
            registry,
            out_dir,
            ..
        } => {
            let config = load(
                cli.config,
                Overrides {
                    registry,
                    image_output_dir: out_dir,
                    ..Overrides::default()
                },
            )?;
            let tags = image_metadata::parse_tags(&tags);
            let metadata =
                image_metadata::ImageMetadata::new(&name, &digest, tags, &config.image.registry);
            let path = image_metadata::write_metadata(&metadata, &config.image.output_dir)?;
            // Keep the bare file name when writing into the working directory.
            let shown = path.strip_prefix(".").unwrap_or(&path);
            output::print_metadata_written(shown);
        }
        Command::MediaIndex(args) => {
            let config = load(cli.config, args.overrides())?;
            media_index::generate(
                &config.media.public_dir,
                &config.media.output_dir,
                output::print_index_event,
            )?;
        }
        Command::Check(args) => {
            let config = load(cli.config, args.overrides())?;
            for category in media_index::MediaCategory::ALL {
                let outcome = media_index::scan_category(&config.media.public_dir, category)?;
                output::print_check_output(category, &outcome, &config.media.output_dir);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Resolve the effective config: the config file (or defaults), then flags.
fn load(
    explicit: Option<PathBuf>,
    overrides: Overrides,
) -> Result<ToolConfig, config::ConfigError> {
    let cwd = std::env::current_dir()?;
    let file_config = config::load_config(&cwd, explicit.as_deref())?;
    overrides.apply(file_config)
}
