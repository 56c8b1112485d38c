use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use webpcon::{config, convert, output, revert, safety};

#[derive(Parser)]
#[command(name = "webpcon")]
#[command(version)]
#[command(about = "Convert a project's raster images to WebP, with backup and revert")]
#[command(long_about = "\
Convert a project's raster images to WebP, with backup and revert

Every JPEG, PNG, BMP, GIF and TIFF under PATH is moved into a backup tree and
replaced by a WebP file of the same name next to where it was:

  my-app/
  ├── .webpcon_backup/             # Originals, same relative layout
  │   └── src/assets/hero.png
  ├── src/assets/hero.webp         # Generated
  ├── node_modules/                # Never touched (also .git, dist, build)
  └── public/favicon.ico           # Never touched (app icons are skipped)

Run 'webpcon PATH revert' to put the originals back and delete the WebP files.
Any other second argument is ignored and PATH is converted.

Animated GIFs are converted as a single frame unless --enable-gif is given.

Tunables are read from an optional webpcon.toml in PATH:

  [convert]
  quality = 80        # 1-100

  [animation]
  enabled = false     # same as --enable-gif
  quality = 60        # 1-100, per frame

Set RUST_LOG=debug for diagnostic logging on stderr.")]
struct Cli {
    /// Project directory to process
    path: Option<PathBuf>,

    /// `revert` restores originals and deletes generated WebP files; anything
    /// else, or nothing, converts
    mode: Option<String>,

    /// Convert multi-frame GIFs to animated WebP (experimental)
    #[arg(long = "enable-gif", alias = "gif")]
    enable_gif: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(path) = cli.path else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    if !safety::is_safe_path(&path) {
        println!("Operation cancelled.");
        return Ok(());
    }

    match cli.mode.as_deref() {
        Some("revert") => {
            output::print_run_header(&path, true, false);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_revert_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = revert::revert(&path, Some(tx));
            let _ = printer.join();
            let summary = result?;
            output::print_revert_summary(&summary);
        }
        _ => {
            let settings = config::load_config(&path)?;
            let options = convert::ConvertOptions::from_settings(&settings, cli.enable_gif);
            tracing::debug!(?options, "convert options");
            output::print_run_header(&path, false, options.animated_gif);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_convert_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = convert::convert(&path, &options, Some(tx));
            let _ = printer.join();
            let summary = result?;
            output::print_convert_summary(&summary);
        }
    }

    Ok(())
}
