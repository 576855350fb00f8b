use std::io::{stdin, stdout, Write};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, CombinedLogger, TerminalMode, TermLogger};
use cli::{Cli, CliSubCommand};
use post_install::{run_post_install, SystemRunner};
use resources::ResourceManifest;

mod cli;
mod post_install;
mod resources;
pub mod fs_utils;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Manifest text owns stdout for resource-list, so every log line goes to stderr there.
    let terminal_mode = match cli.sub_command {
        CliSubCommand::ResourceList { .. } => TerminalMode::Stderr,
        _ => TerminalMode::Mixed,
    };

    CombinedLogger::init(
        vec![
            TermLogger::new(LevelFilter::from(cli.rust_log), simplelog::Config::default(), terminal_mode, ColorChoice::Auto)
        ]
    )?;

    match cli.sub_command {
        CliSubCommand::PostInstall { datadir, destdir } => {
            run_post_install(&datadir, destdir.as_deref(), &mut SystemRunner);
        }
        CliSubCommand::ResourceList { prefix } => {
            let manifest = ResourceManifest::builder(prefix)
                .with_paths_from_reader(stdin().lock())?
                .finish();

            let mut out = stdout().lock();
            manifest.write_to(&mut out)?;
            out.flush()?;
        }
        CliSubCommand::ResourceTree { srcdir, output, prefix } => {
            let manifest = ResourceManifest::builder(prefix)
                .with_files_from_tree(&srcdir)?
                .finish();

            manifest.save_to(&output)?;
            info!("Wrote {0} resources to {1}", manifest.entries().len(), output.display());
        }
    }

    Ok(())
}
