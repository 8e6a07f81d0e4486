//! photolog-cli: command-line shell over the photolog client engine.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;
#[cfg(test)]
mod tests;

use clap::Parser;
use photolog::infra::telemetry;

use args::{Cli, Commands};
use client::{CliError, build_shell, settings_from_cli};
use handlers::{auth, gallery, posts, profile};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let settings = settings_from_cli(&cli)?;
    telemetry::init(&settings.logging)?;
    let shell = build_shell(&settings)?;

    match cli.command {
        Commands::Login {
            passphrase_file,
            passphrase_env,
            redirect,
        } => auth::login(&shell, passphrase_file, passphrase_env, redirect).await?,
        Commands::Logout => auth::logout(&shell)?,
        Commands::Status => auth::status(&shell),
        Commands::Posts(cmd) => posts::handle(&shell, cmd.action).await?,
        Commands::Profile(cmd) => profile::handle(&shell, cmd.action).await?,
        Commands::Gallery {
            tag,
            open,
            keys,
            select,
        } => {
            let input = gallery::GalleryInput {
                tag,
                open,
                keys,
                select,
            };
            gallery::browse(&shell, input).await?;
        }
    }

    Ok(())
}
