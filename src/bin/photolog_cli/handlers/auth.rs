#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use photolog::application::auth::AuthState;
use photolog::application::shell::Shell;
use photolog::domain::routes::login_with_redirect;
use photolog::presentation::views::{login_form, nav_bar};

use crate::client::CliError;
use crate::io::read_secret;
use crate::print::print_nav;

pub async fn login(
    shell: &Shell,
    passphrase_file: Option<PathBuf>,
    passphrase_env: Option<String>,
    redirect: Option<String>,
) -> Result<(), CliError> {
    let passphrase = read_secret(passphrase_file, passphrase_env)?;
    if let Some(target) = redirect {
        shell.navigator().navigate(&login_with_redirect(&target));
    }

    let auth = shell.auth();
    match auth.submit(&passphrase).await? {
        AuthState::Authenticated => {
            println!("Logged in; continuing to {}", shell.navigator().current());
            Ok(())
        }
        other => {
            let message = login_form(&other)
                .error
                .unwrap_or_else(|| "login did not complete".to_string());
            Err(CliError::LoginFailed(message))
        }
    }
}

pub fn logout(shell: &Shell) -> Result<(), CliError> {
    shell.auth().logout()?;
    println!("Logged out");
    Ok(())
}

pub fn status(shell: &Shell) {
    let logged_in = shell.session().is_logged_in();
    println!("{}", if logged_in { "Logged in" } else { "Logged out" });
    print_nav(&nav_bar(logged_in));
}
