#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;
use std::time::Instant;

use photolog::application::editor::SaveOutcome;
use photolog::application::error::ClientError;
use photolog::application::profile::ProfileEditor;
use photolog::application::shell::Shell;
use photolog::domain::routes::PROFILE_EDIT_PATH;
use photolog::presentation::views::profile_editor;

use crate::args::ProfileCmd;
use crate::client::{CliError, enter};
use crate::io::{parse_link, read_upload};
use crate::print::{print_json, print_profile_editor};

pub async fn handle(shell: &Shell, cmd: ProfileCmd) -> Result<(), CliError> {
    match cmd {
        ProfileCmd::Show => show(shell).await,
        ProfileCmd::Edit {
            name,
            bio,
            add_links,
            remove_links,
        } => edit(shell, name, bio, add_links, remove_links).await,
        ProfileCmd::Avatar { file } => avatar(shell, file).await,
    }
}

async fn show(shell: &Shell) -> Result<(), CliError> {
    let editor = shell.profile_editor();
    editor.load().await?;
    let profile = editor.canonical().ok_or(ClientError::NotLoaded("profile"))?;
    print_json(&profile)
}

async fn open_editor(shell: &Shell) -> Result<ProfileEditor, CliError> {
    enter(shell, PROFILE_EDIT_PATH)?;
    let editor = shell.profile_editor();
    editor.load().await?;
    Ok(editor)
}

fn show_editor(editor: &ProfileEditor) -> Result<(), CliError> {
    let profile = editor.canonical().ok_or(ClientError::NotLoaded("profile"))?;
    let mirror = editor.mirror().ok_or(ClientError::NotLoaded("profile"))?;
    print_profile_editor(&profile_editor(
        &profile,
        &mirror,
        editor.is_saving(),
        editor.is_uploading(),
        editor.notice().text(Instant::now()),
    ));
    Ok(())
}

async fn edit(
    shell: &Shell,
    name: Option<String>,
    bio: Option<String>,
    add_links: Vec<String>,
    mut remove_links: Vec<usize>,
) -> Result<(), CliError> {
    let additions = add_links
        .iter()
        .map(|raw| parse_link(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let editor = open_editor(shell).await?;
    editor.edit(|mirror| {
        if let Some(name) = name {
            mirror.name = name;
        }
        if let Some(bio) = bio {
            mirror.bio = bio;
        }
    })?;

    // Highest index first so earlier removals do not shift later ones.
    remove_links.sort_unstable_by(|a, b| b.cmp(a));
    remove_links.dedup();
    for index in remove_links {
        if editor.remove_link(index)?.is_none() {
            return Err(CliError::InvalidInput(format!("no link at position {index}")));
        }
    }
    for (label, url) in &additions {
        editor.set_link_draft(label, url)?;
        editor.commit_link_draft()?;
    }

    if editor.save().await? == SaveOutcome::Suppressed {
        return Err(CliError::InvalidInput("a save is already running".into()));
    }
    show_editor(&editor)
}

async fn avatar(shell: &Shell, file: PathBuf) -> Result<(), CliError> {
    let upload = read_upload(&file).await?;
    let editor = open_editor(shell).await?;
    editor.upload_avatar(Some(upload)).await?;
    show_editor(&editor)
}
