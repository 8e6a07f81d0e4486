#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;
use std::time::Instant;

use photolog::application::api::{RequestOptions, decode_json};
use photolog::application::editor::{LoadOutcome, SaveOutcome};
use photolog::application::error::ClientError;
use photolog::application::posts::PostEditor;
use photolog::application::shell::Shell;
use photolog::domain::routes::{FEED_PATH, post_edit_path};
use photolog::presentation::views::{feed_page, post_editor};
use photolog_api_types::Post;

use crate::args::{DirectionArg, PostsCmd};
use crate::client::{CliError, enter};
use crate::io::read_upload;
use crate::print::{print_feed, print_json, print_post_editor};

pub async fn handle(shell: &Shell, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List { tag } => list(shell, tag).await,
        PostsCmd::Feed => feed(shell).await,
        PostsCmd::Create => create(shell).await,
        PostsCmd::Delete { id } => delete(shell, id).await,
        PostsCmd::Edit {
            id,
            caption,
            location,
            published,
            add_tags,
            remove_tags,
        } => {
            let input = PostEditInput {
                caption,
                location,
                published,
                add_tags,
                remove_tags,
            };
            edit(shell, id, input).await
        }
        PostsCmd::Upload { id, files } => upload(shell, id, files).await,
        PostsCmd::MoveImage {
            id,
            image_id,
            direction,
        } => move_image(shell, id, image_id, direction).await,
        PostsCmd::DeleteImage { id, image_id } => delete_image(shell, id, image_id).await,
    }
}

struct PostEditInput {
    caption: Option<String>,
    location: Option<String>,
    published: Option<bool>,
    add_tags: Vec<String>,
    remove_tags: Vec<String>,
}

async fn list(shell: &Shell, tag: Option<String>) -> Result<(), CliError> {
    let query: Vec<(&str, String)> = tag.into_iter().map(|tag| ("tag", tag)).collect();
    let response = shell
        .api()
        .request("/posts", RequestOptions::get().query(query))
        .await?;
    let posts: Vec<Post> = decode_json(response, "post list").await?;
    print_json(&posts)
}

async fn feed(shell: &Shell) -> Result<(), CliError> {
    enter(shell, FEED_PATH)?;
    let feed = shell.feed();
    feed.load().await?;
    print_feed(&feed_page(&feed.posts(), feed.is_creating()));
    Ok(())
}

async fn create(shell: &Shell) -> Result<(), CliError> {
    enter(shell, FEED_PATH)?;
    match shell.feed().create_post().await? {
        Some(post) => print_json(&post),
        None => Err(CliError::InvalidInput("a create is already running".into())),
    }
}

async fn delete(shell: &Shell, id: i64) -> Result<(), CliError> {
    enter(shell, FEED_PATH)?;
    shell.feed().delete_post(id).await?;
    println!("Deleted post {id}");
    Ok(())
}

/// Opens the editor for `id` the way the shell would: guard, then load.
async fn open_editor(shell: &Shell, id: i64) -> Result<PostEditor, CliError> {
    enter(shell, &post_edit_path(id))?;
    let editor = shell.post_editor(id);
    match editor.load().await? {
        LoadOutcome::Loaded => Ok(editor),
        LoadOutcome::Redirected => Err(CliError::PostNotFound(id)),
    }
}

fn show_editor(editor: &PostEditor) -> Result<(), CliError> {
    let post = editor.canonical().ok_or(ClientError::NotLoaded("post"))?;
    let mirror = editor.mirror().ok_or(ClientError::NotLoaded("post"))?;
    let notice = editor.notice().text(Instant::now());
    print_post_editor(&post_editor(
        &post,
        &mirror,
        editor.is_saving(),
        editor.is_uploading(),
        notice,
    ));
    Ok(())
}

async fn edit(shell: &Shell, id: i64, input: PostEditInput) -> Result<(), CliError> {
    let editor = open_editor(shell, id).await?;
    editor.edit(|mirror| {
        if let Some(caption) = input.caption {
            mirror.caption = caption;
        }
        if let Some(location) = input.location {
            mirror.location = location;
        }
        if let Some(published) = input.published {
            mirror.published = published;
        }
    })?;
    for name in &input.remove_tags {
        editor.remove_tag(name)?;
    }
    for raw in &input.add_tags {
        editor.edit(|mirror| mirror.tag_input.clone_from(raw))?;
        editor.commit_tag_input()?;
    }

    if editor.save().await? == SaveOutcome::Suppressed {
        return Err(CliError::InvalidInput("a save is already running".into()));
    }
    show_editor(&editor)
}

async fn upload(shell: &Shell, id: i64, files: Vec<PathBuf>) -> Result<(), CliError> {
    let editor = open_editor(shell, id).await?;
    let mut uploads = Vec::with_capacity(files.len());
    for path in &files {
        uploads.push(read_upload(path).await?);
    }
    editor.upload_images(uploads).await?;
    show_editor(&editor)
}

async fn move_image(
    shell: &Shell,
    id: i64,
    image_id: i64,
    direction: DirectionArg,
) -> Result<(), CliError> {
    let editor = open_editor(shell, id).await?;
    if !editor.move_image(image_id, direction.into()).await? {
        return Err(CliError::InvalidInput(format!(
            "image {image_id} cannot move {direction:?}"
        )));
    }
    show_editor(&editor)
}

async fn delete_image(shell: &Shell, id: i64, image_id: i64) -> Result<(), CliError> {
    let editor = open_editor(shell, id).await?;
    editor.delete_image(image_id).await?;
    show_editor(&editor)
}
