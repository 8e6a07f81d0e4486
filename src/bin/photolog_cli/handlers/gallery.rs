#![deny(clippy::all, clippy::pedantic)]

use photolog::application::shell::Shell;
use photolog::domain::gallery::Key;
use photolog::presentation::views::public_page;

use crate::client::CliError;
use crate::print::print_public_page;

pub struct GalleryInput {
    pub tag: Option<String>,
    pub open: Option<i64>,
    pub keys: Vec<String>,
    pub select: Option<usize>,
}

pub async fn browse(shell: &Shell, input: GalleryInput) -> Result<(), CliError> {
    let view = shell.public_view();
    view.init().await?;
    if let Some(tag) = input.tag {
        view.filter_by_tag(&tag).await?;
    }

    if let Some(id) = input.open
        && !view.open_post_by_id(id)
    {
        return Err(CliError::PostNotFound(id));
    }
    for name in &input.keys {
        shell.keyboard().dispatch(Key::from_name(name));
    }
    if let Some(index) = input.select
        && !view.select_image(index)
    {
        return Err(CliError::InvalidInput(format!(
            "no image at position {index}"
        )));
    }

    let snapshot = view.snapshot();
    view.dispose();
    print_public_page(&public_page(&snapshot));
    Ok(())
}
