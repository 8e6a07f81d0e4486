//! Command-line surface for `photolog-cli`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use photolog::config::ConfigOverrides;
use photolog::domain::collections::MoveDirection;

#[derive(Parser, Debug)]
#[command(name = "photolog-cli", version, about = "Photolog owner and gallery CLI", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Exchange the owner passphrase for a session token
    Login {
        /// File holding the passphrase (takes precedence over env)
        #[arg(long, env = "PHOTOLOG_PASSPHRASE_FILE")]
        passphrase_file: Option<PathBuf>,
        /// Passphrase from env (no CLI flag, to keep it out of shell history)
        #[arg(hide = true, env = "PHOTOLOG_PASSPHRASE")]
        passphrase_env: Option<String>,
        /// Location to continue to after login
        #[arg(long)]
        redirect: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// Show session state and the navigation available to it
    Status,
    /// Post management
    Posts(PostsArgs),
    /// Profile management
    Profile(ProfileArgs),
    /// Browse the public page and its gallery
    Gallery {
        /// Show only posts carrying this tag
        #[arg(long)]
        tag: Option<String>,
        /// Open the modal on this post id
        #[arg(long)]
        open: Option<i64>,
        /// Key presses delivered while the page is mounted (`ArrowLeft`, `ArrowRight`, `Escape`)
        #[arg(long = "key")]
        keys: Vec<String>,
        /// Jump the carousel to this position
        #[arg(long)]
        select: Option<usize>,
    },
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// List published posts, optionally by tag
    List {
        #[arg(long)]
        tag: Option<String>,
    },
    /// List every post owned by the session
    Feed,
    /// Create an empty draft
    Create,
    /// Delete a post
    Delete { id: i64 },
    /// Edit caption, location, visibility, and tags, then save
    Edit {
        id: i64,
        #[arg(long)]
        caption: Option<String>,
        /// Empty string clears the location
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        published: Option<bool>,
        #[arg(long = "add-tag")]
        add_tags: Vec<String>,
        #[arg(long = "remove-tag")]
        remove_tags: Vec<String>,
    },
    /// Upload images to a post
    Upload {
        id: i64,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Move an image one slot
    MoveImage {
        id: i64,
        image_id: i64,
        #[arg(long, value_enum)]
        direction: DirectionArg,
    },
    /// Delete an image from a post
    DeleteImage { id: i64, image_id: i64 },
}

#[derive(Parser, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileCmd,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCmd {
    /// Show the profile
    Show,
    /// Edit name, bio, and links, then save
    Edit {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        /// `LABEL=URL`
        #[arg(long = "add-link")]
        add_links: Vec<String>,
        /// Position of the link to remove, 0-based. Applied before additions.
        #[arg(long = "remove-link")]
        remove_links: Vec<usize>,
    },
    /// Replace the avatar
    Avatar { file: PathBuf },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum DirectionArg {
    Left,
    Right,
}

impl From<DirectionArg> for MoveDirection {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Left => MoveDirection::Left,
            DirectionArg::Right => MoveDirection::Right,
        }
    }
}
