#![deny(clippy::all, clippy::pedantic)]

use photolog::presentation::views::{
    FeedPageView, ModalView, NavBarView, PostEditorView, ProfileEditorView, PublicPageView,
};
use serde::Serialize;

use crate::client::CliError;

pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value).map_err(|e| CliError::Output(e.to_string()))?;
    println!("{out}");
    Ok(())
}

pub fn print_nav(view: &NavBarView) {
    let links: Vec<String> = view
        .links
        .iter()
        .map(|link| format!("{} ({})", link.label, link.href))
        .collect();
    println!("{}: {}", view.brand.label, links.join(" | "));
    if view.show_logout {
        println!("Log out available");
    }
}

pub fn print_public_page(view: &PublicPageView) {
    if let Some(header) = &view.header {
        println!("{}", header.name);
        if !header.bio.is_empty() {
            println!("{}", header.bio);
        }
        for link in &header.links {
            println!("  {} <{}>", link.label, link.href);
        }
    }
    if let Some(label) = &view.filter_label {
        println!("Filtering by tag: {label}");
    }
    if let Some(message) = view.empty_message {
        println!("{message}");
    }
    for thumb in &view.thumbnails {
        let badge = if thumb.multi_image { " [+]" } else { "" };
        println!(
            "#{} {}{badge}",
            thumb.post_id,
            thumb.image.as_deref().unwrap_or("(no image)")
        );
    }
    if let Some(modal) = &view.modal {
        print_modal(modal);
    }
}

fn print_modal(view: &ModalView) {
    println!("--- post ---");
    match (&view.image, view.empty_message) {
        (Some(image), _) => println!("image: {image}"),
        (None, Some(message)) => println!("{message}"),
        (None, None) => {}
    }
    if view.show_controls {
        let dots: String = view
            .dots
            .iter()
            .map(|dot| if dot.active { '●' } else { '○' })
            .collect();
        println!("{dots}");
    }
    if !view.date.is_empty() {
        println!("{}", view.date);
    }
    if let Some(location) = &view.location {
        println!("at {location}");
    }
    if !view.caption.is_empty() {
        println!("{}", view.caption);
    }
    let tags: Vec<&str> = view.tags.iter().map(|tag| tag.label.as_str()).collect();
    if !tags.is_empty() {
        println!("{}", tags.join(" "));
    }
}

pub fn print_feed(view: &FeedPageView) {
    if let Some(message) = view.empty_message {
        println!("{message}");
    }
    for card in &view.cards {
        let date = if card.date.is_empty() {
            String::new()
        } else {
            format!("{} · ", card.date)
        };
        println!(
            "#{} {} ({date}{} · {}) {}",
            card.post_id, card.caption, card.image_count, card.status, card.edit_href
        );
    }
}

pub fn print_post_editor(view: &PostEditorView) {
    println!("{}", view.title);
    println!("caption: {}", view.caption);
    println!("location: {}", view.location);
    println!("published: {}", view.published);
    let tags: Vec<&str> = view.tags.iter().map(|tag| tag.label.as_str()).collect();
    println!("tags: {}", tags.join(" "));
    if let Some(message) = view.empty_images {
        println!("{message}");
    }
    for slot in &view.images {
        let left = if slot.can_move_left { "<" } else { " " };
        let right = if slot.can_move_right { ">" } else { " " };
        println!(
            "{left} {}. image {} {} {right}",
            slot.order_label,
            slot.image_id,
            slot.src.as_deref().unwrap_or("")
        );
    }
    if let Some(notice) = view.notice {
        println!("{notice}");
    }
}

pub fn print_profile_editor(view: &ProfileEditorView) {
    println!("avatar: {}", view.avatar.as_deref().unwrap_or("(none)"));
    println!("name: {}", view.name);
    println!("bio: {}", view.bio);
    for (index, link) in view.links.iter().enumerate() {
        println!("  [{index}] {} <{}>", link.label, link.href);
    }
    if let Some(notice) = view.notice {
        println!("{notice}");
    }
}
