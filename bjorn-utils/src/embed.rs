use twilight_model::channel::message::embed::{Embed, EmbedField};
use twilight_util::builder::embed::{EmbedBuilder, EmbedFieldBuilder, EmbedFooterBuilder};

use crate::pagination::PaginationState;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x72_CF_DD;

/// Footer text for a page indicator, with an optional note appended.
///
/// Single-page (or empty) collections show only the note.
pub fn page_footer_text(state: &PaginationState, footer_note: Option<&str>) -> String {
    let note = footer_note.filter(|note| !note.is_empty());

    if state.total_pages > 1 {
        let indicator = format!("Page {}/{}", state.current_page + 1, state.total_pages);
        match note {
            Some(note) => format!("{indicator} • {note}"),
            None => indicator,
        }
    } else {
        note.map(ToOwned::to_owned).unwrap_or_default()
    }
}

/// Build a titled embed with the standard color and an optional description.
pub fn build_titled_embed(title: &str, description: Option<String>) -> anyhow::Result<Embed> {
    let mut builder = EmbedBuilder::new().title(title).color(DEFAULT_EMBED_COLOR);
    if let Some(description) = description {
        builder = builder.description(description);
    }

    Ok(builder.validate()?.build())
}

/// Replace the paged parts of `embed` (fields and footer) in place.
///
/// Title, description, color and anything else set by the caller are kept.
pub fn apply_page(
    embed: &mut Embed,
    fields: Vec<EmbedField>,
    state: &PaginationState,
    footer_note: Option<&str>,
) {
    embed.fields = fields;

    let footer_text = page_footer_text(state, footer_note);
    embed.footer = if footer_text.is_empty() {
        None
    } else {
        Some(EmbedFooterBuilder::new(footer_text).build())
    };
}

/// Shorthand for a non-inline embed field.
pub fn field(name: impl Into<String>, value: impl Into<String>) -> EmbedField {
    EmbedFieldBuilder::new(name, value).build()
}
