//! Pagination UI component builders (previous/jump/next buttons, jump modal input).

use twilight_model::channel::message::component::{
    ActionRow, Button, ButtonStyle, Component, TextInput, TextInputStyle,
};

use super::token::{ControlKind, PaginationState, TokenError, encode};

/// Custom ID of the text input inside the jump modal.
pub const JUMP_INPUT_ID: &str = "page";

/// Build previous/jump/next button components for a paginated message.
///
/// Previous is disabled on the first page, next on the last page and jump
/// when there is only one page.
pub fn build_nav_components(
    prefix: &str,
    state: &PaginationState,
    extra_keys: &[String],
) -> Result<Vec<Component>, TokenError> {
    let last_page = state.total_pages.saturating_sub(1);

    let prev_button = nav_button(
        encode(prefix, ControlKind::Prev, state, extra_keys)?,
        "◀ Prev",
        state.current_page == 0,
    );
    let jump_button = nav_button(
        encode(prefix, ControlKind::JumpButton, state, extra_keys)?,
        "Go to Page",
        state.total_pages < 2,
    );
    let next_button = nav_button(
        encode(prefix, ControlKind::Next, state, extra_keys)?,
        "Next ▶",
        state.current_page >= last_page,
    );

    Ok(vec![Component::ActionRow(ActionRow {
        id: None,
        components: vec![prev_button, jump_button, next_button],
    })])
}

/// Build the single-row text input shown inside the jump modal.
#[allow(deprecated)]
pub fn build_jump_input(total_pages: usize) -> Vec<Component> {
    let page_input = Component::TextInput(TextInput {
        id: None,
        custom_id: JUMP_INPUT_ID.to_owned(),
        label: Some(format!("Enter a page number (1-{total_pages})")),
        max_length: Some(6),
        min_length: Some(1),
        placeholder: Some(format!("Enter a page from 1 to {total_pages}")),
        required: Some(true),
        style: TextInputStyle::Short,
        value: None,
    });

    vec![Component::ActionRow(ActionRow {
        id: None,
        components: vec![page_input],
    })]
}

fn nav_button(custom_id: String, label: &str, disabled: bool) -> Component {
    Component::Button(Button {
        id: None,
        custom_id: Some(custom_id),
        disabled,
        emoji: None,
        label: Some(label.to_owned()),
        style: ButtonStyle::Secondary,
        url: None,
        sku_id: None,
    })
}
