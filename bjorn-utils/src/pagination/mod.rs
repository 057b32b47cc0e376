//! Stable facade for the stateless pagination engine used by command handlers.

mod components;
pub mod interaction;
mod page;
mod paginator;
pub mod respond;
pub mod token;

pub use components::{JUMP_INPUT_ID, build_jump_input, build_nav_components};
pub use interaction::{
    PaginationEvent, PaginatorRegistry, handle_pagination_interaction, jump_modal_input,
    pagination_event,
};
pub use page::{
    clamp_page, page_slice, page_window, parse_one_based_page, step_page, total_pages,
};
pub use paginator::{
    ConfigError, CreatePage, DataGetter, JUMP_MODAL_TITLE, JumpPrompt, MAX_PREFIX_LEN, PageView,
    PaginationError, PaginationHandler, Paginator, PaginatorBuilder, Transition, UpdatePage,
    invalid_jump_message,
};
pub use respond::{respond_ephemeral_message, send_paginated_message};
pub use token::{
    ControlKind, ExtraData, MAX_CUSTOM_ID_LEN, PaginationState, PaginationToken, TokenError,
};
