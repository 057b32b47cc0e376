//! Routing of pagination component and jump-modal interactions to paginators.

use std::{collections::HashMap, sync::Arc};

use tracing::{error, warn};
use twilight_http::Client;
use twilight_model::{
    application::interaction::{
        InteractionData,
        modal::{ModalInteractionComponent, ModalInteractionData},
    },
    channel::message::embed::Embed,
    gateway::payload::incoming::InteractionCreate,
};

use super::components::JUMP_INPUT_ID;
use super::paginator::{ConfigError, PaginationError, PaginationHandler, Transition};
use super::respond::{
    respond_ephemeral_message, respond_fetch_failed, respond_invalid, respond_jump_modal,
    respond_page_view,
};
use super::token::control_prefix;

/// Paginators reachable from interactions, keyed by custom ID prefix.
#[derive(Default)]
pub struct PaginatorRegistry {
    handlers: HashMap<String, Arc<dyn PaginationHandler>>,
}

impl PaginatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a paginator; each prefix may only be claimed once.
    pub fn register(&mut self, handler: Arc<dyn PaginationHandler>) -> Result<(), ConfigError> {
        let prefix = handler.prefix().to_owned();
        if self.handlers.contains_key(&prefix) {
            return Err(ConfigError::DuplicatePrefix(prefix));
        }
        self.handlers.insert(prefix, handler);
        Ok(())
    }

    /// Find the paginator that issued `custom_id`, if any.
    pub fn find(&self, custom_id: &str) -> Option<&Arc<dyn PaginationHandler>> {
        control_prefix(custom_id).and_then(|prefix| self.handlers.get(prefix))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Pagination-relevant parts of a component or modal-submit interaction.
#[derive(Debug, Clone)]
pub struct PaginationEvent<'a> {
    pub custom_id: &'a str,
    /// Text typed into the jump modal; `None` for button presses.
    pub input: Option<String>,
    /// First embed of the message the control is attached to.
    pub previous: Option<Embed>,
}

/// Extract the custom ID, jump input and previous embed from an interaction.
///
/// Returns `None` for interactions that are neither button presses nor modal
/// submissions.
pub fn pagination_event(interaction: &InteractionCreate) -> Option<PaginationEvent<'_>> {
    let (custom_id, input) = match interaction.data.as_ref()? {
        InteractionData::MessageComponent(component) => (component.custom_id.as_str(), None),
        InteractionData::ModalSubmit(modal) => {
            (modal.custom_id.as_str(), jump_modal_input(modal))
        }
        _ => return None,
    };

    let previous = interaction
        .message
        .as_ref()
        .and_then(|message| message.embeds.first().cloned());

    Some(PaginationEvent {
        custom_id,
        input,
        previous,
    })
}

/// Extract the raw jump-modal text input value.
pub fn jump_modal_input(modal_data: &ModalInteractionData) -> Option<String> {
    for component in &modal_data.components {
        if let ModalInteractionComponent::ActionRow(row) = component {
            for nested in &row.components {
                if let ModalInteractionComponent::TextInput(text_input) = nested
                    && text_input.custom_id == JUMP_INPUT_ID
                {
                    return Some(text_input.value.clone());
                }
            }
        }
    }

    None
}

/// Route a component or modal interaction to its paginator and respond.
///
/// Returns `Ok(false)` when no registered paginator issued the custom ID,
/// `Ok(true)` once the interaction has been answered. Engine errors are
/// logged and answered with an ephemeral notice rather than propagated.
pub async fn handle_pagination_interaction(
    http: &Client,
    interaction: &InteractionCreate,
    registry: &PaginatorRegistry,
) -> anyhow::Result<bool> {
    let Some(event) = pagination_event(interaction) else {
        return Ok(false);
    };

    let Some(handler) = registry.find(event.custom_id) else {
        return Ok(false);
    };

    let transition = handler
        .handle(event.custom_id, event.input.as_deref(), event.previous)
        .await;

    match transition {
        Ok(Transition::Render(view)) => respond_page_view(http, interaction, &view).await?,
        Ok(Transition::Prompt(prompt)) => respond_jump_modal(http, interaction, &prompt).await?,
        Ok(Transition::Rejected(notice)) => {
            respond_ephemeral_message(http, interaction, &notice).await?
        }
        Err(source @ (PaginationError::Token(_) | PaginationError::ForeignIdentifier { .. })) => {
            warn!(%source, custom_id = event.custom_id, "rejected pagination custom ID");
            respond_invalid(http, interaction).await?;
        }
        Err(source) => {
            error!(?source, custom_id = event.custom_id, "pagination interaction failed");
            respond_fetch_failed(http, interaction).await?;
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::Paginator;
    use twilight_util::builder::embed::EmbedBuilder;

    fn paginator(prefix: &str) -> Arc<dyn PaginationHandler> {
        Arc::new(
            Paginator::builder(prefix)
                .data_getter(|_state| async { Ok(vec![1_u8]) })
                .on_update(|_state, _items, _previous| Ok(EmbedBuilder::new().build()))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn finds_paginator_by_prefix() {
        let mut registry = PaginatorRegistry::new();
        registry.register(paginator("lead")).unwrap();
        registry.register(paginator("team_awards")).unwrap();

        assert_eq!(registry.find("lead_nb 0_3 2024_X").map(|h| h.prefix()), Some("lead"));
        assert_eq!(
            registry.find("team_awards_jm 1_2 22105").map(|h| h.prefix()),
            Some("team_awards")
        );
        assert!(registry.find("awards_nb 0_3").is_none());
        assert!(registry.find("terminate:confirm:1:2:0").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn rejects_duplicate_prefix() {
        let mut registry = PaginatorRegistry::new();
        registry.register(paginator("lead")).unwrap();

        assert_eq!(
            registry.register(paginator("lead")),
            Err(ConfigError::DuplicatePrefix("lead".to_owned()))
        );
    }

    #[tokio::test]
    async fn handler_runs_transition_through_trait_object() {
        let handler = paginator("lead");

        let transition = handler.handle("lead_nb 0_1", None, None).await.unwrap();

        assert!(matches!(transition, Transition::Render(view) if view.state.current_page == 0));
    }
}
