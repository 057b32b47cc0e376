//! Shared interaction response helpers for pagination flows.

use twilight_http::Client;
use twilight_model::{
    channel::message::{MessageFlags, component::Component, embed::Embed},
    gateway::payload::incoming::InteractionCreate,
    http::interaction::{InteractionResponse, InteractionResponseData, InteractionResponseType},
    id::{Id, marker::ChannelMarker},
};
use twilight_util::builder::InteractionResponseDataBuilder;

use super::paginator::{JumpPrompt, PageView};

/// Generic message shown when a pagination custom ID cannot be decoded.
pub const PAGINATION_INVALID_MESSAGE: &str =
    "Invalid pagination interaction. Run the command again.";
/// Generic message shown when page data could not be loaded.
pub const PAGINATION_FETCH_FAILED_MESSAGE: &str =
    "Could not load this page right now. Please try again in a moment.";

/// Respond to a component interaction with an in-place message update.
pub async fn respond_update_message(
    http: &Client,
    interaction: &InteractionCreate,
    embeds: &[Embed],
    components: &[Component],
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::UpdateMessage,
        data: Some(
            InteractionResponseDataBuilder::new()
                .embeds(embeds.to_vec())
                .components(components.to_vec())
                .build(),
        ),
    };

    http.interaction(interaction.application_id)
        .create_response(interaction.id, &interaction.token, &response)
        .await?;

    Ok(())
}

/// Respond to a component interaction with an ephemeral message.
pub async fn respond_ephemeral_message(
    http: &Client,
    interaction: &InteractionCreate,
    content: &str,
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(
            InteractionResponseDataBuilder::new()
                .content(content)
                .flags(MessageFlags::EPHEMERAL)
                .build(),
        ),
    };

    http.interaction(interaction.application_id)
        .create_response(interaction.id, &interaction.token, &response)
        .await?;

    Ok(())
}

/// Respond with the standard invalid pagination message.
pub async fn respond_invalid(http: &Client, interaction: &InteractionCreate) -> anyhow::Result<()> {
    respond_ephemeral_message(http, interaction, PAGINATION_INVALID_MESSAGE).await
}

/// Respond with the standard data-load failure message.
pub async fn respond_fetch_failed(
    http: &Client,
    interaction: &InteractionCreate,
) -> anyhow::Result<()> {
    respond_ephemeral_message(http, interaction, PAGINATION_FETCH_FAILED_MESSAGE).await
}

/// Replace the interaction's message with a rendered page.
pub async fn respond_page_view(
    http: &Client,
    interaction: &InteractionCreate,
    view: &PageView,
) -> anyhow::Result<()> {
    respond_update_message(
        http,
        interaction,
        std::slice::from_ref(&view.embed),
        &view.components,
    )
    .await
}

/// Open the jump-to-page modal.
pub async fn respond_jump_modal(
    http: &Client,
    interaction: &InteractionCreate,
    prompt: &JumpPrompt,
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::Modal,
        data: Some(InteractionResponseData {
            components: Some(prompt.components.clone()),
            custom_id: Some(prompt.custom_id.clone()),
            title: Some(prompt.title.clone()),
            ..InteractionResponseData::default()
        }),
    };

    http.interaction(interaction.application_id)
        .create_response(interaction.id, &interaction.token, &response)
        .await?;

    Ok(())
}

/// Send a new paginated message to a channel.
pub async fn send_paginated_message(
    http: &Client,
    channel_id: Id<ChannelMarker>,
    view: &PageView,
) -> anyhow::Result<()> {
    http.create_message(channel_id)
        .embeds(std::slice::from_ref(&view.embed))
        .components(&view.components)
        .await?;

    Ok(())
}
