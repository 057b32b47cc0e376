pub mod awards;
pub mod lead;

use tracing::{error, warn};
use twilight_model::id::{Id, marker::ChannelMarker};

use bjorn_core::Context;
use bjorn_utils::pagination::PaginationError;

/// Tell the channel why a paginated message could not be created.
async fn report_setup_failure(
    ctx: &Context,
    channel_id: Id<ChannelMarker>,
    subject: &str,
    source: PaginationError,
) -> anyhow::Result<()> {
    let content = match &source {
        PaginationError::Token(_) => {
            warn!(%source, subject, "arguments cannot be carried in pagination controls");
            format!("Invalid arguments for {subject}: `_` and spaces are not allowed.")
        }
        _ => {
            error!(?source, subject, "failed to create paginated message");
            format!("Could not load {subject} right now. Please try again in a moment.")
        }
    };

    ctx.http.create_message(channel_id).content(&content).await?;
    Ok(())
}
