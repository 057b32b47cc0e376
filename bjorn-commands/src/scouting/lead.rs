use std::{sync::Arc, time::Duration};

use twilight_model::{channel::message::embed::Embed, gateway::payload::incoming::MessageCreate};

use crate::CommandMeta;
use crate::ftc::{FtcClient, TeamRank};
use bjorn_core::Context;
use bjorn_utils::{
    Cache,
    embed::{build_titled_embed, field},
    pagination::{ConfigError, ExtraData, PaginationState, Paginator, send_paginated_message},
};

pub const META: CommandMeta = CommandMeta {
    name: "lead",
    desc: "Display the leaderboard for a certain event.",
    category: "scouting",
    usage: "!lead <year> <eventCode>",
};

pub const LEAD_PREFIX: &str = "lead";
const TEAMS_PER_PAGE: usize = 10;

/// Event rankings keyed by `"<year> <eventCode>"`.
pub type LeaderboardCache = Cache<Vec<TeamRank>>;

pub fn cache_key(year: &str, event_code: &str) -> String {
    format!("{year} {event_code}")
}

pub fn leaderboard_cache(client: FtcClient, capacity: usize, ttl: Duration) -> LeaderboardCache {
    Cache::new(capacity, ttl, move |key: String| {
        let client = client.clone();
        async move {
            let Some((year, event_code)) = key.split_once(' ') else {
                anyhow::bail!("malformed leaderboard cache key `{key}`");
            };
            client.event_rankings(year, event_code).await
        }
    })
}

pub fn paginator(cache: Arc<LeaderboardCache>) -> Result<Paginator<TeamRank>, ConfigError> {
    Paginator::builder(LEAD_PREFIX)
        .items_per_page(TEAMS_PER_PAGE)
        .extra_key("year")
        .extra_key("eventCode")
        .data_getter(move |state: &PaginationState| {
            let cache = Arc::clone(&cache);
            let key = cache_key(
                state.extra_data.get("year").unwrap_or_default(),
                state.extra_data.get("eventCode").unwrap_or_default(),
            );
            async move { cache.get(&key).await.map_err(anyhow::Error::from) }
        })
        .on_update(|state, teams, _previous| leaderboard_embed(state, teams))
        .build()
}

/// Send the first leaderboard page for `year` and `event_code`.
pub async fn run(
    ctx: Context,
    paginator: &Paginator<TeamRank>,
    msg: Box<MessageCreate>,
    year: Option<&str>,
    event_code: Option<&str>,
) -> anyhow::Result<()> {
    let (Some(year), Some(event_code)) = (year, event_code) else {
        let usage = format!("Usage: `{}`", META.usage);
        ctx.http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    let extra_data = ExtraData::new()
        .with("year", year)
        .with("eventCode", event_code);

    match paginator.setup(extra_data).await {
        Ok(view) => send_paginated_message(&ctx.http, msg.channel_id, &view).await,
        Err(source) => {
            let subject = format!("the {year} {event_code} leaderboard");
            super::report_setup_failure(&ctx, msg.channel_id, &subject, source).await
        }
    }
}

fn leaderboard_embed(state: &PaginationState, teams: &[TeamRank]) -> anyhow::Result<Embed> {
    let year = state.extra_data.get("year").unwrap_or_default();
    let event_code = state.extra_data.get("eventCode").unwrap_or_default();

    let mut title = format!("{year} {event_code} Leaderboard");
    if state.total_pages > 1 {
        title.push_str(&format!(
            " (Part {}/{})",
            state.current_page + 1,
            state.total_pages
        ));
    }

    let description = teams
        .is_empty()
        .then(|| "No ranked teams found for this event.".to_owned());
    let mut embed = build_titled_embed(&title, description)?;
    embed.fields = teams
        .iter()
        .map(|team| {
            field(
                format!("Rank {}", team.rank),
                format!("Team Number: {}", team.team_number),
            )
        })
        .collect();

    Ok(embed)
}
