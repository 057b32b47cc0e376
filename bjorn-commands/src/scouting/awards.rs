use std::{sync::Arc, time::Duration};

use anyhow::Context as _;
use twilight_model::{
    channel::message::embed::{Embed, EmbedField},
    gateway::payload::incoming::MessageCreate,
};

use crate::CommandMeta;
use crate::ftc::{FtcClient, TeamAward};
use bjorn_core::Context;
use bjorn_utils::{
    Cache,
    embed::{apply_page, build_titled_embed, field},
    pagination::{ConfigError, ExtraData, PaginationState, Paginator, send_paginated_message},
};

pub const META: CommandMeta = CommandMeta {
    name: "awards",
    desc: "Show awards for a team.",
    category: "scouting",
    usage: "!awards <teamNumber>",
};

pub const AWARDS_PREFIX: &str = "awards";
const AWARDS_PER_PAGE: usize = 5;

/// Team awards keyed by team number.
pub type AwardsCache = Cache<Vec<TeamAward>>;

pub fn awards_cache(client: FtcClient, capacity: usize, ttl: Duration) -> AwardsCache {
    Cache::new(capacity, ttl, move |key: String| {
        let client = client.clone();
        async move {
            let team_number = key
                .parse::<u32>()
                .with_context(|| format!("invalid team number `{key}`"))?;
            let mut awards = client.team_awards(team_number).await?;
            // Newest season first; stable within a season.
            awards.sort_by(|left, right| right.season.cmp(&left.season));
            anyhow::Ok(awards)
        }
    })
}

pub fn paginator(cache: Arc<AwardsCache>) -> Result<Paginator<TeamAward>, ConfigError> {
    Paginator::builder(AWARDS_PREFIX)
        .items_per_page(AWARDS_PER_PAGE)
        .extra_key("teamNumber")
        .data_getter(move |state: &PaginationState| {
            let cache = Arc::clone(&cache);
            let key = state
                .extra_data
                .get("teamNumber")
                .unwrap_or_default()
                .to_owned();
            async move { cache.get(&key).await.map_err(anyhow::Error::from) }
        })
        .on_create(|state, awards| {
            let mut embed = awards_header(state)?;
            apply_page(&mut embed, award_fields(awards), state, None);
            Ok(embed)
        })
        .on_update(|state, awards, previous| {
            let mut embed = match previous {
                Some(embed) => embed,
                None => awards_header(state)?,
            };
            apply_page(&mut embed, award_fields(awards), state, None);
            Ok(embed)
        })
        .build()
}

/// Send the first awards page for a team.
pub async fn run(
    ctx: Context,
    paginator: &Paginator<TeamAward>,
    msg: Box<MessageCreate>,
    arg1: Option<&str>,
) -> anyhow::Result<()> {
    let Some(team_number) = arg1.and_then(parse_team_number) else {
        let usage = format!("Usage: `{}`", META.usage);
        ctx.http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    let extra_data = ExtraData::new().with("teamNumber", team_number.to_string());

    match paginator.setup(extra_data).await {
        Ok(view) => send_paginated_message(&ctx.http, msg.channel_id, &view).await,
        Err(source) => {
            let subject = format!("awards for team {team_number}");
            super::report_setup_failure(&ctx, msg.channel_id, &subject, source).await
        }
    }
}

fn parse_team_number(raw: &str) -> Option<u32> {
    raw.trim()
        .trim_start_matches('#')
        .parse::<u32>()
        .ok()
        .filter(|team| *team > 0)
}

fn awards_header(state: &PaginationState) -> anyhow::Result<Embed> {
    let team_number = state.extra_data.get("teamNumber").unwrap_or_default();
    build_titled_embed(
        &format!("Awards for Team {team_number}"),
        Some("Here are the awards this team has received:".to_owned()),
    )
}

fn award_fields(awards: &[TeamAward]) -> Vec<EmbedField> {
    if awards.is_empty() {
        return vec![field(
            "No Awards",
            "This team has not received any awards yet.",
        )];
    }

    awards
        .iter()
        .map(|award| {
            field(
                format!("{} ({})", award.kind, award.season),
                format!(
                    "Placement: {}\nEvent Code: {}",
                    award.placement, award.event_code
                ),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bjorn_utils::pagination::Transition;
    use twilight_util::builder::embed::EmbedBuilder;

    fn award(season: u32, kind: &str) -> TeamAward {
        TeamAward {
            season,
            event_code: "USCASDQ1".to_owned(),
            team_number: 22105,
            kind: kind.to_owned(),
            placement: 1,
            division_name: None,
            person_name: None,
        }
    }

    fn awards_paginator(count: usize) -> Paginator<TeamAward> {
        let cache = Arc::new(Cache::new(4, Duration::from_secs(60), move |_key: String| {
            async move { Ok((0..count).map(|i| award(2024, &format!("Award {i}"))).collect()) }
        }));
        paginator(cache).unwrap()
    }

    #[test]
    fn parses_team_numbers() {
        assert_eq!(parse_team_number("22105"), Some(22105));
        assert_eq!(parse_team_number("#16236"), Some(16236));
        assert_eq!(parse_team_number("0"), None);
        assert_eq!(parse_team_number("team"), None);
    }

    #[test]
    fn empty_awards_render_placeholder_field() {
        let fields = award_fields(&[]);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "No Awards");
    }

    #[test]
    fn award_field_lists_placement_and_event() {
        let fields = award_fields(&[award(2023, "Think")]);
        assert_eq!(fields[0].name, "Think (2023)");
        assert_eq!(fields[0].value, "Placement: 1\nEvent Code: USCASDQ1");
    }

    #[tokio::test]
    async fn update_rewrites_only_fields_and_footer() {
        let paginator = awards_paginator(7);
        let first = paginator
            .setup(ExtraData::new().with("teamNumber", "22105"))
            .await
            .unwrap();
        assert_eq!(first.embed.title.as_deref(), Some("Awards for Team 22105"));
        assert_eq!(first.embed.fields.len(), AWARDS_PER_PAGE);

        let mut previous = first.embed.clone();
        previous.title = Some("Pinned Title".to_owned());

        let transition = paginator
            .transition("awards_nb 0_2 22105", None, Some(previous))
            .await
            .unwrap();
        let Transition::Render(second) = transition else {
            panic!("expected render");
        };

        assert_eq!(second.embed.title.as_deref(), Some("Pinned Title"));
        assert_eq!(second.embed.fields.len(), 2);
        assert_eq!(
            second.embed.footer.map(|footer| footer.text).as_deref(),
            Some("Page 2/2")
        );
    }

    #[tokio::test]
    async fn update_without_previous_rebuilds_header() {
        let paginator = awards_paginator(3);

        let transition = paginator
            .transition("awards_pb 0_1 22105", None, Some(EmbedBuilder::new().build()))
            .await
            .unwrap();
        let Transition::Render(view) = transition else {
            panic!("expected render");
        };
        assert_eq!(view.embed.fields.len(), 3);

        let transition = paginator
            .transition("awards_pb 0_1 22105", None, None)
            .await
            .unwrap();
        let Transition::Render(view) = transition else {
            panic!("expected render");
        };
        assert_eq!(view.embed.title.as_deref(), Some("Awards for Team 22105"));
    }
}
