pub mod ftc;
pub mod scouting;
pub mod utility;

use std::sync::Arc;

use tracing::{debug, info};
use twilight_model::gateway::payload::incoming::{InteractionCreate, MessageCreate};

use bjorn_core::Context;
use bjorn_utils::{
    COMMAND_PREFIX,
    pagination::{Paginator, PaginatorRegistry, handle_pagination_interaction},
};

use crate::ftc::{FtcClient, TeamAward, TeamRank};

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::help::META,
    scouting::lead::META,
    scouting::awards::META,
    // Add new commands here
];

/// Owns every paginator and the registry that routes interactions to them.
pub struct Commands {
    ctx: Context,
    help: Arc<Paginator<&'static CommandMeta>>,
    lead: Arc<Paginator<TeamRank>>,
    awards: Arc<Paginator<TeamAward>>,
    registry: PaginatorRegistry,
}

impl Commands {
    /// Build caches and paginators from the context's configuration.
    ///
    /// Fails on paginator configuration errors so the process can abort
    /// before connecting to the gateway.
    pub fn new(ctx: Context) -> anyhow::Result<Self> {
        let config = Arc::clone(&ctx.config);
        let ftc = FtcClient::new(&config.ftc_api_base_url, config.ftc_http_timeout)?;

        let leaderboards = Arc::new(scouting::lead::leaderboard_cache(
            ftc.clone(),
            config.cache_capacity,
            config.cache_ttl,
        ));
        let awards_cache = Arc::new(scouting::awards::awards_cache(
            ftc,
            config.cache_capacity,
            config.cache_ttl,
        ));

        let help = Arc::new(utility::help::paginator()?);
        let lead = Arc::new(scouting::lead::paginator(Arc::clone(&leaderboards))?);
        let awards = Arc::new(scouting::awards::paginator(awards_cache)?);

        let mut registry = PaginatorRegistry::new();
        registry.register(help.clone())?;
        registry.register(lead.clone())?;
        registry.register(awards.clone())?;

        info!(
            paginators = registry.len(),
            cache_capacity = leaderboards.capacity(),
            cache_ttl_secs = leaderboards.ttl().as_secs(),
            "commands ready"
        );

        Ok(Self {
            ctx,
            help,
            lead,
            awards,
            registry,
        })
    }

    pub async fn handle_message(&self, msg: Box<MessageCreate>) -> anyhow::Result<()> {
        if msg.author.bot {
            return Ok(());
        }

        let content = msg.content.clone();
        let Some((cmd, args)) = parse_invocation(&content) else {
            return Ok(());
        };

        let arg1 = args.first().copied();
        let arg2 = args.get(1).copied();
        let ctx = self.ctx.clone();

        match cmd.as_str() {
            "help" => utility::help::run(ctx, &self.help, msg, arg1).await?,
            "lead" => scouting::lead::run(ctx, &self.lead, msg, arg1, arg2).await?,
            "awards" => scouting::awards::run(ctx, &self.awards, msg, arg1).await?,
            // Add new commands here
            _ => {}
        }

        Ok(())
    }

    pub async fn handle_interaction(&self, interaction: Box<InteractionCreate>) -> anyhow::Result<()> {
        let handled =
            handle_pagination_interaction(&self.ctx.http, &interaction, &self.registry).await?;
        if !handled {
            debug!(interaction_id = %interaction.id, "interaction not handled by any paginator");
        }

        Ok(())
    }
}

/// Split a prefixed message into a lowercase command name and its arguments.
fn parse_invocation(content: &str) -> Option<(String, Vec<&str>)> {
    let content = content.trim().strip_prefix(COMMAND_PREFIX)?;
    let mut words = content.split_whitespace();
    let cmd = words.next()?.to_ascii_lowercase();

    Some((cmd, words.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prefixed_invocations() {
        assert_eq!(
            parse_invocation("  !LEAD 2024   USCASDQ1 "),
            Some(("lead".to_owned(), vec!["2024", "USCASDQ1"]))
        );
        assert_eq!(parse_invocation("!help"), Some(("help".to_owned(), vec![])));
    }

    #[test]
    fn ignores_unprefixed_and_empty_messages() {
        assert_eq!(parse_invocation("lead 2024 X"), None);
        assert_eq!(parse_invocation("!"), None);
        assert_eq!(parse_invocation(""), None);
    }

    #[test]
    fn command_names_are_unique() {
        let mut names: Vec<&str> = COMMANDS.iter().map(|command| command.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), COMMANDS.len());
    }
}
