use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{COMMANDS, CommandMeta};
use bjorn_core::Context;
use bjorn_utils::{
    COMMAND_PREFIX,
    embed::{apply_page, build_titled_embed},
    pagination::{ConfigError, ExtraData, PaginationState, Paginator, send_paginated_message},
};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands, or the usage of one.",
    category: "utility",
    usage: "!help [command]",
};

pub const HELP_PREFIX: &str = "help";
const HELP_COMMANDS_PER_PAGE: usize = 10;

pub fn paginator() -> Result<Paginator<&'static CommandMeta>, ConfigError> {
    Paginator::builder(HELP_PREFIX)
        .items_per_page(HELP_COMMANDS_PER_PAGE)
        .data_getter(|_state: &PaginationState| async { Ok(sorted_commands()) })
        .on_update(|state, commands, _previous| {
            let mut embed =
                build_titled_embed("Available Commands", Some(grouped_help_description(commands)))?;
            let note = format!("{COMMAND_PREFIX}help <command> shows usage");
            apply_page(&mut embed, Vec::new(), state, Some(&note));
            Ok(embed)
        })
        .build()
}

/// Render the command catalog, or the usage line for a single command.
pub async fn run(
    ctx: Context,
    paginator: &Paginator<&'static CommandMeta>,
    msg: Box<MessageCreate>,
    arg1: Option<&str>,
) -> anyhow::Result<()> {
    let http = &ctx.http;

    if let Some(raw_name) = arg1 {
        let out = usage_message(raw_name);
        http.create_message(msg.channel_id).content(&out).await?;
        return Ok(());
    }

    let view = paginator.setup(ExtraData::new()).await?;
    send_paginated_message(http, msg.channel_id, &view).await
}

fn usage_message(raw_name: &str) -> String {
    let lookup = raw_name
        .trim()
        .trim_start_matches(COMMAND_PREFIX)
        .to_ascii_lowercase();

    match COMMANDS.iter().find(|command| command.name == lookup) {
        Some(command) => format!("Usage: `{}`", command.usage),
        None => format!("Unknown command: `{lookup}`"),
    }
}

fn grouped_help_description(commands: &[&'static CommandMeta]) -> String {
    let mut out = String::new();
    let mut current_category = None;

    for command in commands {
        if current_category != Some(command.category) {
            if current_category.is_some() {
                out.push('\n');
            }
            out.push_str(&format!("**{}**\n", command.category));
            current_category = Some(command.category);
        }
        out.push_str(&format!(
            "`{COMMAND_PREFIX}{}` {}\n",
            command.name, command.desc
        ));
    }

    out.trim_end().to_owned()
}

fn sorted_commands() -> Vec<&'static CommandMeta> {
    let mut commands: Vec<&'static CommandMeta> = COMMANDS.iter().collect();
    commands.sort_unstable_by(|left, right| {
        left.category
            .cmp(right.category)
            .then_with(|| left.name.cmp(right.name))
    });
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_commands_by_category() {
        let description = grouped_help_description(&sorted_commands());

        let scouting = description.find("**scouting**").unwrap();
        let utility = description.find("**utility**").unwrap();
        assert!(scouting < utility);
        assert!(description.contains("`!lead` Display the leaderboard"));
        assert!(description.find("`!awards`").unwrap() < description.find("`!lead`").unwrap());
    }

    #[test]
    fn usage_lookup_accepts_prefixed_names() {
        assert_eq!(usage_message("!LEAD"), "Usage: `!lead <year> <eventCode>`");
        assert_eq!(usage_message("dance"), "Unknown command: `dance`");
    }

    #[tokio::test]
    async fn catalog_fits_on_one_page() {
        let view = paginator().unwrap().setup(ExtraData::new()).await.unwrap();

        assert_eq!(view.state.total_pages, 1);
        assert_eq!(view.embed.title.as_deref(), Some("Available Commands"));
        assert_eq!(
            view.embed.footer.map(|footer| footer.text).as_deref(),
            Some("!help <command> shows usage")
        );
    }
}
