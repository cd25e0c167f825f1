pub mod chat;
mod general;
mod roles;

use std::collections::HashSet;

use serenity::model::id::UserId;

use crate::{Error, ShepherdContext};

#[poise::command(prefix_command, track_edits, slash_command)]
async fn help(
    ctx: ShepherdContext<'_>,
    #[description = "The command requested for help"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> Result<(), Error> {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            show_context_menu_commands: true,
            ..Default::default()
        },
    )
        .await?;
    Ok(())
}

pub async fn get_framework(pref: &str, _app_id: UserId, owners: HashSet<UserId>) -> poise::FrameworkOptions<(), Error> {
    poise::FrameworkOptions {
        commands: vec![
            help(),
            general::info(),
            general::register(),
            roles::role(),
            chat::cmd(),
        ],
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: Some(pref.to_string()),
            mention_as_prefix: true,
            ..Default::default()
        },
        owners,
        ..Default::default()
    }
}
