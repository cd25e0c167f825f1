use serenity::client::Context;
use serenity::model::application::component::ButtonStyle;
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::id::GuildId;
use tracing::error;

use crate::parser::{parse_command, Action, BulkAction, CommandAction};
use crate::services::confirmations::{PendingCommand, PendingCommands};
use crate::services::role_manager::{self, DuplicateRequest, EditRequest};
use crate::{Error, ShepherdContext};

pub const CONFIRM_ID: &str = "cmd_confirm";
pub const CANCEL_ID: &str = "cmd_cancel";

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    description_localized("en-US", "Run a role command written in plain English."),
    required_permissions = "MANAGE_ROLES"
)]
pub async fn cmd(
    ctx: ShepherdContext<'_>,
    #[description = "What to do, e.g. 'duplicate Admin to channels general, trading'"]
    #[rest] text: String)
-> Result<(), Error> {
    let (guild_id, roles, channels) = match ctx.guild() {
        Some(guild) => (
            guild.id,
            role_manager::roles_snapshot(&guild),
            role_manager::channels_snapshot(&guild),
        ),
        None => {
            ctx.say("This command can only be run in a server.").await?;
            return Ok(());
        }
    };

    let action = parse_command(&text, &roles, &channels);

    if action.action == Action::Unknown {
        ctx.say(&action.description).await?;
        return Ok(());
    }

    send_confirmation(&ctx, guild_id, action).await
}

/// Replies with the action's description plus Confirm/Cancel buttons and
/// parks the action until one of them is pressed. Shared by `/cmd` and
/// `/role bulk`.
pub async fn send_confirmation(
    ctx: &ShepherdContext<'_>,
    guild_id: GuildId,
    action: CommandAction,
) -> Result<(), Error> {
    let reply = ctx
        .send(|m| {
            m.embed(|e| {
                e.title("Confirm command")
                    .description(&action.description)
                    .field("Confidence", format!("{:.0}%", action.confidence * 100.0), true)
            })
            .components(|c| {
                c.create_action_row(|row| {
                    row.create_button(|b| {
                        b.custom_id(CONFIRM_ID).label("Confirm").style(ButtonStyle::Success)
                    })
                    .create_button(|b| {
                        b.custom_id(CANCEL_ID).label("Cancel").style(ButtonStyle::Danger)
                    })
                })
            })
        })
        .await?;

    let message_id = reply.message().await?.id;

    let pending = {
        let data = ctx.serenity_context().data.read().await;
        data.get::<PendingCommands>().expect("Couldn't find pending command store").clone()
    };
    pending.write().await.insert(
        message_id,
        PendingCommand { guild_id, user_id: ctx.author().id, action },
    );

    Ok(())
}

pub async fn handle_confirm(
    ctx: &Context,
    component: &mut MessageComponentInteraction,
) -> Result<(), Error> {
    let store = {
        let data = ctx.data.read().await;
        data.get::<PendingCommands>().expect("Couldn't find pending command store").clone()
    };

    let pending = { store.read().await.get(&component.message.id).cloned() };
    let pending = match pending {
        Some(pending) => pending,
        None => {
            component
                .create_followup_message(&ctx.http, |m| {
                    m.content("This command has expired; run it again.").ephemeral(true)
                })
                .await?;
            return Ok(());
        }
    };

    if component.user.id != pending.user_id {
        component
            .create_followup_message(&ctx.http, |m| {
                m.content("Only the person who ran the command can confirm it.").ephemeral(true)
            })
            .await?;
        return Ok(());
    }

    store.write().await.remove(&component.message.id);

    if let Err(ex) = component.message.edit(&ctx.http, |m| m.components(|c| c)).await {
        error!("Failed to clear confirmation buttons: {}", ex);
    }

    let content = match execute(ctx, &pending).await {
        Ok(text) => text,
        Err(ex) => {
            error!("Failed to execute confirmed command: {}", ex);
            format!("Failed to run that command: {ex}")
        }
    };

    component.create_followup_message(&ctx.http, |m| m.content(content)).await?;

    Ok(())
}

pub async fn handle_cancel(
    ctx: &Context,
    component: &mut MessageComponentInteraction,
) -> Result<(), Error> {
    let store = {
        let data = ctx.data.read().await;
        data.get::<PendingCommands>().expect("Couldn't find pending command store").clone()
    };

    let removed = {
        let mut pending = store.write().await;
        match pending.get(&component.message.id) {
            Some(entry) if entry.user_id == component.user.id => {
                pending.remove(&component.message.id)
            }
            _ => None,
        }
    };

    if removed.is_some() {
        if let Err(ex) = component.message.edit(&ctx.http, |m| m.components(|c| c)).await {
            error!("Failed to clear confirmation buttons: {}", ex);
        }
        component.create_followup_message(&ctx.http, |m| m.content("Cancelled.")).await?;
    }

    Ok(())
}

/// Dispatches a confirmed action to the mutation service and renders the
/// outcome as a reply.
async fn execute(ctx: &Context, pending: &PendingCommand) -> Result<String, Error> {
    let http = &ctx.http;
    let guild_id = pending.guild_id;

    match &pending.action.action {
        Action::Duplicate(params) => {
            let source_role_id = params
                .source_role_id
                .ok_or("No source role was resolved; try naming it exactly.")?;
            let request = DuplicateRequest {
                source_role_id,
                name: params.new_name.clone(),
                count: params.count.unwrap_or(1),
                copy_members: params.copy_members.unwrap_or(false),
                channel_ids: params.channel_ids.clone(),
            };

            let summary = role_manager::duplicate_role(http, guild_id, &request).await?;
            let names = summary
                .created
                .iter()
                .map(|role| role.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");

            Ok(format!(
                "Created {} role(s): {} | overrides copied in {} channel(s), {} member(s) assigned",
                summary.created.len(),
                names,
                summary.channels_copied,
                summary.members_copied
            ))
        }
        Action::Delete(params) => {
            let role_id = params.role_id.ok_or("No role was resolved; try naming it exactly.")?;
            let name = role_manager::delete_role(http, guild_id, role_id).await?;
            Ok(format!("Deleted role \"{name}\"."))
        }
        Action::Edit(params) => {
            let role_id = params.role_id.ok_or("No role was resolved; try naming it exactly.")?;
            let request = EditRequest {
                name: params.new_name.clone(),
                color: params.color,
                ..Default::default()
            };
            let role = role_manager::edit_role(http, guild_id, role_id, &request).await?;
            Ok(format!("Updated role \"{}\".", role.name))
        }
        Action::BulkAssign(params) => {
            let outcome = role_manager::bulk_assign(
                http,
                guild_id,
                params.action,
                params.target_role_id,
                params.source_role_id,
            )
            .await?;

            let verb = match params.action {
                BulkAction::Add => "Added",
                BulkAction::Remove => "Removed",
            };
            let mut content =
                format!("**{}** \"{}\" for **{}** member(s)", verb, params.target_role_name, outcome.affected);
            if outcome.failed > 0 {
                content += &format!(
                    "\nFailed for {} member(s) (likely higher in hierarchy)",
                    outcome.failed
                );
            }

            Ok(content)
        }
        Action::Info(params) => {
            let roles = guild_id.roles(http).await?;
            match params.role_id {
                Some(role_id) => {
                    let role = roles.get(&role_id).ok_or("That role no longer exists.")?;
                    let hoisted = if role.hoist { "hoisted" } else { "not hoisted" };
                    Ok(format!(
                        "**{}** | position {} | color #{:06x} | {} | {} permission(s)",
                        role.name,
                        role.position,
                        role.colour.0,
                        hoisted,
                        role.permissions.get_permission_names().len()
                    ))
                }
                None => {
                    let mut names: Vec<(i64, &str)> = roles
                        .values()
                        .filter(|role| role.id.0 != guild_id.0)
                        .map(|role| (role.position, role.name.as_str()))
                        .collect();
                    names.sort_by(|a, b| b.0.cmp(&a.0));

                    let listed = names.iter().map(|(_, name)| *name).collect::<Vec<_>>().join(", ");
                    Ok(format!("{} role(s): {}", names.len(), listed))
                }
            }
        }
        Action::Unknown => Ok("Nothing to do.".to_string()),
    }
}
