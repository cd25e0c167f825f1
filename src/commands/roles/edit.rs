use serenity::model::guild::Role;
use tracing::error;

use crate::services::role_manager::{self, EditRequest};
use crate::{Error, ShepherdContext};

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    description_localized("en-US", "Edit a role's name, color, hoist, or mentionable flags."),
    required_permissions = "MANAGE_ROLES"
)]
pub async fn edit(
    ctx: ShepherdContext<'_>,
    #[description = "The role to edit"] role: Role,
    #[description = "A new name"] name: Option<String>,
    #[description = "A new color, like #5865f2"] color: Option<String>,
    #[description = "Show the role separately in the member list"] hoist: Option<bool>,
    #[description = "Allow anyone to @mention the role"] mentionable: Option<bool>)
-> Result<(), Error> {
    let color_int = match color.as_deref() {
        Some(hex) => {
            let digits = hex.trim().trim_start_matches('#');
            match u32::from_str_radix(digits, 16) {
                Ok(value) if digits.len() == 6 => Some(value),
                _ => {
                    ctx.say("That color doesn't look right; use something like #5865f2.").await?;
                    return Ok(());
                }
            }
        }
        None => None,
    };

    let request = EditRequest { name, color: color_int, hoist, mentionable };
    if request.name.is_none()
        && request.color.is_none()
        && request.hoist.is_none()
        && request.mentionable.is_none()
    {
        ctx.say("Nothing to change; pass at least one of name, color, hoist, or mentionable.").await?;
        return Ok(());
    }

    let guild_id = match ctx.guild_id() {
        Some(guild_id) => guild_id,
        None => {
            ctx.say("This command can only be run in a server.").await?;
            return Ok(());
        }
    };

    match role_manager::edit_role(&ctx.serenity_context().http, guild_id, role.id, &request).await {
        Ok(updated) => {
            ctx.say(format!("Updated role **{}**.", updated.name)).await?;
        }
        Err(ex) => {
            error!("Failed to edit role {}: {}", role.id, ex);
            ctx.say("Failed to edit the role.").await?;
        }
    }

    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    description_localized("en-US", "Delete a role."),
    required_permissions = "MANAGE_ROLES"
)]
pub async fn delete(
    ctx: ShepherdContext<'_>,
    #[description = "The role to delete"] role: Role)
-> Result<(), Error> {
    let guild = match ctx.guild() {
        Some(guild) => guild,
        None => {
            ctx.say("This command can only be run in a server.").await?;
            return Ok(());
        }
    };

    if role.managed {
        ctx.say("That role belongs to a bot or integration and can't be deleted.").await?;
        return Ok(());
    }

    let bot_id = ctx.serenity_context().cache.current_user_id();
    if !role_manager::bot_outranks(&guild, bot_id, role.position) {
        ctx.say(format!("I can't delete **{}**; it's at or above my highest role.", role.name))
            .await?;
        return Ok(());
    }

    match role_manager::delete_role(&ctx.serenity_context().http, guild.id, role.id).await {
        Ok(name) => {
            ctx.say(format!("Deleted role **{name}**.")).await?;
        }
        Err(ex) => {
            error!("Failed to delete role {}: {}", role.id, ex);
            ctx.say("Failed to delete the role.").await?;
        }
    }

    Ok(())
}
