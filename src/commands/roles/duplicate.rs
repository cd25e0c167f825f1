use serenity::model::guild::Role;
use tracing::error;

use crate::services::role_manager::{self, DuplicateRequest};
use crate::{Error, ShepherdContext};

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    description_localized("en-US", "Duplicate a role with its permissions, color, and settings."),
    required_permissions = "MANAGE_ROLES"
)]
pub async fn duplicate(
    ctx: ShepherdContext<'_>,
    #[description = "The role to duplicate"] role: Role,
    #[description = "Name for the new role (defaults to \"Copy of [role]\")"] name: Option<String>,
    #[description = "Number of copies to create"] #[min = 1] #[max = 10] count: Option<u32>,
    #[description = "Also assign the new role to all members who have the original"] copy_members: Option<bool>)
-> Result<(), Error> {
    let guild = match ctx.guild() {
        Some(guild) => guild,
        None => {
            ctx.say("This command can only be run in a server.").await?;
            return Ok(());
        }
    };

    if role.id.0 == guild.id.0 {
        ctx.say("Cannot duplicate the @everyone role.").await?;
        return Ok(());
    }

    let bot_id = ctx.serenity_context().cache.current_user_id();
    if !role_manager::bot_outranks(&guild, bot_id, role.position) {
        ctx.say(format!(
            "I can't duplicate **{}** because it's positioned above or equal to my highest role. \
             Move my role higher in Server Settings > Roles.",
            role.name
        ))
        .await?;
        return Ok(());
    }

    ctx.defer().await?;

    let request = DuplicateRequest {
        source_role_id: role.id,
        name,
        count: count.unwrap_or(1),
        copy_members: copy_members.unwrap_or(false),
        channel_ids: None,
    };

    match role_manager::duplicate_role(&ctx.serenity_context().http, guild.id, &request).await {
        Ok(summary) => {
            let role_list = summary
                .created
                .iter()
                .map(|created| format!("- <@&{}> ({})", created.id.0, created.name))
                .collect::<Vec<_>>()
                .join("\n");

            let mut response = format!(
                "**Duplicated** {}\n\n**Created {} role(s):**\n{}\n\nCopied overrides in {} channel(s).",
                role.name,
                summary.created.len(),
                role_list,
                summary.channels_copied
            );
            if request.copy_members {
                response += &format!("\n**Assigned to:** {} member(s)", summary.members_copied);
            }

            ctx.say(response).await?;
        }
        Err(ex) => {
            error!("Failed to duplicate role {}: {}", role.id, ex);
            ctx.say("Failed to duplicate the role.").await?;
        }
    }

    Ok(())
}
