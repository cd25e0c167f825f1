use serenity::model::guild::Role;
use tracing::error;

use crate::models::guild::RoleInfo;
use crate::{Error, ShepherdContext};

const ROLES_PER_PAGE: usize = 20;
const EMBED_FIELD_LIMIT: usize = 1024;

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    description_localized("en-US", "Show detailed info about a specific role."),
    required_permissions = "MANAGE_ROLES"
)]
pub async fn info(
    ctx: ShepherdContext<'_>,
    #[description = "The role to inspect"] role: Role)
-> Result<(), Error> {
    let member_count = ctx
        .guild()
        .map(|guild| {
            guild.members.values().filter(|member| member.roles.contains(&role.id)).count()
        })
        .unwrap_or(0);

    let snapshot = RoleInfo::from(&role);

    let mut permissions = snapshot
        .permission_names
        .iter()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ");
    if permissions.len() > EMBED_FIELD_LIMIT {
        permissions.truncate(EMBED_FIELD_LIMIT - 4);
        permissions += "...";
    }

    if let Err(ex) = ctx
        .send(|m| {
            m.embed(|e| {
                e.title(format!("Role: {}", snapshot.name))
                    .colour(if snapshot.color_int != 0 { snapshot.color_int } else { 0x2f3136 })
                    .field("ID", format!("`{}`", snapshot.id.0), true)
                    .field("Color", snapshot.color.clone().unwrap_or_else(|| "none".to_string()), true)
                    .field("Position", snapshot.position.to_string(), true)
                    .field("Members", member_count.to_string(), true)
                    .field("Hoisted", yes_no(snapshot.hoist), true)
                    .field("Mentionable", yes_no(snapshot.mentionable), true)
                    .field("Managed (bot/integration)", yes_no(snapshot.managed), true)
                    .field("Created", format!("<t:{}:R>", snapshot.created_at.timestamp()), true)
                    .field(
                        format!("Permissions ({})", snapshot.permission_names.len()),
                        if permissions.is_empty() { "None".to_string() } else { permissions },
                        false,
                    )
            })
        })
        .await
    {
        error!("Failed to send role info: {}", ex);
    }

    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    description_localized("en-US", "List all roles in the server with member counts."),
    required_permissions = "MANAGE_ROLES"
)]
pub async fn list(
    ctx: ShepherdContext<'_>,
    #[description = "Show settings for each role"] detailed: Option<bool>)
-> Result<(), Error> {
    let guild = match ctx.guild() {
        Some(guild) => guild,
        None => {
            ctx.say("This command can only be run in a server.").await?;
            return Ok(());
        }
    };

    let detailed = detailed.unwrap_or(false);

    let mut roles: Vec<&Role> =
        guild.roles.values().filter(|role| role.id.0 != guild.id.0).collect();
    roles.sort_by(|a, b| b.position.cmp(&a.position));

    if roles.is_empty() {
        ctx.say("No custom roles found in this server.").await?;
        return Ok(());
    }

    let member_count = |role: &Role| {
        guild.members.values().filter(|member| member.roles.contains(&role.id)).count()
    };

    let page_total = (roles.len() + ROLES_PER_PAGE - 1) / ROLES_PER_PAGE;
    for (page_index, page) in roles.chunks(ROLES_PER_PAGE).enumerate() {
        let mut description = String::new();
        for role in page {
            let color = if role.colour.0 != 0 {
                format!("#{:06x}", role.colour.0)
            } else {
                "none".to_string()
            };

            if detailed {
                description += &format!(
                    "**{}.** <@&{}> - {} members\n   Color: `{}` | Perms: {} | Hoist: {} | Mentionable: {}\n\n",
                    role.position,
                    role.id.0,
                    member_count(role),
                    color,
                    role.permissions.get_permission_names().len(),
                    yes_no(role.hoist),
                    yes_no(role.mentionable)
                );
            } else {
                description += &format!(
                    "**{}.** <@&{}> - {} members (`{}`)\n",
                    role.position,
                    role.id.0,
                    member_count(role),
                    color
                );
            }
        }

        let footer = format!("{} total roles | Page {}/{}", roles.len(), page_index + 1, page_total);
        ctx.send(|m| {
            m.embed(|e| {
                e.title(format!("Roles in {}", guild.name))
                    .colour(0xf0c040)
                    .description(description)
                    .footer(|f| f.text(footer))
            })
        })
        .await?;
    }

    Ok(())
}
