use serenity::http::Http;
use serenity::model::channel::{Channel, ChannelType, PermissionOverwrite, PermissionOverwriteType};
use serenity::model::guild::{Guild, Role};
use serenity::model::id::{ChannelId, GuildId, RoleId, UserId};
use tracing::error;

use crate::models::guild::{ChannelInfo, RoleInfo};
use crate::parser::BulkAction;
use crate::Error;

const MAX_COPIES: u32 = 10;

/// Everything needed to duplicate one role, resolved ahead of time by the
/// slash command or the confirmed `/cmd` action.
#[derive(Debug, Clone)]
pub struct DuplicateRequest {
    pub source_role_id: RoleId,
    pub name: Option<String>,
    pub count: u32,
    pub copy_members: bool,
    /// When set, overwrites are only copied in these channels.
    pub channel_ids: Option<Vec<ChannelId>>,
}

#[derive(Debug)]
pub struct DuplicateSummary {
    pub created: Vec<Role>,
    pub channels_copied: usize,
    pub members_copied: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct BulkOutcome {
    pub affected: usize,
    pub failed: usize,
}

/// Duplicates a role: copies of the role itself first, then the source
/// role's channel permission overwrites, then (optionally) its member
/// assignments. Everything after role creation is per-item: a failed
/// channel or member is logged and skipped, not fatal.
pub async fn duplicate_role(
    http: &Http,
    guild_id: GuildId,
    request: &DuplicateRequest,
) -> Result<DuplicateSummary, Error> {
    let roles = guild_id.roles(http).await?;
    let source = roles
        .get(&request.source_role_id)
        .ok_or("Source role not found")?;

    let copies = request.count.clamp(1, MAX_COPIES);
    let mut created = Vec::with_capacity(copies as usize);

    for index in 0..copies {
        let role_name = copy_name(request.name.as_deref(), &source.name, copies, index);
        let new_role = guild_id
            .create_role(http, |role| {
                role.name(&role_name)
                    .permissions(source.permissions)
                    .colour(source.colour.0 as u64)
                    .hoist(source.hoist)
                    .mentionable(source.mentionable)
            })
            .await?;

        // Nudge the copy right below the source; hierarchy can forbid this.
        let below_source = (source.position - 1).max(0) as u64;
        if let Err(ex) = guild_id.edit_role_position(http, new_role.id, below_source).await {
            error!("Failed to position role {}: {}", new_role.id, ex);
        }

        created.push(new_role);
    }

    let mut channels_copied = 0;
    match guild_id.channels(http).await {
        Ok(channels) => {
            for (channel_id, channel) in channels {
                if let Some(only) = &request.channel_ids {
                    if !only.contains(&channel_id) {
                        continue;
                    }
                }

                let overwrite = channel.permission_overwrites.iter().find(|overwrite| {
                    matches!(overwrite.kind, PermissionOverwriteType::Role(id) if id == request.source_role_id)
                });
                let overwrite = match overwrite {
                    Some(overwrite) => overwrite,
                    None => continue,
                };

                let mut any_copied = false;
                for role in &created {
                    let copy = PermissionOverwrite {
                        allow: overwrite.allow,
                        deny: overwrite.deny,
                        kind: PermissionOverwriteType::Role(role.id),
                    };

                    if let Err(ex) = channel.create_permission(http, &copy).await {
                        error!("Channel override copy failed for #{}: {}", channel.name, ex);
                    } else {
                        any_copied = true;
                    }
                }

                if any_copied {
                    channels_copied += 1;
                }
            }
        }
        Err(ex) => error!("Failed to fetch channels for {}: {}", guild_id, ex),
    }

    let mut members_copied = 0;
    if request.copy_members {
        match guild_id.members(http, None, None).await {
            Ok(members) => {
                for mut member in members {
                    if !member.roles.contains(&request.source_role_id) {
                        continue;
                    }

                    let mut failed = false;
                    for role in &created {
                        if let Err(ex) = member.add_role(http, role.id).await {
                            error!("Failed to assign {} to {}: {}", role.name, member.user.id, ex);
                            failed = true;
                        }
                    }

                    if !failed {
                        members_copied += 1;
                    }
                }
            }
            Err(ex) => error!("Failed to fetch members for {}: {}", guild_id, ex),
        }
    }

    Ok(DuplicateSummary { created, channels_copied, members_copied })
}

fn copy_name(custom: Option<&str>, source_name: &str, copies: u32, index: u32) -> String {
    match custom {
        Some(name) if copies > 1 => format!("{} {}", name, index + 1),
        Some(name) => name.to_string(),
        None if copies > 1 => format!("Copy of {} {}", source_name, index + 1),
        None => format!("Copy of {source_name}"),
    }
}

/// Deletes a role, refusing managed (bot/integration) roles. Returns the
/// deleted role's name for the reply.
pub async fn delete_role(http: &Http, guild_id: GuildId, role_id: RoleId) -> Result<String, Error> {
    let roles = guild_id.roles(http).await?;
    let role = roles.get(&role_id).ok_or("Role not found")?;

    if role.managed {
        return Err("Cannot delete a managed/bot role".into());
    }

    let name = role.name.clone();
    guild_id.delete_role(http, role_id).await?;

    Ok(name)
}

/// A partial role update; only the supplied fields are sent.
#[derive(Debug, Clone, Default)]
pub struct EditRequest {
    pub name: Option<String>,
    pub color: Option<u32>,
    pub hoist: Option<bool>,
    pub mentionable: Option<bool>,
}

pub async fn edit_role(
    http: &Http,
    guild_id: GuildId,
    role_id: RoleId,
    request: &EditRequest,
) -> Result<Role, Error> {
    let role = guild_id
        .edit_role(http, role_id, |role| {
            if let Some(name) = &request.name {
                role.name(name);
            }
            if let Some(color) = request.color {
                role.colour(color as u64);
            }
            if let Some(hoist) = request.hoist {
                role.hoist(hoist);
            }
            if let Some(mentionable) = request.mentionable {
                role.mentionable(mentionable);
            }
            role
        })
        .await?;

    Ok(role)
}

/// Adds or removes the target role for every member holding the source
/// role (every non-bot member when no source is given). Per-member error
/// isolation; members already in the desired state are skipped entirely.
pub async fn bulk_assign(
    http: &Http,
    guild_id: GuildId,
    mode: BulkAction,
    target: RoleId,
    source: Option<RoleId>,
) -> Result<BulkOutcome, Error> {
    let members = guild_id.members(http, None, None).await?;

    let mut affected = 0;
    let mut failed = 0;

    for mut member in members {
        let eligible = match source {
            Some(source_id) => member.roles.contains(&source_id),
            None => !member.user.bot,
        };
        if !eligible {
            continue;
        }

        let has_target = member.roles.contains(&target);
        let result = match mode {
            BulkAction::Add => {
                if has_target {
                    continue;
                }
                member.add_role(http, target).await
            }
            BulkAction::Remove => {
                if !has_target {
                    continue;
                }
                member.remove_role(http, target).await
            }
        };

        match result {
            Ok(()) => affected += 1,
            Err(ex) => {
                error!("Bulk role change failed for {}: {}", member.user.id, ex);
                failed += 1;
            }
        }
    }

    Ok(BulkOutcome { affected, failed })
}

/// True when the bot's highest role sits above the given position, i.e.
/// the bot is allowed to manage a role at that position.
pub fn bot_outranks(guild: &Guild, bot_id: UserId, role_position: i64) -> bool {
    let bot_top = guild
        .members
        .get(&bot_id)
        .map(|member| {
            member
                .roles
                .iter()
                .filter_map(|role_id| guild.roles.get(role_id))
                .map(|role| role.position)
                .max()
                .unwrap_or(0)
        })
        .unwrap_or(0);

    role_position < bot_top
}

/// Roles as the parser sees them: no `@everyone`, highest first.
pub fn roles_snapshot(guild: &Guild) -> Vec<RoleInfo> {
    let mut roles: Vec<RoleInfo> = guild
        .roles
        .values()
        .filter(|role| role.id.0 != guild.id.0)
        .map(RoleInfo::from)
        .collect();
    roles.sort_by(|a, b| b.position.cmp(&a.position));

    roles
}

/// Channels as the parser sees them: guild channels only, no categories.
pub fn channels_snapshot(guild: &Guild) -> Vec<ChannelInfo> {
    let mut channels: Vec<ChannelInfo> = guild
        .channels
        .values()
        .filter_map(|channel| match channel {
            Channel::Guild(guild_channel) => Some(guild_channel),
            _ => None,
        })
        .filter(|channel| channel.kind != ChannelType::Category)
        .map(ChannelInfo::from)
        .collect();
    channels.sort_by_key(|channel| channel.position);

    channels
}
