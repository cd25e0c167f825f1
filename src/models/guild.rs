use chrono::{DateTime, TimeZone, Utc};
use serenity::model::channel::{ChannelType, GuildChannel, PermissionOverwrite};
use serenity::model::guild::Role;
use serenity::model::id::{ChannelId, RoleId};

// Milliseconds between the Unix epoch and Discord's snowflake epoch.
const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// A point-in-time snapshot of a role, as handed to the command parser.
/// Only `id` and `name` participate in matching; the rest rides along so
/// callers can show it or copy it into mutation requests.
#[derive(Debug, Clone)]
pub struct RoleInfo {
    pub id: RoleId,
    pub name: String,
    pub color: Option<String>,
    pub color_int: u32,
    pub hoist: bool,
    pub position: i64,
    pub mentionable: bool,
    pub managed: bool,
    pub permissions: String,
    pub permission_names: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Role> for RoleInfo {
    fn from(role: &Role) -> Self {
        let color_int = role.colour.0;

        RoleInfo {
            id: role.id,
            name: role.name.clone(),
            color: (color_int != 0).then(|| format!("#{color_int:06x}")),
            color_int,
            hoist: role.hoist,
            position: role.position,
            mentionable: role.mentionable,
            managed: role.managed,
            permissions: role.permissions.bits().to_string(),
            permission_names: role
                .permissions
                .get_permission_names()
                .iter()
                .map(|name| name.to_string())
                .collect(),
            created_at: snowflake_timestamp(role.id.0),
        }
    }
}

impl RoleInfo {
    #[cfg(test)]
    pub fn named(id: u64, name: &str) -> Self {
        RoleInfo {
            id: RoleId(id),
            name: name.to_string(),
            color: None,
            color_int: 0,
            hoist: false,
            position: 0,
            mentionable: false,
            managed: false,
            permissions: "0".to_string(),
            permission_names: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// A point-in-time snapshot of a guild channel. Matching only looks at the
/// name; the overwrites are carried for the duplicate flow.
#[derive(Debug, Clone)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub name: String,
    pub kind: ChannelType,
    pub position: i64,
    pub parent_id: Option<ChannelId>,
    pub overwrites: Vec<PermissionOverwrite>,
}

impl From<&GuildChannel> for ChannelInfo {
    fn from(channel: &GuildChannel) -> Self {
        ChannelInfo {
            id: channel.id,
            name: channel.name.clone(),
            kind: channel.kind,
            position: channel.position,
            parent_id: channel.parent_id,
            overwrites: channel.permission_overwrites.clone(),
        }
    }
}

impl ChannelInfo {
    #[cfg(test)]
    pub fn named(id: u64, name: &str) -> Self {
        ChannelInfo {
            id: ChannelId(id),
            name: name.to_string(),
            kind: ChannelType::Text,
            position: 0,
            parent_id: None,
            overwrites: Vec::new(),
        }
    }
}

fn snowflake_timestamp(id: u64) -> DateTime<Utc> {
    Utc.timestamp_millis(((id >> 22) as i64) + DISCORD_EPOCH_MS)
}
