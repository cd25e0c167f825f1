use std::collections::HashMap;
use std::sync::Arc;

use serenity::model::id::{GuildId, MessageId, UserId};
use serenity::prelude::{RwLock, TypeMapKey};

use crate::parser::CommandAction;

/// Parsed `/cmd` actions awaiting a Confirm or Cancel press, keyed by the
/// id of the confirmation message. Entries are removed once resolved;
/// anything left over simply expires with the process.
pub struct PendingCommands;

impl TypeMapKey for PendingCommands {
    type Value = Arc<RwLock<HashMap<MessageId, PendingCommand>>>;
}

#[derive(Debug, Clone)]
pub struct PendingCommand {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub action: CommandAction,
}
