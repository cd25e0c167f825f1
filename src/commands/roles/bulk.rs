use serenity::model::guild::Role;

use crate::commands::chat::send_confirmation;
use crate::parser::{Action, BulkAction, BulkAssignParams, CommandAction};
use crate::services::role_manager;
use crate::{Error, ShepherdContext};

#[derive(poise::ChoiceParameter)]
pub enum BulkChoice {
    #[name = "Add role"]
    Add,
    #[name = "Remove role"]
    Remove,
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    description_localized("en-US", "Add or remove a role for all members who have another role."),
    required_permissions = "MANAGE_ROLES"
)]
pub async fn bulk(
    ctx: ShepherdContext<'_>,
    #[description = "Add or remove the target role"] action: BulkChoice,
    #[description = "The role to add or remove"] target_role: Role,
    #[description = "Apply to members who have this role (empty for ALL members)"] source_role: Option<Role>)
-> Result<(), Error> {
    let guild = match ctx.guild() {
        Some(guild) => guild,
        None => {
            ctx.say("This command can only be run in a server.").await?;
            return Ok(());
        }
    };

    let bot_id = ctx.serenity_context().cache.current_user_id();
    if !role_manager::bot_outranks(&guild, bot_id, target_role.position) {
        ctx.say(format!(
            "I can't manage **{}** because it's at or above my highest role.",
            target_role.name
        ))
        .await?;
        return Ok(());
    }

    let mode = match action {
        BulkChoice::Add => BulkAction::Add,
        BulkChoice::Remove => BulkAction::Remove,
    };

    let params = BulkAssignParams {
        action: mode,
        target_role_id: target_role.id,
        target_role_name: target_role.name.clone(),
        source_role_id: source_role.as_ref().map(|role| role.id),
        source_role_name: source_role.as_ref().map(|role| role.name.clone()),
    };

    let scope = match &params.source_role_name {
        Some(source) => format!("every member with \"{source}\""),
        None => "every member".to_string(),
    };
    let description = match mode {
        BulkAction::Add => format!("Add \"{}\" to {}", target_role.name, scope),
        BulkAction::Remove => format!("Remove \"{}\" from {}", target_role.name, scope),
    };

    // Bulk changes touch a lot of members; route through the same
    // confirmation step as /cmd.
    let action = CommandAction {
        action: Action::BulkAssign(params),
        description,
        confidence: 1.0,
    };

    send_confirmation(&ctx, guild.id, action).await
}
