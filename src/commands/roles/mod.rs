mod bulk;
mod duplicate;
mod edit;
mod info;

use bulk::*;
use duplicate::*;
use edit::*;
use info::*;

use crate::{Error, ShepherdContext};

#[poise::command(prefix_command, slash_command,
    subcommands("duplicate", "delete", "edit", "info", "list", "bulk"),
    description_localized("en-US", "Manage the roles on this server."),
    identifying_name = "Role Management"
)]
pub async fn role(_ctx: ShepherdContext<'_>) -> Result<(), Error> {
    Ok(())
}
