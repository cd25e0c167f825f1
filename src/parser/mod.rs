//! Turns free-text commands into typed, confirmable actions against a
//! snapshot of the guild's roles and channels. Keyword dispatch plus fuzzy
//! substring matching; no network, no state, no model.

mod action;
mod command;
mod matcher;

pub use action::{
    Action, BulkAction, BulkAssignParams, CommandAction, DeleteParams, DuplicateParams, EditParams,
    InfoParams,
};
pub use command::parse_command;
pub use matcher::{find_best_channel_match, find_best_role_match};
