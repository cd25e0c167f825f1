use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::guild::{ChannelInfo, RoleInfo};

use super::action::{
    Action, CommandAction, Confidence, DeleteParams, DuplicateParams, EditParams, InfoParams,
};
use super::matcher::{find_best_channel_match, find_best_role_match};

type SubParser = fn(&str, &[RoleInfo], &[ChannelInfo]) -> CommandAction;

// The verb dispatch table. The first entry whose pattern matches the
// lowercased input handles the whole command; the order of the entries IS
// the precedence contract (duplicate outranks delete, delete outranks
// edit, and so on down to the bare "list").
static VERB_CLASSES: Lazy<Vec<(Regex, SubParser)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"\b(duplicate|copy|clone|replicate)\b").unwrap(),
            parse_duplicate as SubParser,
        ),
        (
            Regex::new(r"\b(delete|remove|destroy)\b").unwrap(),
            parse_delete as SubParser,
        ),
        (
            Regex::new(r"\b(edit|rename|change|update|modify)\b").unwrap(),
            parse_edit as SubParser,
        ),
        (
            Regex::new(r"\b(info|show|details|describe|what is|tell me about)\b").unwrap(),
            parse_info as SubParser,
        ),
        (
            Regex::new(r"\b(list|show all|all roles)\b").unwrap(),
            parse_list as SubParser,
        ),
    ]
});

// "as NAME", "named NAME", 'called "NAME"', ...
static NEW_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)(?:as|named|called|name it|name:)\s+["']?([^"',]+)["']?"#).unwrap());

// "in channels X, Y", "to #general and #trading", ...
static CHANNEL_LIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:in|to|for|on)\s+(?:channels?\s+)?(.+?)(?:\s*$|\s+(?:and|with|as|named|called))")
        .unwrap()
});

static CHANNEL_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[,\s]+(?:and\s+)?").unwrap());

static COPY_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s+(?:copies|times|x)").unwrap());

static COPY_MEMBERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(with members|copy members|include members)\b").unwrap());

// "rename X to Y"
static RENAME_TO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)rename\s+.+?\s+to\s+["']?([^"']+)["']?"#).unwrap());

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)#([0-9a-f]{6})\b").unwrap());

/// Parses a free-text command against a snapshot of the guild's roles and
/// channels. Total: every input yields an action, falling back to
/// `Action::Unknown` with confidence 0 when no verb is recognized.
///
/// Verb dispatch and entity matching are case-insensitive, but sub-parsers
/// extract names from the original text, so "duplicate Admin as Admin2"
/// keeps the casing of "Admin2".
pub fn parse_command(input: &str, roles: &[RoleInfo], channels: &[ChannelInfo]) -> CommandAction {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    for (pattern, sub_parser) in VERB_CLASSES.iter() {
        if pattern.is_match(&lower) {
            return sub_parser(trimmed, roles, channels);
        }
    }

    CommandAction::unknown()
}

fn parse_duplicate(input: &str, roles: &[RoleInfo], channels: &[ChannelInfo]) -> CommandAction {
    let mut params = DuplicateParams::default();
    let mut confidence = Confidence::starting_at(0.5);

    if let Some(role) = find_best_role_match(input, roles) {
        params.source_role_id = Some(role.id);
        params.source_role_name = Some(role.name.clone());
        confidence.record(0.2);
    }

    if let Some(captures) = NEW_NAME.captures(input) {
        params.new_name = Some(captures[1].trim().to_string());
        confidence.record(0.1);
    }

    if let Some(captures) = CHANNEL_LIST.captures(input) {
        let matched: Vec<&ChannelInfo> = CHANNEL_SPLIT
            .split(&captures[1])
            .map(|token| {
                let token = token.trim();
                token.strip_prefix('#').unwrap_or(token)
            })
            .filter(|token| !token.is_empty())
            .filter_map(|token| find_best_channel_match(token, channels))
            .collect();

        if !matched.is_empty() {
            params.channel_ids = Some(matched.iter().map(|channel| channel.id).collect());
            params.channel_names = Some(matched.iter().map(|channel| channel.name.clone()).collect());
            confidence.record(0.1);
        }
    }

    if let Some(captures) = COPY_COUNT.captures(input) {
        // A digit run too long for u32 still means "a lot".
        let count = captures[1].parse::<u32>().unwrap_or(u32::MAX);
        params.count = Some(count.clamp(1, 10));
    }

    if COPY_MEMBERS.is_match(input) {
        params.copy_members = Some(true);
    }

    let description = describe_duplicate(&params);
    let confidence = confidence.score();

    CommandAction { action: Action::Duplicate(params), description, confidence }
}

fn describe_duplicate(params: &DuplicateParams) -> String {
    let mut parts =
        vec![format!("Duplicate \"{}\"", params.source_role_name.as_deref().unwrap_or("?"))];

    if let Some(name) = &params.new_name {
        parts.push(format!("as \"{name}\""));
    }

    if let Some(names) = &params.channel_names {
        let plural = if names.len() > 1 { "s" } else { "" };
        parts.push(format!("in {} channel{}: {}", names.len(), plural, names.join(", ")));
    }

    if let Some(count) = params.count {
        parts.push(format!("({count} copies)"));
    }

    if params.copy_members == Some(true) {
        parts.push("with member assignments".to_string());
    }

    parts.join(" ")
}

fn parse_delete(input: &str, roles: &[RoleInfo], _channels: &[ChannelInfo]) -> CommandAction {
    let mut params = DeleteParams::default();

    let (description, confidence) = match find_best_role_match(input, roles) {
        Some(role) => {
            params.role_id = Some(role.id);
            params.role_name = Some(role.name.clone());
            (format!("Delete role \"{}\"", role.name), 0.8)
        }
        None => ("Delete role (which one?)".to_string(), 0.3),
    };

    CommandAction { action: Action::Delete(params), description, confidence }
}

fn parse_edit(input: &str, roles: &[RoleInfo], _channels: &[ChannelInfo]) -> CommandAction {
    let mut params = EditParams::default();
    let mut confidence = Confidence::starting_at(0.5);

    if let Some(role) = find_best_role_match(input, roles) {
        params.role_id = Some(role.id);
        params.role_name = Some(role.name.clone());
        confidence.record(0.2);
    }

    if let Some(captures) = RENAME_TO.captures(input) {
        params.new_name = Some(captures[1].trim().to_string());
        confidence.record(0.1);
    }

    if let Some(captures) = HEX_COLOR.captures(input) {
        if let Ok(color) = u32::from_str_radix(&captures[1], 16) {
            params.color = Some(color);
        }
    }

    let description = match (&params.role_name, &params.new_name) {
        (Some(role), Some(new_name)) => format!("Edit role \"{role}\" - rename to \"{new_name}\""),
        (Some(role), None) => format!("Edit role \"{role}\""),
        (None, _) => "Edit role (which one?)".to_string(),
    };
    let confidence = confidence.score();

    CommandAction { action: Action::Edit(params), description, confidence }
}

fn parse_info(input: &str, roles: &[RoleInfo], _channels: &[ChannelInfo]) -> CommandAction {
    let mut params = InfoParams::default();

    let (description, confidence) = match find_best_role_match(input, roles) {
        Some(role) => {
            params.role_id = Some(role.id);
            params.role_name = Some(role.name.clone());
            (format!("Show info for \"{}\"", role.name), 0.9)
        }
        None => ("Show role info (which one?)".to_string(), 0.3),
    };

    CommandAction { action: Action::Info(params), description, confidence }
}

fn parse_list(_input: &str, _roles: &[RoleInfo], _channels: &[ChannelInfo]) -> CommandAction {
    CommandAction {
        action: Action::Info(InfoParams::default()),
        description: "List all roles".to_string(),
        confidence: 0.9,
    }
}

#[cfg(test)]
mod tests {
    use serenity::model::id::{ChannelId, RoleId};

    use super::*;

    fn roles() -> Vec<RoleInfo> {
        vec![RoleInfo::named(1, "Admin"), RoleInfo::named(2, "Mod")]
    }

    fn channels() -> Vec<ChannelInfo> {
        vec![
            ChannelInfo::named(1, "general"),
            ChannelInfo::named(2, "trading"),
            ChannelInfo::named(3, "support"),
        ]
    }

    fn assert_close(got: f64, want: f64) {
        assert!((got - want).abs() < 1e-9, "confidence {got} != {want}");
    }

    #[test]
    fn unrecognized_verbs_fall_back_to_unknown() {
        for input in ["make me a sandwich", "please help me out", ""] {
            let action = parse_command(input, &roles(), &channels());
            assert_eq!(action.action, Action::Unknown, "input: {input:?}");
            assert_eq!(action.confidence, 0.0);
        }
    }

    #[test]
    fn list_all_roles_is_a_fixed_info_action() {
        let action = parse_command("list all roles", &roles(), &channels());
        assert_eq!(action.action, Action::Info(InfoParams::default()));
        assert_eq!(action.description, "List all roles");
        assert_close(action.confidence, 0.9);
    }

    #[test]
    fn duplicate_resolves_role_and_new_name() {
        let action = parse_command("duplicate Admin as Admin2", &roles(), &[]);

        match &action.action {
            Action::Duplicate(params) => {
                assert_eq!(params.source_role_id, Some(RoleId(1)));
                assert_eq!(params.source_role_name.as_deref(), Some("Admin"));
                assert_eq!(params.new_name.as_deref(), Some("Admin2"));
            }
            other => panic!("expected duplicate, got {other:?}"),
        }
        assert_close(action.confidence, 0.8);
        assert_eq!(action.description, "Duplicate \"Admin\" as \"Admin2\"");
    }

    #[test]
    fn duplicate_keeps_only_matched_channels_in_input_order() {
        let action = parse_command("duplicate Mod to channels general, trading", &roles(), &channels());

        match &action.action {
            Action::Duplicate(params) => {
                assert_eq!(params.channel_ids.as_deref(), Some(&[ChannelId(1), ChannelId(2)][..]));
                assert_eq!(
                    params.channel_names.as_deref(),
                    Some(&["general".to_string(), "trading".to_string()][..])
                );
                assert_eq!(params.source_role_id, Some(RoleId(2)));
            }
            other => panic!("expected duplicate, got {other:?}"),
        }
        assert_close(action.confidence, 0.8);
    }

    #[test]
    fn duplicate_clamps_count_to_one_through_ten() {
        let zero = parse_command("duplicate Admin 0 copies", &roles(), &[]);
        match zero.action {
            Action::Duplicate(params) => assert_eq!(params.count, Some(1)),
            other => panic!("expected duplicate, got {other:?}"),
        }

        let many = parse_command("duplicate Admin 99 copies", &roles(), &[]);
        match many.action {
            Action::Duplicate(params) => assert_eq!(params.count, Some(10)),
            other => panic!("expected duplicate, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_picks_up_member_copy_flag() {
        let action = parse_command("copy Admin with members", &roles(), &[]);
        match &action.action {
            Action::Duplicate(params) => assert_eq!(params.copy_members, Some(true)),
            other => panic!("expected duplicate, got {other:?}"),
        }
        assert!(action.description.ends_with("with member assignments"));
    }

    #[test]
    fn duplicate_without_resolved_role_uses_placeholder() {
        let action = parse_command("duplicate something", &[], &[]);
        assert!(action.description.starts_with("Duplicate \"?\""));
        assert_close(action.confidence, 0.5);
    }

    #[test]
    fn delete_with_unknown_role_degrades_confidence() {
        let action = parse_command("delete Test Role", &roles(), &channels());

        assert_eq!(action.action, Action::Delete(DeleteParams::default()));
        assert_close(action.confidence, 0.3);
        assert_eq!(action.description, "Delete role (which one?)");
    }

    #[test]
    fn delete_with_known_role_resolves_it() {
        let action = parse_command("delete the Mod role", &roles(), &channels());

        match &action.action {
            Action::Delete(params) => {
                assert_eq!(params.role_id, Some(RoleId(2)));
                assert_eq!(params.role_name.as_deref(), Some("Mod"));
            }
            other => panic!("expected delete, got {other:?}"),
        }
        assert_close(action.confidence, 0.8);
        assert_eq!(action.description, "Delete role \"Mod\"");
    }

    #[test]
    fn edit_extracts_rename_target_with_original_casing() {
        let action = parse_command("rename Mod to SuperMod", &roles(), &[]);

        match &action.action {
            Action::Edit(params) => {
                assert_eq!(params.role_id, Some(RoleId(2)));
                assert_eq!(params.new_name.as_deref(), Some("SuperMod"));
            }
            other => panic!("expected edit, got {other:?}"),
        }
        assert_close(action.confidence, 0.8);
        assert_eq!(action.description, "Edit role \"Mod\" - rename to \"SuperMod\"");
    }

    #[test]
    fn edit_extracts_hex_color() {
        let action = parse_command("change Admin color #ff5733", &roles(), &[]);

        match &action.action {
            Action::Edit(params) => {
                assert_eq!(params.role_id, Some(RoleId(1)));
                assert_eq!(params.color, Some(0xff5733));
                assert_eq!(params.new_name, None);
            }
            other => panic!("expected edit, got {other:?}"),
        }
        assert_close(action.confidence, 0.7);
    }

    #[test]
    fn info_resolves_role() {
        let action = parse_command("tell me about the Admin role", &roles(), &[]);

        match &action.action {
            Action::Info(params) => assert_eq!(params.role_id, Some(RoleId(1))),
            other => panic!("expected info, got {other:?}"),
        }
        assert_close(action.confidence, 0.9);
    }

    #[test]
    fn info_without_role_degrades_confidence() {
        let action = parse_command("show details", &[], &[]);
        assert_eq!(action.action, Action::Info(InfoParams::default()));
        assert_close(action.confidence, 0.3);
        assert_eq!(action.description, "Show role info (which one?)");
    }

    #[test]
    fn earlier_verb_classes_take_precedence() {
        // "duplicate" and "delete" both appear; duplicate is checked first.
        let action = parse_command("duplicate then delete Admin", &roles(), &[]);
        assert!(matches!(action.action, Action::Duplicate(_)));

        // "remove" and "info" both appear; delete is checked first.
        let action = parse_command("remove info", &[], &[]);
        assert!(matches!(action.action, Action::Delete(_)));
    }

    #[test]
    fn parsing_is_deterministic_across_calls() {
        let first = parse_command("duplicate Mod to channels general, trading", &roles(), &channels());
        let second = parse_command("duplicate Mod to channels general, trading", &roles(), &channels());
        assert_eq!(first, second);
    }
}
