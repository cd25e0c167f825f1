use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::guild::{ChannelInfo, RoleInfo};

// Command verbs and filler words stripped before scanning for a role name,
// so "delete the admin role" reduces to "admin".
static STOP_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(duplicate|copy|clone|delete|remove|edit|rename|info|show|details|role|the|a|an|my)\b")
        .unwrap()
});

/// Finds the role whose name appears as a substring of the input, after
/// stop words are stripped. The longest name wins; on equal lengths the
/// first role in the provided list is kept.
pub fn find_best_role_match<'a>(input: &str, roles: &'a [RoleInfo]) -> Option<&'a RoleInfo> {
    let cleaned = STOP_WORDS.replace_all(input, "").to_lowercase();
    let cleaned = cleaned.trim();

    let mut best: Option<&RoleInfo> = None;
    let mut best_len = 0;

    for role in roles {
        let name = role.name.to_lowercase();
        if cleaned.contains(name.as_str()) && name.len() > best_len {
            best_len = name.len();
            best = Some(role);
        }
    }

    best
}

/// Resolves a channel by name: an exact (case-insensitive) match wins over
/// any merely-containing name, so "general" picks #general rather than
/// #general-chat. A leading '#' on the query is ignored.
pub fn find_best_channel_match<'a>(name: &str, channels: &'a [ChannelInfo]) -> Option<&'a ChannelInfo> {
    let query = name.to_lowercase();
    let query = query.strip_prefix('#').unwrap_or(&query);

    if let Some(exact) = channels.iter().find(|channel| channel.name.to_lowercase() == query) {
        return Some(exact);
    }

    channels.iter().find(|channel| channel.name.to_lowercase().contains(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_stop_words_before_matching() {
        let roles = vec![RoleInfo::named(1, "Admin"), RoleInfo::named(2, "Mod")];
        let found = find_best_role_match("delete the Admin role", &roles).unwrap();
        assert_eq!(found.id.0, 1);
    }

    #[test]
    fn longest_role_name_wins() {
        let roles = vec![RoleInfo::named(1, "Admin"), RoleInfo::named(2, "Admin Team")];
        let found = find_best_role_match("info Admin Team", &roles).unwrap();
        assert_eq!(found.id.0, 2);
    }

    #[test]
    fn equal_length_names_resolve_to_the_first_listed() {
        let roles = vec![RoleInfo::named(1, "alpha"), RoleInfo::named(2, "omega")];
        assert_eq!(find_best_role_match("alpha omega", &roles).unwrap().id.0, 1);

        let reversed = vec![RoleInfo::named(2, "omega"), RoleInfo::named(1, "alpha")];
        assert_eq!(find_best_role_match("alpha omega", &reversed).unwrap().id.0, 2);
    }

    #[test]
    fn no_substring_means_no_match() {
        let roles = vec![RoleInfo::named(1, "Admin")];
        assert!(find_best_role_match("delete Test Role", &roles).is_none());
    }

    #[test]
    fn role_matching_is_stateless() {
        let roles = vec![RoleInfo::named(1, "Admin"), RoleInfo::named(2, "Mod")];
        let first = find_best_role_match("show the Mod role", &roles).map(|r| r.id);
        let second = find_best_role_match("show the Mod role", &roles).map(|r| r.id);
        assert_eq!(first, second);
        assert_eq!(first, Some(roles[1].id));
    }

    #[test]
    fn exact_channel_match_beats_partial() {
        let channels = vec![ChannelInfo::named(1, "general-chat"), ChannelInfo::named(2, "general")];
        assert_eq!(find_best_channel_match("general", &channels).unwrap().id.0, 2);
    }

    #[test]
    fn partial_channel_match_takes_first_containing() {
        let channels = vec![ChannelInfo::named(1, "general-chat"), ChannelInfo::named(2, "trading")];
        assert_eq!(find_best_channel_match("gen", &channels).unwrap().id.0, 1);
    }

    #[test]
    fn leading_hash_is_ignored() {
        let channels = vec![ChannelInfo::named(1, "general")];
        assert_eq!(find_best_channel_match("#general", &channels).unwrap().id.0, 1);
    }

    #[test]
    fn unknown_channel_yields_none() {
        let channels = vec![ChannelInfo::named(1, "general")];
        assert!(find_best_channel_match("voice", &channels).is_none());
    }
}
