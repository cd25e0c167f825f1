use serde::Serialize;
use serenity::model::id::{ChannelId, RoleId};

/// A parsed command, ready for the confirmation step. The description is
/// what gets shown to the user; the params are what gets executed once
/// they press Confirm. Confidence is advisory only and never gates
/// execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandAction {
    #[serde(flatten)]
    pub action: Action,
    pub description: String,
    pub confidence: f64,
}

impl CommandAction {
    pub fn unknown() -> Self {
        CommandAction {
            action: Action::Unknown,
            description: "I didn't understand that command. Try: 'duplicate [role] to channels \
                          [channel1, channel2]' or 'delete [role]'"
                .to_string(),
            confidence: 0.0,
        }
    }
}

/// One variant per recognized command, each carrying only the fields that
/// apply to it. Fields stay `None` unless the corresponding part of the
/// input actually resolved.
///
/// `BulkAssign` is never produced by the parser (no verb class maps to
/// it); the `/role bulk` slash command builds it directly so that bulk
/// changes go through the same confirmation flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Duplicate(DuplicateParams),
    Delete(DeleteParams),
    Edit(EditParams),
    BulkAssign(BulkAssignParams),
    Info(InfoParams),
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DuplicateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_role_id: Option<RoleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_role_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_ids: Option<Vec<ChannelId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_members: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeleteParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<RoleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<RoleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InfoParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<RoleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkAssignParams {
    pub action: BulkAction,
    pub target_role_id: RoleId,
    pub target_role_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_role_id: Option<RoleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_role_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Add,
    Remove,
}

/// Confidence as an ordered list of evidence contributions. Each resolved
/// sub-pattern records its weight; the final score is a fold over the list,
/// clamped to [0, 1] (the contributions can otherwise push past 1 when a
/// command resolves everything).
#[derive(Debug, Default)]
pub(crate) struct Confidence {
    contributions: Vec<f64>,
}

impl Confidence {
    pub fn starting_at(base: f64) -> Self {
        Confidence { contributions: vec![base] }
    }

    pub fn record(&mut self, weight: f64) {
        self.contributions.push(weight);
    }

    pub fn score(&self) -> f64 {
        self.contributions
            .iter()
            .fold(0.0, |total, weight| total + weight)
            .clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_folds_contributions_in_order() {
        let mut confidence = Confidence::starting_at(0.5);
        confidence.record(0.2);
        confidence.record(0.1);
        assert!((confidence.score() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn confidence_clamps_to_one() {
        let mut confidence = Confidence::starting_at(0.9);
        confidence.record(0.2);
        confidence.record(0.2);
        assert_eq!(confidence.score(), 1.0);
    }

    #[test]
    fn confidence_clamps_to_zero() {
        let mut confidence = Confidence::starting_at(0.0);
        confidence.record(-0.5);
        assert_eq!(confidence.score(), 0.0);
    }
}
