use serde::Serialize;

use crate::command::{Classification, EffectOutcome};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct OutcomeJson<'a> {
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<&'a str>,
    pub success: bool,
    pub detail: String,
}

pub fn outcome_json(classification: &Classification) -> OutcomeJson<'_> {
    match classification {
        Classification::Note { .. } => OutcomeJson {
            kind: "note",
            command: None,
            success: true,
            detail: outcome_line(classification),
        },
        Classification::Command { name, result } => OutcomeJson {
            kind: "command",
            command: Some(name),
            success: result.success,
            detail: outcome_line(classification),
        },
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// One human-readable line describing what a submitted line did.
pub fn outcome_line(classification: &Classification) -> String {
    match classification {
        Classification::Note { content } => format!("noted: {}", content),
        Classification::Command { name, result } => match &result.outcome {
            EffectOutcome::Created { item_type, id } => {
                format!("created {} #{}", item_type, id)
            }
            EffectOutcome::Deleted { count } => format!("deleted {} item(s)", count),
            EffectOutcome::Moved { status, count } => {
                format!("moved {} task(s) to {}", count, status.as_str())
            }
            EffectOutcome::ProjectAdded { id, name } => {
                format!("added project {} (#{})", name, id)
            }
            EffectOutcome::ViewChanged => format!("/{}: view updated", name),
            EffectOutcome::Rejected { reason } => format!("/{}: {}", name, reason),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::EffectResult;
    use crate::model::ItemType;

    #[test]
    fn outcome_lines_read_naturally() {
        let note = Classification::Note {
            content: "buy milk".to_string(),
        };
        insta::assert_snapshot!(outcome_line(&note), @"noted: buy milk");

        let created = Classification::Command {
            name: "task",
            result: EffectResult::ok(EffectOutcome::Created {
                item_type: ItemType::Task,
                id: 7,
            }),
        };
        insta::assert_snapshot!(outcome_line(&created), @"created task #7");

        let rejected = Classification::Command {
            name: "show",
            result: EffectResult::rejected("unknown item type: xyz"),
        };
        insta::assert_snapshot!(outcome_line(&rejected), @"/show: unknown item type: xyz");
    }

    #[test]
    fn json_outcome_carries_the_command_name() {
        let rejected = Classification::Command {
            name: "show",
            result: EffectResult::rejected("unknown item type: xyz"),
        };
        let json = serde_json::to_string(&outcome_json(&rejected)).unwrap();
        assert!(json.contains(r#""command":"show""#));
        assert!(json.contains(r#""success":false"#));
    }
}
