//! Wire types for the subset of the Discord interactions API the bot uses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::feedback::{Reply, Visibility};

pub const INTERACTION_PING: u8 = 1;
pub const INTERACTION_APPLICATION_COMMAND: u8 = 2;

pub const RESPONSE_PONG: u8 = 1;
pub const RESPONSE_CHANNEL_MESSAGE: u8 = 4;

/// Message flag that hides a message from everyone but the invoking user.
pub const FLAG_EPHEMERAL: u64 = 1 << 6;

#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub application_id: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub token: String,
    pub data: Option<CommandData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
    #[serde(default)]
    pub resolved: Resolved,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandOption {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Resolved {
    #[serde(default)]
    pub attachments: HashMap<String, DiscordAttachment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordAttachment {
    pub filename: String,
    pub url: String,
    #[serde(default)]
    pub size: u64,
}

/// `GET /applications/@me`
#[derive(Debug, Clone, Deserialize)]
pub struct Application {
    pub id: String,
    pub name: String,
    pub verify_key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllowedMentions {
    pub parse: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessagePayload {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
    pub allowed_mentions: AllowedMentions,
}

impl From<Reply> for MessagePayload {
    fn from(reply: Reply) -> Self {
        let flags = match reply.visibility {
            Visibility::Ephemeral => Some(FLAG_EPHEMERAL),
            Visibility::Public => None,
        };
        Self {
            content: reply.content,
            flags,
            // model output must never ping anyone
            allowed_mentions: AllowedMentions { parse: Vec::new() },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<MessagePayload>,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self {
            kind: RESPONSE_PONG,
            data: None,
        }
    }

    pub fn message(reply: Reply) -> Self {
        Self {
            kind: RESPONSE_CHANNEL_MESSAGE,
            data: Some(reply.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_command_interaction_deserializes() {
        let payload = json!({
            "id": "1100",
            "application_id": "42",
            "type": 2,
            "token": "interaction-token",
            "data": {
                "id": "900",
                "name": "resume_reword",
                "type": 1,
                "options": [
                    {"name": "attachment", "type": 11, "value": "777"},
                    {"name": "level", "type": 3, "value": "senior"}
                ],
                "resolved": {
                    "attachments": {
                        "777": {
                            "id": "777",
                            "filename": "resume.pdf",
                            "size": 48213,
                            "url": "https://cdn.discordapp.com/attachments/1/777/resume.pdf",
                            "proxy_url": "https://media.discordapp.net/attachments/1/777/resume.pdf",
                            "content_type": "application/pdf"
                        }
                    }
                }
            },
            "member": {"user": {"id": "5", "username": "jane"}}
        });

        let interaction: Interaction = serde_json::from_value(payload).unwrap();
        assert_eq!(interaction.kind, INTERACTION_APPLICATION_COMMAND);
        let data = interaction.data.unwrap();
        assert_eq!(data.name, "resume_reword");
        assert_eq!(data.options.len(), 2);
        let attachment = &data.resolved.attachments["777"];
        assert_eq!(attachment.filename, "resume.pdf");
        assert_eq!(attachment.size, 48213);
    }

    #[test]
    fn test_ping_deserializes_without_data() {
        let interaction: Interaction =
            serde_json::from_value(json!({"id": "1", "application_id": "42", "type": 1, "token": "t"}))
                .unwrap();
        assert_eq!(interaction.kind, INTERACTION_PING);
        assert!(interaction.data.is_none());
    }

    #[test]
    fn test_pong_serializes_without_data() {
        let value = serde_json::to_value(InteractionResponse::pong()).unwrap();
        assert_eq!(value, json!({"type": 1}));
    }

    #[test]
    fn test_ephemeral_reply_sets_flag_and_disables_mentions() {
        let value =
            serde_json::to_value(InteractionResponse::message(Reply::ephemeral("hidden"))).unwrap();
        assert_eq!(
            value,
            json!({
                "type": 4,
                "data": {"content": "hidden", "flags": 64, "allowed_mentions": {"parse": []}}
            })
        );
    }

    #[test]
    fn test_public_reply_has_no_flags() {
        let payload = MessagePayload::from(Reply::public("visible"));
        let value = serde_json::to_value(payload).unwrap();
        assert!(value.get("flags").is_none());
        assert_eq!(value["content"], "visible");
    }
}
