//! Slash-command definitions and option parsing.

use serde::Serialize;
use thiserror::Error;

use crate::discord::models::CommandData;
use crate::models::{Attachment, Invocation};

pub const RESUME_REWORD: &str = "resume_reword";

const CHAT_INPUT: u8 = 1;
const OPTION_STRING: u8 = 3;
const OPTION_ATTACHMENT: u8 = 11;

#[derive(Debug, Clone, Serialize)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub kind: u8,
    pub options: Vec<OptionDefinition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub kind: u8,
    pub required: bool,
}

/// The full command list; registering it replaces whatever was there before.
pub fn command_definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition {
        name: RESUME_REWORD,
        description: "Upload your resume as a PDF and get AI-powered feedback.",
        kind: CHAT_INPUT,
        options: vec![
            OptionDefinition {
                name: "attachment",
                description: "Your resume as a PDF file",
                kind: OPTION_ATTACHMENT,
                required: true,
            },
            OptionDefinition {
                name: "level",
                description: "Target seniority, e.g. junior or senior",
                kind: OPTION_STRING,
                required: true,
            },
        ],
    }]
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("missing required option '{0}'")]
    MissingOption(&'static str),

    #[error("attachment '{0}' was not included in the resolved data")]
    UnresolvedAttachment(String),
}

/// Builds an `Invocation` from a `resume_reword` command payload.
pub fn parse_resume_reword(data: &CommandData) -> Result<Invocation, CommandError> {
    if data.name != RESUME_REWORD {
        return Err(CommandError::UnknownCommand(data.name.clone()));
    }

    let attachment_id = string_option(data, "attachment", OPTION_ATTACHMENT)?;
    let level = string_option(data, "level", OPTION_STRING)?;

    let resolved = data
        .resolved
        .attachments
        .get(attachment_id)
        .ok_or_else(|| CommandError::UnresolvedAttachment(attachment_id.to_string()))?;

    Ok(Invocation::new(
        Attachment {
            filename: resolved.filename.clone(),
            url: resolved.url.clone(),
            size: resolved.size,
        },
        level,
    ))
}

fn string_option<'a>(
    data: &'a CommandData,
    name: &'static str,
    kind: u8,
) -> Result<&'a str, CommandError> {
    data.options
        .iter()
        .find(|o| o.name == name && o.kind == kind)
        .and_then(|o| o.value.as_ref())
        .and_then(|v| v.as_str())
        .ok_or(CommandError::MissingOption(name))
}
