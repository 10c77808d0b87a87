use uuid::Uuid;

/// A file uploaded alongside a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    /// Where the bytes can be downloaded from.
    pub url: String,
    pub size: u64,
}

/// One user-triggered `resume_reword` request.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub id: Uuid,
    pub attachment: Attachment,
    pub level: String,
}

impl Invocation {
    pub fn new(attachment: Attachment, level: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            attachment,
            level: level.into(),
        }
    }
}
