use std::fmt;

/// A chat addressed either by numeric id or by public `@username`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRef {
    /// Numeric chat id (channels and supergroups are negative, `-100...`).
    Id(i64),
    /// Public username without the leading `@`.
    Username(String),
}

impl ChatRef {
    /// Parse `-1001234`, `@name` or `name`. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Username(trimmed.trim_start_matches('@').to_string()),
        }
    }

    /// Value for a Bot API `chat_id` parameter.
    pub fn to_api_value(&self) -> serde_json::Value {
        match self {
            Self::Id(id) => serde_json::json!(id),
            Self::Username(name) => serde_json::json!(format!("@{name}")),
        }
    }

    /// Whether a chat object from an update refers to this chat.
    pub(super) fn matches(&self, chat_id: i64, username: Option<&str>) -> bool {
        match self {
            Self::Id(id) => *id == chat_id,
            Self::Username(name) => username.is_some_and(|other| other.eq_ignore_ascii_case(name)),
        }
    }
}

impl fmt::Display for ChatRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Username(name) => write!(f, "@{name}"),
        }
    }
}
