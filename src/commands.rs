//! Settings panel commands
//!
//! The settings panel talks to the integration with small JSON messages
//! carrying an `id` and a `type`. Every message gets exactly one
//! [`Response`], either a result or an error with a code.
//!
//! ```
//! use mirage_theme::commands::{Command, CommandMessage};
//!
//! let msg: CommandMessage =
//!     serde_json::from_str(r#"{"id": 7, "type": "mirage/get_language"}"#).unwrap();
//! assert_eq!(msg.id, 7);
//! assert_eq!(msg.command, Command::GetLanguage);
//! ```

use serde::{Deserialize, Serialize};

pub const WS_TYPE_GET_SETTINGS: &str = "mirage/get_settings";
pub const WS_TYPE_GET_LANGUAGE: &str = "mirage/get_language";
pub const WS_TYPE_UPDATE_SETTINGS: &str = "mirage/update_settings";
pub const WS_TYPE_UPLOAD_IMAGE: &str = "mirage/upload_image";

/// Error codes returned to the panel
pub const ERR_INVALID_FORMAT: &str = "invalid_format";
pub const ERR_INVALID_SETTINGS: &str = "invalid_settings";
pub const ERR_UPLOAD_FAILED: &str = "upload_failed";
pub const ERR_SAVE_FAILED: &str = "save_failed";

/// A command from the settings panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Return the stored options
    #[serde(rename = "mirage/get_settings")]
    GetSettings,
    /// Return the host language
    #[serde(rename = "mirage/get_language")]
    GetLanguage,
    /// Replace the stored options and re-apply the theme
    #[serde(rename = "mirage/update_settings")]
    UpdateSettings { settings: serde_json::Value },
    /// Store a background image sent as a data URL
    #[serde(rename = "mirage/upload_image")]
    UploadImage { file_name: String, file_data: String },
}

impl Command {
    pub fn type_name(&self) -> &'static str {
        match self {
            Command::GetSettings => WS_TYPE_GET_SETTINGS,
            Command::GetLanguage => WS_TYPE_GET_LANGUAGE,
            Command::UpdateSettings { .. } => WS_TYPE_UPDATE_SETTINGS,
            Command::UploadImage { .. } => WS_TYPE_UPLOAD_IMAGE,
        }
    }
}

/// A command with its message id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandMessage {
    pub id: u64,
    #[serde(flatten)]
    pub command: Command,
}

/// Error details sent back to the panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

/// Reply to a command message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl Response {
    pub fn result(id: u64, result: serde_json::Value) -> Self {
        Self {
            id,
            kind: "result".to_string(),
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: u64, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id,
            kind: "result".to_string(),
            success: false,
            result: None,
            error: Some(ErrorInfo {
                code: code.into(),
                message: message.into(),
            }),
        }
    }

    /// Error code, if this is an error response
    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }
}

/// Parse a raw JSON message.
///
/// Messages that cannot be parsed are answered with an `invalid_format`
/// error, using the message `id` when one can be recovered.
pub fn parse_message(raw: &str) -> Result<CommandMessage, Response> {
    serde_json::from_str(raw).map_err(|e| {
        let id = serde_json::from_str::<serde_json::Value>(raw)
            .ok()
            .and_then(|v| v.get("id").and_then(|id| id.as_u64()))
            .unwrap_or(0);
        Response::error(id, ERR_INVALID_FORMAT, e.to_string())
    })
}
