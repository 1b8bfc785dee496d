use serde::{Deserialize, Serialize};

pub const ENTITIES_FILE_NAME: &str = "entities.json";

/// Point-of-interest data written by the tile generator (`entities.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ViewerEntities {
    #[serde(default)]
    pub signs: Vec<Sign>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sign {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_text: Option<Vec<SignLine>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_text: Option<Vec<SignLine>>,
}

/// One line of sign text as a run of styled spans.
pub type SignLine = Vec<TextSpan>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextSpan {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underlined: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub obfuscated: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl TextSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

impl ViewerEntities {
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}
