use lazy_regex::regex_is_match;
use serde::{Deserialize, Serialize};

/// A named image that should end up as a custom emoji
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emote {
    pub name: String,
    #[serde(rename = "src")]
    pub source: String,
}

impl Emote {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Emote {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// The name the emoji is registered under
    pub fn emoji_name(&self) -> String {
        self.name.to_lowercase()
    }

    /// Whether the lowercased name only uses characters a workspace accepts for emoji names
    pub fn has_valid_emoji_name(&self) -> bool {
        regex_is_match!(r"^[a-z0-9_\-'+]+$", &self.emoji_name())
    }
}

/// Titled list of emotes, the shape of a manifest file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotePack {
    pub title: String,
    #[serde(default)]
    pub emojis: Vec<Emote>,
}

impl EmotePack {
    pub fn new(title: impl Into<String>, emojis: Vec<Emote>) -> EmotePack {
        Self {
            title: title.into(),
            emojis,
        }
    }
    pub fn len(&self) -> usize {
        self.emojis.len()
    }
    pub fn is_empty(&self) -> bool {
        self.emojis.is_empty()
    }
}
