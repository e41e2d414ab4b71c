use std::collections::BTreeMap;

use anyhow::Result;
use log::info;
use serde::Deserialize;

use crate::download::fetch_json;
use crate::emote::{Emote, EmotePack};

pub const TITLE: &str = "twitch";

/// Twitch emote IDs are plain integers, unlike BTTV's hex strings
#[derive(Debug, Clone, Deserialize)]
pub struct TwitchEmote {
    pub id: u64,
    pub code: String,
}

/// The catalog maps each emote name to its entry
pub type TwitchCatalog = BTreeMap<String, TwitchEmote>;

pub fn make_url(template: &str, id: u64) -> String {
    template.replace("{id}", &id.to_string())
}

pub fn emotes_from_catalog(catalog: TwitchCatalog, image_template: &str) -> Vec<Emote> {
    catalog
        .into_values()
        .map(|e| Emote::new(e.code, make_url(image_template, e.id)))
        .collect()
}

pub async fn twitch_emotes(
    client: &reqwest::Client,
    catalog_url: &str,
    image_template: &str,
) -> Result<EmotePack> {
    let catalog: TwitchCatalog = fetch_json(client, catalog_url).await?;
    let emotes = emotes_from_catalog(catalog, image_template);
    info!("there are {} twitch emotes to upload", emotes.len());
    Ok(EmotePack::new(TITLE, emotes))
}
