use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;
use simple_error::simple_error;
use url::Url;

use crate::download::fetch_json;
use crate::emote::{Emote, EmotePack};

pub const TITLE: &str = "bttv";
pub const SIZES: [&str; 3] = ["1x", "2x", "3x"];

const ID_PLACEHOLDER: &str = "{{id}}";
const SIZE_PLACEHOLDER: &str = "{{image}}";

#[derive(Debug, Clone, Deserialize)]
pub struct BttvEmote {
    pub id: String,
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BttvCatalog {
    /// Looks like `//cdn.betterttv.net/emote/{{id}}/{{image}}`
    pub url_template: String,
    pub emotes: Vec<BttvEmote>,
}

/// Fill the size placeholder and give scheme-relative templates a scheme,
/// leaving only the id placeholder
pub fn resolve_template(template: &str, size: &str) -> Result<String> {
    if !template.contains(ID_PLACEHOLDER) {
        return Err(simple_error!("url template `{}` has no id placeholder", template).into());
    }

    let resolved = template.replacen(SIZE_PLACEHOLDER, size, 1);
    if resolved.starts_with("//") {
        Ok(format!("https:{resolved}"))
    } else {
        Ok(resolved)
    }
}

pub fn make_url(template: &str, id: &str) -> Result<String> {
    let url = template.replacen(ID_PLACEHOLDER, id, 1);
    Url::parse(&url).with_context(|| format!("invalid bttv url `{url}`"))?;
    Ok(url)
}

pub fn emotes_from_catalog(catalog: BttvCatalog, size: &str) -> Result<Vec<Emote>> {
    let template = resolve_template(&catalog.url_template, size)?;
    catalog
        .emotes
        .into_iter()
        .map(|e| -> Result<Emote> {
            let url = make_url(&template, &e.id)?;
            Ok(Emote::new(e.code, url))
        })
        .collect()
}

pub async fn bttv_emotes(
    client: &reqwest::Client,
    catalog_url: &str,
    size: &str,
) -> Result<EmotePack> {
    let catalog: BttvCatalog = fetch_json(client, catalog_url).await?;
    let emotes = emotes_from_catalog(catalog, size)?;
    info!("there are {} bttv emotes to upload", emotes.len());
    Ok(EmotePack::new(TITLE, emotes))
}
