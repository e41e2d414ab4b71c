use std::path::PathBuf;

use anyhow::Result;

use crate::emote::EmotePack;
use crate::endpoints::Endpoints;
use crate::opt::{Opt, Source};

/// One emote list provider, resolved against the configured endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Catalog {
    Twitch { url: String, image_template: String },
    Bttv { url: String, size: String },
    Manifest { path: PathBuf },
}

impl Catalog {
    pub fn new(opt: &Opt, endpoints: &Endpoints) -> Catalog {
        match opt.source {
            Source::Twitch => Self::Twitch {
                url: endpoints.twitch_catalog.clone(),
                image_template: endpoints.twitch_image_template.clone(),
            },
            Source::Bttv => Self::Bttv {
                url: endpoints.bttv_catalog.clone(),
                size: opt.bttv_size.clone(),
            },
            Source::Manifest => Self::Manifest {
                path: opt.file.clone(),
            },
        }
    }

    pub async fn fetch_emotes(&self, client: &reqwest::Client) -> Result<EmotePack> {
        match self {
            Catalog::Twitch {
                url,
                image_template,
            } => crate::twitch::twitch_emotes(client, url, image_template).await,
            Catalog::Bttv { url, size } => crate::bttv::bttv_emotes(client, url, size).await,
            Catalog::Manifest { path } => crate::manifest::load(path).await,
        }
    }
}

impl std::fmt::Display for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Catalog::Twitch { url, .. } => write!(f, "twitch catalog `{url}`"),
            Catalog::Bttv { url, .. } => write!(f, "bttv catalog `{url}`"),
            Catalog::Manifest { path } => write!(f, "manifest `{}`", path.display()),
        }
    }
}
