use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use crate::download;
use crate::emote::{Emote, EmotePack};
use crate::endpoints::Endpoints;
use crate::opt::{Credentials, Opt};
use crate::report::{ItemOutcome, Report};
use crate::slack::{self, UploadForm, UploadOutcome};
use crate::source::Catalog;

#[derive(Debug, Clone)]
pub struct Context {
    pub opt: Arc<Opt>,
    pub credentials: Credentials,
    pub client: reqwest::Client,
    pub endpoints: Endpoints,
}

fn endpoints(opt: &Opt) -> Result<Endpoints> {
    let mut builder = Endpoints::builder();
    if let Some(url) = &opt.twitch_catalog_url {
        builder.twitch_catalog(url.as_str());
    }
    if let Some(template) = &opt.twitch_image_template {
        builder.twitch_image_template(template.as_str());
    }
    if let Some(url) = &opt.bttv_catalog_url {
        builder.bttv_catalog(url.as_str());
    }
    if let Some(url) = &opt.workspace_url {
        builder.workspace_template(url.as_str());
    }
    Ok(builder.build()?)
}

fn progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {elapsed}") {
        bar.set_style(style);
    }
    bar
}

impl Context {
    pub fn new(opt: Opt, credentials: Credentials) -> Result<Context> {
        Ok(Context {
            client: download::client(Duration::from_secs(opt.timeout))?,
            endpoints: endpoints(&opt)?,
            opt: Arc::new(opt),
            credentials,
        })
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::new(&self.opt, &self.endpoints)
    }
    pub fn upload_url(&self) -> String {
        self.endpoints.emoji_add_url(&self.credentials.team)
    }

    /// Fetch the whole emote list, any failure here ends the run
    pub async fn acquire(&self) -> Result<EmotePack> {
        let catalog = self.catalog();
        let pack = catalog
            .fetch_emotes(&self.client)
            .await
            .with_context(|| format!("couldn't load emotes from {catalog}"))?;
        if pack.is_empty() {
            warn!("{catalog} contains no emotes");
        } else {
            info!("acquired {} emotes from {catalog}", pack.len());
        }
        Ok(pack)
    }

    pub async fn process_emote(&self, emote: &Emote, upload_url: &str) -> ItemOutcome {
        if !emote.has_valid_emoji_name() {
            warn!(
                "`{}` is not a valid emoji name, the upload will likely be rejected",
                emote.emoji_name()
            );
        }

        let dl = match download::download(&self.client, &emote.source).await {
            Ok(dl) => dl,
            Err(err) => {
                warn!(
                    "couldn't download emote `{}` from `{}`: {err}",
                    emote.name, emote.source
                );
                return ItemOutcome::FetchFailed;
            }
        };
        info!("downloaded emote `{}` ({})", emote.name, dl.data.len());

        let form = UploadForm::new(dl.data, &emote.name, &self.credentials.token);
        let outcome = match slack::upload(&self.client, upload_url, form).await {
            Ok(UploadOutcome::Added) => {
                info!("added emoji `:{}:`", emote.emoji_name());
                ItemOutcome::Added
            }
            Ok(UploadOutcome::Rejected(error)) => {
                warn!("emoji `:{}:` was rejected: {error}", emote.emoji_name());
                ItemOutcome::Rejected(error)
            }
            Err(err) => {
                warn!("couldn't upload emoji `:{}:`: {err}", emote.emoji_name());
                ItemOutcome::UploadFailed
            }
        };

        if self.opt.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.opt.delay_ms)).await;
        }
        outcome
    }

    pub async fn process_emotes(&self, emotes: &[Emote]) -> Report {
        let upload_url = self.upload_url();
        let bar = progress_bar(emotes.len());
        let mut report = Report::new(emotes.len());

        let mut iter = futures::stream::iter(emotes)
            .map(|emote| self.process_emote(emote, &upload_url))
            .buffer_unordered(self.opt.parallel.max(1));
        while let Some(outcome) = iter.next().await {
            report.record(&outcome);
            bar.inc(1);
        }

        bar.finish_and_clear();
        report
    }

    pub async fn run(&self) -> Result<Report> {
        let pack = self.acquire().await?;

        if let Some(dir) = &self.opt.export {
            crate::manifest::save(&pack, dir).await?;
        }

        if self.opt.list {
            for emote in &pack.emojis {
                println!("{}\t{}", emote.emoji_name(), emote.source);
            }
            return Ok(Report::new(pack.len()));
        }

        Ok(self.process_emotes(&pack.emojis).await)
    }
}
