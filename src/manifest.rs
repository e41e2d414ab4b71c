use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use simple_error::simple_error;

use crate::emote::EmotePack;

/// `<title>.yaml`, refusing titles that would leave the target directory
fn make_file_name_yaml(title: &str) -> Result<PathBuf> {
    let title = title.trim();
    if title.is_empty() {
        return Err(simple_error!("can't save a manifest without a title").into());
    }
    if title == "." || title == ".." || title.contains(['/', '\\', '\0']) {
        return Err(
            simple_error!("manifest title `{}` can't be used as a file name", title).into(),
        );
    }
    Ok(PathBuf::from(format!("{title}.yaml")))
}

pub fn parse(data: &str) -> Result<EmotePack> {
    Ok(serde_yaml::from_str(data)?)
}

pub fn to_yaml(pack: &EmotePack) -> Result<String> {
    Ok(serde_yaml::to_string(pack)?)
}

/// Load an emote pack from a YAML manifest
pub async fn load(path: impl AsRef<Path>) -> Result<EmotePack> {
    let path = path.as_ref();
    crate::fs::assert_file(path)
        .await
        .with_context(|| format!("couldn't open manifest `{}`", path.display()))?;

    let data = tokio::fs::read_to_string(path).await?;
    let pack = parse(&data).with_context(|| format!("invalid manifest `{}`", path.display()))?;

    info!(
        "loaded manifest `{}` with {} emotes",
        pack.title,
        pack.emojis.len()
    );
    Ok(pack)
}

/// Write the pack to `<dir>/<title>.yaml` and return that path
pub async fn save(pack: &EmotePack, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let file_name = make_file_name_yaml(&pack.title)?;
    crate::fs::assert_dir(dir.as_ref()).await?;
    let path = dir.as_ref().join(file_name);
    tokio::fs::write(&path, to_yaml(pack)?)
        .await
        .with_context(|| format!("couldn't write manifest `{}`", path.display()))?;

    info!("wrote manifest `{}`", path.display());
    Ok(path)
}
