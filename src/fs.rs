use std::path::Path;

use anyhow::Result;
use simple_error::simple_error;

pub async fn assert_dir(path: impl AsRef<Path>) -> Result<()> {
    match tokio::fs::metadata(path.as_ref()).await {
        Ok(meta) => {
            if meta.is_dir() {
                Ok(())
            } else {
                Err(simple_error!("path exists but is not a directory").into())
            }
        }
        Err(_) => Ok(tokio::fs::create_dir_all(path.as_ref()).await?),
    }
}

pub async fn assert_file(path: impl AsRef<Path>) -> Result<()> {
    let meta = tokio::fs::metadata(path.as_ref()).await?;
    if meta.is_file() {
        Ok(())
    } else {
        Err(simple_error!("path exists but is not a file").into())
    }
}
