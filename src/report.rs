use std::fmt::Display;

/// What happened to a single emote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Added,
    Rejected(String),
    FetchFailed,
    UploadFailed,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    pub acquired: usize,
    pub added: usize,
    pub rejected: usize,
    pub fetch_failed: usize,
    pub upload_failed: usize,
}

impl Report {
    pub fn new(acquired: usize) -> Report {
        Self {
            acquired,
            ..Default::default()
        }
    }
    pub fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Added => self.added += 1,
            ItemOutcome::Rejected(_) => self.rejected += 1,
            ItemOutcome::FetchFailed => self.fetch_failed += 1,
            ItemOutcome::UploadFailed => self.upload_failed += 1,
        }
    }
    pub fn attempted(&self) -> usize {
        self.added + self.rejected + self.upload_failed
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} emotes: {} added, {} rejected, {} failed to download, {} failed to upload",
            self.acquired, self.added, self.rejected, self.fetch_failed, self.upload_failed
        )
    }
}
