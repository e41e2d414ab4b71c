use derive_builder::Builder;

pub const TWITCH_CATALOG: &str = "https://twitchemotes.com/api_cache/v3/global.json";
pub const TWITCH_IMAGE_TEMPLATE: &str = "https://static-cdn.jtvnw.net/emoticons/v1/{id}/1.0";
pub const BTTV_CATALOG: &str = "https://api.betterttv.net/2/emotes";
pub const WORKSPACE_TEMPLATE: &str = "https://{team}.slack.com";
pub const EMOJI_ADD_PATH: &str = "/api/emoji.add";

/// Every remote location the pipeline talks to
#[derive(Debug, Clone, Builder)]
#[builder(default, setter(into))]
pub struct Endpoints {
    pub twitch_catalog: String,
    /// `{id}` is replaced with the numeric emote id
    pub twitch_image_template: String,
    pub bttv_catalog: String,
    /// `{team}` is replaced with the workspace name
    pub workspace_template: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            twitch_catalog: TWITCH_CATALOG.into(),
            twitch_image_template: TWITCH_IMAGE_TEMPLATE.into(),
            bttv_catalog: BTTV_CATALOG.into(),
            workspace_template: WORKSPACE_TEMPLATE.into(),
        }
    }
}

impl Endpoints {
    pub fn builder() -> EndpointsBuilder {
        EndpointsBuilder::default()
    }
    pub fn workspace_url(&self, team: &str) -> String {
        self.workspace_template.replace("{team}", team)
    }
    pub fn emoji_add_url(&self, team: &str) -> String {
        let base = self.workspace_url(team);
        format!("{}{EMOJI_ADD_PATH}", base.trim_end_matches('/'))
    }
}
