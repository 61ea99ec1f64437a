use serde::{Deserialize, Serialize};

/// Read-only snapshot of the authenticated member's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default, alias = "display_name")]
    pub name: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "picture")]
    pub picture_url: Option<String>,
    #[serde(default, alias = "vanityName")]
    pub vanity_name: Option<String>,
}

impl Profile {
    /// Public profile URL on `web_base`, preferring the vanity name over the id.
    pub fn profile_url(&self, web_base: &str) -> String {
        let handle = self
            .vanity_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.id);
        format!("{}/in/{}/", web_base.trim_end_matches('/'), handle)
    }

    /// Name to show in the UI, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
