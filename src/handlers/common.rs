use serde::Deserialize;

/// Query parameters shared by the table listing endpoints.
#[derive(Debug, Deserialize)]
pub struct TableParams {
    #[serde(default = "default_page")]
    pub page: u64,
    pub search: Option<String>,
}

fn default_page() -> u64 {
    1
}

impl TableParams {
    /// 1-based page number; page 0 is clamped to 1.
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }
}
