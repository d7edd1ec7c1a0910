use serde::{Deserialize, Serialize};

/// A page the crawler decided is worth auditing.
///
/// `depth` is the BFS distance from the seed (the seed itself is 0).
/// `title` is only filled in once the page has loaded successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageToScan {
    pub url: String,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl PageToScan {
    pub fn new(url: String, depth: usize) -> Self {
        Self {
            url,
            depth,
            title: None,
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title.filter(|t| !t.trim().is_empty());
        self
    }
}
