use std::fmt;

/// Logical names of the persisted artifacts. The names double as file stems
/// and are read by the dashboard, so they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobKey {
    Followers,
    History,
    Latest,
    Stats,
}

impl BlobKey {
    pub const ALL: [BlobKey; 4] = [
        BlobKey::Followers,
        BlobKey::History,
        BlobKey::Latest,
        BlobKey::Stats,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            BlobKey::Followers => "followers",
            BlobKey::History => "history",
            BlobKey::Latest => "latest",
            BlobKey::Stats => "stats",
        }
    }

    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
