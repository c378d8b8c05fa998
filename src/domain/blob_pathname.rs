use std::fmt;

use uuid::Uuid;

/// Opaque handle of an uploaded file in blob storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobPathname(String);

impl BlobPathname {
    /// Mint a fresh pathname for an upload: `<uuid>/<sanitized file name>`.
    pub fn generate(file_name: &str) -> Self {
        let safe: String = file_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        Self(format!("{}/{}", Uuid::new_v4(), safe))
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobPathname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
