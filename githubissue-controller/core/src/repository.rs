use std::{fmt, str::FromStr};

/// Identifies a repository by owner and name.
///
/// Parsed from the trailing `<owner>/<repo>` segments of a repository URL such
/// as `https://github.com/OWNER/REPO`. The scheme and host are not inspected.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("repository URL {0:?} does not end with <owner>/<repo>")]
pub struct InvalidRepository(pub String);

// === impl Repository ===

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl FromStr for Repository {
    type Err = InvalidRepository;

    fn from_str(url: &str) -> Result<Self, Self::Err> {
        let mut segments = url.rsplitn(3, '/');
        match (segments.next(), segments.next()) {
            (Some(name), Some(owner)) if !name.is_empty() && !owner.is_empty() => {
                Ok(Self::new(owner, name))
            }
            _ => Err(InvalidRepository(url.to_string())),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
