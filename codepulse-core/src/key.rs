//! Resource keys and their endpoint mapping.

use std::fmt;
use std::str::FromStr;

const SEARCH_PREFIX: &str = "search:";

/// Identifier of one queryable unit of server data.
///
/// Search keys are parameterized by the submitted query text, so two
/// different queries are two different keys and cache independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Dashboard,
    Components,
    Features,
    Files,
    Stubs,
    Tasks,
    Search(String),
}

impl ResourceKey {
    /// Endpoint path for this key, relative to the API base URL.
    pub fn path(&self) -> String {
        match self {
            ResourceKey::Dashboard => "/api/dashboard".to_string(),
            ResourceKey::Components => "/api/components".to_string(),
            ResourceKey::Features => "/api/features".to_string(),
            ResourceKey::Files => "/api/files".to_string(),
            ResourceKey::Stubs => "/api/stubs".to_string(),
            ResourceKey::Tasks => "/api/tasks".to_string(),
            ResourceKey::Search(query) => {
                format!("/api/functions/search?query={}", urlencoding::encode(query))
            }
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self, ResourceKey::Search(_))
    }

    /// The fixed (non-parameterized) keys.
    pub fn fixed() -> &'static [ResourceKey] {
        &[
            ResourceKey::Dashboard,
            ResourceKey::Components,
            ResourceKey::Features,
            ResourceKey::Files,
            ResourceKey::Stubs,
            ResourceKey::Tasks,
        ]
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKey::Dashboard => write!(f, "dashboard"),
            ResourceKey::Components => write!(f, "components"),
            ResourceKey::Features => write!(f, "features"),
            ResourceKey::Files => write!(f, "files"),
            ResourceKey::Stubs => write!(f, "stubs"),
            ResourceKey::Tasks => write!(f, "tasks"),
            ResourceKey::Search(query) => write!(f, "{}{}", SEARCH_PREFIX, query),
        }
    }
}

/// Error when parsing an unknown resource key string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParseError(pub String);

impl fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid resource key: {}", self.0)
    }
}

impl std::error::Error for KeyParseError {}

impl FromStr for ResourceKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(query) = s.strip_prefix(SEARCH_PREFIX) {
            if query.trim().is_empty() {
                return Err(KeyParseError(s.to_string()));
            }
            return Ok(ResourceKey::Search(query.to_string()));
        }
        match s {
            "dashboard" => Ok(ResourceKey::Dashboard),
            "components" => Ok(ResourceKey::Components),
            "features" => Ok(ResourceKey::Features),
            "files" => Ok(ResourceKey::Files),
            "stubs" => Ok(ResourceKey::Stubs),
            "tasks" => Ok(ResourceKey::Tasks),
            _ => Err(KeyParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_paths() {
        assert_eq!(ResourceKey::Dashboard.path(), "/api/dashboard");
        assert_eq!(ResourceKey::Components.path(), "/api/components");
        assert_eq!(ResourceKey::Features.path(), "/api/features");
        assert_eq!(ResourceKey::Files.path(), "/api/files");
        assert_eq!(ResourceKey::Stubs.path(), "/api/stubs");
        assert_eq!(ResourceKey::Tasks.path(), "/api/tasks");
    }

    #[test]
    fn test_search_path_is_url_encoded() {
        let key = ResourceKey::Search("vmx exit&handler".to_string());
        assert_eq!(
            key.path(),
            "/api/functions/search?query=vmx%20exit%26handler"
        );
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(ResourceKey::Dashboard.to_string(), "dashboard");
        assert_eq!(
            ResourceKey::Search("cpuid".to_string()).to_string(),
            "search:cpuid"
        );
    }

    #[test]
    fn test_parse_known_keys() {
        for key in ResourceKey::fixed() {
            assert_eq!(key.to_string().parse::<ResourceKey>().unwrap(), *key);
        }
        assert_eq!(
            "search:ept".parse::<ResourceKey>().unwrap(),
            ResourceKey::Search("ept".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_unknown_and_empty_search() {
        assert!("epics".parse::<ResourceKey>().is_err());
        assert!("search:".parse::<ResourceKey>().is_err());
        assert!("search:   ".parse::<ResourceKey>().is_err());
    }

    #[test]
    fn test_distinct_queries_are_distinct_keys() {
        let a = ResourceKey::Search("a".to_string());
        let b = ResourceKey::Search("b".to_string());
        assert_ne!(a, b);
        assert!(a.is_search());
        assert!(!ResourceKey::Files.is_search());
    }
}
