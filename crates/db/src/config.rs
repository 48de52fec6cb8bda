use std::path::PathBuf;

/// Default number of pooled connections for file-backed databases.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const DEFAULT_DATABASE_PATH: &str = "~/Databases/midnight-post.sqlite";
const DEFAULT_TEST_DATABASE_PATH: &str = "~/Databases/midnight-post-test.sqlite";

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// Volatile database discarded when the pool closes.
    InMemory,
    File(PathBuf),
}

/// Storage configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub location: DbLocation,
    /// Pool size for file-backed databases. In-memory pools always use one.
    pub max_connections: u32,
}

impl DbConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                                  |
    /// |----------------------|------------------------------------------|
    /// | `DATABASE_PATH`      | `~/Databases/midnight-post.sqlite`       |
    /// | `TEST_MODE`          | `false`                                  |
    /// | `TEST_DATABASE_PATH` | `~/Databases/midnight-post-test.sqlite`  |
    /// | `DB_MAX_CONNECTIONS` | `5`                                      |
    ///
    /// An empty path selects an in-memory database.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let test_mode = lookup("TEST_MODE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let raw_path = if test_mode {
            lookup("TEST_DATABASE_PATH").unwrap_or_else(|| DEFAULT_TEST_DATABASE_PATH.into())
        } else {
            lookup("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.into())
        };

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        default = DEFAULT_MAX_CONNECTIONS,
                        "Invalid DB_MAX_CONNECTIONS, using default"
                    );
                    DEFAULT_MAX_CONNECTIONS
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Self {
            location: resolve_location(&raw_path, lookup("HOME").as_deref()),
            max_connections,
        }
    }

    /// Configuration for a volatile in-memory database.
    pub fn in_memory() -> Self {
        Self {
            location: DbLocation::InMemory,
            max_connections: 1,
        }
    }

    /// Replace the location with `path`, resolved the same way as the
    /// environment value.
    pub fn with_path(self, path: &str) -> Self {
        let home = std::env::var("HOME").ok();
        Self {
            location: resolve_location(path, home.as_deref()),
            ..self
        }
    }
}

/// Turn a configured path into a location, expanding a leading `~/`.
fn resolve_location(raw: &str, home: Option<&str>) -> DbLocation {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        tracing::warn!(
            "Using volatile in-memory database; data will be lost when the process exits. \
             Set DATABASE_PATH to persist posts."
        );
        return DbLocation::InMemory;
    }
    match (trimmed.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => DbLocation::File(PathBuf::from(home).join(rest)),
        _ => DbLocation::File(PathBuf::from(trimmed)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> DbConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DbConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_expand_home() {
        let config = config_from(&[("HOME", "/home/ada")]);
        assert_eq!(
            config.location,
            DbLocation::File(PathBuf::from("/home/ada/Databases/midnight-post.sqlite"))
        );
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn test_mode_uses_test_path() {
        let config = config_from(&[
            ("TEST_MODE", "true"),
            ("DATABASE_PATH", "/srv/live.sqlite"),
            ("TEST_DATABASE_PATH", "/tmp/test.sqlite"),
        ]);
        assert_eq!(config.location, DbLocation::File(PathBuf::from("/tmp/test.sqlite")));
    }

    #[test]
    fn empty_path_is_in_memory() {
        let config = config_from(&[("DATABASE_PATH", "")]);
        assert_eq!(config.location, DbLocation::InMemory);
    }

    #[test]
    fn tilde_without_home_is_left_alone() {
        let config = config_from(&[("DATABASE_PATH", "~/posts.sqlite")]);
        assert_eq!(config.location, DbLocation::File(PathBuf::from("~/posts.sqlite")));
    }

    #[test]
    fn invalid_max_connections_falls_back() {
        let config = config_from(&[("DB_MAX_CONNECTIONS", "lots")]);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);

        let config = config_from(&[("DB_MAX_CONNECTIONS", "0")]);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);

        let config = config_from(&[("DB_MAX_CONNECTIONS", "12")]);
        assert_eq!(config.max_connections, 12);
    }
}
