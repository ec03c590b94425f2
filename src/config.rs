use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL database connection URL; the in-memory store is used when unset
    #[serde(default)]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// HMAC secret used to sign bearer tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Bearer token lifetime in seconds
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// bcrypt work factor for stored passwords
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Upper bound applied to the `limit` query parameter
    #[serde(default = "default_max_page_limit")]
    pub max_page_limit: usize,

    /// Genres used for users that never set genre preferences
    #[serde(default = "default_genres")]
    pub default_genres: Vec<String>,

    /// Actors used for users that never set genre preferences
    #[serde(default = "default_actors")]
    pub default_actors: Vec<String>,

    /// Base URL used when building shareable links
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

fn default_db_max_connections() -> u32 {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_jwt_secret() -> String {
    "change-me".to_string()
}

fn default_token_ttl_secs() -> u64 {
    3600
}

fn default_bcrypt_cost() -> u32 {
    10
}

fn default_max_page_limit() -> usize {
    100
}

fn default_genres() -> Vec<String> {
    vec!["Action".into(), "Drama".into(), "Comedy".into()]
}

fn default_actors() -> Vec<String> {
    vec![
        "Leonardo DiCaprio".into(),
        "Tom Hardy".into(),
        "Morgan Freeman".into(),
    ]
}

fn default_public_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            db_max_connections: default_db_max_connections(),
            host: default_host(),
            port: default_port(),
            jwt_secret: default_jwt_secret(),
            token_ttl_secs: default_token_ttl_secs(),
            bcrypt_cost: default_bcrypt_cost(),
            max_page_limit: default_max_page_limit(),
            default_genres: default_genres(),
            default_actors: default_actors(),
            public_base_url: default_public_base_url(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_environment() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();

        assert!(config.database_url.is_none());
        assert_eq!(config.port, 5000);
        assert_eq!(config.max_page_limit, 100);
        assert_eq!(config.default_genres, vec!["Action", "Drama", "Comedy"]);
        assert_eq!(config.default_actors.len(), 3);
    }

    #[test]
    fn test_default_preferences_override() {
        let vars = vec![
            ("DEFAULT_GENRES".to_string(), "Horror,Thriller".to_string()),
            ("PORT".to_string(), "8080".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.default_genres, vec!["Horror", "Thriller"]);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }
}
