use std::env;
use std::path::PathBuf;

/// Default signing secret, matching the original deployment default.
/// Overriding it via `JWT_SECRET` is strongly advised outside development.
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key";

pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// Location of the JSON document holding all users and tasks.
    pub database_path: PathBuf,
    pub jwt_secret: String,
    /// CORS allow-list, comma-separated in the environment.
    pub allowed_origins: Vec<String>,
    pub openai_api_key: String,
    pub openai_api_base: String,
    pub chat_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, falling back to the built-in default");
            DEFAULT_JWT_SECRET.to_string()
        });

        Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/tasks.json".to_string())
                .into(),
            jwt_secret,
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            chat_timeout_secs: env::var("CHAT_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("CHAT_TIMEOUT_SECS must be a number"),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("SERVER_PORT", "3000");
        env::set_var("SERVER_HOST", "0.0.0.0");
        env::set_var("DATABASE_PATH", "custom/db.json");
        env::set_var("JWT_SECRET", "test-secret");
        env::set_var("ALLOWED_ORIGINS", "http://a.example, http://b.example");

        let config = Config::from_env();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.database_path, PathBuf::from("custom/db.json"));
        assert_eq!(config.jwt_secret, "test-secret");
        assert_eq!(
            config.allowed_origins,
            vec!["http://a.example".to_string(), "http://b.example".to_string()]
        );
        assert_eq!(config.server_url(), "http://0.0.0.0:3000");

        env::remove_var("SERVER_PORT");
        env::remove_var("SERVER_HOST");
        env::remove_var("DATABASE_PATH");
        env::remove_var("JWT_SECRET");
        env::remove_var("ALLOWED_ORIGINS");
    }
}
