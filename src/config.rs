use std::env;

const DEFAULT_DISCOVER_URL: &str = "https://discover.search.hereapi.com/v1/discover";
const DEFAULT_LOOKUP_URL: &str = "https://lookup.search.hereapi.com/v1/lookup";

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub here_api_key: String,
    pub here_discover_url: String,
    pub here_lookup_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set"),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a number"),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            here_api_key: env::var("HERE_API_KEY")
                .expect("HERE_API_KEY must be set"),
            here_discover_url: env::var("HERE_DISCOVER_URL")
                .unwrap_or_else(|_| DEFAULT_DISCOVER_URL.to_string()),
            here_lookup_url: env::var("HERE_LOOKUP_URL")
                .unwrap_or_else(|_| DEFAULT_LOOKUP_URL.to_string()),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
