pub struct Env {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
}

impl Env {
    fn new() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set in .env file or environment variable");

        let db_max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .expect("DB_MAX_CONNECTIONS must be a valid u32 integer");
        let db_min_connections = std::env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<u32>()
            .expect("DB_MIN_CONNECTIONS must be a valid u32 integer");

        Env { database_url, db_max_connections, db_min_connections }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
