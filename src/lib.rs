use std::sync::LazyLock;

pub mod api;
pub mod configs;
pub mod constants;
pub mod modules;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});
