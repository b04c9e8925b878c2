use anyhow::Context;
use exam_seat_planner::config::Config;
use exam_seat_planner::{ClassroomStore, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    server::run_server(&config, ClassroomStore::new()).await
}
