use depot_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let (state, router) = depot_api::setup::initialize_app(config.clone()).await?;

    depot_api::setup::server::start_server(&config, router).await?;

    // Jobs already running finish; nothing new is accepted.
    state.upload.shutdown();

    Ok(())
}
