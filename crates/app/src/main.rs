use engine::{Engine, StoreLocation};
use server::AllowedOrigins;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "finance={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let location = StoreLocation::parse(&settings.server.database);
    let engine = match open_store(&location).await {
        Ok(engine) => engine,
        Err(err) => {
            tracing::error!("failed to initialize database: {err}");
            return Err(err.into());
        }
    };

    let origins = AllowedOrigins::parse(&settings.cors.origins)?;
    tracing::info!(origins = ?settings.cors.origins, "allowed origins");

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return Err(err.into());
        }
    };

    if let Err(err) = server::run_with_listener(engine, origins, listener, shutdown_signal()).await {
        tracing::error!("server failed: {err}");
        return Err(err.into());
    }

    Ok(())
}

async fn open_store(location: &StoreLocation) -> Result<Engine, engine::EngineError> {
    let engine = Engine::open(location).await?;
    engine.ensure_schema().await?;
    Ok(engine)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
