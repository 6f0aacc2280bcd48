//! The composition root. The store, cache and event hooks are chosen here, once, from the [`ServerConfig`].
use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
#[cfg(feature = "sqlite")]
use score_engine::SqliteDatabase;
use score_engine::{
    events::{EventHandlers, EventProducers},
    InMemoryDatabase,
    MatchLifecycleApi,
    MatchStore,
    MemoryCache,
    NoCache,
    ResultCache,
};

use crate::{
    cache_worker::start_cache_purge_worker,
    config::{DatabaseConfig, ServerConfig},
    errors::ServerError,
    event_hooks::create_event_hooks,
    middleware::CspMiddlewareFactory,
    routes,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let hooks = create_event_hooks(config.event_webhook_url.as_deref());
    let handlers = EventHandlers::new(config.event_buffer_size, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    match config.database.clone() {
        #[cfg(feature = "sqlite")]
        DatabaseConfig::Sqlite { url, max_connections, run_migrations } => {
            let db = SqliteDatabase::new_with_url(&url, max_connections)
                .await
                .map_err(|e| ServerError::InitializeError(e.to_string()))?;
            if run_migrations {
                db.run_migrations().await?;
            }
            info!("🚀️ Using SQLite match store at {}", db.url());
            run_with_cache(config, db, producers).await
        },
        #[cfg(not(feature = "sqlite"))]
        DatabaseConfig::Sqlite { .. } => Err(ServerError::InitializeError(
            "This server was built without SQLite support. Set SCORE_DATABASE_URL=memory".to_string(),
        )),
        DatabaseConfig::InMemory => {
            info!("🚀️ Using in-memory match store");
            run_with_cache(config, InMemoryDatabase::new(), producers).await
        },
    }
}

async fn run_with_cache<B>(config: ServerConfig, db: B, producers: EventProducers) -> Result<(), ServerError>
where B: MatchStore + Clone + Send + 'static {
    let srv = if config.cache.enabled {
        let cache = MemoryCache::new(config.cache.ttl);
        info!("🚀️ Caching matches for {}s", config.cache.ttl.as_secs());
        let _worker = start_cache_purge_worker(cache.clone(), config.cache.ttl);
        create_server_instance(config, db, cache, producers)?
    } else {
        info!("🚀️ Match caching is disabled");
        create_server_instance(config, db, NoCache, producers)?
    };
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance<B, C>(
    config: ServerConfig,
    db: B,
    cache: C,
    producers: EventProducers,
) -> Result<Server, ServerError>
where
    B: MatchStore + Clone + Send + 'static,
    C: ResultCache + Clone + Send + 'static,
{
    let policy = config.content_security_policy.clone();
    let srv = HttpServer::new(move || {
        let api = MatchLifecycleApi::new(db.clone(), cache.clone(), producers.clone());
        App::new()
            .wrap(CspMiddlewareFactory::new(policy.as_deref()))
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %r").log_target("score::access_log"))
            .app_data(web::Data::new(api))
            .configure(routes::configure::<B, C>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
