//! Server bootstrap: configuration, storage, database, reconciliation, HTTP.

use shutterbin_core::{Clock, SystemClock};
use shutterbin_database::{SqliteMediaRepository, build_pool, run_migrations};
use shutterbin_error::{
    DatabaseError, DatabaseErrorKind, ServerError, ServerErrorKind, ShutterbinResult,
};
use shutterbin_quota::UsageLedger;
use shutterbin_server::{
    AppState, ExpirationSweeper, MediaService, ShutterbinConfig, init_observability, reconcile,
    router,
};
use shutterbin_storage::FileSystemStorage;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ShutterbinResult<()> {
    dotenvy::dotenv().ok();
    init_observability();

    let config = ShutterbinConfig::load()?;

    let storage = Arc::new(FileSystemStorage::new(config.media_root())?);

    let pool = build_pool(config.database_url())?;
    let mut conn = pool
        .get()
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))?;
    run_migrations(&mut conn)?;
    drop(conn);

    let repository = Arc::new(SqliteMediaRepository::new(pool));
    let ledger = Arc::new(UsageLedger::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // The ledger must reflect every live record before the first request
    reconcile(repository.as_ref(), &ledger, clock.now().naive_utc()).await?;

    let service = Arc::new(MediaService::new(
        storage.clone(),
        repository.clone(),
        ledger.clone(),
        clock.clone(),
        config.quota(),
        config.retention(),
    ));
    let sweeper = Arc::new(ExpirationSweeper::new(storage, repository, ledger));

    // Leave headroom over the per-file ceiling for multipart framing
    let upload_body_limit = *config.quota().max_file_bytes() as usize + 1024 * 1024;
    let app = router(AppState::new(service, sweeper, clock, upload_body_limit));

    let listener = tokio::net::TcpListener::bind(config.server_address())
        .await
        .map_err(|e| {
            ServerError::new(ServerErrorKind::Bind(format!(
                "{}: {}",
                config.server_address(),
                e
            )))
        })?;

    tracing::info!(address = %config.server_address(), "Serving shutterbin");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| ServerError::new(ServerErrorKind::Bind(e.to_string())))?;

    Ok(())
}
