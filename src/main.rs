use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fuel_watch::cache::{
    AlertStatusStore, CacheConfig, InMemoryAlertStatusStore, RedisAlertStatusStore, RedisClient,
};
use fuel_watch::client::FleetApiClient;
use fuel_watch::config::EnvironmentConfig;
use fuel_watch::routes::create_router;
use fuel_watch::services::{AnalysisService, MisuseDetector};
use fuel_watch::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging (RUST_LOG, por defecto info)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("⛽ Fuel Watch - Detección de mal uso de combustible");
    info!("==================================================");

    let config = EnvironmentConfig::from_env().map_err(|e| {
        error!("❌ Configuración inválida: {}", e);
        anyhow::anyhow!("Configuración inválida: {}", e)
    })?;

    let fleet = FleetApiClient::new(
        config.fleet_api_url.clone(),
        config.fleet_api_token.clone(),
        config.fleet_api_timeout,
    )?;
    info!("🌍 Entorno: {}", config.environment);
    info!("🔗 API de flota: {}", fleet.base_url());

    // Estados de alertas: Redis si está configurado, memoria si no
    let status_store: Arc<dyn AlertStatusStore> = match &config.redis_url {
        Some(redis_url) => {
            let cache_config = CacheConfig::new(redis_url.clone(), config.alert_status_ttl);
            let redis_client = RedisClient::new(cache_config).await.map_err(|e| {
                error!("❌ Error conectando a Redis: {}", e);
                anyhow::anyhow!("Error de Redis: {}", e)
            })?;
            Arc::new(RedisAlertStatusStore::new(redis_client))
        }
        None => {
            warn!("⚠️ REDIS_URL no definido: los estados de alertas se guardan en memoria");
            Arc::new(InMemoryAlertStatusStore::new())
        }
    };

    let detector = MisuseDetector::new(config.thresholds);
    info!("🔍 Umbrales de detección: {:?}", detector.thresholds());

    let analysis = AnalysisService::new(Arc::new(fleet), detector, status_store);
    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_router(AppState::new(config, analysis));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET   /health - Health check");
    info!("   GET   /api/fuel/alerts?status= - Alertas del último análisis");
    info!("   POST  /api/fuel/alerts/refresh - Ejecutar un análisis nuevo");
    info!("   PATCH /api/fuel/alerts/:alert_id/status - Avanzar estado de una alerta");
    info!("   GET   /api/fuel/reports/monthly?year= - Reporte mensual");
    info!("   GET   /api/fuel/reports/vehicles/:vehicle_id - Reporte por vehículo");
    info!("   GET   /api/fuel/summary?date= - Resumen de flota del mes");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
