//! Coordinador de análisis de mal uso
//!
//! Cada análisis toma un snapshot nuevo de la API de flota, ejecuta el
//! pipeline puro (agrupación, detección, ranking), vuelve a aplicar los
//! estados de revisión persistidos y publica el reporte.
//!
//! Política de refresco: gana el último análisis iniciado. Cada ejecución toma
//! un número de generación; al terminar solo publica si ninguna ejecución más
//! reciente empezó mientras tanto. La publicación y los cambios de estado se
//! serializan sobre el mismo `RwLock`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::cache::AlertStatusStore;
use crate::models::alert::{AlertStats, AlertStatus, MisuseAlert};
use crate::models::analytics::AnalysisReport;
use crate::models::data_quality::DataQualitySummary;
use crate::models::{AnalysisSnapshot, FuelHistoryFilter};
use crate::services::alert_ranker::rank_alerts;
use crate::services::grouping_service::group_by_vehicle;
use crate::services::misuse_detector::{DetectionThresholds, MisuseDetector};
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Origen de los datos de flota (la API real o un doble en tests)
#[async_trait]
pub trait FleetDataSource: Send + Sync {
    /// Registros (filtrados si el filtro no está vacío) y vehículos
    async fn fetch_snapshot(&self, filter: &FuelHistoryFilter) -> AppResult<AnalysisSnapshot>;
}

/// Pipeline puro: mismas entradas, misma salida
pub fn run_analysis(
    snapshot: &AnalysisSnapshot,
    detector: &MisuseDetector,
) -> (Vec<MisuseAlert>, DataQualitySummary) {
    let grouped = group_by_vehicle(snapshot);
    let alerts = rank_alerts(detector.detect(&grouped));

    let mut warnings = snapshot.ingestion_warnings().to_vec();
    warnings.extend(grouped.orphans.iter().cloned());
    let data_quality =
        DataQualitySummary::new(snapshot.received_records(), grouped.record_count(), warnings);

    (alerts, data_quality)
}

pub struct AnalysisService {
    source: Arc<dyn FleetDataSource>,
    detector: MisuseDetector,
    status_store: Arc<dyn AlertStatusStore>,
    generation: AtomicU64,
    latest: RwLock<Option<Arc<AnalysisReport>>>,
}

impl AnalysisService {
    pub fn new(
        source: Arc<dyn FleetDataSource>,
        detector: MisuseDetector,
        status_store: Arc<dyn AlertStatusStore>,
    ) -> Self {
        Self {
            source,
            detector,
            status_store,
            generation: AtomicU64::new(0),
            latest: RwLock::new(None),
        }
    }

    pub fn thresholds(&self) -> &DetectionThresholds {
        self.detector.thresholds()
    }

    /// Snapshot nuevo para los reportes (no toca el reporte publicado)
    pub async fn snapshot(&self, filter: &FuelHistoryFilter) -> AppResult<AnalysisSnapshot> {
        self.source.fetch_snapshot(filter).await
    }

    /// Último reporte publicado
    pub async fn latest(&self) -> Option<Arc<AnalysisReport>> {
        self.latest.read().await.clone()
    }

    /// Último reporte, o un análisis nuevo si todavía no hay ninguno
    pub async fn latest_or_run(&self) -> AppResult<Arc<AnalysisReport>> {
        if let Some(report) = self.latest().await {
            return Ok(report);
        }

        match self.refresh().await {
            // Otro análisis ganó la carrera: usar el suyo
            Err(AppError::Conflict(_)) => self
                .latest()
                .await
                .ok_or_else(|| AppError::ServiceUnavailable("Analysis in progress".to_string())),
            other => other,
        }
    }

    /// Ejecutar un análisis completo y publicarlo si sigue siendo el más reciente
    pub async fn refresh(&self) -> AppResult<Arc<AnalysisReport>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let run_id = Uuid::new_v4();
        log::info!("🔄 Análisis {} iniciado (generación {})", run_id, generation);

        let snapshot = self
            .source
            .fetch_snapshot(&FuelHistoryFilter::default())
            .await
            .map_err(|e| {
                log::error!("❌ Análisis {} abortado: {}", run_id, e);
                e
            })?;

        let (mut alerts, data_quality) = run_analysis(&snapshot, &self.detector);

        let mut latest = self.latest.write().await;
        let current = self.generation.load(Ordering::SeqCst);
        if current != generation {
            log::warn!(
                "⚠️ Análisis {} descartado: generación {} superada por {}",
                run_id,
                generation,
                current
            );
            return Err(AppError::Conflict(format!(
                "Analysis run {} was superseded by a newer run",
                run_id
            )));
        }

        // Bajo el lock de escritura: ningún cambio de estado se pierde
        let keys: Vec<_> = alerts.iter().map(MisuseAlert::key).collect();
        let statuses = self.status_store.load_many(&keys).await.map_err(|e| {
            log::error!("❌ No se pudieron cargar los estados de alertas: {}", e);
            AppError::ServiceUnavailable(format!("Alert status store unavailable: {}", e))
        })?;
        for alert in &mut alerts {
            if let Some(status) = statuses.get(&alert.key()) {
                alert.status = *status;
            }
        }

        let report = Arc::new(AnalysisReport {
            run_id,
            generation,
            generated_at: Utc::now(),
            stats: AlertStats::from_alerts(&alerts),
            alerts,
            data_quality,
        });

        log::info!(
            "✅ Análisis {} publicado: {} alertas ({} HIGH), {}/{} registros analizados",
            run_id,
            report.stats.total,
            report.stats.high,
            report.data_quality.analyzed_records,
            report.data_quality.total_records
        );

        *latest = Some(Arc::clone(&report));
        Ok(report)
    }

    /// Avanzar el estado de una alerta del reporte publicado
    pub async fn update_status(&self, alert_id: &str, target: AlertStatus) -> AppResult<MisuseAlert> {
        let mut latest = self.latest.write().await;
        let report = latest
            .as_ref()
            .ok_or_else(|| not_found_error("Alert", alert_id))?;

        let position = report
            .alerts
            .iter()
            .position(|alert| alert.id == alert_id)
            .ok_or_else(|| not_found_error("Alert", alert_id))?;

        let current = report.alerts[position].status;
        if !current.can_transition_to(target) {
            return Err(AppError::InvalidTransition { from: current, to: target });
        }

        let key = report.alerts[position].key();
        self.status_store.save(&key, target).await.map_err(|e| {
            log::error!("❌ No se pudo guardar el estado de {}: {}", key, e);
            AppError::ServiceUnavailable(format!("Alert status store unavailable: {}", e))
        })?;

        let mut updated = AnalysisReport::clone(report);
        updated.alerts[position].status = target;
        updated.stats = AlertStats::from_alerts(&updated.alerts);
        let alert = updated.alerts[position].clone();
        *latest = Some(Arc::new(updated));

        log::info!("📝 Alerta {}: {} -> {}", alert_id, current, target);
        Ok(alert)
    }
}
