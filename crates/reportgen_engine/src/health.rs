use reportgen_logging::{report_info, report_warn};

use crate::ReportApi;

/// True only for a success status whose body reports `"status": "healthy"`.
/// Every failure is logged and folded into `false`.
pub async fn check_health(api: &dyn ReportApi) -> bool {
    match api.health().await {
        Ok(report) if report.is_healthy() => {
            report_info!("API status: {} ({:?})", report.status, report.timestamp);
            true
        }
        Ok(report) => {
            report_warn!("API reported status {:?}", report.status);
            false
        }
        Err(err) => {
            report_warn!("API unavailable: {}", err);
            false
        }
    }
}
