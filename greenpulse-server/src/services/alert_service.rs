use std::collections::VecDeque;

use tokio::sync::RwLock;

use crate::models::alert::{AlertEvent, AlertKind};

pub const ALERT_CAPACITY: usize = 20;

/// Bounded, newest-first log of alerts. Nothing is persisted.
pub struct AlertService {
    alerts: RwLock<VecDeque<AlertEvent>>,
    capacity: usize,
}

impl AlertService {
    pub fn new() -> Self {
        Self::with_capacity(ALERT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            alerts: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub async fn record(
        &self,
        kind: AlertKind,
        room_code: &str,
        room_name: &str,
        message: &str,
    ) -> AlertEvent {
        let alert = AlertEvent::new(kind, room_code, room_name, message);

        let mut alerts = self.alerts.write().await;
        alerts.push_front(alert.clone());
        alerts.truncate(self.capacity);

        alert
    }

    pub async fn list(&self) -> Vec<AlertEvent> {
        self.alerts.read().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.alerts.read().await.len()
    }
}

impl Default for AlertService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_newest_first() {
        let service = AlertService::new();

        service.record(AlertKind::Warning, "B2", "Break Room", "first").await;
        service.record(AlertKind::Warning, "C2", "Training Room", "second").await;

        let alerts = service.list().await;
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].message, "second");
        assert_eq!(alerts[1].room_id, "B2");
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let service = AlertService::new();

        for index in 0..25 {
            service
                .record(AlertKind::Warning, "B2", "Break Room", &format!("alert {index}"))
                .await;
        }

        let alerts = service.list().await;
        assert_eq!(alerts.len(), ALERT_CAPACITY);
        assert_eq!(alerts.first().unwrap().message, "alert 24");
        assert_eq!(alerts.last().unwrap().message, "alert 5");
        assert!(alerts.iter().all(|a| a.message != "alert 4"));
    }

    #[tokio::test]
    async fn test_no_deduplication() {
        let service = AlertService::new();

        service.record(AlertKind::Warning, "B2", "Break Room", "same").await;
        service.record(AlertKind::Warning, "B2", "Break Room", "same").await;

        assert_eq!(service.len().await, 2);
    }
}
