//! Background persistence of click events.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::application::services::UrlService;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{ClickRepository, LinkRepository};

/// Retries after the first failed write.
const MAX_RETRIES: usize = 3;

/// Consumes click events until every sender is dropped.
///
/// Each event is written on its own task, with at most `concurrency` writes in
/// flight. Failed writes are retried with jittered exponential backoff
/// (~100ms, 200ms, 400ms) and then logged and counted; they never reach the
/// client that triggered the redirect.
///
/// Returns once the channel is closed and all in-flight writes finished.
pub async fn run_click_worker<L, C>(
    mut rx: mpsc::Receiver<ClickEvent>,
    service: Arc<UrlService<L, C>>,
    concurrency: usize,
) where
    L: LinkRepository + ?Sized + 'static,
    C: ClickRepository + ?Sized + 'static,
{
    let limit = concurrency.clamp(1, u32::MAX as usize);
    let permits = Arc::new(Semaphore::new(limit));

    tracing::info!(concurrency = limit, "Click worker started");

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let service = service.clone();

        tokio::spawn(async move {
            persist_click(&service, event).await;
            drop(permit);
        });
    }

    // Wait for in-flight writes before reporting shutdown.
    let _ = permits.acquire_many(limit as u32).await;
    tracing::info!("Click worker stopped");
}

async fn persist_click<L, C>(service: &UrlService<L, C>, event: ClickEvent)
where
    L: LinkRepository + ?Sized,
    C: ClickRepository + ?Sized,
{
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(50)
        .max_delay(Duration::from_secs(2))
        .map(jitter)
        .take(MAX_RETRIES);

    let result = Retry::spawn(strategy, || {
        service.record_click(event.link_id, &event.referer, &event.user_agent, &event.ip)
    })
    .await;

    match result {
        Ok(()) => {
            metrics::counter!("clicks_recorded_total").increment(1);
        }
        Err(e) => {
            metrics::counter!("clicks_failed_total").increment(1);
            tracing::error!(
                link_id = event.link_id,
                error = %e,
                "Failed to record click after retries"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::UrlServiceSettings;
    use crate::domain::repositories::{MockClickRepository, MockLinkRepository};
    use crate::error::AppError;
    use crate::utils::code_generator::CodeGenerator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn service(clicks: MockClickRepository) -> Arc<UrlService<MockLinkRepository, MockClickRepository>> {
        Arc::new(UrlService::new(
            Arc::new(MockLinkRepository::new()),
            Arc::new(clicks),
            CodeGenerator::os(),
            UrlServiceSettings {
                base_url: "http://localhost:8080".to_string(),
                code_length: 6,
                default_expiry_days: 0,
            },
        ))
    }

    fn event(link_id: i64) -> ClickEvent {
        ClickEvent::new(link_id, None, Some("curl/8.0"), "127.0.0.1".to_string())
    }

    #[tokio::test]
    async fn test_worker_persists_every_event() {
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_record_click()
            .withf(|click| click.user_agent.as_deref() == Some("curl/8.0"))
            .times(3)
            .returning(|_| Ok(()));

        let (tx, rx) = mpsc::channel(8);
        let worker = tokio::spawn(run_click_worker(rx, service(clicks), 2));

        for id in 1..=3 {
            tx.send(event(id)).await.unwrap();
        }
        drop(tx);

        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_retries_transient_failure() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();

        let mut clicks = MockClickRepository::new();
        clicks.expect_record_click().times(2).returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(AppError::StorageFailure(sqlx::Error::PoolTimedOut))
            } else {
                Ok(())
            }
        });

        let (tx, rx) = mpsc::channel(1);
        let worker = tokio::spawn(run_click_worker(rx, service(clicks), 1));

        tx.send(event(1)).await.unwrap();
        drop(tx);
        worker.await.unwrap();

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_worker_gives_up_after_retries() {
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_record_click()
            .times(MAX_RETRIES + 1)
            .returning(|_| Err(AppError::StorageFailure(sqlx::Error::PoolTimedOut)));

        let (tx, rx) = mpsc::channel(1);
        let worker = tokio::spawn(run_click_worker(rx, service(clicks), 1));

        tx.send(event(1)).await.unwrap();
        drop(tx);

        worker.await.unwrap();
    }
}
