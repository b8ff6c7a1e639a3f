//! サーバーの定期ヘルスチェック
//!
//! 起動直後に1回、その後は一定間隔でチェックを実行し、状態を `watch` チャネルで配信する。
//! 1回のチェックが間隔内に終わらなければオフラインとみなす。
//! `HealthMonitor` をdropするとポーリングも止まる。

use meme_gen_common::ServerStatus;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct HealthMonitor {
    task: JoinHandle<()>,
    status: watch::Receiver<ServerStatus>,
}

impl HealthMonitor {
    pub fn start<P, Fut>(check: P, period: Duration) -> Self
    where
        P: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let (tx, rx) = watch::channel(ServerStatus::Unknown);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let healthy = match tokio::time::timeout(period, check()).await {
                    Ok(healthy) => healthy,
                    Err(_) => {
                        log::warn!("health check timed out after {:?}", period);
                        false
                    }
                };
                let status = ServerStatus::from_check(healthy);
                log::debug!("health check: {}", status.as_str());

                tx.send_if_modified(|current| {
                    if *current == status {
                        return false;
                    }
                    *current = status;
                    true
                });
            }
        });

        Self { task, status: rx }
    }

    /// 最新の状態
    pub fn status(&self) -> ServerStatus {
        *self.status.borrow()
    }

    /// 状態が変わるまで待つ
    pub async fn changed(&mut self) -> ServerStatus {
        if self.status.changed().await.is_err() {
            log::debug!("health monitor task ended");
        }
        *self.status.borrow_and_update()
    }

    pub fn stop(self) {}
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_first_check_runs_immediately() {
        let mut monitor = HealthMonitor::start(|| async { true }, Duration::from_secs(3600));

        let status = tokio::time::timeout(Duration::from_secs(2), monitor.changed())
            .await
            .expect("check did not run");
        assert_eq!(status, ServerStatus::Online);
    }

    #[tokio::test]
    async fn test_flips_offline() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        // 1回目だけ成功、以降は失敗
        let mut monitor = HealthMonitor::start(
            move || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move { n == 0 }
            },
            Duration::from_millis(200),
        );

        let first = tokio::time::timeout(Duration::from_secs(2), monitor.changed()).await.unwrap();
        assert_eq!(first, ServerStatus::Online);

        let second = tokio::time::timeout(Duration::from_secs(2), monitor.changed()).await.unwrap();
        assert_eq!(second, ServerStatus::Offline);
        assert_eq!(monitor.status(), ServerStatus::Offline);
    }

    #[tokio::test]
    async fn test_hung_check_counts_as_offline() {
        let mut monitor = HealthMonitor::start(
            || std::future::pending::<bool>(),
            Duration::from_millis(200),
        );

        let status = tokio::time::timeout(Duration::from_secs(2), monitor.changed())
            .await
            .expect("hung check never resolved");
        assert_eq!(status, ServerStatus::Offline);
    }

    #[tokio::test]
    async fn test_drop_stops_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let monitor = HealthMonitor::start(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { true }
            },
            Duration::from_millis(10),
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        monitor.stop();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let after_stop = calls.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), after_stop);
    }
}
