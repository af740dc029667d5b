//! Background removal of expired form sessions

use log::debug;
use std::sync::Weak;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::session::cache::CacheInner;

/// Sweep the cache every `period` until it has been dropped.
///
/// Only a weak reference is held between ticks, so the task never keeps the
/// cache alive on its own.
pub(crate) async fn run<F>(cache: Weak<CacheInner<F>>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let Some(inner) = cache.upgrade() else {
            debug!("Form session cache dropped, stopping sweeper");
            break;
        };
        inner.sweep();
    }
}

#[cfg(test)]
mod tests {
    use crate::models::Form;
    use crate::session::cache::SessionCache;
    use crate::session::token::RandomTokenSource;
    use crate::testing::ManualClock;
    use chrono::Duration;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_removes_expired_entries() {
        let clock = Arc::new(ManualClock::default());
        let cache: SessionCache<String> = SessionCache::with_parts(
            Duration::seconds(120),
            clock.clone(),
            Arc::new(RandomTokenSource),
        );
        cache
            .start_sweeper(std::time::Duration::from_secs(15))
            .unwrap();

        let token = cache.store(Form::new(1, vec!["x".to_string()]));
        clock.advance(Duration::seconds(121));
        assert!(cache.contains(&token));

        tokio::time::sleep(std::time::Duration::from_secs(16)).await;
        assert!(!cache.contains(&token));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_keeps_live_entries() {
        let clock = Arc::new(ManualClock::default());
        let cache: SessionCache<String> = SessionCache::with_parts(
            Duration::seconds(120),
            clock.clone(),
            Arc::new(RandomTokenSource),
        );
        cache
            .start_sweeper(std::time::Duration::from_secs(15))
            .unwrap();

        let token = cache.store(Form::new(1, vec!["x".to_string()]));
        clock.advance(Duration::seconds(30));

        tokio::time::sleep(std::time::Duration::from_secs(46)).await;
        assert!(cache.contains(&token));
    }
}
