//! Poll→fetch→score→decide cycle driver.

use crate::decision::DecisionEngine;
use crate::trigger::Trigger;
use sentinel_core::traits::SentimentScorer;
use sentinel_core::types::{CycleReport, NewsItem};
use sentinel_feeds::{NewsFeed, PriceFeed};
use std::collections::VecDeque;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Counters returned when the run loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Cycles that ran to completion.
    pub cycles: u64,
    /// Ticks discarded because they arrived while a cycle was running.
    pub dropped_ticks: u64,
    /// Ticks skipped by the no-data back-off.
    pub skipped_ticks: u64,
}

/// Skips timer ticks after consecutive polls without news.
#[derive(Debug, Clone, Default)]
struct IdleBackoff {
    max_skips: u32,
    empty_streak: u32,
    remaining: u32,
}

impl IdleBackoff {
    fn new(max_skips: u32) -> Self {
        Self {
            max_skips,
            ..Default::default()
        }
    }

    fn record(&mut self, had_news: bool) {
        if had_news {
            self.empty_streak = 0;
            self.remaining = 0;
        } else {
            self.empty_streak = self.empty_streak.saturating_add(1);
            self.remaining = self.empty_streak.min(self.max_skips);
        }
    }

    fn should_skip(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        }
    }
}

/// Drives cycles one at a time.
///
/// A cycle is `Idle → Processing → Idle`; the run loop awaits each cycle before
/// reading the next trigger, so cycles never overlap.
pub struct Orchestrator {
    news: Option<NewsFeed>,
    price: PriceFeed,
    scorer: Box<dyn SentimentScorer>,
    engine: DecisionEngine,
    backoff: IdleBackoff,
    manual_seq: u64,
}

impl Orchestrator {
    pub fn new(
        news: Option<NewsFeed>,
        price: PriceFeed,
        scorer: impl SentimentScorer + 'static,
        engine: DecisionEngine,
    ) -> Self {
        Self::with_boxed_scorer(news, price, Box::new(scorer), engine)
    }

    pub fn with_boxed_scorer(
        news: Option<NewsFeed>,
        price: PriceFeed,
        scorer: Box<dyn SentimentScorer>,
        engine: DecisionEngine,
    ) -> Self {
        Self {
            news,
            price,
            scorer,
            engine,
            backoff: IdleBackoff::default(),
            manual_seq: 0,
        }
    }

    /// Skip up to `max` timer ticks after consecutive empty polls. Zero disables.
    pub fn with_max_idle_skips(mut self, max: u32) -> Self {
        self.backoff = IdleBackoff::new(max);
        self
    }

    pub fn has_news_feed(&self) -> bool {
        self.news.is_some()
    }

    /// Run a single cycle. Never fails; problems show up as empty report fields.
    pub async fn run_cycle(&mut self, trigger: Trigger) -> CycleReport {
        let mut report = CycleReport::empty(trigger.kind());
        let from_timer = trigger.is_tick();

        let item = match trigger {
            Trigger::Manual {
                headline: Some(text),
            } => {
                self.manual_seq += 1;
                Some(NewsItem::new(format!("manual-{}", self.manual_seq).as_str(), text))
            }
            Trigger::Tick | Trigger::Manual { headline: None } => {
                let item = match self.news.as_mut() {
                    Some(feed) => feed.poll().await,
                    None => None,
                };
                // The idle streak counts timer polls; any fresh item ends it.
                if from_timer || item.is_some() {
                    self.backoff.record(item.is_some());
                }
                item
            }
        };

        let Some(item) = item else {
            debug!("No new headline this cycle");
            return report;
        };

        let (price, scored) = tokio::join!(self.price.get(), self.scorer.score(&item.headline));

        match scored {
            Ok(sentiment) => {
                let signal = self.engine.decide(&sentiment, &price);
                info!(
                    news_id = %item.id,
                    price = %price.value(),
                    simulated = price.is_simulated(),
                    label = %sentiment.label(),
                    confidence = sentiment.confidence(),
                    action = %signal.action,
                    "Cycle decided"
                );
                report.sentiment = Some(sentiment);
                report.signal = Some(signal);
            }
            Err(e) => {
                warn!("Scoring headline {} with {} failed: {}", item.id, self.scorer.name(), e);
            }
        }

        report.headline = Some(item);
        report.price = Some(price);
        report
    }

    /// Consume triggers until the stop flag is set, the trigger channel closes,
    /// or the report receiver goes away.
    ///
    /// The stop flag is checked between cycles only; a running cycle always
    /// completes. Ticks that queue up while a cycle runs are dropped; manual
    /// triggers are kept and run in order.
    pub async fn run(
        mut self,
        mut triggers: mpsc::Receiver<Trigger>,
        reports: mpsc::Sender<CycleReport>,
        mut stop: watch::Receiver<bool>,
    ) -> RunStats {
        let mut stats = RunStats::default();
        let mut pending: VecDeque<Trigger> = VecDeque::new();

        loop {
            if *stop.borrow() {
                info!("Stop requested");
                break;
            }

            let trigger = match pending.pop_front() {
                Some(trigger) => trigger,
                None => tokio::select! {
                    biased;
                    changed = stop.changed() => {
                        if changed.is_err() {
                            info!("Stop handle dropped");
                            break;
                        }
                        continue;
                    }
                    next = triggers.recv() => match next {
                        Some(trigger) => trigger,
                        None => break,
                    },
                },
            };

            if trigger.is_tick() && self.backoff.should_skip() {
                stats.skipped_ticks += 1;
                debug!("Tick skipped by idle back-off");
                continue;
            }

            let report = self.run_cycle(trigger).await;
            stats.cycles += 1;

            let mut dropped = 0;
            while let Ok(queued) = triggers.try_recv() {
                if queued.is_tick() {
                    dropped += 1;
                } else {
                    pending.push_back(queued);
                }
            }
            if dropped > 0 {
                debug!("Dropped {} tick(s) that arrived mid-cycle", dropped);
                stats.dropped_ticks += dropped;
            }

            if reports.send(report).await.is_err() {
                warn!("Report receiver closed");
                break;
            }
        }

        info!(
            "Orchestrator stopped after {} cycle(s), {} dropped tick(s), {} skipped tick(s)",
            stats.cycles, stats.dropped_ticks, stats.skipped_ticks
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::DecisionConfig;
    use crate::trigger::spawn_ticker;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use sentinel_core::error::{FeedError, SentimentError};
    use sentinel_core::traits::{NewsSource, PriceTier};
    use sentinel_core::types::{Action, PriceSource, SentimentLabel, SentimentResult, TriggerKind};
    use sentinel_feeds::{PriceRange, RetryPolicy, SimulatedPrice};
    use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct StubNews {
        items: Arc<Mutex<Vec<NewsItem>>>,
    }

    impl StubNews {
        fn latest(id: &str, headline: &str) -> Self {
            let stub = Self::default();
            stub.set(id, headline);
            stub
        }

        fn set(&self, id: &str, headline: &str) {
            *self.items.lock().unwrap() = vec![NewsItem::new(id, headline)];
        }
    }

    #[async_trait]
    impl NewsSource for StubNews {
        async fn latest(&self) -> Result<Vec<NewsItem>, FeedError> {
            Ok(self.items.lock().unwrap().clone())
        }

        fn name(&self) -> &str {
            "stub-news"
        }
    }

    /// Every call returns a fresh id so each cycle has something to score.
    #[derive(Default)]
    struct FreshNews {
        seq: AtomicU64,
    }

    #[async_trait]
    impl NewsSource for FreshNews {
        async fn latest(&self) -> Result<Vec<NewsItem>, FeedError> {
            let id = self.seq.fetch_add(1, Ordering::SeqCst);
            Ok(vec![NewsItem::new(id, "Exchange hacked")])
        }

        fn name(&self) -> &str {
            "fresh-news"
        }
    }

    /// Price tier that records calls and how many ran at once.
    #[derive(Clone)]
    struct CountingTier {
        price: Option<Decimal>,
        delay: Duration,
        calls: Arc<AtomicU32>,
        in_flight: Arc<AtomicU32>,
        max_in_flight: Arc<AtomicU32>,
    }

    impl CountingTier {
        fn new(price: Option<Decimal>, delay: Duration) -> Self {
            Self {
                price,
                delay,
                calls: Arc::new(AtomicU32::new(0)),
                in_flight: Arc::new(AtomicU32::new(0)),
                max_in_flight: Arc::new(AtomicU32::new(0)),
            }
        }
    }

    #[async_trait]
    impl PriceTier for CountingTier {
        async fn fetch(&self, _symbol: &str) -> Result<Decimal, FeedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.price.ok_or(FeedError::Connection("unreachable".into()))
        }

        fn source(&self) -> PriceSource {
            PriceSource::Fallback
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    struct FixedScorer(Result<SentimentResult, SentimentError>);

    impl FixedScorer {
        fn of(label: SentimentLabel, confidence: f64) -> Self {
            Self(SentimentResult::new(label, confidence))
        }
    }

    #[async_trait]
    impl SentimentScorer for FixedScorer {
        async fn score(&self, _text: &str) -> Result<SentimentResult, SentimentError> {
            self.0.clone()
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn sim() -> SimulatedPrice {
        SimulatedPrice::new(PriceRange::new(20000.0, 105000.0).unwrap())
    }

    fn live_price(value: Decimal) -> PriceFeed {
        PriceFeed::new("BTC/USDT", sim()).with_tier(
            LiveTier(value),
            RetryPolicy::once(),
        )
    }

    struct LiveTier(Decimal);

    #[async_trait]
    impl PriceTier for LiveTier {
        async fn fetch(&self, _symbol: &str) -> Result<Decimal, FeedError> {
            Ok(self.0)
        }

        fn source(&self) -> PriceSource {
            PriceSource::Primary
        }

        fn name(&self) -> &str {
            "live"
        }
    }

    fn orchestrator(news: impl NewsSource + 'static, price: PriceFeed, scorer: FixedScorer) -> Orchestrator {
        Orchestrator::new(
            Some(NewsFeed::new(news)),
            price,
            scorer,
            DecisionEngine::new(DecisionConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_bearish_headline_sells() {
        let mut orch = orchestrator(
            StubNews::latest("42", "Bitcoin ETF denied by SEC"),
            live_price(dec!(95000)),
            FixedScorer::of(SentimentLabel::Negative, 0.93),
        );

        let report = orch.run_cycle(Trigger::Tick).await;
        assert_eq!(report.trigger, TriggerKind::Timer);
        assert_eq!(report.headline.as_ref().unwrap().id.as_str(), "42");
        let price = report.price.as_ref().unwrap();
        assert_eq!(price.value(), dec!(95000));
        assert!(!price.is_simulated());
        assert_eq!(report.signal.unwrap().action, Action::Sell);
    }

    #[tokio::test]
    async fn test_repeat_headline_skips_decision() {
        let tier = CountingTier::new(Some(dec!(95000)), Duration::ZERO);
        let calls = tier.calls.clone();
        let price = PriceFeed::new("BTC/USDT", sim()).with_tier(tier, RetryPolicy::once());
        let mut orch = orchestrator(
            StubNews::latest("42", "Bitcoin ETF denied by SEC"),
            price,
            FixedScorer::of(SentimentLabel::Negative, 0.93),
        );

        assert!(orch.run_cycle(Trigger::Tick).await.signal.is_some());

        let second = orch.run_cycle(Trigger::Tick).await;
        assert!(!second.has_news());
        assert!(second.price.is_none());
        assert!(second.sentiment.is_none());
        assert!(second.signal.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_weak_positive_holds() {
        let mut orch = orchestrator(
            StubNews::latest("7", "Fund files paperwork"),
            live_price(dec!(95000)),
            FixedScorer::of(SentimentLabel::Positive, 0.60),
        );

        let report = orch.run_cycle(Trigger::Tick).await;
        assert_eq!(report.signal.unwrap().action, Action::Hold);
    }

    #[tokio::test]
    async fn test_simulated_price_is_disclosed() {
        let down = CountingTier::new(None, Duration::ZERO);
        let price = PriceFeed::new("BTC/USDT", sim()).with_tier(down, RetryPolicy::once());
        let mut orch = orchestrator(
            StubNews::latest("1", "Exchange hacked"),
            price,
            FixedScorer::of(SentimentLabel::Negative, 0.95),
        );

        let report = orch.run_cycle(Trigger::Tick).await;
        assert!(report.is_simulated());
        assert_eq!(report.signal.unwrap().action, Action::Sell);
    }

    #[tokio::test]
    async fn test_scorer_failure_reports_without_signal() {
        let mut orch = orchestrator(
            StubNews::latest("9", "Anything"),
            live_price(dec!(95000)),
            FixedScorer(Err(SentimentError::Request("503".into()))),
        );

        let report = orch.run_cycle(Trigger::Tick).await;
        assert!(report.has_news());
        assert!(report.price.is_some());
        assert!(report.sentiment.is_none());
        assert!(report.signal.is_none());
    }

    #[tokio::test]
    async fn test_manual_headline_bypasses_dedup() {
        let news = StubNews::latest("42", "Bitcoin ETF denied by SEC");
        let mut orch = orchestrator(
            news,
            live_price(dec!(95000)),
            FixedScorer::of(SentimentLabel::Positive, 0.97),
        );

        let first = orch.run_cycle(Trigger::headline("ETF approved")).await;
        let second = orch.run_cycle(Trigger::headline("ETF approved")).await;
        assert_eq!(first.headline.unwrap().id.as_str(), "manual-1");
        assert_eq!(second.headline.unwrap().id.as_str(), "manual-2");
        assert_eq!(second.signal.unwrap().action, Action::Buy);

        // The feed's dedup state is untouched, so the polled item is still new.
        let polled = orch.run_cycle(Trigger::poll_now()).await;
        assert_eq!(polled.trigger, TriggerKind::Manual);
        assert_eq!(polled.headline.unwrap().id.as_str(), "42");
    }

    #[tokio::test]
    async fn test_without_news_feed() {
        let mut orch = Orchestrator::new(
            None,
            live_price(dec!(95000)),
            FixedScorer::of(SentimentLabel::Negative, 0.93),
            DecisionEngine::default(),
        );
        assert!(!orch.has_news_feed());
        assert!(!orch.run_cycle(Trigger::Tick).await.has_news());
        assert!(orch.run_cycle(Trigger::headline("typed")).await.has_news());
    }

    #[test]
    fn test_idle_backoff_grows_and_resets() {
        let mut backoff = IdleBackoff::new(3);
        assert!(!backoff.should_skip());

        backoff.record(false);
        assert!(backoff.should_skip());
        assert!(!backoff.should_skip());

        backoff.record(false);
        assert!(backoff.should_skip());
        assert!(backoff.should_skip());
        assert!(!backoff.should_skip());

        for _ in 0..10 {
            backoff.record(false);
        }
        let skipped = std::iter::from_fn(|| backoff.should_skip().then_some(())).count();
        assert_eq!(skipped, 3);

        backoff.record(false);
        backoff.record(true);
        assert!(!backoff.should_skip());
    }

    #[test]
    fn test_idle_backoff_disabled() {
        let mut backoff = IdleBackoff::new(0);
        backoff.record(false);
        backoff.record(false);
        assert!(!backoff.should_skip());
    }

    #[tokio::test]
    async fn test_manual_polls_do_not_extend_idle_streak() {
        let news = StubNews::latest("42", "Bitcoin ETF denied by SEC");
        let mut orch = orchestrator(
            news.clone(),
            live_price(dec!(95000)),
            FixedScorer::of(SentimentLabel::Negative, 0.93),
        )
        .with_max_idle_skips(3);

        assert!(orch.run_cycle(Trigger::Tick).await.has_news());
        for _ in 0..3 {
            assert!(!orch.run_cycle(Trigger::poll_now()).await.has_news());
        }
        assert!(!orch.backoff.should_skip());

        assert!(!orch.run_cycle(Trigger::Tick).await.has_news());
        assert!(orch.backoff.should_skip());
        assert!(!orch.backoff.should_skip());

        // A manual poll that finds news still resets the streak.
        assert!(!orch.run_cycle(Trigger::Tick).await.has_news());
        news.set("43", "Exchange hacked");
        assert!(orch.run_cycle(Trigger::poll_now()).await.has_news());
        assert!(!orch.backoff.should_skip());
    }

    #[tokio::test]
    async fn test_run_skips_ticks_after_empty_polls() {
        let orch = orchestrator(
            StubNews::latest("42", "Bitcoin ETF denied by SEC"),
            live_price(dec!(95000)),
            FixedScorer::of(SentimentLabel::Negative, 0.93),
        )
        .with_max_idle_skips(2);

        let (trigger_tx, trigger_rx) = mpsc::channel(16);
        let (report_tx, mut report_rx) = mpsc::channel(16);
        let (_stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(orch.run(trigger_rx, report_tx, stop_rx));

        trigger_tx.send(Trigger::Tick).await.unwrap();
        assert!(report_rx.recv().await.unwrap().has_news());

        // First empty poll: the next tick is skipped.
        trigger_tx.send(Trigger::Tick).await.unwrap();
        assert!(!report_rx.recv().await.unwrap().has_news());

        for _ in 0..2 {
            trigger_tx.send(Trigger::Tick).await.unwrap();
        }
        assert!(!report_rx.recv().await.unwrap().has_news());

        // Second empty poll in a row: two ticks skipped.
        for _ in 0..3 {
            trigger_tx.send(Trigger::Tick).await.unwrap();
        }
        assert!(!report_rx.recv().await.unwrap().has_news());

        // Manual triggers ignore the back-off.
        trigger_tx.send(Trigger::poll_now()).await.unwrap();
        assert_eq!(report_rx.recv().await.unwrap().trigger, TriggerKind::Manual);

        drop(trigger_tx);
        let stats = handle.await.unwrap();
        assert_eq!(stats.cycles, 5);
        assert_eq!(stats.skipped_ticks, 3);
        assert_eq!(stats.dropped_ticks, 0);
    }

    #[tokio::test]
    async fn test_stop_flag_checked_before_cycle() {
        let orch = orchestrator(
            StubNews::latest("42", "x"),
            live_price(dec!(95000)),
            FixedScorer::of(SentimentLabel::Negative, 0.93),
        );
        let (trigger_tx, trigger_rx) = mpsc::channel(4);
        let (report_tx, _report_rx) = mpsc::channel(4);
        let (stop_tx, stop_rx) = watch::channel(false);

        trigger_tx.send(Trigger::Tick).await.unwrap();
        stop_tx.send(true).unwrap();

        let stats = orch.run(trigger_rx, report_tx, stop_rx).await;
        assert_eq!(stats.cycles, 0);
    }

    #[tokio::test]
    async fn test_stop_while_processing_completes_cycle() {
        let tier = CountingTier::new(Some(dec!(95000)), Duration::from_millis(100));
        let price = PriceFeed::new("BTC/USDT", sim()).with_tier(tier, RetryPolicy::once());
        let orch = orchestrator(
            StubNews::latest("42", "x"),
            price,
            FixedScorer::of(SentimentLabel::Negative, 0.93),
        );
        let (trigger_tx, trigger_rx) = mpsc::channel(4);
        let (report_tx, mut report_rx) = mpsc::channel(4);
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(orch.run(trigger_rx, report_tx, stop_rx));
        trigger_tx.send(Trigger::Tick).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        stop_tx.send(true).unwrap();

        let stats = handle.await.unwrap();
        assert_eq!(stats.cycles, 1);
        let report = report_rx.recv().await.unwrap();
        assert_eq!(report.signal.unwrap().action, Action::Sell);
    }

    #[tokio::test]
    async fn test_slow_cycle_never_overlaps() {
        let tier = CountingTier::new(None, Duration::from_millis(60));
        let max_in_flight = tier.max_in_flight.clone();
        let calls = tier.calls.clone();
        let price = PriceFeed::new("BTC/USDT", sim()).with_tier(tier, RetryPolicy::once());
        let orch = orchestrator(
            FreshNews::default(),
            price,
            FixedScorer::of(SentimentLabel::Neutral, 0.5),
        );

        let (trigger_tx, trigger_rx) = mpsc::channel(1);
        let (report_tx, mut report_rx) = mpsc::channel(64);
        let (stop_tx, stop_rx) = watch::channel(false);

        let ticker = spawn_ticker(Duration::from_millis(5), trigger_tx);
        let handle = tokio::spawn(orch.run(trigger_rx, report_tx, stop_rx));

        tokio::time::sleep(Duration::from_millis(400)).await;
        stop_tx.send(true).unwrap();
        let stats = handle.await.unwrap();
        ticker.abort();

        assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(calls.load(Ordering::SeqCst) as u64, stats.cycles);
        assert!(stats.cycles >= 2);
        assert!(stats.dropped_ticks >= 1);

        let mut seen = 0;
        while let Ok(report) = report_rx.try_recv() {
            assert!(report.is_simulated());
            seen += 1;
        }
        assert_eq!(seen, stats.cycles);
    }
}
