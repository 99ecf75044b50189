//! Reminder parsing and the in-memory scheduler.
//!
//! Reminders live in memory only. A restart between scheduling and firing
//! drops the reminder silently, without notifying the requester.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use regex::Regex;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// "remind me in <n> <unit>", matched anywhere in the text.
static REMIND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)remind me in (\d+)\s*(seconds?|minutes?|hours?|days?)")
        .expect("reminder pattern is valid")
});

/// A recognized reminder request: a delay and the residual message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub delay_ms: u64,
    pub message: String,
}

/// Parse "remind me in 5 minutes buy milk" into a 300000 ms delay and the
/// message "buy milk".
///
/// The delay is exact integer math on the unit (no calendar or DST
/// adjustment). Returns `None` when the pattern is absent or the amount
/// does not fit an integer. An amount of 0 is accepted and yields a
/// near-immediate reminder.
pub fn parse_reminder(text: &str) -> Option<ReminderRequest> {
    let caps = REMIND_RE.captures(text)?;
    let amount: u64 = caps[1].parse().ok()?;
    let unit_ms: u64 = match caps[2].to_lowercase().trim_end_matches('s') {
        "second" => 1_000,
        "minute" => 60_000,
        "hour" => 3_600_000,
        "day" => 86_400_000,
        _ => return None,
    };

    let matched = caps.get(0)?;
    let mut message = String::with_capacity(text.len());
    message.push_str(&text[..matched.start()]);
    message.push_str(&text[matched.end()..]);

    Some(ReminderRequest {
        delay_ms: amount.saturating_mul(unit_ms),
        message: message.trim().to_string(),
    })
}

/// A scheduled one-shot reminder, owned exclusively by the [`Scheduler`].
#[derive(Debug, Clone)]
pub struct Reminder {
    pub id: String,
    pub chat_id: i64,
    pub user_id: i64,
    pub message: String,
    pub fire_at: DateTime<Utc>,
}

/// In-memory reminder scheduler.
///
/// Pending reminders are keyed by id in a store owned by the instance.
/// Each scheduled reminder gets one duration-based timer task; when it
/// elapses the reminder is removed and `on_fire(chat_id, text)` runs.
/// Nothing is persisted.
pub struct Scheduler {
    pending: Arc<Mutex<HashMap<String, Reminder>>>,
    on_fire: Arc<dyn Fn(i64, String) + Send + Sync>,
}

impl Scheduler {
    pub fn new<F>(on_fire: F) -> Self
    where
        F: Fn(i64, String) + Send + Sync + 'static,
    {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            on_fire: Arc::new(on_fire),
        }
    }

    /// Schedule a reminder `delay_ms` from now and return its id.
    ///
    /// The timer is duration-based (`tokio::time::sleep`), so a wall-clock
    /// change mid-wait does not move the fire time. Ids combine chat, user
    /// and a nanosecond timestamp and stay unique for the process lifetime.
    pub async fn schedule(
        &self,
        chat_id: i64,
        user_id: i64,
        delay_ms: u64,
        message: String,
    ) -> String {
        let now = Utc::now();
        let id = format!(
            "{}_{}_{}",
            chat_id,
            user_id,
            now.timestamp_nanos_opt().unwrap_or_default()
        );

        let reminder = Reminder {
            id: id.clone(),
            chat_id,
            user_id,
            message,
            fire_at: now + chrono::Duration::milliseconds(i64::try_from(delay_ms).unwrap_or(i64::MAX)),
        };

        debug!("Reminder {} armed, fires at {}", id, reminder.fire_at);

        {
            let mut pending = self.pending.lock().await;
            pending.insert(id.clone(), reminder);
        }

        let pending = self.pending.clone();
        let on_fire = self.on_fire.clone();
        let timer_id = id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            fire(&pending, &on_fire, &timer_id).await;
        });

        id
    }

    /// Fire a reminder by id: deliver its message and remove it. A second
    /// fire on the same id finds nothing and is a silent no-op.
    pub async fn fire(&self, id: &str) {
        fire(&self.pending, &self.on_fire, id).await;
    }

    /// Number of reminders still waiting to fire.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}

async fn fire(
    pending: &Mutex<HashMap<String, Reminder>>,
    on_fire: &Arc<dyn Fn(i64, String) + Send + Sync>,
    id: &str,
) {
    let reminder = {
        let mut pending = pending.lock().await;
        pending.remove(id)
    };

    let Some(reminder) = reminder else { return };
    info!(
        "⏰ Firing reminder {} for user {} in chat {}",
        reminder.id, reminder.user_id, reminder.chat_id
    );
    on_fire(reminder.chat_id, format!("⏰ Reminder: {}", reminder.message));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    #[test]
    fn test_parse_five_minutes() {
        let req = parse_reminder("remind me in 5 minutes buy milk").unwrap();
        assert_eq!(req.delay_ms, 300_000);
        assert_eq!(req.message, "buy milk");
    }

    #[test]
    fn test_parse_strips_pattern_mid_text() {
        let req = parse_reminder("hey remind me in 2 hours call mom please").unwrap();
        assert_eq!(req.delay_ms, 7_200_000);
        // Only the matched span is removed; interior whitespace stays.
        assert_eq!(req.message, "hey  call mom please");
    }

    #[test]
    fn test_parse_all_units() {
        assert_eq!(parse_reminder("remind me in 3 seconds x").unwrap().delay_ms, 3_000);
        assert_eq!(parse_reminder("remind me in 3 minutes x").unwrap().delay_ms, 180_000);
        assert_eq!(parse_reminder("remind me in 3 hours x").unwrap().delay_ms, 10_800_000);
        assert_eq!(parse_reminder("remind me in 3 days x").unwrap().delay_ms, 259_200_000);
    }

    #[test]
    fn test_parse_singular_units() {
        assert_eq!(parse_reminder("remind me in 1 second x").unwrap().delay_ms, 1_000);
        assert_eq!(parse_reminder("remind me in 1 minute x").unwrap().delay_ms, 60_000);
        assert_eq!(parse_reminder("remind me in 1 hour x").unwrap().delay_ms, 3_600_000);
        assert_eq!(parse_reminder("remind me in 1 day x").unwrap().delay_ms, 86_400_000);
    }

    #[test]
    fn test_parse_scales_linearly() {
        for unit in ["seconds", "minutes", "hours", "days"] {
            let one = parse_reminder(&format!("remind me in 4 {unit} x")).unwrap();
            let two = parse_reminder(&format!("remind me in 8 {unit} x")).unwrap();
            assert_eq!(two.delay_ms, one.delay_ms * 2);
        }
    }

    #[test]
    fn test_parse_zero_amount_accepted() {
        let req = parse_reminder("remind me in 0 seconds now").unwrap();
        assert_eq!(req.delay_ms, 0);
        assert_eq!(req.message, "now");
    }

    #[test]
    fn test_parse_case_insensitive() {
        let req = parse_reminder("Remind Me In 10 MINUTES standup").unwrap();
        assert_eq!(req.delay_ms, 600_000);
        assert_eq!(req.message, "standup");
    }

    #[test]
    fn test_parse_no_space_before_unit() {
        let req = parse_reminder("remind me in 30seconds tea").unwrap();
        assert_eq!(req.delay_ms, 30_000);
    }

    #[test]
    fn test_parse_non_match() {
        assert!(parse_reminder("remind me in ten minutes").is_none());
        assert!(parse_reminder("remind me tomorrow").is_none());
        assert!(parse_reminder("tag everyone").is_none());
    }

    #[test]
    fn test_parse_overlong_amount_rejected() {
        // 25 digits does not fit an integer; treated as a non-match.
        assert!(parse_reminder("remind me in 1111111111111111111111111 seconds x").is_none());
    }

    #[tokio::test]
    async fn test_zero_delay_fires_without_minimum_wait() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        let scheduler = Scheduler::new(move |_, _| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        scheduler.schedule(-100, 7, 0, "now".into()).await;
        sleep(Duration::from_millis(50)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending_count().await, 0);
    }

    #[tokio::test]
    async fn test_fires_after_delay_with_chat_and_text() {
        let delivered = Arc::new(StdMutex::new(Vec::new()));
        let delivered_clone = delivered.clone();
        let scheduler = Scheduler::new(move |chat_id, text| {
            delivered_clone.lock().unwrap().push((chat_id, text));
        });

        scheduler.schedule(-42, 7, 50, "drink water".into()).await;

        sleep(Duration::from_millis(10)).await;
        assert!(delivered.lock().unwrap().is_empty());
        assert_eq!(scheduler.pending_count().await, 1);

        sleep(Duration::from_millis(100)).await;
        let delivered = delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].0, -42);
        assert_eq!(delivered[0].1, "⏰ Reminder: drink water");
    }

    #[tokio::test]
    async fn test_second_fire_on_same_id_is_noop() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        let scheduler = Scheduler::new(move |_, _| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        // Long delay so the timer task cannot race the manual fires.
        let id = scheduler.schedule(-1, 2, 60_000, "later".into()).await;

        scheduler.fire(&id).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending_count().await, 0);

        scheduler.fire(&id).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timers_are_independent() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        let scheduler = Scheduler::new(move |_, _| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        scheduler.schedule(-1, 1, 20, "a".into()).await;
        scheduler.schedule(-2, 2, 40, "b".into()).await;
        assert_eq!(scheduler.pending_count().await, 2);

        sleep(Duration::from_millis(120)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.pending_count().await, 0);
    }

    #[tokio::test]
    async fn test_ids_unique_for_same_requester() {
        let scheduler = Scheduler::new(|_, _| {});
        let a = scheduler.schedule(-5, 9, 60_000, "one".into()).await;
        let b = scheduler.schedule(-5, 9, 60_000, "two".into()).await;
        assert_ne!(a, b);
        assert_eq!(scheduler.pending_count().await, 2);
    }
}
