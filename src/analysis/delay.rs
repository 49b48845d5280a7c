//! Delay threshold detection over a single device's message history.

use parking_lot::Mutex;
use tracing::{debug, trace};
use twinwatch_types::{Message, Notification};

use super::watermark::{Watermark, WatermarkScope};
use crate::sink::NotificationSink;

/// Minimum gap, in milliseconds, expected between consecutive reports of a device.
pub const TIME_THRESHOLD: i64 = 10_000;

/// Scan `history` for consecutive reports closer than `threshold_ms`.
///
/// `history` must be ordered newest first. Pairs are visited from the oldest
/// to the newest; a pair is skipped when its later message is not after the
/// watermark. Each violation yields one warning naming `history[0]`'s device
/// and moves the watermark to the later message of the pair.
pub fn scan_delays<M: Message>(
    history: &[M],
    watermark: &mut Watermark,
    threshold_ms: i64,
) -> Vec<Notification> {
    let mut notifications = Vec::new();
    if history.len() < 2 {
        return notifications;
    }

    let mac = history[0].mac();

    for i in (1..history.len()).rev() {
        let current = &history[i - 1];
        if current.timestamp() <= watermark.get(mac) {
            continue;
        }

        let previous = &history[i];
        let delta = current.timestamp().timestamp_millis() - previous.timestamp().timestamp_millis();
        trace!(mac, index = i, delta, "Comparing consecutive messages");

        if delta < threshold_ms {
            notifications.push(Notification::threshold(mac, delta, current.timestamp()));
            watermark.advance(mac, current.timestamp());
        }
    }

    notifications
}

/// Detects abnormally small gaps between consecutive reports.
///
/// Owns the delay watermark. Every call holds the watermark lock from start to
/// finish, so concurrent callers are serialised and see each other's progress.
#[derive(Debug)]
pub struct DelayDetector {
    threshold_ms: i64,
    watermark: Mutex<Watermark>,
}

impl Default for DelayDetector {
    fn default() -> Self {
        Self::new(TIME_THRESHOLD, WatermarkScope::Global)
    }
}

impl DelayDetector {
    /// Create a detector with a threshold in milliseconds.
    pub fn new(threshold_ms: i64, scope: WatermarkScope) -> Self {
        Self {
            threshold_ms,
            watermark: Mutex::new(Watermark::new(scope)),
        }
    }

    /// The delay threshold in milliseconds.
    pub fn threshold_ms(&self) -> i64 {
        self.threshold_ms
    }

    /// Snapshot of the watermark state.
    pub fn watermark(&self) -> Watermark {
        self.watermark.lock().clone()
    }

    /// Run [`scan_delays`] against the detector's watermark and hand every
    /// warning to `sink`. Returns the number of warnings raised.
    pub fn detect_delays<M, S>(&self, history: &[M], sink: &S) -> usize
    where
        M: Message,
        S: NotificationSink + ?Sized,
    {
        let mut watermark = self.watermark.lock();
        let notifications = scan_delays(history, &mut watermark, self.threshold_ms);
        let count = notifications.len();

        if count > 0 {
            debug!(
                mac = history[0].mac(),
                count, "Delay threshold exceeded"
            );
        }
        for notification in notifications {
            sink.save_notification(notification);
        }

        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use chrono::{DateTime, TimeZone, Utc};
    use twinwatch_types::{NotificationType, WifiMessage};

    fn ts(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn msg(mac: &str, ms: i64) -> WifiMessage {
        WifiMessage::builder(mac, ts(ms)).build()
    }

    /// Build a newest-first history from chronological offsets.
    fn history(mac: &str, chronological: &[i64]) -> Vec<WifiMessage> {
        chronological.iter().rev().map(|&ms| msg(mac, ms)).collect()
    }

    #[test]
    fn short_histories_are_a_no_op() {
        let detector = DelayDetector::default();
        let sink = MemorySink::new();

        let empty: Vec<WifiMessage> = Vec::new();
        assert_eq!(detector.detect_delays(&empty, &sink), 0);
        assert_eq!(detector.detect_delays(&[msg("a", 1_000)], &sink), 0);

        assert!(sink.is_empty());
        assert_eq!(detector.watermark().get("a"), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn gap_below_threshold_warns_and_advances_watermark() {
        let detector = DelayDetector::default();
        let sink = MemorySink::new();
        let newer = msg("dev-1", 105_000);
        let older = msg("dev-1", 100_000);

        assert_eq!(detector.detect_delays(&[newer.clone(), older], &sink), 1);

        let raised = sink.notifications();
        assert_eq!(raised[0].notification_type, NotificationType::Warning);
        assert_eq!(raised[0].message, "Device (dev-1) above delay threshold: 5000");
        assert_eq!(raised[0].observed_at, newer.timestamp);
        assert_eq!(detector.watermark().get("dev-1"), newer.timestamp);
    }

    #[test]
    fn replaying_the_same_pair_is_silent() {
        let detector = DelayDetector::default();
        let sink = MemorySink::new();
        let pair = history("dev-1", &[100_000, 105_000]);

        assert_eq!(detector.detect_delays(&pair, &sink), 1);
        assert_eq!(detector.detect_delays(&pair, &sink), 0);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn gap_at_threshold_does_not_warn() {
        let detector = DelayDetector::default();
        let sink = MemorySink::new();
        let h = history("dev-1", &[0, 10_000, 25_000, 40_000]);

        assert_eq!(detector.detect_delays(&h, &sink), 0);
        assert_eq!(detector.watermark().get("dev-1"), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn growing_history_only_reports_new_gaps() {
        let detector = DelayDetector::default();
        let sink = MemorySink::new();

        let first = history("dev-1", &[0, 2_000, 30_000]);
        assert_eq!(detector.detect_delays(&first, &sink), 1);

        let grown = history("dev-1", &[0, 2_000, 30_000, 33_000, 60_000, 61_000]);
        assert_eq!(detector.detect_delays(&grown, &sink), 2);

        let messages: Vec<String> = sink.notifications().into_iter().map(|n| n.message).collect();
        assert_eq!(
            messages,
            vec![
                "Device (dev-1) above delay threshold: 2000",
                "Device (dev-1) above delay threshold: 3000",
                "Device (dev-1) above delay threshold: 1000",
            ]
        );
        assert_eq!(detector.watermark().get("dev-1"), ts(61_000));
    }

    #[test]
    fn pairs_are_visited_oldest_first() {
        let mut watermark = Watermark::default();
        let h = history("dev-1", &[0, 1_000, 2_500]);

        let raised = scan_delays(&h, &mut watermark, TIME_THRESHOLD);
        assert_eq!(raised.len(), 2);
        assert_eq!(raised[0].observed_at, ts(1_000));
        assert_eq!(raised[1].observed_at, ts(2_500));
        assert_eq!(watermark.get("dev-1"), ts(2_500));
    }

    #[test]
    fn device_name_comes_from_newest_message() {
        let mut watermark = Watermark::default();
        let h = vec![msg("newest", 3_000), msg("older", 1_000)];

        let raised = scan_delays(&h, &mut watermark, TIME_THRESHOLD);
        assert_eq!(raised[0].message, "Device (newest) above delay threshold: 2000");
    }

    #[test]
    fn out_of_order_pair_reports_negative_delta() {
        let mut watermark = Watermark::default();
        let h = vec![msg("dev-1", 1_000), msg("dev-1", 4_000)];

        let raised = scan_delays(&h, &mut watermark, TIME_THRESHOLD);
        assert_eq!(raised[0].message, "Device (dev-1) above delay threshold: -3000");
    }

    #[test]
    fn global_watermark_suppresses_other_devices() {
        let detector = DelayDetector::new(TIME_THRESHOLD, WatermarkScope::Global);
        let sink = MemorySink::new();

        detector.detect_delays(&history("late", &[50_000, 51_000]), &sink);
        let raised = detector.detect_delays(&history("early", &[10_000, 11_000]), &sink);

        assert_eq!(raised, 0);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn per_device_watermark_reports_each_device() {
        let detector = DelayDetector::new(TIME_THRESHOLD, WatermarkScope::PerDevice);
        let sink = MemorySink::new();

        detector.detect_delays(&history("late", &[50_000, 51_000]), &sink);
        let raised = detector.detect_delays(&history("early", &[10_000, 11_000]), &sink);

        assert_eq!(raised, 1);
        assert_eq!(sink.len(), 2);
        assert_eq!(detector.watermark().get("early"), ts(11_000));
        assert_eq!(detector.watermark().get("late"), ts(51_000));
    }

    #[test]
    fn custom_threshold_is_respected() {
        let detector = DelayDetector::new(500, WatermarkScope::Global);
        let sink = MemorySink::new();

        assert_eq!(detector.detect_delays(&history("d", &[0, 600]), &sink), 0);
        assert_eq!(detector.detect_delays(&history("d", &[0, 600, 1_000]), &sink), 1);
    }

    #[test]
    fn concurrent_callers_do_not_duplicate_warnings() {
        use std::sync::Arc;
        use std::thread;

        let detector = Arc::new(DelayDetector::default());
        let sink = Arc::new(MemorySink::new());
        let h = Arc::new(history("dev-1", &[0, 1_000, 2_000, 3_000]));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let detector = detector.clone();
                let sink = sink.clone();
                let h = h.clone();
                thread::spawn(move || detector.detect_delays(h.as_slice(), &sink))
            })
            .collect();

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 3);
        assert_eq!(sink.len(), 3);
    }
}
