use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

/// Identifier of a scheduled timer.
///
/// Ids are unique per queue and increase in creation order, which is also the
/// tie-break order for entries sharing a deadline.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TimerId(u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// A timer that came due during [`TimerQueue::poll`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Expired {
    pub id: TimerId,

    /// The deadline that elapsed (not the poll time).
    ///
    /// Owners chain follow-up timers from this value so that a late poll does
    /// not stretch the schedule.
    pub deadline: Instant,
}

#[derive(Debug)]
struct Entry {
    id: TimerId,
    deadline: Instant,
    period: Option<Duration>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    entries: Vec<Entry>,
}

impl Inner {
    fn remove(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }
}

/// Deadline queue driven by caller-supplied instants.
///
/// The queue never reads the system clock; callers pass `now` into
/// [`poll`](Self::poll) and the scheduling functions. Cloning yields another
/// reference to the same queue.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    inner: Rc<RefCell<Inner>>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a one-shot timer firing `delay` after `now`.
    pub fn schedule_once(&self, now: Instant, delay: Duration) -> TimerHandle {
        self.insert(now + delay, None)
    }

    /// Schedules a one-shot timer at an absolute deadline.
    pub fn schedule_at(&self, deadline: Instant) -> TimerHandle {
        self.insert(deadline, None)
    }

    /// Schedules a repeating timer.
    ///
    /// The first firing is at `first_deadline`, subsequent firings at whole
    /// multiples of `period` after it. A zero period is raised to one millisecond.
    pub fn schedule_repeating(&self, first_deadline: Instant, period: Duration) -> TimerHandle {
        debug_assert!(!period.is_zero(), "repeating timer with zero period");
        let period = period.max(Duration::from_millis(1));
        self.insert(first_deadline, Some(period))
    }

    fn insert(&self, deadline: Instant, period: Option<Duration>) -> TimerHandle {
        let mut inner = self.inner.borrow_mut();
        let id = TimerId(inner.next_id);
        inner.next_id += 1;
        inner.entries.push(Entry {
            id,
            deadline,
            period,
        });

        log::trace!("scheduled {id} at {deadline:?} (period {period:?})");

        TimerHandle {
            id,
            queue: Rc::downgrade(&self.inner),
        }
    }

    /// Collects every timer whose deadline is at or before `now`.
    ///
    /// Results are ordered by deadline, ties by creation order. One-shot
    /// entries are removed. Repeating entries move forward by whole periods to
    /// the first deadline after `now`, so a stalled caller sees a single firing
    /// rather than a burst.
    pub fn poll(&self, now: Instant) -> Vec<Expired> {
        let mut inner = self.inner.borrow_mut();
        let mut expired = Vec::new();

        for entry in inner.entries.iter_mut() {
            if entry.deadline > now {
                continue;
            }

            expired.push(Expired {
                id: entry.id,
                deadline: entry.deadline,
            });

            if let Some(period) = entry.period {
                let behind = now.saturating_duration_since(entry.deadline).as_nanos();
                let periods = behind / period.as_nanos() + 1;
                if periods > 1 {
                    log::debug!("{} skipped {} period(s)", entry.id, periods - 1);
                }
                let step = period.as_nanos().saturating_mul(periods);
                entry.deadline += Duration::from_nanos(u64::try_from(step).unwrap_or(u64::MAX));
            }
        }

        inner
            .entries
            .retain(|e| e.period.is_some() || e.deadline > now);

        expired.sort_by_key(|e| (e.deadline, e.id));
        expired
    }

    /// Earliest pending deadline, if any timer is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.inner.borrow().entries.iter().map(|e| e.deadline).min()
    }

    /// Whether `id` is still scheduled.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.inner.borrow().entries.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }
}

/// Owning guard for a scheduled timer.
///
/// Dropping the handle cancels the timer synchronously: once it is gone, the id
/// is never returned from [`TimerQueue::poll`] again.
#[must_use = "dropping a TimerHandle cancels the timer"]
pub struct TimerHandle {
    id: TimerId,
    queue: Weak<RefCell<Inner>>,
}

impl TimerHandle {
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Cancels the timer. Equivalent to dropping the handle.
    pub fn cancel(self) {}

    /// Whether the timer is still scheduled in its queue.
    pub fn is_pending(&self) -> bool {
        self.queue
            .upgrade()
            .is_some_and(|q| q.borrow().entries.iter().any(|e| e.id == self.id))
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle").field("id", &self.id).finish()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        let Some(queue) = self.queue.upgrade() else {
            return;
        };
        match queue.try_borrow_mut() {
            Ok(mut inner) => {
                if inner.remove(self.id) {
                    log::trace!("cancelled {}", self.id);
                }
            }
            Err(_) => log::warn!("{} dropped while the queue was busy", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn ids(expired: &[Expired]) -> Vec<TimerId> {
        expired.iter().map(|e| e.id).collect()
    }

    #[test]
    fn one_shot_fires_once_at_deadline() {
        let q = TimerQueue::new();
        let t0 = Instant::now();
        let h = q.schedule_once(t0, ms(100));

        assert!(q.poll(t0 + ms(99)).is_empty());
        let fired = q.poll(t0 + ms(100));
        assert_eq!(ids(&fired), vec![h.id()]);
        assert_eq!(fired[0].deadline, t0 + ms(100));
        assert!(q.poll(t0 + ms(500)).is_empty());
        assert!(!h.is_pending());
    }

    #[test]
    fn dropping_handle_cancels() {
        let q = TimerQueue::new();
        let t0 = Instant::now();
        let h = q.schedule_once(t0, ms(10));
        assert_eq!(q.len(), 1);
        drop(h);
        assert!(q.is_empty());
        assert!(q.poll(t0 + ms(10)).is_empty());
    }

    #[test]
    fn explicit_cancel_matches_drop() {
        let q = TimerQueue::new();
        let t0 = Instant::now();
        let h = q.schedule_repeating(t0, ms(10));
        h.cancel();
        assert!(q.poll(t0 + ms(100)).is_empty());
        assert_eq!(q.next_deadline(), None);
    }

    #[test]
    fn results_are_in_deadline_then_creation_order() {
        let q = TimerQueue::new();
        let t0 = Instant::now();
        let late = q.schedule_once(t0, ms(30));
        let a = q.schedule_once(t0, ms(10));
        let b = q.schedule_once(t0, ms(10));

        let fired = q.poll(t0 + ms(30));
        assert_eq!(ids(&fired), vec![a.id(), b.id(), late.id()]);
    }

    #[test]
    fn repeating_keeps_cadence_from_first_deadline() {
        let q = TimerQueue::new();
        let t0 = Instant::now();
        let h = q.schedule_repeating(t0 + ms(250), ms(1000));

        // Polled late; the next deadline must not drift.
        let fired = q.poll(t0 + ms(300));
        assert_eq!(ids(&fired), vec![h.id()]);
        assert_eq!(q.next_deadline(), Some(t0 + ms(1250)));

        let fired = q.poll(t0 + ms(1250));
        assert_eq!(fired[0].deadline, t0 + ms(1250));
        assert_eq!(q.next_deadline(), Some(t0 + ms(2250)));
    }

    #[test]
    fn repeating_coalesces_missed_periods() {
        let q = TimerQueue::new();
        let t0 = Instant::now();
        let _h = q.schedule_repeating(t0 + ms(1000), ms(1000));

        let fired = q.poll(t0 + ms(4500));
        assert_eq!(fired.len(), 1);
        assert_eq!(q.next_deadline(), Some(t0 + ms(5000)));
    }

    #[test]
    fn handle_outliving_queue_is_harmless() {
        let t0 = Instant::now();
        let h = {
            let q = TimerQueue::new();
            q.schedule_once(t0, ms(1))
        };
        assert!(!h.is_pending());
        drop(h);
    }

    #[test]
    fn next_deadline_tracks_earliest_entry() {
        let q = TimerQueue::new();
        let t0 = Instant::now();
        assert_eq!(q.next_deadline(), None);
        let _a = q.schedule_once(t0, ms(50));
        let b = q.schedule_once(t0, ms(20));
        assert_eq!(q.next_deadline(), Some(t0 + ms(20)));
        drop(b);
        assert_eq!(q.next_deadline(), Some(t0 + ms(50)));
    }
}
