//! Simulated-time timers.
//!
//! Delayed effects (the attack lockout, clearing a transient message, the enemy respawn
//! check) are scheduled against the session clock in milliseconds, never on real threads.
//! Each request hands back a [`TimerHandle`]; at most one task per [`TimerKind`] is pending,
//! and what happens to a second request while one is pending is decided by the kind's
//! [`ReschedulePolicy`].
//!
//! Storage is a reversed binary heap of `(due_ms, slot)` pairs over a task vector. Fired or
//! superseded tasks leave default placeholders behind so heap slots stay stable, and the
//! vector is compacted once enough placeholders pile up.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use log::debug;

#[cfg(test)]
const PLACEHOLDER_THRESHOLD: usize = 4;
#[cfg(not(test))]
const PLACEHOLDER_THRESHOLD: usize = 64;

/// The delayed effects the session knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    AttackLockout,
    MessageClear,
    EnemyRespawn,
}

impl TimerKind {
    pub fn policy(self) -> ReschedulePolicy {
        match self {
            TimerKind::AttackLockout | TimerKind::EnemyRespawn => ReschedulePolicy::Ignore,
            TimerKind::MessageClear => ReschedulePolicy::Replace,
        }
    }
}

/// What to do with a request for a kind that already has a pending task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReschedulePolicy {
    /// Keep the pending task and drop the new request.
    Ignore,
    /// Supersede the pending task with the new one.
    Replace,
}

/// Identifies one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// A task waiting in the heap.
#[derive(Debug, Clone, Default)]
pub struct ScheduledTask {
    pub handle: Option<TimerHandle>,
    pub kind: Option<TimerKind>,
    pub due_ms: u64,
}

impl ScheduledTask {
    fn is_placeholder(&self) -> bool {
        self.handle.is_none()
    }
}

/// The timer queue.
#[derive(Debug, Clone, Default)]
pub struct Timers {
    heap: BinaryHeap<Reverse<(u64, usize)>>, /* (due_ms, task_idx) */
    tasks: Vec<ScheduledTask>,
    pending: HashMap<TimerKind, TimerHandle>,
    next_handle: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire `delay_ms` after `now_ms`.
    ///
    /// Returns the new handle, or `None` if the request was dropped because a task of an
    /// `Ignore` kind is already pending.
    pub fn schedule(&mut self, kind: TimerKind, now_ms: u64, delay_ms: u64) -> Option<TimerHandle> {
        if let Some(existing) = self.pending.get(&kind) {
            match kind.policy() {
                ReschedulePolicy::Ignore => {
                    debug!("timer {kind:?} already pending as {existing:?}, request ignored");
                    return None;
                },
                ReschedulePolicy::Replace => {
                    debug!("timer {kind:?} {existing:?} superseded");
                },
            }
        }

        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let due_ms = now_ms.saturating_add(delay_ms);
        let idx = self.tasks.len();
        self.heap.push(Reverse((due_ms, idx)));
        self.tasks.push(ScheduledTask {
            handle: Some(handle),
            kind: Some(kind),
            due_ms,
        });
        self.pending.insert(kind, handle);
        debug!("timer {kind:?} scheduled as {handle:?} (now/due = {now_ms}/{due_ms})");
        Some(handle)
    }

    /// Pop the next due task, if any, skipping superseded ones.
    ///
    /// Returns `None` when the earliest live task is still in the future.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TimerKind, TimerHandle)> {
        while let Some(Reverse((due_ms, idx))) = self.heap.peek().copied() {
            if now_ms < due_ms {
                return None;
            }
            self.heap.pop();
            let task = std::mem::take(&mut self.tasks[idx]);
            self.compact_if_needed();

            let (Some(kind), Some(handle)) = (task.kind, task.handle) else {
                continue;
            };
            if self.pending.get(&kind) == Some(&handle) {
                self.pending.remove(&kind);
                return Some((kind, handle));
            }
            debug!("skipping superseded timer {kind:?} {handle:?}");
        }
        None
    }

    /// Returns true if a task of `kind` is waiting to fire.
    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.contains_key(&kind)
    }

    /// Number of entries in the heap, superseded ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Rebuild the underlying storage when too many placeholder tombstones accumulate.
    fn compact_if_needed(&mut self) {
        let placeholder_count = self.tasks.iter().filter(|t| t.is_placeholder()).count();
        if placeholder_count > PLACEHOLDER_THRESHOLD {
            let old_tasks = std::mem::take(&mut self.tasks);
            let mut index_map = vec![0; old_tasks.len()];
            for (old_idx, task) in old_tasks.into_iter().enumerate() {
                if task.is_placeholder() {
                    continue;
                }
                index_map[old_idx] = self.tasks.len();
                self.tasks.push(task);
            }
            let mut new_heap = BinaryHeap::with_capacity(self.heap.len());
            while let Some(Reverse((due_ms, old_idx))) = self.heap.pop() {
                new_heap.push(Reverse((due_ms, index_map[old_idx])));
            }
            self.heap = new_heap;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_new_is_empty() {
        let timers = Timers::new();
        assert!(timers.is_empty());
        assert!(!timers.is_pending(TimerKind::MessageClear));
    }

    #[test]
    fn pop_due_returns_none_before_due_time() {
        let mut timers = Timers::new();
        timers.schedule(TimerKind::AttackLockout, 100, 400);
        assert!(timers.pop_due(499).is_none());
        assert!(timers.is_pending(TimerKind::AttackLockout));
        assert_eq!(timers.pop_due(500).map(|(kind, _)| kind), Some(TimerKind::AttackLockout));
        assert!(!timers.is_pending(TimerKind::AttackLockout));
    }

    #[test]
    fn ignore_policy_keeps_first_request() {
        let mut timers = Timers::new();
        let first = timers.schedule(TimerKind::AttackLockout, 0, 400);
        assert!(first.is_some());
        assert!(timers.schedule(TimerKind::AttackLockout, 100, 400).is_none());

        let (_, fired) = timers.pop_due(400).unwrap();
        assert_eq!(Some(fired), first);
        assert!(timers.pop_due(10_000).is_none());
    }

    #[test]
    fn replace_policy_supersedes_pending_task() {
        let mut timers = Timers::new();
        let first = timers.schedule(TimerKind::MessageClear, 0, 1800).unwrap();
        let second = timers.schedule(TimerKind::MessageClear, 1000, 1800).unwrap();
        assert_ne!(first, second);

        // the first clear would have been due at 1800; it must not fire
        assert!(timers.pop_due(1800).is_none());
        let (kind, handle) = timers.pop_due(2800).unwrap();
        assert_eq!(kind, TimerKind::MessageClear);
        assert_eq!(handle, second);
    }

    #[test]
    fn tasks_fire_in_due_order() {
        let mut timers = Timers::new();
        timers.schedule(TimerKind::EnemyRespawn, 0, 10_000);
        timers.schedule(TimerKind::MessageClear, 0, 1800);
        timers.schedule(TimerKind::AttackLockout, 0, 400);

        let order: Vec<_> = std::iter::from_fn(|| timers.pop_due(20_000)).map(|(k, _)| k).collect();
        assert_eq!(
            order,
            vec![TimerKind::AttackLockout, TimerKind::MessageClear, TimerKind::EnemyRespawn]
        );
    }

    #[test]
    fn compaction_keeps_live_tasks_reachable() {
        let mut timers = Timers::new();
        for i in 0..6u64 {
            timers.schedule(TimerKind::MessageClear, i * 10, 1000);
        }
        timers.schedule(TimerKind::EnemyRespawn, 0, 5000);

        // only the last message clear is live
        let (kind, _) = timers.pop_due(1050).unwrap();
        assert_eq!(kind, TimerKind::MessageClear);
        assert!(timers.tasks.len() < 7);

        let (kind, _) = timers.pop_due(5000).unwrap();
        assert_eq!(kind, TimerKind::EnemyRespawn);
        assert!(timers.pop_due(u64::MAX).is_none());
    }
}
