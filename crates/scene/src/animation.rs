use std::collections::BTreeSet;

use foundation::ids::RegionId;
use foundation::time::Time;
use runtime::timers::TimerQueue;

/// Transient "just clicked" flag per region.
///
/// Each `start` sets the flag and schedules a clear `duration_ms` later.
/// Clears are never cancelled: a re-click inside the window schedules another
/// clear, and whichever clear fires first drops the flag. Clearing an already
/// idle region is a no-op.
#[derive(Debug)]
pub struct AnimationTracker {
    duration_ms: u32,
    animating: BTreeSet<RegionId>,
    timers: TimerQueue<RegionId>,
}

impl AnimationTracker {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            animating: BTreeSet::new(),
            timers: TimerQueue::new(),
        }
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Flags `id` and returns the time its clear is due.
    pub fn start(&mut self, id: &RegionId, now: Time) -> Time {
        let due = now.after_ms(self.duration_ms);
        self.animating.insert(id.clone());
        self.timers.schedule(due, id.clone());
        due
    }

    /// Runs due clears. Returns the regions whose flag was dropped.
    pub fn advance(&mut self, now: Time) -> Vec<RegionId> {
        let mut cleared = Vec::new();
        for id in self.timers.fire_due(now) {
            if self.animating.remove(&id) {
                cleared.push(id);
            }
        }
        cleared
    }

    pub fn is_animating(&self, id: &RegionId) -> bool {
        self.animating.contains(id)
    }

    pub fn animating(&self) -> impl Iterator<Item = &RegionId> + '_ {
        self.animating.iter()
    }

    pub fn next_due(&self) -> Option<Time> {
        self.timers.next_due()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::AnimationTracker;
    use foundation::ids::RegionId;
    use foundation::time::Time;

    #[test]
    fn flag_clears_after_duration() {
        let mut anim = AnimationTracker::new(300);
        let lazio = RegionId::new("IT-62");

        assert_eq!(anim.start(&lazio, Time(1_000.0)), Time(1_300.0));
        assert!(anim.is_animating(&lazio));

        assert!(anim.advance(Time(1_299.0)).is_empty());
        assert!(anim.is_animating(&lazio));

        assert_eq!(anim.advance(Time(1_300.0)), vec![lazio.clone()]);
        assert!(!anim.is_animating(&lazio));
    }

    #[test]
    fn stacked_timers_clear_idempotently() {
        let mut anim = AnimationTracker::new(300);
        let lazio = RegionId::new("IT-62");

        anim.start(&lazio, Time(0.0));
        anim.start(&lazio, Time(200.0));
        assert_eq!(anim.pending_timers(), 2);

        // The first clear drops the flag even though a re-click restarted it.
        assert_eq!(anim.advance(Time(300.0)), vec![lazio.clone()]);
        assert!(!anim.is_animating(&lazio));

        // The stacked clear finds nothing left to do.
        assert!(anim.advance(Time(500.0)).is_empty());
        assert_eq!(anim.pending_timers(), 0);
    }

    #[test]
    fn regions_animate_independently() {
        let mut anim = AnimationTracker::new(300);
        let a = RegionId::new("a");
        let b = RegionId::new("b");
        anim.start(&a, Time(0.0));
        anim.start(&b, Time(100.0));

        assert_eq!(anim.advance(Time(350.0)), vec![a.clone()]);
        assert!(anim.is_animating(&b));
        assert_eq!(anim.next_due(), Some(Time(400.0)));
    }
}
