use foundation::time::Time;

/// Fire-and-forget delayed actions.
///
/// Timers are never cancelled. Several timers may carry the same payload;
/// each one fires on its own.
///
/// Ordering contract:
/// - Due timers fire in `(due, insertion_order)` order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_order: u64,
    pending: Vec<Timer<T>>,
}

#[derive(Debug, Clone, PartialEq)]
struct Timer<T> {
    due: Time,
    order: u64,
    payload: T,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_order: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Time, payload: T) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.pending.push(Timer {
            due,
            order,
            payload,
        });
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest pending deadline, if any.
    pub fn next_due(&self) -> Option<Time> {
        self.pending
            .iter()
            .map(|t| t.due)
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }

    /// Removes and returns every payload whose deadline `now` has reached.
    pub fn fire_due(&mut self, now: Time) -> Vec<T> {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|t| now.reached(t.due));
        self.pending = rest;

        due.sort_by(|a, b| a.due.0.total_cmp(&b.due.0).then_with(|| a.order.cmp(&b.order)));
        due.into_iter().map(|t| t.payload).collect()
    }
}
