/// One recorded interaction, for traceability.
///
/// Events are structured text; `seq` is assigned by the bus and is strictly
/// increasing for the lifetime of the bus, even across `drain` calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub seq: u64,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    next_seq: u64,
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, kind: &'static str, message: impl Into<String>) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.events.push(Event {
            seq,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events.iter().map(|e| e.kind).collect()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
