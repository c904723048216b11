/// Session time in milliseconds.
///
/// The browser adapter feeds `Date.now()`-style values; tests use small
/// literal values. Only ordering and offsets matter.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64);

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn millis(self) -> f64 {
        self.0
    }

    pub fn after_ms(self, ms: u32) -> Time {
        Time(self.0 + f64::from(ms))
    }

    /// True once `self` has reached `deadline`.
    pub fn reached(self, deadline: Time) -> bool {
        self.0 >= deadline.0
    }
}
