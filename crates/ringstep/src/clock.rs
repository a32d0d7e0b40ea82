use derive_more::{Display, From, Into};

/// Monotonic milliseconds since the owning stepper's clock origin.
///
/// Every time-dependent operation takes `now` explicitly, so a host decides
/// where time comes from and tests can step it by hand.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, From, Into,
)]
#[display("{_0}ms")]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Self = Self(0);

    pub fn after(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }

    pub fn saturating_since(self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}
