use std::time::Instant;

/// Source of the instants phase boundaries are stamped with.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}
