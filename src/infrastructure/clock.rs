use std::time::Instant;
use crate::ports::Clock;

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

impl TokioClock {
    pub fn new() -> Self { Self }
}

impl Clock for TokioClock {
    fn now(&self) -> Instant { tokio::time::Instant::now().into_std() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn now_moves_forward() {
        let clock = TokioClock::new();
        let before = clock.now();
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(clock.now().duration_since(before) >= Duration::from_millis(5));
    }
}
