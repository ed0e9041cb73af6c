use super::Measurement;

/// Append-only, in-memory list of completed measurements.
///
/// Identifiers come from the store itself: the next one is always
/// `len + 1`, so they are dense and strictly increasing within a session.
#[derive(Debug, Default)]
pub struct HistoryStore {
    records: Vec<Measurement>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> u32 {
        self.records.len() as u32 + 1
    }

    pub fn append(&mut self, record: Measurement) {
        debug_assert_eq!(record.id, self.next_id(), "history ids must stay dense");
        self.records.push(record);
    }

    pub fn all(&self) -> &[Measurement] {
        &self.records
    }

    pub fn latest(&self) -> Option<&Measurement> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::measurement::sample;

    #[test]
    fn ids_start_at_one_and_follow_length() {
        let mut store = HistoryStore::new();
        assert_eq!(store.next_id(), 1);
        store.append(sample(1, "https://a.example"));
        store.append(sample(2, "https://b.example"));
        assert_eq!(store.next_id(), 3);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn keeps_insertion_order() {
        let mut store = HistoryStore::new();
        store.append(sample(1, "https://first.example"));
        store.append(sample(2, "https://second.example"));
        let urls: Vec<&str> = store.all().iter().map(|m| m.url.as_str()).collect();
        assert_eq!(urls, ["https://first.example", "https://second.example"]);
        assert_eq!(store.latest().map(|m| m.id), Some(2));
    }
}
