use festoon_server::{
    host::{Audience, Observer},
    FastenerKey, FastenerSnapshot,
};

/// Keeps every notification it receives, in order.
#[derive(Default)]
pub struct RecordingObserver {
    notifications: Vec<(FastenerSnapshot, Audience)>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> &[(FastenerSnapshot, Audience)] {
        &self.notifications
    }

    pub fn notified_keys(&self) -> Vec<FastenerKey> {
        self.notifications
            .iter()
            .map(|(snapshot, _)| snapshot.key)
            .collect()
    }

    pub fn last_for(&self, key: &FastenerKey) -> Option<&(FastenerSnapshot, Audience)> {
        self.notifications
            .iter()
            .rev()
            .find(|(snapshot, _)| snapshot.key == *key)
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }
}

impl Observer for RecordingObserver {
    fn notify(&mut self, snapshot: &FastenerSnapshot, audience: &Audience) {
        self.notifications.push((snapshot.clone(), *audience));
    }
}
