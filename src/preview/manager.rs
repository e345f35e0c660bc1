use std::collections::HashMap;

use log::debug;

/// One per-row preview resource. Implementations own their playback state;
/// the manager only enforces exclusivity between rows.
pub trait PreviewSink {
    /// Begin or resume playback. Returns `false` when the resource could
    /// not be started; the manager then leaves the row inactive.
    fn start(&mut self) -> bool;

    /// Pause playback, keeping position for a later `start`.
    fn stop(&mut self);

    /// Whether the resource played through to its natural end (or gave up
    /// on ever starting).
    fn is_finished(&self) -> bool;

    /// Whether a `start` is still waiting on background work before any
    /// audio can come out. Purely informational, for the UI.
    fn is_pending(&self) -> bool {
        false
    }

    /// Drive pending background work. Called on every slot each frame.
    fn poll(&mut self) {}
}

/// Holds one preview slot per visible library row and keeps at most one of
/// them playing. Rows are keyed by track id.
pub struct PreviewManager<S: PreviewSink> {
    slots: HashMap<String, S>,
    active: Option<String>,
}

impl<S: PreviewSink> PreviewManager<S> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            active: None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, sink: S) {
        self.slots.insert(id.into(), sink);
    }

    /// Drop the slot for `id`, stopping it first if it was the active one.
    pub fn remove(&mut self, id: &str) {
        if self.active.as_deref() == Some(id) {
            if let Some(sink) = self.slots.get_mut(id) {
                sink.stop();
            }
            self.active = None;
        }
        self.slots.remove(id);
    }

    /// Play the preview for `id`. Whichever row was playing before is
    /// stopped first, so two previews never overlap.
    pub fn request_play(&mut self, id: &str) {
        if !self.slots.contains_key(id) {
            return;
        }
        if let Some(previous) = self.active.take() {
            if previous != id {
                if let Some(sink) = self.slots.get_mut(&previous) {
                    sink.stop();
                }
            }
        }
        let started = self
            .slots
            .get_mut(id)
            .is_some_and(|sink| sink.start());
        if started {
            self.active = Some(id.to_string());
        } else {
            debug!("preview: could not start row {id}");
        }
    }

    /// Stop the preview for `id`; a no-op unless it is the active row.
    pub fn request_stop(&mut self, id: &str) {
        if self.active.as_deref() != Some(id) {
            return;
        }
        if let Some(sink) = self.slots.get_mut(id) {
            sink.stop();
        }
        self.active = None;
    }

    /// A row reported natural end of its clip.
    pub fn notify_ended(&mut self, id: &str) {
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
    }

    pub fn is_playing(&self, id: &str) -> bool {
        self.active.as_deref() == Some(id)
    }

    /// The active row is still waiting on its clip to arrive.
    pub fn is_loading(&self, id: &str) -> bool {
        self.is_playing(id) && self.slots.get(id).is_some_and(PreviewSink::is_pending)
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Reconcile slots with the rows currently on screen: rows that
    /// disappeared release their resources.
    pub fn sync_rows(&mut self, visible: &[&str]) {
        let gone: Vec<String> = self
            .slots
            .keys()
            .filter(|id| !visible.contains(&id.as_str()))
            .cloned()
            .collect();
        for id in gone {
            self.remove(&id);
        }
    }

    /// Give every slot a chance to make progress on background work.
    pub fn poll_slots(&mut self) {
        for sink in self.slots.values_mut() {
            sink.poll();
        }
    }

    /// Clear the active marker for clips that played through on their own.
    pub fn reap_finished(&mut self) {
        if let Some(active) = self.active.clone() {
            let finished = self
                .slots
                .get(&active)
                .is_some_and(PreviewSink::is_finished);
            if finished {
                self.notify_ended(&active);
            }
        }
    }
}

#[cfg(test)]
impl<S: PreviewSink> PreviewManager<S> {
    pub(super) fn slot(&self, id: &str) -> Option<&S> {
        self.slots.get(id)
    }

    pub(super) fn slot_mut(&mut self, id: &str) -> Option<&mut S> {
        self.slots.get_mut(id)
    }
}

impl<S: PreviewSink> Default for PreviewManager<S> {
    fn default() -> Self {
        Self::new()
    }
}
