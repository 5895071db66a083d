//! Settings-change channel between the tracker and the scoreboard.
//!
//! Explicit callback registration rather than an ambient event bus: the
//! tracker publishes a [`SettingsUpdate`] when settings are saved and every
//! registered listener receives it.

use crate::config::SettingsUpdate;

type Listener = Box<dyn FnMut(&SettingsUpdate)>;

#[derive(Default)]
pub struct SettingsChannel {
    listeners: Vec<Listener>,
}

impl SettingsChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&SettingsUpdate) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn publish(&mut self, update: &SettingsUpdate) {
        log::debug!("settings broadcast: {:?}", update);
        for listener in &mut self.listeners {
            listener(update);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut channel = SettingsChannel::new();

        for tag in ["a", "b"] {
            let seen = Rc::clone(&seen);
            channel.subscribe(move |update| {
                seen.borrow_mut().push((tag, update.half_min));
            });
        }

        let update = SettingsUpdate {
            half_min: 12,
            halftime_min: Some(3),
            shot_sec: None,
            warn_sec: None,
        };
        channel.publish(&update);

        assert_eq!(*seen.borrow(), vec![("a", 12), ("b", 12)]);
    }
}
