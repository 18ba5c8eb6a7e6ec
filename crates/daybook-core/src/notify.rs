use std::fmt;

/// What part of the session changed. Published by the entry store and
/// the view selector; the rendering surface subscribes and redraws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    Thoughts,
    Tasks,
    View,
}

pub type Observer = Box<dyn FnMut(ChangeEvent)>;

/// Explicit observer list standing in for framework-managed
/// reactivity. Single-threaded; callbacks run synchronously, in
/// subscription order, before the mutating call returns.
#[derive(Default)]
pub struct Publisher {
    observers: Vec<Observer>,
}

impl Publisher {
    pub fn subscribe(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    pub fn publish(&mut self, event: ChangeEvent) {
        tracing::trace!(?event, observers = self.observers.len(), "publishing change");
        for observer in &mut self.observers {
            observer(event);
        }
    }
}

impl fmt::Debug for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{ChangeEvent, Publisher};

    #[test]
    fn observers_see_events_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut publisher = Publisher::default();

        let sink = Rc::clone(&seen);
        publisher.subscribe(Box::new(move |event| sink.borrow_mut().push(event)));

        publisher.publish(ChangeEvent::Thoughts);
        publisher.publish(ChangeEvent::View);

        assert_eq!(
            *seen.borrow(),
            vec![ChangeEvent::Thoughts, ChangeEvent::View]
        );
    }
}
