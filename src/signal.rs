// Synchronous change notifications shared by the models and the tile cache.
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ListenerId(u64);

/// A list of listeners for one kind of event.
///
/// `emit` calls every listener in the order they were connected, before returning.
/// No borrow is held while a listener runs, so a listener may connect or disconnect
/// listeners or trigger further emissions; changes to the listener list take effect
/// from the next `emit`.
pub struct Signal<E> {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Rc<dyn Fn(&E)>)>>,
}

impl<E> Default for Signal<E> {
    fn default() -> Self {
        Signal {
            next_id: Cell::new(0),
            listeners: RefCell::new(vec![]),
        }
    }
}

impl<E> Signal<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self, listener: impl Fn(&E) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Returns false if the listener was not connected.
    pub fn disconnect(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let len = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != len
    }

    pub fn emit(&self, event: &E) {
        let listeners: Vec<Rc<dyn Fn(&E)>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_in_connection_order() {
        let signal: Signal<u32> = Signal::new();
        let log = Rc::new(RefCell::new(vec![]));
        for tag in ["a", "b", "c"] {
            let log = log.clone();
            signal.connect(move |v| log.borrow_mut().push(format!("{tag}{v}")));
        }
        signal.emit(&7);
        assert_eq!(*log.borrow(), vec!["a7", "b7", "c7"]);
    }

    #[test]
    fn disconnected_listener_is_not_called() {
        let signal: Signal<()> = Signal::new();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let id = signal.connect(move |_| c.set(c.get() + 1));
        signal.emit(&());
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(&());
        assert_eq!(count.get(), 1);
        assert_eq!(signal.listener_count(), 0);
    }

    #[test]
    fn listener_may_reenter_the_signal() {
        let signal: Rc<Signal<u32>> = Rc::new(Signal::new());
        let seen = Rc::new(RefCell::new(vec![]));
        let weak = Rc::downgrade(&signal);
        let s = seen.clone();
        signal.connect(move |&v| {
            s.borrow_mut().push(v);
            if v > 0 {
                if let Some(signal) = weak.upgrade() {
                    signal.emit(&(v - 1));
                }
            }
        });
        signal.emit(&2);
        assert_eq!(*seen.borrow(), vec![2, 1, 0]);
    }
}
