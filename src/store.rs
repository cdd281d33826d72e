//! Owned, injectable state container
//!
//! A `Store` is handed to whoever needs it instead of living in a global.
//! Readers take snapshots with [`Store::get`] or follow changes through a
//! [`tokio::sync::watch::Receiver`].

use tokio::sync::watch;

#[derive(Debug)]
pub struct Store<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> Store<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Snapshot of the current value
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Read a projection without cloning the whole value
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Mutate in place and notify subscribers
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Mutate in place; subscribers are only notified when `f` returns true
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }
}

impl<T: Clone + Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_update() {
        let store = Store::new(0u32);
        assert_eq!(store.get(), 0);

        store.set(5);
        store.update(|n| *n += 1);
        assert_eq!(store.get(), 6);
        assert_eq!(store.read(|n| *n * 2), 12);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let store = Store::new(String::from("idle"));
        let mut rx = store.subscribe();

        store.update(|s| s.push_str("-tracking"));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), "idle-tracking");
    }

    #[test]
    fn test_update_if_skips_notification() {
        let store = Store::new(1i32);
        let rx = store.subscribe();

        let changed = store.update_if(|n| {
            if *n > 10 {
                *n = 0;
                true
            } else {
                false
            }
        });
        assert!(!changed);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.get(), 1);
    }
}
