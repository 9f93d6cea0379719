use crate::event::Event;
use crate::season::YearMonth;
use crate::storage::{Storage, StorageError};
use crate::validate::is_selectable;
use thiserror::Error;

/// Key under which the whole event list is stored
pub(crate) const EVENTS_KEY: &str = "calendar-events";

/// Owns the event list and mirrors every change to storage
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EventStore<S> {
    storage: S,
    events: Vec<Event>,
}

impl<S: Storage> EventStore<S> {
    /// Reads the stored snapshot.  A missing snapshot gives an empty
    /// calendar; an unreadable or corrupt one also gives an empty calendar
    /// plus a warning for the user.
    pub(crate) fn load(storage: S) -> (EventStore<S>, Option<LoadWarning>) {
        let (events, warning) = match storage.get(EVENTS_KEY) {
            Ok(Some(src)) => match serde_json::from_str::<Vec<Event>>(&src) {
                Ok(events) => (events, None),
                Err(e) => (Vec::new(), Some(LoadWarning::Corrupt(e))),
            },
            Ok(None) => (Vec::new(), None),
            Err(e) => (Vec::new(), Some(LoadWarning::Unreadable(e))),
        };
        if let Some(ref w) = warning {
            log::warn!("{w}: {w:?}");
        } else {
            log::info!("Loaded {} saved events", events.len());
        }
        let strays = events.iter().filter(|ev| !is_selectable(ev.day())).count();
        if strays > 0 {
            log::warn!("{strays} saved events fall outside the allowed season or weekend days");
        }
        (EventStore { storage, events }, warning)
    }

    pub(crate) fn events(&self) -> &[Event] {
        &self.events
    }

    /// The events on days of `ym`, earliest first
    pub(crate) fn events_in_month(&self, ym: YearMonth) -> Vec<&Event> {
        let mut events = self
            .events
            .iter()
            .filter(|ev| ym.contains(ev.day()))
            .collect::<Vec<_>>();
        events.sort_by_key(|ev| ev.date);
        events
    }

    pub(crate) fn add(&mut self, event: Event) -> Result<(), StoreError> {
        if self.events.iter().any(|ev| ev.id == event.id) {
            return Err(StoreError::DuplicateId(event.id));
        }
        log::info!("Adding event {:?} on {}", event.title, event.day());
        self.events.push(event);
        if let Err(e) = self.persist() {
            self.events.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Returns whether an event was removed.  Removing an unknown id is a
    /// no-op and does not touch storage.
    pub(crate) fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        let Some(pos) = self.events.iter().position(|ev| ev.id == id) else {
            return Ok(false);
        };
        let removed = self.events.remove(pos);
        if let Err(e) = self.persist() {
            self.events.insert(pos, removed);
            return Err(e);
        }
        log::info!("Removed event {:?} on {}", removed.title, removed.day());
        Ok(true)
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let src = serde_json::to_string(&self.events)?;
        self.storage.set(EVENTS_KEY, &src).map_err(|e| {
            log::error!("Failed to save events: {e}");
            StoreError::from(e)
        })
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &S {
        &self.storage
    }

    #[cfg(test)]
    pub(crate) fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

#[derive(Debug, Error)]
pub(crate) enum LoadWarning {
    #[error("Saved events could not be understood, so the calendar starts empty")]
    Corrupt(#[source] serde_json::Error),
    #[error("Saved events could not be read, so the calendar starts empty")]
    Unreadable(#[source] StorageError),
}

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("an event with id {0:?} already exists")]
    DuplicateId(String),
    #[error("failed to serialize events")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to save events")]
    Persist(#[from] StorageError),
}
