//! The single source of truth for one composition document.
//!
//! The store owns the document, persists it after every committed action
//! and notifies subscribers with the new state. Persistence failures are
//! logged and otherwise ignored: the in-memory document stays
//! authoritative for the rest of the session.

use std::fmt;

use crate::composition::{Action, Composition, Parameter};
use crate::icon::SelectedIcon;
use crate::storage::Storage;

type Subscriber<D> = Box<dyn FnMut(&D)>;

pub struct Store<D: Composition> {
    document: D,
    storage: Box<dyn Storage>,
    subscribers: Vec<Subscriber<D>>,
}

impl<D: Composition> fmt::Debug for Store<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("document", &self.document)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl<D: Composition> Store<D> {
    /// Restores the document persisted under [`Composition::STORAGE_KEY`],
    /// falling back to defaults when nothing usable is stored.
    pub fn load(storage: Box<dyn Storage>) -> Self {
        let document = match storage.read(D::STORAGE_KEY) {
            Ok(Some(raw)) => D::restore(&raw),
            Ok(None) => {
                log::info!("no saved {} found, starting fresh", D::KIND);
                D::default()
            }
            Err(err) => {
                log::warn!("failed to read saved {}: {err}", D::KIND);
                D::default()
            }
        };
        Self {
            document,
            storage,
            subscribers: Vec::new(),
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Registers a callback invoked with the new document after each action.
    pub fn subscribe(&mut self, callback: impl FnMut(&D) + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    /// Applies one action: reduce, persist, then notify.
    pub fn dispatch(&mut self, action: Action) {
        log::trace!("{} <- {action:?}", D::KIND);
        let mut next = self.document.clone();
        next.reduce(action);
        if next == self.document {
            return;
        }
        self.document = next;
        self.persist();
        for subscriber in &mut self.subscribers {
            subscriber(&self.document);
        }
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.document) {
            Ok(json) => json,
            Err(err) => {
                log::error!("failed to serialize {}: {err}", D::KIND);
                return;
            }
        };
        if let Err(err) = self.storage.write(D::STORAGE_KEY, &json) {
            log::error!("failed to save {}: {err}", D::KIND);
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    pub fn set_parameter(&mut self, parameter: Parameter, value: u32) {
        self.dispatch(Action::SetParameter(parameter, value));
    }

    pub fn set_border_color(&mut self, color: impl Into<String>) {
        self.dispatch(Action::SetBorderColor(color.into()));
    }

    pub fn set_icon_color(&mut self, color: impl Into<String>) {
        self.dispatch(Action::SetIconColor(color.into()));
    }

    pub fn set_icon_color_at(&mut self, slot: usize, color: impl Into<String>) {
        self.dispatch(Action::SetIconColorAt {
            slot,
            color: color.into(),
        });
    }

    pub fn add_icon(&mut self, icon: SelectedIcon, slot: Option<usize>) {
        self.dispatch(Action::AddIcon { icon, slot });
    }

    pub fn remove_icon(&mut self, index: usize) {
        self.dispatch(Action::RemoveIcon(index));
    }

    pub fn reorder_icons(&mut self, icons: Vec<SelectedIcon>) {
        self.dispatch(Action::ReorderIcons(icons));
    }

    pub fn swap_slots(&mut self, a: usize, b: usize) {
        self.dispatch(Action::SwapSlots(a, b));
    }
}
