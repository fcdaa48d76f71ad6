//! The arrangement surface: user gestures on top of a [`Store`].
//!
//! The surface translates gestures into store actions and tracks the
//! transient view state that is never persisted: whether the export dialog
//! is open and which off-screen replicas are mounted.

use std::collections::BTreeMap;

use crate::composition::{Composition, CompositionKind, Parameter};
use crate::export::Scene;
use crate::icon::{IconRecord, IconVariant, SelectedIcon};
use crate::store::Store;

pub struct ArrangementSurface<D: Composition> {
    store: Store<D>,
    export_open: bool,
    mounts: BTreeMap<u64, Scene>,
    next_mount: u64,
}

impl<D: Composition> ArrangementSurface<D> {
    pub fn new(store: Store<D>) -> Self {
        Self {
            store,
            export_open: false,
            mounts: BTreeMap::new(),
            next_mount: 0,
        }
    }

    pub fn store(&self) -> &Store<D> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store<D> {
        &mut self.store
    }

    pub fn document(&self) -> &D {
        self.store.document()
    }

    // ========================================================================
    // Gestures
    // ========================================================================

    /// Commits a search hit in the chosen variant.
    ///
    /// Returns false, changing nothing, if the record does not offer that
    /// variant.
    pub fn pick(&mut self, record: &IconRecord, variant: &IconVariant, slot: Option<usize>) -> bool {
        if !record.offers(variant) {
            log::warn!(
                "{} is not available as {}/{}",
                record.object_id,
                variant.family,
                variant.style
            );
            return false;
        }
        self.store.add_icon(record.select(variant), slot);
        true
    }

    pub fn remove(&mut self, position: usize) {
        self.store.remove_icon(position);
    }

    /// Ends a drag from `from`. A drop outside any target (`to == None`)
    /// changes nothing.
    ///
    /// Banner items are spliced into their new position; grid slots are
    /// exchanged.
    pub fn drag(&mut self, from: usize, to: Option<usize>) {
        let Some(to) = to else {
            log::debug!("drag from {from} dropped outside, ignoring");
            return;
        };
        if from == to {
            return;
        }
        match D::KIND {
            CompositionKind::Banner => {
                let mut icons: Vec<SelectedIcon> =
                    self.document().icons().into_iter().cloned().collect();
                if from >= icons.len() {
                    return;
                }
                let moved = icons.remove(from);
                icons.insert(to.min(icons.len()), moved);
                self.store.reorder_icons(icons);
            }
            CompositionKind::Logo => self.store.swap_slots(from, to),
        }
    }

    /// Sets the icon colour globally, or for one grid slot.
    pub fn recolor(&mut self, color: impl Into<String>, slot: Option<usize>) {
        match slot {
            Some(slot) => self.store.set_icon_color_at(slot, color),
            None => self.store.set_icon_color(color),
        }
    }

    pub fn set_border_color(&mut self, color: impl Into<String>) {
        self.store.set_border_color(color);
    }

    /// Sets a parameter through its input control, clamping to the
    /// control's range. Returns the value actually applied.
    pub fn set_parameter(&mut self, parameter: Parameter, value: u32) -> u32 {
        let clamped = parameter.clamp(D::KIND, value);
        if clamped != value {
            log::debug!("{parameter} {value} clamped to {clamped}");
        }
        self.store.set_parameter(parameter, clamped);
        clamped
    }

    // ========================================================================
    // View State
    // ========================================================================

    pub fn open_export(&mut self) {
        self.export_open = true;
    }

    pub fn close_export(&mut self) {
        self.export_open = false;
    }

    pub fn is_export_open(&self) -> bool {
        self.export_open
    }

    /// Whether the on-screen arrangement is rendered right now.
    pub fn is_mounted(&self) -> bool {
        self.document().has_render_target()
    }

    /// Mounts an off-screen replica of `scene` until the returned guard is
    /// dropped.
    pub fn scaffold(&mut self, scene: Scene) -> Scaffold<'_> {
        let id = self.next_mount;
        self.next_mount += 1;
        self.mounts.insert(id, scene);
        log::debug!("mounted scaffold {id}");
        Scaffold {
            mounts: &mut self.mounts,
            id,
        }
    }

    /// Number of off-screen replicas currently mounted.
    pub fn scaffold_count(&self) -> usize {
        self.mounts.len()
    }
}

/// An off-screen replica, unmounted when dropped.
pub struct Scaffold<'a> {
    mounts: &'a mut BTreeMap<u64, Scene>,
    id: u64,
}

impl Scaffold<'_> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn scene(&self) -> &Scene {
        // Present for as long as the guard holds the exclusive borrow.
        &self.mounts[&self.id]
    }
}

impl Drop for Scaffold<'_> {
    fn drop(&mut self) {
        self.mounts.remove(&self.id);
        log::debug!("unmounted scaffold {}", self.id);
    }
}
