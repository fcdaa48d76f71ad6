//! Random action sequences against both document variants.

use proptest::prelude::*;

use super::{Action, BannerDocument, Composition, LogoDocument, Parameter};
use crate::config::ICON_CAPACITY;
use crate::icon::SelectedIcon;
use crate::icon::tests::selected;

const COLORS: [&str; 4] = ["#111111", "#ef4444", "#00ff00", "#3b82f6"];

/// One user step, resolved into an [`Action`] against the current document.
#[derive(Debug, Clone, Copy)]
enum Step {
    Add { id: u8, slot: Option<usize> },
    Remove(usize),
    Swap(usize, usize),
    /// Rotate the current order left by `turn`, then optionally reverse it.
    Reorder { turn: usize, flip: bool },
    Color(usize),
    ColorAt(usize, usize),
    Border(usize),
    Param(Parameter, u32),
}

fn step() -> impl Strategy<Value = Step> {
    // Indices run past the capacity so out-of-range positions are covered.
    prop_oneof![
        3 => (0u8..6, prop::option::of(0usize..6)).prop_map(|(id, slot)| Step::Add { id, slot }),
        2 => (0usize..6).prop_map(Step::Remove),
        1 => (0usize..6, 0usize..6).prop_map(|(a, b)| Step::Swap(a, b)),
        1 => (0usize..4, any::<bool>()).prop_map(|(turn, flip)| Step::Reorder { turn, flip }),
        1 => (0usize..COLORS.len()).prop_map(Step::Color),
        1 => (0usize..6, 0usize..COLORS.len()).prop_map(|(slot, c)| Step::ColorAt(slot, c)),
        1 => (0usize..COLORS.len()).prop_map(Step::Border),
        1 => (prop::sample::select(Parameter::ALL.to_vec()), 0u32..5000)
            .prop_map(|(p, v)| Step::Param(p, v)),
    ]
}

fn to_action<D: Composition>(doc: &D, step: Step) -> Action {
    match step {
        Step::Add { id, slot } => Action::AddIcon {
            icon: selected(&format!("icon-{id}")),
            slot,
        },
        Step::Remove(position) => Action::RemoveIcon(position),
        Step::Swap(a, b) => Action::SwapSlots(a, b),
        Step::Reorder { turn, flip } => {
            let mut icons: Vec<SelectedIcon> = doc.icons().into_iter().cloned().collect();
            if !icons.is_empty() {
                let turn = turn % icons.len();
                icons.rotate_left(turn);
            }
            if flip {
                icons.reverse();
            }
            Action::ReorderIcons(icons)
        }
        Step::Color(c) => Action::SetIconColor(COLORS[c].into()),
        Step::ColorAt(slot, c) => Action::SetIconColorAt {
            slot,
            color: COLORS[c].into(),
        },
        Step::Border(c) => Action::SetBorderColor(COLORS[c].into()),
        Step::Param(parameter, value) => Action::SetParameter(parameter, value),
    }
}

fn sorted_ids(icons: Vec<&SelectedIcon>) -> Vec<String> {
    let mut ids: Vec<String> = icons.iter().map(|i| i.record.object_id.clone()).collect();
    ids.sort();
    ids
}

proptest! {
    #[test]
    fn banner_sequences_keep_their_invariants(steps in prop::collection::vec(step(), 0..40)) {
        let mut doc = BannerDocument::default();
        for step in steps {
            let before = doc.clone();
            let len = before.selected_icons.len();
            let action = to_action(&doc, step);
            doc.reduce(action);

            match step {
                Step::Add { .. } => {
                    prop_assert_eq!(doc.selected_icons.len(), (len + 1).min(ICON_CAPACITY));
                    prop_assert_eq!(&doc.selected_icons[..len], &before.selected_icons[..]);
                }
                Step::Remove(index) if index < len => {
                    let mut expected = before.selected_icons.clone();
                    expected.remove(index);
                    prop_assert_eq!(&doc.selected_icons, &expected);
                }
                Step::Remove(_) => {
                    prop_assert_eq!(&doc, &before);
                }
                Step::Reorder { .. } => {
                    prop_assert_eq!(sorted_ids(doc.icons()), sorted_ids(before.icons()));
                }
                _ => {}
            }
            prop_assert!(doc.icon_count() <= ICON_CAPACITY);
        }

        let restored = BannerDocument::restore(&serde_json::to_string(&doc).unwrap());
        prop_assert_eq!(restored, doc);
    }

    #[test]
    fn grid_sequences_keep_their_invariants(steps in prop::collection::vec(step(), 0..40)) {
        let mut doc = LogoDocument::default();
        for step in steps {
            let before = doc.clone();
            let action = to_action(&doc, step);
            doc.reduce(action);

            match step {
                Step::Add { .. } => {
                    let changed = (0..ICON_CAPACITY)
                        .filter(|&slot| doc.selected_icons[slot] != before.selected_icons[slot])
                        .count();
                    prop_assert!(changed <= 1);
                    prop_assert_eq!(&doc.icon_colors, &before.icon_colors);
                }
                Step::Remove(slot) if slot < ICON_CAPACITY => {
                    for other in (0..ICON_CAPACITY).filter(|&s| s != slot) {
                        prop_assert_eq!(&doc.selected_icons[other], &before.selected_icons[other]);
                        prop_assert_eq!(&doc.icon_colors[other], &before.icon_colors[other]);
                    }
                    prop_assert!(doc.selected_icons[slot].is_none());
                    prop_assert_eq!(&doc.icon_colors[slot], &doc.icon_color);
                }
                Step::Reorder { .. } => {
                    prop_assert_eq!(sorted_ids(doc.icons()), sorted_ids(before.icons()));
                }
                _ => {}
            }
            prop_assert!(doc.icon_count() <= ICON_CAPACITY);
        }

        let restored = LogoDocument::restore(&serde_json::to_string(&doc).unwrap());
        prop_assert_eq!(restored, doc);
    }
}
