//! Minimal world used by the unit tests of this module.
//!
//! A `Board` holds sliders in numbered slots; a slot set to `None` is a
//! destroyed entity. Sliders have two fields so that field-masked patches
//! can be observed.

use super::action::Editable;
use super::diffable::{DiffError, Diffable, Patch};
use super::target::{EntityWorld, FocusRouter, Resolve};

/// A slider whose label makes snapshotting fail, for error-path tests.
pub(crate) const UNREADABLE: &str = "unreadable";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Slider {
    pub label: String,
    pub value: i32,
}

impl Slider {
    pub fn new(label: &str, value: i32) -> Self {
        Self {
            label: label.to_owned(),
            value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SliderDiff {
    pub label: Option<String>,
    pub value: Option<i32>,
}

impl Patch for SliderDiff {
    fn len(&self) -> usize {
        usize::from(self.label.is_some()) + usize::from(self.value.is_some())
    }
}

pub(crate) struct SliderKind;

impl Diffable for SliderKind {
    type Target = Slider;
    type Snapshot = Slider;
    type Diff = SliderDiff;

    fn snapshot(target: &Slider) -> Result<Slider, DiffError> {
        if target.label == UNREADABLE {
            return Err(DiffError::Capture("unreadable slider".into()));
        }
        Ok(target.clone())
    }

    fn diff(from: &Slider, to: &Slider) -> SliderDiff {
        SliderDiff {
            label: (from.label != to.label).then(|| to.label.clone()),
            value: (from.value != to.value).then_some(to.value),
        }
    }

    fn apply(target: &mut Slider, diff: &SliderDiff) -> Result<(), DiffError> {
        if let Some(label) = &diff.label {
            target.label = label.clone();
        }
        if let Some(value) = diff.value {
            target.value = value;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(crate) struct Board {
    pub slots: Vec<Option<Slider>>,
    pub focus: Vec<String>,
}

impl Board {
    pub fn with(sliders: &[Slider]) -> Self {
        Self {
            slots: sliders.iter().cloned().map(Some).collect(),
            focus: Vec::new(),
        }
    }

    pub fn slider(&self, handle: usize) -> &Slider {
        self.slots[handle].as_ref().unwrap()
    }

    pub fn slider_mut(&mut self, handle: usize) -> &mut Slider {
        self.slots[handle].as_mut().unwrap()
    }

    pub fn destroy(&mut self, handle: usize) {
        self.slots[handle] = None;
    }
}

impl Editable for Board {}

impl EntityWorld for Board {
    type Handle = usize;

    fn is_destroyed(&self, handle: usize) -> bool {
        !matches!(self.slots.get(handle), Some(Some(_)))
    }
}

impl Resolve<SliderKind> for Board {
    fn resolve(&self, handle: usize) -> Option<&Slider> {
        self.slots.get(handle)?.as_ref()
    }

    fn resolve_mut(&mut self, handle: usize) -> Option<&mut Slider> {
        self.slots.get_mut(handle)?.as_mut()
    }
}

impl FocusRouter<usize> for Board {
    fn select_entity(&mut self, handle: usize) {
        self.focus.push(format!("select {handle}"));
    }

    fn focus_field(&mut self, handle: usize, path: &str) {
        self.focus.push(format!("focus {handle} {path}"));
    }
}
