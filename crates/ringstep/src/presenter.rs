//! Step presentation: turns the authoritative step into per-element
//! transforms and runs the transitions between them.

use crate::clock::Millis;
use crate::config::StepperConfig;
use crate::geometry::{LayoutGeometry, Point};
use crate::tween::{Easing, Transform, Tween};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKey {
    Ring,
    Icon(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Element {
    /// Where the element is heading (or resting).
    target: Transform,
    tween: Option<Tween>,
}

impl Element {
    fn resting(target: Transform) -> Self {
        Self {
            target,
            tween: None,
        }
    }

    fn current(&self, now: Millis) -> Transform {
        self.tween.map_or(self.target, |t| t.sample(now))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemFrame {
    pub index: usize,
    /// Offset from the ring centre.
    pub position: Point,
    pub transform: Transform,
    pub active: bool,
}

/// Everything a host needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub ring_rotation: f64,
    pub radius: f64,
    pub active_index: usize,
    pub items: Vec<ItemFrame>,
}

pub struct StepPresenter {
    geometry: LayoutGeometry,
    elements: BTreeMap<ElementKey, Element>,
    active_index: usize,
    duration_ms: u64,
    easing: Easing,
    inactive_opacity: f64,
    inactive_scale: f64,
    transitions_started: u64,
}

impl StepPresenter {
    pub fn new(config: &StepperConfig, geometry: LayoutGeometry) -> Self {
        Self {
            geometry,
            elements: BTreeMap::new(),
            active_index: 0,
            duration_ms: config.transition_duration_ms,
            easing: config.easing,
            inactive_opacity: config.inactive_opacity,
            inactive_scale: config.inactive_scale,
            transitions_started: 0,
        }
    }

    pub fn geometry(&self) -> &LayoutGeometry {
        &self.geometry
    }

    pub fn set_geometry(&mut self, geometry: LayoutGeometry) {
        self.geometry = geometry;
    }

    pub fn attach(&mut self, key: ElementKey) {
        self.elements
            .entry(key)
            .or_insert_with(|| Element::resting(Transform::IDENTITY));
    }

    /// Attaches the ring and one icon per step.
    pub fn attach_all(&mut self) {
        self.attach(ElementKey::Ring);
        for i in 0..self.geometry.step_count {
            self.attach(ElementKey::Icon(i));
        }
    }

    /// Removes an element together with any transition it was running.
    pub fn detach(&mut self, key: ElementKey) -> bool {
        self.elements.remove(&key).is_some()
    }

    pub fn detach_all(&mut self) {
        self.elements.clear();
    }

    /// Number of `present` calls that started at least one transition.
    pub fn transitions_started(&self) -> u64 {
        self.transitions_started
    }

    fn targets(&self, active: usize, fraction: f64) -> Vec<(ElementKey, Transform)> {
        let ring = self.geometry.ring_rotation(active, fraction);
        std::iter::once((
            ElementKey::Ring,
            Transform {
                rotation: ring,
                ..Transform::IDENTITY
            },
        ))
        .chain((0..self.geometry.step_count).map(|i| {
            let is_active = i == active;
            (
                ElementKey::Icon(i),
                Transform {
                    rotation: self.geometry.counter_rotation(i, ring),
                    opacity: if is_active { 1.0 } else { self.inactive_opacity },
                    scale: if is_active { 1.0 } else { self.inactive_scale },
                },
            )
        }))
        .collect()
    }

    /// Moves every attached element toward the visual state of `active`.
    ///
    /// With `animate`, elements whose target changed get a fresh tween that
    /// starts from their current sampled value, replacing whatever was
    /// running. Without it, elements snap. Keys that are not attached are
    /// skipped. Returns the number of tweens started.
    pub fn present(&mut self, active: usize, fraction: f64, now: Millis, animate: bool) -> usize {
        self.active_index = active;
        let mut started = 0;

        for (key, target) in self.targets(active, fraction) {
            let Some(element) = self.elements.get_mut(&key) else {
                log::trace!("skipping detached element {:?}", key);
                continue;
            };

            if !animate {
                *element = Element::resting(target);
                continue;
            }
            if element.target.approx_eq(&target) {
                continue;
            }

            element.tween = Some(Tween {
                from: element.current(now),
                to: target,
                start: now,
                duration_ms: self.duration_ms,
                easing: self.easing,
            });
            element.target = target;
            started += 1;
        }

        if started > 0 {
            self.transitions_started += 1;
        }
        started
    }

    /// Snaps every running transition to its target.
    pub fn cancel_all(&mut self) {
        for element in self.elements.values_mut() {
            element.tween = None;
        }
    }

    /// Drops finished tweens.
    pub fn prune(&mut self, now: Millis) {
        for element in self.elements.values_mut() {
            if element.tween.is_some_and(|t| t.is_finished(now)) {
                element.tween = None;
            }
        }
    }

    pub fn is_animating(&self, now: Millis) -> bool {
        self.elements
            .values()
            .any(|e| e.tween.is_some_and(|t| !t.is_finished(now)))
    }

    pub fn transform(&self, key: ElementKey, now: Millis) -> Option<Transform> {
        self.elements.get(&key).map(|e| e.current(now))
    }

    pub fn frame(&self, now: Millis) -> Frame {
        let ring_rotation = self
            .transform(ElementKey::Ring, now)
            .map_or_else(
                || self.geometry.ring_rotation(self.active_index, 0.0),
                |t| t.rotation,
            );

        let items = self
            .elements
            .iter()
            .filter_map(|(key, element)| match key {
                ElementKey::Icon(i) if *i < self.geometry.step_count => Some(ItemFrame {
                    index: *i,
                    position: self.geometry.offset(*i, ring_rotation),
                    transform: element.current(now),
                    active: *i == self.active_index,
                }),
                _ => None,
            })
            .collect();

        Frame {
            ring_rotation,
            radius: self.geometry.radius,
            active_index: self.active_index,
            items,
        }
    }
}
