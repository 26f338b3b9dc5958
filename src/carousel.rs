//! Carousel controller.
//!
//! [`Carousel`] is a pure state machine over a cyclic slide index. The
//! auto-advance timer is a separate resource, [`AutoAdvance`], owned by a
//! [`MountedCarousel`] and aborted when the mount goes away.

use crate::config::CarouselConfig;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

/// Pixel geometry of the slide strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideGeometry {
    pub slide_width: f64,
    pub gap: f64,
    pub viewport_width: f64,
}

impl SlideGeometry {
    pub fn from_config(config: &CarouselConfig) -> Self {
        Self {
            slide_width: config.slide_width_px,
            gap: config.slide_gap_px,
            viewport_width: config.viewport_width_px,
        }
    }

    /// Distance between the left edges of two neighbouring slides.
    pub fn step(&self) -> f64 {
        self.slide_width + self.gap
    }

    /// Offset that centers a slide in the viewport.
    fn center_offset(&self) -> f64 {
        (self.viewport_width - self.slide_width) / 2.0
    }
}

/// How the strip moves to its next position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Smooth,
    /// Follows the pointer with no easing.
    Instant,
}

impl Transition {
    pub fn css(self) -> &'static str {
        match self {
            Transition::Smooth => "transform .35s ease",
            Transition::Instant => "none",
        }
    }
}

/// Visual class of a slide relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideClass {
    Active,
    Adjacent,
    Far,
}

impl SlideClass {
    pub fn css(self) -> &'static str {
        match self {
            SlideClass::Active => "active",
            SlideClass::Adjacent => "adjacent",
            SlideClass::Far => "far",
        }
    }
}

/// Result of releasing a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    Advanced,
    Retreated,
    SnappedBack,
    /// Pointer released without a drag in progress.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Carousel {
    len: usize,
    index: usize,
    geometry: SlideGeometry,
    translate: f64,
    prev_translate: f64,
    drag_start: Option<f64>,
    transition: Transition,
}

impl Carousel {
    pub fn new(len: usize, geometry: SlideGeometry) -> Self {
        let mut carousel = Self {
            len,
            index: 0,
            geometry,
            translate: 0.0,
            prev_translate: 0.0,
            drag_start: None,
            transition: Transition::Instant,
        };
        carousel.recenter(Transition::Instant);
        carousel
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn translate(&self) -> f64 {
        self.translate
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    /// CSS transform for the strip.
    pub fn transform(&self) -> String {
        format!("translateX({}px)", self.translate)
    }

    /// `i -> (i + 1) mod N`
    pub fn advance(&mut self) {
        if self.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.len;
        self.recenter(Transition::Smooth);
    }

    /// `i -> (i - 1 + N) mod N`
    pub fn retreat(&mut self) {
        if self.is_empty() {
            return;
        }
        self.index = (self.index + self.len - 1) % self.len;
        self.recenter(Transition::Smooth);
    }

    pub fn pointer_down(&mut self, x: f64) {
        if self.is_empty() {
            return;
        }
        self.drag_start = Some(x);
        self.transition = Transition::Instant;
    }

    pub fn pointer_move(&mut self, x: f64) {
        if let Some(start) = self.drag_start {
            self.translate = self.prev_translate + (x - start);
        }
    }

    /// Ends a drag: more than a quarter step left advances, right retreats.
    pub fn pointer_up(&mut self, x: f64) -> SwipeOutcome {
        let Some(start) = self.drag_start.take() else {
            return SwipeOutcome::Ignored;
        };

        let delta = x - start;
        let threshold = self.geometry.step() / 4.0;
        let outcome = if delta < -threshold {
            self.index = (self.index + 1) % self.len;
            SwipeOutcome::Advanced
        } else if delta > threshold {
            self.index = (self.index + self.len - 1) % self.len;
            SwipeOutcome::Retreated
        } else {
            SwipeOutcome::SnappedBack
        };
        self.recenter(Transition::Smooth);
        outcome
    }

    /// New viewport width; the index is kept.
    pub fn resize(&mut self, viewport_width: f64) {
        self.geometry.viewport_width = viewport_width;
        self.recenter(Transition::Instant);
    }

    /// Class of slide `i`, by plain index distance from the current slide.
    pub fn classify(&self, i: usize) -> SlideClass {
        match i.abs_diff(self.index) {
            0 => SlideClass::Active,
            1 => SlideClass::Adjacent,
            _ => SlideClass::Far,
        }
    }

    pub fn classes(&self) -> Vec<SlideClass> {
        (0..self.len).map(|i| self.classify(i)).collect()
    }

    fn recenter(&mut self, transition: Transition) {
        self.translate =
            -(self.index as f64 * self.geometry.step()) + self.geometry.center_offset();
        self.prev_translate = self.translate;
        self.transition = transition;
    }
}

/// Carousel state shared between the view and its timer.
pub type SharedCarousel = Arc<Mutex<Carousel>>;

fn lock(carousel: &SharedCarousel) -> MutexGuard<'_, Carousel> {
    carousel.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Periodic auto-advance. Aborted when dropped.
#[derive(Debug)]
pub struct AutoAdvance {
    handle: JoinHandle<()>,
}

impl AutoAdvance {
    /// Starts ticking every `period`; the first advance happens after one period.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(carousel: SharedCarousel, period: Duration, pause_while_dragging: bool) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                let mut state = lock(&carousel);
                if !(pause_while_dragging && state.is_dragging()) {
                    state.advance();
                }
            }
        });
        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A carousel attached to a view, holding its timer for as long as it lives.
#[derive(Debug)]
pub struct MountedCarousel {
    state: SharedCarousel,
    timer: Option<AutoAdvance>,
}

impl MountedCarousel {
    /// Mounts a carousel of `len` slides and starts auto-advance (if any slides).
    pub fn mount(len: usize, config: &CarouselConfig) -> Self {
        let state = Arc::new(Mutex::new(Carousel::new(len, SlideGeometry::from_config(config))));
        let timer = (len > 0).then(|| {
            AutoAdvance::start(state.clone(), config.interval(), config.pause_while_dragging)
        });
        Self { state, timer }
    }

    pub fn state(&self) -> SharedCarousel {
        self.state.clone()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Carousel {
        lock(&self.state).clone()
    }

    /// Runs `f` against the live state.
    pub fn with<R>(&self, f: impl FnOnce(&mut Carousel) -> R) -> R {
        f(&mut lock(&self.state))
    }

    pub fn has_timer(&self) -> bool {
        self.timer.as_ref().is_some_and(AutoAdvance::is_running)
    }

    /// Stops the timer; the state stays readable.
    pub fn stop(&mut self) {
        self.timer = None;
    }
}
