//! Three-generation grid ring for the two-stage Runge-Kutta step.
//!
//! [`GridRing`] owns three grids and assigns them the *previous*,
//! *current*, and *future* roles. Roles are tracked by slot index and
//! changed by relabelling, so no cell data is ever copied between
//! generations.
//!
//! For a full step starting from slots `(p, c, f)`:
//!
//! ```text
//! stage       reads previous   reads current   writes future
//! predictor   p  (y_{n-1})     c  (y_n)        f  (y*)
//! corrector   c  (y_n)         f  (y*)         p  (y_{n+1})
//! complete    roles become (c, p, f): previous = y_n, current = y_{n+1}
//! ```

use tauflow_core::RkStage;

use crate::error::GridError;
use crate::grid::Grid;

/// Three grid generations with explicit read/write roles.
#[derive(Clone, Debug)]
pub struct GridRing {
    slots: [Grid; 3],
    previous: usize,
    current: usize,
    future: usize,
}

impl GridRing {
    /// Start a ring from one initial state. All three generations begin
    /// as copies of `initial`, so the first step sees a zero time
    /// derivative between *previous* and *current*.
    pub fn new(initial: Grid) -> Self {
        Self {
            slots: [initial.clone(), initial.clone(), initial],
            previous: 0,
            current: 1,
            future: 2,
        }
    }

    /// Build a ring from explicit generations.
    pub fn from_generations(previous: Grid, current: Grid, future: Grid) -> Result<Self, GridError> {
        for other in [&current, &future] {
            if !previous.same_shape(other) {
                return Err(GridError::ShapeMismatch {
                    expected: previous.dims().as_tuple(),
                    found: other.dims().as_tuple(),
                });
            }
        }
        Ok(Self {
            slots: [previous, current, future],
            previous: 0,
            current: 1,
            future: 2,
        })
    }

    /// The *previous* generation.
    pub fn previous(&self) -> &Grid {
        &self.slots[self.previous]
    }

    /// The *current* generation.
    pub fn current(&self) -> &Grid {
        &self.slots[self.current]
    }

    /// The *current* generation, mutably (initial conditions, tests).
    pub fn current_mut(&mut self) -> &mut Grid {
        &mut self.slots[self.current]
    }

    /// The *future* generation (scratch between steps).
    pub fn future(&self) -> &Grid {
        &self.slots[self.future]
    }

    /// Borrow the generations a stage reads and writes:
    /// `(previous, current, &mut future)` in that stage's roles.
    pub fn split(&mut self, stage: RkStage) -> (&Grid, &Grid, &mut Grid) {
        let (read_prev, read_cur, write) = match stage {
            RkStage::Predictor => (self.previous, self.current, self.future),
            RkStage::Corrector => (self.current, self.future, self.previous),
        };
        let [a, b, c] = &mut self.slots;
        let mut refs = [Some(a), Some(b), Some(c)];
        // Slot indices are a permutation of 0..3, so each take() succeeds once.
        let out = refs[write].take();
        let prev = refs[read_prev].take();
        let cur = refs[read_cur].take();
        match (prev, cur, out) {
            (Some(prev), Some(cur), Some(out)) => (&*prev, &*cur, out),
            _ => unreachable!("ring roles are always a permutation of three slots"),
        }
    }

    /// Finish a full predictor-corrector step: the corrector output
    /// becomes *current* and the start-of-step state becomes *previous*.
    pub fn complete_step(&mut self) {
        std::mem::swap(&mut self.previous, &mut self.current);
    }
}
