// Stagger reveal - timer-paced load-in over a random permutation of the cells

use crate::config::RevealOrder;
use crate::grid::cell::Cell;
use log::debug;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Identifies one grid lifetime; bumped on every rebuild
pub type Epoch = u64;

/// A single scheduled reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealEvent {
    pub epoch: Epoch,
    pub index: usize,
    /// Offset from the start of the epoch
    pub at: Duration,
}

/// Cloneable cancellation flag for a schedule
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct StaggerSchedule {
    epoch: Epoch,
    order: Vec<usize>,
    delay: Duration,
    fired: usize,
    cancel: CancelHandle,
}

impl StaggerSchedule {
    pub fn new(order: Vec<usize>, delay: Duration, epoch: Epoch) -> Self {
        Self {
            epoch,
            order,
            delay,
            fired: 0,
            cancel: CancelHandle::default(),
        }
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Reveal order; position k fires at k * delay
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn scheduled_at(&self, position: usize) -> Duration {
        let steps = u32::try_from(position).unwrap_or(u32::MAX);
        self.delay.saturating_mul(steps)
    }

    /// Time from the first reveal to the last
    pub fn total_duration(&self) -> Duration {
        self.scheduled_at(self.order.len().saturating_sub(1))
    }

    pub fn pending(&self) -> usize {
        if self.is_cancelled() {
            0
        } else {
            self.order.len() - self.fired
        }
    }

    pub fn is_finished(&self) -> bool {
        self.pending() == 0
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// When the next reveal is due, if any remain
    pub fn next_due_at(&self) -> Option<Duration> {
        if self.is_finished() {
            None
        } else {
            Some(self.scheduled_at(self.fired))
        }
    }

    /// Pop every reveal scheduled at or before `elapsed`, in schedule order
    pub fn due(&mut self, elapsed: Duration) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        if self.is_cancelled() {
            return events;
        }
        while self.fired < self.order.len() {
            let at = self.scheduled_at(self.fired);
            if at > elapsed {
                break;
            }
            events.push(RevealEvent {
                epoch: self.epoch,
                index: self.order[self.fired],
                at,
            });
            self.fired += 1;
        }
        events
    }

    /// Fire due reveals straight into `cells`; returns how many were applied
    pub fn apply_due(&mut self, cells: &mut [Cell], elapsed: Duration) -> usize {
        let mut applied = 0;
        for event in self.due(elapsed) {
            if let Some(cell) = cells.get_mut(event.index) {
                cell.visible = true;
                applied += 1;
            }
        }
        applied
    }
}

/// Fisher-Yates permutation of 0..count
pub fn shuffled_indices<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..count).collect();
    for i in (1..count).rev() {
        let j = rng.gen_range(0..=i);
        indices.swap(i, j);
    }
    indices
}

pub fn schedule_stagger_reveal<R: Rng + ?Sized>(
    cell_count: usize,
    delay: Duration,
    epoch: Epoch,
    rng: &mut R,
) -> StaggerSchedule {
    let order = shuffled_indices(cell_count, rng);
    debug!(
        "Scheduled stagger reveal of {} cells at {:?} intervals for epoch {}",
        cell_count, delay, epoch
    );
    StaggerSchedule::new(order, delay, epoch)
}

/// Load-in that walks the grid in index order
pub fn schedule_ordered_reveal(cell_count: usize, delay: Duration, epoch: Epoch) -> StaggerSchedule {
    debug!(
        "Scheduled row-major reveal of {} cells at {:?} intervals for epoch {}",
        cell_count, delay, epoch
    );
    StaggerSchedule::new((0..cell_count).collect(), delay, epoch)
}

pub fn schedule_reveal<R: Rng + ?Sized>(
    order: RevealOrder,
    cell_count: usize,
    delay: Duration,
    epoch: Epoch,
    rng: &mut R,
) -> StaggerSchedule {
    match order {
        RevealOrder::Shuffled => schedule_stagger_reveal(cell_count, delay, epoch, rng),
        RevealOrder::RowMajor => schedule_ordered_reveal(cell_count, delay, epoch),
    }
}
