//! Tick-pumped cooperative scheduler.
//!
//! # Invariants
//! - Tasks only run inside [`Scheduler::tick`]; nothing is preemptive.
//! - A task spawned during a tick first runs on the next tick.
//! - A cancelled task never runs again, even when cancelled mid-tick.

use log::debug;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt::{Debug, Formatter};
use std::rc::{Rc, Weak};
use std::time::Duration;
use uuid::Uuid;

/// Result of one cooperative step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Done,
}

/// Unit of work resumed once per tick with the tick's delta time.
pub trait CooperativeTask {
    fn step(&mut self, dt: Duration) -> TaskStatus;
}

impl<F> CooperativeTask for F
where
    F: FnMut(Duration) -> TaskStatus,
{
    fn step(&mut self, dt: Duration) -> TaskStatus {
        self(dt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// Owner tag used to cancel every task of one unit at once.
pub type TaskOwner = Uuid;

struct Slot {
    id: TaskId,
    owner: Option<TaskOwner>,
    task: Box<dyn CooperativeTask>,
}

#[derive(Default)]
struct SchedulerInner {
    next_id: Cell<u64>,
    ticking: Cell<bool>,
    elapsed: Cell<Duration>,
    tasks: RefCell<Vec<Slot>>,
    incoming: RefCell<Vec<Slot>>,
    cancelled: RefCell<HashSet<TaskId>>,
    cancelled_owners: RefCell<HashSet<TaskOwner>>,
}

/// Shared scheduler handle. Clones drive the same task list.
#[derive(Clone, Default)]
pub struct Scheduler {
    inner: Rc<SchedulerInner>,
}

#[derive(Clone)]
struct WeakScheduler {
    inner: Weak<SchedulerInner>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `task`; the returned handle cancels it when dropped.
    pub fn spawn(&self, task: impl CooperativeTask + 'static) -> TaskHandle {
        let id = self.enqueue(None, Box::new(task));
        TaskHandle {
            id,
            scheduler: self.downgrade(),
            detached: false,
        }
    }

    /// Queues `task` under `owner`; see [`Scheduler::cancel_owner`].
    pub fn spawn_owned(&self, owner: TaskOwner, task: impl CooperativeTask + 'static) -> TaskId {
        self.enqueue(Some(owner), Box::new(task))
    }

    /// Resumes every live task once.
    pub fn tick(&self, dt: Duration) {
        let inner = &self.inner;
        if inner.ticking.replace(true) {
            debug!("event=scheduler_tick module=schedule status=skip reason=reentrant");
            return;
        }
        inner.elapsed.set(inner.elapsed.get() + dt);

        let mut running = std::mem::take(&mut *inner.tasks.borrow_mut());
        running.append(&mut inner.incoming.borrow_mut());

        let mut kept = Vec::with_capacity(running.len());
        for mut slot in running {
            if self.is_cancelled(&slot) {
                continue;
            }
            let status = slot.task.step(dt);
            if status == TaskStatus::Pending && !self.is_cancelled(&slot) {
                kept.push(slot);
            }
        }

        // Tasks that already stepped may have been cancelled later in the tick.
        kept.retain(|slot| !self.is_cancelled(slot));
        inner.tasks.borrow_mut().append(&mut kept);
        inner.cancelled.borrow_mut().clear();
        inner.cancelled_owners.borrow_mut().clear();
        inner.ticking.set(false);
    }

    /// Cancels one task. Returns `false` when it already finished.
    pub fn cancel(&self, id: TaskId) -> bool {
        let removed = self.remove_where(|slot| slot.id == id);
        if self.inner.ticking.get() {
            self.inner.cancelled.borrow_mut().insert(id);
            return true;
        }
        removed > 0
    }

    /// Cancels every task spawned under `owner`. Returns how many queued
    /// tasks were dropped immediately.
    pub fn cancel_owner(&self, owner: TaskOwner) -> usize {
        let removed = self.remove_where(|slot| slot.owner == Some(owner));
        if self.inner.ticking.get() {
            self.inner.cancelled_owners.borrow_mut().insert(owner);
        }
        debug!(
            "event=task_cancel module=schedule status=ok owner={} removed={}",
            owner, removed
        );
        removed
    }

    /// Whether `id` is still queued.
    pub fn is_active(&self, id: TaskId) -> bool {
        let queued = |slots: &Vec<Slot>| slots.iter().any(|slot| slot.id == id);
        queued(&self.inner.tasks.borrow()) || queued(&self.inner.incoming.borrow())
    }

    /// Number of queued tasks, including ones spawned for the next tick.
    pub fn len(&self) -> usize {
        self.inner.tasks.borrow().len() + self.inner.incoming.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total time fed through `tick`.
    pub fn elapsed(&self) -> Duration {
        self.inner.elapsed.get()
    }

    fn enqueue(&self, owner: Option<TaskOwner>, task: Box<dyn CooperativeTask>) -> TaskId {
        let id = TaskId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner.incoming.borrow_mut().push(Slot { id, owner, task });
        id
    }

    fn is_cancelled(&self, slot: &Slot) -> bool {
        if self.inner.cancelled.borrow().contains(&slot.id) {
            return true;
        }
        slot.owner
            .is_some_and(|owner| self.inner.cancelled_owners.borrow().contains(&owner))
    }

    fn remove_where(&self, predicate: impl Fn(&Slot) -> bool) -> usize {
        let mut dropped = Vec::new();
        for list in [&self.inner.tasks, &self.inner.incoming] {
            let mut slots = list.borrow_mut();
            let mut index = 0;
            while index < slots.len() {
                if predicate(&slots[index]) {
                    dropped.push(slots.remove(index));
                } else {
                    index += 1;
                }
            }
        }
        let removed = dropped.len();
        // Task destructors run after the lists are released.
        drop(dropped);
        removed
    }

    fn downgrade(&self) -> WeakScheduler {
        WeakScheduler {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl WeakScheduler {
    fn upgrade(&self) -> Option<Scheduler> {
        self.inner.upgrade().map(|inner| Scheduler { inner })
    }
}

impl Debug for Scheduler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("tasks", &self.len())
            .field("elapsed", &self.elapsed())
            .finish()
    }
}

/// Cancels its task on drop unless detached.
pub struct TaskHandle {
    id: TaskId,
    scheduler: WeakScheduler,
    detached: bool,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn cancel(mut self) {
        self.cancel_now();
    }

    /// Lets the task run to completion without this handle.
    pub fn detach(mut self) {
        self.detached = true;
    }

    fn cancel_now(&mut self) {
        self.detached = true;
        if let Some(scheduler) = self.scheduler.upgrade() {
            scheduler.cancel(self.id);
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if !self.detached {
            self.cancel_now();
        }
    }
}

/// Tasks of one owning unit; dropping the group cancels all of them.
pub struct TaskGroup {
    owner: TaskOwner,
    scheduler: Scheduler,
}

impl TaskGroup {
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            owner: Uuid::new_v4(),
            scheduler,
        }
    }

    pub fn owner(&self) -> TaskOwner {
        self.owner
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn spawn(&self, task: impl CooperativeTask + 'static) -> TaskId {
        self.scheduler.spawn_owned(self.owner, task)
    }

    pub fn cancel_all(&self) -> usize {
        self.scheduler.cancel_owner(self.owner)
    }
}

impl Drop for TaskGroup {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
