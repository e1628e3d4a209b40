// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A fixed-size pool of long-lived worker threads fed from a single
//! FIFO queue.
//!
//! The pool is deliberately small: there are no priorities, no work
//! stealing and no way to cancel a job once it has been queued.  What
//! it does offer is a batch barrier.  Every submitted job receives a
//! [`Completion`] handle; the pool counts handles that are still
//! outstanding and [`WorkerPool::await_drain`] blocks until that count
//! falls back to zero.
//!
//! Two condition variables share the queue lock.  `job_ready` wakes
//! workers when the queue gains an item or the pool shuts down;
//! `drained` wakes whoever is waiting for the batch to finish.  The
//! last completion takes the queue lock before notifying, and the
//! waiter tests the pending count while holding that same lock, so a
//! completion can never slip in between the test and the wait.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crossbeam::utils::CachePadded;
use log::{debug, error};

use crate::error::{Error, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Queue {
    jobs: VecDeque<Job>,
    shutdown: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    job_ready: Condvar,
    drained: Condvar,
    pending: CachePadded<AtomicUsize>,
    failures: Mutex<Vec<String>>,
}

impl Shared {
    // Nothing panics while either lock is held, so a poisoned guard
    // still protects consistent data.
    fn lock_queue(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_failures(&self) -> MutexGuard<'_, Vec<String>> {
        self.failures.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn complete_one(&self) {
        let previous = self.pending.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "pending job count went negative");
        if previous == 1 {
            let _queue = self.lock_queue();
            self.drained.notify_all();
        }
    }
}

/// Handed to every job.  The job calls [`Completion::finish`] once its
/// side effects are in place; that is what lets the batch drain.
///
/// A handle that is dropped without being finished, which is what
/// happens when its job panics, still releases its slot in the
/// pending count but is recorded as a failure and reported by the
/// next [`WorkerPool::await_drain`].
pub struct Completion {
    shared: Arc<Shared>,
    finished: bool,
}

impl Completion {
    /// Marks the job as done.
    pub fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if !self.finished {
            let current = thread::current();
            let name = current.name().unwrap_or("<unnamed>");
            let reason = if thread::panicking() {
                format!("job panicked on {}", name)
            } else {
                format!("job on {} ended without finishing", name)
            };
            self.shared.lock_failures().push(reason);
        }
        self.shared.complete_one();
    }
}

/// The pool itself.  Dropping it shuts it down; queued work is still
/// run to completion before the workers exit.
pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `threads` workers.
    pub fn new(threads: usize) -> Result<WorkerPool> {
        if threads == 0 {
            return Err(Error::InvalidConfig(
                "a worker pool needs at least one thread".to_string(),
            ));
        }

        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                jobs: VecDeque::new(),
                shutdown: false,
            }),
            job_ready: Condvar::new(),
            drained: Condvar::new(),
            pending: CachePadded::new(AtomicUsize::new(0)),
            failures: Mutex::new(Vec::new()),
        });

        // Built up in place so that a failed spawn joins the workers
        // already started when `pool` is dropped.
        let mut pool = WorkerPool {
            shared,
            workers: Vec::with_capacity(threads),
        };
        for id in 0..threads {
            let shared = Arc::clone(&pool.shared);
            let handle = thread::Builder::new()
                .name(format!("mandelplot-worker-{}", id))
                .spawn(move || work(id, &shared))?;
            pool.workers.push(handle);
        }
        debug!("worker pool started with {} threads", threads);
        Ok(pool)
    }

    /// Number of worker threads.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Jobs submitted but not yet finished.
    pub fn pending(&self) -> usize {
        self.shared.pending.load(Ordering::Acquire)
    }

    /// Queues a job and wakes one idle worker.  Never waits for a
    /// worker to become free; the queue is unbounded.
    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce(Completion) + Send + 'static,
    {
        let completion = Completion {
            shared: Arc::clone(&self.shared),
            finished: false,
        };
        let mut queue = self.shared.lock_queue();
        self.shared.pending.fetch_add(1, Ordering::AcqRel);
        queue.jobs.push_back(Box::new(move || job(completion)));
        self.shared.job_ready.notify_one();
    }

    /// Blocks until every submitted job has released its completion.
    /// Returns at once when nothing is pending.  Jobs that failed since
    /// the previous drain are reported here.
    pub fn await_drain(&self) -> Result<()> {
        {
            let mut queue = self.shared.lock_queue();
            while self.shared.pending.load(Ordering::Acquire) != 0 {
                queue = self
                    .shared
                    .drained
                    .wait(queue)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        }

        let failures = std::mem::take(&mut *self.shared.lock_failures());
        match failures.first() {
            None => Ok(()),
            Some(first) => Err(Error::JobFailed {
                failed: failures.len(),
                first: first.clone(),
            }),
        }
    }

    /// Stops the pool, letting queued jobs run first, and joins every
    /// worker.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        {
            let mut queue = self.shared.lock_queue();
            queue.shutdown = true;
            self.shared.job_ready.notify_all();
        }
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                error!("a worker thread exited by panicking");
            }
        }
        debug!("worker pool joined");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}

fn work(id: usize, shared: &Shared) {
    loop {
        let job = {
            let mut queue = shared.lock_queue();
            while !queue.shutdown && queue.jobs.is_empty() {
                queue = shared
                    .job_ready
                    .wait(queue)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            match queue.jobs.pop_front() {
                Some(job) => job,
                None => {
                    // Empty and shutting down.
                    shared.drained.notify_all();
                    debug!("worker {} terminates", id);
                    return;
                }
            }
        };

        debug!("worker {} does a job", id);
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            error!("worker {}: job panicked: {}", id, panic_message(&*payload));
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
