// Copyright 2018 Dmitry Tantsur <divius.inside@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Waiting for long-running operations.
//!
//! A [Waiter](trait.Waiter.html) knows how to check the current state of an
//! operation, [wait](fn.wait.html) drives it until it finishes, fails or
//! runs out of time. All time measurements go through a
//! [Clock](trait.Clock.html), so that the loop can be driven without real
//! time passing.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, trace};

use super::Result;

/// Source of time for waiters.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current moment.
    fn now(&self) -> Instant;

    /// Suspend for the given duration.
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the system monotonic clock and the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await
    }
}

/// Something that can be polled until it reaches a final state.
#[async_trait]
pub trait Waiter<T>: Send {
    /// Time out to use, `None` to wait forever.
    fn wait_timeout(&self) -> Option<Duration>;

    /// Delay between two polls.
    fn delay(&self) -> Duration;

    /// Error to return when the time out is reached.
    fn timeout_error(&self, elapsed: Duration) -> super::Error;

    /// Check the current state.
    ///
    /// Returns `Ok(None)` if the operation is still in progress.
    async fn poll(&mut self) -> Result<Option<T>>;
}

/// Poll the waiter until it returns a value or an error.
///
/// The time out (if any) is counted from the moment this function is called.
/// The waiter is polled first, then the time out is checked, then the clock
/// sleeps for the waiter's delay.
pub async fn wait<T, W, C>(mut waiter: W, clock: &C) -> Result<T>
where
    W: Waiter<T>,
    C: Clock + ?Sized,
{
    let start = clock.now();
    let timeout = waiter.wait_timeout();
    loop {
        if let Some(result) = waiter.poll().await? {
            return Ok(result);
        }

        let elapsed = clock.now().saturating_duration_since(start);
        if let Some(timeout) = timeout {
            if elapsed > timeout {
                debug!("Gave up waiting after {:?}", elapsed);
                return Err(waiter.timeout_error(elapsed));
            }
        }

        trace!("Still waiting after {:?}", elapsed);
        clock.sleep(waiter.delay()).await;
    }
}
