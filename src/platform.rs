//! Allocation and scheduling seam of the codec.
//!
//! All intermediate buffers of [compress](crate::Codec::compress) and
//! [decompress](crate::Codec::decompress) are requested through a [Platform],
//! as are the outputs of the `_with` variants of the transport functions and
//! [Image::from_rgb565_with](crate::Image::from_rgb565_with).
//! Embedders on constrained targets can cap the memory a codec may request
//! ([Budgeted]) or give a cooperative scheduler a chance to run during long
//! block loops ([Cooperative]).

use alloc::vec::Vec;
use core::mem::size_of;

use crate::error::{CodecError, CodecResult};

/// Allocation and yield capability used by the codec pipeline.
pub trait Platform {
    /// Allocate `count` default initialized elements.
    ///
    /// Implementations must not panic when memory is exhausted; they report
    /// [CodecError::AllocationFailed] instead.
    fn allocate<T: Copy + Default>(
        &mut self,
        count: usize,
        context: &'static str,
    ) -> CodecResult<Vec<T>> {
        try_alloc_vec(count, context)
    }

    /// Number of blocks between two calls of [Platform::yield_now]; 0 disables yielding.
    fn yield_interval(&self) -> usize {
        0
    }

    /// Called from the block loops every [Platform::yield_interval] blocks.
    fn yield_now(&mut self) {}
}

/// Allocate a Vec with fallible allocation.
///
/// Returns an error instead of aborting if the allocation fails.
#[inline]
pub fn try_alloc_vec<T: Copy + Default>(
    count: usize,
    context: &'static str,
) -> CodecResult<Vec<T>> {
    let bytes = checked_bytes::<T>(count, context)?;

    let mut v = Vec::new();
    v.try_reserve_exact(count)
        .map_err(|_| CodecError::AllocationFailed { bytes, context })?;
    v.resize(count, T::default());
    Ok(v)
}

#[inline]
fn checked_bytes<T>(count: usize, context: &'static str) -> CodecResult<usize> {
    count
        .checked_mul(size_of::<T>())
        .ok_or(CodecError::AllocationFailed {
            bytes: usize::MAX,
            context,
        })
}

/// Plain global heap, never yields.
#[derive(Debug, Default, Clone, Copy)]
pub struct Heap;

impl Platform for Heap {}

/// Heap allocation limited by a byte budget.
///
/// The budget counts every byte requested through this platform. It is not
/// refilled when buffers are dropped; call [Budgeted::reset] between
/// codec calls to start over.
#[derive(Debug, Clone)]
pub struct Budgeted {
    allocated: usize,
    limit: usize,
}

impl Budgeted {
    /// Creates a platform that refuses requests once `limit` bytes were handed out.
    pub fn new(limit: usize) -> Self {
        Budgeted {
            allocated: 0,
            limit,
        }
    }

    /// Bytes handed out since creation or the last reset.
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.allocated)
    }

    pub fn reset(&mut self) {
        self.allocated = 0;
    }
}

impl Platform for Budgeted {
    fn allocate<T: Copy + Default>(
        &mut self,
        count: usize,
        context: &'static str,
    ) -> CodecResult<Vec<T>> {
        let bytes = checked_bytes::<T>(count, context)?;

        let total = self
            .allocated
            .checked_add(bytes)
            .ok_or(CodecError::AllocationFailed { bytes, context })?;

        if total > self.limit {
            log::debug!(
                "budget exhausted while {}: {} + {} > {}",
                context,
                self.allocated,
                bytes,
                self.limit
            );
            return Err(CodecError::AllocationFailed { bytes, context });
        }

        let v = try_alloc_vec(count, context)?;
        self.allocated = total;
        Ok(v)
    }
}

/// Wraps another platform and calls `on_yield` every `interval` blocks.
pub struct Cooperative<P: Platform, F: FnMut()> {
    inner: P,
    interval: usize,
    on_yield: F,
}

impl<P: Platform, F: FnMut()> Cooperative<P, F> {
    pub fn new(inner: P, interval: usize, on_yield: F) -> Self {
        Cooperative {
            inner,
            interval,
            on_yield,
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: Platform, F: FnMut()> Platform for Cooperative<P, F> {
    fn allocate<T: Copy + Default>(
        &mut self,
        count: usize,
        context: &'static str,
    ) -> CodecResult<Vec<T>> {
        self.inner.allocate(count, context)
    }

    fn yield_interval(&self) -> usize {
        self.interval
    }

    fn yield_now(&mut self) {
        (self.on_yield)();
    }
}

/// Counts processed blocks and yields to the platform at the configured interval.
pub(crate) struct YieldPoint {
    interval: usize,
    counter: usize,
}

impl YieldPoint {
    pub(crate) fn new<P: Platform>(platform: &P) -> Self {
        YieldPoint {
            interval: platform.yield_interval(),
            counter: 0,
        }
    }

    #[inline(always)]
    pub(crate) fn block_done<P: Platform>(&mut self, platform: &mut P) {
        if self.interval == 0 {
            return;
        }

        self.counter += 1;
        if self.counter == self.interval {
            self.counter = 0;
            log::trace!("yielding after {} blocks", self.interval);
            platform.yield_now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_alloc_vec() {
        let v: Vec<i32> = try_alloc_vec(1000, "test").unwrap();
        assert_eq!(v.len(), 1000);
        assert!(v.iter().all(|&x| x == 0));
    }

    #[test]
    fn test_try_alloc_vec_overflow() {
        let result: CodecResult<Vec<i32>> = try_alloc_vec(usize::MAX, "test");
        assert!(matches!(result, Err(CodecError::AllocationFailed { .. })));
    }

    #[test]
    fn test_budget_limit() {
        let mut platform = Budgeted::new(1000);

        let a: Vec<u8> = platform.allocate(600, "first").unwrap();
        assert_eq!(a.len(), 600);
        assert_eq!(platform.allocated(), 600);
        assert_eq!(platform.remaining(), 400);

        let b: CodecResult<Vec<i32>> = platform.allocate(200, "second");
        assert_eq!(
            b,
            Err(CodecError::AllocationFailed {
                bytes: 800,
                context: "second"
            })
        );
        // A refused request does not consume budget
        assert_eq!(platform.allocated(), 600);

        platform.reset();
        let c: Vec<i32> = platform.allocate(250, "third").unwrap();
        assert_eq!(c.len(), 250);
    }

    #[test]
    fn test_yield_point() {
        let mut yields = 0;
        {
            let mut platform = Cooperative::new(Heap, 4, || yields += 1);
            let mut point = YieldPoint::new(&platform);
            for _ in 0..10 {
                point.block_done(&mut platform);
            }
        }
        assert_eq!(yields, 2);
    }

    #[test]
    fn test_yield_disabled() {
        let mut yields = 0;
        {
            let mut platform = Cooperative::new(Heap, 0, || yields += 1);
            let mut point = YieldPoint::new(&platform);
            for _ in 0..100 {
                point.block_done(&mut platform);
            }
        }
        assert_eq!(yields, 0);
    }
}
