use nalgebra::Vector3;
use std::cell::UnsafeCell;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

/// Row-major color + depth storage for a single render pass.
///
/// Thread-safe for parallel rasterization: the depth test-and-write is an
/// atomic compare-and-swap on the f32 bit pattern, and color writes go
/// through striped locks. Both buffers are discarded or cleared between
/// passes; nothing is shared across passes.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,

    /// Color buffer wrapped in UnsafeCell to allow interior mutability.
    /// Safety is guaranteed by `locks` together with the depth test.
    color_buffer: UnsafeCell<Vec<Vector3<f32>>>,

    /// Depth buffer stored as atomic bits of f32, initialized to +infinity.
    depth_buffer: Vec<AtomicU32>,

    /// Striped locks protecting color writes. Pixel indices map onto a
    /// fixed pool of locks to keep memory overhead bounded.
    locks: Vec<Mutex<()>>,
}

// Thread safety is managed manually via the atomics and the lock stripes.
unsafe impl Sync for FrameBuffer {}

const LOCK_STRIPES: usize = 1024;

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;

        let inf_bits = f32::INFINITY.to_bits();
        let mut depth_buffer = Vec::with_capacity(size);
        for _ in 0..size {
            depth_buffer.push(AtomicU32::new(inf_bits));
        }

        let mut locks = Vec::with_capacity(LOCK_STRIPES);
        for _ in 0..LOCK_STRIPES {
            locks.push(Mutex::new(()));
        }

        Self {
            width,
            height,
            color_buffer: UnsafeCell::new(vec![Vector3::zeros(); size]),
            depth_buffer,
            locks,
        }
    }

    /// Resets every pixel to `color` and every depth to +infinity.
    pub fn clear(&mut self, color: Vector3<f32>) {
        self.color_buffer.get_mut().fill(color);
        let inf_bits = f32::INFINITY.to_bits();
        for depth in &self.depth_buffer {
            depth.store(inf_bits, Ordering::Relaxed);
        }
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Thread-safe depth test and update: returns true (and stores the new
    /// depth) iff `new_depth` is strictly closer than the current value.
    /// Smaller z is nearer under the NDC convention used here.
    #[inline]
    pub fn depth_test_and_update(&self, x: usize, y: usize, new_depth: f32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let depth_atomic = &self.depth_buffer[self.index(x, y)];
        let new_bits = new_depth.to_bits();

        let mut current_bits = depth_atomic.load(Ordering::Relaxed);
        loop {
            let current_depth = f32::from_bits(current_bits);
            if !(new_depth < current_depth) {
                return false;
            }

            match depth_atomic.compare_exchange_weak(
                current_bits,
                new_bits,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(updated_bits) => current_bits = updated_bits,
            }
        }
    }

    /// Thread-safe pixel write. Call only after `depth_test_and_update`
    /// returned true for the same pixel.
    #[inline]
    pub fn set_pixel(&self, x: usize, y: usize, color: Vector3<f32>) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            let lock_idx = idx % self.locks.len();
            let _guard = self.locks[lock_idx].lock().unwrap();

            // Safe: the stripe lock serializes writers for this pixel.
            unsafe {
                let buffer = &mut *self.color_buffer.get();
                buffer[idx] = color;
            }
        }
    }

    /// Reads a pixel. Safe once rendering has completed; concurrent readers
    /// during a pass may observe in-progress values.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Vector3<f32>> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let buffer = unsafe { &*self.color_buffer.get() };
        Some(buffer[self.index(x, y)])
    }

    pub fn depth_at(&self, x: usize, y: usize) -> Option<f32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let bits = self.depth_buffer[self.index(x, y)].load(Ordering::Relaxed);
        Some(f32::from_bits(bits))
    }
}
