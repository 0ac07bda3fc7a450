//! Array sources: anything that can report its shape and element type and
//! hand out rectangular blocks on demand.
//!
//! Writers pull one buffer-sized block at a time, so a source never has to
//! hold the whole array in memory.

use std::fmt;
use std::rc::Rc;

use ndarray::{ArrayView, IxDyn, Slice};

use super::dtype::{DataType, Element};

/// Errors raised while reading blocks from an array source
#[derive(Debug, thiserror::Error)]
pub enum ArrayError {
    /// The requested block does not lie inside the array
    #[error("Block at {offset:?} with shape {shape:?} is outside an array of shape {full:?}")]
    OutOfBounds {
        /// Block origin
        offset: Vec<usize>,
        /// Block extent
        shape: Vec<usize>,
        /// Array shape
        full: Vec<usize>,
    },

    /// Element buffer does not match the declared shape
    #[error("Shape {shape:?} needs {expected} elements, got {actual}")]
    LengthMismatch {
        /// Declared shape
        shape: Vec<usize>,
        /// Element count implied by the shape
        expected: usize,
        /// Element count supplied
        actual: usize,
    },

    /// Byte buffer could not be viewed with the array's shape
    #[error("Array layout error: {0}")]
    Layout(#[from] ndarray::ShapeError),
}

/// Read access to an n-dimensional array.
pub trait ArraySource: fmt::Debug {
    /// Full shape of the array
    fn shape(&self) -> &[usize];

    /// Element type
    fn dtype(&self) -> DataType;

    /// Read the block starting at `offset` with extent `shape` as C-ordered
    /// little-endian bytes.
    fn read_block(&self, offset: &[usize], shape: &[usize]) -> Result<Vec<u8>, ArrayError>;

    /// Total size of the array in bytes
    fn nbytes(&self) -> u64 {
        self.shape().iter().map(|&n| n as u64).product::<u64>() * self.dtype().itemsize() as u64
    }
}

/// Check that the block `offset`/`shape` lies inside `full`.
pub fn check_selection(
    full: &[usize],
    offset: &[usize],
    shape: &[usize],
) -> Result<(), ArrayError> {
    let inside = offset.len() == full.len()
        && shape.len() == full.len()
        && full
            .iter()
            .zip(offset.iter().zip(shape))
            .all(|(&n, (&o, &s))| o.checked_add(s).is_some_and(|end| end <= n));
    if inside {
        Ok(())
    } else {
        Err(ArrayError::OutOfBounds {
            offset: offset.to_vec(),
            shape: shape.to_vec(),
            full: full.to_vec(),
        })
    }
}

/// Advance a C-order multi-index; false once it wraps around.
fn increment(index: &mut [usize], extent: &[usize]) -> bool {
    for axis in (0..index.len()).rev() {
        index[axis] += 1;
        if index[axis] < extent[axis] {
            return true;
        }
        index[axis] = 0;
    }
    false
}

/// A fully materialized array.
#[derive(Clone, PartialEq)]
pub struct InMemoryArray {
    shape: Vec<usize>,
    dtype: DataType,
    data: Vec<u8>,
}

impl InMemoryArray {
    /// Wrap C-ordered values.
    pub fn from_vec<T: Element>(shape: Vec<usize>, values: Vec<T>) -> Result<Self, ArrayError> {
        let expected: usize = shape.iter().product();
        if values.len() != expected {
            return Err(ArrayError::LengthMismatch {
                shape,
                expected,
                actual: values.len(),
            });
        }
        let mut data = Vec::with_capacity(expected * T::DTYPE.itemsize());
        for value in values {
            value.write_le(&mut data);
        }
        Ok(Self {
            shape,
            dtype: T::DTYPE,
            data,
        })
    }

    /// Wrap C-ordered little-endian bytes.
    pub fn from_bytes(
        shape: Vec<usize>,
        dtype: DataType,
        data: Vec<u8>,
    ) -> Result<Self, ArrayError> {
        let count: usize = shape.iter().product();
        if data.len() != count * dtype.itemsize() {
            return Err(ArrayError::LengthMismatch {
                shape,
                expected: count,
                actual: data.len() / dtype.itemsize(),
            });
        }
        Ok(Self { shape, dtype, data })
    }

    /// An all-zero array.
    pub fn zeros(shape: Vec<usize>, dtype: DataType) -> Self {
        let len = shape.iter().product::<usize>() * dtype.itemsize();
        Self {
            shape,
            dtype,
            data: vec![0; len],
        }
    }

    /// Raw little-endian bytes in C order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for InMemoryArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryArray")
            .field("shape", &self.shape)
            .field("dtype", &self.dtype)
            .finish_non_exhaustive()
    }
}

impl ArraySource for InMemoryArray {
    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn dtype(&self) -> DataType {
        self.dtype
    }

    fn read_block(&self, offset: &[usize], shape: &[usize]) -> Result<Vec<u8>, ArrayError> {
        check_selection(&self.shape, offset, shape)?;
        // trailing axis spans the bytes of one element
        let mut dims = self.shape.clone();
        dims.push(self.dtype.itemsize());
        let bytes = ArrayView::from_shape(IxDyn(&dims), self.data.as_slice())?;
        let block = bytes.slice_each_axis(|axis| match axis.axis.index() {
            i if i < offset.len() => Slice::from(offset[i]..offset[i] + shape[i]),
            _ => Slice::from(..),
        });
        Ok(block.iter().copied().collect())
    }
}

type Generator = Box<dyn Fn(&[usize], &mut Vec<u8>)>;

/// An array whose elements are computed on demand from their index.
///
/// Nothing is stored; each block is generated when read.
pub struct SyntheticArray {
    shape: Vec<usize>,
    dtype: DataType,
    generator: Generator,
}

impl SyntheticArray {
    /// Array of `shape` whose element at `index` is `generator(index)`.
    pub fn new<T: Element>(shape: Vec<usize>, generator: impl Fn(&[usize]) -> T + 'static) -> Self {
        Self {
            shape,
            dtype: T::DTYPE,
            generator: Box::new(move |index, out| generator(index).write_le(out)),
        }
    }

    /// Lazily produced zeros.
    pub fn zeros<T: Element + Default>(shape: Vec<usize>) -> Self {
        Self::new(shape, |_| T::default())
    }

    /// Lazily produced zeros of a type chosen at runtime.
    pub fn zeros_of(shape: Vec<usize>, dtype: DataType) -> Self {
        let itemsize = dtype.itemsize();
        Self {
            shape,
            dtype,
            generator: Box::new(move |_, out| out.resize(out.len() + itemsize, 0)),
        }
    }
}

impl fmt::Debug for SyntheticArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntheticArray")
            .field("shape", &self.shape)
            .field("dtype", &self.dtype)
            .finish_non_exhaustive()
    }
}

impl ArraySource for SyntheticArray {
    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn dtype(&self) -> DataType {
        self.dtype
    }

    fn read_block(&self, offset: &[usize], shape: &[usize]) -> Result<Vec<u8>, ArrayError> {
        check_selection(&self.shape, offset, shape)?;
        let total: usize = shape.iter().product();
        let mut out = Vec::with_capacity(total * self.dtype.itemsize());
        if total == 0 {
            return Ok(out);
        }

        let mut local = vec![0; shape.len()];
        let mut global = offset.to_vec();
        loop {
            (self.generator)(&global, &mut out);
            if !increment(&mut local, shape) {
                break;
            }
            for (axis, g) in global.iter_mut().enumerate() {
                *g = offset[axis] + local[axis];
            }
        }
        Ok(out)
    }
}

/// One tile of a regular grid over an array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Grid coordinates of the tile
    pub index: Vec<usize>,
    /// Element offset of the tile
    pub offset: Vec<usize>,
    /// Extent of the tile, clipped at the array edge
    pub shape: Vec<usize>,
}

/// Iterates, in C order, the tiles of shape `block` covering `full`.
#[derive(Debug, Clone)]
pub struct BlockIter {
    full: Vec<usize>,
    block: Vec<usize>,
    grid: Vec<usize>,
    next: Option<Vec<usize>>,
}

impl BlockIter {
    /// Tile `full` with `block`. Both must have the same rank and `block`
    /// must be at least 1 along every axis.
    pub fn new(full: &[usize], block: &[usize]) -> Self {
        let grid: Vec<usize> = full
            .iter()
            .zip(block)
            .map(|(&n, &b)| (n + b.max(1) - 1) / b.max(1))
            .collect();
        let next = (!grid.contains(&0)).then(|| vec![0; grid.len()]);
        Self {
            full: full.to_vec(),
            block: block.to_vec(),
            grid,
            next,
        }
    }

    /// Number of tiles along each axis
    pub fn grid(&self) -> &[usize] {
        &self.grid
    }
}

impl Iterator for BlockIter {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        let index = self.next.take()?;
        let offset: Vec<usize> = index.iter().zip(&self.block).map(|(&i, &b)| i * b).collect();
        let shape = offset
            .iter()
            .zip(self.block.iter().zip(&self.full))
            .map(|(&o, (&b, &n))| b.min(n - o))
            .collect();

        let mut following = index.clone();
        if increment(&mut following, &self.grid) {
            self.next = Some(following);
        }
        Some(Block {
            index,
            offset,
            shape,
        })
    }
}

impl<A: ArraySource + ?Sized> ArraySource for Rc<A> {
    fn shape(&self) -> &[usize] {
        (**self).shape()
    }

    fn dtype(&self) -> DataType {
        (**self).dtype()
    }

    fn read_block(&self, offset: &[usize], shape: &[usize]) -> Result<Vec<u8>, ArrayError> {
        (**self).read_block(offset, shape)
    }
}

/// The first `frames` entries along axis 0 of another source.
#[derive(Debug)]
pub struct FrameSlice {
    inner: Rc<dyn ArraySource>,
    shape: Vec<usize>,
}

impl FrameSlice {
    /// Keep at most `frames` leading frames of `inner`.
    pub fn new(inner: Rc<dyn ArraySource>, frames: usize) -> Self {
        let mut shape = inner.shape().to_vec();
        if let Some(first) = shape.first_mut() {
            *first = (*first).min(frames);
        }
        Self { inner, shape }
    }
}

impl ArraySource for FrameSlice {
    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn dtype(&self) -> DataType {
        self.inner.dtype()
    }

    fn read_block(&self, offset: &[usize], shape: &[usize]) -> Result<Vec<u8>, ArrayError> {
        check_selection(&self.shape, offset, shape)?;
        self.inner.read_block(offset, shape)
    }
}
