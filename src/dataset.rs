//! Immutable point storage shared by every index.
//!
//! Points live in one flat row-major buffer (`len * dimension` floats). A point's
//! id is its ingestion position, so ids are dense in `0..len`.

use crate::error::{Result, RetrieveError};

/// An ordered, fixed-dimensionality collection of vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    vectors: Vec<f32>,
    dimension: usize,
    len: usize,
}

impl Dataset {
    /// An empty dataset of the given dimensionality.
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(RetrieveError::invalid("dimension must be greater than 0"));
        }
        Ok(Self {
            vectors: Vec::new(),
            dimension,
            len: 0,
        })
    }

    /// Ingest vectors in order; the i-th vector gets id `i`.
    ///
    /// Dimensionality is taken from the first vector and every other vector must
    /// match it. An empty input is rejected because it carries no dimension; use
    /// [`Dataset::new`] for an explicitly empty dataset.
    pub fn from_vectors<V: AsRef<[f32]>>(vectors: impl IntoIterator<Item = V>) -> Result<Self> {
        let mut iter = vectors.into_iter();
        let first = iter.next().ok_or(RetrieveError::EmptyDataset)?;
        let mut dataset = Self::new(first.as_ref().len())?;
        dataset.push(first.as_ref())?;
        for v in iter {
            dataset.push(v.as_ref())?;
        }
        Ok(dataset)
    }

    /// Wrap an already-flattened row-major buffer.
    pub fn from_flat(vectors: Vec<f32>, dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(RetrieveError::invalid("dimension must be greater than 0"));
        }
        if vectors.len() % dimension != 0 {
            return Err(RetrieveError::invalid(format!(
                "flat buffer of {} floats is not a whole number of {dimension}-d rows",
                vectors.len()
            )));
        }
        let len = vectors.len() / dimension;
        // The last row must have a representable id.
        point_id(len.saturating_sub(1))?;
        Ok(Self {
            vectors,
            dimension,
            len,
        })
    }

    /// Datasets are immutable once handed to an index; this is only used while
    /// constructing one.
    fn push(&mut self, vector: &[f32]) -> Result<u32> {
        self.check_dimension(vector)?;
        let id = point_id(self.len)?;
        self.vectors.extend_from_slice(vector);
        self.len += 1;
        Ok(id)
    }

    /// Fails with `DimensionMismatch` unless `vector` has this dataset's length.
    #[inline]
    pub fn check_dimension(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(RetrieveError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Vector of point `id`, if present.
    #[inline]
    pub fn get(&self, id: u32) -> Option<&[f32]> {
        let idx = id as usize;
        (idx < self.len).then(|| self.row(idx))
    }

    /// Unchecked-by-contract row access; `idx < len` is the caller's invariant.
    #[inline]
    pub(crate) fn row(&self, idx: usize) -> &[f32] {
        let start = idx * self.dimension;
        &self.vectors[start..start + self.dimension]
    }

    /// `(id, vector)` pairs in id order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (u32, &[f32])> + '_ {
        self.vectors
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(i, v)| (i as u32, v))
    }

    /// Copy every row out as an owned vector.
    pub fn to_vectors(&self) -> Vec<Vec<f32>> {
        self.vectors
            .chunks_exact(self.dimension)
            .map(<[f32]>::to_vec)
            .collect()
    }

    /// Raw row-major storage.
    pub fn as_flat(&self) -> &[f32] {
        &self.vectors
    }
}

/// Row index as a point id; ids must fit in `u32`.
fn point_id(row: usize) -> Result<u32> {
    u32::try_from(row).map_err(|_| RetrieveError::invalid("dataset exceeds u32::MAX points"))
}
