use crate::index_space::{Index, IndexSpace};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};




/**
 * A field is a mapping from a rectangular index space to a fixed number of
 * real-valued components per cell. The data is stored in a single row-major
 * buffer, with the components of each cell contiguous, so that any pass
 * which writes one cell at a time can be parallelized over the chunks of the
 * buffer without locking.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    space: IndexSpace,
    num_fields: usize,
    data: Vec<f64>,
}




// ============================================================================
impl Field {


    /**
     * Create a field with all values set to zero.
     */
    pub fn zeros(space: IndexSpace, num_fields: usize) -> Self {
        let data = vec![0.0; space.len() * num_fields];
        Self { space, num_fields, data }
    }


    /**
     * Generate a field covering the given index space, with values defined
     * from a closure which writes the components of one cell.
     */
    pub fn from_function<F>(space: IndexSpace, num_fields: usize, f: F) -> Self
    where
        F: Fn(Index, &mut [f64]) + Sync + Send,
    {
        let mut field = Self::zeros(space, num_fields);
        field.par_for_each_mut(f);
        field
    }


    pub fn index_space(&self) -> &IndexSpace {
        &self.space
    }


    pub fn num_fields(&self) -> usize {
        self.num_fields
    }


    pub fn data(&self) -> &[f64] {
        &self.data
    }


    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }


    /**
     * Return the components of the cell at the given index.
     */
    pub fn get_slice(&self, index: Index) -> &[f64] {
        let s = self.space.row_major_offset(index) * self.num_fields;
        &self.data[s..s + self.num_fields]
    }


    pub fn get_slice_mut(&mut self, index: Index) -> &mut [f64] {
        let s = self.space.row_major_offset(index) * self.num_fields;
        &mut self.data[s..s + self.num_fields]
    }


    pub fn get(&self, index: Index, component: usize) -> f64 {
        self.data[self.space.row_major_offset(index) * self.num_fields + component]
    }


    /**
     * Return the components of the cell at the given index, or `None` if the
     * index is outside the field.
     */
    pub fn try_get_slice(&self, index: Index) -> Option<&[f64]> {
        if self.space.contains(index) {
            Some(self.get_slice(index))
        } else {
            None
        }
    }


    /**
     * Return an iterator over the cells of this field, in row-major order.
     */
    pub fn iter_data(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.num_fields)
    }


    pub fn iter_data_mut(&mut self) -> impl Iterator<Item = &mut [f64]> {
        self.data.chunks_exact_mut(self.num_fields)
    }


    /**
     * Apply a closure to every cell of this field in parallel. The closure
     * receives the index of the cell and its mutable components.
     */
    pub fn par_for_each_mut<F>(&mut self, f: F)
    where
        F: Fn(Index, &mut [f64]) + Sync + Send,
    {
        let space = &self.space;
        self.data
            .par_chunks_exact_mut(self.num_fields)
            .enumerate()
            .for_each(|(n, cell)| f(space.coordinate(n), cell));
    }


    /**
     * Apply a closure, in parallel, to the cells of this field which lie
     * inside the given region. Cells outside the region are not touched.
     */
    pub fn par_for_each_in<F>(&mut self, region: &IndexSpace, f: F)
    where
        F: Fn(Index, &mut [f64]) + Sync + Send,
    {
        self.par_for_each_mut(|index, cell| {
            if region.contains(index) {
                f(index, cell)
            }
        })
    }


    /**
     * Copy the components of one cell onto another cell of the same field.
     */
    pub fn copy_cell(&mut self, source: Index, target: Index) {
        let nq = self.num_fields;
        let s = self.space.row_major_offset(source) * nq;
        let t = self.space.row_major_offset(target) * nq;
        self.data.copy_within(s..s + nq, t);
    }


    /**
     * Overwrite this field's values with those of another field with the
     * same shape.
     */
    pub fn copy_from(&mut self, other: &Field) {
        assert!(
            self.space == other.space && self.num_fields == other.num_fields,
            "copy between fields of different shapes");
        self.data.copy_from_slice(&other.data);
    }


    pub fn fill(&mut self, value: f64) {
        self.data.par_iter_mut().for_each(|x| *x = value);
    }


    /**
     * Return the sum of each component over the cells of the given region.
     */
    pub fn sum_over(&self, region: &IndexSpace) -> Vec<f64> {
        let mut total = vec![0.0; self.num_fields];
        for index in region.iter() {
            for (t, x) in total.iter_mut().zip(self.get_slice(index)) {
                *t += x;
            }
        }
        total
    }
}




/**
 * The two generations of conserved data. The step counter's parity selects
 * which buffer is current; the other one receives the next state, so a step
 * never reads and writes the same buffer.
 */
#[derive(Clone, Debug)]
pub struct Generations {
    buffers: [Field; 2],
    step: u64,
}




// ============================================================================
impl Generations {

    pub fn new(initial: Field) -> Self {
        Self {
            buffers: [initial.clone(), initial],
            step: 0,
        }
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn current(&self) -> &Field {
        &self.buffers[(self.step % 2) as usize]
    }

    pub fn current_mut(&mut self) -> &mut Field {
        &mut self.buffers[(self.step % 2) as usize]
    }

    /**
     * Borrow the current generation for writing guard zones, together with
     * the next generation as output.
     */
    pub fn split_mut(&mut self) -> (&mut Field, &mut Field) {
        let (a, b) = self.buffers.split_at_mut(1);
        if self.step % 2 == 0 {
            (&mut a[0], &mut b[0])
        } else {
            (&mut b[0], &mut a[0])
        }
    }

    /**
     * Make the next generation current.
     */
    pub fn advance(&mut self) {
        self.step += 1;
    }
}
