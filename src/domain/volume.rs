use serde::{Deserialize, Serialize};

use crate::error::{ChargeError, ChargeResult};

/// Volume extent (x, y, z)
pub type Dims3 = [usize; 3];

/// Maps a voxel position to its offset in x-fastest flat storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexMapper3D {
    dims: Dims3,
}

impl IndexMapper3D {
    pub fn new(dims: Dims3) -> Self {
        Self { dims }
    }

    #[inline]
    pub fn index(&self, pos: Dims3) -> usize {
        pos[0] + pos[1] * self.dims[0] + pos[2] * self.dims[0] * self.dims[1]
    }

    pub fn voxel_count(&self) -> usize {
        self.dims.iter().product()
    }

    /// Visits every voxel position, x fastest
    pub fn for_each_voxel(&self, mut f: impl FnMut(Dims3)) {
        for z in 0..self.dims[2] {
            for y in 0..self.dims[1] {
                for x in 0..self.dims[0] {
                    f([x, y, z]);
                }
            }
        }
    }
}

/// Scalar field sampled on a regular grid, e.g. a hole or particle density
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarVolume {
    pub dims: Dims3,
    pub data: Vec<f64>,
}

/// Segmentation of a grid into integer-labelled regions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelVolume {
    pub dims: Dims3,
    pub data: Vec<u32>,
    /// Declared label range `[start, end)`
    pub label_range: [u32; 2],
}

fn check_storage(what: &str, dims: Dims3, len: usize) -> ChargeResult<()> {
    let expected = IndexMapper3D::new(dims).voxel_count();
    if expected != len {
        return Err(ChargeError::invalid_input(format!(
            "{} holds {} values but its dimensions {:?} need {}",
            what, len, dims, expected
        )));
    }
    Ok(())
}

impl ScalarVolume {
    pub fn new(dims: Dims3, data: Vec<f64>) -> ChargeResult<Self> {
        check_storage("scalar volume", dims, data.len())?;
        Ok(Self { dims, data })
    }

    pub fn validate(&self) -> ChargeResult<()> {
        check_storage("scalar volume", self.dims, self.data.len())
    }
}

impl LabelVolume {
    pub fn new(dims: Dims3, data: Vec<u32>, label_range: [u32; 2]) -> ChargeResult<Self> {
        check_storage("label volume", dims, data.len())?;
        Ok(Self {
            dims,
            data,
            label_range,
        })
    }

    pub fn validate(&self) -> ChargeResult<()> {
        check_storage("label volume", self.dims, self.data.len())
    }

    /// Candidate labels, in ascending order
    pub fn candidate_labels(&self) -> std::ops::Range<u32> {
        self.label_range[0]..self.label_range[1].max(self.label_range[0])
    }
}
