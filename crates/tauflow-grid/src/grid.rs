//! The 3D [`Grid`] of fluid cells and its stencil accessors.

use std::ops::{Index, IndexMut};

use tauflow_core::FluidCell;

use crate::edge::EdgeBehavior;
use crate::error::GridError;

/// Number of cells along each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDims {
    /// Cells along the first transverse axis.
    pub nx: usize,
    /// Cells along the second transverse axis.
    pub ny: usize,
    /// Cells along the space-time rapidity axis.
    pub neta: usize,
}

impl GridDims {
    /// Construct dimensions.
    pub fn new(nx: usize, ny: usize, neta: usize) -> Self {
        Self { nx, ny, neta }
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.nx * self.ny * self.neta
    }

    /// Dimensions as a tuple `(nx, ny, neta)`.
    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.neta)
    }

    fn validate(&self) -> Result<(), GridError> {
        for (axis, n) in [("x", self.nx), ("y", self.ny), ("eta", self.neta)] {
            if n == 0 {
                return Err(GridError::EmptyAxis { axis });
            }
        }
        self.nx
            .checked_mul(self.ny)
            .and_then(|n| n.checked_mul(self.neta))
            .ok_or(GridError::CellCountOverflow {
                nx: self.nx,
                ny: self.ny,
                neta: self.neta,
            })?;
        Ok(())
    }
}

/// Position of a cell in the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellIndex {
    /// Index along x.
    pub ix: usize,
    /// Index along y.
    pub iy: usize,
    /// Index along η_s.
    pub ieta: usize,
}

impl CellIndex {
    /// Construct a cell index.
    pub fn new(ix: usize, iy: usize, ieta: usize) -> Self {
        Self { ix, iy, ieta }
    }
}

/// Spatial direction of a flux or stencil.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Transverse x.
    X,
    /// Transverse y.
    Y,
    /// Longitudinal space-time rapidity.
    Eta,
}

impl Direction {
    /// All directions in flux-assembly order.
    pub const ALL: [Direction; 3] = [Direction::X, Direction::Y, Direction::Eta];

    /// Four-vector component index of the direction (`1..=3`).
    pub fn component(self) -> usize {
        match self {
            Self::X => 1,
            Self::Y => 2,
            Self::Eta => 3,
        }
    }

    /// Whether this is the longitudinal direction.
    pub fn is_longitudinal(self) -> bool {
        self == Self::Eta
    }
}

/// Five-point stencil around a centre cell along one direction.
#[derive(Clone, Copy, Debug)]
pub struct Stencil<'a> {
    /// Two cells towards the lower edge.
    pub m2: &'a FluidCell,
    /// One cell towards the lower edge.
    pub m1: &'a FluidCell,
    /// The centre cell.
    pub c: &'a FluidCell,
    /// One cell towards the upper edge.
    pub p1: &'a FluidCell,
    /// Two cells towards the upper edge.
    pub p2: &'a FluidCell,
}

/// A flat 3D array of fluid cells.
///
/// Cells are stored `ieta`-major, then `ix`, then `iy`, matching the
/// order in which the step visits them.
///
/// # Examples
///
/// ```
/// use tauflow_core::FluidCell;
/// use tauflow_grid::{CellIndex, EdgeBehavior, Grid, GridDims};
///
/// let mut grid = Grid::new(GridDims::new(4, 4, 1), EdgeBehavior::Clamp).unwrap();
/// grid[CellIndex::new(1, 2, 0)] = FluidCell::at_rest(2.0, 0.0);
/// assert_eq!(grid.len(), 16);
/// assert_eq!(grid[CellIndex::new(1, 2, 0)].epsilon, 2.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    dims: GridDims,
    edge: EdgeBehavior,
    cells: Vec<FluidCell>,
}

impl Grid {
    /// Allocate a grid of default (empty, at rest) cells.
    pub fn new(dims: GridDims, edge: EdgeBehavior) -> Result<Self, GridError> {
        Self::filled(dims, edge, FluidCell::default())
    }

    /// Allocate a grid with every cell set to `cell`.
    pub fn filled(dims: GridDims, edge: EdgeBehavior, cell: FluidCell) -> Result<Self, GridError> {
        dims.validate()?;
        Ok(Self {
            dims,
            edge,
            cells: vec![cell; dims.cell_count()],
        })
    }

    /// Allocate a grid initialised cell by cell.
    pub fn from_fn(
        dims: GridDims,
        edge: EdgeBehavior,
        mut f: impl FnMut(CellIndex) -> FluidCell,
    ) -> Result<Self, GridError> {
        dims.validate()?;
        let mut cells = Vec::with_capacity(dims.cell_count());
        for ieta in 0..dims.neta {
            for ix in 0..dims.nx {
                for iy in 0..dims.ny {
                    cells.push(f(CellIndex::new(ix, iy, ieta)));
                }
            }
        }
        Ok(Self { dims, edge, cells })
    }

    /// Grid dimensions.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Edge behaviour of stencil lookups.
    pub fn edge(&self) -> EdgeBehavior {
        self.edge
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells. Always `false` for a constructed grid.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat storage index of a cell.
    pub fn flat(&self, at: CellIndex) -> usize {
        (at.ieta * self.dims.nx + at.ix) * self.dims.ny + at.iy
    }

    /// Cell position of a flat storage index.
    pub fn index_of(&self, flat: usize) -> CellIndex {
        let iy = flat % self.dims.ny;
        let rest = flat / self.dims.ny;
        CellIndex::new(rest % self.dims.nx, iy, rest / self.dims.nx)
    }

    /// All cells in storage order.
    pub fn cells(&self) -> &[FluidCell] {
        &self.cells
    }

    /// All cells in storage order, mutably.
    pub fn cells_mut(&mut self) -> &mut [FluidCell] {
        &mut self.cells
    }

    /// The cell `offset` steps from `at` along `direction`, resolved with
    /// the grid's edge behaviour.
    pub fn neighbour(&self, at: CellIndex, direction: Direction, offset: isize) -> &FluidCell {
        let mut target = at;
        match direction {
            Direction::X => {
                target.ix = self.edge.resolve(at.ix as isize + offset, self.dims.nx);
            }
            Direction::Y => {
                target.iy = self.edge.resolve(at.iy as isize + offset, self.dims.ny);
            }
            Direction::Eta => {
                target.ieta = self.edge.resolve(at.ieta as isize + offset, self.dims.neta);
            }
        }
        &self[target]
    }

    /// Five-point stencil centred on `at` along `direction`.
    pub fn stencil(&self, at: CellIndex, direction: Direction) -> Stencil<'_> {
        Stencil {
            m2: self.neighbour(at, direction, -2),
            m1: self.neighbour(at, direction, -1),
            c: &self[at],
            p1: self.neighbour(at, direction, 1),
            p2: self.neighbour(at, direction, 2),
        }
    }

    /// Whether `other` has the same dimensions.
    pub fn same_shape(&self, other: &Grid) -> bool {
        self.dims == other.dims
    }
}

impl Index<CellIndex> for Grid {
    type Output = FluidCell;

    fn index(&self, at: CellIndex) -> &FluidCell {
        &self.cells[self.flat(at)]
    }
}

impl IndexMut<CellIndex> for Grid {
    fn index_mut(&mut self, at: CellIndex) -> &mut FluidCell {
        let i = self.flat(at);
        &mut self.cells[i]
    }
}
