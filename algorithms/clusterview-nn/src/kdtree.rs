use clusterview::Float;
use ndarray::{aview1, ArrayBase, ArrayView2, Data, Ix2};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::{
    distance::Distance, BuildError, NearestNeighbour, NearestNeighbourIndex, NnError, Point,
};

/// Spatial indexing structure created by [`KdTree`]
pub struct KdTreeIndex<'a, F: Float, D: Distance<F>> {
    tree: ::kdtree::KdTree<F, usize, Vec<F>>,
    batch: ArrayView2<'a, F>,
    dist_fn: D,
}

impl<'a, F: Float, D: Distance<F>> KdTreeIndex<'a, F, D> {
    /// Creates a new `KdTreeIndex`
    pub fn new<DT: Data<Elem = F>>(
        batch: &'a ArrayBase<DT, Ix2>,
        leaf_size: usize,
        dist_fn: D,
    ) -> Result<Self, BuildError> {
        if leaf_size == 0 {
            Err(BuildError::EmptyLeaf)
        } else if batch.ncols() == 0 {
            Err(BuildError::ZeroDim)
        } else {
            let mut tree = ::kdtree::KdTree::with_capacity(batch.ncols(), leaf_size);
            for (i, point) in batch.rows().into_iter().enumerate() {
                tree.add(point.to_vec(), i)
                    .map_err(|_| BuildError::NonFinite(i))?;
            }
            Ok(KdTreeIndex {
                tree,
                batch: batch.view(),
                dist_fn,
            })
        }
    }
}

impl<'a, F: Float, D: Distance<F>> NearestNeighbourIndex<F> for KdTreeIndex<'a, F, D> {
    fn within_range<'b>(
        &self,
        point: Point<'b, F>,
        range: F,
    ) -> Result<Vec<(Point<F>, usize)>, NnError> {
        if point.len() != self.batch.ncols() {
            return Err(NnError::WrongDimension);
        }
        let query = point.to_vec();
        let range = self.dist_fn.dist_to_rdist(range);
        let dist_fn = |a: &[F], b: &[F]| self.dist_fn.rdistance(aview1(a), aview1(b));
        let found = self
            .tree
            .within(&query, range, &dist_fn)
            .map_err(|_| NnError::NonFinite)?;
        Ok(found
            .into_iter()
            .map(|(_, &i)| (self.batch.row(i), i))
            .collect())
    }

    fn num_points(&self) -> usize {
        self.tree.size()
    }
}

/// Implementation of [K-D tree](https://en.wikipedia.org/wiki/K-d_tree), a fast space-partitioning
/// data structure. Construction takes `O(N log N)` and a range query is `O(log N)` on average
/// for low dimensional data such as points in the plane.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct KdTree;

impl KdTree {
    /// Creates an instance of `KdTree`
    pub fn new() -> Self {
        Self
    }
}

impl NearestNeighbour for KdTree {
    fn from_batch_with_leaf_size<'a, F: Float, DT: Data<Elem = F>, D: 'a + Distance<F>>(
        &self,
        batch: &'a ArrayBase<DT, Ix2>,
        leaf_size: usize,
        dist_fn: D,
    ) -> Result<Box<dyn 'a + NearestNeighbourIndex<F>>, BuildError> {
        KdTreeIndex::new(batch, leaf_size, dist_fn)
            .map(|v| Box::new(v) as Box<dyn 'a + NearestNeighbourIndex<F>>)
    }
}
