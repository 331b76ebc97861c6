use super::{DatasetBase, Float, Label, Records};
use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Data, Ix2};
use std::collections::HashMap;

impl<R: Records, T> DatasetBase<R, T> {
    /// Create a new dataset from records and targets
    pub fn new(records: R, targets: T) -> DatasetBase<R, T> {
        DatasetBase { records, targets }
    }

    /// Returns reference to targets
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// Returns reference to records
    pub fn records(&self) -> &R {
        &self.records
    }

    /// Updates the records of a dataset
    pub fn with_records<S: Records>(self, records: S) -> DatasetBase<S, T> {
        DatasetBase {
            records,
            targets: self.targets,
        }
    }

    /// Updates the targets of a dataset
    pub fn with_targets<U>(self, targets: U) -> DatasetBase<R, U> {
        DatasetBase {
            records: self.records,
            targets,
        }
    }

    /// Number of records in the dataset
    pub fn nsamples(&self) -> usize {
        self.records.nsamples()
    }

    /// Number of features per record
    pub fn nfeatures(&self) -> usize {
        self.records.nfeatures()
    }
}

impl<F: Float, D: Data<Elem = F>, T> DatasetBase<ArrayBase<D, Ix2>, T> {
    /// Borrow the records as a two-dimensional view
    pub fn view(&self) -> DatasetBase<ArrayView2<'_, F>, &T> {
        DatasetBase {
            records: self.records.view(),
            targets: &self.targets,
        }
    }
}

impl<R: Records, L: Label> DatasetBase<R, Array1<L>> {
    /// Count how often each label occurs in the targets
    pub fn label_count(&self) -> HashMap<L, usize> {
        let mut count = HashMap::new();
        for label in self.targets.iter() {
            *count.entry(label.clone()).or_insert(0) += 1;
        }
        count
    }
}

impl<F: Float> From<Array2<F>> for DatasetBase<Array2<F>, ()> {
    fn from(records: Array2<F>) -> Self {
        DatasetBase {
            records,
            targets: (),
        }
    }
}

impl<'a, F: Float> From<ArrayView2<'a, F>> for DatasetBase<ArrayView2<'a, F>, ()> {
    fn from(records: ArrayView2<'a, F>) -> Self {
        DatasetBase {
            records,
            targets: (),
        }
    }
}

impl<F: Float, T> From<(Array2<F>, T)> for DatasetBase<Array2<F>, T> {
    fn from(rec_tar: (Array2<F>, T)) -> Self {
        DatasetBase {
            records: rec_tar.0,
            targets: rec_tar.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn dataset_dimensions() {
        let dataset = DatasetBase::from(array![[0., 1.], [2., 3.], [4., 5.]]);
        assert_eq!(dataset.nsamples(), 3);
        assert_eq!(dataset.nfeatures(), 2);
        assert_eq!(dataset.targets(), &());
    }

    #[test]
    fn targets_replace_unit() {
        let dataset = DatasetBase::from(array![[0., 1.], [2., 3.]]).with_targets(array![1, 0]);
        assert_eq!(dataset.targets(), &array![1usize, 0]);
        assert_eq!(dataset.records().nrows(), 2);
    }

    #[test]
    fn label_count_includes_noise() {
        let dataset = DatasetBase::new(
            Array2::<f64>::zeros((5, 2)),
            array![Some(0), None, Some(1), Some(0), None],
        );
        let count = dataset.label_count();
        assert_eq!(count[&Some(0)], 2);
        assert_eq!(count[&Some(1)], 1);
        assert_eq!(count[&None], 2);
    }
}
