use crate::config::{MiningConfig, Mode, Strategy};
use crate::error::MiningError;
use crate::fp::{FPTree, FPTreeBuilder};
use crate::miner::Miner;
use crate::result::MinedItemsets;
use crate::store::IncidenceMatrix;
use crate::support::MinSupport;
use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

/// One `(itemsets, supports)` pair of arrays per itemset length.
type LevelArrays<'py> = Vec<(Bound<'py, PyArray2<usize>>, Bound<'py, PyArray1<usize>>)>;

impl From<MiningError> for PyErr {
    fn from(err: MiningError) -> PyErr {
        match err {
            MiningError::NonPositiveSupport
            | MiningError::InvalidFraction(_)
            | MiningError::TreeThresholdTooHigh { .. }
            | MiningError::UnknownName { .. }
            | MiningError::ShapeMismatch { .. }
            | MiningError::InvalidPhase { .. } => PyValueError::new_err(err.to_string()),
            _ => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

/// Python ints are absolute counts, floats are fractions.
fn parse_min_support(value: &Bound<'_, PyAny>) -> PyResult<MinSupport> {
    if let Ok(count) = value.extract::<i64>() {
        return Ok(MinSupport::Absolute(count));
    }
    Ok(MinSupport::Relative(value.extract::<f64>()?))
}

fn build_miner(strategy: Option<&str>, num_threads: Option<usize>) -> PyResult<Miner> {
    let mut config = MiningConfig::default();
    if let Some(name) = strategy {
        config = config.with_strategy(name.parse::<Strategy>()?);
    }
    if let Some(num_threads) = num_threads {
        config = config.with_threads(num_threads);
    }
    Ok(Miner::new(config))
}

fn levels_to_arrays(py: Python<'_>, mined: MinedItemsets) -> PyResult<LevelArrays<'_>> {
    let mut result = Vec::new();

    for level in mined.into_levels() {
        if level.is_empty() {
            continue;
        }

        let itemsets = Array2::from_shape_vec((level.len(), level.itemset_size), level.to_flat())
            .map_err(|_| PyValueError::new_err("Failed to create array"))?;
        let supports = level.supports().to_vec();

        result.push((itemsets.into_pyarray(py), supports.into_pyarray(py)));
    }

    Ok(result)
}

fn mine_matrix<'py>(
    py: Python<'py>,
    transactions: PyReadonlyArray2<'py, i32>,
    min_support: &Bound<'py, PyAny>,
    mode: Mode,
    strategy: Option<&str>,
    num_threads: Option<usize>,
) -> PyResult<LevelArrays<'py>> {
    let store = IncidenceMatrix::from_indicator(transactions.as_array());
    let min_support = parse_min_support(min_support)?;
    let miner = build_miner(strategy, num_threads)?;

    let mined = py.allow_threads(|| miner.mine(&store, mode, min_support))?;
    levels_to_arrays(py, mined)
}

#[pyfunction]
#[pyo3(name = "mine_frequent", signature = (transactions, min_support, strategy=None, num_threads=None))]
fn mine_frequent_py<'py>(
    py: Python<'py>,
    transactions: PyReadonlyArray2<'py, i32>,
    min_support: &Bound<'py, PyAny>,
    strategy: Option<&str>,
    num_threads: Option<usize>,
) -> PyResult<LevelArrays<'py>> {
    mine_matrix(py, transactions, min_support, Mode::Frequent, strategy, num_threads)
}

#[pyfunction]
#[pyo3(name = "mine_closed", signature = (transactions, min_support, strategy=None, num_threads=None))]
fn mine_closed_py<'py>(
    py: Python<'py>,
    transactions: PyReadonlyArray2<'py, i32>,
    min_support: &Bound<'py, PyAny>,
    strategy: Option<&str>,
    num_threads: Option<usize>,
) -> PyResult<LevelArrays<'py>> {
    mine_matrix(py, transactions, min_support, Mode::Closed, strategy, num_threads)
}

#[pyfunction]
#[pyo3(name = "mine_maximal", signature = (transactions, min_support, strategy=None, num_threads=None))]
fn mine_maximal_py<'py>(
    py: Python<'py>,
    transactions: PyReadonlyArray2<'py, i32>,
    min_support: &Bound<'py, PyAny>,
    strategy: Option<&str>,
    num_threads: Option<usize>,
) -> PyResult<LevelArrays<'py>> {
    mine_matrix(py, transactions, min_support, Mode::Maximal, strategy, num_threads)
}

/// Chunked two-pass tree construction followed by tree-strategy mining.
#[pyclass(name = "StreamingMiner")]
struct StreamingMiner {
    builder: FPTreeBuilder,
    fp_tree: Option<FPTree>,
}

#[pymethods]
impl StreamingMiner {
    #[new]
    fn new() -> Self {
        Self {
            builder: FPTreeBuilder::new(),
            fp_tree: None,
        }
    }

    fn count_pass(&mut self, chunk: PyReadonlyArray2<'_, i32>) -> PyResult<()> {
        let chunk = chunk.as_array().mapv(|cell| cell != 0);
        Ok(self.builder.count_pass(chunk.view())?)
    }

    fn finalize_counts(&mut self, min_support: &Bound<'_, PyAny>) -> PyResult<Vec<usize>> {
        let min_support = parse_min_support(min_support)?;
        Ok(self.builder.finalize_counts(min_support)?)
    }

    fn build_pass(&mut self, chunk: PyReadonlyArray2<'_, i32>) -> PyResult<()> {
        let chunk = chunk.as_array().mapv(|cell| cell != 0);
        Ok(self.builder.build_pass(chunk.view())?)
    }

    fn finish(&mut self) -> PyResult<()> {
        self.fp_tree = Some(self.builder.finish()?);
        Ok(())
    }

    #[pyo3(signature = (mode, min_support, num_threads=None))]
    fn mine<'py>(
        &self,
        py: Python<'py>,
        mode: &str,
        min_support: &Bound<'py, PyAny>,
        num_threads: Option<usize>,
    ) -> PyResult<LevelArrays<'py>> {
        let fp_tree = self
            .fp_tree
            .as_ref()
            .ok_or_else(|| PyRuntimeError::new_err("FP-Tree not built yet"))?;
        let mode: Mode = mode.parse()?;
        let min_support = parse_min_support(min_support)?;
        let miner = build_miner(None, num_threads)?;

        let mined = py.allow_threads(|| miner.mine_tree(fp_tree, mode, min_support))?;
        levels_to_arrays(py, mined)
    }
}

#[pymodule]
fn itemsets(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(mine_frequent_py, m)?)?;
    m.add_function(wrap_pyfunction!(mine_closed_py, m)?)?;
    m.add_function(wrap_pyfunction!(mine_maximal_py, m)?)?;
    m.add_class::<StreamingMiner>()?;
    Ok(())
}
