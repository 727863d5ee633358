//! The sizing engine: classify the inventory, partition it into pricing
//! cells, price each cell against the catalog, and best-fit match every
//! record.

pub mod catalog;
pub mod classifier;
pub mod resolver;
pub mod storage;
pub mod types;

use std::collections::BTreeMap;

use futures_util::future::join_all;

use crate::cloud_providers::aws::pricing::PricingSource;
use crate::engine::types::{CellKey, Resolution, Shape};
use crate::inventory::{InventoryRecord, ReportRow};

/// Run the full estimate. Always yields one row per input record, in input
/// order; records in cells without a feasible offering come back unmatched
/// rather than dropped.
pub async fn run_estimate(records: &[InventoryRecord], pricing: &PricingSource) -> Vec<ReportRow> {
    let shapes: Vec<Shape> = records.iter().map(classifier::classify).collect();

    let cells = partition_cells(&shapes);
    tracing::info!(
        records = records.len(),
        cells = cells.len(),
        "classified inventory"
    );

    let resolutions = resolve_cells(&shapes, cells, pricing).await;

    records
        .iter()
        .zip(&shapes)
        .zip(&resolutions)
        .map(|((record, shape), resolution)| ReportRow::assemble(record, shape, resolution))
        .collect()
}

/// Group record indices by pricing cell. BTreeMap keeps cell iteration
/// deterministic run to run.
fn partition_cells(shapes: &[Shape]) -> BTreeMap<CellKey, Vec<usize>> {
    let mut cells: BTreeMap<CellKey, Vec<usize>> = BTreeMap::new();
    for (index, shape) in shapes.iter().enumerate() {
        cells.entry(shape.cell()).or_default().push(index);
    }
    cells
}

/// Price every cell concurrently. Each cell owns a disjoint set of record
/// indices, so the per-cell results merge without shared mutable state.
async fn resolve_cells(
    shapes: &[Shape],
    cells: BTreeMap<CellKey, Vec<usize>>,
    pricing: &PricingSource,
) -> Vec<Resolution> {
    let cell_results = join_all(
        cells
            .into_iter()
            .map(|(cell, indices)| resolve_cell(shapes, cell, indices, pricing)),
    )
    .await;

    let mut resolutions = vec![Resolution::Unmatched; shapes.len()];
    for resolved in cell_results {
        for (index, resolution) in resolved {
            resolutions[index] = resolution;
        }
    }
    resolutions
}

/// Fetch, normalize and match one cell, returning (record index, resolution)
/// pairs. Fetch-normalize-resolve for a cell is idempotent, so a failed
/// fetch simply leaves the cell's records unmatched.
async fn resolve_cell(
    shapes: &[Shape],
    cell: CellKey,
    indices: Vec<usize>,
    pricing: &PricingSource,
) -> Vec<(usize, Resolution)> {
    let raw = pricing.fetch_offerings(&cell).await;
    let candidates = catalog::normalize(&raw, cell.family, cell.workload);

    if candidates.is_empty() {
        tracing::warn!(?cell, records = indices.len(), "no candidate offerings for cell");
    } else {
        tracing::debug!(?cell, candidates = candidates.len(), "normalized cell catalog");
    }

    indices
        .into_iter()
        .map(|index| {
            let shape = &shapes[index];
            let resolution =
                resolver::resolve(shape.required_cores, shape.required_memory_gb, &candidates);
            (index, resolution)
        })
        .collect()
}
