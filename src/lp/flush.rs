//! # The flush engine
//!
//! Replays the accumulated change set to the rational backend in six deterministic phases:
//! column deletions, row deletions, column bound/objective changes, row side changes, column
//! additions, row additions. Each phase is a no-op when its queue is empty, and coefficient
//! changes ride along as a truncate-and-re-add of the suffix behind the first changed position.
use tracing::{debug, trace};

use crate::interface::backend::{BackendColumn, BackendRow, RationalLpBackend};
use crate::lp::column::ColumnDirty;
use crate::lp::error::LpError;
use crate::lp::row::RowDirty;
use crate::lp::ExactLp;

impl<B: RationalLpBackend> ExactLp<B> {
    /// Make the backend's view match the container.
    ///
    /// Flushing by itself never changes the solution status; mutators already invalidated it.
    pub fn flush(&mut self) -> Result<(), LpError> {
        if self.flushed {
            return Ok(());
        }

        self.flush_delete_columns()?;
        self.flush_delete_rows()?;
        self.flush_change_columns()?;
        self.flush_change_rows()?;
        self.flush_add_columns()?;
        self.flush_add_rows()?;

        self.lpi_first_changed_column = self.lpi_columns.len();
        self.lpi_first_changed_row = self.lpi_rows.len();
        self.flushed = true;
        debug_assert!(self.changed_columns.is_empty());
        debug_assert!(self.changed_rows.is_empty());
        debug_assert_eq!(self.backend.nr_columns(), self.columns.len());
        debug_assert_eq!(self.backend.nr_rows(), self.rows.len());
        debug!(
            columns = self.columns.len(),
            rows = self.rows.len(),
            "exact LP flushed to the backend",
        );

        Ok(())
    }

    /// Phase 1: truncate the backend behind the first changed column position.
    fn flush_delete_columns(&mut self) -> Result<(), LpError> {
        let keep = self.lpi_first_changed_column.min(self.columns.len());
        if keep >= self.lpi_columns.len() {
            return Ok(());
        }
        debug_assert_eq!(self.columns[..keep], self.lpi_columns[..keep]);
        trace!(from = keep, count = self.lpi_columns.len() - keep, "deleting backend columns");

        self.backend.delete_columns_from(keep)?;
        for position in (keep..self.lpi_columns.len()).rev() {
            let id = self.lpi_columns[position];
            self.mat.col_mut(id).lpi_position = None;
            self.release_column(id);
        }
        self.lpi_columns.truncate(keep);

        Ok(())
    }

    /// Phase 2: truncate the backend behind the first changed row position.
    fn flush_delete_rows(&mut self) -> Result<(), LpError> {
        let keep = self.lpi_first_changed_row.min(self.rows.len());
        if keep >= self.lpi_rows.len() {
            return Ok(());
        }
        debug_assert_eq!(self.rows[..keep], self.lpi_rows[..keep]);
        trace!(from = keep, count = self.lpi_rows.len() - keep, "deleting backend rows");

        self.backend.delete_rows_from(keep)?;
        for position in (keep..self.lpi_rows.len()).rev() {
            let id = self.lpi_rows[position];
            self.mat.row_mut(id).lpi_position = None;
            self.release_row(id);
        }
        self.lpi_rows.truncate(keep);

        Ok(())
    }

    /// Phase 3: ship queued bound and objective changes of stable backend columns.
    fn flush_change_columns(&mut self) -> Result<(), LpError> {
        let mut objectives = Vec::new();
        let mut bounds = Vec::new();

        for id in std::mem::take(&mut self.changed_columns) {
            let column = self.mat.col_mut(id);
            // Columns behind the replay point lost their backend position in phase 1 and are
            // re-shipped whole in phase 5.
            if let Some(position) = column.lpi_position {
                if column.dirty.objective && column.flushed_objective != column.objective {
                    column.flushed_objective = column.objective.clone();
                    objectives.push((position, column.objective.clone()));
                }
                let bound_changed = (column.dirty.lower || column.dirty.upper)
                    && (column.flushed_lower != column.lower
                        || column.flushed_upper != column.upper);
                if bound_changed {
                    column.flushed_lower = column.lower.clone();
                    column.flushed_upper = column.upper.clone();
                    bounds.push((position, column.lower.clone(), column.upper.clone()));
                }
            }
            column.dirty = ColumnDirty::default();
        }

        if !objectives.is_empty() {
            trace!(count = objectives.len(), "changing backend objectives");
            self.backend.change_objectives(&objectives)?;
        }
        if !bounds.is_empty() {
            trace!(count = bounds.len(), "changing backend bounds");
            self.backend.change_bounds(&bounds)?;
        }

        Ok(())
    }

    /// Phase 4: ship queued side changes of stable backend rows, net of the constant.
    fn flush_change_rows(&mut self) -> Result<(), LpError> {
        let mut sides = Vec::new();

        for id in std::mem::take(&mut self.changed_rows) {
            let row = self.mat.row(id);
            if let Some(position) = row.lpi_position {
                let left = &row.left - &row.constant;
                let right = &row.right - &row.constant;
                if row.flushed_left != left || row.flushed_right != right {
                    let row = self.mat.row_mut(id);
                    row.flushed_left = left.clone();
                    row.flushed_right = right.clone();
                    sides.push((position, left, right));
                }
            }
            self.mat.row_mut(id).dirty = RowDirty::default();
        }

        if !sides.is_empty() {
            trace!(count = sides.len(), "changing backend sides");
            self.backend.change_sides(&sides)?;
        }

        Ok(())
    }

    /// Phase 5: ship every LP column the backend does not hold yet.
    ///
    /// Only coefficients whose row already has a backend position go into the column block;
    /// the rest follow in phase 6 with their rows.
    fn flush_add_columns(&mut self) -> Result<(), LpError> {
        let first = self.lpi_columns.len();
        if first == self.columns.len() {
            return Ok(());
        }

        let mut batch = Vec::with_capacity(self.columns.len() - first);
        for position in first..self.columns.len() {
            let id = self.columns[position];
            self.mat.link_column(id);
            self.mat.sort_column(id);

            let column = self.mat.col(id);
            let mut entries = column.entries[..column.nr_lp_rows].iter()
                .filter_map(|entry| {
                    self.mat.row(entry.row).lpi_position
                        .map(|row_position| (row_position, entry.value.clone()))
                })
                .collect::<Vec<_>>();
            entries.sort_by_key(|&(row_position, _)| row_position);

            batch.push(BackendColumn {
                name: column.name.clone(),
                objective: column.objective.clone(),
                lower: column.lower.clone(),
                upper: column.upper.clone(),
                entries,
            });
        }
        trace!(count = batch.len(), "adding backend columns");
        self.backend.add_columns(batch)?;

        for position in first..self.columns.len() {
            let id = self.columns[position];
            self.capture_column(id);
            let column = self.mat.col_mut(id);
            column.lpi_position = Some(position);
            column.flushed_objective = column.objective.clone();
            column.flushed_lower = column.lower.clone();
            column.flushed_upper = column.upper.clone();
            column.dirty = ColumnDirty::default();
            self.lpi_columns.push(id);
        }

        Ok(())
    }

    /// Phase 6: ship every LP row the backend does not hold yet.
    ///
    /// By now every LP column has a backend position, so the row blocks carry all remaining
    /// cross coefficients exactly once.
    fn flush_add_rows(&mut self) -> Result<(), LpError> {
        let first = self.lpi_rows.len();
        if first == self.rows.len() {
            return Ok(());
        }

        let mut batch = Vec::with_capacity(self.rows.len() - first);
        for position in first..self.rows.len() {
            let id = self.rows[position];
            self.mat.link_row(id);
            if self.mat.row(id).delay_sort {
                self.mat.force_sort_row(id)?;
            } else {
                self.mat.sort_row(id);
            }

            // Refresh the per-entry LP position caches while shipping.
            for entry_position in 0..self.mat.row(id).nr_lp_cols {
                let col = self.mat.row(id).entries[entry_position].col;
                let cache = self.mat.col(col).lp_position;
                self.mat.row_mut(id).entries[entry_position].lp_position_cache = cache;
            }

            let row = self.mat.row(id);
            let mut entries = row.entries[..row.nr_lp_cols].iter()
                .filter_map(|entry| {
                    self.mat.col(entry.col).lpi_position
                        .map(|col_position| (col_position, entry.value.clone()))
                })
                .collect::<Vec<_>>();
            entries.sort_by_key(|&(col_position, _)| col_position);

            batch.push(BackendRow {
                name: row.name.clone(),
                left: &row.left - &row.constant,
                right: &row.right - &row.constant,
                entries,
            });
        }
        trace!(count = batch.len(), "adding backend rows");
        self.backend.add_rows(batch)?;

        for position in first..self.rows.len() {
            let id = self.rows[position];
            self.capture_row(id);
            let row = self.mat.row_mut(id);
            row.lpi_position = Some(position);
            row.flushed_left = &row.left - &row.constant;
            row.flushed_right = &row.right - &row.constant;
            row.dirty = RowDirty::default();
            self.lpi_rows.push(id);
        }

        Ok(())
    }
}
