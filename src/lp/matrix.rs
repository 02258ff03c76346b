//! # Matrix link machinery
//!
//! Every stored coefficient appears once in its column's row-list and once in its row's
//! column-list, tied together by a pair of link indices. Each list is partitioned into a prefix
//! of entries whose partner is currently in the LP and linked, followed by the remainder; the
//! prefix is what flushing ships to the backend.
//!
//! Columns and rows live in slot pools addressed by stable indices, so a swap inside one list
//! only has to rewrite the partner's link index, never an address.
use num_traits::Zero;

use crate::data::number_types::interval::Interval;
use crate::data::number_types::rational::Rational;
use crate::lp::column::Column;
use crate::lp::error::LpError;
use crate::lp::row::Row;
use crate::lp::{ColId, RowId};


/// A slot pool with stable indices and free-slot reuse.
#[derive(Debug)]
pub(crate) struct Pool<T> {
    slots: Vec<Option<T>>,
    free: Vec<usize>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self { slots: Vec::new(), free: Vec::new() }
    }
}

impl<T> Pool<T> {
    pub(crate) fn insert(&mut self, value: T) -> usize {
        match self.free.pop() {
            Some(id) => {
                debug_assert!(self.slots[id].is_none());
                self.slots[id] = Some(value);
                id
            },
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            },
        }
    }

    pub(crate) fn remove(&mut self, id: usize) -> T {
        let value = self.slots[id].take().expect("removal of a vacant slot");
        self.free.push(id);
        value
    }

    pub(crate) fn contains(&self, id: usize) -> bool {
        self.slots.get(id).is_some_and(Option::is_some)
    }

    pub(crate) fn get(&self, id: usize) -> &T {
        self.slots[id].as_ref().expect("access to a vacant slot")
    }

    pub(crate) fn get_mut(&mut self, id: usize) -> &mut T {
        self.slots[id].as_mut().expect("access to a vacant slot")
    }
}

/// One coefficient as seen from its column.
#[derive(Clone, Debug)]
pub(crate) struct ColEntry {
    pub row: RowId,
    pub value: Rational,
    /// Position of the partner entry in the row's list, when linked.
    pub link: Option<usize>,
}

/// One coefficient as seen from its row.
#[derive(Clone, Debug)]
pub(crate) struct RowEntry {
    pub col: ColId,
    pub value: Rational,
    /// Rigorous double enclosure of `value`, kept for the bound-shifting post-processor.
    pub enclosure: Interval,
    /// Position of the partner entry in the column's list, when linked.
    pub link: Option<usize>,
    /// The column's LP position at the last flush, refreshed when shipping the row.
    pub lp_position_cache: Option<usize>,
}

/// What a coefficient change amounted to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum CoefChange {
    Added,
    Changed,
    Deleted,
    /// The entry was absent and the new value zero.
    Nothing,
}

/// The paired column and row pools with their link invariant.
#[derive(Debug, Default)]
pub(crate) struct Mat {
    pub(crate) cols: Pool<Column>,
    pub(crate) rows: Pool<Row>,
}

impl Mat {
    pub(crate) fn col(&self, id: ColId) -> &Column {
        self.cols.get(id)
    }

    pub(crate) fn col_mut(&mut self, id: ColId) -> &mut Column {
        self.cols.get_mut(id)
    }

    pub(crate) fn row(&self, id: RowId) -> &Row {
        self.rows.get(id)
    }

    pub(crate) fn row_mut(&mut self, id: RowId) -> &mut Row {
        self.rows.get_mut(id)
    }

    /// Position of the row's entry in a column's list, if present.
    pub(crate) fn col_find_entry(&self, col: ColId, row: RowId) -> Option<usize> {
        self.col(col).entries.iter().position(|entry| entry.row == row)
    }

    /// Position of the column's entry in a row's list, if present.
    pub(crate) fn row_find_entry(&self, row: RowId, col: ColId) -> Option<usize> {
        self.row(row).entries.iter().position(|entry| entry.col == col)
    }

    /// Append an unlinked coefficient to a column's list. The row side is created on linking.
    pub(crate) fn col_add_coefficient(
        &mut self,
        col: ColId,
        row: RowId,
        value: Rational,
    ) -> Result<(), LpError> {
        debug_assert!(!value.is_zero());
        if self.row(row).is_locked() {
            return Err(LpError::LockedRow);
        }
        debug_assert!(self.col_find_entry(col, row).is_none());

        let column = self.col_mut(col);
        if let Some(last) = column.entries.last() {
            if last.row > row {
                column.nonlp_rows_sorted = false;
            }
        }
        column.entries.push(ColEntry { row, value, link: None });
        column.nr_unlinked += 1;

        Ok(())
    }

    /// Append an unlinked coefficient to a row's list. The column side is created on linking.
    ///
    /// With `delay_sort` active, no duplicate search happens; duplicates are merged by the
    /// force-sort.
    pub(crate) fn row_add_coefficient(
        &mut self,
        row: RowId,
        col: ColId,
        value: Rational,
    ) -> Result<(), LpError> {
        debug_assert!(!value.is_zero());
        if self.row(row).is_locked() {
            return Err(LpError::LockedRow);
        }
        debug_assert!(
            self.row(row).delay_sort || self.row_find_entry(row, col).is_none(),
            "duplicate coefficient without delayed sorting",
        );

        let enclosure = Interval::from_rational(&value);
        let integral = value.is_integral() && self.col(col).integral;
        let this = self.row_mut(row);
        if let Some(last) = this.entries.last() {
            if last.col > col {
                this.nonlp_cols_sorted = false;
            }
        }
        this.entries.push(RowEntry {
            col,
            value,
            enclosure,
            link: None,
            lp_position_cache: None,
        });
        this.nr_unlinked += 1;
        this.integral &= integral;

        Ok(())
    }

    /// Create the missing row-side partners of a column's unlinked entries.
    pub(crate) fn link_column(&mut self, col: ColId) {
        if self.col(col).nr_unlinked == 0 {
            return;
        }

        for position in 0..self.col(col).entries.len() {
            if self.col(col).entries[position].link.is_some() {
                continue;
            }
            let (row, value) = {
                let entry = &self.col(col).entries[position];
                (entry.row, entry.value.clone())
            };

            let enclosure = Interval::from_rational(&value);
            let integral = value.is_integral() && self.col(col).integral;
            let partner = self.row_mut(row);
            partner.entries.push(RowEntry {
                col,
                value,
                enclosure,
                link: Some(position),
                lp_position_cache: None,
            });
            partner.integral &= integral;
            let row_position = partner.entries.len() - 1;
            if row_position >= 1 && partner.entries[row_position - 1].col > col {
                partner.nonlp_cols_sorted = false;
            }

            self.col_mut(col).entries[position].link = Some(row_position);
            self.col_mut(col).nr_unlinked -= 1;

            self.restore_prefixes(col, position, row, row_position);
        }
        debug_assert_eq!(self.col(col).nr_unlinked, 0);
    }

    /// Create the missing column-side partners of a row's unlinked entries.
    pub(crate) fn link_row(&mut self, row: RowId) {
        if self.row(row).nr_unlinked == 0 {
            return;
        }

        for position in 0..self.row(row).entries.len() {
            if self.row(row).entries[position].link.is_some() {
                continue;
            }
            let (col, value) = {
                let entry = &self.row(row).entries[position];
                (entry.col, entry.value.clone())
            };

            let partner = self.col_mut(col);
            partner.entries.push(ColEntry { row, value, link: Some(position) });
            let col_position = partner.entries.len() - 1;
            if col_position >= 1 && partner.entries[col_position - 1].row > row {
                partner.nonlp_rows_sorted = false;
            }

            self.row_mut(row).entries[position].link = Some(col_position);
            self.row_mut(row).nr_unlinked -= 1;

            self.restore_prefixes(col, col_position, row, position);
        }
        debug_assert_eq!(self.row(row).nr_unlinked, 0);
    }

    /// After linking, move both sides of an entry into the LP prefixes their partners' LP
    /// membership calls for.
    ///
    /// Promoting one side only rewrites link indices on the other, never positions, so the two
    /// position arguments stay valid throughout.
    fn restore_prefixes(
        &mut self,
        col: ColId,
        col_position: usize,
        row: RowId,
        row_position: usize,
    ) {
        if self.row(row).lp_position.is_some() {
            self.col_promote_entry(col, col_position);
        }
        if self.col(col).lp_position.is_some() {
            self.row_promote_entry(row, row_position);
        }
    }

    /// Swap a column entry into the LP prefix.
    fn col_promote_entry(&mut self, col: ColId, position: usize) {
        let prefix = self.col(col).nr_lp_rows;
        debug_assert!(position >= prefix);
        self.col_swap_entries(col, prefix, position);
        let column = self.col_mut(col);
        column.nr_lp_rows += 1;
        column.lp_rows_sorted = false;
    }

    /// Swap a column entry out of the LP prefix.
    fn col_demote_entry(&mut self, col: ColId, position: usize) {
        let last = self.col(col).nr_lp_rows - 1;
        debug_assert!(position <= last);
        self.col_swap_entries(col, position, last);
        let column = self.col_mut(col);
        column.nr_lp_rows -= 1;
        column.nonlp_rows_sorted = false;
    }

    fn row_promote_entry(&mut self, row: RowId, position: usize) {
        let prefix = self.row(row).nr_lp_cols;
        debug_assert!(position >= prefix);
        self.row_swap_entries(row, prefix, position);
        let this = self.row_mut(row);
        this.nr_lp_cols += 1;
        this.lp_cols_sorted = false;
    }

    fn row_demote_entry(&mut self, row: RowId, position: usize) {
        let last = self.row(row).nr_lp_cols - 1;
        debug_assert!(position <= last);
        self.row_swap_entries(row, position, last);
        let this = self.row_mut(row);
        this.nr_lp_cols -= 1;
        this.nonlp_cols_sorted = false;
    }

    /// Swap two positions of a column's list and rewrite the partners' back links.
    fn col_swap_entries(&mut self, col: ColId, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.col_mut(col).entries.swap(a, b);
        for position in [a, b] {
            let (row, link) = {
                let entry = &self.col(col).entries[position];
                (entry.row, entry.link)
            };
            if let Some(partner) = link {
                self.row_mut(row).entries[partner].link = Some(position);
            }
        }
    }

    /// Swap two positions of a row's list and rewrite the partners' back links.
    fn row_swap_entries(&mut self, row: RowId, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.row_mut(row).entries.swap(a, b);
        for position in [a, b] {
            let (col, link) = {
                let entry = &self.row(row).entries[position];
                (entry.col, entry.link)
            };
            if let Some(partner) = link {
                self.col_mut(col).entries[partner].link = Some(position);
            }
        }
    }

    /// The column entered the LP: promote its entries in all linked rows' prefixes.
    pub(crate) fn col_entered_lp(&mut self, col: ColId) {
        for position in 0..self.col(col).entries.len() {
            let (row, link) = {
                let entry = &self.col(col).entries[position];
                (entry.row, entry.link)
            };
            if let Some(row_position) = link {
                debug_assert!(row_position >= self.row(row).nr_lp_cols);
                self.row_promote_entry(row, row_position);
            }
        }
    }

    /// The column left the LP: demote its entries out of all linked rows' prefixes.
    pub(crate) fn col_left_lp(&mut self, col: ColId) {
        for position in 0..self.col(col).entries.len() {
            let (row, link) = {
                let entry = &self.col(col).entries[position];
                (entry.row, entry.link)
            };
            if let Some(row_position) = link {
                if row_position < self.row(row).nr_lp_cols {
                    self.row_demote_entry(row, row_position);
                }
            }
        }
    }

    /// The row entered the LP: promote its entries in all linked columns' prefixes.
    pub(crate) fn row_entered_lp(&mut self, row: RowId) {
        for position in 0..self.row(row).entries.len() {
            let (col, link) = {
                let entry = &self.row(row).entries[position];
                (entry.col, entry.link)
            };
            if let Some(col_position) = link {
                debug_assert!(col_position >= self.col(col).nr_lp_rows);
                self.col_promote_entry(col, col_position);
            }
        }
    }

    /// The row left the LP: demote its entries out of all linked columns' prefixes.
    pub(crate) fn row_left_lp(&mut self, row: RowId) {
        for position in 0..self.row(row).entries.len() {
            let (col, link) = {
                let entry = &self.row(row).entries[position];
                (entry.col, entry.link)
            };
            if let Some(col_position) = link {
                if col_position < self.col(col).nr_lp_rows {
                    self.col_demote_entry(col, col_position);
                }
            }
        }
    }

    /// Remove the coefficient at a known column position, together with its row-side partner.
    fn col_remove_entry(&mut self, col: ColId, position: usize) -> Result<(), LpError> {
        let (row, link) = {
            let entry = &self.col(col).entries[position];
            (entry.row, entry.link)
        };

        if let Some(row_position) = link {
            self.check_col_link(col, position)?;
            // Removing the partner first only rewrites link indices on the column side, so
            // `position` stays valid.
            self.row_remove_unilateral(row, row_position);
            self.col_mut(col).entries[position].link = None;
            self.col_mut(col).nr_unlinked += 1;
        }
        self.col_remove_unilateral(col, position);
        self.col_mut(col).nr_unlinked -= 1;
        self.recompute_row_integrality(row);

        Ok(())
    }

    /// Remove one entry from a column's list only, preserving the prefix partition.
    fn col_remove_unilateral(&mut self, col: ColId, position: usize) {
        let mut position = position;
        if position < self.col(col).nr_lp_rows {
            self.col_demote_entry(col, position);
            position = self.col(col).nr_lp_rows;
        }
        let last = self.col(col).entries.len() - 1;
        self.col_swap_entries(col, position, last);
        let column = self.col_mut(col);
        column.entries.pop();
        column.nonlp_rows_sorted = false;
    }

    /// Remove one entry from a row's list only, preserving the prefix partition.
    fn row_remove_unilateral(&mut self, row: RowId, position: usize) {
        let mut position = position;
        if position < self.row(row).nr_lp_cols {
            self.row_demote_entry(row, position);
            position = self.row(row).nr_lp_cols;
        }
        let last = self.row(row).entries.len() - 1;
        self.row_swap_entries(row, position, last);
        let this = self.row_mut(row);
        this.entries.pop();
        this.nonlp_cols_sorted = false;
    }

    /// Delete a coefficient wherever it is stored. Returns whether it existed.
    pub(crate) fn delete_coefficient(&mut self, col: ColId, row: RowId) -> Result<bool, LpError> {
        if self.row(row).is_locked() {
            return Err(LpError::LockedRow);
        }

        if let Some(position) = self.col_find_entry(col, row) {
            self.col_remove_entry(col, position)?;
            return Ok(true);
        }
        // The coefficient may live only on the row side, added there and not yet linked.
        if let Some(position) = self.row_find_entry(row, col) {
            debug_assert!(self.row(row).entries[position].link.is_none());
            self.row_remove_unilateral(row, position);
            self.row_mut(row).nr_unlinked -= 1;
            self.recompute_row_integrality(row);
            return Ok(true);
        }

        Ok(false)
    }

    /// Set a coefficient to a value; zero deletes, a missing entry is added.
    pub(crate) fn change_coefficient(
        &mut self,
        col: ColId,
        row: RowId,
        value: Rational,
    ) -> Result<CoefChange, LpError> {
        if self.row(row).is_locked() {
            return Err(LpError::LockedRow);
        }

        if value.is_zero() {
            return Ok(if self.delete_coefficient(col, row)? {
                CoefChange::Deleted
            } else {
                CoefChange::Nothing
            });
        }

        if let Some(position) = self.col_find_entry(col, row) {
            self.check_col_link(col, position)?;
            let link = self.col(col).entries[position].link;
            self.col_mut(col).entries[position].value = value.clone();
            if let Some(row_position) = link {
                let entry = &mut self.row_mut(row).entries[row_position];
                entry.enclosure = Interval::from_rational(&value);
                entry.value = value;
            }
            self.recompute_row_integrality(row);
            return Ok(CoefChange::Changed);
        }
        if let Some(position) = self.row_find_entry(row, col) {
            debug_assert!(self.row(row).entries[position].link.is_none());
            let entry = &mut self.row_mut(row).entries[position];
            entry.enclosure = Interval::from_rational(&value);
            entry.value = value;
            self.recompute_row_integrality(row);
            return Ok(CoefChange::Changed);
        }

        self.col_add_coefficient(col, row, value)?;
        Ok(CoefChange::Added)
    }

    /// Remove the row-side partners of all of a column's entries, before final release.
    pub(crate) fn unlink_column(&mut self, col: ColId) {
        for position in 0..self.col(col).entries.len() {
            let (row, link) = {
                let entry = &self.col(col).entries[position];
                (entry.row, entry.link)
            };
            if let Some(row_position) = link {
                self.row_remove_unilateral(row, row_position);
                self.col_mut(col).entries[position].link = None;
                self.col_mut(col).nr_unlinked += 1;
                self.recompute_row_integrality(row);
            }
        }
        debug_assert_eq!(self.col(col).nr_unlinked, self.col(col).entries.len());
    }

    /// Remove the column-side partners of all of a row's entries, before final release.
    pub(crate) fn unlink_row(&mut self, row: RowId) {
        for position in 0..self.row(row).entries.len() {
            let (col, link) = {
                let entry = &self.row(row).entries[position];
                (entry.col, entry.link)
            };
            if let Some(col_position) = link {
                self.col_remove_unilateral(col, col_position);
                self.row_mut(row).entries[position].link = None;
                self.row_mut(row).nr_unlinked += 1;
            }
        }
        debug_assert_eq!(self.row(row).nr_unlinked, self.row(row).entries.len());
    }

    /// Sort a column's prefix and suffix by row index, if their flags call for it.
    pub(crate) fn sort_column(&mut self, col: ColId) {
        if !self.col(col).lp_rows_sorted {
            let end = self.col(col).nr_lp_rows;
            self.col_sort_region(col, 0, end);
            self.col_mut(col).lp_rows_sorted = true;
        }
        if !self.col(col).nonlp_rows_sorted {
            let (start, end) = (self.col(col).nr_lp_rows, self.col(col).entries.len());
            self.col_sort_region(col, start, end);
            self.col_mut(col).nonlp_rows_sorted = true;
        }
    }

    fn col_sort_region(&mut self, col: ColId, start: usize, end: usize) {
        self.col_mut(col).entries[start..end].sort_by_key(|entry| entry.row);
        for position in start..end {
            let (row, link) = {
                let entry = &self.col(col).entries[position];
                (entry.row, entry.link)
            };
            if let Some(partner) = link {
                self.row_mut(row).entries[partner].link = Some(position);
            }
        }
    }

    /// Sort a row's prefix and suffix by column index, if their flags call for it.
    ///
    /// A row with `delay_sort` active is left alone until the force-sort.
    pub(crate) fn sort_row(&mut self, row: RowId) {
        if self.row(row).delay_sort {
            return;
        }
        if !self.row(row).lp_cols_sorted {
            let end = self.row(row).nr_lp_cols;
            self.row_sort_region(row, 0, end);
            self.row_mut(row).lp_cols_sorted = true;
        }
        if !self.row(row).nonlp_cols_sorted {
            let (start, end) = (self.row(row).nr_lp_cols, self.row(row).entries.len());
            self.row_sort_region(row, start, end);
            self.row_mut(row).nonlp_cols_sorted = true;
        }
    }

    fn row_sort_region(&mut self, row: RowId, start: usize, end: usize) {
        self.row_mut(row).entries[start..end].sort_by_key(|entry| entry.col);
        for position in start..end {
            let (col, link) = {
                let entry = &self.row(row).entries[position];
                (entry.col, entry.link)
            };
            if let Some(partner) = link {
                self.col_mut(col).entries[partner].link = Some(position);
            }
        }
    }

    /// End delayed sorting: sort, merge duplicate columns in the suffix by summing their
    /// coefficients, and drop entries that summed to zero.
    pub(crate) fn force_sort_row(&mut self, row: RowId) -> Result<(), LpError> {
        self.row_mut(row).delay_sort = false;
        self.sort_row(row);

        // Duplicates land in the suffix, because delayed additions are unlinked.
        let mut position = self.row(row).nr_lp_cols;
        while position + 1 < self.row(row).entries.len() {
            let (col, next_col) = {
                let entries = &self.row(row).entries;
                (entries[position].col, entries[position + 1].col)
            };
            if col != next_col {
                position += 1;
                continue;
            }

            // Keep a linked occurrence as the survivor; at most one can be linked.
            if self.row(row).entries[position].link.is_none()
                && self.row(row).entries[position + 1].link.is_some()
            {
                self.row_swap_entries(row, position, position + 1);
            }
            let addend = self.row(row).entries[position + 1].value.clone();
            debug_assert!(self.row(row).entries[position + 1].link.is_none());
            let merged = &self.row(row).entries[position].value + &addend;
            let link = self.row(row).entries[position].link;
            {
                let entry = &mut self.row_mut(row).entries[position];
                entry.enclosure = Interval::from_rational(&merged);
                entry.value = merged.clone();
            }
            if let Some(col_position) = link {
                self.col_mut(col).entries[col_position].value = merged.clone();
            }
            self.row_remove_unilateral(row, position + 1);
            self.row_mut(row).nr_unlinked -= 1;
            // The removal swapped in the tail entry; re-sort the remainder.
            self.row_mut(row).nonlp_cols_sorted = false;
            self.sort_row(row);

            if merged.is_zero() {
                if link.is_some() {
                    let col_position = self.col_find_entry(col, row)
                        .ok_or(LpError::InvalidLink)?;
                    self.col_remove_entry(col, col_position)?;
                } else {
                    self.row_remove_unilateral(row, position);
                    self.row_mut(row).nr_unlinked -= 1;
                }
                self.row_mut(row).nonlp_cols_sorted = false;
                self.sort_row(row);
            }
        }

        // A delayed addition may also duplicate an entry already linked in the LP prefix; such
        // pairs are never adjacent, so match each suffix entry against the prefix.
        let mut position = self.row(row).nr_lp_cols;
        while position < self.row(row).entries.len() {
            let col = self.row(row).entries[position].col;
            let prefix_position = self.row(row).entries[..self.row(row).nr_lp_cols].iter()
                .position(|entry| entry.col == col);
            let Some(prefix_position) = prefix_position else {
                position += 1;
                continue;
            };

            debug_assert!(self.row(row).entries[position].link.is_none());
            let addend = self.row(row).entries[position].value.clone();
            let merged = &self.row(row).entries[prefix_position].value + &addend;
            let link = self.row(row).entries[prefix_position].link;
            {
                let entry = &mut self.row_mut(row).entries[prefix_position];
                entry.enclosure = Interval::from_rational(&merged);
                entry.value = merged.clone();
            }
            if let Some(col_position) = link {
                self.col_mut(col).entries[col_position].value = merged.clone();
            }
            self.row_remove_unilateral(row, position);
            self.row_mut(row).nr_unlinked -= 1;

            if merged.is_zero() {
                let col_position = self.col_find_entry(col, row)
                    .ok_or(LpError::InvalidLink)?;
                self.col_remove_entry(col, col_position)?;
            }
            // The removal swapped in the tail entry; re-examine this position.
        }
        self.sort_row(row);
        self.recompute_row_integrality(row);

        Ok(())
    }

    /// Refresh a row's integrality flag from its entries and their columns.
    pub(crate) fn recompute_row_integrality(&mut self, row: RowId) {
        let integral = self.row(row).entries.iter()
            .all(|entry| entry.value.is_integral() && self.col(entry.col).integral);
        self.row_mut(row).integral = integral;
    }

    fn check_col_link(&self, col: ColId, position: usize) -> Result<(), LpError> {
        let entry = &self.col(col).entries[position];
        if let Some(row_position) = entry.link {
            let partner = self.row(entry.row).entries.get(row_position)
                .ok_or(LpError::InvalidLink)?;
            if partner.col != col || partner.link != Some(position) {
                return Err(LpError::InvalidLink);
            }
        }
        Ok(())
    }

    /// Verify the full link invariant; test and debug support.
    pub(crate) fn check_links(&self) -> Result<(), LpError> {
        for (col, slot) in self.cols.slots.iter().enumerate() {
            let Some(column) = slot else { continue };
            let mut unlinked = 0;
            for (position, entry) in column.entries.iter().enumerate() {
                match entry.link {
                    None => unlinked += 1,
                    Some(row_position) => {
                        let partner = self.row(entry.row).entries.get(row_position)
                            .ok_or(LpError::InvalidLink)?;
                        if partner.col != col
                            || partner.link != Some(position)
                            || partner.value != entry.value
                        {
                            return Err(LpError::InvalidLink);
                        }
                    },
                }
                let in_prefix = position < column.nr_lp_rows;
                let belongs = entry.link.is_some() && self.row(entry.row).lp_position.is_some();
                if in_prefix != belongs {
                    return Err(LpError::InvalidLink);
                }
            }
            if unlinked != column.nr_unlinked {
                return Err(LpError::InvalidLink);
            }
        }

        for (row, slot) in self.rows.slots.iter().enumerate() {
            let Some(this) = slot else { continue };
            let mut unlinked = 0;
            for (position, entry) in this.entries.iter().enumerate() {
                match entry.link {
                    None => unlinked += 1,
                    Some(col_position) => {
                        let partner = self.col(entry.col).entries.get(col_position)
                            .ok_or(LpError::InvalidLink)?;
                        if partner.row != row || partner.link != Some(position) {
                            return Err(LpError::InvalidLink);
                        }
                    },
                }
                let in_prefix = position < this.nr_lp_cols;
                let belongs = entry.link.is_some() && self.col(entry.col).lp_position.is_some();
                if in_prefix != belongs {
                    return Err(LpError::InvalidLink);
                }
            }
            if unlinked != this.nr_unlinked {
                return Err(LpError::InvalidLink);
            }
        }

        Ok(())
    }
}
