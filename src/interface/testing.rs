//! # A scripted backend for tests
//!
//! Records every call the management layer makes and answers solve requests from a prepared
//! script, so that tests can pin down exactly which operations a flush or a solve performs.
use std::collections::VecDeque;

use num_traits::Zero;

use crate::data::elements::BasisStatus;
use crate::data::number_types::rational::Rational;
use crate::interface::backend::{
    BackendColumn, BackendError, BackendRow, BackendState, BackendStatus, IntParam,
    RationalLpBackend, RealParam,
};

/// One recorded backend call, with the data needed to assert on replay order and batch sizes.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    AddColumns(usize),
    AddRows(usize),
    DeleteColumnsFrom(usize),
    DeleteRowsFrom(usize),
    ChangeObjectives(Vec<(usize, Rational)>),
    ChangeBounds(Vec<(usize, Rational, Rational)>),
    ChangeSides(Vec<(usize, Rational, Rational)>),
    SolveDual,
    SolvePrimal,
    SetRealParam(RealParam, f64),
    SetIntParam(IntParam, i64),
    SetState,
}

/// One scripted answer to a solve call.
#[derive(Clone, Debug)]
pub(crate) struct ScriptedSolve {
    pub result: Result<BackendStatus, BackendError>,
    pub objective: Rational,
    pub primal: Vec<Rational>,
    pub dual: Vec<Rational>,
    pub activity: Vec<Rational>,
    pub reduced_cost: Vec<Rational>,
    pub column_basis: Vec<BasisStatus>,
    pub row_basis: Vec<BasisStatus>,
    pub farkas: Option<Vec<Rational>>,
    pub ray: Option<Vec<Rational>>,
    pub primal_feasible: bool,
    pub dual_feasible: bool,
}

impl ScriptedSolve {
    /// An answer with the given status and no solution data.
    pub fn status(status: BackendStatus) -> Self {
        Self {
            result: Ok(status),
            objective: Rational::zero(),
            primal: Vec::new(),
            dual: Vec::new(),
            activity: Vec::new(),
            reduced_cost: Vec::new(),
            column_basis: Vec::new(),
            row_basis: Vec::new(),
            farkas: None,
            ray: None,
            primal_feasible: false,
            dual_feasible: false,
        }
    }

    /// An answer that fails the call outright.
    pub fn failure(description: &str) -> Self {
        let mut this = Self::status(BackendStatus::Error);
        this.result = Err(BackendError::new(description));
        this
    }
}

/// A backend that stores the problem, records calls and answers solves from a script.
#[derive(Default)]
pub(crate) struct MockBackend {
    pub columns: Vec<BackendColumn>,
    pub rows: Vec<BackendRow>,
    pub calls: Vec<Call>,
    pub script: VecDeque<ScriptedSolve>,
    current: Option<ScriptedSolve>,
    pub saved_state: Option<BackendState>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next solve answer.
    pub fn expect_solve(&mut self, answer: ScriptedSolve) {
        self.script.push_back(answer);
    }

    /// The recorded calls since the last [`clear_calls`](Self::clear_calls).
    pub fn solve_calls(&self) -> usize {
        self.calls.iter()
            .filter(|call| matches!(call, Call::SolveDual | Call::SolvePrimal))
            .count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn solve(&mut self, call: Call) -> Result<(), BackendError> {
        self.calls.push(call);
        let answer = self.script.pop_front()
            .expect("a scripted answer for every solve call");
        let result = answer.result.clone();
        self.current = Some(answer);
        match result {
            Ok(_) => Ok(()),
            Err(error) => Err(error),
        }
    }

    fn current(&self) -> Option<&ScriptedSolve> {
        self.current.as_ref()
    }
}

impl RationalLpBackend for MockBackend {
    fn nr_columns(&self) -> usize {
        self.columns.len()
    }

    fn nr_rows(&self) -> usize {
        self.rows.len()
    }

    fn add_columns(&mut self, columns: Vec<BackendColumn>) -> Result<(), BackendError> {
        self.calls.push(Call::AddColumns(columns.len()));
        self.columns.extend(columns);
        Ok(())
    }

    fn add_rows(&mut self, rows: Vec<BackendRow>) -> Result<(), BackendError> {
        self.calls.push(Call::AddRows(rows.len()));
        self.rows.extend(rows);
        Ok(())
    }

    fn delete_columns_from(&mut self, first: usize) -> Result<(), BackendError> {
        self.calls.push(Call::DeleteColumnsFrom(first));
        self.columns.truncate(first);
        Ok(())
    }

    fn delete_rows_from(&mut self, first: usize) -> Result<(), BackendError> {
        self.calls.push(Call::DeleteRowsFrom(first));
        self.rows.truncate(first);
        Ok(())
    }

    fn change_objectives(&mut self, changes: &[(usize, Rational)]) -> Result<(), BackendError> {
        self.calls.push(Call::ChangeObjectives(changes.to_vec()));
        for (index, objective) in changes {
            self.columns[*index].objective = objective.clone();
        }
        Ok(())
    }

    fn change_bounds(
        &mut self,
        changes: &[(usize, Rational, Rational)],
    ) -> Result<(), BackendError> {
        self.calls.push(Call::ChangeBounds(changes.to_vec()));
        for (index, lower, upper) in changes {
            self.columns[*index].lower = lower.clone();
            self.columns[*index].upper = upper.clone();
        }
        Ok(())
    }

    fn change_sides(
        &mut self,
        changes: &[(usize, Rational, Rational)],
    ) -> Result<(), BackendError> {
        self.calls.push(Call::ChangeSides(changes.to_vec()));
        for (index, left, right) in changes {
            self.rows[*index].left = left.clone();
            self.rows[*index].right = right.clone();
        }
        Ok(())
    }

    fn solve_dual(&mut self) -> Result<(), BackendError> {
        self.solve(Call::SolveDual)
    }

    fn solve_primal(&mut self) -> Result<(), BackendError> {
        self.solve(Call::SolvePrimal)
    }

    fn status(&self) -> BackendStatus {
        self.current()
            .map_or(BackendStatus::NotSolved, |answer| match &answer.result {
                Ok(status) => *status,
                Err(_) => BackendStatus::Error,
            })
    }

    fn is_primal_feasible(&self) -> bool {
        self.current().is_some_and(|answer| answer.primal_feasible)
    }

    fn is_dual_feasible(&self) -> bool {
        self.current().is_some_and(|answer| answer.dual_feasible)
    }

    fn objective_value(&self) -> Rational {
        self.current().map_or_else(Rational::zero, |answer| answer.objective.clone())
    }

    fn primal_values(&self) -> Vec<Rational> {
        self.current().map_or_else(Vec::new, |answer| answer.primal.clone())
    }

    fn dual_values(&self) -> Vec<Rational> {
        self.current().map_or_else(Vec::new, |answer| answer.dual.clone())
    }

    fn activities(&self) -> Vec<Rational> {
        self.current().map_or_else(Vec::new, |answer| answer.activity.clone())
    }

    fn reduced_costs(&self) -> Vec<Rational> {
        self.current().map_or_else(Vec::new, |answer| answer.reduced_cost.clone())
    }

    fn dual_farkas(&self) -> Option<Vec<Rational>> {
        self.current().and_then(|answer| answer.farkas.clone())
    }

    fn primal_ray(&self) -> Option<Vec<Rational>> {
        self.current().and_then(|answer| answer.ray.clone())
    }

    fn basis(&self) -> (Vec<BasisStatus>, Vec<BasisStatus>) {
        match self.current() {
            Some(answer) if !answer.column_basis.is_empty() || !answer.row_basis.is_empty() => {
                (answer.column_basis.clone(), answer.row_basis.clone())
            },
            _ => (
                vec![BasisStatus::Lower; self.columns.len()],
                vec![BasisStatus::Basic; self.rows.len()],
            ),
        }
    }

    fn set_basis(
        &mut self,
        columns: &[BasisStatus],
        rows: &[BasisStatus],
    ) -> Result<(), BackendError> {
        self.saved_state = Some(BackendState { columns: columns.to_vec(), rows: rows.to_vec() });
        Ok(())
    }

    fn state(&self) -> BackendState {
        let (columns, rows) = self.basis();
        BackendState { columns, rows }
    }

    fn set_state(&mut self, state: &BackendState) -> Result<(), BackendError> {
        self.calls.push(Call::SetState);
        self.saved_state = Some(state.clone());
        Ok(())
    }

    fn set_real_param(&mut self, parameter: RealParam, value: f64) {
        self.calls.push(Call::SetRealParam(parameter, value));
    }

    fn set_int_param(&mut self, parameter: IntParam, value: i64) {
        self.calls.push(Call::SetIntParam(parameter, value));
    }
}
