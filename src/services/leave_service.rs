use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use metrics::counter;
use moka::future::Cache;

use crate::{
    db::{EmployeeDirectory, LeaveRepository},
    engine::{balance, DomainError},
    models::{
        CreateLeaveTypeInput, LeaveAction, LeaveBalance, LeaveRequest, LeaveStatus, LeaveType, NewLeaveRequest,
        SubmitLeaveRequestInput,
    },
    AppError, AppResult,
};

/// (employee_id, leave_type_id, year)
type BalanceKey = (i32, i32, i32);

/// Leave catalog, request ledger and derived balances
pub struct LeaveService {
    employees: Arc<dyn EmployeeDirectory>,
    leave: Arc<dyn LeaveRepository>,
    balances: Cache<BalanceKey, i32>,
    /// Bumped on every status transition; a balance read that straddles one is not cached
    generation: AtomicU64,
}

impl LeaveService {
    pub fn new(employees: Arc<dyn EmployeeDirectory>, leave: Arc<dyn LeaveRepository>, balance_ttl: Duration) -> Self {
        let balances = Cache::builder()
            .time_to_live(balance_ttl)
            .max_capacity(10_000)
            .build();

        Self {
            employees,
            leave,
            balances,
            generation: AtomicU64::new(0),
        }
    }

    pub async fn list_types(&self) -> AppResult<Vec<LeaveType>> {
        self.leave.leave_types().await
    }

    pub async fn create_type(&self, input: CreateLeaveTypeInput) -> AppResult<LeaveType> {
        input.validate().map_err(AppError::Validation)?;
        let leave_type = self.leave.insert_leave_type(&input).await?;
        tracing::info!(leave_type_id = leave_type.id, name = %leave_type.name, "Leave type created");
        Ok(leave_type)
    }

    pub async fn delete_type(&self, id: i32) -> AppResult<()> {
        self.leave.delete_leave_type(id).await?;
        tracing::info!(leave_type_id = id, "Leave type deleted");
        Ok(())
    }

    async fn leave_type(&self, id: i32) -> AppResult<LeaveType> {
        self.leave
            .leave_type(id)
            .await?
            .ok_or_else(|| DomainError::LeaveTypeNotFound(id).into())
    }

    async fn ensure_employee(&self, employee_id: i32) -> AppResult<()> {
        match self.employees.get(employee_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::EmployeeNotFound(employee_id).into()),
        }
    }

    /// Reads approved history from storage, bypassing the cache.
    async fn fresh_remaining(&self, employee_id: i32, leave_type: &LeaveType, year: i32) -> AppResult<i32> {
        let approved = self.leave.approved_in_year(employee_id, leave_type.id, year).await?;
        Ok(balance::remaining_days(leave_type, &approved, employee_id, year))
    }

    /// Cached balance for display. Never used by the submission gate.
    async fn remaining_for(&self, employee_id: i32, leave_type: &LeaveType, year: i32) -> AppResult<i32> {
        let key = (employee_id, leave_type.id, year);
        if let Some(cached) = self.balances.get(&key).await {
            return Ok(cached);
        }

        let generation = self.generation.load(Ordering::Acquire);
        let remaining = self.fresh_remaining(employee_id, leave_type, year).await?;

        if self.generation.load(Ordering::Acquire) == generation {
            self.balances.insert(key, remaining).await;
        }
        Ok(remaining)
    }

    pub async fn remaining_days(&self, employee_id: i32, leave_type_id: i32, year: i32) -> AppResult<i32> {
        let leave_type = self.leave_type(leave_type_id).await?;
        self.remaining_for(employee_id, &leave_type, year).await
    }

    pub async fn balance(&self, employee_id: i32, leave_type_id: i32, year: i32) -> AppResult<LeaveBalance> {
        self.ensure_employee(employee_id).await?;
        let leave_type = self.leave_type(leave_type_id).await?;
        let remaining = self.remaining_for(employee_id, &leave_type, year).await?;

        Ok(LeaveBalance {
            employee_id,
            leave_type_id,
            leave_type_name: leave_type.name,
            year,
            max_days_per_year: leave_type.max_days_per_year,
            used_days: leave_type.max_days_per_year - remaining,
            remaining_days: remaining,
        })
    }

    /// Validates and stores a new `Pending` request; `now` is the local wall clock.
    pub async fn submit(&self, input: SubmitLeaveRequestInput, now: NaiveDateTime) -> AppResult<LeaveRequest> {
        let result = self.try_submit(input, now).await;

        let outcome = match &result {
            Ok(_) => "submitted",
            Err(e) => e.code(),
        };
        counter!("leave_requests_total", "outcome" => outcome).increment(1);

        match &result {
            Ok(request) => tracing::info!(
                request_id = request.id,
                employee_id = request.employee_id,
                leave_type_id = request.leave_type_id,
                days = request.span_days(),
                "Leave request submitted"
            ),
            Err(e) => tracing::warn!(code = outcome, error = %e, "Leave request rejected"),
        }

        result
    }

    async fn try_submit(&self, input: SubmitLeaveRequestInput, now: NaiveDateTime) -> AppResult<LeaveRequest> {
        input.validate().map_err(AppError::Validation)?;
        let leave_type = self.leave_type(input.leave_type_id).await?;
        self.ensure_employee(input.employee_id).await?;

        if input.start_date < now.date() {
            return Err(DomainError::PastDateLeave.into());
        }

        if self.leave.has_pending(input.employee_id).await? {
            return Err(DomainError::PendingRequestExists.into());
        }

        // A share above the yearly cap fails without consulting storage
        balance::ensure_sufficient(&leave_type, input.start_date, input.end_date, |_| {
            leave_type.max_days_per_year
        })?;

        let mut remaining = HashMap::new();
        for (year, _) in balance::yearly_spans(input.start_date, input.end_date) {
            let days = self.fresh_remaining(input.employee_id, &leave_type, year).await?;
            remaining.insert(year, days);
        }
        balance::ensure_sufficient(&leave_type, input.start_date, input.end_date, |year| {
            remaining.get(&year).copied().unwrap_or(leave_type.max_days_per_year)
        })?;

        self.leave
            .insert_request(NewLeaveRequest {
                employee_id: input.employee_id,
                leave_type_id: input.leave_type_id,
                start_date: input.start_date,
                end_date: input.end_date,
                reason: input.reason.trim().to_string(),
                requested_at: now,
            })
            .await
    }

    /// Moves a pending request to its terminal state.
    pub async fn take_action(&self, request_id: i32, action: LeaveAction) -> AppResult<LeaveRequest> {
        let request = self
            .leave
            .request(request_id)
            .await?
            .ok_or(DomainError::LeaveRequestNotFound(request_id))?;

        let target = request.status.apply(action)?;

        let Some(updated) = self.leave.transition(request_id, LeaveStatus::Pending, target).await? else {
            // Decided by someone else between the read and the update
            let current = self
                .leave
                .request(request_id)
                .await?
                .map_or(request.status, |r| r.status);
            return Err(DomainError::InvalidTransition {
                from: current.as_str().to_string(),
                to: target.as_str().to_string(),
            }
            .into());
        };

        self.generation.fetch_add(1, Ordering::AcqRel);
        for (year, _) in balance::yearly_spans(updated.start_date, updated.end_date) {
            self.balances
                .invalidate(&(updated.employee_id, updated.leave_type_id, year))
                .await;
        }

        tracing::info!(
            request_id,
            employee_id = updated.employee_id,
            status = %updated.status,
            "Leave request decided"
        );
        Ok(updated)
    }

    pub async fn list_requests(&self, employee_id: Option<i32>, status: Option<LeaveStatus>) -> AppResult<Vec<LeaveRequest>> {
        self.leave.list_requests(employee_id, status).await
    }
}
