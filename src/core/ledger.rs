//! Leave entitlement ledger. Every operation is a pure function from one
//! balance to the next; callers persist the result together with the
//! matching leave-request transition.

use crate::errors::{AppError, AppResult};
use crate::models::leave::{LeaveBalance, LeaveType};
use crate::utils::formatting::round2;

const EPSILON: f64 = 1e-9;

fn check_amount(day_equivalent: f64) -> AppResult<()> {
    if !day_equivalent.is_finite() || day_equivalent < 0.0 {
        return Err(AppError::ValidationFailed(format!(
            "invalid day-equivalent: {day_equivalent}"
        )));
    }
    Ok(())
}

fn check_pending(balance: &LeaveBalance, day_equivalent: f64) -> AppResult<()> {
    if day_equivalent > balance.pending + EPSILON {
        return Err(AppError::ValidationFailed(format!(
            "cannot settle {} day(s): only {} pending on {}/{}",
            day_equivalent, balance.pending, balance.employee_id, balance.leave_type_id
        )));
    }
    Ok(())
}

/// Hold `day_equivalent` as pending. May push pending past total.
pub fn reserve(balance: &LeaveBalance, day_equivalent: f64) -> AppResult<LeaveBalance> {
    check_amount(day_equivalent)?;
    Ok(LeaveBalance {
        pending: round2(balance.pending + day_equivalent),
        ..balance.clone()
    })
}

/// Move a reservation into `used` (approval).
pub fn commit(balance: &LeaveBalance, day_equivalent: f64) -> AppResult<LeaveBalance> {
    check_amount(day_equivalent)?;
    check_pending(balance, day_equivalent)?;
    Ok(LeaveBalance {
        pending: round2(balance.pending - day_equivalent).max(0.0),
        used: round2(balance.used + day_equivalent),
        ..balance.clone()
    })
}

/// Drop a reservation without touching `used` (rejection).
pub fn release(balance: &LeaveBalance, day_equivalent: f64) -> AppResult<LeaveBalance> {
    check_amount(day_equivalent)?;
    check_pending(balance, day_equivalent)?;
    Ok(LeaveBalance {
        pending: round2(balance.pending - day_equivalent).max(0.0),
        ..balance.clone()
    })
}

/// Credit `months` of accrual to the entitlement.
pub fn accrue(balance: &LeaveBalance, leave_type: &LeaveType, months: u32) -> LeaveBalance {
    LeaveBalance {
        total: round2(balance.total + leave_type.accrual_rate * f64::from(months)),
        ..balance.clone()
    }
}

/// Year-end rollover: the new entitlement is `allowance` plus the unused
/// days, capped at the type's carry-over limit. Pending holds survive and
/// keep drawing on the new total.
pub fn carry_over(balance: &LeaveBalance, leave_type: &LeaveType, allowance: f64) -> LeaveBalance {
    let carried = (balance.total - balance.used)
        .max(0.0)
        .min(leave_type.carry_over_limit.max(0.0));

    LeaveBalance {
        total: round2(allowance + carried),
        used: 0.0,
        ..balance.clone()
    }
}
