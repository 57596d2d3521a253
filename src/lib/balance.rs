//! Leave-credit balance table.
//!
//! The leave form certifies credits in a two-column table (vacation, sick) with three rows
//! each: total earned, less this application, balance. The column of the category being applied
//! for shows the request's own figures; any other column passes its stored balance through
//! unchanged (earned = balance, deducted = 0).

/// Which column of the balance table a leave type draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveCategory {
    Vacation,
    Sick,
    Other,
}

impl LeaveCategory {
    pub fn from_leave_type(leave_type: &str) -> Self {
        let normalized = leave_type.trim().to_lowercase();
        if normalized.contains("vacation") {
            LeaveCategory::Vacation
        } else if normalized.contains("sick") {
            LeaveCategory::Sick
        } else {
            LeaveCategory::Other
        }
    }
}

/// Figures for one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnFigures {
    pub earned: f64,
    pub deducted: f64,
    pub after: f64,
}

impl ColumnFigures {
    fn pass_through(balance: f64) -> Self {
        ColumnFigures {
            earned: balance,
            deducted: 0.0,
            after: balance,
        }
    }

    /// The three cells formatted for drawing.
    pub fn formatted(&self) -> [String; 3] {
        [
            format_amount(self.earned),
            format_amount(self.deducted),
            format_amount(self.after),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceFigures {
    pub vacation: ColumnFigures,
    pub sick: ColumnFigures,
}

/// Inputs of the balance computation, already normalized from the record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceInputs {
    pub category: LeaveCategory,
    pub num_days: f64,
    /// Balance before this request for the active category, if the record carries it.
    pub balance_before: Option<f64>,
    /// Balance after this request for the active category, if the record carries it.
    pub balance_after: Option<f64>,
    pub vacation_before: f64,
    pub sick_before: f64,
}

pub fn compute(inputs: &BalanceInputs) -> BalanceFigures {
    let active = |stored: f64| {
        let before = inputs.balance_before.unwrap_or(stored);
        ColumnFigures {
            earned: before,
            deducted: inputs.num_days,
            after: inputs
                .balance_after
                .unwrap_or(before - inputs.num_days),
        }
    };

    match inputs.category {
        LeaveCategory::Vacation => BalanceFigures {
            vacation: active(inputs.vacation_before),
            sick: ColumnFigures::pass_through(inputs.sick_before),
        },
        LeaveCategory::Sick => BalanceFigures {
            vacation: ColumnFigures::pass_through(inputs.vacation_before),
            sick: active(inputs.sick_before),
        },
        LeaveCategory::Other => BalanceFigures {
            vacation: ColumnFigures::pass_through(inputs.vacation_before),
            sick: ColumnFigures::pass_through(inputs.sick_before),
        },
    }
}

/// Two-decimal rendering; negative zero prints as `0.00`.
pub fn format_amount(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.2}", value)
}
