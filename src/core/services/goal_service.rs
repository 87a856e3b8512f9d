use uuid::Uuid;

use crate::core::validation::validate_goal;
use crate::domain::SavingsGoal;
use crate::ledger::Ledger;

use super::{ServiceError, ServiceResult};

pub struct GoalService;

impl GoalService {
    /// Adds a goal. Names must be unique because transactions match goals by
    /// name; the linked account is informational and not checked.
    pub fn add(ledger: &mut Ledger, goal: SavingsGoal) -> ServiceResult<Uuid> {
        validate_goal(&goal)?;
        let candidate = goal.name.trim();
        let duplicate = ledger
            .goals
            .iter()
            .any(|existing| existing.name.trim().eq_ignore_ascii_case(candidate));
        if duplicate {
            return Err(ServiceError::Invalid(format!(
                "Savings goal `{}` already exists",
                goal.name
            )));
        }
        tracing::info!(goal = %goal.name, "Savings goal added");
        Ok(ledger.add_goal(goal))
    }

    pub fn remove(ledger: &mut Ledger, name: &str) -> ServiceResult<SavingsGoal> {
        let removed = ledger.remove_goal(name)?;
        tracing::info!(goal = %name, "Savings goal removed");
        Ok(removed)
    }

    pub fn find<'a>(ledger: &'a Ledger, name: &str) -> ServiceResult<&'a SavingsGoal> {
        ledger
            .goal(name)
            .ok_or_else(|| ServiceError::Invalid(format!("Savings goal `{name}` not found")))
    }

    pub fn list(ledger: &Ledger) -> Vec<&SavingsGoal> {
        ledger.goals.iter().collect()
    }

    pub fn for_account<'a>(ledger: &'a Ledger, account_number: &str) -> Vec<&'a SavingsGoal> {
        ledger
            .goals
            .iter()
            .filter(|goal| goal.account_number == account_number)
            .collect()
    }
}
