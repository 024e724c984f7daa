use std::sync::Arc;

use crate::{
    db::PolicyRepository,
    engine::DomainError,
    models::{Policy, UpdatePolicyInput},
    AppError, AppResult,
};

pub struct PolicyService {
    policies: Arc<dyn PolicyRepository>,
}

impl PolicyService {
    pub fn new(policies: Arc<dyn PolicyRepository>) -> Self {
        Self { policies }
    }

    pub async fn active(&self) -> AppResult<Policy> {
        self.policies
            .active()
            .await?
            .ok_or_else(|| DomainError::PolicyNotFound.into())
    }

    /// Saves a new policy version; earlier versions stay in storage.
    pub async fn update(&self, input: UpdatePolicyInput) -> AppResult<Policy> {
        input.validate().map_err(AppError::Validation)?;

        let policy = self.policies.insert(&input).await?;
        tracing::info!(
            policy_id = policy.id,
            rate_basis = policy.rate_basis.as_str(),
            bonus_unit_value = policy.bonus_unit_value,
            deduction_unit_value = policy.deduction_unit_value,
            "Policy updated"
        );
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::{sample_policy_input, MemoryStore};
    use chrono::Weekday;

    fn service() -> PolicyService {
        PolicyService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_no_policy_yet() {
        let err = service().active().await.unwrap_err();
        assert_eq!(err.code(), "POLICY_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_latest_version_wins() {
        let service = service();
        let first = service.update(sample_policy_input()).await.unwrap();

        let mut input = sample_policy_input();
        input.non_working_day_2 = None;
        input.non_working_day_1 = Weekday::Sun;
        let second = service.update(input).await.unwrap();

        let active = service.active().await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(active.id, second.id);
        assert_eq!(active.non_working_day_1, Weekday::Sun);
        assert_eq!(active.non_working_day_2, None);
    }

    #[tokio::test]
    async fn test_invalid_input_is_not_saved() {
        let service = service();
        let mut input = sample_policy_input();
        input.bonus_unit_value = -5.0;

        assert!(matches!(service.update(input).await, Err(AppError::Validation(_))));
        assert!(service.active().await.is_err());
    }
}
