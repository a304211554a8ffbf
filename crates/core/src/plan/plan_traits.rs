use async_trait::async_trait;

use super::plan_model::{EntityKind, Plan, PlanRecord};
use crate::errors::Result;

/// Trait for the remote copy of the plan.
///
/// One resource per entity kind. Implementations report non-2xx responses as
/// `Error::Persistence` carrying the response body.
#[async_trait]
pub trait PlanRepositoryTrait: Send + Sync {
    async fn list(&self, kind: EntityKind) -> Result<Vec<PlanRecord>>;
    async fn get(&self, kind: EntityKind, id: &str) -> Result<PlanRecord>;
    /// Creates the record. The returned id may differ from the one sent.
    async fn create(&self, record: &PlanRecord) -> Result<PlanRecord>;
    async fn update(&self, record: &PlanRecord) -> Result<PlanRecord>;
    async fn delete(&self, kind: EntityKind, id: &str) -> Result<()>;

    /// Lists every resource and assembles a plan with derived fields computed.
    async fn load_plan(&self) -> Result<Plan> {
        let mut records = Vec::new();
        for kind in EntityKind::ALL {
            records.extend(self.list(kind).await?);
        }
        Ok(Plan::from_records(records))
    }
}
