//! Campaign repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::campaigns;
use ledgerly_core::metrics::CampaignFacts;

/// Error types for campaign operations.
#[derive(Debug, thiserror::Error)]
pub enum CampaignError {
    /// Campaign not found.
    #[error("Campaign not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a campaign.
#[derive(Debug, Clone)]
pub struct CreateCampaign {
    /// Campaign name.
    pub name: String,
    /// Advertising platform.
    pub platform: String,
    /// Campaign start.
    pub start: Option<DateTime<Utc>>,
    /// Campaign end.
    pub end: Option<DateTime<Utc>>,
    /// Allocated budget.
    pub budget: Decimal,
    /// Lead count.
    pub leads: i64,
    /// Conversion count.
    pub conversions: i64,
    /// Attributed revenue.
    pub revenue: Decimal,
}

/// Partial update for a campaign; absent fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct UpdateCampaign {
    /// New name, if changing.
    pub name: Option<String>,
    /// New platform, if changing.
    pub platform: Option<String>,
    /// New start, if changing.
    pub start: Option<DateTime<Utc>>,
    /// New end, if changing.
    pub end: Option<DateTime<Utc>>,
    /// New budget, if changing.
    pub budget: Option<Decimal>,
    /// New lead count, if changing.
    pub leads: Option<i64>,
    /// New conversion count, if changing.
    pub conversions: Option<i64>,
    /// New revenue, if changing.
    pub revenue: Option<Decimal>,
}

/// Campaign repository for CRUD and marketing aggregation fetches.
#[derive(Debug, Clone)]
pub struct CampaignRepository {
    db: DatabaseConnection,
}

impl CampaignRepository {
    /// Creates a new campaign repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all campaigns, newest start first.
    pub async fn list(&self) -> Result<Vec<campaigns::Model>, CampaignError> {
        Ok(campaigns::Entity::find()
            .order_by_desc(campaigns::Column::Start)
            .all(&self.db)
            .await?)
    }

    /// Creates a campaign.
    pub async fn create(&self, input: CreateCampaign) -> Result<campaigns::Model, CampaignError> {
        let now = Utc::now();
        let model = campaigns::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            platform: Set(input.platform),
            start: Set(input.start.map(Into::into)),
            end: Set(input.end.map(Into::into)),
            budget: Set(input.budget),
            leads: Set(input.leads),
            conversions: Set(input.conversions),
            revenue: Set(input.revenue),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Merges the update onto an existing campaign.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateCampaign,
    ) -> Result<campaigns::Model, CampaignError> {
        let existing = campaigns::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CampaignError::NotFound(id))?;
        let mut model: campaigns::ActiveModel = existing.into();

        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(platform) = input.platform {
            model.platform = Set(platform);
        }
        if let Some(start) = input.start {
            model.start = Set(Some(start.into()));
        }
        if let Some(end) = input.end {
            model.end = Set(Some(end.into()));
        }
        if let Some(budget) = input.budget {
            model.budget = Set(budget);
        }
        if let Some(leads) = input.leads {
            model.leads = Set(leads);
        }
        if let Some(conversions) = input.conversions {
            model.conversions = Set(conversions);
        }
        if let Some(revenue) = input.revenue {
            model.revenue = Set(revenue);
        }
        model.updated_at = Set(Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Hard-deletes a campaign.
    pub async fn delete(&self, id: Uuid) -> Result<(), CampaignError> {
        let result = campaigns::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(CampaignError::NotFound(id));
        }
        Ok(())
    }

    /// Fetches the marketing facts of every campaign for aggregation.
    pub async fn facts(&self) -> Result<Vec<CampaignFacts>, CampaignError> {
        let rows: Vec<(String, Option<DateTime<Utc>>, Decimal, i64, i64)> =
            campaigns::Entity::find()
                .select_only()
                .column(campaigns::Column::Platform)
                .column(campaigns::Column::Start)
                .column(campaigns::Column::Budget)
                .column(campaigns::Column::Leads)
                .column(campaigns::Column::Conversions)
                .into_tuple()
                .all(&self.db)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(platform, start, budget, leads, conversions)| CampaignFacts {
                platform,
                start,
                budget,
                leads,
                conversions,
            })
            .collect())
    }
}
