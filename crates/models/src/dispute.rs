use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{job, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "disputes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub job_id: i32,
    pub reporter_id: i32,
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub resolution: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub resolved_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Job, Reporter }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Job => Entity::belongs_to(job::Entity).from(Column::JobId).to(job::Column::Id).into(),
            Relation::Reporter => Entity::belongs_to(user::Entity).from(Column::ReporterId).to(user::Column::Id).into(),
        }
    }
}

impl Related<job::Entity> for Entity {
    fn to() -> RelationDef { Relation::Job.def() }
}

impl ActiveModelBehavior for ActiveModel {}
