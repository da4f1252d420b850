use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub requester_id: i32,
    pub runner_id: Option<i32>,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub category: String,
    #[sea_orm(column_type = "Text")]
    pub pickup_address: String,
    #[sea_orm(column_type = "Text")]
    pub dropoff_address: String,
    #[sea_orm(column_type = "Decimal(Some((10, 8)))", nullable)]
    pub pickup_lat: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((11, 8)))", nullable)]
    pub pickup_lng: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 8)))", nullable)]
    pub dropoff_lat: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((11, 8)))", nullable)]
    pub dropoff_lng: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub completed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Requester, Runner }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Requester => Entity::belongs_to(user::Entity).from(Column::RequesterId).to(user::Column::Id).into(),
            Relation::Runner => Entity::belongs_to(user::Entity).from(Column::RunnerId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
