//! archived tender attribute sets, one row per superseded version.

use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;

use tenderhub_types::{OrganizationId, Tender, TenderAttrs};

use super::parse_column;
use crate::Error;

/// tender_history database model. keyed by (id, version).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tender_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub version: i32,
    pub name: String,
    pub description: String,
    pub service_type: String,
    pub status: String,
    pub organization_id: Uuid,
    pub archived_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tender::Entity",
        from = "Column::Id",
        to = "super::tender::Column::Id"
    )]
    Tender,
}

impl Related<super::tender::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tender.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// rebuild the archived attribute set.
    pub fn attrs(&self) -> Result<TenderAttrs, Error> {
        Ok(TenderAttrs {
            name: self.name.clone(),
            description: self.description.clone(),
            service_type: parse_column("service_type", &self.service_type)?,
            status: parse_column("status", &self.status)?,
            organization_id: OrganizationId(self.organization_id),
        })
    }
}

impl From<&Tender> for ActiveModel {
    /// snapshot a tender at its current version.
    fn from(tender: &Tender) -> Self {
        ActiveModel {
            id: Set(tender.id.0),
            version: Set(tender.version),
            name: Set(tender.attrs.name.clone()),
            description: Set(tender.attrs.description.clone()),
            service_type: Set(tender.attrs.service_type.to_string()),
            status: Set(tender.attrs.status.to_string()),
            organization_id: Set(tender.attrs.organization_id.0),
            archived_at: Set(Utc::now()),
        }
    }
}
