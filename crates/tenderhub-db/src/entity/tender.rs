//! tender entity for database storage.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use tenderhub_types::{OrganizationId, Tender, TenderAttrs, TenderId, UserId};

use super::parse_column;
use crate::Error;

/// tender database model. holds the live version of each tender.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tender")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
    pub service_type: String,
    pub status: String,
    pub organization_id: Uuid,
    pub creator_id: Option<Uuid>,
    pub version: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tender_history::Entity")]
    History,
    #[sea_orm(has_many = "super::bid::Entity")]
    Bids,
}

impl Related<super::tender_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::History.def()
    }
}

impl Related<super::bid::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bids.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Tender {
    type Error = Error;

    fn try_from(model: Model) -> Result<Self, Error> {
        Ok(Tender {
            id: TenderId(model.id),
            attrs: TenderAttrs {
                name: model.name,
                description: model.description,
                service_type: parse_column("service_type", &model.service_type)?,
                status: parse_column("status", &model.status)?,
                organization_id: OrganizationId(model.organization_id),
            },
            creator_id: model.creator_id.map(UserId),
            version: model.version,
            created_at: model.created_at,
        })
    }
}

impl From<&Tender> for ActiveModel {
    fn from(tender: &Tender) -> Self {
        ActiveModel {
            id: Set(tender.id.0),
            name: Set(tender.attrs.name.clone()),
            description: Set(tender.attrs.description.clone()),
            service_type: Set(tender.attrs.service_type.to_string()),
            status: Set(tender.attrs.status.to_string()),
            organization_id: Set(tender.attrs.organization_id.0),
            creator_id: Set(tender.creator_id.map(|id| id.0)),
            version: Set(tender.version),
            created_at: Set(tender.created_at),
        }
    }
}
