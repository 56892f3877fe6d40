//! archived bid attribute sets, one row per superseded version.

use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;

use tenderhub_types::{Bid, BidAttrs, TenderId};

use super::parse_column;
use crate::Error;

/// bid_history database model. keyed by (id, version).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bid_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub version: i32,
    pub name: String,
    pub description: String,
    pub status: String,
    pub tender_id: Uuid,
    pub author_type: String,
    pub author_id: Uuid,
    pub archived_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bid::Entity",
        from = "Column::Id",
        to = "super::bid::Column::Id"
    )]
    Bid,
}

impl Related<super::bid::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bid.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// rebuild the archived attribute set.
    pub fn attrs(&self) -> Result<BidAttrs, Error> {
        Ok(BidAttrs {
            name: self.name.clone(),
            description: self.description.clone(),
            status: parse_column("status", &self.status)?,
            tender_id: TenderId(self.tender_id),
            author: super::bid::author(&self.author_type, self.author_id)?,
        })
    }
}

impl From<&Bid> for ActiveModel {
    /// snapshot a bid at its current version.
    fn from(bid: &Bid) -> Self {
        ActiveModel {
            id: Set(bid.id.0),
            version: Set(bid.version),
            name: Set(bid.attrs.name.clone()),
            description: Set(bid.attrs.description.clone()),
            status: Set(bid.attrs.status.to_string()),
            tender_id: Set(bid.attrs.tender_id.0),
            author_type: Set(bid.attrs.author.author_type().to_string()),
            author_id: Set(bid.attrs.author.id()),
            archived_at: Set(Utc::now()),
        }
    }
}
