//! bid entity for database storage.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use tenderhub_types::{Bid, BidAttrs, BidAuthor, BidId, DecisionCounters, TenderId};

use super::parse_column;
use crate::Error;

/// bid database model. holds the live version of each bid together with
/// its decision counters.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bid")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
    pub status: String,
    pub tender_id: Uuid,
    pub author_type: String,
    pub author_id: Uuid,
    pub version: i32,
    pub created_at: DateTimeUtc,
    /// counters are outside the versioned attribute set.
    pub approvals: i32,
    pub rejections: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tender::Entity",
        from = "Column::TenderId",
        to = "super::tender::Column::Id"
    )]
    Tender,
    #[sea_orm(has_many = "super::bid_history::Entity")]
    History,
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::tender::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tender.def()
    }
}

impl Related<super::bid_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::History.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// current decision counters.
    pub fn counters(&self) -> DecisionCounters {
        DecisionCounters {
            approvals: self.approvals.max(0) as u32,
            rejections: self.rejections.max(0) as u32,
        }
    }
}

/// rebuild a bid author from its stored type and id columns.
pub(crate) fn author(author_type: &str, author_id: Uuid) -> Result<BidAuthor, Error> {
    Ok(BidAuthor::from_parts(
        parse_column("author_type", author_type)?,
        author_id,
    ))
}

impl TryFrom<Model> for Bid {
    type Error = Error;

    fn try_from(model: Model) -> Result<Self, Error> {
        Ok(Bid {
            id: BidId(model.id),
            attrs: BidAttrs {
                status: parse_column("status", &model.status)?,
                author: author(&model.author_type, model.author_id)?,
                name: model.name,
                description: model.description,
                tender_id: TenderId(model.tender_id),
            },
            version: model.version,
            created_at: model.created_at,
        })
    }
}

impl From<&Bid> for ActiveModel {
    /// a fresh bid row with zeroed counters.
    fn from(bid: &Bid) -> Self {
        ActiveModel {
            id: Set(bid.id.0),
            name: Set(bid.attrs.name.clone()),
            description: Set(bid.attrs.description.clone()),
            status: Set(bid.attrs.status.to_string()),
            tender_id: Set(bid.attrs.tender_id.0),
            author_type: Set(bid.attrs.author.author_type().to_string()),
            author_id: Set(bid.attrs.author.id()),
            version: Set(bid.version),
            created_at: Set(bid.created_at),
            approvals: Set(0),
            rejections: Set(0),
        }
    }
}
