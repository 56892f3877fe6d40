//! review entity for database storage.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use tenderhub_types::{BidId, Review, ReviewId};

/// review database model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub bid_id: Uuid,
    pub description: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bid::Entity",
        from = "Column::BidId",
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

impl From<Model> for Review {
    fn from(model: Model) -> Self {
        Review {
            id: ReviewId(model.id),
            bid_id: BidId(model.bid_id),
            description: model.description,
            created_at: model.created_at,
        }
    }
}

impl From<&Review> for ActiveModel {
    fn from(review: &Review) -> Self {
        ActiveModel {
            id: Set(review.id.0),
            bid_id: Set(review.bid_id.0),
            description: Set(review.description.clone()),
            created_at: Set(review.created_at),
        }
    }
}
