//! organization entity for database storage.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use tenderhub_types::{Organization, OrganizationId};

use super::parse_column;
use crate::Error;

/// organization database model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "organization")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// legal form: IE, LLC or JSC.
    pub org_type: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::organization_responsible::Entity")]
    Responsibles,
}

impl Related<super::organization_responsible::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Responsibles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Organization {
    type Error = Error;

    fn try_from(model: Model) -> Result<Self, Error> {
        Ok(Organization {
            id: OrganizationId(model.id),
            name: model.name,
            description: model.description,
            org_type: parse_column("org_type", &model.org_type)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Organization> for ActiveModel {
    fn from(org: &Organization) -> Self {
        ActiveModel {
            id: Set(org.id.0),
            name: Set(org.name.clone()),
            description: Set(org.description.clone()),
            org_type: Set(org.org_type.to_string()),
            created_at: Set(org.created_at),
            updated_at: Set(org.updated_at),
        }
    }
}
