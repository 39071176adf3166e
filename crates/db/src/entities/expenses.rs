//! `SeaORM` Entity for expenses table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AmountsStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub workspace_id: i64,
    pub category_id: Option<i64>,
    pub title: String,
    pub date_paid: Date,
    pub time_recorded: DateTimeWithTimeZone,
    pub currency: String,
    pub original_amount: i64,
    pub converted_original_amount: Option<i64>,
    pub converted_adjusted_amount: Option<i64>,
    pub income_taxable_original_amount: Option<i64>,
    pub income_taxable_adjusted_amount: Option<i64>,
    pub use_different_exchange_rate_for_income_tax_purposes: bool,
    pub percent_on_business: i32,
    pub general_tax_id: Option<i64>,
    pub general_tax_rate_in_bps: Option<i32>,
    pub general_tax_amount: Option<i64>,
    pub status: AmountsStatus,
    pub attachments: Vec<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub version: i64,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workspaces::Entity",
        from = "Column::WorkspaceId",
        to = "super::workspaces::Column::Id",
        on_delete = "Cascade"
    )]
    Workspaces,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
    #[sea_orm(
        belongs_to = "super::general_taxes::Entity",
        from = "Column::GeneralTaxId",
        to = "super::general_taxes::Column::Id"
    )]
    GeneralTaxes,
}

impl Related<super::workspaces::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workspaces.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::general_taxes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneralTaxes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
