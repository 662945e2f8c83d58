use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "holdings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub item_name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::invoice_rows::Entity")]
    InvoiceRows,
}

impl Related<super::invoice_rows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceRows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
