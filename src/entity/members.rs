use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub orchestra_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub approved: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orchestras::Entity",
        from = "Column::OrchestraId",
        to = "super::orchestras::Column::Id"
    )]
    Orchestras,
}

impl Related<super::orchestras::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orchestras.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
