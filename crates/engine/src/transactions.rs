//! Row mapping for the `transactions` table.

use api_types::{Transaction, TransactionNew};
use sea_orm::{ActiveValue, entity::prelude::*};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub is_income: bool,
    pub date: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&TransactionNew> for ActiveModel {
    fn from(tx: &TransactionNew) -> Self {
        Self {
            id: ActiveValue::NotSet,
            amount: ActiveValue::Set(tx.amount),
            category: ActiveValue::Set(tx.category.clone()),
            description: ActiveValue::Set(tx.description.clone()),
            is_income: ActiveValue::Set(tx.is_income),
            date: ActiveValue::Set(tx.date.clone()),
        }
    }
}

impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        TransactionNew {
            amount: model.amount,
            category: model.category,
            description: model.description,
            is_income: model.is_income,
            date: model.date,
        }
        .into_stored(model.id)
    }
}
