use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::entities::school;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct School {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub contact: String,
    pub email_id: String,
    pub image: Option<String>,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
}

/// Text columns of a school row. Callers are expected to have validated these.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, TS)]
pub struct SchoolFields {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub contact: String,
    pub email_id: String,
}

impl School {
    fn from_model(model: school::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            city: model.city,
            state: model.state,
            contact: model.contact,
            email_id: model.email_id,
            image: model.image,
            created_at: model.created_at.into(),
        }
    }

    /// Newest first.
    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = school::Entity::find()
            .order_by_desc(school::Column::Id)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>, DbErr> {
        let record = school::Entity::find_by_id(id).one(db).await?;
        Ok(record.map(Self::from_model))
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &SchoolFields,
        image: Option<&str>,
    ) -> Result<Self, DbErr> {
        let active = school::ActiveModel {
            name: Set(data.name.clone()),
            address: Set(data.address.clone()),
            city: Set(data.city.clone()),
            state: Set(data.state.clone()),
            contact: Set(data.contact.clone()),
            image: Set(image.map(str::to_string)),
            email_id: Set(data.email_id.clone()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    /// Overwrites the text columns. The image column is only touched when
    /// `image` is `Some`. Returns the number of rows matched.
    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: i64,
        data: &SchoolFields,
        image: Option<&str>,
    ) -> Result<u64, DbErr> {
        let mut update = school::Entity::update_many()
            .col_expr(school::Column::Name, Expr::value(data.name.clone()))
            .col_expr(school::Column::Address, Expr::value(data.address.clone()))
            .col_expr(school::Column::City, Expr::value(data.city.clone()))
            .col_expr(school::Column::State, Expr::value(data.state.clone()))
            .col_expr(school::Column::Contact, Expr::value(data.contact.clone()))
            .col_expr(school::Column::EmailId, Expr::value(data.email_id.clone()));
        if let Some(image) = image {
            update = update.col_expr(school::Column::Image, Expr::value(image.to_string()));
        }

        let result = update
            .filter(school::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, DbErr> {
        let result = school::Entity::delete_many()
            .filter(school::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
