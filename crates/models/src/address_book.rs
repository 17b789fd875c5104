use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, DbErr, NotSet, PaginatorTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "address_book")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    pub province: String,
    pub city: String,
    pub county: String,
    pub address: String,
    pub tag: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub lon: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub lat: Option<f64>,
    pub is_default: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Column values for a new row; `id` and timestamps are assigned on insert.
#[derive(Clone, Debug, Default)]
pub struct NewAddressBook {
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    pub province: String,
    pub city: String,
    pub county: String,
    pub address: String,
    pub tag: Option<String>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    pub is_default: bool,
}

/// Partial update: only `Some` fields are written.
#[derive(Clone, Debug, Default)]
pub struct AddressBookChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub address: Option<String>,
    pub tag: Option<String>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    pub is_default: Option<bool>,
}

pub fn validate_required(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} required")));
    }
    Ok(())
}

fn set_opt<T>(v: Option<T>) -> sea_orm::ActiveValue<T>
where
    T: Into<sea_orm::Value>,
{
    match v {
        Some(v) => Set(v),
        None => NotSet,
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewAddressBook) -> Result<Model, ModelError> {
    validate_required("name", &new.name)?;
    validate_required("phone", &new.phone)?;
    validate_required("province", &new.province)?;
    validate_required("city", &new.city)?;
    validate_required("county", &new.county)?;
    validate_required("address", &new.address)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(new.user_id),
        name: Set(new.name),
        phone: Set(new.phone),
        province: Set(new.province),
        city: Set(new.city),
        county: Set(new.county),
        address: Set(new.address),
        tag: Set(new.tag),
        lon: Set(new.lon),
        lat: Set(new.lat),
        is_default: Set(new.is_default),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

/// Write the `Some` fields of `changes` to row `id`. `Ok(None)` when the row does not exist.
pub async fn update_by_id<C: ConnectionTrait>(db: &C, id: Uuid, changes: AddressBookChanges) -> Result<Option<Model>, ModelError> {
    let am = ActiveModel {
        id: sea_orm::ActiveValue::Unchanged(id),
        user_id: NotSet,
        name: set_opt(changes.name),
        phone: set_opt(changes.phone),
        province: set_opt(changes.province),
        city: set_opt(changes.city),
        county: set_opt(changes.county),
        address: set_opt(changes.address),
        tag: match changes.tag {
            Some(tag) => Set(Some(tag)),
            None => NotSet,
        },
        lon: match changes.lon {
            Some(lon) => Set(Some(lon)),
            None => NotSet,
        },
        lat: match changes.lat {
            Some(lat) => Set(Some(lat)),
            None => NotSet,
        },
        is_default: set_opt(changes.is_default),
        created_at: NotSet,
        updated_at: Set(Utc::now().into()),
    };
    match am.update(db).await {
        Ok(m) => Ok(Some(m)),
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Clear the default flag on every row of `user_id`. Returns the number of rows changed.
pub async fn clear_default<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<u64, ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::update_many()
        .col_expr(Column::IsDefault, Expr::value(false))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsDefault.eq(true))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn find_by_user_and_city<C: ConnectionTrait>(db: &C, user_id: Uuid, city: &str) -> Result<Vec<Model>, ModelError> {
    let rows = Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::City.eq(city))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn find_default<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<Option<Model>, ModelError> {
    let row = Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsDefault.eq(true))
        .one(db)
        .await?;
    Ok(row)
}

/// One page of `user_id`'s rows, newest first, plus the total row count.
/// `page_idx` is 0-based.
pub async fn page_by_user<C: ConnectionTrait>(db: &C, user_id: Uuid, page_idx: u64, per_page: u64) -> Result<(Vec<Model>, u64), ModelError> {
    let paginator = Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page_idx).await?;
    Ok((items, total))
}
