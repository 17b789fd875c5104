use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use service::address_book::domain::default_flag;
use service::address_book::{AddressBookUpsert, AddressEntry};
use service::pagination::{PageResult, Pagination};

use crate::errors::ApiError;
use crate::identity::AuthUser;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct DefaultStatusQuery {
    pub id: Uuid,
    #[serde(with = "default_flag")]
    pub flag: bool,
}

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    pub city: String,
}

#[utoipa::path(
    post, path = "/address-books", tag = "address-book",
    request_body = crate::openapi::AddressBookUpsertDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::AddressEntryDoc),
        (status = 400, description = "Validation Error"),
        (status = 401, description = "Missing identity"),
        (status = 502, description = "Geocoder Failed")
    )
)]
pub async fn add(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<AddressBookUpsert>,
) -> Result<Json<AddressEntry>, ApiError> {
    let created = state.address_book.add(&user, input).await?;
    Ok(Json(created))
}

#[utoipa::path(
    get, path = "/address-books/page", tag = "address-book",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("per_page" = Option<u32>, Query, description = "Page size, 1..=100")
    ),
    responses(
        (status = 200, description = "OK"),
        (status = 401, description = "Missing identity")
    )
)]
pub async fn page(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(opts): Query<Pagination>,
) -> Result<Json<PageResult<AddressEntry>>, ApiError> {
    let page = state.address_book.page(&user, opts).await?;
    Ok(Json(page))
}

#[utoipa::path(
    put, path = "/address-books/{id}", tag = "address-book",
    params(("id" = Uuid, Path, description = "Address ID")),
    request_body = crate::openapi::AddressBookUpsertDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::AddressEntryDoc),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 502, description = "Geocoder Failed")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<AddressBookUpsert>,
) -> Result<Json<AddressEntry>, ApiError> {
    let updated = state.address_book.update(&user, id, input).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    put, path = "/address-books/default", tag = "address-book",
    params(
        ("id" = Uuid, Query, description = "Address ID"),
        ("flag" = u8, Query, description = "1 to make default, 0 to clear")
    ),
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Bad flag"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_default_status(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(q): Query<DefaultStatusQuery>,
) -> Result<StatusCode, ApiError> {
    state.address_book.update_default_status(user.user_id, q.id, q.flag).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/address-books/default", tag = "address-book",
    responses(
        (status = 200, description = "Default address, or null when none is set"),
        (status = 401, description = "Missing identity")
    )
)]
pub async fn default_address(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Option<AddressEntry>>, ApiError> {
    let found = state.address_book.default_address(&user).await?;
    Ok(Json(found))
}

/// Internal lookup used by other services; the user comes from the path.
#[utoipa::path(
    get, path = "/inner/address-books/users/{user_id}", tag = "address-book",
    params(
        ("user_id" = Uuid, Path, description = "Owner"),
        ("city" = String, Query, description = "City code")
    ),
    responses((status = 200, description = "OK"))
)]
pub async fn get_by_user_and_city(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(q): Query<CityQuery>,
) -> Result<Json<Vec<AddressEntry>>, ApiError> {
    let list = state.address_book.get_by_user_and_city(user_id, &q.city).await?;
    Ok(Json(list))
}
