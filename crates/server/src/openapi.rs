use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// `is_default` is 0 or 1; `location` is `"longitude,latitude"`.
#[derive(ToSchema)]
pub struct AddressBookUpsertDoc {
    pub name: String,
    pub phone: String,
    pub province: String,
    pub city: String,
    pub county: String,
    pub address: String,
    pub tag: Option<String>,
    pub location: Option<String>,
    pub is_default: u8,
}

#[derive(ToSchema)]
pub struct AddressEntryDoc {
    pub id: Uuid,
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
    pub is_default: u8,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::address_book::add,
        crate::routes::address_book::page,
        crate::routes::address_book::update,
        crate::routes::address_book::update_default_status,
        crate::routes::address_book::default_address,
        crate::routes::address_book::get_by_user_and_city,
    ),
    components(
        schemas(
            HealthResponse,
            AddressBookUpsertDoc,
            AddressEntryDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "address-book")
    )
)]
pub struct ApiDoc;
