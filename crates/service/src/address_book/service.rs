use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{AddressBookUpsert, AddressEntry, AddressPatch, CurrentUser, NewAddressEntry};
use super::errors::AddressBookError;
use super::location::parse_location;
use super::repository::{AddressBookRepository, AddressBookUnit};
use crate::geocoder::Geocoder;
use crate::pagination::{PageResult, Pagination};

/// Address book business service independent of web framework.
///
/// Owns the rule that a user has at most one default address: every write
/// that sets the flag clears the user's previous default in the same unit
/// of work.
#[derive(Clone)]
pub struct AddressBookService {
    repo: Arc<dyn AddressBookRepository>,
    geocoder: Arc<dyn Geocoder>,
}

impl AddressBookService {
    pub fn new(repo: Arc<dyn AddressBookRepository>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { repo, geocoder }
    }

    /// Addresses of `user_id` in `city`; empty when there are none.
    #[instrument(skip(self))]
    pub async fn get_by_user_and_city(&self, user_id: Uuid, city: &str) -> Result<Vec<AddressEntry>, AddressBookError> {
        self.repo.list_by_user_and_city(user_id, city).await
    }

    /// Save a new address for `user`.
    ///
    /// A caller-supplied `location` is used as-is; otherwise the full address
    /// is geocoded.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::address_book::{AddressBookService, AddressBookUpsert, CurrentUser};
    /// use service::address_book::repo::memory::MemoryAddressBookRepository;
    /// use service::geocoder::mock::StaticGeocoder;
    /// let svc = AddressBookService::new(
    ///     Arc::new(MemoryAddressBookRepository::new()),
    ///     Arc::new(StaticGeocoder::always("116.4,39.9")),
    /// );
    /// let me = CurrentUser::new(uuid::Uuid::new_v4());
    /// let input = AddressBookUpsert {
    ///     name: "Li Lei".into(), phone: "13800000000".into(), province: "Beijing".into(),
    ///     city: "Beijing".into(), county: "Chaoyang".into(), address: "1 Jianguo Rd".into(),
    ///     is_default: true, ..Default::default()
    /// };
    /// let saved = tokio_test::block_on(svc.add(&me, input)).unwrap();
    /// assert_eq!((saved.lon, saved.lat), (Some(116.4), Some(39.9)));
    /// assert!(saved.is_default);
    /// ```
    #[instrument(skip(self, user, input), fields(user_id = %user.user_id, is_default = input.is_default))]
    pub async fn add(&self, user: &CurrentUser, input: AddressBookUpsert) -> Result<AddressEntry, AddressBookError> {
        input.validate()?;
        let location = match input.supplied_location() {
            Some(loc) => Some(loc.to_string()),
            None => self.geocoder.resolve(&input.full_address()).await?,
        };
        let coords = parse_location(location.as_deref())?;
        let new = NewAddressEntry::from_upsert(user.user_id, input, coords);

        let mut unit = self.repo.begin().await?;
        if new.is_default {
            self.cancel_default(unit.as_mut(), user.user_id).await?;
        }
        let created = unit.insert(new).await?;
        unit.commit().await?;

        info!(address_id = %created.id, is_default = created.is_default, "address_created");
        Ok(created)
    }

    /// One page of `user`'s addresses, newest first.
    #[instrument(skip(self, user), fields(user_id = %user.user_id))]
    pub async fn page(&self, user: &CurrentUser, opts: Pagination) -> Result<PageResult<AddressEntry>, AddressBookError> {
        let (page_idx, per_page) = opts.normalize();
        let (list, total) = self.repo.page_by_user(user.user_id, page_idx, per_page).await?;
        Ok(PageResult::new(list, total, per_page))
    }

    /// Overwrite address `id` of `user`.
    ///
    /// The full address is always re-geocoded; coordinates are left untouched
    /// when the geocoder knows no location. Addresses of other users are
    /// reported as `NotFound`.
    #[instrument(skip(self, user, input), fields(user_id = %user.user_id, address_id = %id))]
    pub async fn update(&self, user: &CurrentUser, id: Uuid, input: AddressBookUpsert) -> Result<AddressEntry, AddressBookError> {
        input.validate()?;
        self.ensure_owned(user.user_id, id).await?;

        let location = self.geocoder.resolve(&input.full_address()).await?;
        let coords = parse_location(location.as_deref())?;
        let patch = AddressPatch::from_upsert(input, coords);

        let mut unit = self.repo.begin().await?;
        if patch.is_default == Some(true) {
            self.cancel_default(unit.as_mut(), user.user_id).await?;
        }
        let updated = unit.update_by_id(id, patch).await?.ok_or(AddressBookError::NotFound)?;
        unit.commit().await?;

        info!(is_default = updated.is_default, "address_updated");
        Ok(updated)
    }

    /// Set or clear the default flag of address `id` owned by `user_id`.
    #[instrument(skip(self))]
    pub async fn update_default_status(&self, user_id: Uuid, id: Uuid, flag: bool) -> Result<(), AddressBookError> {
        self.ensure_owned(user_id, id).await?;

        let mut unit = self.repo.begin().await?;
        if flag {
            self.cancel_default(unit.as_mut(), user_id).await?;
        }
        unit.update_by_id(id, AddressPatch::default_flag(flag))
            .await?
            .ok_or(AddressBookError::NotFound)?;
        unit.commit().await?;

        info!(flag, "default_status_updated");
        Ok(())
    }

    /// `user`'s default address, if one is set.
    #[instrument(skip(self, user), fields(user_id = %user.user_id))]
    pub async fn default_address(&self, user: &CurrentUser) -> Result<Option<AddressEntry>, AddressBookError> {
        self.repo.find_default(user.user_id).await
    }

    async fn ensure_owned(&self, user_id: Uuid, id: Uuid) -> Result<(), AddressBookError> {
        match self.repo.find_by_id(id).await? {
            Some(entry) if entry.user_id == user_id => Ok(()),
            Some(_) => {
                debug!(address_id = %id, "address belongs to another user");
                Err(AddressBookError::NotFound)
            }
            None => Err(AddressBookError::NotFound),
        }
    }

    async fn cancel_default(&self, unit: &mut dyn AddressBookUnit, user_id: Uuid) -> Result<(), AddressBookError> {
        let cleared = unit.clear_default(user_id).await?;
        debug!(%user_id, cleared, "previous default cleared");
        Ok(())
    }
}
