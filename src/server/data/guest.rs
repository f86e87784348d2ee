use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::{
    model::{
        api::Paginated,
        guest::{CreateGuestDto, GuestFilter, UpdateGuestDto},
    },
    server::util::{
        pagination::{fetch_page, ListQuery},
        validate::optional_text,
    },
};

use entity::guest::Column;

pub const GUEST_SORTABLE: &[(&str, Column)] = &[
    ("name", Column::LastName),
    ("first_name", Column::FirstName),
    ("last_name", Column::LastName),
    ("email", Column::Email),
    ("created_at", Column::CreatedAt),
];

pub struct GuestRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> GuestRepository<'a, C> {
    /// Creates a new instance of [`GuestRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a guest, the email is stored as given
    pub async fn create(&self, guest: &CreateGuestDto) -> Result<entity::guest::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let guest = entity::guest::ActiveModel {
            first_name: ActiveValue::Set(guest.first_name.clone()),
            last_name: ActiveValue::Set(guest.last_name.clone()),
            email: ActiveValue::Set(guest.email.clone()),
            phone: ActiveValue::Set(guest.phone.clone()),
            nationality: ActiveValue::Set(guest.nationality.clone()),
            document_number: ActiveValue::Set(guest.document_number.clone()),
            notes: ActiveValue::Set(guest.notes.clone()),
            deleted_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        guest.insert(self.db).await
    }

    /// Gets a guest that has not been deleted
    pub async fn get(&self, guest_id: i32) -> Result<Option<entity::guest::Model>, DbErr> {
        entity::prelude::Guest::find_by_id(guest_id)
            .filter(Column::DeletedAt.is_null())
            .one(self.db)
            .await
    }

    /// Gets a guest including deleted ones, for history views
    pub async fn find_by_id(&self, guest_id: i32) -> Result<Option<entity::guest::Model>, DbErr> {
        entity::prelude::Guest::find_by_id(guest_id).one(self.db).await
    }

    /// Finds a guest that has not been deleted by email, optionally ignoring one guest ID
    pub async fn find_by_email(
        &self,
        email: &str,
        exclude_id: Option<i32>,
    ) -> Result<Option<entity::guest::Model>, DbErr> {
        let mut select = entity::prelude::Guest::find()
            .filter(Column::Email.eq(email))
            .filter(Column::DeletedAt.is_null());

        if let Some(exclude_id) = exclude_id {
            select = select.filter(Column::Id.ne(exclude_id));
        }

        select.one(self.db).await
    }

    /// Lists guests that have not been deleted, searching names, email and phone
    pub async fn list(
        &self,
        query: &ListQuery<Column>,
        filter: &GuestFilter,
    ) -> Result<Paginated<entity::guest::Model>, DbErr> {
        let mut select = entity::prelude::Guest::find().filter(Column::DeletedAt.is_null());

        if let Some(nationality) = filter
            .nationality
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            select = select.filter(Column::Nationality.eq(nationality));
        }

        if let Some(term) = &query.search {
            select = select.filter(
                Condition::any()
                    .add(Column::FirstName.contains(term))
                    .add(Column::LastName.contains(term))
                    .add(Column::Email.contains(term))
                    .add(Column::Phone.contains(term)),
            );
        }

        let select = select
            .order_by(query.sort, query.order.clone())
            .order_by_asc(Column::Id);

        fetch_page(self.db, select, query.page, query.per_page).await
    }

    pub async fn update(
        &self,
        guest: entity::guest::Model,
        update: &UpdateGuestDto,
    ) -> Result<entity::guest::Model, DbErr> {
        let mut guest_am = guest.into_active_model();

        if let Some(first_name) = &update.first_name {
            guest_am.first_name = ActiveValue::Set(first_name.clone());
        }
        if let Some(last_name) = &update.last_name {
            guest_am.last_name = ActiveValue::Set(last_name.clone());
        }
        if let Some(email) = &update.email {
            guest_am.email = ActiveValue::Set(email.clone());
        }
        // Blank optional fields clear the stored value
        if let Some(phone) = &update.phone {
            guest_am.phone = ActiveValue::Set(optional_text(Some(phone.clone())));
        }
        if let Some(nationality) = &update.nationality {
            guest_am.nationality = ActiveValue::Set(optional_text(Some(nationality.clone())));
        }
        if let Some(document_number) = &update.document_number {
            guest_am.document_number =
                ActiveValue::Set(optional_text(Some(document_number.clone())));
        }
        if let Some(notes) = &update.notes {
            guest_am.notes = ActiveValue::Set(optional_text(Some(notes.clone())));
        }
        guest_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        guest_am.update(self.db).await
    }

    pub async fn soft_delete(
        &self,
        guest: entity::guest::Model,
        now: NaiveDateTime,
    ) -> Result<entity::guest::Model, DbErr> {
        let mut guest_am = guest.into_active_model();
        guest_am.deleted_at = ActiveValue::Set(Some(now));
        guest_am.updated_at = ActiveValue::Set(now);

        guest_am.update(self.db).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use roost_test_utils::prelude::*;

    use crate::server::data::guest::GuestRepository;

    /// Expect deleted guests to free their email and the excluded guest to be ignored
    #[tokio::test]
    async fn find_by_email_skips_deleted_and_excluded() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let guest = test.rental().insert_guest("ada@example.com").await?;

        let repo = GuestRepository::new(&test.db);
        assert!(repo.find_by_email("ada@example.com", None).await?.is_some());
        assert!(repo
            .find_by_email("ada@example.com", Some(guest.id))
            .await?
            .is_none());

        repo.soft_delete(guest, Utc::now().naive_utc()).await?;

        assert!(repo.find_by_email("ada@example.com", None).await?.is_none());

        Ok(())
    }
}
