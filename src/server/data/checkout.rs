use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

use crate::{
    model::{
        api::Paginated,
        checkout::{CheckoutReportFilter, ConditionStepDto, ItemCheckInput},
    },
    server::util::pagination::{fetch_page, ListQuery},
};

use entity::checkout_report::Column;

pub const CHECKOUT_REPORT_SORTABLE: &[(&str, Column)] = &[
    ("completed_at", Column::CompletedAt),
    ("cleanliness_rating", Column::CleanlinessRating),
    ("damage_charge", Column::DamageCharge),
    ("created_at", Column::CreatedAt),
];

pub struct CheckoutRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CheckoutRepository<'a, C> {
    /// Creates a new instance of [`CheckoutRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create_report(
        &self,
        booking_id: i32,
        inspector_id: i32,
        condition: &ConditionStepDto,
        completed_at: NaiveDateTime,
    ) -> Result<entity::checkout_report::Model, DbErr> {
        let report = entity::checkout_report::ActiveModel {
            booking_id: ActiveValue::Set(booking_id),
            inspector_id: ActiveValue::Set(inspector_id),
            cleanliness_rating: ActiveValue::Set(condition.cleanliness_rating),
            damages_found: ActiveValue::Set(condition.damages_found),
            damage_description: ActiveValue::Set(condition.damage_description.clone()),
            damage_charge: ActiveValue::Set(condition.damage_charge),
            notes: ActiveValue::Set(condition.notes.clone()),
            completed_at: ActiveValue::Set(completed_at),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        report.insert(self.db).await
    }

    pub async fn create_check(
        &self,
        report_id: i32,
        expected_quantity: i32,
        check: &ItemCheckInput,
    ) -> Result<entity::checkout_item_check::Model, DbErr> {
        let check = entity::checkout_item_check::ActiveModel {
            report_id: ActiveValue::Set(report_id),
            assignment_id: ActiveValue::Set(check.assignment_id),
            expected_quantity: ActiveValue::Set(expected_quantity),
            found_quantity: ActiveValue::Set(check.found_quantity),
            condition: ActiveValue::Set(check.condition.as_str().to_string()),
            notes: ActiveValue::Set(check.notes.clone()),
            ..Default::default()
        };

        check.insert(self.db).await
    }

    pub async fn get(&self, report_id: i32) -> Result<Option<entity::checkout_report::Model>, DbErr> {
        entity::prelude::CheckoutReport::find_by_id(report_id)
            .one(self.db)
            .await
    }

    pub async fn find_by_booking(
        &self,
        booking_id: i32,
    ) -> Result<Option<entity::checkout_report::Model>, DbErr> {
        entity::prelude::CheckoutReport::find()
            .filter(Column::BookingId.eq(booking_id))
            .one(self.db)
            .await
    }

    /// Lists reports, filtering by the unit and property of the inspected booking
    pub async fn list(
        &self,
        query: &ListQuery<Column>,
        filter: &CheckoutReportFilter,
    ) -> Result<Paginated<entity::checkout_report::Model>, DbErr> {
        let mut select = entity::prelude::CheckoutReport::find();

        if filter.unit_id.is_some() || filter.property_id.is_some() {
            select = select
                .join(
                    JoinType::InnerJoin,
                    entity::checkout_report::Relation::Booking.def(),
                )
                .join(JoinType::InnerJoin, entity::booking::Relation::Unit.def());

            if let Some(unit_id) = filter.unit_id {
                select = select.filter(entity::booking::Column::UnitId.eq(unit_id));
            }
            if let Some(property_id) = filter.property_id {
                select = select.filter(entity::unit::Column::PropertyId.eq(property_id));
            }
        }

        let select = select
            .order_by(query.sort, query.order.clone())
            .order_by_asc(Column::Id);

        fetch_page(self.db, select, query.page, query.per_page).await
    }

    pub async fn checks_for_report(
        &self,
        report_id: i32,
    ) -> Result<Vec<entity::checkout_item_check::Model>, DbErr> {
        entity::prelude::CheckoutItemCheck::find()
            .filter(entity::checkout_item_check::Column::ReportId.eq(report_id))
            .order_by_asc(entity::checkout_item_check::Column::Id)
            .all(self.db)
            .await
    }
}
