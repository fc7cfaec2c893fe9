use diesel::prelude::*;

use crate::{
    domain::owner::OwnerRef,
    domain::pricing::{
        NewPriceableItem as DomainNewPriceableItem, NewPricingPeriod as DomainNewPricingPeriod,
        PriceableItem as DomainPriceableItem, PricingPeriod as DomainPricingPeriod,
    },
    models::pricing::{
        NewPriceableItem as DbNewPriceableItem, NewPricingPeriod as DbNewPricingPeriod,
        PriceableItem as DbPriceableItem, PricingPeriod as DbPricingPeriod,
    },
    repository::{
        DieselRepository, PricingReader, PricingWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl PricingReader for DieselRepository {
    fn get_active_priceable_item(
        &self,
        owner: OwnerRef,
    ) -> RepositoryResult<Option<DomainPriceableItem>> {
        use crate::schema::priceable_items;

        let mut conn = self.conn()?;
        let item = priceable_items::table
            .filter(priceable_items::owner_type.eq(owner.kind.as_str()))
            .filter(priceable_items::owner_id.eq(owner.id))
            .filter(priceable_items::is_active.eq(true))
            .order(priceable_items::id.desc())
            .first::<DbPriceableItem>(&mut conn)
            .optional()?;

        item.map(TryInto::try_into).transpose()
    }

    fn list_pricing_periods(
        &self,
        priceable_item_id: i32,
    ) -> RepositoryResult<Vec<DomainPricingPeriod>> {
        use crate::schema::pricing_periods;

        let mut conn = self.conn()?;
        let periods = pricing_periods::table
            .filter(pricing_periods::priceable_item_id.eq(priceable_item_id))
            .filter(pricing_periods::is_active.eq(true))
            .order(pricing_periods::id.asc())
            .load::<DbPricingPeriod>(&mut conn)?;

        periods.into_iter().map(TryInto::try_into).collect()
    }
}

impl PricingWriter for DieselRepository {
    fn set_base_price(
        &self,
        new_item: &DomainNewPriceableItem,
    ) -> RepositoryResult<DomainPriceableItem> {
        use crate::schema::priceable_items;

        let mut conn = self.conn()?;

        conn.transaction::<DomainPriceableItem, RepositoryError, _>(|conn| {
            let owner = new_item.owner;
            diesel::update(
                priceable_items::table
                    .filter(priceable_items::owner_type.eq(owner.kind.as_str()))
                    .filter(priceable_items::owner_id.eq(owner.id))
                    .filter(priceable_items::is_active.eq(true)),
            )
            .set((
                priceable_items::is_active.eq(false),
                priceable_items::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(conn)?;

            let db_new = DbNewPriceableItem::from(new_item);
            let created = diesel::insert_into(priceable_items::table)
                .values(&db_new)
                .get_result::<DbPriceableItem>(conn)?;

            created.try_into()
        })
    }

    fn create_pricing_period(
        &self,
        new_period: &DomainNewPricingPeriod,
    ) -> RepositoryResult<DomainPricingPeriod> {
        use crate::schema::pricing_periods;

        let mut conn = self.conn()?;
        let db_new = DbNewPricingPeriod::from(new_period);

        let created = diesel::insert_into(pricing_periods::table)
            .values(&db_new)
            .get_result::<DbPricingPeriod>(&mut conn)?;

        created.try_into()
    }
}
