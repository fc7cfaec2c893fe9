use diesel::prelude::*;

use crate::{
    domain::fee::{Fee as DomainFee, NewFee as DomainNewFee},
    domain::owner::OwnerRef,
    models::fee::{Fee as DbFee, NewFee as DbNewFee},
    repository::{DieselRepository, FeeReader, FeeWriter, errors::RepositoryResult},
};

impl FeeReader for DieselRepository {
    fn list_fees(&self, owner: OwnerRef) -> RepositoryResult<Vec<DomainFee>> {
        use crate::schema::fees;

        let mut conn = self.conn()?;
        let rows = fees::table
            .filter(fees::owner_type.eq(owner.kind.as_str()))
            .filter(fees::owner_id.eq(owner.id))
            .filter(fees::is_active.eq(true))
            .order(fees::id.asc())
            .load::<DbFee>(&mut conn)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

impl FeeWriter for DieselRepository {
    fn create_fee(&self, new_fee: &DomainNewFee) -> RepositoryResult<DomainFee> {
        use crate::schema::fees;

        let mut conn = self.conn()?;
        let db_new = DbNewFee::from(new_fee);

        let created = diesel::insert_into(fees::table)
            .values(&db_new)
            .get_result::<DbFee>(&mut conn)?;

        created.try_into()
    }
}
