use diesel::prelude::*;

use crate::{
    domain::owner::OwnerRef,
    domain::tax::{
        NewTax as DomainNewTax, NewTaxExemption as DomainNewTaxExemption, Tax as DomainTax,
        TaxExemption as DomainTaxExemption,
    },
    models::tax::{
        NewTax as DbNewTax, NewTaxExemption as DbNewTaxExemption, Tax as DbTax,
        TaxExemption as DbTaxExemption,
    },
    repository::{DieselRepository, TaxReader, TaxWriter, errors::RepositoryResult},
};

impl TaxReader for DieselRepository {
    fn list_taxes(&self, owner: OwnerRef) -> RepositoryResult<Vec<DomainTax>> {
        use crate::schema::taxes;

        let mut conn = self.conn()?;
        let rows = taxes::table
            .filter(taxes::owner_type.eq(owner.kind.as_str()))
            .filter(taxes::owner_id.eq(owner.id))
            .filter(taxes::is_active.eq(true))
            .order(taxes::id.asc())
            .load::<DbTax>(&mut conn)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    fn list_tax_exemptions(&self, owner: OwnerRef) -> RepositoryResult<Vec<DomainTaxExemption>> {
        use crate::schema::tax_exemptions;

        let mut conn = self.conn()?;
        let rows = tax_exemptions::table
            .filter(tax_exemptions::owner_type.eq(owner.kind.as_str()))
            .filter(tax_exemptions::owner_id.eq(owner.id))
            .order(tax_exemptions::id.asc())
            .load::<DbTaxExemption>(&mut conn)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

impl TaxWriter for DieselRepository {
    fn create_tax(&self, new_tax: &DomainNewTax) -> RepositoryResult<DomainTax> {
        use crate::schema::taxes;

        let mut conn = self.conn()?;
        let db_new = DbNewTax::from(new_tax);

        let created = diesel::insert_into(taxes::table)
            .values(&db_new)
            .get_result::<DbTax>(&mut conn)?;

        created.try_into()
    }

    fn create_tax_exemption(
        &self,
        new_exemption: &DomainNewTaxExemption,
    ) -> RepositoryResult<DomainTaxExemption> {
        use crate::schema::tax_exemptions;

        let mut conn = self.conn()?;
        let db_new = DbNewTaxExemption::from(new_exemption);

        let created = diesel::insert_into(tax_exemptions::table)
            .values(&db_new)
            .get_result::<DbTaxExemption>(&mut conn)?;

        created.try_into()
    }
}
