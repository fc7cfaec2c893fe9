use diesel::prelude::*;

use crate::{
    domain::accommodation::{
        Accommodation as DomainAccommodation, NewAccommodation as DomainNewAccommodation,
    },
    models::accommodation::{
        Accommodation as DbAccommodation, NewAccommodation as DbNewAccommodation,
    },
    repository::{
        AccommodationReader, AccommodationWriter, DieselRepository, errors::RepositoryResult,
    },
};

impl AccommodationReader for DieselRepository {
    fn get_accommodation_by_id(&self, id: i32) -> RepositoryResult<Option<DomainAccommodation>> {
        use crate::schema::accommodations;

        let mut conn = self.conn()?;
        let accommodation = accommodations::table
            .filter(accommodations::id.eq(id))
            .first::<DbAccommodation>(&mut conn)
            .optional()?;

        accommodation.map(TryInto::try_into).transpose()
    }
}

impl AccommodationWriter for DieselRepository {
    fn create_accommodation(
        &self,
        new_accommodation: &DomainNewAccommodation,
    ) -> RepositoryResult<DomainAccommodation> {
        use crate::schema::accommodations;

        let mut conn = self.conn()?;
        let db_new = DbNewAccommodation::from(new_accommodation);

        let created = diesel::insert_into(accommodations::table)
            .values(&db_new)
            .get_result::<DbAccommodation>(&mut conn)?;

        created.try_into()
    }
}
