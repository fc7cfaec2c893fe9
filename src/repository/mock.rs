use mockall::mock;

use super::{
    AccommodationReader, AccommodationWriter, AvailabilityReader, AvailabilityWriter,
    BookingReader, BookingWriter, FeeReader, FeeWriter, PricingReader, PricingWriter, TaxReader,
    TaxWriter, UserReader, UserWriter,
};
use crate::domain::{
    accommodation::{Accommodation, NewAccommodation},
    availability::{AvailabilityPeriod, NewAvailabilityPeriod, StayRange},
    booking::{Booking, BookingListQuery, BookingTransition, NewBooking, PaymentStatus},
    fee::{Fee, NewFee},
    owner::OwnerRef,
    pricing::{NewPriceableItem, NewPricingPeriod, PriceableItem, PricingPeriod},
    tax::{NewTax, NewTaxExemption, Tax, TaxExemption},
    user::{NewUser, User},
};
use crate::repository::errors::RepositoryResult;

mock! {
    pub UserReader {}

    impl UserReader for UserReader {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &str, hub_id: i32) -> RepositoryResult<Option<User>>;
    }
}

mock! {
    pub UserWriter {}

    impl UserWriter for UserWriter {
        fn upsert_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    }
}

mock! {
    pub AccommodationReader {}

    impl AccommodationReader for AccommodationReader {
        fn get_accommodation_by_id(&self, id: i32) -> RepositoryResult<Option<Accommodation>>;
    }
}

mock! {
    pub AccommodationWriter {}

    impl AccommodationWriter for AccommodationWriter {
        fn create_accommodation(
            &self,
            new_accommodation: &NewAccommodation,
        ) -> RepositoryResult<Accommodation>;
    }
}

mock! {
    pub PricingReader {}

    impl PricingReader for PricingReader {
        fn get_active_priceable_item(
            &self,
            owner: OwnerRef,
        ) -> RepositoryResult<Option<PriceableItem>>;
        fn list_pricing_periods(
            &self,
            priceable_item_id: i32,
        ) -> RepositoryResult<Vec<PricingPeriod>>;
    }
}

mock! {
    pub PricingWriter {}

    impl PricingWriter for PricingWriter {
        fn set_base_price(&self, new_item: &NewPriceableItem) -> RepositoryResult<PriceableItem>;
        fn create_pricing_period(
            &self,
            new_period: &NewPricingPeriod,
        ) -> RepositoryResult<PricingPeriod>;
    }
}

mock! {
    pub FeeReader {}

    impl FeeReader for FeeReader {
        fn list_fees(&self, owner: OwnerRef) -> RepositoryResult<Vec<Fee>>;
    }
}

mock! {
    pub FeeWriter {}

    impl FeeWriter for FeeWriter {
        fn create_fee(&self, new_fee: &NewFee) -> RepositoryResult<Fee>;
    }
}

mock! {
    pub TaxReader {}

    impl TaxReader for TaxReader {
        fn list_taxes(&self, owner: OwnerRef) -> RepositoryResult<Vec<Tax>>;
        fn list_tax_exemptions(&self, owner: OwnerRef) -> RepositoryResult<Vec<TaxExemption>>;
    }
}

mock! {
    pub TaxWriter {}

    impl TaxWriter for TaxWriter {
        fn create_tax(&self, new_tax: &NewTax) -> RepositoryResult<Tax>;
        fn create_tax_exemption(
            &self,
            new_exemption: &NewTaxExemption,
        ) -> RepositoryResult<TaxExemption>;
    }
}

mock! {
    pub AvailabilityReader {}

    impl AvailabilityReader for AvailabilityReader {
        fn list_availability(
            &self,
            accommodation_id: i32,
            range: StayRange,
        ) -> RepositoryResult<Vec<AvailabilityPeriod>>;
    }
}

mock! {
    pub AvailabilityWriter {}

    impl AvailabilityWriter for AvailabilityWriter {
        fn create_availability_periods(
            &self,
            new_periods: &[NewAvailabilityPeriod],
        ) -> RepositoryResult<usize>;
    }
}

mock! {
    pub BookingReader {}

    impl BookingReader for BookingReader {
        fn get_booking_by_id(&self, id: i32) -> RepositoryResult<Option<Booking>>;
        fn list_bookings(&self, query: BookingListQuery) -> RepositoryResult<(usize, Vec<Booking>)>;
    }
}

mock! {
    pub BookingWriter {}

    impl BookingWriter for BookingWriter {
        fn create_booking(&self, new_booking: &NewBooking) -> RepositoryResult<Booking>;
        fn apply_booking_transition(
            &self,
            booking_id: i32,
            transition: &BookingTransition,
        ) -> RepositoryResult<Booking>;
        fn update_payment_status(
            &self,
            booking_id: i32,
            from: PaymentStatus,
            to: PaymentStatus,
        ) -> RepositoryResult<Booking>;
    }
}
