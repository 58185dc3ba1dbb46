//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Accounts able to sign in. Never physically deleted.
    users (id) {
        id -> Uuid,
        /// Lower-cased, unique.
        email -> Varchar,
        name -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// `ADMIN` or `USER`.
        role -> Varchar,
        is_blocked -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    listings (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Text,
        location -> Varchar,
        /// Nightly price in cents.
        price_per_night_cents -> Int8,
        max_guests -> Int4,
        bedrooms -> Int4,
        bathrooms -> Int4,
        image_url -> Nullable<Text>,
        /// `ACTIVE`, `INACTIVE` or `ARCHIVED`.
        status -> Varchar,
        host_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    bookings (id) {
        id -> Uuid,
        check_in -> Timestamptz,
        check_out -> Timestamptz,
        /// Total in cents.
        total_price_cents -> Int8,
        guests -> Int4,
        /// `PENDING`, `CONFIRMED`, `CANCELLED` or `COMPLETED`.
        status -> Varchar,
        user_id -> Uuid,
        listing_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(listings -> users (host_id));
diesel::joinable!(bookings -> listings (listing_id));
diesel::joinable!(bookings -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, listings, bookings);
