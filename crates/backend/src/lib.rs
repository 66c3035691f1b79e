//! REST gateway to the hosted backend.
//!
//! One [`RestBackend`] implements every domain gateway trait against the
//! PostgREST-style data API and the GoTrue-style auth API of the hosted
//! service. Tables are addressed as `/rest/v1/<table>` with `col=eq.value`
//! query operators; auth endpoints live under `/auth/v1/`.

mod auth;
mod catalog;
mod orders;
mod rest;
mod rows;
mod wishlist;

pub use rest::RestBackend;
