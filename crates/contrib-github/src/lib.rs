//! GitHub as the contribution data source.
//!
//! Everything goes through an [`Authorizer`], which owns credentials and
//! performs the HTTP calls. [`fetch_profile`] and [`fetch_contributions`] are
//! the two calls of the load sequence.

pub mod authorizer;
pub mod http;
pub mod mock;
pub mod query;

pub use authorizer::{ApiRequest, ApiResponse, Authorizer, Method, PROVIDER, REQUIRED_SCOPE};
pub use http::{HttpAuthorizer, DEFAULT_API_URL};
pub use mock::MockAuthorizer;
pub use query::{date_range, fetch_contributions, fetch_profile, GRAPHQL_QUERY};
