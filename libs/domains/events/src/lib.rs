//! Events Domain
//!
//! Calendar events with recurring-series scoping.
//!
//! A recurring event shares a series key with every occurrence created from
//! the same definition. Updates and deletes name a [`MutationScope`]:
//!
//! | Scope | Selects |
//! |---|---|
//! | `thisEvent` | the target only |
//! | `thisAndFollowing` | same series, `startTime >= target.startTime` |
//! | `allEvents` | the whole series |
//!
//! Only the creator may mutate. Creators and participants may read.
//!
//! ```ignore
//! let repository = MongoEventRepository::new(&db);
//! repository.create_indexes().await?;
//! let events = domain_events::router(EventService::new(repository))
//!     .layer(middleware::from_fn_with_state(jwt, jwt_auth_middleware));
//! ```

pub mod authz;
mod error;
mod handlers;
mod models;
mod mongodb;
mod repository;
pub mod scope;
mod series;
mod service;

pub use error::{EventError, Result};
pub use handlers::{ApiDoc, router};
pub use models::{
    Caller, CreateEvent, DeleteEventRequest, Event, EventCreatedResponse, EventListResponse,
    EventPatch, MutationOutcome, NewEvent, Recurrence, RecurrenceInput, RecurrenceType,
    UpdateEvent, normalize_participants,
};
pub use self::mongodb::{EVENTS_COLLECTION, MongoEventRepository};
pub use repository::EventRepository;
pub use scope::{Mutation, MutationScope, Selection};
pub use series::SeriesId;
pub use service::EventService;
