pub mod activity;
pub mod auth_token;
pub mod destination;
pub mod recommendation;
pub mod trip;
pub mod trip_subscription;
pub mod user;

pub use activity::Entity as Activity;
pub use auth_token::Entity as AuthToken;
pub use destination::Entity as Destination;
pub use recommendation::Entity as Recommendation;
pub use trip::Entity as Trip;
pub use trip_subscription::Entity as TripSubscription;
pub use user::Entity as User;
