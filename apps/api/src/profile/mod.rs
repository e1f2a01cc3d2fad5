// User profiles: onboarding, storage and the /api/user routes.

pub mod handlers;
pub mod onboarding;
pub mod store;
