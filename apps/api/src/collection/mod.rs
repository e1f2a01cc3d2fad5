// Saved outfits: the user's collection and the /api/outfits routes.

pub mod handlers;
pub mod store;
