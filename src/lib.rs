// JPush - client for the JPush v3 push REST API
//
// This library assembles a push request through typed setters, validates it
// locally and submits it over HTTPS with basic authentication.

// Re-export the push client
pub use jpush_push::*;

// Prelude for common imports
pub mod prelude {
    pub use jpush_push::prelude::*;
}
