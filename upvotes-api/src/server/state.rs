// App state for Axum server
use std::sync::Arc;

use crate::identity::IdentityProvider;
use crate::service::UpvoteService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<UpvoteService>,
    pub identity: Arc<dyn IdentityProvider>,
}
