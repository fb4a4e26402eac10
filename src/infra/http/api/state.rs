use std::sync::Arc;

use crate::application::auth::TokenAuthenticator;
use crate::application::posts::PostService;
use crate::application::repos::HealthRepo;

#[derive(Clone)]
pub struct ApiState {
    pub posts: Arc<PostService>,
    pub authenticator: Arc<TokenAuthenticator>,
    pub health: Arc<dyn HealthRepo>,
}
