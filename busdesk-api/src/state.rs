use std::sync::Arc;
use busdesk_core::ViewState;
use busdesk_store::BookingFeed;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub view: Arc<RwLock<ViewState>>,
    pub feed: Arc<dyn BookingFeed>,
}

impl AppState {
    pub fn new(view: ViewState, feed: Arc<dyn BookingFeed>) -> Self {
        Self {
            view: Arc::new(RwLock::new(view)),
            feed,
        }
    }
}
