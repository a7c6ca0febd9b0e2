use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pricing/priority tier referenced by seats within one seat map. Created
/// only through the seat map and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// None means "use the seat-map default price".
    pub base_price: Option<f64>,
    pub has_priority: bool,
}

impl Category {
    pub(crate) fn new(name: String, base_price: Option<f64>, has_priority: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            base_price,
            has_priority,
        }
    }
}
