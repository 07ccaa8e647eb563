//! Route configuration - the driver's current start and end points

use serde::{Deserialize, Serialize};

use crate::entities::Address;

/// Start and end addresses of the route, each unset until configured
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfiguration {
    /// Where the driver leaves from
    #[serde(default, rename = "startPoint")]
    pub start: Option<Address>,
    /// Where the route finishes
    #[serde(default, rename = "endPoint")]
    pub end: Option<Address>,
}

impl RouteConfiguration {
    /// Both endpoints are set and carry street, number and city
    pub fn can_compute(&self) -> bool {
        matches!(
            (&self.start, &self.end),
            (Some(start), Some(end)) if start.is_complete() && end.is_complete()
        )
    }
}
