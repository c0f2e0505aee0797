use futures::future::join_all;
use serde_json::Value;

use super::ServiceResult;
use crate::api::{ApiClient, Query};

/// Read-only dashboard endpoints. Payloads are passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatsEndpoint {
    AdminDashboard,
    AdminUsers,
    AdminSystemHealth,
    AdminActivity,
    AnalyticsOverview,
    AnalyticsTraffic,
    AnalyticsUserGrowth,
    AnalyticsConversions,
    Countries,
    Regions,
    Sectors,
    JobsStats,
    JobsRecent,
    JobsByCategory,
    ApplicationsStats,
    ApplicationsRecent,
    NotificationsStats,
    NotificationsUnread,
    SubscriptionsStats,
    SubscriptionPlans,
}

impl StatsEndpoint {
    pub const ALL: [StatsEndpoint; 20] = [
        StatsEndpoint::AdminDashboard,
        StatsEndpoint::AdminUsers,
        StatsEndpoint::AdminSystemHealth,
        StatsEndpoint::AdminActivity,
        StatsEndpoint::AnalyticsOverview,
        StatsEndpoint::AnalyticsTraffic,
        StatsEndpoint::AnalyticsUserGrowth,
        StatsEndpoint::AnalyticsConversions,
        StatsEndpoint::Countries,
        StatsEndpoint::Regions,
        StatsEndpoint::Sectors,
        StatsEndpoint::JobsStats,
        StatsEndpoint::JobsRecent,
        StatsEndpoint::JobsByCategory,
        StatsEndpoint::ApplicationsStats,
        StatsEndpoint::ApplicationsRecent,
        StatsEndpoint::NotificationsStats,
        StatsEndpoint::NotificationsUnread,
        StatsEndpoint::SubscriptionsStats,
        StatsEndpoint::SubscriptionPlans,
    ];

    /// Shown on the overview screen.
    pub const OVERVIEW: [StatsEndpoint; 5] = [
        StatsEndpoint::AdminDashboard,
        StatsEndpoint::AdminUsers,
        StatsEndpoint::JobsStats,
        StatsEndpoint::ApplicationsStats,
        StatsEndpoint::SubscriptionsStats,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            StatsEndpoint::AdminDashboard => "api/core-admin/dashboard/",
            StatsEndpoint::AdminUsers => "api/core-admin/users/stats/",
            StatsEndpoint::AdminSystemHealth => "api/core-admin/system/health/",
            StatsEndpoint::AdminActivity => "api/core-admin/activity/recent/",
            StatsEndpoint::AnalyticsOverview => "api/analytics/overview/",
            StatsEndpoint::AnalyticsTraffic => "api/analytics/traffic/",
            StatsEndpoint::AnalyticsUserGrowth => "api/analytics/users/growth/",
            StatsEndpoint::AnalyticsConversions => "api/analytics/conversions/",
            StatsEndpoint::Countries => "api/common/countries/",
            StatsEndpoint::Regions => "api/common/regions/",
            StatsEndpoint::Sectors => "api/common/sectors/",
            StatsEndpoint::JobsStats => "api/jobs/stats/",
            StatsEndpoint::JobsRecent => "api/jobs/recent/",
            StatsEndpoint::JobsByCategory => "api/jobs/stats/by-category/",
            StatsEndpoint::ApplicationsStats => "api/applications/stats/",
            StatsEndpoint::ApplicationsRecent => "api/applications/recent/",
            StatsEndpoint::NotificationsStats => "api/notifications/stats/",
            StatsEndpoint::NotificationsUnread => "api/notifications/unread-count/",
            StatsEndpoint::SubscriptionsStats => "api/subscriptions/stats/",
            StatsEndpoint::SubscriptionPlans => "api/subscriptions/plans/",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StatsEndpoint::AdminDashboard => "admin-dashboard",
            StatsEndpoint::AdminUsers => "admin-users",
            StatsEndpoint::AdminSystemHealth => "system-health",
            StatsEndpoint::AdminActivity => "admin-activity",
            StatsEndpoint::AnalyticsOverview => "analytics-overview",
            StatsEndpoint::AnalyticsTraffic => "analytics-traffic",
            StatsEndpoint::AnalyticsUserGrowth => "user-growth",
            StatsEndpoint::AnalyticsConversions => "conversions",
            StatsEndpoint::Countries => "countries",
            StatsEndpoint::Regions => "regions",
            StatsEndpoint::Sectors => "sectors",
            StatsEndpoint::JobsStats => "jobs",
            StatsEndpoint::JobsRecent => "jobs-recent",
            StatsEndpoint::JobsByCategory => "jobs-by-category",
            StatsEndpoint::ApplicationsStats => "applications",
            StatsEndpoint::ApplicationsRecent => "applications-recent",
            StatsEndpoint::NotificationsStats => "notifications",
            StatsEndpoint::NotificationsUnread => "notifications-unread",
            StatsEndpoint::SubscriptionsStats => "subscriptions",
            StatsEndpoint::SubscriptionPlans => "subscription-plans",
        }
    }
}

impl std::str::FromStr for StatsEndpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatsEndpoint::ALL
            .into_iter()
            .find(|endpoint| endpoint.name() == s.trim())
            .ok_or_else(|| {
                let names: Vec<&str> = StatsEndpoint::ALL.iter().map(|e| e.name()).collect();
                format!("unknown stats endpoint '{}'. Available: {}", s, names.join(", "))
            })
    }
}

#[derive(Clone)]
pub struct StatsService {
    client: ApiClient,
}

impl StatsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, endpoint: StatsEndpoint) -> ServiceResult<Value> {
        Ok(self.client.get(endpoint.path(), Query::new()).await?)
    }

    /// Fetches the overview set concurrently; one failure doesn't hide the rest.
    pub async fn overview(&self) -> Vec<(StatsEndpoint, ServiceResult<Value>)> {
        let results = join_all(StatsEndpoint::OVERVIEW.iter().map(|e| self.fetch(*e))).await;
        StatsEndpoint::OVERVIEW.into_iter().zip(results).collect()
    }
}
