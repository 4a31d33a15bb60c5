//! In-memory filtering, sorting, pagination and statistics for list pages.
//!
//! List pages fetch the whole collection once and do everything else locally.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::api::models::locations::{InfrastructureType, LocationResponse, OperationalStatus};
use crate::api::models::staff_assignments::{AssignmentStatus, AssignmentType, StaffAssignmentResponse};
use crate::api::models::user_groups::{UserGroupResponse, UserGroupType};
use crate::api::models::users::{UserResponse, UserStatus, UserType};
use crate::types::{LocationId, UserGroupId};

/// A row that list filters know how to inspect.
pub trait Listable {
    /// Values matched by the free-text search box.
    fn search_fields(&self) -> Vec<&str>;

    fn province_code(&self) -> Option<&str> {
        None
    }

    /// Wire value of the entity's type, e.g. `FIXED_DLTC`.
    fn kind(&self) -> Option<&'static str> {
        None
    }

    /// Wire value of the entity's status, e.g. `ACTIVE`.
    fn status(&self) -> Option<&'static str> {
        None
    }

    fn user_group_id(&self) -> Option<UserGroupId> {
        None
    }

    fn location_id(&self) -> Option<LocationId> {
        None
    }

    fn sort_key(&self) -> String;
}

impl Listable for UserGroupResponse {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.user_group_code.as_str(), self.user_group_name.as_str()]
    }

    fn province_code(&self) -> Option<&str> {
        Some(&self.province_code)
    }

    fn kind(&self) -> Option<&'static str> {
        Some(self.user_group_type.as_str())
    }

    fn status(&self) -> Option<&'static str> {
        Some(self.registration_status.as_str())
    }

    fn sort_key(&self) -> String {
        self.user_group_code.to_uppercase()
    }
}

impl Listable for LocationResponse {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.location_code.as_str(),
            self.location_name.as_str(),
            self.address.city.as_str(),
        ]
    }

    fn province_code(&self) -> Option<&str> {
        Some(&self.address.province_code)
    }

    fn kind(&self) -> Option<&'static str> {
        Some(self.infrastructure_type.as_str())
    }

    fn status(&self) -> Option<&'static str> {
        Some(self.operational_status.as_str())
    }

    fn user_group_id(&self) -> Option<UserGroupId> {
        Some(self.user_group_id)
    }

    fn location_id(&self) -> Option<LocationId> {
        Some(self.id)
    }

    fn sort_key(&self) -> String {
        self.location_code.to_uppercase()
    }
}

impl Listable for UserResponse {
    fn search_fields(&self) -> Vec<&str> {
        let details = &self.personal_details;
        let mut fields = vec![self.username.as_str()];
        fields.extend(
            [
                details.full_name.as_deref(),
                details.first_name.as_deref(),
                details.last_name.as_deref(),
                details.email.as_deref(),
            ]
            .into_iter()
            .flatten(),
        );
        fields
    }

    fn province_code(&self) -> Option<&str> {
        self.geographic_assignment.province_code.as_deref()
    }

    fn kind(&self) -> Option<&'static str> {
        Some(self.user_type.as_str())
    }

    fn status(&self) -> Option<&'static str> {
        Some(self.status.as_str())
    }

    fn user_group_id(&self) -> Option<UserGroupId> {
        self.user_group_id
    }

    fn sort_key(&self) -> String {
        self.username.to_uppercase()
    }
}

impl Listable for StaffAssignmentResponse {
    fn search_fields(&self) -> Vec<&str> {
        [
            self.username.as_deref(),
            self.user_full_name.as_deref(),
            self.location_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn kind(&self) -> Option<&'static str> {
        Some(self.assignment_type.as_str())
    }

    fn status(&self) -> Option<&'static str> {
        Some(self.assignment_status.as_str())
    }

    fn location_id(&self) -> Option<LocationId> {
        Some(self.location_id)
    }

    fn sort_key(&self) -> String {
        format!("{}{}", self.effective_date, self.id)
    }
}

/// Filter state of one list page. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub search: Option<String>,
    pub province_code: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub user_group_id: Option<UserGroupId>,
    /// Set when another page hands off with `?location=<id>`.
    pub location_id: Option<LocationId>,
}

impl ListFilter {
    pub fn matches<T: Listable>(&self, item: &T) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            if !item.search_fields().iter().any(|f| f.to_lowercase().contains(&needle)) {
                return false;
            }
        }
        if let Some(province) = &self.province_code
            && !item.province_code().is_some_and(|p| p.eq_ignore_ascii_case(province))
        {
            return false;
        }
        if let Some(kind) = &self.kind
            && !item.kind().is_some_and(|k| k.eq_ignore_ascii_case(kind))
        {
            return false;
        }
        if let Some(status) = &self.status
            && !item.status().is_some_and(|s| s.eq_ignore_ascii_case(status))
        {
            return false;
        }
        if self.user_group_id.is_some() && item.user_group_id() != self.user_group_id {
            return false;
        }
        if self.location_id.is_some() && item.location_id() != self.location_id {
            return false;
        }
        true
    }

    /// Matching rows, sorted by each row's sort key.
    pub fn apply<'a, T: Listable>(&self, items: &'a [T]) -> Vec<&'a T> {
        let mut rows: Vec<&T> = items.iter().filter(|item| self.matches(*item)).collect();
        rows.sort_by_cached_key(|item| item.sort_key());
        rows
    }
}

/// One client-side page of rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Cut `rows` into pages of `page_size` and return page `page` (clamped to the valid range).
pub fn paginate<T: Clone>(rows: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = rows.len();
    let total_pages = total_items.div_ceil(page_size);
    let page = page.clamp(1, total_pages.max(1));
    let items = rows
        .iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();
    Page {
        items,
        page,
        page_size,
        total_items,
        total_pages,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserGroupStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub by_type: BTreeMap<UserGroupType, usize>,
    pub by_province: BTreeMap<String, usize>,
}

impl UserGroupStats {
    pub fn compute(groups: &[UserGroupResponse]) -> Self {
        let mut stats = Self {
            total: groups.len(),
            ..Default::default()
        };
        for group in groups {
            if group.is_active {
                stats.active += 1;
            } else {
                stats.inactive += 1;
            }
            *stats.by_type.entry(group.user_group_type).or_default() += 1;
            *stats.by_province.entry(group.province_code.to_uppercase()).or_default() += 1;
        }
        stats
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub by_status: BTreeMap<OperationalStatus, usize>,
    pub by_type: BTreeMap<InfrastructureType, usize>,
    /// Sum of `max_daily_capacity` over locations that declare one
    pub total_daily_capacity: u64,
}

impl LocationStats {
    pub fn compute(locations: &[LocationResponse]) -> Self {
        let mut stats = Self {
            total: locations.len(),
            ..Default::default()
        };
        for location in locations {
            if location.is_active {
                stats.active += 1;
            } else {
                stats.inactive += 1;
            }
            *stats.by_status.entry(location.operational_status).or_default() += 1;
            *stats.by_type.entry(location.infrastructure_type).or_default() += 1;
            stats.total_daily_capacity += u64::from(location.max_daily_capacity.unwrap_or(0));
        }
        stats
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserStats {
    pub total: usize,
    pub by_status: BTreeMap<UserStatus, usize>,
    pub by_type: BTreeMap<UserType, usize>,
}

impl UserStats {
    pub fn compute(users: &[UserResponse]) -> Self {
        let mut stats = Self {
            total: users.len(),
            ..Default::default()
        };
        for user in users {
            *stats.by_status.entry(user.status).or_default() += 1;
            *stats.by_type.entry(user.user_type).or_default() += 1;
        }
        stats
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssignmentStats {
    pub total: usize,
    pub by_type: BTreeMap<AssignmentType, usize>,
    pub by_status: BTreeMap<AssignmentStatus, usize>,
}

impl AssignmentStats {
    pub fn compute(assignments: &[StaffAssignmentResponse]) -> Self {
        let mut stats = Self {
            total: assignments.len(),
            ..Default::default()
        };
        for assignment in assignments {
            *stats.by_type.entry(assignment.assignment_type).or_default() += 1;
            *stats.by_status.entry(assignment.assignment_status).or_default() += 1;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{location, user_group};

    #[test]
    fn test_province_filter() {
        let locations = vec![location("WC01L001", "A", "WC"), location("GP01L001", "B", "GP")];
        let filter = ListFilter {
            province_code: Some("WC".to_string()),
            ..Default::default()
        };
        let names: Vec<_> = filter.apply(&locations).iter().map(|l| l.location_name.as_str()).collect();
        assert_eq!(names, vec!["A"]);
    }

    #[test]
    fn test_search_is_case_insensitive_and_sorted() {
        let groups = vec![
            user_group("WC02", "WC", UserGroupType::FixedDltc),
            user_group("GP01", "GP", UserGroupType::MobileDltc),
            user_group("WC01", "WC", UserGroupType::FixedDltc),
        ];
        let filter = ListFilter {
            search: Some("wc0".to_string()),
            ..Default::default()
        };
        let codes: Vec<_> = filter.apply(&groups).iter().map(|g| g.user_group_code.as_str()).collect();
        assert_eq!(codes, vec!["WC01", "WC02"]);
    }

    #[test]
    fn test_kind_and_status_filters() {
        let mut closed = location("WC01L002", "Closed one", "WC");
        closed.operational_status = OperationalStatus::Closed;
        let locations = vec![location("WC01L001", "Open one", "WC"), closed];

        let filter = ListFilter {
            status: Some("closed".to_string()),
            kind: Some("FIXED_DLTC".to_string()),
            ..Default::default()
        };
        let rows = filter.apply(&locations);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].location_name, "Closed one");
    }

    #[test]
    fn test_location_hand_off() {
        let locations = vec![location("WC01L001", "A", "WC"), location("WC01L002", "B", "WC")];
        let filter = ListFilter {
            location_id: Some(locations[1].id),
            ..Default::default()
        };
        assert_eq!(filter.apply(&locations).len(), 1);
    }

    #[test]
    fn test_paginate() {
        let rows: Vec<u32> = (1..=23).collect();
        let page = paginate(&rows, 3, 10);
        assert_eq!(page.items, vec![21, 22, 23]);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next());
        assert!(page.has_previous());

        let clamped = paginate(&rows, 9, 10);
        assert_eq!(clamped.page, 3);

        let empty = paginate::<u32>(&[], 1, 10);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.items.is_empty());
        assert!(!empty.has_next());
    }

    #[test]
    fn test_location_stats() {
        let mut a = location("WC01L001", "A", "WC");
        a.max_daily_capacity = Some(120);
        let mut b = location("WC01L002", "B", "WC");
        b.max_daily_capacity = Some(80);
        b.is_active = false;
        b.operational_status = OperationalStatus::Maintenance;
        let c = location("GP01L001", "C", "GP");

        let stats = LocationStats::compute(&[a, b, c]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.total_daily_capacity, 200);
        assert_eq!(stats.by_status[&OperationalStatus::Operational], 2);
        assert_eq!(stats.by_status[&OperationalStatus::Maintenance], 1);
    }

    #[test]
    fn test_user_group_stats_serialize() {
        let groups = vec![
            user_group("WC01", "WC", UserGroupType::FixedDltc),
            user_group("wc02", "wc", UserGroupType::FixedDltc),
        ];
        let stats = UserGroupStats::compute(&groups);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["by_type"]["FIXED_DLTC"], 2);
        assert_eq!(json["by_province"]["WC"], 2);
    }
}
