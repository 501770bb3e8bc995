// ==========================================
// Stock Ledger - Arrival Schedule API
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::{month_index, ScheduleFilterValues, ScheduleItem, MONTHS};
use crate::repository::ScheduleStore;
use serde::Serialize;
use std::sync::Arc;

/// Lines sharing one expected-month label
#[derive(Debug, Clone, Serialize)]
pub struct MonthGroup {
    /// Vocabulary name; for unknown labels, the first raw label of the group
    pub month: Option<String>,
    pub items: Vec<ScheduleItem>,
}

pub struct ScheduleApi {
    schedule_store: Arc<dyn ScheduleStore>,
}

impl ScheduleApi {
    pub fn new(schedule_store: Arc<dyn ScheduleStore>) -> Self {
        Self { schedule_store }
    }

    /// Month vocabulary order, unknown labels last, then insertion order
    pub fn list(&self) -> ApiResult<Vec<ScheduleItem>> {
        let mut items = self.schedule_store.list()?;
        items.sort_by_key(ScheduleItem::display_key);
        Ok(items)
    }

    /// Filter values with months in vocabulary order, unknown labels last
    pub fn filter_values(&self) -> ApiResult<ScheduleFilterValues> {
        let mut values = self.schedule_store.filter_values()?;
        values
            .months
            .sort_by_cached_key(|m| (month_index(m).unwrap_or(u32::MAX), m.clone()));
        Ok(values)
    }

    /// Sorted lines grouped by month position
    pub fn list_by_month(&self) -> ApiResult<Vec<MonthGroup>> {
        let mut groups: Vec<(Option<u32>, MonthGroup)> = Vec::new();
        for item in self.list()? {
            let key = item.expected_month.as_deref().and_then(month_index);
            match groups.last_mut() {
                Some((last_key, group)) if *last_key == key => group.items.push(item),
                _ => {
                    let month = match key {
                        Some(i) => Some(MONTHS[(i - 1) as usize].to_string()),
                        None => item.expected_month.clone(),
                    };
                    groups.push((key, MonthGroup { month, items: vec![item] }));
                }
            }
        }
        Ok(groups.into_iter().map(|(_, g)| g).collect())
    }
}
