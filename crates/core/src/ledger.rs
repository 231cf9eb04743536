//! Append-only record of committed dishes.
//!
//! The ledger lives for the process lifetime only. Ids start at 1 and are assigned inside the
//! same critical section that appends the entry, so concurrent commits never share an id and a
//! rejected commit never consumes one.
//!
//! A committed dish stores the allergen codes computed at commit time. They are never
//! recomputed, even if the catalog a later process loads says something different.

use crate::aggregator::aggregate;
use crate::catalog::Catalog;
use crate::composer::DishDraft;
use crate::constants::FIRST_DISH_ID;
use crate::error::{CoreError, CoreResult, DishError, DishResult};
use chrono::{DateTime, NaiveDate, Utc};
use dishcheck_types::{Code, NonEmptyText};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A finalised dish as recorded for compliance reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommittedDish {
    pub id: u64,
    pub name: NonEmptyText,
    pub chef: String,
    pub ingredient_codes: Vec<String>,
    pub allergens: BTreeSet<Code>,
    pub timestamp: DateTime<Utc>,
}

/// Optional criteria for [`DishLedger::list`]. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerFilter {
    /// Case-insensitive exact match on the trimmed chef name.
    pub chef: Option<String>,
    /// Case-insensitive substring of the dish name.
    pub name_contains: Option<String>,
    /// Inclusive lower bound on the commit timestamp.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the commit timestamp.
    pub to: Option<DateTime<Utc>>,
}

impl LedgerFilter {
    pub fn chef(mut self, chef: impl Into<String>) -> Self {
        self.chef = Some(chef.into());
        self
    }

    pub fn name_contains(mut self, fragment: impl Into<String>) -> Self {
        self.name_contains = Some(fragment.into());
        self
    }

    pub fn between(mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn matches(&self, dish: &CommittedDish) -> bool {
        if let Some(chef) = &self.chef {
            if dish.chef.trim().to_lowercase() != chef.trim().to_lowercase() {
                return false;
            }
        }
        if let Some(fragment) = &self.name_contains {
            if !dish
                .name
                .as_str()
                .to_lowercase()
                .contains(&fragment.to_lowercase())
            {
                return false;
            }
        }
        if self.from.is_some_and(|from| dish.timestamp < from) {
            return false;
        }
        if self.to.is_some_and(|to| dish.timestamp > to) {
            return false;
        }
        true
    }
}

/// Which end of a date range a bound is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Start,
    End,
}

/// Parses a filter bound given as an RFC 3339 timestamp or a `YYYY-MM-DD` date.
///
/// A bare date covers the whole day: as [`DateBound::Start`] it means midnight, as
/// [`DateBound::End`] the last nanosecond of that day.
pub fn parse_date_bound(value: &str, bound: DateBound) -> CoreResult<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        CoreError::InvalidInput(format!(
            "invalid date {value:?}: expected YYYY-MM-DD or an RFC 3339 timestamp"
        ))
    })?;
    let time = match bound {
        DateBound::Start => date.and_hms_opt(0, 0, 0),
        DateBound::End => date.and_hms_nano_opt(23, 59, 59, 999_999_999),
    };
    time.map(|t| t.and_utc())
        .ok_or_else(|| CoreError::InvalidInput(format!("invalid date {value:?}")))
}

/// Compliance export of every committed dish.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerExport {
    pub exported_at: DateTime<Utc>,
    pub dish_count: usize,
    pub dishes: Vec<CommittedDish>,
}

#[derive(Debug)]
struct LedgerState {
    next_id: u64,
    dishes: Vec<CommittedDish>,
}

#[derive(Debug)]
pub struct DishLedger {
    state: Mutex<LedgerState>,
}

impl Default for DishLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl DishLedger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState {
                next_id: FIRST_DISH_ID,
                dishes: Vec::new(),
            }),
        }
    }

    /// Validates, aggregates and appends `draft`, returning the recorded dish.
    ///
    /// # Errors
    ///
    /// - [`DishError::EmptyDish`] if the draft has no ingredients
    /// - [`DishError::MissingName`] if the name is blank
    /// - [`DishError::UnknownIngredient`] if a code is not in `catalog`
    ///
    /// On any error the ledger and its id counter are untouched.
    pub fn commit(&self, draft: &DishDraft, catalog: &Catalog) -> DishResult<CommittedDish> {
        self.commit_with_clock(draft, catalog, Utc::now)
    }

    /// Commit with an injected clock. The clock is read inside the critical section so
    /// timestamps never run backwards relative to ids.
    pub(crate) fn commit_with_clock(
        &self,
        draft: &DishDraft,
        catalog: &Catalog,
        clock: impl FnOnce() -> DateTime<Utc>,
    ) -> DishResult<CommittedDish> {
        if draft.ingredient_codes.is_empty() {
            return Err(DishError::EmptyDish);
        }
        let name = NonEmptyText::new(&draft.name).map_err(|_| DishError::MissingName)?;
        let aggregation = aggregate(&draft.ingredient_codes, catalog)?;

        let mut state = self.state();
        let dish = CommittedDish {
            id: state.next_id,
            name,
            chef: draft.chef.trim().to_string(),
            ingredient_codes: draft
                .ingredient_codes
                .iter()
                .map(|code| code.trim().to_string())
                .collect(),
            allergens: aggregation.allergen_codes(),
            timestamp: clock(),
        };
        state.next_id += 1;
        state.dishes.push(dish.clone());
        drop(state);

        tracing::info!(
            dish_id = dish.id,
            allergens = dish.allergens.len(),
            "committed dish {}",
            dish.name
        );

        Ok(dish)
    }

    /// Committed dishes matching `filter`, in commit order.
    pub fn list(&self, filter: &LedgerFilter) -> Vec<CommittedDish> {
        self.state()
            .dishes
            .iter()
            .filter(|dish| filter.matches(dish))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: u64) -> Option<CommittedDish> {
        self.state().dishes.iter().find(|d| d.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state().dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn export(&self) -> LedgerExport {
        let dishes = self.list(&LedgerFilter::default());
        LedgerExport {
            exported_at: Utc::now(),
            dish_count: dishes.len(),
            dishes,
        }
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        // Entries are only pushed after being fully built, so a poisoned lock still holds
        // consistent data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
