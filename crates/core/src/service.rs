//! Session service tying the catalog, the active draft and the ledger together.
//!
//! One `KitchenService` is built at startup and handed to every caller (REST handlers, CLI,
//! tests). It owns all mutable state, so independent instances never interfere.

use crate::aggregator::{aggregate, AggregationResult};
use crate::catalog::Catalog;
use crate::composer::{DishComposer, DishDraft};
use crate::config::CoreConfig;
use crate::error::{CatalogResult, DishResult};
use crate::ledger::{CommittedDish, DishLedger, LedgerExport, LedgerFilter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The active draft together with its current aggregation.
#[derive(Debug, Clone)]
pub struct DraftView {
    pub draft: DishDraft,
    pub aggregation: AggregationResult,
}

#[derive(Debug)]
pub struct KitchenService {
    catalog: Arc<Catalog>,
    composer: Mutex<DishComposer>,
    ledger: DishLedger,
}

impl KitchenService {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            composer: Mutex::new(DishComposer::new(Arc::clone(&catalog))),
            catalog,
            ledger: DishLedger::new(),
        }
    }

    /// Loads the catalog named by `cfg` and starts an empty session.
    pub fn from_config(cfg: &CoreConfig) -> CatalogResult<Self> {
        let catalog = Catalog::load(cfg)?;
        Ok(Self::new(Arc::new(catalog)))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Aggregates an arbitrary ingredient list without touching the draft or the ledger.
    pub fn aggregate(&self, ingredient_codes: &[String]) -> DishResult<AggregationResult> {
        aggregate(ingredient_codes, &self.catalog)
    }

    pub fn draft(&self) -> DishResult<DraftView> {
        view(&self.composer())
    }

    pub fn add_ingredient(&self, code: &str) -> DishResult<DraftView> {
        let mut composer = self.composer();
        composer.add_ingredient(code)?;
        view(&composer)
    }

    pub fn remove_ingredient(&self, code: &str) -> DishResult<DraftView> {
        let mut composer = self.composer();
        composer.remove_ingredient(code);
        view(&composer)
    }

    /// Updates whichever of name and chef are given.
    pub fn update_draft(&self, name: Option<String>, chef: Option<String>) -> DishResult<DraftView> {
        let mut composer = self.composer();
        if let Some(name) = name {
            composer.set_name(name);
        }
        if let Some(chef) = chef {
            composer.set_chef(chef);
        }
        view(&composer)
    }

    pub fn clear_draft(&self) {
        self.composer().clear();
    }

    /// Commits the active draft and clears it. A rejected commit keeps the draft as it was.
    pub fn commit_draft(&self) -> DishResult<CommittedDish> {
        let mut composer = self.composer();
        let dish = self.ledger.commit(composer.draft(), &self.catalog)?;
        composer.clear();
        Ok(dish)
    }

    /// Commits a draft supplied by the caller, leaving the active draft alone.
    pub fn commit(&self, draft: &DishDraft) -> DishResult<CommittedDish> {
        self.ledger.commit(draft, &self.catalog)
    }

    pub fn dishes(&self, filter: &LedgerFilter) -> Vec<CommittedDish> {
        self.ledger.list(filter)
    }

    pub fn dish(&self, id: u64) -> Option<CommittedDish> {
        self.ledger.get(id)
    }

    pub fn export(&self) -> LedgerExport {
        self.ledger.export()
    }

    fn composer(&self) -> MutexGuard<'_, DishComposer> {
        self.composer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn view(composer: &DishComposer) -> DishResult<DraftView> {
    Ok(DraftView {
        draft: composer.draft().clone(),
        aggregation: composer.aggregate()?,
    })
}
