use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;

use lotto645_draws::models::{SET_COUNT, Ticket};
use lotto645_draws::source::DrawSource;

use crate::analysis::cache::{AnalysisCache, AnalysisStatus};
use crate::config::GenerationConfig;
use crate::generator::generate_tickets;

/// Historique des générations et grilles affichées.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    history: Vec<Vec<Ticket>>,
    displayed: Vec<Ticket>,
}

impl SessionState {
    pub fn history(&self) -> &[Vec<Ticket>] {
        &self.history
    }

    pub fn displayed(&self) -> &[Ticket] {
        &self.displayed
    }

    pub fn latest(&self) -> Option<&[Ticket]> {
        self.history.last().map(Vec::as_slice)
    }

    pub fn generated(mut self, tickets: Vec<Ticket>) -> Self {
        self.displayed = tickets.clone();
        self.history.push(tickets);
        self
    }

    /// Réaffiche la dernière génération, numéros principaux mélangés.
    /// L'historique et les bonus ne changent pas.
    pub fn shuffled<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        if let Some(latest) = self.history.last() {
            self.displayed = latest
                .iter()
                .map(|ticket| {
                    let mut main = ticket.main;
                    main.shuffle(rng);
                    Ticket { main, ..*ticket }
                })
                .collect();
        }
        self
    }

    pub fn cleared(self) -> Self {
        Self::default()
    }
}

pub struct Session<S, R> {
    config: GenerationConfig,
    cache: AnalysisCache<S>,
    rng: R,
    state: SessionState,
    sets: usize,
}

impl<S: DrawSource, R: Rng> Session<S, R> {
    pub fn new(config: GenerationConfig, cache: AnalysisCache<S>, rng: R) -> Self {
        Self {
            config,
            cache,
            rng,
            state: SessionState::default(),
            sets: SET_COUNT,
        }
    }

    pub fn with_sets(mut self, sets: usize) -> Self {
        self.sets = sets;
        self
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn analysis_status(&self) -> &AnalysisStatus {
        self.cache.status()
    }

    pub fn cached_range(&self) -> Option<u32> {
        self.cache.cached_range()
    }

    /// Remplace la configuration. Changer l'analyse ou sa fenêtre vide le cache
    /// immédiatement, sans attendre la prochaine génération.
    pub fn set_config(&mut self, config: GenerationConfig) {
        if self.config.analysis_changed(&config) {
            self.cache.invalidate();
        }
        self.config = config;
    }

    pub fn update_config(&mut self, f: impl FnOnce(&mut GenerationConfig)) {
        let mut config = self.config.clone();
        f(&mut config);
        self.set_config(config);
    }

    pub fn generate(&mut self) -> Result<&[Ticket]> {
        let weights = self.cache.ensure(&self.config);
        let tickets = generate_tickets(weights.as_ref(), &self.config, self.sets, &mut self.rng)?;
        self.state = std::mem::take(&mut self.state).generated(tickets);
        Ok(self.state.displayed())
    }

    /// Sans historique, mélanger revient à générer.
    pub fn shuffle(&mut self) -> Result<&[Ticket]> {
        if self.state.latest().is_none() {
            return self.generate();
        }
        self.state = std::mem::take(&mut self.state).shuffled(&mut self.rng);
        Ok(self.state.displayed())
    }

    pub fn clear(&mut self) {
        self.state = std::mem::take(&mut self.state).cleared();
    }
}
