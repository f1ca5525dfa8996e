use anyhow::{Result, bail};

use lotto645_draws::fetch::DrawFetcher;
use lotto645_draws::models::{Draw, WeightTable};
use lotto645_draws::source::DrawSource;

use crate::analysis::weights::build_weights;
use crate::config::GenerationConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisStatus {
    Idle,
    Loading,
    Ready { draws: usize },
    Error(String),
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisStatus::Idle => write!(f, "Analyse en attente"),
            AnalysisStatus::Loading => write!(f, "Analyse des derniers tirages..."),
            AnalysisStatus::Ready { draws } => write!(f, "Analyse des {} derniers tirages terminée", draws),
            AnalysisStatus::Error(_) => write!(f, "Échec de l'analyse, tirage aléatoire"),
        }
    }
}

/// Garde en mémoire une seule table de poids, associée à la fenêtre
/// d'analyse pour laquelle elle a été construite.
pub struct AnalysisCache<S> {
    fetcher: DrawFetcher<S>,
    weights: Option<WeightTable>,
    range: Option<u32>,
    latest: Option<u32>,
    status: AnalysisStatus,
}

impl<S: DrawSource> AnalysisCache<S> {
    pub fn new(fetcher: DrawFetcher<S>) -> Self {
        Self {
            fetcher,
            weights: None,
            range: None,
            latest: None,
            status: AnalysisStatus::Idle,
        }
    }

    pub fn status(&self) -> &AnalysisStatus {
        &self.status
    }

    pub fn source(&self) -> &S {
        self.fetcher.source()
    }

    pub fn cached_range(&self) -> Option<u32> {
        self.range
    }

    /// Vide la table en cache. Le numéro du dernier tirage est conservé.
    pub fn invalidate(&mut self) {
        self.weights = None;
        self.range = None;
        self.status = AnalysisStatus::Idle;
    }

    /// Table de poids pour la configuration courante, ou `None` si l'analyse
    /// est désactivée ou a échoué (l'appelant tire alors uniformément).
    pub fn ensure(&mut self, config: &GenerationConfig) -> Option<WeightTable> {
        if !config.use_analysis {
            return None;
        }

        let range = config.analysis_range;
        if let (Some(weights), Some(cached)) = (&self.weights, self.range) {
            if cached == range {
                return Some(weights.clone());
            }
        }

        self.status = AnalysisStatus::Loading;
        match self.rebuild(range) {
            Ok((table, draws)) => {
                log::info!("Table de poids construite sur {} tirages (fenêtre {})", draws, range);
                self.weights = Some(table.clone());
                self.range = Some(range);
                self.status = AnalysisStatus::Ready { draws };
                Some(table)
            }
            Err(e) => {
                log::warn!("Analyse impossible, retour au tirage uniforme : {:#}", e);
                self.weights = None;
                self.range = None;
                self.status = AnalysisStatus::Error(format!("{:#}", e));
                None
            }
        }
    }

    /// Les `count` tirages les plus récents disponibles, `draws[0]` = le plus récent.
    pub fn fetch_recent(&mut self, count: usize) -> Result<Vec<Draw>> {
        let latest = match self.latest {
            Some(latest) => latest,
            None => {
                let latest = self.fetcher.latest_draw_no()?;
                self.latest = Some(latest);
                latest
            }
        };
        let draws = self.fetcher.fetch_draws(latest, count);
        if draws.is_empty() {
            bail!("Aucun tirage récupéré");
        }
        Ok(draws)
    }

    fn rebuild(&mut self, range: u32) -> Result<(WeightTable, usize)> {
        let draws = self.fetch_recent(range as usize)?;
        Ok((build_weights(&draws), draws.len()))
    }
}
