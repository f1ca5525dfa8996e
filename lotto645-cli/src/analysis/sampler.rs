use std::collections::HashSet;

use anyhow::{Result, bail};
use rand::Rng;

use lotto645_draws::models::{MAX_NUMBER, WeightTable};

/// Sélection par roulette : parcourt les numéros éligibles en ordre croissant
/// en retranchant chaque poids de `target`, et retient le premier qui fait
/// passer le reste à ≤ 0. Si les arrondis empêchent d'y arriver, le dernier
/// numéro éligible est retenu. `None` seulement si tout est exclu.
pub fn roulette_select(table: &WeightTable, excluded: &HashSet<u8>, target: f64) -> Option<u8> {
    let mut remaining = target;
    let mut last = None;
    for (number, weight) in table.iter().filter(|(n, _)| !excluded.contains(n)) {
        remaining -= weight;
        last = Some(number);
        if remaining <= 0.0 {
            return Some(number);
        }
    }
    last
}

fn eligible_total(table: &WeightTable, excluded: &HashSet<u8>) -> (usize, f64) {
    table
        .iter()
        .filter(|(n, _)| !excluded.contains(n))
        .fold((0, 0.0), |(count, total), (_, w)| (count + 1, total + w))
}

/// Tirage pondéré sans remise : chaque numéro choisi est exclu du tirage
/// suivant. Erreur si moins de `count` numéros restent éligibles.
pub fn sample_without_replacement<R: Rng + ?Sized>(
    table: &WeightTable,
    count: usize,
    exclude: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>> {
    let mut excluded: HashSet<u8> = exclude.iter().copied().collect();
    let (eligible, _) = eligible_total(table, &excluded);
    if count > eligible {
        bail!(
            "Impossible de tirer {} numéros distincts : seulement {} éligibles",
            count,
            eligible
        );
    }

    let mut picked = Vec::with_capacity(count);
    for _ in 0..count {
        let (_, total) = eligible_total(table, &excluded);
        let target = rng.random::<f64>() * total;
        let Some(chosen) = roulette_select(table, &excluded, target) else {
            bail!("Plus aucun numéro éligible");
        };
        picked.push(chosen);
        excluded.insert(chosen);
    }

    Ok(picked)
}

/// Tirage pondéré avec remise : chaque tirage porte sur la table entière,
/// les doublons sont possibles.
pub fn sample_with_replacement<R: Rng + ?Sized>(
    table: &WeightTable,
    count: usize,
    rng: &mut R,
) -> Vec<u8> {
    let none = HashSet::new();
    let total = table.total();
    (0..count)
        .map(|_| {
            let target = rng.random::<f64>() * total;
            roulette_select(table, &none, target).unwrap_or(MAX_NUMBER)
        })
        .collect()
}
