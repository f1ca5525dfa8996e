use anyhow::Result;
use rand::Rng;

use lotto645_draws::models::{MAX_NUMBER, PICK_COUNT, Ticket, WeightTable};

use crate::analysis::sampler::{sample_with_replacement, sample_without_replacement};
use crate::config::GenerationConfig;

/// Une grille : pondérée si une table est fournie, uniforme sinon.
pub fn pick_ticket<R: Rng + ?Sized>(
    weights: Option<&WeightTable>,
    config: &GenerationConfig,
    rng: &mut R,
) -> Result<Ticket> {
    let mut main: Vec<u8> = match weights {
        Some(table) if config.unique_only => sample_without_replacement(table, PICK_COUNT, &[], rng)?,
        Some(table) => sample_with_replacement(table, PICK_COUNT, rng),
        None => uniform_main(config.unique_only, rng),
    };

    if config.sort_ascending {
        main.sort_unstable();
    }

    let bonus = match weights {
        Some(table) => sample_without_replacement(table, 1, &main, rng)?[0],
        None => loop {
            let candidate = rng.random_range(1..=MAX_NUMBER);
            if !main.contains(&candidate) {
                break candidate;
            }
        },
    };

    let mut numbers = [0u8; PICK_COUNT];
    numbers.copy_from_slice(&main);
    Ok(Ticket { main: numbers, bonus })
}

fn uniform_main<R: Rng + ?Sized>(unique_only: bool, rng: &mut R) -> Vec<u8> {
    let mut main = Vec::with_capacity(PICK_COUNT);
    while main.len() < PICK_COUNT {
        let n = rng.random_range(1..=MAX_NUMBER);
        if unique_only && main.contains(&n) {
            continue;
        }
        main.push(n);
    }
    main
}

pub fn generate_tickets<R: Rng + ?Sized>(
    weights: Option<&WeightTable>,
    config: &GenerationConfig,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Ticket>> {
    (0..count).map(|_| pick_ticket(weights, config, rng)).collect()
}
