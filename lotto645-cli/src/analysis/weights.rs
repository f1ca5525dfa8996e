use lotto645_draws::models::{Draw, WeightTable};

const MAIN_HIT: f64 = 1.0;
const BONUS_HIT: f64 = 0.5;

/// poids[n] = 1 + apparitions de n parmi les numéros principaux
/// + 0.5 × apparitions de n en bonus.
pub fn build_weights(draws: &[Draw]) -> WeightTable {
    let mut table = WeightTable::uniform();
    for draw in draws {
        for &n in &draw.main {
            table.add(n, MAIN_HIT);
        }
        table.add(draw.bonus, BONUS_HIT);
    }
    table
}
