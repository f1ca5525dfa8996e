use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MAX_NUMBER: u8 = 45;
pub const PICK_COUNT: usize = 6;
pub const SET_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draw {
    pub draw_no: u32,
    pub date: Option<NaiveDate>,
    pub main: [u8; PICK_COUNT],
    pub bonus: u8,
    pub first_winner_count: u32,
    pub first_prize: u64,
}

impl Draw {
    /// Tirage minimal, sans les informations de gains.
    pub fn new(draw_no: u32, main: [u8; PICK_COUNT], bonus: u8) -> Self {
        Self {
            draw_no,
            date: None,
            main,
            bonus,
            first_winner_count: 0,
            first_prize: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub main: [u8; PICK_COUNT],
    pub bonus: u8,
}

/// Poids d'échantillonnage par numéro. L'indice 0 n'est pas utilisé.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    weights: [f64; MAX_NUMBER as usize + 1],
}

impl WeightTable {
    /// Table de base : poids 1 pour chaque numéro.
    pub fn uniform() -> Self {
        let mut weights = [1.0; MAX_NUMBER as usize + 1];
        weights[0] = 0.0;
        Self { weights }
    }

    pub fn get(&self, number: u8) -> f64 {
        self.weights[number as usize]
    }

    pub fn add(&mut self, number: u8, amount: f64) {
        if (1..=MAX_NUMBER).contains(&number) {
            self.weights[number as usize] += amount;
        }
    }

    /// Numéros 1..=45 avec leur poids, en ordre croissant.
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        (1..=MAX_NUMBER).map(move |n| (n, self.weights[n as usize]))
    }

    pub fn total(&self) -> f64 {
        self.iter().map(|(_, w)| w).sum()
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::uniform()
    }
}

#[derive(Debug, Clone)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    pub bonus_frequency: u32,
    pub gap: u32,
    pub weight: f64,
    pub tag: FrequencyTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyTag {
    Hot,
    Cold,
    Normal,
}

impl std::fmt::Display for FrequencyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrequencyTag::Hot => write!(f, "HOT"),
            FrequencyTag::Cold => write!(f, "COLD"),
            FrequencyTag::Normal => write!(f, "-"),
        }
    }
}

pub fn validate_draw(main: &[u8; PICK_COUNT], bonus: u8) -> Result<()> {
    for &n in main {
        if !(1..=MAX_NUMBER).contains(&n) {
            bail!("Numéro {} hors limites (1-{})", n, MAX_NUMBER);
        }
    }
    if !(1..=MAX_NUMBER).contains(&bonus) {
        bail!("Bonus {} hors limites (1-{})", bonus, MAX_NUMBER);
    }
    for i in 0..main.len() {
        for j in (i + 1)..main.len() {
            if main[i] == main[j] {
                bail!("Numéro en double : {}", main[i]);
            }
        }
    }
    if main.contains(&bonus) {
        bail!("Le bonus {} fait partie des numéros principaux", bonus);
    }
    Ok(())
}
