use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use lotto645_draws::models::{Draw, FrequencyTag, NumberStats, Ticket};

use crate::analysis::cache::AnalysisStatus;

/// Couleur de boule par dizaine, comme sur les bulletins.
pub fn ball_color(number: u8) -> Color {
    match number {
        0..=10 => Color::Yellow,
        11..=20 => Color::Blue,
        21..=30 => Color::Red,
        31..=40 => Color::Grey,
        _ => Color::Green,
    }
}

fn ball_cell(number: u8) -> Cell {
    Cell::new(format!("{:2}", number)).fg(ball_color(number))
}

fn ticket_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Grille", "N1", "N2", "N3", "N4", "N5", "N6", "Bonus"]);
    table
}

fn ticket_row(index: usize, ticket: &Ticket) -> Vec<Cell> {
    let mut row = vec![Cell::new(format!("Grille {}", index + 1))];
    row.extend(ticket.main.iter().map(|&n| ball_cell(n)));
    row.push(ball_cell(ticket.bonus));
    row
}

pub fn display_tickets(tickets: &[Ticket]) {
    if tickets.is_empty() {
        println!("Générez des numéros pour commencer.");
        return;
    }

    println!("\n🎲 Numéros recommandés\n");
    let mut table = ticket_table();
    for (i, ticket) in tickets.iter().enumerate() {
        table.add_row(ticket_row(i, ticket));
    }
    println!("{table}");
}

/// Historique de la session, génération la plus récente en premier.
pub fn display_history(history: &[Vec<Ticket>]) {
    if history.is_empty() {
        println!("Aucun historique pour le moment.");
        return;
    }

    for (idx, tickets) in history.iter().enumerate().rev() {
        println!("\n── Génération {} ──", idx + 1);
        let mut table = ticket_table();
        for (i, ticket) in tickets.iter().enumerate() {
            table.add_row(ticket_row(i, ticket));
        }
        println!("{table}");
    }
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Tirage", "Date", "Numéros", "Bonus", "Gagnants R1", "Gains R1"]);

    for draw in draws {
        let mut sorted = draw.main;
        sorted.sort();

        let numbers = sorted
            .iter()
            .map(|n| format!("{:2}", n))
            .collect::<Vec<_>>()
            .join(" - ");

        let date = draw
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "—".to_string());

        let prize = if draw.first_prize > 0 {
            format!("{} ₩", draw.first_prize)
        } else {
            "—".to_string()
        };

        table.add_row(vec![
            Cell::new(draw.draw_no),
            Cell::new(date),
            Cell::new(numbers),
            ball_cell(draw.bonus),
            Cell::new(draw.first_winner_count),
            Cell::new(prize),
        ]);
    }

    println!("{table}");
}

pub fn display_stats(stats: &[NumberStats], window: usize) {
    println!("\n📊 Statistiques sur les {} derniers tirages\n", window);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Fréquence", "Bonus", "Retard", "Poids", "Tag"]);

    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));

    for stat in &sorted {
        let color = match stat.tag {
            FrequencyTag::Hot => Color::Green,
            FrequencyTag::Cold => Color::Red,
            FrequencyTag::Normal => Color::White,
        };
        table.add_row(vec![
            ball_cell(stat.number),
            Cell::new(stat.frequency),
            Cell::new(stat.bonus_frequency),
            Cell::new(stat.gap),
            Cell::new(format!("{:.1}", stat.weight)),
            Cell::new(stat.tag.to_string()).fg(color),
        ]);
    }
    println!("{table}");
}

pub fn display_status(status: &AnalysisStatus, use_analysis: bool) {
    if !use_analysis {
        println!("Analyse désactivée");
        return;
    }
    match status {
        AnalysisStatus::Error(reason) => println!("⚠ {} ({})", status, reason),
        _ => println!("{}", status),
    }
}
