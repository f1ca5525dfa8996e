use std::io::{self, Write};

use anyhow::{Context, Result};
use rand::Rng;

use lotto645_draws::source::DrawSource;

use lotto645_cli::display::{display_history, display_status, display_tickets};
use lotto645_cli::session::Session;

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Generate,
    Shuffle,
    Clear,
    History,
    ToggleAnalysis,
    Range(u32),
    ToggleUnique,
    ToggleSort,
    Status,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    let input = input.trim().to_lowercase();
    let mut parts = input.split_whitespace();
    let head = parts.next()?;
    match head {
        "1" | "generer" | "générer" | "generate" | "gen" => Some(InteractiveCommand::Generate),
        "2" | "melanger" | "mélanger" | "shuffle" => Some(InteractiveCommand::Shuffle),
        "3" | "effacer" | "clear" => Some(InteractiveCommand::Clear),
        "4" | "historique" | "history" | "hist" => Some(InteractiveCommand::History),
        "5" | "analyse" | "analysis" => Some(InteractiveCommand::ToggleAnalysis),
        "6" | "fenetre" | "fenêtre" | "range" => {
            let value = parts.next()?.parse::<u32>().ok()?;
            Some(InteractiveCommand::Range(value))
        }
        "7" | "uniques" | "unique" => Some(InteractiveCommand::ToggleUnique),
        "8" | "tri" | "sort" => Some(InteractiveCommand::ToggleSort),
        "9" | "etat" | "état" | "status" => Some(InteractiveCommand::Status),
        "0" | "quitter" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "oui"
    } else {
        "non"
    }
}

fn display_menu<S: DrawSource, R: Rng>(session: &Session<S, R>) {
    let config = session.config();
    println!();
    println!("── Mode interactif ──");
    println!("  1. generer     Générer des grilles");
    println!("  2. melanger    Mélanger la dernière génération");
    println!("  3. effacer     Effacer l'historique");
    println!("  4. historique  Afficher l'historique");
    println!("  5. analyse     Analyse des tirages [{}]", on_off(config.use_analysis));
    println!("  6. fenetre N   Nombre de tirages analysés [{}]", config.analysis_range);
    println!("  7. uniques     Numéros uniques [{}]", on_off(config.unique_only));
    println!("  8. tri         Tri croissant [{}]", on_off(config.sort_ascending));
    println!("  9. etat        État de l'analyse");
    println!("  0. quitter     Quitter");
    println!();
}

fn prompt(msg: &str) -> Result<Option<String>> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

pub fn run_interactive<S: DrawSource, R: Rng>(session: &mut Session<S, R>) -> Result<()> {
    display_status(session.analysis_status(), session.config().use_analysis);

    loop {
        display_menu(session);
        let Some(input) = prompt("> ")? else {
            return Ok(());
        };

        let Some(command) = parse_command(&input) else {
            println!("Commande inconnue : '{}'", input);
            continue;
        };

        match command {
            InteractiveCommand::Generate => {
                let tickets = session.generate()?.to_vec();
                display_status(session.analysis_status(), session.config().use_analysis);
                display_tickets(&tickets);
            }
            InteractiveCommand::Shuffle => {
                let tickets = session.shuffle()?.to_vec();
                display_tickets(&tickets);
            }
            InteractiveCommand::Clear => {
                session.clear();
                display_tickets(&[]);
                display_history(&[]);
            }
            InteractiveCommand::History => display_history(session.state().history()),
            InteractiveCommand::ToggleAnalysis => {
                session.update_config(|c| c.use_analysis = !c.use_analysis);
                display_status(session.analysis_status(), session.config().use_analysis);
            }
            InteractiveCommand::Range(range) => {
                session.update_config(|c| c.analysis_range = range);
                display_status(session.analysis_status(), session.config().use_analysis);
            }
            InteractiveCommand::ToggleUnique => {
                session.update_config(|c| c.unique_only = !c.unique_only);
            }
            InteractiveCommand::ToggleSort => {
                session.update_config(|c| c.sort_ascending = !c.sort_ascending);
            }
            InteractiveCommand::Status => {
                display_status(session.analysis_status(), session.config().use_analysis);
                match session.cached_range() {
                    Some(range) => println!("Table de poids en cache : {} tirages demandés", range),
                    None => println!("Aucune table de poids en cache"),
                }
            }
            InteractiveCommand::Quit => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers_and_names() {
        assert_eq!(parse_command("1"), Some(InteractiveCommand::Generate));
        assert_eq!(parse_command(" Générer "), Some(InteractiveCommand::Generate));
        assert_eq!(parse_command("shuffle"), Some(InteractiveCommand::Shuffle));
        assert_eq!(parse_command("effacer"), Some(InteractiveCommand::Clear));
        assert_eq!(parse_command("hist"), Some(InteractiveCommand::History));
        assert_eq!(parse_command("5"), Some(InteractiveCommand::ToggleAnalysis));
        assert_eq!(parse_command("uniques"), Some(InteractiveCommand::ToggleUnique));
        assert_eq!(parse_command("tri"), Some(InteractiveCommand::ToggleSort));
        assert_eq!(parse_command("etat"), Some(InteractiveCommand::Status));
        assert_eq!(parse_command("q"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_command("fenetre 100"), Some(InteractiveCommand::Range(100)));
        assert_eq!(parse_command("6 10"), Some(InteractiveCommand::Range(10)));
        assert_eq!(parse_command("range"), None);
        assert_eq!(parse_command("range abc"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("foo"), None);
    }
}
