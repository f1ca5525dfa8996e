use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{Draw, validate_draw};

pub const DEFAULT_ENDPOINT: &str = "https://www.dhlottery.co.kr/common.do";

/// Source distante des tirages. Implémentée par le client HTTP et par les
/// sources en mémoire des tests.
pub trait DrawSource: Send + Sync {
    /// Numéro du tirage le plus récent.
    fn fetch_latest_draw_no(&self) -> Result<u32>;
    fn fetch_draw(&self, draw_no: u32) -> Result<Draw>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LottoResponse {
    return_value: String,
    drw_no: Option<u32>,
    drw_no_date: Option<String>,
    drwt_no1: Option<u8>,
    drwt_no2: Option<u8>,
    drwt_no3: Option<u8>,
    drwt_no4: Option<u8>,
    drwt_no5: Option<u8>,
    drwt_no6: Option<u8>,
    bnus_no: Option<u8>,
    #[serde(default)]
    first_przwner_co: u32,
    #[serde(default)]
    first_winamnt: u64,
}

impl LottoResponse {
    fn is_success(&self) -> bool {
        self.return_value == "success"
    }
}

/// Décode la réponse de la requête `drwNo=0`.
pub fn parse_latest(body: &str) -> Result<u32> {
    let response: LottoResponse =
        serde_json::from_str(body).context("Réponse JSON invalide")?;
    match response.drw_no {
        Some(no) if response.is_success() && no > 0 => Ok(no),
        _ => bail!("Échec de la récupération du dernier tirage"),
    }
}

/// Décode le tirage `draw_no`. Un `drwNo` absent reprend le numéro demandé,
/// un `drwNo` différent est une erreur.
pub fn parse_draw(body: &str, draw_no: u32) -> Result<Draw> {
    let response: LottoResponse =
        serde_json::from_str(body).context("Réponse JSON invalide")?;
    if !response.is_success() {
        bail!("Échec de la récupération du tirage {}", draw_no);
    }
    if let Some(received) = response.drw_no
        && received != draw_no
    {
        bail!("Tirage {} reçu au lieu du tirage {}", received, draw_no);
    }

    let field = |value: Option<u8>, name: &str| -> Result<u8> {
        value.with_context(|| format!("Champ manquant : {}", name))
    };

    let main = [
        field(response.drwt_no1, "drwtNo1")?,
        field(response.drwt_no2, "drwtNo2")?,
        field(response.drwt_no3, "drwtNo3")?,
        field(response.drwt_no4, "drwtNo4")?,
        field(response.drwt_no5, "drwtNo5")?,
        field(response.drwt_no6, "drwtNo6")?,
    ];
    let bonus = field(response.bnus_no, "bnusNo")?;
    validate_draw(&main, bonus)?;

    let date = match response.drw_no_date.as_deref() {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("Date invalide : '{}'", raw))?,
        ),
        None => None,
    };

    Ok(Draw {
        draw_no,
        date,
        main,
        bonus,
        first_winner_count: response.first_przwner_co,
        first_prize: response.first_winamnt,
    })
}

pub struct HttpDrawSource {
    agent: ureq::Agent,
    endpoint: String,
}

impl HttpDrawSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            endpoint: endpoint.into(),
        }
    }

    fn get(&self, draw_no: u32) -> Result<String> {
        let body = self
            .agent
            .get(&self.endpoint)
            .query("method", "getLottoNumber")
            .query("drwNo", &draw_no.to_string())
            .call()
            .with_context(|| format!("Requête échouée pour le tirage {}", draw_no))?
            .into_string()
            .context("Lecture de la réponse impossible")?;
        Ok(body)
    }
}

impl DrawSource for HttpDrawSource {
    fn fetch_latest_draw_no(&self) -> Result<u32> {
        parse_latest(&self.get(0)?)
    }

    fn fetch_draw(&self, draw_no: u32) -> Result<Draw> {
        parse_draw(&self.get(draw_no)?, draw_no)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAW_1100: &str = r#"{
        "totSellamnt": 111840714000,
        "returnValue": "success",
        "drwNoDate": "2024-01-06",
        "firstWinamnt": 2662169813,
        "drwtNo6": 41,
        "drwtNo4": 28,
        "firstPrzwnerCo": 10,
        "drwtNo5": 30,
        "bnusNo": 3,
        "firstAccumamnt": 26621698130,
        "drwNo": 1100,
        "drwtNo2": 12,
        "drwtNo3": 26,
        "drwtNo1": 17
    }"#;

    #[test]
    fn test_parse_draw() {
        let draw = parse_draw(DRAW_1100, 1100).unwrap();
        assert_eq!(draw.draw_no, 1100);
        assert_eq!(draw.main, [17, 12, 26, 28, 30, 41]);
        assert_eq!(draw.bonus, 3);
        assert_eq!(draw.date, NaiveDate::from_ymd_opt(2024, 1, 6));
        assert_eq!(draw.first_winner_count, 10);
        assert_eq!(draw.first_prize, 2_662_169_813);
    }

    #[test]
    fn test_parse_draw_fail_indicator() {
        assert!(parse_draw(r#"{"returnValue": "fail"}"#, 3).is_err());
    }

    #[test]
    fn test_parse_draw_missing_field() {
        let body = r#"{"returnValue": "success", "drwNo": 5, "drwtNo1": 1, "bnusNo": 9}"#;
        assert!(parse_draw(body, 5).is_err());
    }

    #[test]
    fn test_parse_draw_rejects_invalid_numbers() {
        let body = r#"{"returnValue": "success", "drwNo": 5,
            "drwtNo1": 1, "drwtNo2": 1, "drwtNo3": 3, "drwtNo4": 4, "drwtNo5": 5, "drwtNo6": 6,
            "bnusNo": 9}"#;
        assert!(parse_draw(body, 5).is_err());
    }

    #[test]
    fn test_parse_draw_number_from_request() {
        let body = r#"{"returnValue": "success",
            "drwtNo1": 1, "drwtNo2": 2, "drwtNo3": 3, "drwtNo4": 4, "drwtNo5": 5, "drwtNo6": 6,
            "bnusNo": 9}"#;
        assert_eq!(parse_draw(body, 42).unwrap().draw_no, 42);
    }

    #[test]
    fn test_parse_draw_rejects_other_draw() {
        assert!(parse_draw(DRAW_1100, 1099).is_err());
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(parse_draw("<html>maintenance</html>", 1).is_err());
        assert!(parse_latest("").is_err());
    }

    #[test]
    fn test_parse_latest() {
        assert_eq!(parse_latest(DRAW_1100).unwrap(), 1100);
        assert!(parse_latest(r#"{"returnValue": "success"}"#).is_err());
        assert!(parse_latest(r#"{"returnValue": "fail", "drwNo": 12}"#).is_err());
    }
}
