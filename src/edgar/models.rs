// src/edgar/models.rs
use serde::{Deserialize, Serialize};

/// One row of https://www.sec.gov/files/company_tickers.json
#[derive(Debug, Deserialize)]
pub struct TickerEntry {
    pub cik_str: u64,
    pub ticker: String,
    pub title: String,
}

/// The slice of the EDGAR submissions index we actually consume.
/// Example: https://data.sec.gov/submissions/CIK0000320193.json
#[derive(Debug, Deserialize)]
pub struct CompanySubmissions {
    pub cik: String,
    pub name: String,
    pub filings: Filings,
}

#[derive(Debug, Deserialize)]
pub struct Filings {
    pub recent: RecentFilings,
}

// EDGAR serves parallel arrays: index i across all vectors describes one
// filing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFilings {
    pub accession_number: Vec<String>,
    pub filing_date: Vec<String>,
    pub form: Vec<String>,
}

/// One filing selected for processing.
#[derive(Debug, Clone, Serialize)]
pub struct FilingInfo {
    pub accession_number: String,
    pub filing_date: String,
    pub form_type: String,
    pub ticker: String,
    pub company_name: String,
    pub cik: String,
    pub year: Option<u32>,
}

impl FilingInfo {
    /// URL of the full-submission text container (the SGML-like file that
    /// concatenates every sub-document of the filing).
    pub fn container_url(&self) -> String {
        let cik_short = self.cik.trim_start_matches('0');
        let acc_no_dashes = self.accession_number.replace('-', "");
        format!(
            "https://www.sec.gov/Archives/edgar/data/{}/{}/{}.txt",
            cik_short, acc_no_dashes, self.accession_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_url_strips_cik_zeros_and_accession_dashes() {
        let filing = FilingInfo {
            accession_number: "0000320193-23-000106".to_string(),
            filing_date: "2023-11-03".to_string(),
            form_type: "10-K".to_string(),
            ticker: "AAPL".to_string(),
            company_name: "Apple Inc.".to_string(),
            cik: "0000320193".to_string(),
            year: Some(2023),
        };
        assert_eq!(
            filing.container_url(),
            "https://www.sec.gov/Archives/edgar/data/320193/000032019323000106/0000320193-23-000106.txt"
        );
    }
}
